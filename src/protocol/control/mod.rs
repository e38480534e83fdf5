//! Out-of-band control protocol shared by both sides of the link.
//!
//! Two vendor requests exist: bus on/off, whose parameter travels in the
//! setup packet's own `wValue` field (bit 0), and set bit timing, whose
//! parameter travels in the data stage as the fixed bit-timing payload.
//! Anything else is rejected so the caller can fall back to standard USB
//! request handling.
use crate::error::ControlError;
use crate::infra::codec::decode_bit_timing;
use crate::protocol::transport::timing::RegisterTiming;

/// Vendor request opcode: set bus enabled/disabled (`wValue` bit 0).
pub const REQUEST_ON_OFF_BUS: u8 = 0x00;
/// Vendor request opcode: program bit timing (data stage payload).
pub const REQUEST_SET_BITTIMING: u8 = 0x01;

/// `bmRequestType` the bridge answers to: host-to-device, vendor scoped,
/// directed at the interface.
pub const REQUEST_TYPE_VENDOR_INTERFACE: u8 = 0x41;
/// Interface number the bridge protocol lives on.
pub const BRIDGE_INTERFACE: u16 = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Header fields of a USB control transfer, as handed over by the
/// device-side USB stack.
pub struct SetupPacket {
    pub request_type: u8,
    pub request: u8,
    pub value: u16,
    pub index: u16,
    pub length: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// A control request decoded into bridge-protocol terms.
pub enum BridgeRequest {
    /// Arm or disarm the CAN bus.
    OnOffBus { enable: bool },
    /// Reprogram the controller's bit timing (zero-based wire fields).
    SetBitTiming(RegisterTiming),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Outcome reported back to the USB control-transfer dispatcher.
pub enum SetupDisposition {
    /// The request was handled by the bridge.
    Accept,
    /// Not a bridge request; a higher layer should respond (protocol stall).
    Reject,
}

/// Decode one control transfer into a [`BridgeRequest`].
///
/// Requests that are not vendor scoped or not directed at the bridge
/// interface are refused before the opcode is even looked at. The
/// bit-timing payload is checked for length only; field values are
/// programmed into the registers unvalidated, with the hardware's bus-on
/// attempt as the sole safety net.
pub fn parse_request(setup: &SetupPacket, data: &[u8]) -> Result<BridgeRequest, ControlError> {
    if setup.request_type != REQUEST_TYPE_VENDOR_INTERFACE || setup.index != BRIDGE_INTERFACE {
        return Err(ControlError::NotVendorScoped);
    }
    match setup.request {
        REQUEST_ON_OFF_BUS => Ok(BridgeRequest::OnOffBus {
            enable: setup.value & 1 != 0,
        }),
        REQUEST_SET_BITTIMING => {
            let timing = decode_bit_timing(data).map_err(|_| ControlError::ShortPayload)?;
            Ok(BridgeRequest::SetBitTiming(timing))
        }
        opcode => Err(ControlError::UnknownRequest { opcode }),
    }
}

/// `wValue` carried by an on/off request issued from the host side.
pub fn on_off_value(enable: bool) -> u16 {
    u16::from(enable)
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
