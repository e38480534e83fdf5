//! Device-side endpoint multiplexer: owns the three logical pipes and
//! routes traffic between them and the CAN controller adapter.
//!
//! * control → [`crate::protocol::control`] dispatch (bus on/off, timing);
//! * bulk OUT → one controller transmit attempt per packet;
//! * CAN receive interrupt → one non-blocking bulk IN write per frame.
//!
//! Every data-path failure (malformed packet, disarmed bus, busy mailbox,
//! busy endpoint) is a silent drop: the link offers at-most-once,
//! best-effort delivery and has no acknowledgment channel for it.

pub mod controller;

use crate::infra::codec::{decode_frame, encode_frame_into, WIRE_FRAME_LEN};
use crate::protocol::control::{parse_request, BridgeRequest, SetupPacket, SetupDisposition};
use crate::protocol::transport::timing::BitTiming;
use crate::protocol::transport::traits::bulk_in_pipe::BulkInPipe;
use crate::protocol::transport::traits::can_controller::CanController;
use controller::ControllerAdapter;

/// Bulk IN endpoint address (device to host frames).
pub const BULK_IN_ENDPOINT: u8 = 0x81;
/// Bulk OUT endpoint address (host to device frames).
pub const BULK_OUT_ENDPOINT: u8 = 0x01;
/// Maximum packet size of both bulk endpoints.
pub const MAX_PACKET_SIZE: u16 = 64;

/// Length of the MCU unique-id block the serial number is derived from.
pub const UNIQUE_ID_LEN: usize = 12;
/// Length of the derived ASCII serial number.
pub const SERIAL_LEN: usize = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Process-wide device configuration, built once at initialization and
/// immutable for the life of the link. Endpoint layout is static; only the
/// identity and the power-on bit timing vary per build.
pub struct DeviceConfig {
    /// Bulk IN endpoint address registered with the USB stack.
    pub bulk_in_endpoint: u8,
    /// Bulk OUT endpoint address registered with the USB stack.
    pub bulk_out_endpoint: u8,
    /// Maximum packet size of the bulk endpoints.
    pub packet_size: u16,
    /// ASCII serial number reported during enumeration.
    pub serial: [u8; SERIAL_LEN],
    /// Bit timing used until the host programs its own.
    pub default_timing: BitTiming,
}

impl DeviceConfig {
    /// Build the configuration from the MCU unique id and the power-on
    /// bit timing.
    pub fn new(unique_id: &[u8; UNIQUE_ID_LEN], default_timing: BitTiming) -> Self {
        Self {
            bulk_in_endpoint: BULK_IN_ENDPOINT,
            bulk_out_endpoint: BULK_OUT_ENDPOINT,
            packet_size: MAX_PACKET_SIZE,
            serial: serial_from_unique_id(unique_id),
            default_timing,
        }
    }

    /// Serial number as a string slice.
    pub fn serial_str(&self) -> &str {
        // The serial only ever contains ASCII hex digits.
        core::str::from_utf8(&self.serial).unwrap_or("")
    }
}

/// Derive the 24-character ASCII serial number from the MCU's 96-bit
/// unique id: two uppercase hex digits per byte.
pub fn serial_from_unique_id(unique_id: &[u8; UNIQUE_ID_LEN]) -> [u8; SERIAL_LEN] {
    let mut serial = [0u8; SERIAL_LEN];
    for (i, byte) in unique_id.iter().enumerate() {
        serial[2 * i] = hex_digit(byte >> 4);
        serial[2 * i + 1] = hex_digit(byte & 0xF);
    }
    serial
}

fn hex_digit(nibble: u8) -> u8 {
    if nibble < 10 {
        b'0' + nibble
    } else {
        b'A' + nibble - 10
    }
}

/// The multiplexer itself: controller adapter plus bulk IN pipe.
///
/// All entry points are non-blocking. `on_bulk_out` and `handle_control`
/// run from the USB dispatch loop; `on_can_rx` runs from the CAN receive
/// interrupt, which is not reentrant for a single controller instance.
pub struct EndpointMux<C: CanController, P: BulkInPipe> {
    adapter: ControllerAdapter<C>,
    pipe: P,
    config: DeviceConfig,
}

impl<C: CanController, P: BulkInPipe> EndpointMux<C, P> {
    /// Assemble the multiplexer. The bus starts disabled.
    pub fn new(controller: C, pipe: P, config: DeviceConfig) -> Self {
        Self {
            adapter: ControllerAdapter::new(controller, &config.default_timing),
            pipe,
            config,
        }
    }

    /// Immutable device configuration.
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Whether the CAN bus is currently armed.
    pub fn bus_enabled(&self) -> bool {
        self.adapter.is_enabled()
    }

    /// Administrative path: dispatch one control transfer.
    ///
    /// Bridge requests are always accepted once parsed, even when the
    /// controller refuses bus-on (the adapter then simply stays disabled,
    /// as the host has no enable acknowledgment beyond the control stage).
    /// Everything else is rejected for the USB stack to stall.
    pub fn handle_control(&mut self, setup: &SetupPacket, data: &[u8]) -> SetupDisposition {
        let request = match parse_request(setup, data) {
            Ok(request) => request,
            Err(_) => return SetupDisposition::Reject,
        };
        match request {
            BridgeRequest::OnOffBus { enable: true } => {
                if self.adapter.enable().is_err() {
                    #[cfg(feature = "defmt")]
                    defmt::error!("bus-on failed, bus stays disabled");
                }
            }
            BridgeRequest::OnOffBus { enable: false } => self.adapter.disable(),
            BridgeRequest::SetBitTiming(timing) => {
                if self.adapter.set_timing(timing).is_err() {
                    #[cfg(feature = "defmt")]
                    defmt::error!("bus-on failed after timing change");
                }
            }
        }
        SetupDisposition::Accept
    }

    /// Host to bus path: one bulk OUT packet, at most one transmit attempt.
    ///
    /// Malformed packets, a disarmed bus, and a busy mailbox all drop the
    /// frame without reporting upstream.
    pub fn on_bulk_out(&mut self, packet: &[u8]) {
        let frame = match decode_frame(packet) {
            Ok(frame) => frame,
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("malformed bulk OUT packet dropped");
                return;
            }
        };
        if !self.adapter.is_enabled() {
            return;
        }
        if self.adapter.transmit(&frame).is_err() {
            #[cfg(feature = "defmt")]
            defmt::debug!("transmit mailbox busy, frame dropped");
        }
    }

    /// Bus to host path, invoked from the CAN receive-interrupt context.
    ///
    /// Reads exactly one frame, encodes it, and tries a single non-blocking
    /// endpoint write. A busy endpoint drops the frame: the single-slot
    /// hand-off that keeps interrupt latency bounded under host-side
    /// backpressure.
    pub fn on_can_rx(&mut self) {
        let frame = self.adapter.receive();
        let mut packet = [0u8; WIRE_FRAME_LEN];
        encode_frame_into(&mut packet, &frame);
        if self.pipe.try_write(&packet).is_err() {
            #[cfg(feature = "defmt")]
            defmt::debug!("bulk IN endpoint busy, frame dropped");
        }
    }
}
