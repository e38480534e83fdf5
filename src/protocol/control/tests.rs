//! Unit tests for the control-request dispatch table.
use super::*;
use crate::error::ControlError;
use crate::infra::codec::{encode_bit_timing_into, BIT_TIMING_WIRE_LEN};
use crate::protocol::transport::timing::BitTiming;

fn vendor_setup(request: u8, value: u16) -> SetupPacket {
    SetupPacket {
        request_type: REQUEST_TYPE_VENDOR_INTERFACE,
        request,
        value,
        index: BRIDGE_INTERFACE,
        length: 0,
    }
}

#[test]
/// Bit 0 of `wValue` carries the on/off parameter; other bits are ignored.
fn on_off_reads_value_bit_zero() {
    for (value, enable) in [(0u16, false), (1, true), (2, false), (3, true)] {
        let setup = vendor_setup(REQUEST_ON_OFF_BUS, value);
        assert_eq!(
            parse_request(&setup, &[]),
            Ok(BridgeRequest::OnOffBus { enable })
        );
    }
    assert_eq!(on_off_value(true), 1);
    assert_eq!(on_off_value(false), 0);
}

#[test]
/// The bit-timing request decodes its data stage into register fields.
fn set_bit_timing_decodes_payload() {
    let timing = BitTiming {
        brp: 3,
        phase_seg1: 13,
        phase_seg2: 2,
        sjw: 1,
    };
    let mut payload = [0u8; BIT_TIMING_WIRE_LEN];
    encode_bit_timing_into(&mut payload, &timing);

    let setup = vendor_setup(REQUEST_SET_BITTIMING, 0);
    match parse_request(&setup, &payload) {
        Ok(BridgeRequest::SetBitTiming(regs)) => {
            assert_eq!(regs, timing.register_fields());
        }
        other => panic!("unexpected parse result: {other:?}"),
    }
}

#[test]
/// A short data stage is refused before touching the adapter.
fn set_bit_timing_rejects_short_payload() {
    let setup = vendor_setup(REQUEST_SET_BITTIMING, 0);
    assert_eq!(
        parse_request(&setup, &[0u8; BIT_TIMING_WIRE_LEN - 1]),
        Err(ControlError::ShortPayload)
    );
}

#[test]
/// Non-vendor or misdirected requests fall through to standard handling.
fn scope_is_checked_before_the_opcode() {
    let mut setup = vendor_setup(REQUEST_ON_OFF_BUS, 1);
    setup.request_type = 0x21; // class request, wrong scope
    assert_eq!(parse_request(&setup, &[]), Err(ControlError::NotVendorScoped));

    let mut setup = vendor_setup(REQUEST_ON_OFF_BUS, 1);
    setup.index = 1; // some other interface
    assert_eq!(parse_request(&setup, &[]), Err(ControlError::NotVendorScoped));
}

#[test]
/// Opcodes outside the protocol are reported for the caller to stall.
fn unknown_opcodes_are_rejected() {
    let setup = vendor_setup(0x7F, 0);
    assert_eq!(
        parse_request(&setup, &[]),
        Err(ControlError::UnknownRequest { opcode: 0x7F })
    );
}
