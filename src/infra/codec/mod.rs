//! Fixed-layout wire codec for the USB to CAN bridge.
//!
//! Two message kinds cross the link:
//!
//! * the 13-byte bulk message carrying one CAN frame (little-endian u32
//!   identifier field, one DLC byte, eight payload bytes);
//! * the 11-byte bit-timing control payload (four padding bytes, u32
//!   prescaler, three single-byte segment fields, all zero-based).
//!
//! Every message has a fixed size regardless of the DLC: the receiver
//! trusts the declared DLC, never the USB transfer length. Encoding
//! zero-fills unused payload bytes so captures stay diffable; decoding is
//! pure and side-effect free.
use crate::error::DecodeError;
use crate::protocol::transport::frame::{CanFrame, MAX_FRAME_DATA};
use crate::protocol::transport::timing::{BitTiming, RegisterTiming};

/// Identifier-field flag marking a 29-bit extended identifier.
pub const ID_EXTENDED: u32 = 1 << 31;
/// Identifier-field flag marking a remote-transmission-request frame.
pub const ID_RTR: u32 = 1 << 30;
/// Mask of the numeric identifier bits within the identifier field.
pub const ID_MASK: u32 = 0x1FFF_FFFF;

/// Total size of the bulk wire message: id field + DLC + payload.
pub const WIRE_FRAME_LEN: usize = 13;
/// Total size of the bit-timing control payload, padding included.
pub const BIT_TIMING_WIRE_LEN: usize = 11;

/// Pack a CAN frame into the fixed 13-byte bulk layout.
///
/// Payload bytes beyond the DLC are zero-filled. The identifier is masked
/// to 29 bits before the flag bits are OR-ed in.
pub fn encode_frame_into(out: &mut [u8; WIRE_FRAME_LEN], frame: &CanFrame) {
    let mut id = frame.id & ID_MASK;
    if frame.extended {
        id |= ID_EXTENDED;
    }
    if frame.rtr {
        id |= ID_RTR;
    }
    out[0..4].copy_from_slice(&id.to_le_bytes());
    out[4] = frame.dlc;
    out[5..].fill(0);
    let used = frame.data_len();
    out[5..5 + used].copy_from_slice(&frame.data[..used]);
}

/// Decode a bulk wire message into a CAN frame.
///
/// Fails only on truncated input. The identifier is masked to 29 bits; the
/// DLC is passed through unvalidated, but no more than eight payload bytes
/// are ever read regardless of the declared value.
pub fn decode_frame(payload: &[u8]) -> Result<CanFrame, DecodeError> {
    if payload.len() < WIRE_FRAME_LEN {
        return Err(DecodeError::Truncated);
    }
    let raw = u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
    let mut data = [0u8; MAX_FRAME_DATA];
    data.copy_from_slice(&payload[5..5 + MAX_FRAME_DATA]);
    Ok(CanFrame {
        id: raw & ID_MASK,
        extended: raw & ID_EXTENDED != 0,
        rtr: raw & ID_RTR != 0,
        dlc: payload[4],
        data,
    })
}

/// Pack an abstract bit-timing descriptor into the control payload layout,
/// converting every field to its zero-based register encoding.
///
/// The four leading bytes are transport-alignment padding and always zero.
pub fn encode_bit_timing_into(out: &mut [u8; BIT_TIMING_WIRE_LEN], timing: &BitTiming) {
    let regs = timing.register_fields();
    out[0..4].fill(0);
    out[4..8].copy_from_slice(&regs.brp.to_le_bytes());
    out[8] = regs.phase_seg1;
    out[9] = regs.phase_seg2;
    out[10] = regs.sjw;
}

/// Decode a bit-timing control payload into the zero-based register fields.
///
/// Field values are not range-checked: the controller's bus-on attempt is
/// the only safety net, matching the device firmware contract.
pub fn decode_bit_timing(payload: &[u8]) -> Result<RegisterTiming, DecodeError> {
    if payload.len() < BIT_TIMING_WIRE_LEN {
        return Err(DecodeError::Truncated);
    }
    Ok(RegisterTiming {
        brp: u32::from_le_bytes([payload[4], payload[5], payload[6], payload[7]]),
        phase_seg1: payload[8],
        phase_seg2: payload[9],
        sjw: payload[10],
    })
}
