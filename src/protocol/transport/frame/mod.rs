//! In-memory representation of a classic CAN frame as it crosses the bridge.
use embedded_can::{ExtendedId, Id, StandardId};

/// Numeric range of a 29-bit CAN identifier.
pub const MAX_EXTENDED_ID: u32 = 0x1FFF_FFFF;
/// Numeric range of an 11-bit CAN identifier.
pub const MAX_STANDARD_ID: u32 = 0x7FF;
/// Classic CAN payload limit.
pub const MAX_FRAME_DATA: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// A single CAN frame: identifier, control flags, up to eight data bytes.
pub struct CanFrame {
    /// Numeric identifier. Never carries bits above the 29-bit range.
    pub id: u32,
    /// Extended (29-bit) identifier flag.
    pub extended: bool,
    /// Remote-transmission-request flag.
    pub rtr: bool,
    /// Data length code. Decoded frames pass the declared value through
    /// untouched, so a malformed peer can make it exceed 8; the payload
    /// buffer itself never does.
    pub dlc: u8,
    /// Payload buffer. Bytes beyond the DLC are zero.
    pub data: [u8; MAX_FRAME_DATA],
}

impl CanFrame {
    /// Build a data frame. Returns `None` when `data` exceeds eight bytes.
    /// The identifier is masked to 29 bits.
    pub fn new(id: u32, extended: bool, data: &[u8]) -> Option<Self> {
        if data.len() > MAX_FRAME_DATA {
            return None;
        }
        let mut buf = [0u8; MAX_FRAME_DATA];
        buf[..data.len()].copy_from_slice(data);
        Some(Self {
            id: id & MAX_EXTENDED_ID,
            extended,
            rtr: false,
            dlc: data.len() as u8,
            data: buf,
        })
    }

    /// Build a remote frame carrying no data. Returns `None` when `dlc`
    /// exceeds eight.
    pub fn new_remote(id: u32, extended: bool, dlc: u8) -> Option<Self> {
        if usize::from(dlc) > MAX_FRAME_DATA {
            return None;
        }
        Some(Self {
            id: id & MAX_EXTENDED_ID,
            extended,
            rtr: true,
            dlc,
            data: [0u8; MAX_FRAME_DATA],
        })
    }

    /// Number of meaningful payload bytes, capped at the buffer size.
    pub fn data_len(&self) -> usize {
        usize::from(self.dlc).min(MAX_FRAME_DATA)
    }

    /// Meaningful slice of the payload buffer.
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.data_len()]
    }
}

/// Interop with the `embedded-can` ecosystem so the bridge frame can feed
/// protocol layers written against the common trait.
impl embedded_can::Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        let (raw, extended) = split_id(id.into());
        CanFrame::new(raw, extended, data)
    }

    fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        if dlc > MAX_FRAME_DATA {
            return None;
        }
        let (raw, extended) = split_id(id.into());
        CanFrame::new_remote(raw, extended, dlc as u8)
    }

    fn is_extended(&self) -> bool {
        self.extended
    }

    fn is_remote_frame(&self) -> bool {
        self.rtr
    }

    fn id(&self) -> Id {
        if self.extended {
            match ExtendedId::new(self.id & MAX_EXTENDED_ID) {
                Some(id) => Id::Extended(id),
                None => Id::Extended(ExtendedId::ZERO),
            }
        } else {
            match StandardId::new((self.id & MAX_STANDARD_ID) as u16) {
                Some(id) => Id::Standard(id),
                None => Id::Standard(StandardId::ZERO),
            }
        }
    }

    fn dlc(&self) -> usize {
        self.data_len()
    }

    fn data(&self) -> &[u8] {
        self.payload()
    }
}

fn split_id(id: Id) -> (u32, bool) {
    match id {
        Id::Standard(id) => (u32::from(id.as_raw()), false),
        Id::Extended(id) => (id.as_raw(), true),
    }
}
