//! CAN bit-timing descriptors: the one-based abstract model negotiated on
//! the host, and the zero-based encoding carried on the wire and written
//! into the controller registers.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Abstract bit timing, every field expressed in time-quantum units.
///
/// All fields are one-based: a `sjw` of 1 means one time quantum. The wire
/// and register encodings subtract one from each field because the
/// underlying controller registers are zero-based.
pub struct BitTiming {
    /// Baud-rate prescaler.
    pub brp: u32,
    /// Phase segment 1 length.
    pub phase_seg1: u8,
    /// Phase segment 2 length.
    pub phase_seg2: u8,
    /// Synchronization jump width.
    pub sjw: u8,
}

impl BitTiming {
    /// Convert to the zero-based register encoding (each field minus one).
    ///
    /// Fields are expected to be ≥ 1; a zero field saturates rather than
    /// wrapping. No range validation is performed beyond that: the
    /// controller's bus-on attempt is the safety net.
    pub fn register_fields(&self) -> RegisterTiming {
        RegisterTiming {
            brp: self.brp.saturating_sub(1),
            phase_seg1: self.phase_seg1.saturating_sub(1),
            phase_seg2: self.phase_seg2.saturating_sub(1),
            sjw: self.sjw.saturating_sub(1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Zero-based bit timing exactly as carried on the wire and programmed
/// into the controller registers.
pub struct RegisterTiming {
    pub brp: u32,
    pub phase_seg1: u8,
    pub phase_seg2: u8,
    pub sjw: u8,
}

impl RegisterTiming {
    /// Recover the one-based abstract descriptor (each field plus one).
    pub fn abstract_timing(&self) -> BitTiming {
        BitTiming {
            brp: self.brp.saturating_add(1),
            phase_seg1: self.phase_seg1.saturating_add(1),
            phase_seg2: self.phase_seg2.saturating_add(1),
            sjw: self.sjw.saturating_add(1),
        }
    }
}
