//! Bridge transport layer: CAN frame and bit-timing representations,
//! platform abstraction traits, and link timing constants.
//!
//! ## Link Timing Constants
//!
//! These constants bound the host-side paths that may not wait forever.
//! The receive path deliberately carries no timeout: it stays armed for
//! the whole life of the link.

pub mod frame;
pub mod timing;
pub mod traits;

/// Size of the host-side transfer buffer, matching the bulk endpoint's
/// maximum packet size. One buffer per link, reused for every transfer.
pub const TRANSFER_BUFFER_LEN: usize = 64;

/// Timeout for one bulk OUT transfer (ms).
///
/// The send path blocks its caller until the device accepts the packet, so
/// a wedged or saturated device must not hang the caller indefinitely. A
/// full 13-byte packet leaves a full-speed bulk pipe in well under a
/// millisecond; seconds of budget only ever expire on a broken link.
pub const BULK_OUT_TIMEOUT_MS: u32 = 5_000;

/// Timeout for one administrative control transfer (ms).
///
/// Control requests (bus on/off, set bit timing) are short and answered by
/// firmware without touching the CAN bus, so a second is already generous.
pub const CONTROL_TIMEOUT_MS: u32 = 1_000;
