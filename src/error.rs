//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (wire decoding, controller
//! bring-up, USB transport, control-request parsing).
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised while decoding a wire message.
pub enum DecodeError {
    /// Fewer bytes were available than the fixed wire layout requires.
    #[error("Truncated wire message")]
    Truncated,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors reported by the CAN controller adapter.
pub enum ControllerError {
    /// The controller could not reach bus-on state; the bus stays disabled.
    #[error("Controller initialisation failed")]
    InitFailed,

    /// No transmit mailbox is free. The frame is dropped, never queued.
    #[error("Transmit mailbox busy")]
    Busy,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Host-side USB transport failures.
pub enum TransportError<E: core::fmt::Debug> {
    /// The bounded send or control transfer did not complete in time.
    #[error("Transfer timed out")]
    Timeout,

    /// The device left the bus. Terminal for the link: the receive path
    /// must not be re-armed once this is observed.
    #[error("Device detached")]
    Detached,

    /// Generic I/O failure propagated from the transport implementation.
    #[error("Transport I/O error: {0:?}")]
    Io(E),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Reasons a control request is not handled by the bridge protocol.
///
/// Any of these signals the caller to fall back to standard USB request
/// handling (typically a protocol stall).
pub enum ControlError {
    /// The request is not a vendor request directed at the bridge interface.
    #[error("Not a vendor interface request")]
    NotVendorScoped,

    /// The opcode is not part of the bridge protocol.
    #[error("Unknown request opcode {opcode}")]
    UnknownRequest { opcode: u8 },

    /// The data stage is too short to carry the expected payload.
    #[error("Short control payload")]
    ShortPayload,
}
