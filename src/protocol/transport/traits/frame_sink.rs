//! Upward consumer of frames delivered by the host-side receive pump.
use crate::protocol::transport::frame::CanFrame;

/// Receives decoded frames and the terminal detach notification.
///
/// Both methods are called from the receive pump between transfer
/// completions and must not block: the pump re-arms the receive path as
/// soon as they return.
pub trait FrameSink {
    /// One CAN frame arrived from the bus.
    fn deliver(&mut self, frame: CanFrame);

    /// The device left the bus; no further frames will be delivered.
    fn detached(&mut self);
}
