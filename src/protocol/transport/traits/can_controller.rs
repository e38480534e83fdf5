//! Register-level CAN controller primitives, treated as given by the
//! device platform. The state machine layered on top lives in
//! [`ControllerAdapter`](crate::protocol::device::controller::ControllerAdapter).
use crate::error::ControllerError;
use crate::protocol::transport::frame::CanFrame;
use crate::protocol::transport::timing::RegisterTiming;

/// Contract for a physical CAN controller.
///
/// All operations are synchronous and non-blocking; `try_transmit` and
/// `read_rx_fifo` may be called from interrupt context.
pub trait CanController {
    /// Stop the controller and return it to its reset state.
    fn reset(&mut self);

    /// Program the bit-timing registers from the zero-based encoding.
    fn apply_timing(&mut self, timing: &RegisterTiming);

    /// Install a catch-all receive filter: every identifier matches, no
    /// mask restriction.
    fn set_filter_accept_all(&mut self);

    /// Enable the receive-interrupt source.
    fn enable_rx_interrupt(&mut self);

    /// Leave reset and attempt to reach bus-on state.
    ///
    /// Returns [`ControllerError::InitFailed`] when the hardware reports
    /// failure.
    fn start(&mut self) -> Result<(), ControllerError>;

    /// Submit one frame to a free transmit mailbox.
    ///
    /// Returns [`ControllerError::Busy`] when no mailbox is free; the
    /// caller drops the frame rather than queuing.
    fn try_transmit(&mut self, frame: &CanFrame) -> Result<(), ControllerError>;

    /// Read exactly one frame from the hardware FIFO and release the slot.
    ///
    /// Only called from the receive-interrupt context, promptly after the
    /// interrupt fires. FIFO overrun shows up as silently dropped frames,
    /// not as an error return.
    fn read_rx_fifo(&mut self) -> CanFrame;
}
