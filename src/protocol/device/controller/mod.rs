//! State machine layered over the register-level CAN controller
//! primitives: arming/disarming the bus, bit-timing programming, and the
//! per-frame transmit/receive operations.
use crate::error::ControllerError;
use crate::protocol::transport::frame::CanFrame;
use crate::protocol::transport::timing::{BitTiming, RegisterTiming};
use crate::protocol::transport::traits::can_controller::CanController;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Bus state of the adapter. There are no intermediate states.
pub enum BusState {
    Disabled,
    Enabled,
}

/// Adapter owning the physical controller and its bus state.
///
/// The adapter remembers the last bit timing it was given (zero-based
/// register fields) so the bus can be re-armed without renegotiation.
pub struct ControllerAdapter<C: CanController> {
    pub(super) controller: C,
    state: BusState,
    timing: RegisterTiming,
}

impl<C: CanController> ControllerAdapter<C> {
    /// Wrap a controller, starting disabled with the given default timing.
    pub fn new(controller: C, default_timing: &BitTiming) -> Self {
        Self {
            controller,
            state: BusState::Disabled,
            timing: default_timing.register_fields(),
        }
    }

    /// Current bus state.
    pub fn state(&self) -> BusState {
        self.state
    }

    /// Whether the bus is armed.
    pub fn is_enabled(&self) -> bool {
        self.state == BusState::Enabled
    }

    /// Arm the bus: reset, program timing, install the catch-all filter,
    /// enable the receive interrupt, and attempt bus-on.
    ///
    /// Re-entering while already enabled implicitly disables first (the
    /// reset at the top of the sequence) and re-initializes. On
    /// [`ControllerError::InitFailed`] the bus stays disabled.
    pub fn enable(&mut self) -> Result<(), ControllerError> {
        self.controller.reset();
        self.state = BusState::Disabled;

        self.controller.apply_timing(&self.timing);
        self.controller.set_filter_accept_all();
        self.controller.enable_rx_interrupt();
        self.controller.start()?;

        self.state = BusState::Enabled;
        #[cfg(feature = "defmt")]
        defmt::info!("CAN bus enabled");
        Ok(())
    }

    /// Disarm the bus. Idempotent: a no-op success when already disabled.
    pub fn disable(&mut self) {
        if self.state == BusState::Disabled {
            return;
        }
        self.controller.reset();
        self.state = BusState::Disabled;
        #[cfg(feature = "defmt")]
        defmt::info!("CAN bus disabled");
    }

    /// Store a new bit timing. When the bus is armed, it is re-armed with
    /// the new values (reset semantics, same as a fresh enable); otherwise
    /// the timing is only remembered for the next enable.
    pub fn set_timing(&mut self, timing: RegisterTiming) -> Result<(), ControllerError> {
        self.timing = timing;
        if self.is_enabled() {
            self.enable()
        } else {
            Ok(())
        }
    }

    /// Submit one frame to the transmit mailbox. At most one attempt;
    /// [`ControllerError::Busy`] means the frame is lost.
    pub fn transmit(&mut self, frame: &CanFrame) -> Result<(), ControllerError> {
        self.controller.try_transmit(frame)
    }

    /// Read one frame from the hardware FIFO. Interrupt context only.
    pub fn receive(&mut self) -> CanFrame {
        self.controller.read_rx_fifo()
    }
}
