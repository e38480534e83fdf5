//! Abstraction seams toward the surrounding platform: the register-level
//! CAN controller and USB endpoint primitives on the device side, the
//! asynchronous USB transport and timer on the host side, and the upward
//! frame consumer.
pub mod bridge_timer;
pub mod bulk_in_pipe;
pub mod can_controller;
pub mod frame_sink;
pub mod usb_transport;
