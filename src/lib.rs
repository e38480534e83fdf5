//! `usbcan-bridge` library: both sides of a USB to CAN bridge link in a
//! `no_std` environment. The crate exposes the shared wire codec, the
//! host-side transfer engine, the device-side endpoint multiplexer, the CAN
//! controller adapter, and the out-of-band control protocol.
#![no_std]
//==================================================================================
/// Domain and low-level errors (wire decoding, controller bring-up,
/// USB transport, control-request parsing).
pub mod error;
/// Infrastructure modules: the fixed-layout wire codec shared by both sides
/// of the link.
pub mod infra;
/// Bridge protocol implementation: transport types and traits, control
/// protocol, device-side multiplexer, host-side transfer engine.
pub mod protocol;
//==================================================================================
