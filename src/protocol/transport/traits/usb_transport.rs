//! Minimal abstraction for the host side of the USB link. Allows the
//! transfer engine to plug into various implementations (libusb-style
//! desktop stacks, kernel shims, test doubles).
use crate::error::TransportError;
use futures_util::Future;

/// Contract for the three logical pipes of one bridge device.
///
/// Methods take `&self` because real host stacks allow concurrent transfer
/// submission on one device handle; implementations carry their own
/// interior synchronisation. The engine clones the transport to give the
/// receive pump and the send path independent halves.
///
/// No timeout is applied here: the engine bounds the send and control
/// paths itself, and the receive path is armed indefinitely.
pub trait UsbHostTransport {
    type Error: core::fmt::Debug;

    /// Issue a vendor control request directed at the bridge interface.
    fn control_out<'a>(
        &'a self,
        request: u8,
        value: u16,
        data: &'a [u8],
    ) -> impl Future<Output = Result<(), TransportError<Self::Error>>> + 'a;

    /// Write one packet on the bulk OUT endpoint.
    fn bulk_out<'a>(
        &'a self,
        data: &'a [u8],
    ) -> impl Future<Output = Result<(), TransportError<Self::Error>>> + 'a;

    /// Arm one read on the bulk IN endpoint into the caller's buffer.
    ///
    /// Resolves with the transfer length once the device sends a packet.
    /// The buffer is exclusively owned by the transport until then.
    fn bulk_in<'a>(
        &'a self,
        buf: &'a mut [u8],
    ) -> impl Future<Output = Result<usize, TransportError<Self::Error>>> + 'a;
}
