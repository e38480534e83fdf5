//! Non-blocking write primitive for the device's bulk IN endpoint.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// The endpoint still holds a previous packet; the write did not happen.
pub struct EndpointBusy;

/// Contract for the device-side bulk IN endpoint.
///
/// `try_write` is called from the CAN receive-interrupt context and must
/// never block: on a busy endpoint the packet is dropped, which is the
/// single-slot hand-off that bounds interrupt latency.
pub trait BulkInPipe {
    /// Hand one packet to the endpoint, or fail immediately when the
    /// previous packet has not been collected by the host yet.
    fn try_write(&mut self, packet: &[u8]) -> Result<(), EndpointBusy>;
}
