//! Host-side transfer engine: a perpetually armed bulk IN receive pump and
//! a timeout-bounded send path over one cloneable transport handle.
//!
//! [`UsbCanLink::open`] arms the bus (enable-bus control request) and then
//! splits into two halves:
//!
//! * [`LinkHandle`] — outbound traffic: `send`, `set_bit_timing`, `close`;
//! * [`RxPump`] — the receive loop, owning the single 64-byte transfer
//!   buffer. Drive it from a dedicated task *before* relying on inbound
//!   traffic; every iteration re-arms the read immediately, so exactly one
//!   receive operation is outstanding for the life of the link.
//!
//! The pump terminates on the shutdown signal raised by `close`, or
//! permanently on device detach. The transfer buffer is released only when
//! the pump future completes, never while a read is in flight.
use core::fmt::Debug;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use futures_util::future::{select, Either};
use futures_util::{pin_mut, Future};

use crate::error::TransportError;
use crate::infra::codec::{
    decode_frame, encode_bit_timing_into, encode_frame_into, BIT_TIMING_WIRE_LEN, WIRE_FRAME_LEN,
};
use crate::protocol::control::{on_off_value, REQUEST_ON_OFF_BUS, REQUEST_SET_BITTIMING};
use crate::protocol::transport::frame::CanFrame;
use crate::protocol::transport::timing::BitTiming;
use crate::protocol::transport::traits::bridge_timer::BridgeTimer;
use crate::protocol::transport::traits::frame_sink::FrameSink;
use crate::protocol::transport::traits::usb_transport::UsbHostTransport;
use crate::protocol::transport::{
    BULK_OUT_TIMEOUT_MS, CONTROL_TIMEOUT_MS, TRANSFER_BUFFER_LEN,
};

/// Shutdown hand-off between [`LinkHandle::close`] and [`RxPump::run`].
/// Provided by the caller so the library performs no allocation.
pub type ShutdownSignal = Signal<CriticalSectionRawMutex, ()>;

/// An opened link, ready to be split into its two halves.
pub struct UsbCanLink<'a, U, T>
where
    U: UsbHostTransport + Clone,
    T: BridgeTimer,
{
    transport: U,
    timer: T,
    shutdown: &'a ShutdownSignal,
}

impl<'a, U, T> UsbCanLink<'a, U, T>
where
    U: UsbHostTransport + Clone,
    T: BridgeTimer,
{
    /// Open the link: issue the enable-bus request (bounded by the control
    /// timeout) before anything is armed. When the request fails, open
    /// fails and no receive operation is ever started.
    pub async fn open(
        transport: U,
        mut timer: T,
        shutdown: &'a ShutdownSignal,
    ) -> Result<Self, TransportError<U::Error>> {
        shutdown.reset();
        {
            let enable = transport.control_out(REQUEST_ON_OFF_BUS, on_off_value(true), &[]);
            with_deadline(&mut timer, CONTROL_TIMEOUT_MS, enable).await?;
        }
        #[cfg(feature = "defmt")]
        defmt::info!("link open, bus enabled");
        Ok(Self {
            transport,
            timer,
            shutdown,
        })
    }

    /// Split into the outbound handle and the receive pump.
    pub fn split(self) -> (LinkHandle<'a, U, T>, RxPump<'a, U>) {
        let pump = RxPump {
            transport: self.transport.clone(),
            shutdown: self.shutdown,
            buffer: [0u8; TRANSFER_BUFFER_LEN],
        };
        let handle = LinkHandle {
            transport: self.transport,
            timer: self.timer,
            shutdown: self.shutdown,
        };
        (handle, pump)
    }
}

/// Outbound half of the link: frame sends and administrative requests.
///
/// Calls serialize on the handle itself; the design assumes one sender at
/// a time per link and no interleaving of sends with teardown.
pub struct LinkHandle<'a, U, T>
where
    U: UsbHostTransport,
    T: BridgeTimer,
{
    transport: U,
    timer: T,
    shutdown: &'a ShutdownSignal,
}

impl<'a, U, T> LinkHandle<'a, U, T>
where
    U: UsbHostTransport,
    T: BridgeTimer,
{
    /// Send one CAN frame on the bulk OUT pipe, blocking the caller until
    /// completion or timeout. No retry: a failed send is reported and the
    /// frame is gone.
    pub async fn send(&mut self, frame: &CanFrame) -> Result<(), TransportError<U::Error>> {
        let mut packet = [0u8; WIRE_FRAME_LEN];
        encode_frame_into(&mut packet, frame);
        let write = self.transport.bulk_out(&packet);
        with_deadline(&mut self.timer, BULK_OUT_TIMEOUT_MS, write).await
    }

    /// Program new bit timing on the device (wire fields are the zero-based
    /// register encoding). Frame traffic should not be relied upon while
    /// the bus reconfigures.
    pub async fn set_bit_timing(
        &mut self,
        timing: &BitTiming,
    ) -> Result<(), TransportError<U::Error>> {
        let mut payload = [0u8; BIT_TIMING_WIRE_LEN];
        encode_bit_timing_into(&mut payload, timing);
        let request = self.transport.control_out(REQUEST_SET_BITTIMING, 0, &payload);
        with_deadline(&mut self.timer, CONTROL_TIMEOUT_MS, request).await
    }

    /// Close the link: issue the disable-bus request, then stop the pump.
    ///
    /// The caller should await the pump task afterwards; the transfer
    /// buffer lives inside the pump and is released when its future
    /// completes, never while a read is still in flight.
    pub async fn close(mut self) -> Result<(), TransportError<U::Error>> {
        let disable = self.transport.control_out(REQUEST_ON_OFF_BUS, on_off_value(false), &[]);
        let result = with_deadline(&mut self.timer, CONTROL_TIMEOUT_MS, disable).await;
        self.shutdown.signal(());
        #[cfg(feature = "defmt")]
        defmt::info!("link closed");
        result
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Why the receive pump stopped.
pub enum PumpExit {
    /// Orderly shutdown requested through the link handle.
    Closed,
    /// The device left the bus; the receive path was not re-armed.
    Detached,
}

/// Receive half of the link: one buffer, one outstanding read, automatic
/// re-arm on every completion.
pub struct RxPump<'a, U>
where
    U: UsbHostTransport,
{
    transport: U,
    shutdown: &'a ShutdownSignal,
    buffer: [u8; TRANSFER_BUFFER_LEN],
}

impl<'a, U> RxPump<'a, U>
where
    U: UsbHostTransport,
{
    /// Drive the receive loop until shutdown or detach.
    ///
    /// Each completed transfer is decoded and handed to `sink`; the read
    /// is re-armed immediately afterwards, on the same buffer, with no
    /// allocation on the steady-state path. Malformed packets and
    /// transient transport errors drop silently and re-arm; only detach
    /// short-circuits resubmission permanently.
    pub async fn run<S: FrameSink>(mut self, sink: &mut S) -> PumpExit {
        loop {
            let completion;
            {
                let read = self.transport.bulk_in(&mut self.buffer);
                let stop = self.shutdown.wait();
                pin_mut!(read, stop);
                match select(read, stop).await {
                    Either::Left((result, pending_stop)) => {
                        completion = Some(result);
                        drop(pending_stop);
                    }
                    Either::Right(((), pending_read)) => {
                        // Cancelling the in-flight read here is what allows
                        // the buffer to be released when the pump returns.
                        completion = None;
                        drop(pending_read);
                    }
                }
            }

            let result = match completion {
                Some(result) => result,
                None => {
                    #[cfg(feature = "defmt")]
                    defmt::info!("receive pump stopped");
                    return PumpExit::Closed;
                }
            };

            match result {
                Ok(len) => match decode_frame(&self.buffer[..len]) {
                    Ok(frame) => sink.deliver(frame),
                    Err(_) => {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("malformed inbound packet dropped");
                    }
                },
                Err(TransportError::Detached) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("device detached, halting receive path");
                    sink.detached();
                    return PumpExit::Detached;
                }
                Err(_) => {
                    // Transient transport failure: keep the receive path
                    // armed, the next completion decides.
                    #[cfg(feature = "defmt")]
                    defmt::warn!("inbound transfer failed, re-arming");
                }
            }
        }
    }
}

/// Race a transfer against the timer; the loser is dropped.
async fn with_deadline<T, F, O, E>(
    timer: &mut T,
    millis: u32,
    transfer: F,
) -> Result<O, TransportError<E>>
where
    T: BridgeTimer,
    E: Debug,
    F: Future<Output = Result<O, TransportError<E>>>,
{
    let deadline = timer.delay_ms(millis);
    pin_mut!(transfer, deadline);
    match select(transfer, deadline).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(TransportError::Timeout),
    }
}
