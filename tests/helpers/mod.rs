//! Test doubles to simulate the USB transport and timer during
//! integration tests.
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

use usbcan_bridge::error::TransportError;
use usbcan_bridge::protocol::transport::frame::CanFrame;
use usbcan_bridge::protocol::transport::traits::bridge_timer::BridgeTimer;
use usbcan_bridge::protocol::transport::traits::frame_sink::FrameSink;
use usbcan_bridge::protocol::transport::traits::usb_transport::UsbHostTransport;

/// One recorded control request: opcode, wValue, data stage.
pub type ControlRecord = (u8, u16, Vec<u8>);

#[derive(Clone, Debug)]
#[allow(dead_code)]
/// Something the device pushes toward the host on the bulk IN pipe.
pub enum InboundEvent {
    /// A packet completing the outstanding read.
    Packet(Vec<u8>),
    /// The device left the bus mid-read.
    Detach,
    /// A transient transport failure on the read.
    Error,
}

/// In-memory USB device reproducing the `UsbHostTransport` behavior:
/// control and bulk OUT transfers are recorded, bulk IN reads complete
/// from an event queue fed by the test.
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<TransportInner>,
}

struct TransportInner {
    control_log: Mutex<Vec<ControlRecord>>,
    bulk_out_log: Mutex<Vec<Vec<u8>>>,
    fail_control: AtomicBool,
    stall_bulk_out: AtomicBool,
    bulk_in_submissions: AtomicUsize,
    inbound_tx: mpsc::UnboundedSender<InboundEvent>,
    inbound_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<InboundEvent>>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        Self {
            inner: Arc::new(TransportInner {
                control_log: Mutex::new(Vec::new()),
                bulk_out_log: Mutex::new(Vec::new()),
                fail_control: AtomicBool::new(false),
                stall_bulk_out: AtomicBool::new(false),
                bulk_in_submissions: AtomicUsize::new(0),
                inbound_tx,
                inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            }),
        }
    }

    /// Make every subsequent control request fail with an I/O error.
    pub fn fail_control(&self) {
        self.inner.fail_control.store(true, Ordering::SeqCst);
    }

    /// Make every subsequent bulk OUT transfer hang forever.
    pub fn stall_bulk_out(&self) {
        self.inner.stall_bulk_out.store(true, Ordering::SeqCst);
    }

    /// Complete the outstanding (or next) bulk IN read with this event.
    pub fn push_inbound(&self, event: InboundEvent) {
        self.inner.inbound_tx.send(event).expect("pump gone");
    }

    /// Recorded control requests, in issue order.
    pub fn control_log(&self) -> Vec<ControlRecord> {
        self.inner.control_log.lock().unwrap().clone()
    }

    /// Recorded bulk OUT packets, in issue order.
    pub fn bulk_out_log(&self) -> Vec<Vec<u8>> {
        self.inner.bulk_out_log.lock().unwrap().clone()
    }

    /// How many bulk IN reads were armed so far.
    pub fn bulk_in_submissions(&self) -> usize {
        self.inner.bulk_in_submissions.load(Ordering::SeqCst)
    }
}

impl UsbHostTransport for MockTransport {
    type Error = &'static str;

    fn control_out<'a>(
        &'a self,
        request: u8,
        value: u16,
        data: &'a [u8],
    ) -> impl std::future::Future<Output = Result<(), TransportError<&'static str>>> + 'a {
        async move {
            if self.inner.fail_control.load(Ordering::SeqCst) {
                return Err(TransportError::Io("control request refused"));
            }
            self.inner
                .control_log
                .lock()
                .unwrap()
                .push((request, value, data.to_vec()));
            Ok(())
        }
    }

    fn bulk_out<'a>(
        &'a self,
        data: &'a [u8],
    ) -> impl std::future::Future<Output = Result<(), TransportError<&'static str>>> + 'a {
        async move {
            if self.inner.stall_bulk_out.load(Ordering::SeqCst) {
                futures_util::future::pending::<()>().await;
            }
            self.inner.bulk_out_log.lock().unwrap().push(data.to_vec());
            Ok(())
        }
    }

    fn bulk_in<'a>(
        &'a self,
        buf: &'a mut [u8],
    ) -> impl std::future::Future<Output = Result<usize, TransportError<&'static str>>> + 'a {
        async move {
            self.inner.bulk_in_submissions.fetch_add(1, Ordering::SeqCst);
            let mut inbound = self.inner.inbound_rx.lock().await;
            match inbound.recv().await {
                Some(InboundEvent::Packet(packet)) => {
                    let len = packet.len().min(buf.len());
                    buf[..len].copy_from_slice(&packet[..len]);
                    Ok(len)
                }
                Some(InboundEvent::Detach) => Err(TransportError::Detached),
                Some(InboundEvent::Error) => Err(TransportError::Io("transfer failed")),
                // Feeder gone: emulate an idle bus, the read stays armed.
                None => futures_util::future::pending().await,
            }
        }
    }
}

#[allow(dead_code)]
/// Timer based on `tokio::time::sleep` to drive timeouts in tests.
pub struct MockTimer;

impl BridgeTimer for MockTimer {
    async fn delay_ms(&mut self, millis: u32) {
        sleep(Duration::from_millis(millis as u64)).await;
    }
}

#[derive(Clone)]
#[allow(dead_code)]
/// Sink collecting delivered frames and the detach notification.
pub struct CollectSink {
    frames: Arc<Mutex<Vec<CanFrame>>>,
    detached: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl CollectSink {
    pub fn new() -> Self {
        Self {
            frames: Arc::new(Mutex::new(Vec::new())),
            detached: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn frames(&self) -> Vec<CanFrame> {
        self.frames.lock().unwrap().clone()
    }

    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }

    /// Poll until `count` frames arrived or the deadline expires.
    pub async fn wait_for_frames(&self, count: usize) {
        for _ in 0..200 {
            if self.frames.lock().unwrap().len() >= count {
                return;
            }
            sleep(Duration::from_millis(5)).await;
        }
        panic!("expected {count} frames, got {}", self.frames.lock().unwrap().len());
    }
}

impl FrameSink for CollectSink {
    fn deliver(&mut self, frame: CanFrame) {
        self.frames.lock().unwrap().push(frame);
    }

    fn detached(&mut self) {
        self.detached.store(true, Ordering::SeqCst);
    }
}
