//! RFID reader abstraction.
//!
//! One tagged variant covers the real pcProx USB-HID reader and a mock for
//! development machines. Both run a background worker that emits normalised
//! tag ids through a thread-safe callback and consumes queued LED feedback.

pub mod mock;
pub mod pcprox;

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Invoked from the reader worker thread for every accepted read. The
/// callback must be cheap; the engine's forwards the tag onto the event
/// loop and returns.
pub type TagCallback = Arc<dyn Fn(String) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedCommand {
    Success,
    Error,
}

/// Fire-and-forget LED feedback queue. Any thread may signal; the reader
/// worker consumes. Commands sent while no reader is listening vanish.
#[derive(Clone)]
pub struct LedHandle {
    tx: Sender<LedCommand>,
}

impl LedHandle {
    pub fn new(tx: Sender<LedCommand>) -> Self {
        Self { tx }
    }

    /// Green flash, ~500 ms.
    pub fn success(&self) {
        let _ = self.tx.send(LedCommand::Success);
    }

    /// Red blink, three times.
    pub fn error(&self) {
        let _ = self.tx.send(LedCommand::Error);
    }

    /// A handle wired to nothing, for contexts without a reader.
    pub fn disconnected() -> Self {
        let (tx, _rx) = std::sync::mpsc::channel();
        Self { tx }
    }
}

pub enum TagReader {
    Hardware(pcprox::PcProxReader),
    Mock(mock::MockReader),
}

impl TagReader {
    /// Open the USB reader, falling back to the mock when it is absent or
    /// when `use_mock` asks for it outright.
    pub fn open(on_tag: TagCallback, poll_interval: Duration, use_mock: bool) -> TagReader {
        if use_mock {
            return TagReader::Mock(mock::MockReader::new(on_tag));
        }
        match pcprox::PcProxReader::probe(on_tag.clone(), poll_interval) {
            Ok(reader) => TagReader::Hardware(reader),
            Err(e) => {
                warn!("RFID reader unavailable ({}), falling back to mock", e);
                TagReader::Mock(mock::MockReader::new(on_tag))
            }
        }
    }

    pub fn start(&mut self) {
        match self {
            TagReader::Hardware(r) => r.start(),
            TagReader::Mock(m) => m.start(),
        }
    }

    /// Signal the worker and join it. Queued LED commands are dropped.
    pub fn stop(&mut self) {
        match self {
            TagReader::Hardware(r) => r.stop(),
            TagReader::Mock(m) => m.stop(),
        }
    }

    pub fn feedback(&self) -> LedHandle {
        match self {
            TagReader::Hardware(r) => r.feedback(),
            TagReader::Mock(m) => m.feedback(),
        }
    }
}
