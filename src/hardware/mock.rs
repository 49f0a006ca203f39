//! Mock reader for development machines and tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::info;

use super::{LedCommand, LedHandle, TagCallback};

pub struct MockReader {
    on_tag: TagCallback,
    cmd_tx: Sender<LedCommand>,
    cmd_rx: Option<Receiver<LedCommand>>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl MockReader {
    pub fn new(on_tag: TagCallback) -> Self {
        let (cmd_tx, cmd_rx) = channel();
        Self {
            on_tag,
            cmd_tx,
            cmd_rx: Some(cmd_rx),
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// The mock's worker only exists to consume LED feedback, so the queue
    /// behaves like the real one.
    pub fn start(&mut self) {
        let Some(cmd_rx) = self.cmd_rx.take() else {
            return; // already started
        };
        self.running.store(true, Ordering::SeqCst);

        let running = self.running.clone();
        self.worker = Some(thread::spawn(move || {
            info!("started mock RFID reader");
            while running.load(Ordering::SeqCst) {
                match cmd_rx.recv_timeout(Duration::from_millis(100)) {
                    Ok(LedCommand::Success) => info!("mock feedback: SUCCESS"),
                    Ok(LedCommand::Error) => info!("mock feedback: ERROR"),
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }

    pub fn feedback(&self) -> LedHandle {
        LedHandle::new(self.cmd_tx.clone())
    }

    /// Drive the scan path without hardware.
    pub fn simulate_scan(&self, tag_id: &str) {
        info!(tag = tag_id, "simulating scan");
        (self.on_tag)(tag_id.to_string());
    }
}
