//! RFIdeas pcProx USB-HID reader driver.
//!
//! The pcProx speaks 8-byte feature reports. The worker polls for tag data,
//! drains the LED feedback queue and reconnects with exponential backoff
//! when the device drops off the bus. Tag ids arrive little-endian and are
//! reported as uppercase big-endian hex.

use hidapi::{HidApi, HidDevice};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::errors::{AppError, AppResult};

use super::{LedCommand, LedHandle, TagCallback};

const VENDOR_ID: u16 = 0x0c27;
const PRODUCT_ID: u16 = 0x3bfa;

const RECONNECT_MIN: Duration = Duration::from_millis(250);
const RECONNECT_MAX: Duration = Duration::from_secs(5);

// Feature-report opcodes (report id 0 + command byte).
const CMD_READ_TAG: u8 = 0x8f;
const CMD_SET_LEDS: u8 = 0x83;
const CMD_HALT_KEYBOARD: u8 = 0x8c;

pub struct PcProxReader {
    on_tag: TagCallback,
    poll_interval: Duration,
    cmd_tx: Sender<LedCommand>,
    cmd_rx: Option<Receiver<LedCommand>>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl PcProxReader {
    /// Verify a reader is attached without holding it; the worker opens its
    /// own handle.
    pub fn probe(on_tag: TagCallback, poll_interval: Duration) -> AppResult<Self> {
        let api = HidApi::new().map_err(hid_err)?;
        let present = api
            .device_list()
            .any(|d| d.vendor_id() == VENDOR_ID && d.product_id() == PRODUCT_ID);
        if !present {
            return Err(AppError::Other("no pcProx reader attached".into()));
        }

        let (cmd_tx, cmd_rx) = channel();
        Ok(Self {
            on_tag,
            poll_interval,
            cmd_tx,
            cmd_rx: Some(cmd_rx),
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        })
    }

    pub fn start(&mut self) {
        let Some(cmd_rx) = self.cmd_rx.take() else {
            return; // already started
        };
        self.running.store(true, Ordering::SeqCst);

        let running = self.running.clone();
        let on_tag = self.on_tag.clone();
        let poll_interval = self.poll_interval;
        self.worker = Some(thread::spawn(move || {
            worker_loop(running, on_tag, poll_interval, cmd_rx);
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
}

fn worker_loop(
    running: Arc<AtomicBool>,
    on_tag: TagCallback,
    poll_interval: Duration,
    cmd_rx: Receiver<LedCommand>,
) {
    let mut device: Option<HidDevice> = None;
    let mut last_tag: Option<String> = None;
    let mut backoff = RECONNECT_MIN;

    while running.load(Ordering::SeqCst) {
        // 1. Connection phase
        if device.is_none() {
            match open_reader() {
                Ok(dev) => {
                    info!("connected to pcProx reader");
                    device = Some(dev);
                    backoff = RECONNECT_MIN;
                }
                Err(e) => {
                    debug!("reader open failed: {}", e);
                    thread::sleep(backoff);
                    backoff = (backoff * 2).min(RECONNECT_MAX);
                    continue;
                }
            }
        }
        let Some(dev) = device.as_ref() else {
            continue;
        };

        // 2. Feedback phase: drain queued LED commands
        let mut device_lost = false;
        loop {
            match cmd_rx.try_recv() {
                Ok(cmd) => {
                    if let Err(e) = run_led_command(dev, cmd) {
                        warn!("LED feedback failed: {}", e);
                        device_lost = true;
                        break;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if device_lost {
            device = None;
            continue;
        }

        // 3. Polling phase. Suppress immediate repeats: the same tag held on
        // the pad only fires once until a null read intervenes.
        match read_tag(dev) {
            Ok(Some(tag)) => {
                if last_tag.as_deref() != Some(tag.as_str()) {
                    last_tag = Some(tag.clone());
                    on_tag(tag);
                }
            }
            Ok(None) => last_tag = None,
            Err(e) => {
                warn!("tag read failed: {}", e);
                device = None;
                thread::sleep(backoff);
                backoff = (backoff * 2).min(RECONNECT_MAX);
                continue;
            }
        }

        thread::sleep(poll_interval);
    }

    // Hand the LEDs back on exit, best effort.
    if let Some(dev) = device.as_ref() {
        let _ = set_leds(dev, false, false);
    }
}

fn open_reader() -> AppResult<HidDevice> {
    let api = HidApi::new().map_err(hid_err)?;
    let dev = api.open(VENDOR_ID, PRODUCT_ID).map_err(hid_err)?;

    // The reader ships configured as a keyboard wedge that types tag ids
    // into whatever has focus. Halt that; we poll instead and drive the
    // LEDs ourselves.
    dev.send_feature_report(&[0x00, CMD_HALT_KEYBOARD, 0x01, 0, 0, 0, 0, 0, 0])
        .map_err(hid_err)?;
    set_leds(&dev, true, false)?; // red on = ready

    Ok(dev)
}

/// Ask for the last read. Reply: byte 0 report id, byte 1 bit count (0 when
/// no card is present), bytes 2.. tag data little-endian.
fn read_tag(dev: &HidDevice) -> AppResult<Option<String>> {
    dev.send_feature_report(&[0x00, CMD_READ_TAG, 0, 0, 0, 0, 0, 0, 0])
        .map_err(hid_err)?;

    let mut buf = [0u8; 9];
    let n = dev.get_feature_report(&mut buf).map_err(hid_err)?;
    if n < 3 {
        return Ok(None);
    }

    let bits = buf[1] as usize;
    if bits == 0 {
        return Ok(None);
    }

    let byte_len = bits.div_ceil(8).min(n - 2);
    let data = &buf[2..2 + byte_len];

    // Big-endian conversion: the wire order is least significant byte first.
    let mut hex = String::with_capacity(byte_len * 2);
    for b in data.iter().rev() {
        hex.push_str(&format!("{:02X}", b));
    }
    Ok(Some(hex))
}

fn set_leds(dev: &HidDevice, red: bool, green: bool) -> AppResult<()> {
    let mut flags = 0u8;
    if red {
        flags |= 0x01;
    }
    if green {
        flags |= 0x02;
    }
    dev.send_feature_report(&[0x00, CMD_SET_LEDS, flags, 0, 0, 0, 0, 0, 0])
        .map_err(hid_err)?;
    Ok(())
}

fn run_led_command(dev: &HidDevice, cmd: LedCommand) -> AppResult<()> {
    match cmd {
        LedCommand::Success => {
            // Green flash, then back to ready (red).
            set_leds(dev, false, true)?;
            thread::sleep(Duration::from_millis(500));
            set_leds(dev, true, false)
        }
        LedCommand::Error => {
            for _ in 0..3 {
                set_leds(dev, false, false)?;
                thread::sleep(Duration::from_millis(100));
                set_leds(dev, true, false)?;
                thread::sleep(Duration::from_millis(100));
            }
            Ok(())
        }
    }
}

fn hid_err(e: hidapi::HidError) -> AppError {
    AppError::Other(format!("HID: {}", e))
}
