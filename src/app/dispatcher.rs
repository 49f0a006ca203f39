//! Single-threaded cooperative event loop.
//!
//! All scan handling, state mutation and Store access happens on the loop
//! thread. Foreign threads (the reader worker, timer wakeups) only ever
//! enqueue closures through a `Dispatcher` handle.

use std::cmp::{Ordering as CmpOrdering, Reverse};
use std::collections::BinaryHeap;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};
use tracing::debug;

use super::Engine;

pub type Task = Box<dyn FnOnce(&mut Engine, &Dispatcher) + Send>;

enum Msg {
    Task(Task),
    Schedule(Duration, Task),
    Stop,
}

/// Cloneable handle for posting work onto the loop from any thread.
#[derive(Clone)]
pub struct Dispatcher {
    tx: Sender<Msg>,
}

impl Dispatcher {
    /// Enqueue a task for execution on the loop thread. Tasks run to
    /// completion in posting order.
    pub fn post<F>(&self, task: F)
    where
        F: FnOnce(&mut Engine, &Dispatcher) + Send + 'static,
    {
        let _ = self.tx.send(Msg::Task(Box::new(task)));
    }

    /// One-shot timer: run `task` on the loop thread after `delay`.
    pub fn schedule_after<F>(&self, delay: Duration, task: F)
    where
        F: FnOnce(&mut Engine, &Dispatcher) + Send + 'static,
    {
        let _ = self.tx.send(Msg::Schedule(delay, Box::new(task)));
    }

    /// Ask the loop to exit after the tasks already queued.
    pub fn stop(&self) {
        let _ = self.tx.send(Msg::Stop);
    }
}

struct Timer {
    due: Instant,
    seq: u64,
    task: Task,
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}
impl Eq for Timer {}
impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}
impl Ord for Timer {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

pub struct EventLoop {
    rx: Receiver<Msg>,
    handle: Dispatcher,
    timers: BinaryHeap<Reverse<Timer>>,
    next_seq: u64,
}

impl EventLoop {
    pub fn new() -> (EventLoop, Dispatcher) {
        let (tx, rx) = mpsc::channel();
        let handle = Dispatcher { tx };
        (
            EventLoop {
                rx,
                handle: handle.clone(),
                timers: BinaryHeap::new(),
                next_seq: 0,
            },
            handle,
        )
    }

    /// Run until `stop()` or until every Dispatcher handle is gone. Timers
    /// fire between tasks, never concurrently with one.
    pub fn run(mut self, engine: &mut Engine) {
        loop {
            self.fire_due_timers(engine);

            let timeout = self
                .timers
                .peek()
                .map(|Reverse(t)| t.due.saturating_duration_since(Instant::now()));

            let msg = match timeout {
                Some(d) => match self.rx.recv_timeout(d) {
                    Ok(m) => Some(m),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => return,
                },
                None => match self.rx.recv() {
                    Ok(m) => Some(m),
                    Err(_) => return,
                },
            };

            match msg {
                Some(Msg::Task(task)) => task(engine, &self.handle),
                Some(Msg::Schedule(delay, task)) => {
                    self.next_seq += 1;
                    self.timers.push(Reverse(Timer {
                        due: Instant::now() + delay,
                        seq: self.next_seq,
                        task,
                    }));
                }
                Some(Msg::Stop) => {
                    debug!("event loop stopping");
                    return;
                }
                None => {} // timed out waiting; due timers fire on the next pass
            }
        }
    }

    fn fire_due_timers(&mut self, engine: &mut Engine) {
        loop {
            let due = match self.timers.peek() {
                Some(Reverse(t)) if t.due <= Instant::now() => true,
                _ => false,
            };
            if !due {
                return;
            }
            if let Some(Reverse(timer)) = self.timers.pop() {
                (timer.task)(engine, &self.handle);
            }
        }
    }
}
