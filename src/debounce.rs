//! Trailing-Edge Debouncer
//!
//! A timer plus a pending-call slot. Every `call` replaces the pending
//! arguments and re-arms the timer; when the delay elapses without another
//! call, the callback runs once with the last arguments and the slot clears.

use futures::future::{BoxFuture, FutureExt};
use log::trace;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

type Callback<A> = Arc<dyn Fn(A) -> BoxFuture<'static, ()> + Send + Sync>;

struct Slot<A> {
    pending: Option<A>,
    timer: Option<JoinHandle<()>>,
    /// Task whose callback is in flight, with the generation that fired it
    running: Option<(u64, JoinHandle<()>)>,
    generation: u64,
}

/// Coalesces bursts of calls into a single trailing invocation
pub struct Debouncer<A> {
    name: &'static str,
    delay: Duration,
    callback: Callback<A>,
    slot: Arc<Mutex<Slot<A>>>,
}

impl<A: Send + 'static> Debouncer<A> {
    pub fn new<F, Fut>(name: &'static str, delay: Duration, callback: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            name,
            delay,
            callback: Arc::new(move |args: A| callback(args).boxed()),
            slot: Arc::new(Mutex::new(Slot {
                pending: None,
                timer: None,
                running: None,
                generation: 0,
            })),
        }
    }

    /// Schedule the callback, superseding any call still waiting. A callback
    /// already in flight keeps running. Must run inside a tokio runtime.
    pub fn call(&self, args: A) {
        let mut slot = self.slot.lock();
        if let Some(timer) = slot.timer.take() {
            timer.abort();
            trace!("{}: superseding pending call", self.name);
        }
        slot.pending = Some(args);
        slot.generation += 1;

        let generation = slot.generation;
        let shared = Arc::clone(&self.slot);
        let callback = Arc::clone(&self.callback);
        let delay = self.delay;
        let name = self.name;

        slot.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let args = {
                let mut slot = shared.lock();
                if slot.generation != generation {
                    return;
                }
                slot.running = slot.timer.take().map(|handle| (generation, handle));
                slot.pending.take()
            };
            if let Some(args) = args {
                trace!("{}: firing", name);
                callback(args).await;
            }
            let mut slot = shared.lock();
            if matches!(slot.running, Some((fired, _)) if fired == generation) {
                slot.running = None;
            }
        }));
    }

    /// Whether a call is waiting for its timer
    pub fn is_pending(&self) -> bool {
        self.slot.lock().pending.is_some()
    }

    /// Drop the pending call, if any, and abort a callback in flight
    pub fn cancel(&self) {
        let mut slot = self.slot.lock();
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        if let Some((_, running)) = slot.running.take() {
            running.abort();
            trace!("{}: running callback aborted", self.name);
        }
        if slot.pending.take().is_some() {
            trace!("{}: pending call cancelled", self.name);
        }
        slot.generation += 1;
    }

    /// Run the pending call now instead of waiting for the timer
    pub async fn flush(&self) {
        let args = {
            let mut slot = self.slot.lock();
            if let Some(timer) = slot.timer.take() {
                timer.abort();
            }
            slot.generation += 1;
            slot.pending.take()
        };
        if let Some(args) = args {
            (self.callback)(args).await;
        }
    }
}

impl<A> Drop for Debouncer<A> {
    fn drop(&mut self) {
        let mut slot = self.slot.lock();
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        if let Some((_, running)) = slot.running.take() {
            running.abort();
        }
    }
}
