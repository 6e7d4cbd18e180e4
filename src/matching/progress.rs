use crossbeam::channel::{Receiver, Sender};
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Receives the completion percentage of the matching phase.
///
/// Notifiers are called from the worker threads and must never block them.
///
pub trait ProgressNotifier: Send + Sync {
    fn send(&self, percent: i32);
}

#[derive(Default, Clone, Debug)]
pub struct NoopProgress;

impl ProgressNotifier for NoopProgress {
    fn send(&self, _percent: i32) {}
}

/// Forwards the progress to a closure
///
pub struct FnProgress<F>(pub F)
where
    F: Fn(i32) + Send + Sync;

impl<F> ProgressNotifier for FnProgress<F>
where
    F: Fn(i32) + Send + Sync,
{
    fn send(&self, percent: i32) {
        (self.0)(percent)
    }
}

/// Forwards the progress into an unbounded channel; a dropped receiver is not an error.
///
#[derive(Clone, Debug)]
pub struct ChannelProgress {
    sender: Sender<i32>,
}

impl ChannelProgress {
    pub fn new() -> (Self, Receiver<i32>) {
        let (sender, receiver) = crossbeam::channel::unbounded();
        (Self { sender }, receiver)
    }
}

impl ProgressNotifier for ChannelProgress {
    fn send(&self, percent: i32) {
        if let Err(e) = self.sender.try_send(percent) {
            debug!(
                "Progress {}% was not delivered to the receiver. Error is: {:?}",
                percent, e
            );
        }
    }
}

/// Share the handle with the caller and call [`Cancellation::cancel`] to stop the matching phase.
///
#[derive(Clone, Default, Debug)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Re-arms the handle so the tracker can be run again
    ///
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Percentage of `done` out of `total`, `100` when there is nothing to do
///
pub fn percent(done: usize, total: usize) -> i32 {
    if total == 0 {
        100
    } else {
        ((done.min(total) * 100) / total) as i32
    }
}
