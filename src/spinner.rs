//! Busy indicator shown while renames run.
//!
//! An `indicatif` spinner ticks on its own; a forwarding thread moves
//! progress events from the rename loop's channel onto it. [`SpinnerGuard`]
//! stops that thread, joins it and clears the line on drop.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::debug;

use crate::cancel::CancellationToken;
use crate::executor::{NoProgress, ProgressEvent, ProgressSink};

const LABEL: &str = "Renaming files...";

/// Running indicator; stopped and joined when dropped.
pub struct SpinnerGuard {
    stop: CancellationToken,
    sender: Option<Sender<ProgressEvent>>,
    handle: Option<JoinHandle<()>>,
    bar: ProgressBar,
}

impl SpinnerGuard {
    /// Start a spinner on `target`, advancing a frame every `interval`.
    pub fn start(target: ProgressDrawTarget, interval: Duration, colors: bool) -> Self {
        let bar = ProgressBar::with_draw_target(None, target);
        bar.set_style(spinner_style(colors));
        bar.set_message(LABEL);
        bar.enable_steady_tick(interval);

        let stop = CancellationToken::new();
        let (sender, receiver) = mpsc::channel();

        let thread_stop = stop.clone();
        let thread_bar = bar.clone();
        let handle =
            thread::spawn(move || forward(thread_bar, receiver, thread_stop, interval));

        debug!(?interval, "Spinner started");

        Self {
            stop,
            sender: Some(sender),
            handle: Some(handle),
            bar,
        }
    }

    /// A guard with no thread behind it, for quiet or verbose runs.
    pub fn disabled() -> Self {
        Self {
            stop: CancellationToken::new(),
            sender: None,
            handle: None,
            bar: ProgressBar::hidden(),
        }
    }

    pub fn sink(&self) -> &dyn ProgressSink {
        match &self.sender {
            Some(sender) => sender as &dyn ProgressSink,
            None => &NoProgress,
        }
    }
}

impl Drop for SpinnerGuard {
    fn drop(&mut self) {
        self.stop.cancel();
        // Disconnecting wakes the thread out of recv_timeout right away
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                debug!("Spinner thread panicked");
            }
        }
        self.bar.finish_and_clear();
    }
}

fn spinner_style(colors: bool) -> ProgressStyle {
    let template = if colors {
        "{spinner:.cyan} {msg} [{pos}/{len}]"
    } else {
        "{spinner} {msg} [{pos}/{len}]"
    };
    ProgressStyle::default_spinner()
        .tick_chars("|/-\\ ")
        .template(template)
        .unwrap_or_else(|e| {
            debug!("Invalid spinner template: {}", e);
            ProgressStyle::default_spinner()
        })
}

fn forward(
    bar: ProgressBar,
    receiver: Receiver<ProgressEvent>,
    stop: CancellationToken,
    interval: Duration,
) {
    while !stop.is_cancelled() {
        match receiver.recv_timeout(interval) {
            Ok(event) => apply(&bar, event),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    // Events sent just before the stop still count
    for event in receiver.try_iter() {
        apply(&bar, event);
    }
}

fn apply(bar: &ProgressBar, event: ProgressEvent) {
    bar.set_length(event.total as u64);
    bar.set_position(event.applied as u64);
}
