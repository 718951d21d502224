use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop signal handed explicitly to every task that must observe it.
///
/// Clones share the same flag. Once cancelled a token stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Route SIGINT (Ctrl+C) into `token`.
///
/// Only installed right before the execution phase: until then the default
/// handler terminates the process, which is safe because nothing has been
/// renamed yet. Can be called at most once per process.
pub fn install_interrupt_handler(token: CancellationToken) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        tracing::warn!("Interrupt received, stopping after the current rename");
        token.cancel();
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_new_token_is_not_cancelled() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_cancel_is_visible_through_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();

        clone.cancel();

        assert!(token.is_cancelled());
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_cancel_from_another_thread() {
        let token = CancellationToken::new();
        let remote = token.clone();

        thread::spawn(move || remote.cancel()).join().unwrap();

        assert!(token.is_cancelled());
    }
}
