use parking_lot::{Condvar, Mutex};
use std::time::Duration;

/// Stop flag shared by the ctrl-c handler, the keyboard monitor and the
/// polling loops.
///
/// Waits on this signal return as soon as it is triggered.
pub struct ShutdownSignal {
    stopped: Mutex<bool>,
    condvar: Condvar,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self {
            stopped: Mutex::new(false),
            condvar: Condvar::new(),
        }
    }

    /// Trigger the signal, waking all waiting threads.
    pub fn trigger(&self) {
        *self.stopped.lock() = true;
        self.condvar.notify_all();
    }

    pub fn is_shutdown(&self) -> bool {
        *self.stopped.lock()
    }

    /// Wait for the specified duration or until shutdown is triggered.
    ///
    /// Returns `true` if shutdown was triggered.
    pub fn wait(&self, duration: Duration) -> bool {
        let mut stopped = self.stopped.lock();
        if !*stopped {
            self.condvar
                .wait_while_for(&mut stopped, |stopped| !*stopped, duration);
        }
        *stopped
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
