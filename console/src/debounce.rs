//! Debounce primitive
//!
//! Forwards a value only after the source has been quiet for the delay
//! window. Intermediate values are dropped, the last one wins. Dropping the
//! [`Debouncer`] cancels the pending value and stops the timer task.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Handle feeding values into a debounce task
#[derive(Debug)]
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn the debounce task; settled values are sent to `output`
    pub fn spawn(delay: Duration, output: mpsc::UnboundedSender<T>) -> Self {
        let (input, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(delay, rx, output));
        Self { input, task }
    }

    /// Spawn the task and return the receiving end of its output
    pub fn channel(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::spawn(delay, tx), rx)
    }

    /// Replace the pending value and restart the quiet window
    pub fn push(&self, value: T) {
        // Send fails only when the task is gone, in which case the value is moot.
        let _ = self.input.send(value);
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<T>(
    delay: Duration,
    mut input: mpsc::UnboundedReceiver<T>,
    output: mpsc::UnboundedSender<T>,
) {
    let mut pending: Option<T> = None;
    loop {
        match pending.take() {
            None => match input.recv().await {
                Some(value) => pending = Some(value),
                None => return,
            },
            Some(value) => {
                tokio::select! {
                    next = input.recv() => match next {
                        Some(newer) => pending = Some(newer),
                        // Owner dropped mid-window: discard.
                        None => return,
                    },
                    _ = sleep(delay) => {
                        if output.send(value).is_err() {
                            return;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    const WINDOW: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn test_burst_emits_only_last_value() {
        let (debouncer, mut settled) = Debouncer::channel(WINDOW);

        debouncer.push("A");
        sleep(Duration::from_millis(100)).await;
        debouncer.push("AB");
        sleep(Duration::from_millis(100)).await;
        debouncer.push("ABC");

        assert_eq!(settled.recv().await, Some("ABC"));
        assert!(timeout(Duration::from_secs(5), settled.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_each_settle() {
        let (debouncer, mut settled) = Debouncer::channel(WINDOW);

        debouncer.push(1);
        sleep(Duration::from_millis(600)).await;
        debouncer.push(2);

        assert_eq!(settled.recv().await, Some(1));
        assert_eq!(settled.recv().await, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_value_waits_for_full_window() {
        let (debouncer, mut settled) = Debouncer::channel(WINDOW);

        debouncer.push("miel");
        assert!(timeout(Duration::from_millis(499), settled.recv()).await.is_err());
        assert_eq!(settled.recv().await, Some("miel"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_value() {
        let (debouncer, mut settled) = Debouncer::channel(WINDOW);

        debouncer.push("cera");
        drop(debouncer);

        assert_eq!(settled.recv().await, None);
    }
}
