//! Keystroke debouncing.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep, Instant};

/// Forwards the latest input once it has been stable for `delay`.
///
/// Every new value restarts the delay. A value equal to the last one
/// forwarded is not forwarded again. When the input closes, a value still
/// waiting out its delay is dropped.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    last_emitted: Option<String>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_emitted: None,
        }
    }

    /// Treat `value` as already forwarded.
    pub fn starting_from(mut self, value: impl Into<String>) -> Self {
        self.last_emitted = Some(value.into());
        self
    }

    /// Run until `input` closes or `output` is dropped.
    pub async fn run(mut self, mut input: mpsc::Receiver<String>, output: mpsc::Sender<String>) {
        let mut pending: Option<String> = None;
        let timer = sleep(self.delay);
        tokio::pin!(timer);

        loop {
            tokio::select! {
                value = input.recv() => match value {
                    Some(value) => {
                        pending = Some(value);
                        timer.as_mut().reset(Instant::now() + self.delay);
                    }
                    None => break,
                },
                () = &mut timer, if pending.is_some() => {
                    let Some(value) = pending.take() else { continue };
                    if self.last_emitted.as_ref() == Some(&value) {
                        continue;
                    }
                    if output.send(value.clone()).await.is_err() {
                        break;
                    }
                    self.last_emitted = Some(value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(debouncer: Debouncer) -> (mpsc::Sender<String>, mpsc::Receiver<String>) {
        let (input_tx, input_rx) = mpsc::channel(16);
        let (output_tx, output_rx) = mpsc::channel(16);
        tokio::spawn(debouncer.run(input_rx, output_tx));
        (input_tx, output_rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_emits_last_value_after_quiet_period() {
        let (input, mut output) = spawn(Debouncer::new(Duration::from_millis(500)));
        let start = Instant::now();

        input.send("a".to_string()).await.unwrap();
        sleep(Duration::from_millis(100)).await;
        input.send("al".to_string()).await.unwrap();
        sleep(Duration::from_millis(100)).await;
        input.send("ali".to_string()).await.unwrap();

        assert_eq!(output.recv().await.as_deref(), Some("ali"));
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(700), "emitted after {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(750), "emitted after {:?}", elapsed);

        drop(input);
        assert_eq!(output.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_pauses_emit_each_value() {
        let (input, mut output) = spawn(Debouncer::new(Duration::from_millis(300)));

        input.send("heat".to_string()).await.unwrap();
        assert_eq!(output.recv().await.as_deref(), Some("heat"));

        input.send("heat 2".to_string()).await.unwrap();
        assert_eq!(output.recv().await.as_deref(), Some("heat 2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_value_not_reemitted() {
        let (input, mut output) =
            spawn(Debouncer::new(Duration::from_millis(500)).starting_from(""));

        // typed and erased within the delay
        input.send("x".to_string()).await.unwrap();
        input.send(String::new()).await.unwrap();
        sleep(Duration::from_secs(2)).await;
        assert!(output.try_recv().is_err());

        input.send("x".to_string()).await.unwrap();
        assert_eq!(output.recv().await.as_deref(), Some("x"));

        input.send("xy".to_string()).await.unwrap();
        input.send("x".to_string()).await.unwrap();
        sleep(Duration::from_secs(1)).await;
        assert!(output.try_recv().is_err());

        drop(input);
        assert_eq!(output.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_drops_pending_value() {
        let (input, mut output) = spawn(Debouncer::new(Duration::from_millis(500)));
        input.send("dune".to_string()).await.unwrap();
        drop(input);
        assert_eq!(output.recv().await, None);
    }
}
