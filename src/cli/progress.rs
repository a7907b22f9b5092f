//! Terminal rendering of batch progress events.

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::icons;
use crate::services::{EventKind, ProgressEvent};

/// Progress bar plus per-item log lines for one batch.
pub struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    pub fn new(total: usize, label: &str) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {prefix} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        bar.set_prefix(label.to_string());
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { bar }
    }

    /// Apply one event to the display.
    pub fn handle(&self, event: &ProgressEvent) {
        if event.is_finished() {
            self.bar.set_position(event.total as u64);
            self.bar.set_message(event.message.clone());
            return;
        }

        match event.kind {
            EventKind::Started | EventKind::Info => {
                self.bar.set_message(truncate_message(&event.message, 60));
            }
            kind => {
                self.bar.set_position(event.index as u64);
                self.bar
                    .println(format!("{} {}", icons::for_event(kind), event.message));
            }
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Drain `rx` into a progress bar until the sender side closes.
pub fn spawn_consumer(
    mut rx: mpsc::Receiver<ProgressEvent>,
    total: usize,
    label: &str,
) -> JoinHandle<()> {
    let progress = BatchProgress::new(total, label);
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            progress.handle(&event);
        }
        progress.finish();
    })
}

/// Shorten a message for the status line, keeping its start.
pub fn truncate_message(message: &str, max_chars: usize) -> String {
    if message.chars().count() <= max_chars {
        return message.to_string();
    }
    let kept: String = message.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_message() {
        assert_eq!(truncate_message("short", 20), "short");
        assert_eq!(truncate_message("abcdefghij", 8), "abcde...");
        assert_eq!(truncate_message("über über über", 6), "übe...");
    }
}
