//! Typed progress events shared by every batch service.
//!
//! Services push events into a bounded channel; the presentation layer owns
//! the receiving end and decides how to render them.

use tokio::sync::mpsc;

/// Default capacity for progress channels.
pub const CHANNEL_CAPACITY: usize = 100;

/// Stage of the pipeline an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Scrape,
    Download,
    Links,
    /// Emitted once at the end of every batch.
    Finished,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scrape => "scrape",
            Self::Download => "download",
            Self::Links => "links",
            Self::Finished => "finished",
        }
    }
}

/// What happened to the subject of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Started,
    Succeeded,
    Skipped,
    Failed,
    Info,
}

/// A single progress update.
///
/// `index` counts completed items within the batch and never decreases;
/// `total` is the batch size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub phase: Phase,
    pub kind: EventKind,
    pub index: usize,
    pub total: usize,
    /// Username, URL or path the event is about.
    pub subject: String,
    pub message: String,
}

impl ProgressEvent {
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }
}

/// Sending side of a progress channel, bound to one phase.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    phase: Phase,
    tx: Option<mpsc::Sender<ProgressEvent>>,
}

impl ProgressReporter {
    pub fn new(phase: Phase, tx: mpsc::Sender<ProgressEvent>) -> Self {
        Self {
            phase,
            tx: Some(tx),
        }
    }

    /// Reporter that drops every event.
    pub fn silent(phase: Phase) -> Self {
        Self { phase, tx: None }
    }

    /// Create a bounded channel and a reporter feeding it.
    pub fn channel(phase: Phase) -> (Self, mpsc::Receiver<ProgressEvent>) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        (Self::new(phase, tx), rx)
    }

    async fn send(&self, event: ProgressEvent) {
        if let Some(ref tx) = self.tx {
            // A closed receiver only means nobody is watching.
            let _ = tx.send(event).await;
        }
    }

    pub async fn emit(
        &self,
        kind: EventKind,
        index: usize,
        total: usize,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.send(ProgressEvent {
            phase: self.phase,
            kind,
            index,
            total,
            subject: subject.into(),
            message: message.into(),
        })
        .await;
    }

    pub async fn started(&self, index: usize, total: usize, subject: &str, message: impl Into<String>) {
        self.emit(EventKind::Started, index, total, subject, message).await;
    }

    pub async fn succeeded(&self, index: usize, total: usize, subject: &str, message: impl Into<String>) {
        self.emit(EventKind::Succeeded, index, total, subject, message).await;
    }

    pub async fn skipped(&self, index: usize, total: usize, subject: &str, message: impl Into<String>) {
        self.emit(EventKind::Skipped, index, total, subject, message).await;
    }

    pub async fn failed(&self, index: usize, total: usize, subject: &str, message: impl Into<String>) {
        self.emit(EventKind::Failed, index, total, subject, message).await;
    }

    /// Final event summarizing the batch.
    pub async fn finished(&self, total: usize, succeeded: usize, failed: usize) {
        self.send(ProgressEvent {
            phase: Phase::Finished,
            kind: EventKind::Info,
            index: total,
            total,
            subject: self.phase.as_str().to_string(),
            message: format!("{} succeeded, {} failed", succeeded, failed),
        })
        .await;
    }
}
