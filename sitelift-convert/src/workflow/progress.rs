//! Per-job progress channel
//!
//! The pipeline holds a [`ProgressReporter`]; the HTTP response drains the
//! matching [`ProgressStream`]. The reporter enforces the stream contract:
//! percentages never decrease, and exactly one terminal event is sent because
//! `complete`/`fail` consume the reporter.
//!
//! A client that disconnects mid-job closes the receiving side; sends then fail
//! silently and the job runs to completion (including cleanup).

use sitelift_common::{ConversionEvent, ConversionStage};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::debug;

/// Receiving half, ready to hand to an NDJSON response
pub type ProgressStream = UnboundedReceiverStream<ConversionEvent>;

/// Create a connected reporter/stream pair
pub fn progress_channel() -> (ProgressReporter, ProgressStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        ProgressReporter {
            tx,
            last_percent: 0,
            disconnected: false,
        },
        UnboundedReceiverStream::new(rx),
    )
}

#[derive(Debug)]
pub struct ProgressReporter {
    tx: mpsc::UnboundedSender<ConversionEvent>,
    last_percent: u8,
    disconnected: bool,
}

impl ProgressReporter {
    /// Last percentage sent
    pub fn last_percent(&self) -> u8 {
        self.last_percent
    }

    /// Announce the start of `stage`
    pub fn report(&mut self, stage: ConversionStage, message: impl Into<String>) {
        self.send_progress(stage, stage.percent(), message.into());
    }

    /// Progress inside `stage`: `done` of `total` units finished
    ///
    /// Interpolates between this stage's percentage and the next one's, staying
    /// strictly below the next stage.
    pub fn report_within(
        &mut self,
        stage: ConversionStage,
        done: usize,
        total: usize,
        message: impl Into<String>,
    ) {
        let start = stage.percent();
        let end = stage.next().map(|s| s.percent()).unwrap_or(start);
        let span = end.saturating_sub(start).saturating_sub(1) as usize;

        let offset = if total == 0 {
            0
        } else {
            span * done.min(total) / total
        };
        self.send_progress(stage, start + offset as u8, message.into());
    }

    /// Terminal success event
    pub fn complete(mut self, download_url: impl Into<String>) {
        self.send(ConversionEvent::Complete {
            download_url: download_url.into(),
        });
    }

    /// Terminal failure event
    pub fn fail(mut self, error: impl Into<String>) {
        self.send(ConversionEvent::Error {
            error: error.into(),
        });
    }

    fn send_progress(&mut self, stage: ConversionStage, percent: u8, message: String) {
        let progress = percent.max(self.last_percent).min(100);
        self.last_percent = progress;
        self.send(ConversionEvent::Progress {
            stage,
            progress,
            message,
        });
    }

    fn send(&mut self, event: ConversionEvent) {
        if self.tx.send(event).is_err() && !self.disconnected {
            debug!("Progress receiver dropped; continuing without a listener");
            self.disconnected = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn percents(events: &[ConversionEvent]) -> Vec<u8> {
        events
            .iter()
            .filter_map(|e| match e {
                ConversionEvent::Progress { progress, .. } => Some(*progress),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_percentages_never_decrease() {
        let (mut reporter, stream) = progress_channel();
        reporter.report(ConversionStage::ConvertingHtml, "html");
        // A stage reported out of order is clamped to the last value
        reporter.report(ConversionStage::Analyzing, "late");
        reporter.report(ConversionStage::Packaging, "zip");
        reporter.complete("/downloads/x.zip");

        let events: Vec<_> = stream.collect().await;
        assert_eq!(percents(&events), vec![40, 40, 98]);
        assert_eq!(
            events.last(),
            Some(&ConversionEvent::Complete {
                download_url: "/downloads/x.zip".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_report_within_stays_below_next_stage() {
        let (mut reporter, stream) = progress_channel();
        for done in 1..=4 {
            reporter.report_within(ConversionStage::ConvertingHtml, done, 4, "page");
        }
        reporter.fail("boom");

        let events: Vec<_> = stream.collect().await;
        let values = percents(&events);
        assert_eq!(values.len(), 4);
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert!(values.iter().all(|p| (40..60).contains(p)));
        assert_eq!(*values.last().unwrap(), 59);
        assert_eq!(
            events.last(),
            Some(&ConversionEvent::Error {
                error: "boom".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_exactly_one_terminal_event() {
        let (mut reporter, stream) = progress_channel();
        reporter.report(ConversionStage::Extracting, "x");
        reporter.fail("bad zip");

        let events: Vec<_> = stream.collect().await;
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
        assert!(events.last().unwrap().is_terminal());
    }

    #[test]
    fn test_send_after_disconnect_does_not_panic() {
        let (mut reporter, stream) = progress_channel();
        drop(stream);
        reporter.report(ConversionStage::Extracting, "nobody listening");
        assert_eq!(reporter.last_percent(), 5);
        reporter.complete("/downloads/y.zip");
    }
}
