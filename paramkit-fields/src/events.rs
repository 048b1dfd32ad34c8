//! Notifications about validated submissions.
//!
//! The form does not know where events go. A sink is handed to it at build
//! time; the default [`TracingSink`] just logs.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

/// Outcome of one form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionEvent {
    pub accepted: bool,
    pub field_count: usize,
    /// Names of the fields whose values were rejected, in form order.
    pub rejected: Vec<String>,
}

/// Receiver of submission events.
///
/// Called synchronously from [`Form::validate_submission`](crate::Form::validate_submission),
/// possibly from many threads at once.
pub trait EventSink: Send + Sync {
    fn send(&self, event: &SubmissionEvent);
}

/// Logs each event at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn send(&self, event: &SubmissionEvent) {
        info!(
            accepted = event.accepted,
            field_count = event.field_count,
            rejected = ?event.rejected,
            "form submission"
        );
    }
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn send(&self, event: &SubmissionEvent) {
        (**self).send(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<SubmissionEvent>>);

    impl EventSink for Recorder {
        fn send(&self, event: &SubmissionEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn shared_sink_forwards_events() {
        let recorder = Arc::new(Recorder::default());
        let sink: Arc<dyn EventSink> = recorder.clone();
        let event = SubmissionEvent {
            accepted: false,
            field_count: 2,
            rejected: vec!["a".into()],
        };
        sink.send(&event);
        assert_eq!(recorder.0.lock().unwrap().as_slice(), &[event]);
    }

    #[test]
    fn event_serializes() {
        let event = SubmissionEvent {
            accepted: true,
            field_count: 1,
            rejected: vec![],
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            serde_json::json!({"accepted": true, "field_count": 1, "rejected": []})
        );
    }
}
