//! In-memory `tracing` subscriber for asserting on log output.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)]

use std::sync::{Arc, RwLock};
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Records the message of every event emitted while installed.
///
/// ```ignore
/// let logs = LogCapture::new();
/// let _guard = logs.install();
/// app.initialize(options).await;
/// assert!(logs.errors().contains(&"Invalid initialization options".to_string()));
/// ```
#[derive(Clone, Debug, Default)]
pub struct LogCapture {
    events: Arc<RwLock<Vec<(Level, String)>>>,
}

impl LogCapture {
    /// Empty capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make this the current thread's subscriber until the guard drops.
    ///
    /// Use with a current-thread runtime (the `#[tokio::test]` default).
    #[must_use]
    pub fn install(&self) -> DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    /// Every captured message, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.events
            .read()
            .unwrap()
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }

    /// Messages logged at `ERROR`.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.events
            .read()
            .unwrap()
            .iter()
            .filter(|(level, _)| *level == Level::ERROR)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

#[derive(Default)]
struct MessageVisitor(Option<String>);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        if let Some(message) = visitor.0 {
            self.events
                .write()
                .unwrap()
                .push((*event.metadata().level(), message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captures_messages_by_level() {
        let logs = LogCapture::new();
        {
            let _guard = logs.install();
            tracing::info!(stage = "ready", "Application ready");
            tracing::error!("Initialization failed");
        }
        tracing::error!("not captured");

        assert_eq!(logs.messages(), vec!["Application ready", "Initialization failed"]);
        assert_eq!(logs.errors(), vec!["Initialization failed"]);
    }
}
