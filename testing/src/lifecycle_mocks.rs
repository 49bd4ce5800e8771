//! Stage handlers and bus listeners for lifecycle tests.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Test utilities document panics where critical

use launchpad_core::topics::APP_TOPIC;
use launchpad_runtime::{App, AppError, LifecycleEvent, StageFuture, StageHandler};
use std::sync::{Arc, RwLock};

/// Shared log of handler names, in the order they ran.
pub type StageLog = Arc<RwLock<Vec<String>>>;

/// Stage override that appends its name to a [`StageLog`] and succeeds.
///
/// # Example
///
/// ```
/// use launchpad_runtime::{Overrides, Stage};
/// use launchpad_testing::{RecordingHandler, StageLog};
///
/// let log = StageLog::default();
/// let overrides = Overrides::new()
///     .with(Stage::BeforeInit, RecordingHandler::new("before_init", &log))
///     .with(Stage::Ready, RecordingHandler::new("ready", &log));
/// assert!(overrides.contains(Stage::Ready));
/// ```
#[derive(Clone, Debug)]
pub struct RecordingHandler {
    name: String,
    log: StageLog,
}

impl RecordingHandler {
    /// Handler recording `name` into `log`.
    #[must_use]
    pub fn new(name: impl Into<String>, log: &StageLog) -> Self {
        Self {
            name: name.into(),
            log: Arc::clone(log),
        }
    }
}

impl StageHandler for RecordingHandler {
    fn handle<'a>(&'a self, _app: &'a mut App) -> StageFuture<'a> {
        self.log.write().unwrap().push(self.name.clone());
        Box::pin(async { Ok(()) })
    }
}

/// Stage override that always fails with a fixed error.
#[derive(Clone, Debug)]
pub struct FailingHandler {
    error: AppError,
}

impl FailingHandler {
    /// Handler failing with `error`.
    #[must_use]
    pub const fn new(error: AppError) -> Self {
        Self { error }
    }

    /// Handler failing with [`AppError::Stage`].
    #[must_use]
    pub fn stage(stage: &str, message: &str) -> Self {
        Self::new(AppError::stage(stage, message))
    }
}

impl StageHandler for FailingHandler {
    fn handle<'a>(&'a self, _app: &'a mut App) -> StageFuture<'a> {
        let error = self.error.clone();
        Box::pin(async move { Err(error) })
    }
}

/// Records every event published under `APP`.
#[derive(Clone, Debug, Default)]
pub struct EventRecorder {
    events: Arc<RwLock<Vec<(String, LifecycleEvent)>>>,
}

impl EventRecorder {
    /// Subscribe a new recorder to `app`'s bus.
    #[must_use]
    pub fn attach(app: &App) -> Self {
        let recorder = Self::default();
        let events = Arc::clone(&recorder.events);
        app.subscribe(APP_TOPIC, move |topic, event| {
            events
                .write()
                .unwrap()
                .push((topic.to_string(), event.clone()));
        });
        recorder
    }

    /// Topics delivered so far, in order.
    #[must_use]
    pub fn topics(&self) -> Vec<String> {
        self.events
            .read()
            .unwrap()
            .iter()
            .map(|(topic, _)| topic.clone())
            .collect()
    }

    /// Events delivered so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events
            .read()
            .unwrap()
            .iter()
            .map(|(_, event)| event.clone())
            .collect()
    }

    /// How many events were delivered on `topic`.
    #[must_use]
    pub fn count(&self, topic: &str) -> usize {
        self.events
            .read()
            .unwrap()
            .iter()
            .filter(|(seen, _)| seen == topic)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchpad_core::topics::APP_READY;

    #[test]
    fn test_recorder_sees_app_topics() {
        let app = App::new();
        let recorder = EventRecorder::attach(&app);

        app.publish(&LifecycleEvent::Ready);

        assert_eq!(recorder.topics(), vec![APP_READY.to_string()]);
        assert_eq!(recorder.count(APP_READY), 1);
    }

    #[test]
    fn test_handlers_run() {
        let log = StageLog::default();
        let mut app = App::new();

        let ok = tokio_test::block_on(RecordingHandler::new("first", &log).handle(&mut app));
        let failed =
            tokio_test::block_on(FailingHandler::stage("second", "boom").handle(&mut app));

        assert_eq!(ok, Ok(()));
        assert_eq!(failed, Err(AppError::stage("second", "boom")));
        assert_eq!(*log.read().unwrap(), vec!["first".to_string()]);
    }
}
