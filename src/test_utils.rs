//! Shared helpers for unit tests

use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// One captured event; field values are rendered with `Debug`
#[derive(Debug, Clone)]
pub(crate) struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub shapes: String,
}

impl Visit for CapturedEvent {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "shapes" => self.shapes = format!("{value:?}"),
            _ => {}
        }
    }
}

/// Layer that records every event it sees
#[derive(Debug, Clone, Default)]
pub(crate) struct EventLog(Arc<Mutex<Vec<CapturedEvent>>>);

impl EventLog {
    pub fn take(&self) -> Vec<CapturedEvent> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

impl<S: Subscriber> Layer<S> for EventLog {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut captured = CapturedEvent {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: String::new(),
            shapes: String::new(),
        };
        event.record(&mut captured);
        self.0.lock().unwrap().push(captured);
    }
}

/// Run `f` with every event emitted on this thread captured.
pub(crate) fn capture_events<T>(f: impl FnOnce() -> T) -> (T, Vec<CapturedEvent>) {
    let log = EventLog::default();
    let subscriber = tracing_subscriber::registry().with(log.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, log.take())
}

/// Like [`capture_events`], keeping only `error!` events.
pub(crate) fn capture_errors<T>(f: impl FnOnce() -> T) -> (T, Vec<CapturedEvent>) {
    let (result, events) = capture_events(f);
    let errors = events
        .into_iter()
        .filter(|event| event.level == Level::ERROR)
        .collect();
    (result, errors)
}
