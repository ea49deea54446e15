//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{EnvFilter, Layer};

use notes_service::config::ServiceConfig;
use notes_service::http::{build_router, AppState};
use notes_service::notes::{NoteService, SqliteNoteRepository};
use notes_service::observability::mdc;

/// A log record as seen by the sink, with the context captured at emission.
#[derive(Debug, Clone)]
pub struct Record {
    pub level: Level,
    pub message: String,
    pub target: String,
    pub mdc: BTreeMap<String, String>,
}

/// Layer that keeps every event in memory.
#[derive(Clone, Default)]
pub struct RecordingLayer {
    records: Arc<Mutex<Vec<Record>>>,
}

impl RecordingLayer {
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.message).collect()
    }

    /// Build a subscriber that records into this layer.
    pub fn subscriber(&self) -> impl Subscriber + Send + Sync + 'static {
        tracing_subscriber::registry().with(self.clone())
    }

    /// Like [`subscriber`](Self::subscriber), behind an `EnvFilter` built from `directives`.
    pub fn filtered_subscriber(&self, directives: &str) -> impl Subscriber + Send + Sync + 'static {
        tracing_subscriber::registry()
            .with(EnvFilter::new(directives))
            .with(self.clone())
    }
}

#[derive(Default)]
struct RecordVisitor {
    message: String,
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for RecordingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);
        self.records.lock().unwrap().push(Record {
            level: *event.metadata().level(),
            message: visitor.message,
            target: event.metadata().target().to_string(),
            mdc: mdc::snapshot(),
        });
    }
}

/// Run `f` with a recording subscriber installed on the current thread.
pub fn with_recording<T>(f: impl FnOnce() -> T) -> (T, RecordingLayer) {
    let layer = RecordingLayer::default();
    let result = tracing::subscriber::with_default(layer.subscriber(), f);
    (result, layer)
}

pub fn in_memory_service() -> NoteService {
    let repository = SqliteNoteRepository::open_in_memory().unwrap();
    NoteService::new(Arc::new(repository))
}

pub fn test_router() -> axum::Router {
    build_router(&ServiceConfig::default(), AppState::new(in_memory_service()))
}
