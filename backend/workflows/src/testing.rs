use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use patente_core::{PlateRecord, RecordStore, Result};
use patente_store::InMemoryRecordStore;
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// Wraps an in-memory store and stalls reads of selected keys.
pub struct SlowStore {
    inner: InMemoryRecordStore,
    delays: HashMap<String, Duration>,
}

impl SlowStore {
    pub fn new(inner: InMemoryRecordStore) -> Self {
        Self {
            inner,
            delays: HashMap::new(),
        }
    }

    pub fn delay(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(key.to_string(), delay);
        self
    }
}

#[async_trait]
impl RecordStore for SlowStore {
    fn name(&self) -> &str {
        "slow"
    }

    async fn get(&self, key: &str) -> Result<Option<PlateRecord>> {
        if let Some(delay) = self.delays.get(key) {
            tokio::time::sleep(*delay).await;
        }
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, record: &PlateRecord) -> Result<()> {
        self.inner.put(key, record).await
    }

    async fn get_all(&self) -> Result<Vec<(String, PlateRecord)>> {
        self.inner.get_all().await
    }
}

/// Records the level and message of every event on the current thread.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<(Level, String)>>>);

impl CapturedLogs {
    /// Install a capturing subscriber for the current thread until the guard drops.
    pub fn install() -> (Self, DefaultGuard) {
        let logs = Self::default();
        let subscriber = tracing_subscriber::registry().with(logs.clone());
        (logs, tracing::subscriber::set_default(subscriber))
    }

    pub fn levels_of(&self, message: &str) -> Vec<Level> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, m)| m == message)
            .map(|(level, _)| *level)
            .collect()
    }

    pub fn any_at(&self, level: Level) -> bool {
        self.0.lock().unwrap().iter().any(|(l, _)| *l == level)
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for CapturedLogs {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.0
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.0));
    }
}
