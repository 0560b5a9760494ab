//! Delivery pipeline.
//!
//! `Unauthenticated → Resolving → Parsing → Decoding → Composing → Delivered`
//!
//! Each stage runs once, in order. The first failure ends the request with a
//! stage-specific [`DeliveryError`]; nothing is retried and no partial
//! response is produced.

use axum::http::HeaderMap;
use std::sync::Arc;
use subkv_types::{ConfigName, DeliveryError, DeliveryStage};
use tracing::debug;

use crate::auth::Authenticated;
use crate::envelope::decode_envelope;
use crate::headers::compose_headers;
use crate::payload::extract_payload;
use crate::resolver::resolve;
use crate::store::KvStore;

/// A fully resolved configuration, ready to send.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub name: ConfigName,
    /// Store key the entry was found under.
    pub resolved_key: String,
    pub body: String,
    pub headers: HeaderMap,
}

/// Take the configuration name from the final non-empty path segment.
pub fn config_name_from_path(path: &str) -> Result<ConfigName, DeliveryError> {
    let segment =
        path.split('/').filter(|s| !s.is_empty()).last().ok_or(DeliveryError::NoConfigName)?;
    ConfigName::from_path_segment(segment)
}

struct StageTracker<'a> {
    name: &'a ConfigName,
    stage: DeliveryStage,
}

impl<'a> StageTracker<'a> {
    fn start(name: &'a ConfigName) -> Self {
        Self { name, stage: DeliveryStage::Unauthenticated }
    }

    fn advance(&mut self) {
        if let Some(next) = self.stage.next() {
            debug!("[{}] {} -> {}", self.name, self.stage, next);
            self.stage = next;
        }
    }

    fn fail(&mut self, err: DeliveryError) -> DeliveryError {
        let terminal = err.terminal_stage();
        debug!("[{}] {} -> {} ({})", self.name, self.stage, terminal, err);
        self.stage = terminal;
        err
    }
}

pub struct DeliveryPipeline {
    store: Arc<dyn KvStore>,
}

impl DeliveryPipeline {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    /// Resolve and deliver `name`, stamping the current time.
    pub async fn deliver(
        &self,
        auth: Authenticated,
        name: &ConfigName,
    ) -> Result<Delivery, DeliveryError> {
        self.deliver_at(auth, name, chrono::Utc::now().timestamp()).await
    }

    /// Same as [`deliver`](Self::deliver) with an explicit Unix timestamp.
    pub async fn deliver_at(
        &self,
        _auth: Authenticated,
        name: &ConfigName,
        now: i64,
    ) -> Result<Delivery, DeliveryError> {
        let mut tracker = StageTracker::start(name);
        tracker.advance();

        let entry = match resolve(self.store.as_ref(), name).await {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                return Err(tracker.fail(DeliveryError::NotFound { name: name.to_string() }))
            },
            Err(e) => return Err(tracker.fail(e.into())),
        };
        tracker.advance();

        let envelope = decode_envelope(&entry.raw).map_err(|e| tracker.fail(e))?;
        tracker.advance();

        let body = extract_payload(&envelope, name).map_err(|e| tracker.fail(e.into()))?;
        tracker.advance();

        let headers = compose_headers(&envelope, name, now).map_err(|e| tracker.fail(e))?;
        tracker.advance();

        Ok(Delivery { name: name.clone(), resolved_key: entry.key, body, headers })
    }
}
