//! Shared application state for the web server.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use oncolens_common::Config;
use oncolens_ner::{AnalysisEngine, ModelVariant};

/// Events pushed to connected clients via SSE.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    /// A single analysis request finished
    AnalysisCompleted {
        analysis_type: String,
        model: Option<String>,
        result_count: usize,
        elapsed_ms: f64,
    },
    /// A batch extraction finished
    BatchCompleted {
        documents: usize,
        failed: usize,
        elapsed_ms: f64,
    },
}

impl AppEvent {
    /// Same string as the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            AppEvent::AnalysisCompleted { .. } => "analysis_completed",
            AppEvent::BatchCompleted { .. } => "batch_completed",
        }
    }
}

/// Shared state injected into every Axum handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: AnalysisEngine,
    pub default_model: ModelVariant,
    pub default_threshold: f64,
    pub permissive_cors: bool,
    /// Broadcast channel for SSE push events
    pub event_tx: broadcast::Sender<AppEvent>,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let default_model = config.engine.default_model.parse::<ModelVariant>()?;
        let (event_tx, _) = broadcast::channel(config.server.event_buffer.max(1));
        Ok(Self {
            engine: AnalysisEngine::new(config.engine.max_text_length, config.engine.max_batch_size),
            default_model,
            default_threshold: config.engine.default_threshold,
            permissive_cors: config.server.permissive_cors,
            event_tx,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.event_tx.subscribe()
    }

    /// Fire-and-forget; having no subscribers is normal.
    pub fn publish(&self, event: AppEvent) {
        let _ = self.event_tx.send(event);
    }
}

pub type SharedState = Arc<AppState>;
