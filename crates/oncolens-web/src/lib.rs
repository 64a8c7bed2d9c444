//! oncolens-web — HTTP boundary for the OncoLens extraction engine.
//! Exposes:
//!   - POST /api/analyze   (ner | summarization | qa | comparison)
//!   - POST /api/ner/batch (parallel entity extraction)
//!   - GET  /api/rules     (rule table introspection)
//!   - GET  /api/health
//!   - GET  /api/events    (SSE feed of completed analyses)

pub mod error;
pub mod router;
pub mod handlers;
pub mod state;
pub mod sse;
