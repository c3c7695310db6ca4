//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs, one unit of
//!   work per public operation.
//! - Resolve category/tag/note references before anything is persisted.
//! - Keep transport layers decoupled from storage details.

pub mod error;
pub mod note_service;
pub mod relation_binder;
pub mod tag_resolver;
pub mod task_service;
pub mod taxonomy_service;

use error::ServiceError;
use log::{error, warn};
use std::time::Instant;

/// Emits the failure line for one service operation.
///
/// Caller mistakes log at `warn`, internal failures at `error`.
fn log_failure(event: &str, module: &str, err: &ServiceError, started_at: Instant) {
    let duration_ms = started_at.elapsed().as_millis();
    if err.is_internal() {
        error!(
            "event={event} module={module} status=error duration_ms={duration_ms} error_code={} error={err}",
            err.code()
        );
    } else {
        warn!(
            "event={event} module={module} status=error duration_ms={duration_ms} error_code={} error={err}",
            err.code()
        );
    }
}
