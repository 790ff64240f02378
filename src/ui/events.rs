//! Application event handling.
//!
//! Processes background task results: document loads, page loads and
//! task panics. Results from superseded spawns are dropped by generation.

use crate::app::{App, AppEvent, LoadState, PageState};
use tokio::sync::mpsc;

use super::helpers::apply_effects;

pub(super) fn handle_app_event(
    app: &mut App,
    event: AppEvent,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    match event {
        AppEvent::DocumentLoaded { generation, result } => {
            if generation != app.document_generation {
                tracing::debug!(
                    generation,
                    current = app.document_generation,
                    "Discarding stale document load"
                );
                return;
            }
            app.document_handle = None;
            match result {
                Ok(doc) => {
                    let effects = app.install_document(&doc);
                    apply_effects(app, effects, event_tx);
                }
                Err(e) => {
                    tracing::error!(source = %app.source.describe(), error = %e, "Failed to load navigation document");
                    app.set_status(format!("Load failed: {e}"));
                    app.load_state = LoadState::Failed(e.to_string());
                }
            }
        }

        AppEvent::ContentLoaded {
            id,
            generation,
            url,
            result,
        } => {
            if generation != app.content_load_generation {
                tracing::debug!(id = %id, generation, "Discarding stale page load");
                return;
            }
            app.content_load_handle = None;
            let page = match result {
                Ok(page) => {
                    app.page_cache.insert(url.to_string(), page.clone());
                    PageState::Loaded(page)
                }
                Err(e) => {
                    tracing::error!(id = %id, url = %url, error = %e, "Failed to load page");
                    PageState::Failed(e.to_string())
                }
            };
            match app.content.as_mut() {
                Some(panel) if panel.id == id => panel.page = page,
                _ => tracing::debug!(id = %id, "Content panel moved on, page not shown"),
            }
        }

        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error = %error, "Background task panicked");
            app.set_status(format!("Internal error in {task}"));
            match task {
                "document_load" => app.load_state = LoadState::Failed(error),
                "content_load" => {
                    if let Some(panel) = app.content.as_mut() {
                        panel.page = PageState::Failed(error);
                    }
                }
                _ => {}
            }
        }
    }
}
