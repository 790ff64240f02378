//! Effect execution and background task spawning.

use crate::app::{App, AppEvent, ContentPanel, DocumentSource, LoadError, LoadState, PageState};
use crate::content::{load_page, resolve_href};
use crate::document::{fetch_document, load_document_file};
use crate::nav::Effect;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Wraps a future to catch panics and convert them to errors.
///
/// Spawned tasks that panic would otherwise vanish silently; the message is
/// recovered so it can be reported through `AppEvent::TaskPanicked`.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Perform the effects returned by a controller command, in order.
pub(super) fn apply_effects(
    app: &mut App,
    effects: Vec<Effect>,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    for effect in effects {
        match effect {
            Effect::Status(msg) => app.set_status(msg),
            Effect::LoadContent { id, label, href } => {
                start_content_load(app, id, label, href, event_tx);
            }
        }
    }
}

/// Show `label` as the content title, then fill in the page.
///
/// Served from the page cache when possible; otherwise a background load is
/// spawned. Any load still in flight is aborted and its result discarded.
fn start_content_load(
    app: &mut App,
    id: String,
    label: String,
    href: String,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    if let Some(handle) = app.content_load_handle.take() {
        handle.abort();
        tracing::debug!("Aborted previous content load task");
    }
    app.content_load_generation = app.content_load_generation.wrapping_add(1);

    let resolved = resolve_href(app.source.base_url(), &href);
    let mut panel = ContentPanel {
        id: id.clone(),
        title: label,
        href,
        url: resolved.as_ref().ok().cloned(),
        page: PageState::Loading,
    };

    let url = match resolved {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!(id = %id, error = %e, "Page link not fetchable");
            panel.page = PageState::Unfetched(e.to_string());
            app.content = Some(panel);
            return;
        }
    };

    if let Some(page) = app.page_cache.get(url.as_str()) {
        tracing::debug!(id = %id, url = %url, "Page cache hit");
        panel.page = PageState::Loaded(page.clone());
        app.content = Some(panel);
        return;
    }

    if !app.load_pages {
        panel.page = PageState::Unfetched("Page loading is disabled".to_string());
        app.content = Some(panel);
        return;
    }

    app.content = Some(panel);
    let generation = app.content_load_generation;
    let client = app.http_client.clone();
    let tx = event_tx.clone();

    tracing::debug!(id = %id, url = %url, generation, "Spawning page load");
    app.content_load_handle = Some(tokio::spawn(async move {
        let tx_panic = tx.clone();
        let outcome = catch_task_panic(async {
            let result = load_page(&client, &url).await;
            let event = AppEvent::ContentLoaded {
                id,
                generation,
                url,
                result,
            };
            if let Err(e) = tx.send(event).await {
                tracing::warn!(error = %e, event = "ContentLoaded", "Channel send failed (receiver dropped)");
            }
        })
        .await;

        if let Err(panic_msg) = outcome {
            tracing::error!(task = "content_load", error = %panic_msg, "Background task panicked");
            let _ = tx_panic
                .send(AppEvent::TaskPanicked {
                    task: "content_load",
                    error: panic_msg,
                })
                .await;
        }
    }));
}

/// Load the navigation document from the app's source in the background.
///
/// Bumps the document generation so a reload supersedes an earlier load
/// still in flight.
pub fn spawn_document_load(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    if let Some(handle) = app.document_handle.take() {
        handle.abort();
        tracing::debug!("Aborted previous document load task");
    }
    app.document_generation = app.document_generation.wrapping_add(1);
    app.load_state = LoadState::Loading;

    let generation = app.document_generation;
    let source = app.source.clone();
    let client = app.http_client.clone();
    let tx = event_tx.clone();

    tracing::info!(source = %source.describe(), generation, "Loading navigation document");
    app.document_handle = Some(tokio::spawn(async move {
        let tx_panic = tx.clone();
        let outcome = catch_task_panic(async {
            let result: Result<_, LoadError> = match &source {
                DocumentSource::Url(url) => fetch_document(&client, url.as_str())
                    .await
                    .map_err(Into::into),
                DocumentSource::File(path) => load_document_file(path).map_err(Into::into),
            };
            if let Err(e) = tx
                .send(AppEvent::DocumentLoaded { generation, result })
                .await
            {
                tracing::warn!(error = %e, event = "DocumentLoaded", "Channel send failed (receiver dropped)");
            }
        })
        .await;

        if let Err(panic_msg) = outcome {
            tracing::error!(task = "document_load", error = %panic_msg, "Background task panicked");
            let _ = tx_panic
                .send(AppEvent::TaskPanicked {
                    task: "document_load",
                    error: panic_msg,
                })
                .await;
        }
    }));
}
