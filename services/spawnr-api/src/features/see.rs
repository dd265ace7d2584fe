use axum::{
    extract::{Path, State},
    response::{
        Sse,
        sse::{Event, KeepAlive},
    },
};
use futures::{Stream, StreamExt};
use spawnr_core::schemas::WatchEventData;
use tracing::info;

use crate::{error::AppError, utilities::app_state::AppState};

/// Streams job events as SSE `message` events with `{"data": "<text>"}` payloads.
#[tracing::instrument(name = "watch_job_handler", skip_all, fields(namespace = %namespace, name = %name), err)]
pub async fn watch_job_handler(
    Path((namespace, name)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, AppError> {
    let resources = state.resources();

    // Surface a missing job as a plain error response before the stream opens.
    resources.get_job(&namespace, &name).await?;

    info!(cluster = %resources.handle().identity(), "👀 Watching job");

    let stream = resources
        .watch_job(&namespace, &name)
        .map(|data| Event::default().event("message").json_data(WatchEventData { data }));

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
