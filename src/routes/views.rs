use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_stream::{wrappers::UnboundedReceiverStream, Stream, StreamExt};

use crate::{
    state::AppState,
    store::{AppStore, SubscriptionId, View, ViewSnapshot},
};

/// What a view currently renders, with bookmark flags
pub async fn snapshot(State(state): State<AppState>, Path(view): Path<View>) -> Json<ViewSnapshot> {
    Json(state.store.read().await.snapshot(view))
}

/// Live updates for a mounted view as server-sent `update` events
///
/// The first event carries the current rendering. Closing the connection
/// unmounts the view, which abandons a fetch nothing else is waiting for.
pub async fn stream(
    State(state): State<AppState>,
    Path(view): Path<View>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let (id, rx) = state.store.write().await.subscribe(view);
    let guard = SubscriptionGuard {
        store: Arc::clone(&state.store),
        id,
    };

    let updates = UnboundedReceiverStream::new(rx).map(move |update| {
        let _mounted = &guard;
        Event::default().event("update").json_data(&update)
    });

    Sse::new(updates).keep_alive(KeepAlive::default())
}

/// Unsubscribes when the event stream is dropped
struct SubscriptionGuard {
    store: Arc<RwLock<AppStore>>,
    id: SubscriptionId,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Ok(mut store) = self.store.try_write() {
            store.unsubscribe(self.id);
            return;
        }

        // Store is busy; finish the unsubscribe on the runtime
        let store = Arc::clone(&self.store);
        let id = self.id;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move { store.write().await.unsubscribe(id) });
            }
            Err(_) => tracing::warn!(subscription = id, "No runtime to unsubscribe on"),
        }
    }
}
