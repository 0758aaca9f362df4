//! Async owner of a [`ResourceState`].

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};

use crate::api::{ApiError, Page, PageMeta};
use crate::mvi::Reducer;

use super::intent::ResourceIntent;
use super::reducer::ResourceReducer;
use super::state::ResourceState;

/// Result of a successful fetch, with pagination when the endpoint pages.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub data: T,
    pub page: Option<PageMeta>,
}

impl<T> From<T> for Loaded<T> {
    fn from(data: T) -> Self {
        Self { data, page: None }
    }
}

impl<I> Loaded<Vec<I>> {
    pub fn from_page(page: Page<I>) -> Self {
        let meta = page.meta();
        Self {
            data: page.items,
            page: Some(meta),
        }
    }
}

/// A fetch started by [`RemoteResource::start_fetch`].
pub struct FetchTicket {
    pub generation: u64,
    handle: JoinHandle<()>,
}

impl FetchTicket {
    /// Wait for the fetch to settle. Returns `false` if it was superseded
    /// and aborted before finishing.
    pub async fn wait(self) -> bool {
        self.handle.await.is_ok()
    }
}

/// One remote list or detail resource.
///
/// Each fetch runs as its own task. Starting a new fetch aborts the previous
/// one, and results from superseded fetches are discarded by generation.
/// Dropping the resource aborts whatever is still in flight.
pub struct RemoteResource<T> {
    name: String,
    state: Arc<watch::Sender<ResourceState<T>>>,
    in_flight: Mutex<InFlight>,
}

/// Generation counter and the task it belongs to, updated together.
struct InFlight {
    next_generation: u64,
    task: Option<AbortHandle>,
}

impl<T> RemoteResource<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>) -> Self {
        let (state, _) = watch::channel(ResourceState::default());
        Self {
            name: name.into(),
            state: Arc::new(state),
            in_flight: Mutex::new(InFlight {
                next_generation: 1,
                task: None,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state snapshot.
    pub fn snapshot(&self) -> ResourceState<T> {
        self.state.borrow().clone()
    }

    /// Receive every state change.
    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.state.subscribe()
    }

    /// Start a fetch in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_fetch<Fut>(&self, request: Fut) -> FetchTicket
    where
        Fut: Future<Output = Result<Loaded<T>, ApiError>> + Send + 'static,
    {
        // Held until the new task is registered so concurrent callers cannot
        // abort a newer generation.
        let mut in_flight = self.in_flight.lock();
        let generation = in_flight.next_generation;
        in_flight.next_generation += 1;
        dispatch(&self.state, ResourceIntent::FetchStarted { generation });

        let state = Arc::clone(&self.state);
        let name = self.name.clone();
        let handle = tokio::spawn(async move {
            let intent = match request.await {
                Ok(loaded) => ResourceIntent::FetchSucceeded {
                    generation,
                    data: loaded.data,
                    page: loaded.page,
                },
                Err(e) if e.is_not_found() => ResourceIntent::FetchMissing { generation },
                Err(e) => {
                    tracing::warn!(resource = %name, generation, error = %e, "Fetch failed");
                    ResourceIntent::FetchFailed {
                        generation,
                        message: e.user_message(),
                    }
                }
            };
            dispatch(&state, intent);
        });

        if let Some(previous) = in_flight.task.replace(handle.abort_handle()) {
            if !previous.is_finished() {
                tracing::debug!(resource = %self.name, generation, "Superseding in-flight fetch");
            }
            previous.abort();
        }

        FetchTicket { generation, handle }
    }

    /// Fetch and wait for the result.
    pub async fn fetch<Fut>(&self, request: Fut) -> ResourceState<T>
    where
        Fut: Future<Output = Result<Loaded<T>, ApiError>> + Send + 'static,
    {
        self.start_fetch(request).wait().await;
        self.snapshot()
    }

    /// Run a write request. Returns the result on success; on failure
    /// records the error and returns `None`. Never refetches.
    pub async fn mutate<R, Fut>(&self, request: Fut) -> Option<R>
    where
        Fut: Future<Output = Result<R, ApiError>>,
    {
        match request.await {
            Ok(value) => {
                dispatch(&self.state, ResourceIntent::MutationSucceeded);
                Some(value)
            }
            Err(e) => {
                tracing::warn!(resource = %self.name, error = %e, "Mutation failed");
                dispatch(
                    &self.state,
                    ResourceIntent::MutationFailed {
                        message: e.user_message(),
                    },
                );
                None
            }
        }
    }

    pub fn clear_error(&self) {
        dispatch(&self.state, ResourceIntent::ClearError);
    }

    /// Abort the in-flight fetch, if any. Data already loaded is kept.
    pub fn cancel(&self) {
        let mut in_flight = self.in_flight.lock();
        if let Some(handle) = in_flight.task.take() {
            handle.abort();
            let generation = self.state.borrow().generation();
            dispatch(&self.state, ResourceIntent::FetchCancelled { generation });
        }
    }
}

impl<T> Drop for RemoteResource<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.get_mut().task.take() {
            handle.abort();
        }
    }
}

fn dispatch<T>(state: &watch::Sender<ResourceState<T>>, intent: ResourceIntent<T>)
where
    T: Clone + PartialEq + Send + 'static,
{
    state.send_modify(|current| {
        let previous = std::mem::take(current);
        *current = ResourceReducer::<T>::reduce(previous, intent);
    });
}
