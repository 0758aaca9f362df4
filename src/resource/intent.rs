use crate::api::PageMeta;
use crate::mvi::Intent;

#[derive(Debug, Clone)]
pub enum ResourceIntent<T> {
    FetchStarted { generation: u64 },
    FetchSucceeded {
        generation: u64,
        data: T,
        page: Option<PageMeta>,
    },
    /// The backend answered "not found".
    FetchMissing { generation: u64 },
    FetchFailed { generation: u64, message: String },
    /// The fetch was aborted before it settled.
    FetchCancelled { generation: u64 },
    MutationSucceeded,
    MutationFailed { message: String },
    ClearError,
}

impl<T: Send + 'static> Intent for ResourceIntent<T> {}
