use crate::api::PageMeta;
use crate::mvi::UiState;

/// Coarse status for callers that only need to pick a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceStatus {
    /// Nothing requested yet.
    Idle,
    Loading,
    Ready,
    /// Last fetch failed; `data` may still hold an older result.
    Failed,
    /// The backend says the record does not exist.
    Missing,
}

/// Data, pagination and loading/error flags for one remote resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    pub(super) data: Option<T>,
    pub(super) page: Option<PageMeta>,
    pub(super) loading: bool,
    pub(super) error: Option<String>,
    pub(super) missing: bool,
    /// Generation of the newest fetch started.
    pub(super) generation: u64,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            data: None,
            page: None,
            loading: false,
            error: None,
            missing: false,
            generation: 0,
        }
    }
}

impl<T: Clone + PartialEq + Send + 'static> UiState for ResourceState<T> {}

impl<T> ResourceState<T> {
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn page(&self) -> Option<PageMeta> {
        self.page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_missing(&self) -> bool {
        self.missing
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn status(&self) -> ResourceStatus {
        if self.loading {
            ResourceStatus::Loading
        } else if self.missing {
            ResourceStatus::Missing
        } else if self.error.is_some() {
            ResourceStatus::Failed
        } else if self.data.is_some() {
            ResourceStatus::Ready
        } else {
            ResourceStatus::Idle
        }
    }
}
