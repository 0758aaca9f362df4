//! Remote list/detail resources with loading, error and pagination state.

mod handle;
mod intent;
mod reducer;
mod state;

pub use handle::{FetchTicket, Loaded, RemoteResource};
pub use intent::ResourceIntent;
pub use reducer::ResourceReducer;
pub use state::{ResourceState, ResourceStatus};
