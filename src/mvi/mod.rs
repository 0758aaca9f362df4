//! Model-View-Intent primitives shared by the wizard and remote resources.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ caller (CLI, renderer)
//!    ↑                                │
//!    └────────────────────────────────┘
//! ```
//!
//! - **State**: plain data describing what the caller should show
//! - **Intent**: a user action or a completed side effect (fetch, submit)
//! - **Reducer**: pure function producing the next state
//!
//! Side effects (HTTP, timers) live outside reducers; their outcomes come
//! back in as intents.

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::{reduce_all, Reducer};
pub use state::UiState;
