/// Marker trait for intent objects.
///
/// Intents are either user actions (field edits, next/previous) or the
/// outcome of an async operation (fetch finished, submission failed).
pub trait Intent: Send + 'static {}
