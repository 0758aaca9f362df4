/// Marker trait for state objects driven by a [`Reducer`](super::Reducer).
///
/// States are cloned to produce new states and compared to detect changes.
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}
