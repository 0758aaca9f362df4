use super::intent::Intent;
use super::state::UiState;

/// Reducer transforms state based on intents.
///
/// The reducer is the only place where state transitions happen.
/// It must be a pure function: (State, Intent) -> State
pub trait Reducer {
    type State: UiState;
    type Intent: Intent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}

/// Fold a sequence of intents through a reducer.
pub fn reduce_all<R, I>(state: R::State, intents: I) -> R::State
where
    R: Reducer,
    I: IntoIterator<Item = R::Intent>,
{
    intents.into_iter().fold(state, R::reduce)
}
