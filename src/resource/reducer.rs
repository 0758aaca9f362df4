use std::marker::PhantomData;

use crate::mvi::Reducer;

use super::intent::ResourceIntent;
use super::state::ResourceState;

pub struct ResourceReducer<T>(PhantomData<T>);

impl<T: Clone + PartialEq + Send + 'static> Reducer for ResourceReducer<T> {
    type State = ResourceState<T>;
    type Intent = ResourceIntent<T>;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            ResourceIntent::FetchStarted { generation } => {
                if generation <= state.generation {
                    return state;
                }
                ResourceState {
                    loading: true,
                    error: None,
                    generation,
                    ..state
                }
            }
            ResourceIntent::FetchSucceeded {
                generation,
                data,
                page,
            } => {
                if generation != state.generation {
                    return state;
                }
                ResourceState {
                    data: Some(data),
                    page,
                    loading: false,
                    error: None,
                    missing: false,
                    generation,
                }
            }
            ResourceIntent::FetchMissing { generation } => {
                if generation != state.generation {
                    return state;
                }
                ResourceState {
                    data: None,
                    page: None,
                    loading: false,
                    error: None,
                    missing: true,
                    generation,
                }
            }
            ResourceIntent::FetchFailed {
                generation,
                message,
            } => {
                if generation != state.generation {
                    return state;
                }
                // Keep whatever data we already had.
                ResourceState {
                    loading: false,
                    error: Some(message),
                    ..state
                }
            }
            ResourceIntent::FetchCancelled { generation } => {
                if generation != state.generation {
                    return state;
                }
                ResourceState {
                    loading: false,
                    ..state
                }
            }
            ResourceIntent::MutationSucceeded | ResourceIntent::ClearError => ResourceState {
                error: None,
                ..state
            },
            ResourceIntent::MutationFailed { message } => ResourceState {
                error: Some(message),
                ..state
            },
        }
    }
}
