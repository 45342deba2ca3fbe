use crate::core::effect::Effect;

/// A pure state transition for one level of the tree.
///
/// `reduce` mutates `state` in place and describes follow-up work as an
/// [`Effect`]. It must not block or suspend; anything asynchronous goes in
/// an `Effect::run` job.
pub trait Reducer: Send + Sync + 'static {
    type State;
    type Action: Send + 'static;

    fn reduce(&self, state: &mut Self::State, action: Self::Action) -> Effect<Self::Action>;
}
