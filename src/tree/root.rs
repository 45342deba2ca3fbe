use serde::Serialize;

use crate::core::effect::Effect;
use crate::core::presentation::{PresentationAction, PresentationSlot, SlotOutcome};
use crate::core::reducer::Reducer;
use crate::tree::child::{Child, ChildAction, ChildDestination, ChildState};
use crate::tree::grandchild::FirstGrandchildState;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RootDestination {
    Child(ChildState),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RootDestinationAction {
    Child(ChildAction),
}

pub struct RootDestinationReducer {
    child: Child,
}

impl Reducer for RootDestinationReducer {
    type State = RootDestination;
    type Action = RootDestinationAction;

    fn reduce(
        &self,
        state: &mut RootDestination,
        action: RootDestinationAction,
    ) -> Effect<RootDestinationAction> {
        match (state, action) {
            (RootDestination::Child(state), RootDestinationAction::Child(action)) => self
                .child
                .reduce(state, action)
                .map(RootDestinationAction::Child),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootState {
    pub destination: PresentationSlot<RootDestination>,
}

impl Default for RootState {
    fn default() -> Self {
        Self {
            destination: PresentationSlot::new("root.destination"),
        }
    }
}

impl RootState {
    pub fn child(&self) -> Option<&ChildState> {
        match self.destination.get() {
            Some(RootDestination::Child(child)) => Some(child),
            None => None,
        }
    }

    /// The grandchild currently on screen, if any.
    pub fn grandchild(&self) -> Option<&ChildDestination> {
        self.child().and_then(ChildState::grandchild)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RootAction {
    PresentChild,
    Destination(PresentationAction<RootDestinationAction>),
}

impl RootAction {
    /// Addresses `action` to the presented child.
    pub fn child(action: ChildAction) -> Self {
        RootAction::Destination(PresentationAction::Presented(RootDestinationAction::Child(
            action,
        )))
    }
}

pub struct Root {
    destination: RootDestinationReducer,
}

impl Root {
    pub fn new(child: Child) -> Self {
        Self {
            destination: RootDestinationReducer { child },
        }
    }
}

impl Reducer for Root {
    type State = RootState;
    type Action = RootAction;

    fn reduce(&self, state: &mut RootState, action: RootAction) -> Effect<RootAction> {
        match action {
            RootAction::PresentChild => {
                // Presented already nested: the child opens with its first
                // grandchild showing.
                state.destination.set(RootDestination::Child(ChildState::new(Some(
                    ChildDestination::FirstGrandchild(FirstGrandchildState::default()),
                ))));
                Effect::none()
            }
            RootAction::Destination(action) => {
                match state
                    .destination
                    .reduce(action, &self.destination, RootAction::Destination)
                {
                    SlotOutcome::Routed(effect) => effect,
                    SlotOutcome::Dismissed(_) | SlotOutcome::Ignored => Effect::none(),
                }
            }
        }
    }
}
