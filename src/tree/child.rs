//! # Child
//!
//! Middle level of the tree. Owns one slot that holds either grandchild,
//! never both. Dismissing the first grandchild chains into presenting the
//! second one in the same slot; dismissing the second ends there.
//!
//! ```text
//! [First] ──TappedDismiss──► Dismiss (slot cleared) ──(delay)──► PresentSecondGrandchild ──► [Second]
//! [Second] ──TappedDismiss──► Dismiss (slot cleared)
//! ```

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use serde::Serialize;

use crate::core::effect::Effect;
use crate::core::presentation::{PresentationAction, PresentationSlot, SlotOutcome};
use crate::core::reducer::Reducer;
use crate::runtime::Clock;
use crate::tree::grandchild::{
    FirstGrandchild, FirstGrandchildAction, FirstGrandchildState, SecondGrandchild,
    SecondGrandchildAction, SecondGrandchildState,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildDestination {
    FirstGrandchild(FirstGrandchildState),
    SecondGrandchild(SecondGrandchildState),
}

impl ChildDestination {
    pub fn label(&self) -> &'static str {
        match self {
            ChildDestination::FirstGrandchild(_) => "First Grandchild",
            ChildDestination::SecondGrandchild(_) => "Second Grandchild",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildDestinationAction {
    FirstGrandchild(FirstGrandchildAction),
    SecondGrandchild(SecondGrandchildAction),
}

/// Routes grandchild actions to whichever grandchild is live.
#[derive(Debug, Default)]
pub struct ChildDestinationReducer {
    first: FirstGrandchild,
    second: SecondGrandchild,
}

impl Reducer for ChildDestinationReducer {
    type State = ChildDestination;
    type Action = ChildDestinationAction;

    fn reduce(
        &self,
        state: &mut ChildDestination,
        action: ChildDestinationAction,
    ) -> Effect<ChildDestinationAction> {
        match (state, action) {
            (
                ChildDestination::FirstGrandchild(state),
                ChildDestinationAction::FirstGrandchild(action),
            ) => self
                .first
                .reduce(state, action)
                .map(ChildDestinationAction::FirstGrandchild),
            (
                ChildDestination::SecondGrandchild(state),
                ChildDestinationAction::SecondGrandchild(action),
            ) => self
                .second
                .reduce(state, action)
                .map(ChildDestinationAction::SecondGrandchild),
            (state, action) => {
                debug!("{:?} does not apply to {}, dropping", action, state.label());
                Effect::none()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildState {
    pub destination: PresentationSlot<ChildDestination>,
}

impl ChildState {
    /// A child, optionally already presenting a grandchild.
    pub fn new(destination: Option<ChildDestination>) -> Self {
        let destination = match destination {
            Some(value) => PresentationSlot::presenting("child.destination", value),
            None => PresentationSlot::new("child.destination"),
        };
        Self { destination }
    }

    pub fn grandchild(&self) -> Option<&ChildDestination> {
        self.destination.get()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ChildAction {
    PresentFirstGrandchild,
    PresentSecondGrandchild,
    Destination(PresentationAction<ChildDestinationAction>),
}

impl ChildAction {
    pub fn first_grandchild(action: FirstGrandchildAction) -> Self {
        ChildAction::Destination(PresentationAction::Presented(
            ChildDestinationAction::FirstGrandchild(action),
        ))
    }

    pub fn second_grandchild(action: SecondGrandchildAction) -> Self {
        ChildAction::Destination(PresentationAction::Presented(
            ChildDestinationAction::SecondGrandchild(action),
        ))
    }
}

pub struct Child {
    destination: ChildDestinationReducer,
    clock: Arc<dyn Clock>,
    chain_delay: Duration,
}

impl Child {
    /// `chain_delay` is how long to wait between the first grandchild going
    /// away and the second one appearing.
    pub fn new(clock: Arc<dyn Clock>, chain_delay: Duration) -> Self {
        Self {
            destination: ChildDestinationReducer::default(),
            clock,
            chain_delay,
        }
    }

    fn present_second_grandchild_later(&self) -> Effect<ChildAction> {
        let clock = self.clock.clone();
        let delay = self.chain_delay;
        Effect::run(move |send| async move {
            clock.sleep(delay).await;
            send.send(ChildAction::PresentSecondGrandchild);
        })
    }
}

impl Reducer for Child {
    type State = ChildState;
    type Action = ChildAction;

    fn reduce(&self, state: &mut ChildState, action: ChildAction) -> Effect<ChildAction> {
        match action {
            ChildAction::PresentFirstGrandchild => {
                state
                    .destination
                    .set(ChildDestination::FirstGrandchild(FirstGrandchildState::default()));
                Effect::none()
            }
            ChildAction::PresentSecondGrandchild => {
                state
                    .destination
                    .set(ChildDestination::SecondGrandchild(SecondGrandchildState::default()));
                Effect::none()
            }
            ChildAction::Destination(action) => {
                match state
                    .destination
                    .reduce(action, &self.destination, ChildAction::Destination)
                {
                    SlotOutcome::Routed(effect) => effect,
                    SlotOutcome::Dismissed(ChildDestination::FirstGrandchild(_)) => {
                        info!(
                            "First grandchild dismissed, presenting the second in {:?}",
                            self.chain_delay
                        );
                        self.present_second_grandchild_later()
                    }
                    SlotOutcome::Dismissed(ChildDestination::SecondGrandchild(_)) => {
                        info!("Second grandchild dismissed");
                        Effect::none()
                    }
                    SlotOutcome::Ignored => Effect::none(),
                }
            }
        }
    }
}
