//! # Presentation Slots
//!
//! A `PresentationSlot<T>` is a parent-owned "maybe a child" field, the
//! thing a sheet or modal is rendered from. It adds two pieces of
//! bookkeeping on top of `Option<T>`:
//!
//! - a **generation** counter that moves every time the occupant changes;
//! - a [`Scope`] for the current generation, which tags every effect the
//!   child produces and dies when the child does.
//!
//! ```text
//! Absent ──set──► Present(g+1) ──Dismiss──► Absent(g+2) ──set──► Present(g+3) …
//!                     │
//!                     └── Presented(a) routes into the child reducer
//! ```
//!
//! Parents handle their slot's actions through [`PresentationSlot::reduce`]
//! and match on the returned [`SlotOutcome`]. A dismissal hands back the
//! occupant that was just removed, so the parent can branch on which child
//! went away without the slot ever being observable half-cleared.

use std::fmt;

use log::{debug, info};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::core::effect::Effect;
use crate::core::reducer::Reducer;
use crate::core::scope::Scope;

/// Parent-side view of a slot's traffic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PresentationAction<A> {
    /// An action for the live child.
    Presented(A),
    /// The child asked to go away (or the parent is closing it).
    Dismiss,
}

/// Result of running a slot action.
#[derive(Debug)]
pub enum SlotOutcome<P, T> {
    /// The child handled the action; its effect is already lifted into `P`.
    Routed(Effect<P>),
    /// The slot was just cleared. Carries the former occupant.
    Dismissed(T),
    /// No live child to act on. Not an error: stale actions land here.
    Ignored,
}

#[derive(Clone)]
pub struct PresentationSlot<T> {
    name: &'static str,
    content: Option<T>,
    generation: u64,
    scope: Scope,
}

impl<T> PresentationSlot<T> {
    /// An empty slot. `name` only shows up in logs and lineage dumps.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            content: None,
            generation: 0,
            scope: Scope::new(name, 0),
        }
    }

    /// A slot that starts out presenting `value`.
    pub fn presenting(name: &'static str, value: T) -> Self {
        let mut slot = Self::new(name);
        slot.set(value);
        slot
    }

    pub fn get(&self) -> Option<&T> {
        self.content.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.content.as_mut()
    }

    pub fn is_presented(&self) -> bool {
        self.content.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Presents `value`, replacing (and cancelling) whatever was there.
    pub fn set(&mut self, value: T) {
        self.advance(self.content.is_some());
        self.content = Some(value);
    }

    /// Empties the slot. Returns the removed occupant, which is the one and
    /// only dismiss notification for it. Clearing an empty slot is a no-op.
    pub fn clear(&mut self) -> Option<T> {
        let previous = self.content.take()?;
        self.advance(true);
        Some(previous)
    }

    fn advance(&mut self, retiring: bool) {
        self.scope.cancel();
        if retiring {
            info!(
                "{}: generation {} retired, cancelling its effects",
                self.name, self.generation
            );
        }
        self.generation += 1;
        self.scope = Scope::new(self.name, self.generation);
    }

    /// Runs a slot action against the child reducer.
    ///
    /// `embed` wraps child-level presentation actions back into the parent's
    /// action type. It is used for every action the child's effects emit,
    /// including dismiss requests.
    pub fn reduce<R, P, E>(
        &mut self,
        action: PresentationAction<R::Action>,
        reducer: &R,
        embed: E,
    ) -> SlotOutcome<P, T>
    where
        R: Reducer<State = T>,
        E: Fn(PresentationAction<R::Action>) -> P + Clone + Send + Sync + 'static,
        P: Send + 'static,
    {
        match action {
            PresentationAction::Presented(action) => match self.content.as_mut() {
                Some(child) => {
                    let effect = reducer.reduce(child, action);
                    SlotOutcome::Routed(effect.presented_under(self.scope.clone(), embed))
                }
                None => {
                    debug!("{}: nothing presented, dropping child action", self.name);
                    SlotOutcome::Ignored
                }
            },
            PresentationAction::Dismiss => match self.clear() {
                Some(previous) => SlotOutcome::Dismissed(previous),
                None => {
                    debug!("{}: dismiss with nothing presented, ignoring", self.name);
                    SlotOutcome::Ignored
                }
            },
        }
    }
}

/// Compares content only. Generation and scope are bookkeeping.
impl<T: PartialEq> PartialEq for PresentationSlot<T> {
    fn eq(&self, other: &Self) -> bool {
        self.content == other.content
    }
}

impl<T: Eq> Eq for PresentationSlot<T> {}

impl<T: fmt::Debug> fmt::Debug for PresentationSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationSlot")
            .field("name", &self.name)
            .field("generation", &self.generation)
            .field("content", &self.content)
            .finish()
    }
}

impl<T: Serialize> Serialize for PresentationSlot<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("PresentationSlot", 2)?;
        s.serialize_field("generation", &self.generation)?;
        s.serialize_field("presented", &self.content)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dismiss::DismissRouter;

    #[derive(Debug, Clone, PartialEq)]
    struct Counter {
        count: u32,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum CounterAction {
        Increment,
        Close,
    }

    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = Counter;
        type Action = CounterAction;

        fn reduce(&self, state: &mut Counter, action: CounterAction) -> Effect<CounterAction> {
            match action {
                CounterAction::Increment => {
                    state.count += 1;
                    Effect::none()
                }
                CounterAction::Close => DismissRouter.request(),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum ParentAction {
        Counter(PresentationAction<CounterAction>),
    }

    #[test]
    fn test_set_and_clear_advance_generation() {
        let mut slot = PresentationSlot::new("counter");
        assert_eq!(slot.generation(), 0);
        assert!(!slot.is_presented());

        slot.set(Counter { count: 0 });
        assert_eq!(slot.generation(), 1);

        slot.set(Counter { count: 7 });
        assert_eq!(slot.generation(), 2);
        assert_eq!(slot.get(), Some(&Counter { count: 7 }));

        assert_eq!(slot.clear(), Some(Counter { count: 7 }));
        assert_eq!(slot.generation(), 3);
        assert!(!slot.is_presented());
    }

    #[test]
    fn test_clear_on_empty_slot_emits_nothing() {
        let mut slot: PresentationSlot<Counter> = PresentationSlot::new("counter");
        assert_eq!(slot.clear(), None);
        assert_eq!(slot.generation(), 0);
    }

    #[test]
    fn test_retired_generation_scope_is_dead() {
        let mut slot = PresentationSlot::presenting("counter", Counter { count: 0 });
        let old_scope = slot.scope.clone();
        assert!(old_scope.is_live());

        slot.clear();
        assert!(!old_scope.is_live());
        assert!(slot.scope.is_live());
    }

    #[test]
    fn test_presented_action_reaches_live_child() {
        let mut slot = PresentationSlot::presenting("counter", Counter { count: 0 });
        let outcome = slot.reduce(
            PresentationAction::Presented(CounterAction::Increment),
            &CounterReducer,
            ParentAction::Counter,
        );
        assert!(matches!(outcome, SlotOutcome::Routed(ref e) if e.is_none()));
        assert_eq!(slot.get(), Some(&Counter { count: 1 }));
    }

    #[test]
    fn test_presented_action_to_absent_slot_is_ignored() {
        let mut slot: PresentationSlot<Counter> = PresentationSlot::new("counter");
        let outcome = slot.reduce(
            PresentationAction::Presented(CounterAction::Increment),
            &CounterReducer,
            ParentAction::Counter,
        );
        assert!(matches!(outcome, SlotOutcome::Ignored));
        assert_eq!(slot.generation(), 0);
    }

    #[test]
    fn test_child_dismiss_request_becomes_scoped_parent_action() {
        let mut slot = PresentationSlot::presenting("counter", Counter { count: 0 });
        let outcome = slot.reduce(
            PresentationAction::Presented(CounterAction::Close),
            &CounterReducer,
            ParentAction::Counter,
        );
        let SlotOutcome::Routed(Effect::Send { action, lineage }) = outcome else {
            panic!("expected a routed Send");
        };
        assert_eq!(action, ParentAction::Counter(PresentationAction::Dismiss));
        assert!(lineage.is_live());

        // The request dies with the generation that made it.
        slot.set(Counter { count: 9 });
        assert!(!lineage.is_live());
    }

    #[test]
    fn test_dismiss_hands_back_previous_occupant_once() {
        let mut slot = PresentationSlot::presenting("counter", Counter { count: 3 });
        let first = slot.reduce(
            PresentationAction::Dismiss,
            &CounterReducer,
            ParentAction::Counter,
        );
        assert!(matches!(first, SlotOutcome::Dismissed(Counter { count: 3 })));
        assert!(!slot.is_presented());

        let second = slot.reduce(
            PresentationAction::Dismiss,
            &CounterReducer,
            ParentAction::Counter,
        );
        assert!(matches!(second, SlotOutcome::Ignored));
    }

    #[test]
    fn test_equality_ignores_generation() {
        let mut a = PresentationSlot::presenting("counter", Counter { count: 1 });
        let b = PresentationSlot::presenting("counter", Counter { count: 1 });
        a.set(Counter { count: 1 });
        assert_ne!(a.generation(), b.generation());
        assert_eq!(a, b);
    }

    #[test]
    fn test_serializes_generation_and_content() {
        #[derive(Serialize)]
        struct Sheet {
            title: &'static str,
        }
        let slot = PresentationSlot::presenting("sheet", Sheet { title: "hi" });
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["generation"], 1);
        assert_eq!(json["presented"]["title"], "hi");

        let empty: PresentationSlot<Sheet> = PresentationSlot::new("sheet");
        let json = serde_json::to_value(&empty).unwrap();
        assert!(json["presented"].is_null());
    }
}
