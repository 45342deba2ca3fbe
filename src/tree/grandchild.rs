//! # Grandchildren
//!
//! The two leaves of the tree. Neither knows who presented it; both close
//! themselves through a [`DismissRouter`].

use log::debug;
use serde::Serialize;

use crate::core::dismiss::DismissRouter;
use crate::core::effect::{CancelId, Effect};
use crate::core::reducer::Reducer;

// ── First grandchild ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FirstGrandchildState {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FirstGrandchildAction {
    /// The view became active. Starts a job that lives until the grandchild
    /// goes away.
    Task,
    TappedDismiss,
}

/// Cancel id of the long-lived `Task` job.
pub const FIRST_GRANDCHILD_TASK: CancelId = CancelId("first-grandchild.task");

#[derive(Debug, Default)]
pub struct FirstGrandchild {
    dismiss: DismissRouter,
}

impl Reducer for FirstGrandchild {
    type State = FirstGrandchildState;
    type Action = FirstGrandchildAction;

    fn reduce(
        &self,
        _state: &mut FirstGrandchildState,
        action: FirstGrandchildAction,
    ) -> Effect<FirstGrandchildAction> {
        match action {
            FirstGrandchildAction::Task => {
                debug!("First grandchild task started");
                Effect::run(|_| std::future::pending::<()>()).cancellable(FIRST_GRANDCHILD_TASK)
            }
            FirstGrandchildAction::TappedDismiss => self.dismiss.request(),
        }
    }
}

// ── Second grandchild ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SecondGrandchildState {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SecondGrandchildAction {
    TappedDismiss,
}

#[derive(Debug, Default)]
pub struct SecondGrandchild {
    dismiss: DismissRouter,
}

impl Reducer for SecondGrandchild {
    type State = SecondGrandchildState;
    type Action = SecondGrandchildAction;

    fn reduce(
        &self,
        _state: &mut SecondGrandchildState,
        action: SecondGrandchildAction,
    ) -> Effect<SecondGrandchildAction> {
        match action {
            SecondGrandchildAction::TappedDismiss => self.dismiss.request(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_task_is_cancellable_job() {
        let effect = FirstGrandchild::default().reduce(
            &mut FirstGrandchildState::default(),
            FirstGrandchildAction::Task,
        );
        assert!(matches!(
            effect,
            Effect::Run {
                cancel_id: Some(FIRST_GRANDCHILD_TASK),
                ..
            }
        ));
    }

    #[test]
    fn test_tapped_dismiss_requests_dismissal() {
        let first = FirstGrandchild::default().reduce(
            &mut FirstGrandchildState::default(),
            FirstGrandchildAction::TappedDismiss,
        );
        assert!(matches!(first, Effect::Dismiss));

        let second = SecondGrandchild::default().reduce(
            &mut SecondGrandchildState::default(),
            SecondGrandchildAction::TappedDismiss,
        );
        assert!(matches!(second, Effect::Dismiss));
    }
}
