//! # Effects
//!
//! Reducers never do I/O. They return an `Effect` describing what should
//! happen next, and the runtime executes it:
//!
//! ```text
//! State + Action  →  reduce()  →  Effect
//!                                   │
//!                 ┌─────────────────┼──────────────────┐
//!                 ▼                 ▼                  ▼
//!           Send(action)      Run(async job)      Cancel / Dismiss
//!         (same step, sync)  (tokio task, feeds
//!                             actions back in)
//! ```
//!
//! Each effect that can deliver an action carries a [`Lineage`]. When a
//! presentation slot lifts a child's effect into the parent's action type it
//! also tags it with the slot's current scope, so the runtime can drop the
//! effect once that child is gone.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::core::presentation::PresentationAction;
use crate::core::scope::{Lineage, Scope};

/// What a running job hands back to the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal<A> {
    Action(A),
    /// "Close whatever presented me." Resolved by the nearest enclosing slot.
    Dismiss,
}

/// Handle passed into a running job for feeding actions back into the store.
///
/// Cloneable and `Send`, so jobs can hand it to their own sub-tasks.
pub struct EffectSender<A> {
    deliver: Arc<dyn Fn(Signal<A>) -> bool + Send + Sync>,
}

impl<A> Clone for EffectSender<A> {
    fn clone(&self) -> Self {
        Self {
            deliver: self.deliver.clone(),
        }
    }
}

impl<A> EffectSender<A> {
    pub fn new(deliver: impl Fn(Signal<A>) -> bool + Send + Sync + 'static) -> Self {
        Self {
            deliver: Arc::new(deliver),
        }
    }

    /// Returns false if the action was refused: its owner was dismissed
    /// or the runtime has shut down.
    pub fn send(&self, action: A) -> bool {
        (self.deliver)(Signal::Action(action))
    }

    /// Asks the enclosing presentation slot to clear this job's owner.
    pub fn dismiss(&self) -> bool {
        (self.deliver)(Signal::Dismiss)
    }

    pub(crate) fn deliver(&self, signal: Signal<A>) -> bool {
        (self.deliver)(signal)
    }
}

/// Identifier for cancelling a long-lived job on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CancelId(pub &'static str);

pub type Job<A> = Box<dyn FnOnce(EffectSender<A>) -> BoxFuture<'static, ()> + Send>;

pub enum Effect<A> {
    None,
    /// Follow-up action applied right after the current one, before anything
    /// else queued in the store.
    Send { action: A, lineage: Lineage },
    Run {
        job: Job<A>,
        lineage: Lineage,
        cancel_id: Option<CancelId>,
    },
    Cancel { id: CancelId, lineage: Lineage },
    /// Synchronous dismiss request; see [`DismissRouter`](crate::core::dismiss::DismissRouter).
    Dismiss,
    Merge(Vec<Effect<A>>),
}

impl<A> fmt::Debug for Effect<A>
where
    A: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::None => write!(f, "Effect::None"),
            Effect::Send { action, lineage } => f
                .debug_struct("Effect::Send")
                .field("action", action)
                .field("lineage", lineage)
                .finish(),
            Effect::Run {
                lineage, cancel_id, ..
            } => f
                .debug_struct("Effect::Run")
                .field("lineage", lineage)
                .field("cancel_id", cancel_id)
                .finish_non_exhaustive(),
            Effect::Cancel { id, lineage } => f
                .debug_struct("Effect::Cancel")
                .field("id", id)
                .field("lineage", lineage)
                .finish(),
            Effect::Dismiss => write!(f, "Effect::Dismiss"),
            Effect::Merge(effects) => f.debug_tuple("Effect::Merge").field(effects).finish(),
        }
    }
}

impl<A> Effect<A> {
    pub fn none() -> Self {
        Effect::None
    }

    pub fn send(action: A) -> Self {
        Effect::Send {
            action,
            lineage: Lineage::root(),
        }
    }

    /// Spawns `job` on the runtime. The job may send any number of actions.
    pub fn run<F, Fut>(job: F) -> Self
    where
        F: FnOnce(EffectSender<A>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Effect::Run {
            job: Box::new(move |sender: EffectSender<A>| job(sender).boxed()),
            lineage: Lineage::root(),
            cancel_id: None,
        }
    }

    pub fn cancel(id: CancelId) -> Self {
        Effect::Cancel {
            id,
            lineage: Lineage::root(),
        }
    }

    pub fn merge(effects: Vec<Effect<A>>) -> Self {
        Effect::Merge(effects)
    }

    pub(crate) fn dismiss_request() -> Self {
        Effect::Dismiss
    }

    /// Tags every job in this effect so it can be cancelled with [`Effect::cancel`].
    pub fn cancellable(self, id: CancelId) -> Self {
        match self {
            Effect::Run { job, lineage, .. } => Effect::Run {
                job,
                lineage,
                cancel_id: Some(id),
            },
            Effect::Merge(effects) => {
                Effect::Merge(effects.into_iter().map(|e| e.cancellable(id)).collect())
            }
            other => other,
        }
    }

    pub fn is_none(&self) -> bool {
        match self {
            Effect::None => true,
            Effect::Merge(effects) => effects.iter().all(Effect::is_none),
            _ => false,
        }
    }
}

impl<A: Send + 'static> Effect<A> {
    /// Lifts this effect into another action type. Dismiss requests pass
    /// through untouched, to be resolved by the nearest slot.
    pub fn map<B, F>(self, f: F) -> Effect<B>
    where
        F: Fn(A) -> B + Clone + Send + Sync + 'static,
        B: Send + 'static,
    {
        self.translate(
            move |signal| match signal {
                Signal::Action(a) => Signal::Action(f(a)),
                Signal::Dismiss => Signal::Dismiss,
            },
            None,
        )
    }

    /// Lifts a presented child's effect into its parent. Child actions become
    /// `embed(Presented(_))`, dismiss requests become `embed(Dismiss)`, and
    /// everything is tagged with the slot's current scope.
    pub(crate) fn presented_under<P, E>(self, scope: Scope, embed: E) -> Effect<P>
    where
        E: Fn(PresentationAction<A>) -> P + Clone + Send + Sync + 'static,
        P: Send + 'static,
    {
        self.translate(
            move |signal| {
                Signal::Action(embed(match signal {
                    Signal::Action(a) => PresentationAction::Presented(a),
                    Signal::Dismiss => PresentationAction::Dismiss,
                }))
            },
            Some(scope),
        )
    }

    fn translate<B, T>(self, translate: T, scope: Option<Scope>) -> Effect<B>
    where
        T: Fn(Signal<A>) -> Signal<B> + Clone + Send + Sync + 'static,
        B: Send + 'static,
    {
        let tag = |lineage: Lineage| match &scope {
            Some(scope) => lineage.within(scope.clone()),
            None => lineage,
        };
        match self {
            Effect::None => Effect::None,
            Effect::Send { action, lineage } => match translate(Signal::Action(action)) {
                Signal::Action(action) => Effect::Send {
                    action,
                    lineage: tag(lineage),
                },
                Signal::Dismiss => Effect::Dismiss,
            },
            Effect::Dismiss => match translate(Signal::Dismiss) {
                Signal::Action(action) => Effect::Send {
                    action,
                    lineage: tag(Lineage::root()),
                },
                Signal::Dismiss => Effect::Dismiss,
            },
            Effect::Run {
                job,
                lineage,
                cancel_id,
            } => Effect::Run {
                job: Box::new(move |outer: EffectSender<B>| {
                    let inner = EffectSender::new(move |signal| outer.deliver(translate(signal)));
                    job(inner)
                }),
                lineage: tag(lineage),
                cancel_id,
            },
            Effect::Cancel { id, lineage } => Effect::Cancel {
                id,
                lineage: tag(lineage),
            },
            Effect::Merge(effects) => Effect::Merge(
                effects
                    .into_iter()
                    .map(|e| e.translate(translate.clone(), scope.clone()))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Inner {
        Ping,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Outer {
        Inner(Inner),
        Slot(PresentationAction<Inner>),
    }

    fn recording_sender<A: Send + 'static>() -> (EffectSender<A>, Arc<Mutex<Vec<Signal<A>>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let sender = EffectSender::new(move |signal| {
            sink.lock().unwrap().push(signal);
            true
        });
        (sender, seen)
    }

    #[test]
    fn test_none_and_empty_merge_are_none() {
        assert!(Effect::<Inner>::none().is_none());
        assert!(Effect::<Inner>::merge(vec![Effect::none(), Effect::none()]).is_none());
        assert!(!Effect::send(Inner::Ping).is_none());
    }

    #[test]
    fn test_map_keeps_dismiss_for_the_nearest_slot() {
        let mapped = Effect::<Inner>::dismiss_request().map(Outer::Inner);
        assert!(matches!(mapped, Effect::Dismiss));
    }

    #[test]
    fn test_presented_under_turns_dismiss_into_parent_action() {
        let scope = Scope::new("slot", 1);
        let lifted = Effect::<Inner>::dismiss_request().presented_under(scope.clone(), Outer::Slot);
        match lifted {
            Effect::Send { action, lineage } => {
                assert_eq!(action, Outer::Slot(PresentationAction::Dismiss));
                assert!(lineage.same_as(&Lineage::root().within(scope)));
            }
            other => panic!("expected Send, got {other:?}"),
        }
    }

    #[test]
    fn test_cancellable_tags_nested_jobs() {
        let effect = Effect::<Inner>::merge(vec![
            Effect::run(|_| async {}),
            Effect::send(Inner::Ping),
        ])
        .cancellable(CancelId("tick"));
        let Effect::Merge(effects) = effect else {
            panic!("merge expected");
        };
        assert!(matches!(
            effects[0],
            Effect::Run {
                cancel_id: Some(CancelId("tick")),
                ..
            }
        ));
        assert!(matches!(effects[1], Effect::Send { .. }));
    }

    #[tokio::test]
    async fn test_lifted_job_sends_through_embedding() {
        let scope = Scope::new("slot", 4);
        let effect = Effect::<Inner>::run(|send| async move {
            send.send(Inner::Ping);
            send.dismiss();
        })
        .presented_under(scope, Outer::Slot);

        let Effect::Run { job, lineage, .. } = effect else {
            panic!("run expected");
        };
        assert_eq!(lineage.depth(), 1);

        let (sender, seen) = recording_sender::<Outer>();
        job(sender).await;
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                Signal::Action(Outer::Slot(PresentationAction::Presented(Inner::Ping))),
                Signal::Action(Outer::Slot(PresentationAction::Dismiss)),
            ]
        );
    }
}
