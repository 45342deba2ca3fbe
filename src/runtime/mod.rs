//! # Runtime
//!
//! Drives the action loop for one reducer tree.
//!
//! ```text
//!   send(action) ──┐                        ┌── spawned jobs (tokio)
//!                  ▼                        │      │
//!             ┌─────────┐   Effect::Run ────┘      │ EffectSender::send
//!   inbox ───►│ process │                          ▼
//!   (mpsc)    └────┬────┘◄──────────────────── inbox (same channel)
//!                  │
//!                  ▼
//!         Vec<Transition>  (action + state after it, in order)
//! ```
//!
//! `process` applies one action and every synchronous follow-up it causes
//! (`Effect::Send`, including synthesized dismissals) before returning, so
//! no two transitions interleave. Jobs run concurrently on tokio and post
//! their actions back through the inbox.
//!
//! ## Stale effects
//!
//! Every job and every queued action carries the [`Lineage`] it was
//! produced under. Liveness is checked three times: when a job is spawned,
//! when its sender delivers, and when the delivered action is dequeued. The
//! last check closes the race where a job finishes just as its owner is
//! dismissed. After each transition the runtime also aborts any running job
//! whose lineage died, which is how dismissing a subtree cancels everything
//! beneath it.

pub mod clock;
pub mod store;

use std::collections::VecDeque;
use std::fmt;

use log::{debug, info, trace, warn};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::core::effect::{CancelId, Effect, EffectSender, Signal};
use crate::core::reducer::Reducer;
use crate::core::scope::Lineage;

pub use clock::{Clock, TokioClock};
pub use store::{Store, StoreOptions};

/// One applied action and the state right after it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition<S, A> {
    pub action: A,
    pub state: S,
}

/// Change-log line: the action, then the state it produced.
impl<S: fmt::Debug, A: fmt::Debug> fmt::Display for Transition<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "received action:\n  {:?}\nresulting state:\n  {:#?}",
            self.action, self.state
        )
    }
}

pub(crate) struct Envelope<A> {
    action: A,
    lineage: Lineage,
}

/// Cloneable, thread-safe entry point for external actions.
pub struct StoreSender<A> {
    inbox: mpsc::UnboundedSender<Envelope<A>>,
}

impl<A> Clone for StoreSender<A> {
    fn clone(&self) -> Self {
        Self {
            inbox: self.inbox.clone(),
        }
    }
}

impl<A> StoreSender<A> {
    /// Queues `action`. Returns false if the runtime is gone.
    pub fn send(&self, action: A) -> bool {
        let sent = self
            .inbox
            .send(Envelope {
                action,
                lineage: Lineage::root(),
            })
            .is_ok();
        if !sent {
            warn!("Action sent after the runtime shut down; dropping it");
        }
        sent
    }
}

struct InFlight {
    lineage: Lineage,
    cancel_id: Option<CancelId>,
    handle: AbortHandle,
}

pub struct Runtime<R: Reducer> {
    reducer: R,
    state: R::State,
    inbox_tx: mpsc::UnboundedSender<Envelope<R::Action>>,
    inbox_rx: mpsc::UnboundedReceiver<Envelope<R::Action>>,
    in_flight: Vec<InFlight>,
}

impl<R> Runtime<R>
where
    R: Reducer,
    R::State: Clone + fmt::Debug,
    R::Action: Clone + fmt::Debug,
{
    pub fn new(reducer: R, state: R::State) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            reducer,
            state,
            inbox_tx,
            inbox_rx,
            in_flight: Vec::new(),
        }
    }

    pub fn state(&self) -> &R::State {
        &self.state
    }

    pub fn sender(&self) -> StoreSender<R::Action> {
        StoreSender {
            inbox: self.inbox_tx.clone(),
        }
    }

    /// Number of jobs still running.
    pub fn in_flight(&mut self) -> usize {
        self.reap();
        self.in_flight.len()
    }

    /// Applies an external action and all of its synchronous follow-ups.
    ///
    /// Must be called from within a tokio runtime, since effects are spawned
    /// onto it.
    pub fn send(&mut self, action: R::Action) -> Vec<Transition<R::State, R::Action>> {
        self.process(Envelope {
            action,
            lineage: Lineage::root(),
        })
    }

    /// Waits for the next live action delivered by a job (or by a
    /// [`StoreSender`]) and applies it. Stale deliveries are skipped.
    pub async fn next(&mut self) -> Vec<Transition<R::State, R::Action>> {
        while let Some(envelope) = self.inbox_rx.recv().await {
            let transitions = self.process(envelope);
            if !transitions.is_empty() {
                return transitions;
            }
        }
        Vec::new()
    }

    /// Applies everything already waiting in the inbox without suspending.
    pub fn drain(&mut self) -> Vec<Transition<R::State, R::Action>> {
        let mut transitions = Vec::new();
        while let Ok(envelope) = self.inbox_rx.try_recv() {
            transitions.extend(self.process(envelope));
        }
        transitions
    }

    /// Aborts every running job. The state is left as is.
    pub fn shutdown(&mut self) {
        if !self.in_flight.is_empty() {
            info!("Runtime shutting down, aborting {} jobs", self.in_flight.len());
        }
        for job in self.in_flight.drain(..) {
            job.handle.abort();
        }
    }

    /// Processes inbox traffic until the task is aborted, publishing after
    /// every batch.
    pub(crate) async fn run<F>(mut self, mut publish: F)
    where
        F: FnMut(&[Transition<R::State, R::Action>], &R::State),
    {
        while let Some(envelope) = self.inbox_rx.recv().await {
            let transitions = self.process(envelope);
            if !transitions.is_empty() {
                publish(&transitions, &self.state);
            }
        }
    }

    fn process(&mut self, envelope: Envelope<R::Action>) -> Vec<Transition<R::State, R::Action>> {
        let mut transitions = Vec::new();
        let mut queue = VecDeque::from([envelope]);

        while let Some(Envelope { action, lineage }) = queue.pop_front() {
            if !lineage.is_live() {
                debug!("Dropping stale action {:?} from {:?}", action, lineage);
                continue;
            }
            debug!("Applying {:?}", action);
            let effect = self.reducer.reduce(&mut self.state, action.clone());
            let transition = Transition {
                action,
                state: self.state.clone(),
            };
            trace!("{}", transition);
            transitions.push(transition);
            // Cancel before scheduling, so a dismissed child's jobs are gone
            // before anything spawned in reaction to the dismissal starts.
            self.reap();
            self.schedule(effect, &mut queue);
        }

        transitions
    }

    fn schedule(&mut self, effect: Effect<R::Action>, queue: &mut VecDeque<Envelope<R::Action>>) {
        match effect {
            Effect::None => {}
            Effect::Send { action, lineage } => queue.push_back(Envelope { action, lineage }),
            Effect::Run {
                job,
                lineage,
                cancel_id,
            } => {
                if !lineage.is_live() {
                    debug!("Not spawning job for dead lineage {:?}", lineage);
                    return;
                }
                debug!("Spawning job {:?} under {:?}", cancel_id, lineage);
                let handle = tokio::spawn(job(self.effect_sender(lineage.clone())));
                self.in_flight.push(InFlight {
                    lineage,
                    cancel_id,
                    handle: handle.abort_handle(),
                });
            }
            Effect::Cancel { id, lineage } => self.cancel(id, &lineage),
            Effect::Dismiss => {
                warn!("Dismiss requested with no enclosing presentation; ignoring");
            }
            Effect::Merge(effects) => {
                for effect in effects {
                    self.schedule(effect, queue);
                }
            }
        }
    }

    fn effect_sender(&self, lineage: Lineage) -> EffectSender<R::Action> {
        let inbox = self.inbox_tx.clone();
        EffectSender::new(move |signal| match signal {
            Signal::Action(action) => {
                if !lineage.is_live() {
                    debug!("Refusing {:?} from cancelled job under {:?}", action, lineage);
                    return false;
                }
                inbox
                    .send(Envelope {
                        action,
                        lineage: lineage.clone(),
                    })
                    .is_ok()
            }
            Signal::Dismiss => {
                warn!("Job at the root asked to be dismissed; ignoring");
                false
            }
        })
    }

    fn cancel(&mut self, id: CancelId, lineage: &Lineage) {
        self.in_flight.retain(|job| {
            let matches = job.cancel_id == Some(id) && job.lineage.same_as(lineage);
            if matches {
                info!("Cancelling {:?} under {:?}", id, lineage);
                job.handle.abort();
            }
            !matches
        });
    }

    /// Forgets finished jobs and aborts the ones whose owner is gone.
    fn reap(&mut self) {
        self.in_flight.retain(|job| {
            if job.handle.is_finished() {
                return false;
            }
            if !job.lineage.is_live() {
                info!(
                    "Cancelling job {:?} owned by {:?}",
                    job.cancel_id, job.lineage
                );
                job.handle.abort();
                return false;
            }
            true
        });
    }
}

impl<R: Reducer> Drop for Runtime<R> {
    fn drop(&mut self) {
        for job in self.in_flight.drain(..) {
            job.handle.abort();
        }
    }
}
