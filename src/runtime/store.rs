//! # Store
//!
//! A [`Runtime`] running as its own tokio task. The task is the only writer
//! of the state tree; everyone else talks to it through [`StoreSender`]
//! clones and reads it back through snapshots.
//!
//! ```text
//! view / other threads ──send()──► inbox ──► [store task: Runtime] ──► watch<State>
//!                                   ▲                    │            broadcast<Transition>
//!                                   └──── effect jobs ◄──┘
//! ```
//!
//! Snapshots are copies. A consumer that awaits anything must re-read the
//! snapshot afterwards instead of assuming a child is still presented.

use std::fmt;

use log::info;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::core::reducer::Reducer;
use crate::runtime::{Runtime, StoreSender, Transition};

pub const DEFAULT_TRANSITION_BUFFER: usize = 64;

#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// How many transitions a slow subscriber may fall behind before it
    /// starts missing them.
    pub transition_buffer: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            transition_buffer: DEFAULT_TRANSITION_BUFFER,
        }
    }
}

pub struct Store<R: Reducer> {
    sender: StoreSender<R::Action>,
    state: watch::Receiver<R::State>,
    transitions: broadcast::Sender<Transition<R::State, R::Action>>,
    worker: JoinHandle<()>,
}

impl<R> Store<R>
where
    R: Reducer,
    R::State: Clone + fmt::Debug + Send + Sync + 'static,
    R::Action: Clone + fmt::Debug + Send + Sync + 'static,
{
    /// Starts the store task on the current tokio runtime.
    pub fn spawn(reducer: R, initial: R::State, options: StoreOptions) -> Self {
        let runtime = Runtime::new(reducer, initial.clone());
        let sender = runtime.sender();
        let (state_tx, state_rx) = watch::channel(initial);
        let (transitions_tx, _) = broadcast::channel(options.transition_buffer.max(1));

        let publish = transitions_tx.clone();
        let worker = tokio::spawn(runtime.run(move |transitions, state| {
            for transition in transitions {
                // No subscribers is fine; the watch channel still has the state.
                let _ = publish.send(transition.clone());
            }
            state_tx.send_replace(state.clone());
        }));
        info!(
            "Store started (transition buffer {})",
            options.transition_buffer
        );

        Self {
            sender,
            state: state_rx,
            transitions: transitions_tx,
            worker,
        }
    }

    /// Queues an action and returns immediately.
    pub fn send(&self, action: R::Action) -> bool {
        self.sender.send(action)
    }

    pub fn sender(&self) -> StoreSender<R::Action> {
        self.sender.clone()
    }

    /// The latest published state.
    pub fn state(&self) -> R::State {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<R::State> {
        self.state.clone()
    }

    /// Every applied action from now on, in order.
    pub fn transitions(&self) -> broadcast::Receiver<Transition<R::State, R::Action>> {
        self.transitions.subscribe()
    }

    /// Stops the store task and waits for it to go away. Its in-flight
    /// effects are aborted with it.
    pub async fn shutdown(mut self) {
        info!("Store shutting down");
        self.worker.abort();
        let _ = (&mut self.worker).await;
    }
}

impl<R: Reducer> Drop for Store<R> {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::effect::Effect;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Tally {
        total: i64,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TallyAction {
        Add(i64),
        AddLater(i64),
    }

    struct TallyReducer;

    impl Reducer for TallyReducer {
        type State = Tally;
        type Action = TallyAction;

        fn reduce(&self, state: &mut Tally, action: TallyAction) -> Effect<TallyAction> {
            match action {
                TallyAction::Add(n) => {
                    state.total += n;
                    Effect::none()
                }
                TallyAction::AddLater(n) => Effect::run(move |send| async move {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    send.send(TallyAction::Add(n));
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_send_publishes_transitions_and_state() {
        let store = Store::spawn(TallyReducer, Tally::default(), StoreOptions::default());
        let mut transitions = store.transitions();

        store.send(TallyAction::Add(2));
        let t = transitions.recv().await.unwrap();
        assert_eq!(t.action, TallyAction::Add(2));
        assert_eq!(t.state.total, 2);
        assert_eq!(store.state().total, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_effect_actions_flow_back_through_the_store() {
        let store = Store::spawn(TallyReducer, Tally::default(), StoreOptions::default());
        let mut state = store.subscribe();

        store.send(TallyAction::AddLater(5));
        state.wait_for(|s| s.total == 5).await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_senders_are_serialized() {
        let store = Store::spawn(TallyReducer, Tally::default(), StoreOptions::default());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let sender = store.sender();
            handles.push(tokio::spawn(async move {
                for _ in 0..100 {
                    sender.send(TallyAction::Add(1));
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        let mut state = store.subscribe();
        state.wait_for(|s| s.total == 800).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_after_shutdown_is_refused() {
        let store = Store::spawn(TallyReducer, Tally::default(), StoreOptions::default());
        let sender = store.sender();
        store.shutdown().await;
        assert!(!sender.send(TallyAction::Add(1)));
    }
}
