//! # Headless Replay
//!
//! Drives a real [`Store`] through the nested-dismissal scenario and writes
//! one JSON line per transition:
//!
//! 1. present the child (opens with the first grandchild)
//! 2. start the first grandchild's task
//! 3. tap dismiss on the first grandchild → dismiss, then the second appears
//! 4. tap dismiss on the second grandchild → dismiss, nothing follows
//!
//! Each step waits for exactly the transitions it should cause, then the
//! replay listens for a short quiet period to prove nothing else arrives.

use std::io::{self, Write};
use std::time::Duration;

use log::{info, warn};
use tokio::sync::broadcast;

use crate::core::config::ResolvedConfig;
use crate::runtime::{Store, StoreOptions, Transition};
use crate::tree::{
    self, ChildAction, FirstGrandchildAction, Root, RootAction, RootState, SecondGrandchildAction,
};

/// Extra time allowed beyond the chain delay before a step is declared stuck.
const STEP_GRACE: Duration = Duration::from_secs(1);
/// How long to listen for stray transitions after the last step.
const QUIET_PERIOD: Duration = Duration::from_millis(100);

pub struct Step {
    pub action: RootAction,
    /// Transitions this send should produce, counting itself.
    pub expected: usize,
}

pub fn scenario() -> Vec<Step> {
    vec![
        Step {
            action: RootAction::PresentChild,
            expected: 1,
        },
        Step {
            action: RootAction::child(ChildAction::first_grandchild(FirstGrandchildAction::Task)),
            expected: 1,
        },
        Step {
            action: RootAction::child(ChildAction::first_grandchild(
                FirstGrandchildAction::TappedDismiss,
            )),
            // TappedDismiss, Dismiss, PresentSecondGrandchild
            expected: 3,
        },
        Step {
            action: RootAction::child(ChildAction::second_grandchild(
                SecondGrandchildAction::TappedDismiss,
            )),
            // TappedDismiss, Dismiss
            expected: 2,
        },
    ]
}

pub async fn run(config: &ResolvedConfig) -> io::Result<()> {
    let store = Store::spawn(
        tree::build(config.chain_delay),
        RootState::default(),
        StoreOptions {
            transition_buffer: config.transition_buffer,
        },
    );
    let result = run_scenario(&store, &mut io::stdout(), config.chain_delay + STEP_GRACE).await;
    store.shutdown().await;
    result.map(|_| ())
}

/// Plays [`scenario`] against `store`, writing each transition as a JSON line.
/// Returns the number of transitions written.
pub async fn run_scenario<W: Write>(
    store: &Store<Root>,
    out: &mut W,
    step_timeout: Duration,
) -> io::Result<usize> {
    let mut transitions = store.transitions();
    let mut written = 0;

    for (index, step) in scenario().into_iter().enumerate() {
        info!("Replay step {}: {:?}", index + 1, step.action);
        store.send(step.action);
        for _ in 0..step.expected {
            let transition = next_transition(&mut transitions, step_timeout).await?;
            write_transition(out, &transition)?;
            written += 1;
        }
    }

    match tokio::time::timeout(QUIET_PERIOD, transitions.recv()).await {
        Err(_) => {}
        Ok(Ok(stray)) => {
            warn!("Unexpected transition after the scenario: {:?}", stray.action);
            write_transition(out, &stray)?;
            return Err(io::Error::other(format!(
                "unexpected transition after the scenario: {:?}",
                stray.action
            )));
        }
        Ok(Err(e)) => return Err(io::Error::other(e)),
    }

    info!("Replay finished: {} transitions", written);
    Ok(written)
}

async fn next_transition(
    transitions: &mut broadcast::Receiver<Transition<RootState, RootAction>>,
    timeout: Duration,
) -> io::Result<Transition<RootState, RootAction>> {
    match tokio::time::timeout(timeout, transitions.recv()).await {
        Ok(Ok(transition)) => Ok(transition),
        Ok(Err(e)) => Err(io::Error::other(e)),
        Err(_) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            "timed out waiting for a transition",
        )),
    }
}

fn write_transition<W: Write>(
    out: &mut W,
    transition: &Transition<RootState, RootAction>,
) -> io::Result<()> {
    serde_json::to_writer(&mut *out, transition)?;
    writeln!(out)
}
