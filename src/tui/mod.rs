//! # TUI Viewer
//!
//! The ratatui-specific layer. A passive consumer of the store: it turns
//! keys into actions and draws whatever the latest snapshot says is
//! presented. It never mutates the tree itself.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Re-reading, not remembering
//!
//! Every frame starts from a fresh `store.state()`. A sheet seen on the
//! previous frame may already be gone (a dismissal can land between frames),
//! and an action aimed at it is simply dropped by the runtime.
//!
//! ## The `.task` hook
//!
//! The first time a first-grandchild generation is drawn, the viewer sends
//! `FirstGrandchildAction::Task`, the way a view starts its lifetime-bound
//! work on appear. The job is cancelled by the runtime when the grandchild
//! is dismissed; the viewer does not track it.

mod component;
mod event;
mod sheet;
mod ui;

use log::info;

use crate::core::config::ResolvedConfig;
use crate::core::presentation::PresentationAction;
use crate::runtime::{Store, StoreOptions};
use crate::tree::{
    self, ChildAction, ChildDestination, FirstGrandchildAction, RootAction, RootState,
    SecondGrandchildAction,
};
use crate::tui::event::{ViewEvent, poll_event};

pub fn run(config: &ResolvedConfig) -> std::io::Result<()> {
    let store = Store::spawn(
        tree::build(config.chain_delay),
        RootState::default(),
        StoreOptions {
            transition_buffer: config.transition_buffer,
        },
    );
    info!("Viewer starting (chain delay {:?})", config.chain_delay);

    let mut terminal = ratatui::init();
    // (root generation, child generation) of the last first grandchild we started a task for
    let mut tasked: Option<(u64, u64)> = None;
    let mut status = String::from("Press p to present the child");

    let result = loop {
        let state = store.state();

        if let Some(key) = first_grandchild_key(&state)
            && tasked != Some(key)
        {
            store.send(RootAction::child(ChildAction::first_grandchild(
                FirstGrandchildAction::Task,
            )));
            tasked = Some(key);
        }

        if let Err(e) = terminal.draw(|f| ui::draw_ui(f, &state, &status)) {
            break Err(e);
        }

        let Some(event) = poll_event() else {
            continue;
        };
        if event == ViewEvent::Quit {
            break Ok(());
        }
        if let Some(action) = action_for(event, &state) {
            status = format!("Sent {:?}", action);
            store.send(action);
        }
    };

    ratatui::restore();
    info!("Viewer exiting");
    result
}

/// Identity of the live first grandchild, if one is on screen.
fn first_grandchild_key(state: &RootState) -> Option<(u64, u64)> {
    let child = state.child()?;
    match child.grandchild()? {
        ChildDestination::FirstGrandchild(_) => Some((
            state.destination.generation(),
            child.destination.generation(),
        )),
        ChildDestination::SecondGrandchild(_) => None,
    }
}

/// Translates a view event into a store action, based on what is on screen.
fn action_for(event: ViewEvent, state: &RootState) -> Option<RootAction> {
    match event {
        ViewEvent::Quit | ViewEvent::Resize => None,
        ViewEvent::PresentChild => Some(RootAction::PresentChild),
        ViewEvent::PresentFirstGrandchild => state
            .child()
            .map(|_| RootAction::child(ChildAction::PresentFirstGrandchild)),
        ViewEvent::PresentSecondGrandchild => state
            .child()
            .map(|_| RootAction::child(ChildAction::PresentSecondGrandchild)),
        ViewEvent::Dismiss => {
            let child = state.child()?;
            Some(match child.grandchild() {
                Some(ChildDestination::FirstGrandchild(_)) => RootAction::child(
                    ChildAction::first_grandchild(FirstGrandchildAction::TappedDismiss),
                ),
                Some(ChildDestination::SecondGrandchild(_)) => RootAction::child(
                    ChildAction::second_grandchild(SecondGrandchildAction::TappedDismiss),
                ),
                None => RootAction::Destination(PresentationAction::Dismiss),
            })
        }
    }
}
