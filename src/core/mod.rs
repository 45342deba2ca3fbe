//! # Core Presentation Logic
//!
//! The generic machinery for nested, optionally-presented state.
//! It knows nothing about any specific screen or UI technology.
//!
//! ```text
//!                    ┌─────────────────────────────┐
//!                    │            CORE             │
//!                    │       (this module)         │
//!                    │                             │
//!                    │  • Reducer (transitions)    │
//!                    │  • Effect (async intents)   │
//!                    │  • PresentationSlot         │
//!                    │  • DismissRouter            │
//!                    │                             │
//!                    │  No I/O. No UI. Pure.       │
//!                    └──────────────┬──────────────┘
//!                                   │
//!            ┌──────────────────────┼──────────────────────┐
//!            ▼                      ▼                      ▼
//!     ┌────────────┐         ┌────────────┐         ┌────────────┐
//!     │    tree    │         │  runtime   │         │    tui     │
//!     │ (reducers) │         │  (tokio)   │         │ (ratatui)  │
//!     └────────────┘         └────────────┘         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`reducer`]: The `Reducer` trait
//! - [`effect`]: `Effect` values and the `EffectSender` jobs use
//! - [`presentation`]: `PresentationSlot` and its actions
//! - [`dismiss`]: Self-dismissal without knowing the parent
//! - [`scope`]: Generation tokens used to retire stale effects
//! - [`config`]: Settings resolution

pub mod config;
pub mod dismiss;
pub mod effect;
pub mod presentation;
pub mod reducer;
pub mod scope;

pub use dismiss::DismissRouter;
pub use effect::{CancelId, Effect, EffectSender};
pub use presentation::{PresentationAction, PresentationSlot, SlotOutcome};
pub use reducer::Reducer;
