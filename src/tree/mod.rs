//! # Presentation Tree
//!
//! The concrete four-level tree the runtime drives:
//!
//! ```text
//! Root
//! └── destination: Slot<RootDestination>
//!     └── Child
//!         └── destination: Slot<ChildDestination>
//!             ├── FirstGrandchild   (Task, TappedDismiss)
//!             └── SecondGrandchild  (TappedDismiss)
//! ```
//!
//! Actions mirror the tree. Tapping dismiss on the first grandchild is
//! addressed as:
//!
//! ```rust,ignore
//! RootAction::child(ChildAction::first_grandchild(FirstGrandchildAction::TappedDismiss))
//! ```

pub mod child;
pub mod grandchild;
pub mod root;

use std::sync::Arc;
use std::time::Duration;

use crate::runtime::TokioClock;

pub use child::{Child, ChildAction, ChildDestination, ChildDestinationAction, ChildState};
pub use grandchild::{
    FIRST_GRANDCHILD_TASK, FirstGrandchild, FirstGrandchildAction, FirstGrandchildState,
    SecondGrandchild, SecondGrandchildAction, SecondGrandchildState,
};
pub use root::{Root, RootAction, RootDestination, RootDestinationAction, RootState};

/// Builds the full tree on real time.
pub fn build(chain_delay: Duration) -> Root {
    Root::new(Child::new(Arc::new(TokioClock), chain_delay))
}
