//! # Generation Scopes
//!
//! Every occupant of a [`PresentationSlot`](crate::core::presentation::PresentationSlot)
//! gets its own `Scope`. The scope dies the moment the slot moves past that
//! generation (set, clear, or replacement), and every effect produced
//! underneath it carries the scope in its [`Lineage`].
//!
//! ```text
//! Root.destination   gen 1  ──► Scope A
//!   Child.destination  gen 3  ──► Scope B
//!     FirstGrandchild effect  lineage = [A, B]
//! ```
//!
//! An effect is live only while every scope in its lineage is live, so
//! killing `A` also silences everything tagged `[A, B]` without `A` having to
//! know about `B`.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

struct ScopeInner {
    slot: &'static str,
    generation: u64,
    cancelled: AtomicBool,
}

/// Liveness token for one generation of one slot.
#[derive(Clone)]
pub struct Scope {
    inner: Arc<ScopeInner>,
}

impl Scope {
    pub fn new(slot: &'static str, generation: u64) -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                slot,
                generation,
                cancelled: AtomicBool::new(false),
            }),
        }
    }

    pub fn slot(&self) -> &'static str {
        self.inner.slot
    }

    pub fn generation(&self) -> u64 {
        self.inner.generation
    }

    /// Marks this generation dead. Idempotent.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
    }

    pub fn is_live(&self) -> bool {
        !self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Identity comparison: two handles to the same generation token.
    pub fn same_as(&self, other: &Scope) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}{}",
            self.inner.slot,
            self.inner.generation,
            if self.is_live() { "" } else { "(dead)" }
        )
    }
}

/// The chain of scopes, outermost first, that an effect was produced under.
///
/// The empty lineage belongs to the root and is always live.
#[derive(Clone, Default)]
pub struct Lineage {
    scopes: Vec<Scope>,
}

impl Lineage {
    pub fn root() -> Self {
        Self::default()
    }

    /// Adds an enclosing scope. Slots wrap from the inside out, so the new
    /// scope goes to the front.
    pub fn within(mut self, scope: Scope) -> Self {
        self.scopes.insert(0, scope);
        self
    }

    pub fn is_live(&self) -> bool {
        self.scopes.iter().all(Scope::is_live)
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn same_as(&self, other: &Lineage) -> bool {
        self.scopes.len() == other.scopes.len()
            && self
                .scopes
                .iter()
                .zip(&other.scopes)
                .all(|(a, b)| a.same_as(b))
    }
}

impl fmt::Debug for Lineage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scopes.is_empty() {
            return write!(f, "<root>");
        }
        let parts: Vec<String> = self.scopes.iter().map(|s| format!("{s:?}")).collect();
        write!(f, "{}", parts.join(" > "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_lineage_is_always_live() {
        let lineage = Lineage::root();
        assert!(lineage.is_live());
        assert_eq!(lineage.depth(), 0);
    }

    #[test]
    fn test_outer_cancellation_kills_nested_lineage() {
        let outer = Scope::new("root.destination", 1);
        let inner = Scope::new("child.destination", 1);
        let lineage = Lineage::root().within(inner.clone()).within(outer.clone());
        assert!(lineage.is_live());

        outer.cancel();
        assert!(!lineage.is_live());
        assert!(inner.is_live());
    }

    #[test]
    fn test_lineage_identity_is_by_token_not_generation() {
        let a = Scope::new("slot", 1);
        let b = Scope::new("slot", 1);
        let la = Lineage::root().within(a.clone());
        assert!(la.same_as(&Lineage::root().within(a)));
        assert!(!la.same_as(&Lineage::root().within(b)));
    }

    #[test]
    fn test_debug_lists_outermost_first() {
        let outer = Scope::new("outer", 2);
        let inner = Scope::new("inner", 5);
        inner.cancel();
        let lineage = Lineage::root().within(inner).within(outer);
        assert_eq!(format!("{lineage:?}"), "outer#2 > inner#5(dead)");
    }
}
