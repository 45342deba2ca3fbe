//! # Dismiss Routing
//!
//! A presented feature can close itself without knowing who presented it.
//! It asks its `DismissRouter` for a dismiss effect; the nearest enclosing
//! [`PresentationSlot`](crate::core::presentation::PresentationSlot) rewrites
//! that request into its own `Dismiss` action, tagged with the generation
//! that asked. If the slot has moved on by the time the request is applied,
//! the request is dropped instead of closing the successor.
//!
//! Jobs that are already running use [`EffectSender::dismiss`](crate::core::effect::EffectSender::dismiss),
//! which travels the same way.

use crate::core::effect::Effect;

/// Capability for requesting "dismiss me" from inside a reducer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DismissRouter;

impl DismissRouter {
    pub fn request<A>(&self) -> Effect<A> {
        Effect::dismiss_request()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_a_bare_dismiss_signal() {
        let effect: Effect<()> = DismissRouter.request();
        assert!(matches!(effect, Effect::Dismiss));
    }
}
