//! One-shot reveal animations.
//!
//! Each watched element moves `Unobserved → Observed → Animated`; `Animated`
//! is terminal, so an element animates at most once however often it scrolls
//! back into view.

use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealState {
    Observed,
    Animated,
}

/// What to do for an element that just became visible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealPlan {
    /// Delay for each direct child, in child order. Empty unless the element
    /// staggers its children.
    pub child_delays_ms: Vec<u32>,
}

#[derive(Debug, Default)]
pub struct RevealTracker {
    slots: HashMap<u32, RevealState>,
    next_slot: u32,
}

impl RevealTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new element and return its slot id.
    pub fn observe(&mut self) -> u32 {
        let slot = self.next_slot;
        self.next_slot += 1;
        self.slots.insert(slot, RevealState::Observed);
        slot
    }

    pub fn state(&self, slot: u32) -> Option<RevealState> {
        self.slots.get(&slot).copied()
    }

    /// Elements still waiting for their first intersection.
    pub fn watching(&self) -> usize {
        self.slots
            .values()
            .filter(|s| **s == RevealState::Observed)
            .count()
    }

    /// Feed one intersection entry. Returns a plan only the first time an
    /// observed element intersects; the caller must then stop observing it.
    pub fn on_intersection(
        &mut self,
        slot: u32,
        intersecting: bool,
        stagger_children: Option<usize>,
        stagger_ms: u32,
    ) -> Option<RevealPlan> {
        if !intersecting {
            return None;
        }
        let state = self.slots.get_mut(&slot)?;
        if *state == RevealState::Animated {
            return None;
        }
        *state = RevealState::Animated;
        Some(RevealPlan {
            child_delays_ms: stagger_children
                .map(|n| stagger_delays(n, stagger_ms))
                .unwrap_or_default(),
        })
    }
}

/// `stagger_ms × index` for each of `count` children.
pub fn stagger_delays(count: usize, stagger_ms: u32) -> Vec<u32> {
    (0..count)
        .map(|i| stagger_ms.saturating_mul(u32::try_from(i).unwrap_or(u32::MAX)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animates_once_per_element() {
        let mut tracker = RevealTracker::new();
        let a = tracker.observe();
        assert_eq!(tracker.watching(), 1);

        assert!(tracker.on_intersection(a, true, None, 100).is_some());
        assert_eq!(tracker.state(a), Some(RevealState::Animated));
        assert!(tracker.on_intersection(a, true, None, 100).is_none());
        assert_eq!(tracker.watching(), 0);
    }

    #[test]
    fn non_intersecting_entries_do_nothing() {
        let mut tracker = RevealTracker::new();
        let a = tracker.observe();
        assert!(tracker.on_intersection(a, false, None, 100).is_none());
        assert_eq!(tracker.state(a), Some(RevealState::Observed));
    }

    #[test]
    fn unknown_slot_is_ignored() {
        let mut tracker = RevealTracker::new();
        assert!(tracker.on_intersection(42, true, None, 100).is_none());
    }

    #[test]
    fn stagger_container_cascades_children() {
        let mut tracker = RevealTracker::new();
        let grid = tracker.observe();
        let plan = tracker.on_intersection(grid, true, Some(4), 100).expect("first hit");
        assert_eq!(plan.child_delays_ms, vec![0, 100, 200, 300]);
    }

    #[test]
    fn plain_element_has_no_child_delays() {
        let mut tracker = RevealTracker::new();
        let card = tracker.observe();
        let plan = tracker.on_intersection(card, true, None, 100).expect("first hit");
        assert!(plan.child_delays_ms.is_empty());
    }
}
