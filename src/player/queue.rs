//! Queue orderings over catalog indices.
//!
//! The natural ordering is the filtered catalog; the shuffled ordering is a
//! permutation of it with the active track pinned in front. `current` always
//! points into whichever ordering is active.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

#[derive(Debug, Clone, Default)]
pub struct Queue {
    natural: Vec<usize>,
    shuffled: Option<Vec<usize>>,
    current: Option<usize>,
}

impl Queue {
    /// The ordering `next`/`previous` walk: shuffled when shuffle is on.
    pub fn active(&self) -> &[usize] {
        self.shuffled.as_deref().unwrap_or(&self.natural)
    }

    pub fn natural(&self) -> &[usize] {
        &self.natural
    }

    pub fn shuffled(&self) -> Option<&[usize]> {
        self.shuffled.as_deref()
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffled.is_some()
    }

    /// Position of the current track in the active ordering.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn len(&self) -> usize {
        self.active().len()
    }

    pub fn is_empty(&self) -> bool {
        self.active().is_empty()
    }

    /// Catalog index at `position` of the active ordering.
    pub fn get(&self, position: usize) -> Option<usize> {
        self.active().get(position).copied()
    }

    pub fn position_of(&self, catalog_index: usize) -> Option<usize> {
        self.active().iter().position(|&i| i == catalog_index)
    }

    pub(crate) fn set_natural(&mut self, natural: Vec<usize>) {
        self.natural = natural;
    }

    /// Point `current` at `catalog_index`, or clear it when absent.
    pub(crate) fn relocate(&mut self, catalog_index: Option<usize>) {
        self.current = catalog_index.and_then(|i| self.position_of(i));
    }

    /// Replace the shuffled ordering with a fresh permutation of the natural
    /// one, `pinned` moved (or inserted) at the front.
    pub(crate) fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R, pinned: Option<usize>) {
        let mut order = self.natural.clone();
        order.shuffle(rng);
        if let Some(p) = pinned {
            pin_to_front(&mut order, p);
        }
        self.shuffled = Some(order);
    }

    pub(crate) fn unshuffle(&mut self) {
        self.shuffled = None;
    }

    /// Whether the shuffled ordering still holds exactly the natural
    /// ordering's tracks, plus `pinned`.
    pub(crate) fn shuffle_matches_natural(&self, pinned: usize) -> bool {
        let Some(shuffled) = self.shuffled.as_deref() else {
            return false;
        };
        if !shuffled.contains(&pinned) {
            return false;
        }
        let a: HashSet<usize> = shuffled.iter().copied().filter(|&i| i != pinned).collect();
        let b: HashSet<usize> = self.natural.iter().copied().filter(|&i| i != pinned).collect();
        a == b
    }
}

pub(crate) fn pin_to_front(order: &mut Vec<usize>, catalog_index: usize) {
    if let Some(pos) = order.iter().position(|&i| i == catalog_index) {
        order.remove(pos);
    }
    order.insert(0, catalog_index);
}
