//! Deck module - shuffled browse order and the slot array
//!
//! Episodes are referred to by their index in the episode pool (catalog order).
//! The [`Deck`] is a random permutation of those indices and only drives which
//! card is shown next. [`Slots`] is the ordering the player is building; it keeps
//! a reverse index so an episode can never sit in two slots at once.

use rand::seq::SliceRandom;
use rand::RngCore;

/// Random browse order over the episode pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    order: Vec<usize>,
    /// Position of each pool index inside `order`
    position: Vec<usize>,
}

impl Deck {
    /// Fresh random permutation of `0..len`
    pub fn shuffled<R: RngCore + ?Sized>(len: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(rng);
        Self::from_order(order)
    }

    /// Deck with a fixed order (must be a permutation of `0..order.len()`)
    pub fn from_order(order: Vec<usize>) -> Self {
        let mut position = vec![0; order.len()];
        for (pos, &episode) in order.iter().enumerate() {
            position[episode] = pos;
        }
        Self { order, position }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Pool index shown at deck position `pos`
    pub fn episode_at(&self, pos: usize) -> usize {
        self.order[pos]
    }

    /// Deck position of a pool index
    pub fn position_of(&self, episode: usize) -> usize {
        self.position[episode]
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Walk circularly from `from` (exclusive) and return the first deck
    /// position accepted by `available`, trying at most `len` positions.
    pub fn seek<F>(&self, from: usize, forward: bool, available: F) -> Option<usize>
    where
        F: Fn(usize) -> bool,
    {
        let len = self.order.len();
        if len == 0 {
            return None;
        }
        let mut pos = from % len;
        for _ in 0..len {
            pos = if forward {
                (pos + 1) % len
            } else {
                (pos + len - 1) % len
            };
            if available(self.order[pos]) {
                return Some(pos);
            }
        }
        None
    }
}

/// Target ordering: each slot empty or holding one pool index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slots {
    cells: Vec<Option<usize>>,
    /// Slot currently holding each pool index
    slot_of: Vec<Option<usize>>,
    filled: usize,
}

impl Slots {
    pub fn new(len: usize) -> Self {
        Self {
            cells: vec![None; len],
            slot_of: vec![None; len],
            filled: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Episode in `slot`, `None` if empty or out of range
    pub fn get(&self, slot: usize) -> Option<usize> {
        self.cells.get(slot).copied().flatten()
    }

    pub fn slot_of(&self, episode: usize) -> Option<usize> {
        self.slot_of.get(episode).copied().flatten()
    }

    pub fn is_placed(&self, episode: usize) -> bool {
        self.slot_of(episode).is_some()
    }

    pub fn filled(&self) -> usize {
        self.filled
    }

    pub fn any_filled(&self) -> bool {
        self.filled > 0
    }

    pub fn is_complete(&self) -> bool {
        self.filled == self.cells.len()
    }

    pub fn cells(&self) -> &[Option<usize>] {
        &self.cells
    }

    /// Put an unplaced episode into `slot`, returning whatever it displaced.
    ///
    /// The caller guarantees `episode` is not already placed.
    pub fn put(&mut self, slot: usize, episode: usize) -> Option<usize> {
        debug_assert!(!self.is_placed(episode));
        let displaced = self.cells[slot].replace(episode);
        match displaced {
            Some(old) => self.slot_of[old] = None,
            None => self.filled += 1,
        }
        self.slot_of[episode] = Some(slot);
        displaced
    }

    /// Exchange the contents of two slots (either may be empty)
    pub fn swap(&mut self, a: usize, b: usize) {
        self.cells.swap(a, b);
        if let Some(episode) = self.cells[a] {
            self.slot_of[episode] = Some(a);
        }
        if let Some(episode) = self.cells[b] {
            self.slot_of[episode] = Some(b);
        }
    }

    /// Empty a slot, returning what it held
    pub fn take(&mut self, slot: usize) -> Option<usize> {
        let removed = self.cells.get_mut(slot)?.take()?;
        self.slot_of[removed] = None;
        self.filled -= 1;
        Some(removed)
    }
}
