//! Puzzle module - the complete puzzle state
//!
//! Ties together the deck, the slots, scoring and timing. The check pass is a
//! state machine: `Idle -> AllPlaced -> Checking -> Revealed`. Transitions are
//! total: a call that is not valid in the current state does nothing and
//! returns `false`.
//!
//! The check pass is paced by the caller through [`Puzzle::tick`], the same
//! fixed-timestep style the presentation loop uses for its display timer.
//! Nothing is scheduled outside the puzzle, so a [`Puzzle::reset`] in the
//! middle of a pass leaves no pending step behind.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use thiserror::Error;

use crate::clock::{Clock, SystemClock};
use crate::deck::{Deck, Slots};
use crate::scoring::{apply_check_result, judge_slot, Multiplier};
use crate::snapshot::{CardIndicator, PhaseKind, PuzzleSnapshot, SlotSnapshot};
use crate::types::{CheckResult, Episode, PuzzleAction, CHECK_STEP_MS, DISPLAY_TICK_MS};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("episode pool is empty")]
    EmptyPool,
    #[error("duplicate episode id in pool: {0}")]
    DuplicateEpisodeId(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleConfig {
    /// Delay before each slot is scored during a check pass (0 = instant)
    pub check_step_ms: u32,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            check_step_ms: CHECK_STEP_MS,
        }
    }
}

/// In-progress check pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckPass {
    pub next_slot: usize,
    pub until_next_ms: u32,
    pub base_score: u32,
    /// Arrangement time, frozen when the pass began
    pub elapsed_secs: u64,
}

/// Final outcome of a check pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reveal {
    pub base_score: u32,
    pub multiplier: Multiplier,
    pub final_score: u32,
    pub elapsed_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzlePhase {
    /// At least one slot is empty
    Idle,
    /// Every slot holds an episode
    AllPlaced,
    Checking(CheckPass),
    /// Terminal until reset
    Revealed(Reveal),
}

impl PuzzlePhase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            PuzzlePhase::Idle => PhaseKind::Idle,
            PuzzlePhase::AllPlaced => PhaseKind::AllPlaced,
            PuzzlePhase::Checking(_) => PhaseKind::Checking,
            PuzzlePhase::Revealed(_) => PhaseKind::Revealed,
        }
    }

    /// Slots may only change before a check pass starts
    pub fn accepts_moves(&self) -> bool {
        matches!(self, PuzzlePhase::Idle | PuzzlePhase::AllPlaced)
    }
}

/// Observable progress of a check pass, drained with [`Puzzle::take_events`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleEvent {
    SlotChecked {
        slot: usize,
        result: CheckResult,
        base_score: u32,
    },
    Revealed {
        final_score: u32,
        multiplier: Multiplier,
        elapsed_secs: u64,
    },
}

/// One puzzle instance for a series + season
#[derive(Debug, Clone)]
pub struct Puzzle<R = StdRng, C = SystemClock> {
    /// Episodes in catalog order; everything else refers to them by index
    pool: Vec<Episode>,
    index: HashMap<String, usize>,
    deck: Deck,
    slots: Slots,
    results: Vec<CheckResult>,
    /// Deck position of the card shown in hand
    cursor: usize,
    phase: PuzzlePhase,
    /// Clock reading at the first placement
    started_at_ms: Option<u64>,
    events: Vec<PuzzleEvent>,
    /// Increments on every reset
    round: u32,
    config: PuzzleConfig,
    rng: R,
    clock: C,
}

impl Puzzle {
    /// Puzzle with entropy-seeded shuffles, the system clock and default pacing
    pub fn new(pool: Vec<Episode>) -> Result<Self, PuzzleError> {
        Self::with_sources(
            pool,
            PuzzleConfig::default(),
            StdRng::from_entropy(),
            SystemClock::new(),
        )
    }
}

impl<R: RngCore, C: Clock> Puzzle<R, C> {
    /// Create a puzzle with explicit randomness and time sources.
    ///
    /// The pool must be non-empty and its episode ids unique.
    pub fn with_sources(
        pool: Vec<Episode>,
        config: PuzzleConfig,
        mut rng: R,
        clock: C,
    ) -> Result<Self, PuzzleError> {
        if pool.is_empty() {
            return Err(PuzzleError::EmptyPool);
        }

        let mut index = HashMap::with_capacity(pool.len());
        for (i, episode) in pool.iter().enumerate() {
            if index.insert(episode.id.clone(), i).is_some() {
                return Err(PuzzleError::DuplicateEpisodeId(episode.id.clone()));
            }
        }

        let len = pool.len();
        let deck = Deck::shuffled(len, &mut rng);

        Ok(Self {
            pool,
            index,
            deck,
            slots: Slots::new(len),
            results: vec![CheckResult::Unset; len],
            cursor: 0,
            phase: PuzzlePhase::Idle,
            started_at_ms: None,
            events: Vec::new(),
            round: 0,
            config,
            rng,
            clock,
        })
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn pool(&self) -> &[Episode] {
        &self.pool
    }

    pub fn phase(&self) -> PuzzlePhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn config(&self) -> PuzzleConfig {
        self.config
    }

    /// Episode ids in shuffled deck order
    pub fn deck_ids(&self) -> Vec<&str> {
        self.deck
            .order()
            .iter()
            .map(|&i| self.pool[i].id.as_str())
            .collect()
    }

    pub fn slot(&self, slot: usize) -> Option<&Episode> {
        self.slots.get(slot).map(|i| &self.pool[i])
    }

    /// Slot currently holding an episode
    pub fn slot_of(&self, episode_id: &str) -> Option<usize> {
        let &i = self.index.get(episode_id)?;
        self.slots.slot_of(i)
    }

    pub fn result(&self, slot: usize) -> CheckResult {
        self.results.get(slot).copied().unwrap_or_default()
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    /// Every slot holds an episode
    pub fn is_complete(&self) -> bool {
        self.slots.is_complete()
    }

    /// Cards still in hand, in shuffled deck order
    pub fn available_episodes(&self) -> Vec<&Episode> {
        self.deck
            .order()
            .iter()
            .filter(|&&i| !self.slots.is_placed(i))
            .map(|&i| &self.pool[i])
            .collect()
    }

    fn current_index(&self) -> Option<usize> {
        let at_cursor = self.deck.episode_at(self.cursor);
        if !self.slots.is_placed(at_cursor) {
            return Some(at_cursor);
        }
        self.deck
            .seek(self.cursor, true, |i| !self.slots.is_placed(i))
            .map(|pos| self.deck.episode_at(pos))
    }

    /// Card shown in hand, `None` once every card is placed
    pub fn current_card(&self) -> Option<&Episode> {
        self.current_index().map(|i| &self.pool[i])
    }

    pub fn started(&self) -> bool {
        self.started_at_ms.is_some()
    }

    fn live_elapsed_ms(&self) -> Option<u64> {
        self.started_at_ms
            .map(|start| self.clock.now_ms().saturating_sub(start))
    }

    fn live_elapsed_secs(&self) -> u64 {
        self.live_elapsed_ms()
            .map(|ms| ms / u64::from(DISPLAY_TICK_MS))
            .unwrap_or(0)
    }

    /// Milliseconds until the displayed elapsed time next changes.
    ///
    /// `None` while the timer is not running: before the first placement and
    /// once checking begins.
    pub fn ms_until_display_tick(&self) -> Option<u32> {
        if !self.phase.accepts_moves() {
            return None;
        }
        let tick = u64::from(DISPLAY_TICK_MS);
        self.live_elapsed_ms()
            .map(|ms| (tick - ms % tick) as u32)
    }

    /// Whole seconds since the first placement, frozen once checking begins
    pub fn elapsed_secs(&self) -> u64 {
        match self.phase {
            PuzzlePhase::Checking(pass) => pass.elapsed_secs,
            PuzzlePhase::Revealed(reveal) => reveal.elapsed_secs,
            PuzzlePhase::Idle | PuzzlePhase::AllPlaced => self.live_elapsed_secs(),
        }
    }

    /// Multiplier the current elapsed time would earn (the final one once revealed)
    pub fn multiplier(&self) -> Multiplier {
        match self.phase {
            PuzzlePhase::Revealed(reveal) => reveal.multiplier,
            _ => Multiplier::for_elapsed_secs(self.elapsed_secs()),
        }
    }

    /// Running base score of the check pass
    pub fn base_score(&self) -> u32 {
        match self.phase {
            PuzzlePhase::Checking(pass) => pass.base_score,
            PuzzlePhase::Revealed(reveal) => reveal.base_score,
            PuzzlePhase::Idle | PuzzlePhase::AllPlaced => 0,
        }
    }

    pub fn final_score(&self) -> Option<u32> {
        match self.phase {
            PuzzlePhase::Revealed(reveal) => Some(reveal.final_score),
            _ => None,
        }
    }

    /// Show the next card still in hand
    pub fn browse_next(&mut self) -> bool {
        self.browse(true)
    }

    /// Show the previous card still in hand
    pub fn browse_previous(&mut self) -> bool {
        self.browse(false)
    }

    fn browse(&mut self, forward: bool) -> bool {
        let Some(pos) = self
            .deck
            .seek(self.cursor, forward, |i| !self.slots.is_placed(i))
        else {
            return false;
        };
        if pos == self.cursor {
            return false;
        }
        self.cursor = pos;
        true
    }

    /// Show a specific card still in hand
    pub fn browse_to(&mut self, episode_id: &str) -> bool {
        let Some(&i) = self.index.get(episode_id) else {
            return false;
        };
        if self.slots.is_placed(i) {
            return false;
        }
        let pos = self.deck.position_of(i);
        if pos == self.cursor {
            return false;
        }
        self.cursor = pos;
        true
    }

    /// Commit a drop of `episode_id` onto `slot`.
    ///
    /// A card from hand takes the slot and any card it displaces becomes the
    /// card shown in hand. A card already in another slot swaps with the
    /// target slot. Dropping a card onto its own slot does nothing.
    pub fn place_in_slot(&mut self, episode_id: &str, slot: usize) -> bool {
        if !self.phase.accepts_moves() || slot >= self.len() {
            return false;
        }
        let Some(&episode) = self.index.get(episode_id) else {
            return false;
        };

        match self.slots.slot_of(episode) {
            Some(source) if source == slot => return false,
            Some(source) => self.slots.swap(source, slot),
            None => {
                let was_current = self.current_index() == Some(episode);
                match self.slots.put(slot, episode) {
                    Some(displaced) => {
                        self.cursor = self.deck.position_of(displaced);
                    }
                    None if was_current => {
                        if let Some(pos) =
                            self.deck
                                .seek(self.cursor, true, |i| !self.slots.is_placed(i))
                        {
                            self.cursor = pos;
                        }
                    }
                    None => {}
                }
            }
        }

        if self.started_at_ms.is_none() {
            self.started_at_ms = Some(self.clock.now_ms());
        }
        self.results.fill(CheckResult::Unset);
        self.sync_phase();
        true
    }

    /// Send a slot's card back to hand and show it
    pub fn remove_from_slot(&mut self, slot: usize) -> bool {
        if !self.phase.accepts_moves() {
            return false;
        }
        let Some(removed) = self.slots.take(slot) else {
            return false;
        };

        self.cursor = self.deck.position_of(removed);
        self.results[slot] = CheckResult::Unset;
        self.sync_phase();
        true
    }

    fn sync_phase(&mut self) {
        if self.phase.accepts_moves() {
            self.phase = if self.slots.is_complete() {
                PuzzlePhase::AllPlaced
            } else {
                PuzzlePhase::Idle
            };
        }
    }

    /// Start the paced check pass (only once every slot is filled).
    ///
    /// The elapsed time is frozen here, so the checking animation never
    /// counts against the multiplier.
    pub fn begin_check(&mut self) -> bool {
        if self.phase != PuzzlePhase::AllPlaced {
            return false;
        }

        let elapsed_secs = self.live_elapsed_secs();
        self.results.fill(CheckResult::Unset);
        self.phase = PuzzlePhase::Checking(CheckPass {
            next_slot: 0,
            until_next_ms: self.config.check_step_ms,
            base_score: 0,
            elapsed_secs,
        });

        if self.config.check_step_ms == 0 {
            self.tick(0);
        }
        true
    }

    /// Advance the check pass by `elapsed_ms`.
    ///
    /// Scores every slot whose delay has run out; returns whether any slot was
    /// scored. Outside of a check pass this does nothing.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        let PuzzlePhase::Checking(mut pass) = self.phase else {
            return false;
        };

        let mut budget = elapsed_ms;
        let mut progressed = false;

        while budget >= pass.until_next_ms {
            budget -= pass.until_next_ms;
            progressed = true;
            if self.score_next_slot(&mut pass) {
                return true;
            }
            pass.until_next_ms = self.config.check_step_ms;
        }

        pass.until_next_ms -= budget;
        self.phase = PuzzlePhase::Checking(pass);
        progressed
    }

    /// Score `pass.next_slot`; returns true once the pass is revealed
    fn score_next_slot(&mut self, pass: &mut CheckPass) -> bool {
        let slot = pass.next_slot;
        let result = match self.slots.get(slot) {
            Some(i) => judge_slot(self.pool[i].air_order(), slot),
            None => CheckResult::Incorrect,
        };

        self.results[slot] = result;
        pass.base_score = apply_check_result(pass.base_score, result);
        pass.next_slot += 1;
        self.events.push(PuzzleEvent::SlotChecked {
            slot,
            result,
            base_score: pass.base_score,
        });

        if pass.next_slot < self.len() {
            return false;
        }

        let multiplier = Multiplier::for_elapsed_secs(pass.elapsed_secs);
        let reveal = Reveal {
            base_score: pass.base_score,
            multiplier,
            final_score: multiplier.apply(pass.base_score),
            elapsed_secs: pass.elapsed_secs,
        };
        self.phase = PuzzlePhase::Revealed(reveal);
        self.events.push(PuzzleEvent::Revealed {
            final_score: reveal.final_score,
            multiplier,
            elapsed_secs: reveal.elapsed_secs,
        });
        true
    }

    /// Start over with a new shuffle, discarding placements, results,
    /// timing and any check pass still in progress
    pub fn reset(&mut self) {
        let len = self.len();
        self.deck = Deck::shuffled(len, &mut self.rng);
        self.slots = Slots::new(len);
        self.results.fill(CheckResult::Unset);
        self.cursor = 0;
        self.phase = PuzzlePhase::Idle;
        self.started_at_ms = None;
        self.events.clear();
        self.round = self.round.wrapping_add(1);
    }

    /// Take and clear pending check-pass events
    pub fn take_events(&mut self) -> Vec<PuzzleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply a puzzle action
    pub fn apply_action(&mut self, action: &PuzzleAction) -> bool {
        match action {
            PuzzleAction::BrowseNext => self.browse_next(),
            PuzzleAction::BrowsePrevious => self.browse_previous(),
            PuzzleAction::BrowseTo { episode_id } => self.browse_to(episode_id),
            PuzzleAction::Place { episode_id, slot } => self.place_in_slot(episode_id, *slot),
            PuzzleAction::Remove { slot } => self.remove_from_slot(*slot),
            PuzzleAction::Check => self.begin_check(),
            PuzzleAction::Reset => {
                self.reset();
                true
            }
        }
    }

    pub fn snapshot(&self) -> PuzzleSnapshot {
        let current = self.current_index();
        let draggable = self.phase.accepts_moves();

        let indicators = self
            .deck
            .order()
            .iter()
            .filter(|&&i| !self.slots.is_placed(i))
            .map(|&i| CardIndicator {
                episode_id: self.pool[i].id.clone(),
                current: current == Some(i),
            })
            .collect();

        let slots = self
            .slots
            .cells()
            .iter()
            .enumerate()
            .map(|(index, cell)| SlotSnapshot {
                index,
                episode: cell.map(|i| self.pool[i].clone()),
                result: self.results[index],
                draggable,
            })
            .collect();

        PuzzleSnapshot {
            round: self.round,
            phase: self.phase.kind(),
            current: current.map(|i| self.pool[i].clone()),
            indicators,
            slots,
            complete: self.is_complete(),
            timer_started: self.started(),
            elapsed_secs: self.elapsed_secs(),
            multiplier: self.multiplier(),
            base_score: self.base_score(),
            final_score: self.final_score(),
            can_check: self.phase == PuzzlePhase::AllPlaced,
        }
    }
}
