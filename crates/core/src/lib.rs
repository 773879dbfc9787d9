//! Core puzzle logic module - pure, deterministic, and testable
//!
//! This module contains the puzzle rules, state management and scoring. It has
//! **zero dependencies** on UI, networking, or I/O:
//!
//! - **Deterministic**: randomness and time are injected ([`rand::RngCore`] and [`Clock`])
//! - **Testable**: a seeded RNG plus a [`ManualClock`] reproduce any round exactly
//! - **Portable**: runs wherever the presentation layer runs
//!
//! # Module Structure
//!
//! - [`clock`]: monotonic time source used for the arrangement timer
//! - [`deck`]: shuffled browse order and the slot array
//! - [`puzzle`]: the complete puzzle state and its check state machine
//! - [`scoring`]: per-slot points and the time multiplier
//! - [`snapshot`]: read-only view for rendering
//!
//! # Rules
//!
//! - One slot per episode; slot `k` (0-based) is correct for the episode with air order `k + 1`
//! - The timer starts on the first placement and stops when checking begins
//! - Checking scores one slot every 250ms: `+10` correct, `-5` incorrect, floored at 0
//! - Final score is `round(base * multiplier)`, multiplier `max(1.0, 2.0 - floor(secs / 5) * 0.1)`
//!
//! # Example
//!
//! ```
//! use guesseries_core::{ManualClock, Puzzle, PuzzleConfig};
//! use guesseries_types::{Episode, PuzzleAction};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let pool = vec![
//!     Episode::new("s1e1", 1, "Pilot"),
//!     Episode::new("s1e2", 2, "Second"),
//! ];
//! let config = PuzzleConfig { check_step_ms: 0 };
//! let mut puzzle =
//!     Puzzle::with_sources(pool, config, StdRng::seed_from_u64(7), ManualClock::new(0)).unwrap();
//!
//! puzzle.apply_action(&PuzzleAction::Place { episode_id: "s1e1".into(), slot: 0 });
//! puzzle.apply_action(&PuzzleAction::Place { episode_id: "s1e2".into(), slot: 1 });
//! assert!(puzzle.apply_action(&PuzzleAction::Check));
//!
//! // Two correct slots, no time spent: 20 * 2.0
//! assert_eq!(puzzle.final_score(), Some(40));
//! ```

pub mod clock;
pub mod deck;
pub mod puzzle;
pub mod scoring;
pub mod snapshot;

pub use guesseries_types as types;

// Re-export commonly used types for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use deck::{Deck, Slots};
pub use puzzle::{CheckPass, Puzzle, PuzzleConfig, PuzzleError, PuzzleEvent, PuzzlePhase, Reveal};
pub use scoring::{apply_check_result, base_score_for, judge_slot, Multiplier};
pub use snapshot::{CardIndicator, PhaseKind, PuzzleSnapshot, SlotSnapshot};
