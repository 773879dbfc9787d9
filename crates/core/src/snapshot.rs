use serde::Serialize;

use crate::scoring::Multiplier;
use crate::types::{CheckResult, Episode};

/// Coarse phase of the check state machine, for gating buttons and gestures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PhaseKind {
    Idle,
    AllPlaced,
    Checking,
    Revealed,
}

impl PhaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::Idle => "idle",
            PhaseKind::AllPlaced => "allPlaced",
            PhaseKind::Checking => "checking",
            PhaseKind::Revealed => "revealed",
        }
    }
}

/// One indicator dot per card still in hand, in deck order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardIndicator {
    pub episode_id: String,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotSnapshot {
    pub index: usize,
    pub episode: Option<Episode>,
    pub result: CheckResult,
    /// Whether the slot's card may be picked up (or dropped onto)
    pub draggable: bool,
}

/// Read-only view of a puzzle, everything the presentation layer renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleSnapshot {
    pub round: u32,
    pub phase: PhaseKind,
    /// Card currently shown in hand; `None` once every card is placed
    pub current: Option<Episode>,
    pub indicators: Vec<CardIndicator>,
    pub slots: Vec<SlotSnapshot>,
    pub complete: bool,
    pub timer_started: bool,
    pub elapsed_secs: u64,
    pub multiplier: Multiplier,
    pub base_score: u32,
    /// Only present once the score is revealed
    pub final_score: Option<u32>,
    pub can_check: bool,
}

impl PuzzleSnapshot {
    pub fn available_count(&self) -> usize {
        self.indicators.len()
    }

    pub fn placed_count(&self) -> usize {
        self.slots.iter().filter(|s| s.episode.is_some()).count()
    }

    /// Elapsed time as `m:ss`, the way the floating timer shows it
    pub fn elapsed_label(&self) -> String {
        format!("{}:{:02}", self.elapsed_secs / 60, self.elapsed_secs % 60)
    }
}
