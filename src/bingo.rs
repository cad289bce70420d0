use std::collections::HashSet;

use crate::grid::{CELL_COUNT, PATTERNS};

/// Celebration thresholds, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum_macros::Display)]
pub enum Tier {
    OneLine,
    TwoLines,
    FullHouse,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::OneLine, Tier::TwoLines, Tier::FullHouse];

    pub fn banner(&self) -> &'static str {
        match self {
            Tier::OneLine => "BINGO!",
            Tier::TwoLines => "DOUBLE BINGO!",
            Tier::FullHouse => "FULL HOUSE!",
        }
    }
}

/// What the evaluator needs to know about one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellSnapshot {
    pub marked: bool,
    pub disabled: bool,
}

impl CellSnapshot {
    /// An unfilled position: never counted, never eligible.
    pub const VACANT: CellSnapshot = CellSnapshot {
        marked: false,
        disabled: true,
    };

    pub fn new(marked: bool, disabled: bool) -> Self {
        Self { marked, disabled }
    }

    pub fn is_counted(&self) -> bool {
        self.marked && !self.disabled
    }

    pub fn is_eligible(&self) -> bool {
        !self.disabled
    }
}

/// Tiers already celebrated during the current grid's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionAchievements {
    fired: HashSet<Tier>,
}

impl SessionAchievements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, tier: Tier) -> bool {
        self.fired.contains(&tier)
    }

    pub fn record(&mut self, tier: Tier) {
        self.fired.insert(tier);
    }

    pub fn highest(&self) -> Option<Tier> {
        self.fired.iter().max().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardReport {
    pub completed_lines: usize,
    pub counted: usize,
    pub eligible: usize,
    pub full_house: bool,
}

pub fn report(cells: &[CellSnapshot; CELL_COUNT]) -> BoardReport {
    let completed_lines = PATTERNS
        .iter()
        .filter(|pattern| pattern.iter().all(|&i| cells[i].is_counted()))
        .count();
    let counted = cells.iter().filter(|c| c.is_counted()).count();
    let eligible = cells.iter().filter(|c| c.is_eligible()).count();

    BoardReport {
        completed_lines,
        counted,
        eligible,
        full_house: eligible > 0 && counted == eligible,
    }
}

/// Returns the tier that fires for this board state, if any, and records it.
///
/// Higher tiers are checked first so that a single change which jumps past
/// several thresholds reports the highest one. A tier already in
/// `achievements` never fires again.
pub fn evaluate(
    cells: &[CellSnapshot; CELL_COUNT],
    achievements: &mut SessionAchievements,
) -> Option<Tier> {
    let report = report(cells);
    let candidates = [
        (Tier::FullHouse, report.full_house),
        (Tier::TwoLines, report.completed_lines >= 2),
        (Tier::OneLine, report.completed_lines >= 1),
    ];

    let tier = candidates
        .into_iter()
        .find(|&(tier, holds)| holds && !achievements.contains(tier))
        .map(|(tier, _)| tier)?;

    achievements.record(tier);
    log::info!(
        "{tier} after {} lines, {}/{} cells",
        report.completed_lines,
        report.counted,
        report.eligible
    );
    Some(tier)
}
