use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

use crate::word::{WordEntry, WordKind};

pub const GRID_SIDE: usize = 5;
pub const CELL_COUNT: usize = GRID_SIDE * GRID_SIDE;
pub const CENTER: GridPosition = GridPosition(12);

/// Every winning line: 5 rows, 5 columns, 2 diagonals (row-major indices).
pub const PATTERNS: [[usize; GRID_SIDE]; 12] = [
    [0, 1, 2, 3, 4],
    [5, 6, 7, 8, 9],
    [10, 11, 12, 13, 14],
    [15, 16, 17, 18, 19],
    [20, 21, 22, 23, 24],
    [0, 5, 10, 15, 20],
    [1, 6, 11, 16, 21],
    [2, 7, 12, 17, 22],
    [3, 8, 13, 18, 23],
    [4, 9, 14, 19, 24],
    [0, 6, 12, 18, 24],
    [4, 8, 12, 16, 20],
];

/// Index 0..24 into the 5x5 arena, row-major. Defaults to the top-left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPosition(u8);

impl GridPosition {
    pub fn new(index: usize) -> Option<Self> {
        (index < CELL_COUNT).then_some(Self(index as u8))
    }

    pub fn from_row_col(row: usize, column: usize) -> Option<Self> {
        if row < GRID_SIDE && column < GRID_SIDE {
            Self::new(row * GRID_SIDE + column)
        } else {
            None
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn row(self) -> usize {
        self.index() / GRID_SIDE
    }

    pub const fn column(self) -> usize {
        self.index() % GRID_SIDE
    }

    pub fn all() -> impl Iterator<Item = GridPosition> {
        (0..CELL_COUNT as u8).map(GridPosition)
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether every position received an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyStatus {
    Complete,
    Insufficient { filled: usize, missing: usize },
}

impl AssemblyStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, AssemblyStatus::Complete)
    }
}

/// Which entry goes where. Entries are owned copies of the source list.
#[derive(Debug, Clone)]
pub struct Layout {
    slots: [Option<WordEntry>; CELL_COUNT],
    pub status: AssemblyStatus,
}

impl Layout {
    pub fn slot(&self, position: GridPosition) -> Option<&WordEntry> {
        self.slots[position.index()].as_ref()
    }

    pub fn into_slots(self) -> [Option<WordEntry>; CELL_COUNT] {
        self.slots
    }
}

/// Places one randomly chosen Free entry at the center and fills the other
/// positions, in input order, from the non-Free entries. Unchosen Free
/// entries are left out of the grid. Without a Free entry the center is an
/// ordinary slot.
pub fn assemble_layout<R: Rng + ?Sized>(entries: &[WordEntry], rng: &mut R) -> Layout {
    let (free, rest): (Vec<&WordEntry>, Vec<&WordEntry>) =
        entries.iter().partition(|e| e.kind == WordKind::Free);
    let free_entry = free.choose(rng).copied();

    let mut slots: [Option<WordEntry>; CELL_COUNT] = std::array::from_fn(|_| None);
    let mut pool = rest.into_iter();
    for position in GridPosition::all() {
        if position == CENTER && free_entry.is_some() {
            continue;
        }
        slots[position.index()] = pool.next().cloned();
    }
    if let Some(entry) = free_entry {
        slots[CENTER.index()] = Some(entry.clone());
    }

    let filled = slots.iter().filter(|s| s.is_some()).count();
    let status = if filled == CELL_COUNT {
        AssemblyStatus::Complete
    } else {
        log::warn!(
            "only {filled} of {CELL_COUNT} positions could be filled ({} entries supplied)",
            entries.len()
        );
        AssemblyStatus::Insufficient {
            filled,
            missing: CELL_COUNT - filled,
        }
    };

    Layout { slots, status }
}
