use std::rc::Rc;

use bingo::bingo::Tier;
use bingo::board::Board;
use bingo::cell::{CellOptions, TimerPhase};
use bingo::celebration::{Effect, RecordingSink};
use bingo::grid::{GridPosition, CELL_COUNT, CENTER};
use bingo::schedule::ManualScheduler;
use bingo::word::{WordEntry, WordKind};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn pos(i: usize) -> GridPosition {
    GridPosition::new(i).unwrap()
}

fn fields_and_free() -> Vec<WordEntry> {
    let mut entries: Vec<WordEntry> = (0..24).map(|i| WordEntry::field(format!("W{i}"))).collect();
    entries.push(WordEntry::free("FREE"));
    entries
}

fn board(entries: &[WordEntry], scheduler: Rc<ManualScheduler>) -> Board {
    let mut rng = StdRng::seed_from_u64(2024);
    Board::assemble(entries, &mut rng, scheduler, CellOptions::default()).unwrap()
}

#[test]
fn rows_then_full_house() {
    let mut board = board(&fields_and_free(), Rc::new(ManualScheduler::new()));
    let mut sink = RecordingSink::default();

    assert_eq!(board.cell(CENTER).unwrap().entry().text, "FREE");
    for (i, cell) in board.cells().filter(|c| c.position() != CENTER).enumerate() {
        assert_eq!(cell.entry().text, format!("W{i}"));
    }

    let mut fired = Vec::new();
    for i in 0..5 {
        fired.extend(board.primary(pos(i), None, &mut sink));
    }
    assert_eq!(fired, vec![Tier::OneLine]);

    for i in 5..10 {
        fired.extend(board.primary(pos(i), None, &mut sink));
    }
    assert_eq!(fired, vec![Tier::OneLine, Tier::TwoLines]);

    for i in 10..CELL_COUNT {
        if i != CENTER.index() {
            fired.extend(board.primary(pos(i), None, &mut sink));
        }
    }
    assert_eq!(fired, vec![Tier::OneLine, Tier::TwoLines, Tier::FullHouse]);
    assert_eq!(sink.tiers(), fired);
}

#[test]
fn tiers_fire_once_per_grid() {
    let mut board = board(&fields_and_free(), Rc::new(ManualScheduler::new()));
    let mut sink = RecordingSink::default();

    for i in 0..5 {
        board.primary(pos(i), None, &mut sink);
    }
    // unmark and re-mark the completing cell a few times
    for _ in 0..3 {
        assert_eq!(board.primary(pos(4), None, &mut sink), None);
        assert_eq!(board.primary(pos(4), None, &mut sink), None);
    }
    assert_eq!(sink.tiers(), vec![Tier::OneLine]);
}

#[test]
fn full_house_beats_two_lines_on_the_same_evaluation() {
    let mut board = board(&fields_and_free(), Rc::new(ManualScheduler::new()));
    let mut sink = RecordingSink::default();

    // keep only row 0 and column 0 (plus the free center) in play
    let in_play = |i: usize| i < 5 || i % 5 == 0;
    for i in 0..CELL_COUNT {
        if !in_play(i) && i != CENTER.index() {
            board.secondary(pos(i), &mut sink);
        }
    }
    for i in (1..CELL_COUNT).filter(|&i| in_play(i)) {
        assert_eq!(board.primary(pos(i), None, &mut sink), None);
    }
    assert!(board.achievements().is_empty());

    // position 0 closes row 0, column 0 and every eligible cell at once
    assert_eq!(board.primary(pos(0), None, &mut sink), Some(Tier::FullHouse));
    assert_eq!(board.report().completed_lines, 2);
    assert_eq!(sink.tiers(), vec![Tier::FullHouse]);
    assert!(!board.achievements().contains(Tier::TwoLines));

    // the skipped tiers were never celebrated, so they fire on later changes
    assert_eq!(board.secondary(pos(6), &mut sink), Some(Tier::TwoLines));
    assert_eq!(board.secondary(pos(6), &mut sink), Some(Tier::OneLine));
    assert_eq!(board.secondary(pos(6), &mut sink), None);
    assert_eq!(
        sink.tiers(),
        vec![Tier::FullHouse, Tier::TwoLines, Tier::OneLine]
    );
}

#[test]
fn disabling_shrinks_the_denominator() {
    let mut board = board(&fields_and_free(), Rc::new(ManualScheduler::new()));
    let mut sink = RecordingSink::default();

    for i in 0..CELL_COUNT {
        if i != CENTER.index() && i != 7 {
            board.primary(pos(i), None, &mut sink);
        }
    }
    let report = board.report();
    assert_eq!((report.counted, report.eligible), (24, 25));
    assert!(!report.full_house);

    board.secondary(pos(7), &mut sink);
    let report = board.report();
    assert_eq!((report.counted, report.eligible), (24, 24));
    assert!(report.full_house);

    board.secondary(pos(7), &mut sink);
    assert!(!board.report().full_house);
}

#[test]
fn timer_lifecycle_counts_without_a_mark() {
    let mut entries = fields_and_free();
    entries[6] = WordEntry::timer("Dog barks twice", 2);
    let scheduler = Rc::new(ManualScheduler::new());
    let mut board = board(&entries, scheduler.clone());
    let mut sink = RecordingSink::default();
    let at = pos(6);

    assert_eq!(board.cell(at).unwrap().state().kind, WordKind::Timer);
    board.primary(at, None, &mut sink);
    let beat = scheduler.live_ticks()[0];

    board.on_timer_tick(beat, &mut sink);
    assert!(!board.cell(at).unwrap().state().marked);
    board.on_timer_tick(beat, &mut sink);

    let state = board.cell(at).unwrap().state();
    let timer = state.timer.unwrap();
    assert_eq!(timer.phase, TimerPhase::Completed);
    assert_eq!(timer.remaining, 0);
    assert!(state.snapshot().is_counted());
    assert!(scheduler.live_ticks().is_empty());
    assert!(sink.effects.contains(&Effect::TimerComplete { position: at }));
}

#[test]
fn extra_free_entries_are_left_out() {
    let mut entries = fields_and_free();
    entries.insert(3, WordEntry::free("FREE 2"));
    entries.insert(9, WordEntry::free("FREE 3"));
    let board = board(&entries, Rc::new(ManualScheduler::new()));

    let frees: Vec<GridPosition> = board
        .cells()
        .filter(|c| c.entry().kind == WordKind::Free)
        .map(|c| c.position())
        .collect();
    assert_eq!(frees, vec![CENTER]);
    assert!(board.status().is_complete());
}
