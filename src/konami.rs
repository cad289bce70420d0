use crossterm::event::KeyCode;

const SEQUENCE: [KeyCode; 10] = [
    KeyCode::Up,
    KeyCode::Up,
    KeyCode::Down,
    KeyCode::Down,
    KeyCode::Left,
    KeyCode::Right,
    KeyCode::Left,
    KeyCode::Right,
    KeyCode::Char('b'),
    KeyCode::Char('a'),
];

/// Watches key presses for ↑↑↓↓←→←→ b a.
#[derive(Debug, Default, Clone)]
pub struct KonamiTracker {
    matched: usize,
}

impl KonamiTracker {
    /// Returns true when `code` completes the sequence.
    pub fn push(&mut self, code: KeyCode) -> bool {
        if code == SEQUENCE[self.matched] {
            self.matched += 1;
        } else if code == SEQUENCE[0] {
            // ↑↑↑ keeps the last two as a valid start
            self.matched = if self.matched == 2 { 2 } else { 1 };
        } else {
            self.matched = 0;
        }

        if self.matched == SEQUENCE.len() {
            self.matched = 0;
            return true;
        }
        false
    }
}
