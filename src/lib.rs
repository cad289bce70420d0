// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod bingo;
pub mod board;
pub mod celebration;
pub mod cell;
pub mod config;
pub mod error;
pub mod grid;
pub mod konami;
pub mod logging;
pub mod runtime;
pub mod schedule;
pub mod word;
pub mod word_store;

pub use board::Board;
pub use word::{WordEntry, WordKind};
