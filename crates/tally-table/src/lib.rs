//! `tally-table` is a sparse two-dimensional associative table: a mapping
//! from `(row key, column key)` pairs to values, with a per-table default
//! for registered-but-empty coordinates.
//!
//! The design centers on the table's identity model:
//! - row and column *membership* is tracked independently of cell *storage*,
//!   so a coordinate is stored, empty (default applies) or absent
//!   ([`CellState`]);
//! - removing the last stored cell of a row or column unregisters that key
//!   again, keeping membership and storage in sync.
//!
//! Around the core sit a lossy comma-delimited CSV snapshot format with a
//! quote-aware alternative, import of JSON record arrays, and a stable
//! score-based row ranking. Tables are plain owned values with a
//! `serde`-friendly schema; there is no interior mutability and no I/O
//! beyond taking and returning strings.

mod export;
mod import;
mod table;

pub use import::{CsvImportError, JsonImportError, ParseMode};
pub use table::{CellState, Table};
