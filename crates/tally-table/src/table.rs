use std::collections::HashMap;
use std::ops::Add;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Observable state of a single `(row, column)` coordinate.
///
/// A coordinate is `Stored` when a cell value exists for it, `Empty` when
/// both of its keys are registered but nothing is stored (reads fall back to
/// the table default), and `Absent` when either key is unknown to the table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellState<'a, V> {
    /// A value is stored at this coordinate and is returned verbatim.
    Stored(&'a V),
    /// Row and column are both registered, but no value is stored.
    Empty,
    /// Row or column is not registered at all.
    Absent,
}

/// Sparse two-dimensional table keyed by `(row, column)` string pairs.
///
/// Row and column membership is tracked independently of cell storage: a
/// coordinate can be stored, empty (both keys registered, the default
/// applies) or absent — see [`CellState`]. A stored cell always has both of
/// its keys registered, and removing the last stored cell of a row or column
/// unregisters that key again.
///
/// Rows and columns iterate in insertion order until
/// [`Table::sort_rows_descending`] installs a new row order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Table<V> {
    rows: IndexSet<String>,
    cols: IndexSet<String>,
    /// Cell store, row key → column key → value. Inner maps are dropped as
    /// soon as they empty, so a present entry always holds at least one cell.
    cells: HashMap<String, HashMap<String, V>>,
    default: Option<V>,
    title: String,
}

impl<V: Default> Default for Table<V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

impl<V> Table<V> {
    /// Create an empty table with the given default value and no title.
    pub fn new(default: V) -> Self {
        Self::with_title(default, String::new())
    }

    /// Create an empty table with the given default value and title.
    ///
    /// The title only appears as the top-left field of the CSV rendering.
    pub fn with_title(default: V, title: impl Into<String>) -> Self {
        Self {
            rows: IndexSet::new(),
            cols: IndexSet::new(),
            cells: HashMap::new(),
            default: Some(default),
            title: title.into(),
        }
    }

    /// Create an empty table with no default value: empty coordinates read
    /// as no value at all, exactly like absent ones.
    pub fn without_default(title: impl Into<String>) -> Self {
        Self {
            rows: IndexSet::new(),
            cols: IndexSet::new(),
            cells: HashMap::new(),
            default: None,
            title: title.into(),
        }
    }

    /// The table title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replace the table title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// The configured default value, if any.
    pub fn default_value(&self) -> Option<&V> {
        self.default.as_ref()
    }

    /// Row keys in current iteration order.
    pub fn rows(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(String::as_str)
    }

    /// Column keys in current iteration order.
    pub fn cols(&self) -> impl Iterator<Item = &str> {
        self.cols.iter().map(String::as_str)
    }

    /// Number of registered rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of registered columns.
    pub fn col_count(&self) -> usize {
        self.cols.len()
    }

    /// Number of stored cells. Coordinates reading as the default are not
    /// stored and do not count.
    pub fn cell_count(&self) -> usize {
        self.cells.values().map(HashMap::len).sum()
    }

    /// True when no row or column is registered.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }

    /// Store `value` at `(row, col)`, registering both keys. Overwrites any
    /// previously stored value.
    pub fn set(&mut self, row: impl Into<String>, col: impl Into<String>, value: V) {
        let row = row.into();
        let col = col.into();
        self.rows.insert(row.clone());
        self.cols.insert(col.clone());
        self.cells.entry(row).or_default().insert(col, value);
    }

    /// Classify `(row, col)` into one of the three coordinate states.
    pub fn state(&self, row: &str, col: &str) -> CellState<'_, V> {
        if let Some(value) = self.cells.get(row).and_then(|r| r.get(col)) {
            CellState::Stored(value)
        } else if self.rows.contains(row) && self.cols.contains(col) {
            CellState::Empty
        } else {
            CellState::Absent
        }
    }

    /// The value at `(row, col)`: the stored value if one exists, else the
    /// table default if both keys are registered, else `None`.
    ///
    /// A default that happens to equal a stored value is indistinguishable
    /// here; callers that need to tell the two apart use [`Table::has`].
    pub fn get(&self, row: &str, col: &str) -> Option<&V> {
        match self.state(row, col) {
            CellState::Stored(value) => Some(value),
            CellState::Empty => self.default.as_ref(),
            CellState::Absent => None,
        }
    }

    /// True iff a value is stored at `(row, col)`. False for coordinates
    /// that merely read as the default.
    pub fn has(&self, row: &str, col: &str) -> bool {
        matches!(self.state(row, col), CellState::Stored(_))
    }

    /// Register a row key without storing any cell. Idempotent.
    pub fn ensure_row(&mut self, row: impl Into<String>) {
        self.rows.insert(row.into());
    }

    /// Register a column key without storing any cell. Idempotent.
    pub fn ensure_col(&mut self, col: impl Into<String>) {
        self.cols.insert(col.into());
    }

    /// [`Table::get`] across every registered column, in column order, for a
    /// registered row. Returns `None` for an unknown row (the whole call,
    /// not a row of `None`s).
    pub fn get_row(&self, row: &str) -> Option<Vec<Option<&V>>> {
        if !self.rows.contains(row) {
            return None;
        }
        Some(self.cols.iter().map(|col| self.get(row, col)).collect())
    }

    /// [`Table::get`] across every registered row, in row order, for a
    /// registered column. Returns `None` for an unknown column.
    pub fn get_col(&self, col: &str) -> Option<Vec<Option<&V>>> {
        if !self.cols.contains(col) {
            return None;
        }
        Some(self.rows.iter().map(|row| self.get(row, col)).collect())
    }

    /// Delete the stored cell at `(row, col)` if any, then unregister `col`
    /// when no stored cell remains in it, and likewise `row`.
    ///
    /// Both checks run on every call, so removing the only cell of a 1×1
    /// table drops its row and its column, and a `remove` aimed at
    /// registered-but-empty keys unregisters them.
    pub fn remove(&mut self, row: &str, col: &str) {
        if let Some(row_cells) = self.cells.get_mut(row) {
            row_cells.remove(col);
            if row_cells.is_empty() {
                self.cells.remove(row);
            }
        }

        // Stored cells always have registered keys, so scanning the store is
        // equivalent to probing every registered row/column.
        if !self.cells.values().any(|r| r.contains_key(col)) {
            self.cols.shift_remove(col);
        }
        if !self.cells.contains_key(row) {
            self.rows.shift_remove(row);
        }
    }

    /// Remove every stored cell in `row` via repeated [`Table::remove`],
    /// inheriting its auto-unregister behavior per column touched.
    pub fn remove_row(&mut self, row: &str) {
        let cols: Vec<String> = self.cols.iter().cloned().collect();
        for col in &cols {
            self.remove(row, col);
        }
    }

    /// Remove every stored cell in `col` via repeated [`Table::remove`],
    /// inheriting its auto-unregister behavior per row touched.
    pub fn remove_col(&mut self, col: &str) {
        let rows: Vec<String> = self.rows.iter().cloned().collect();
        for row in &rows {
            self.remove(row, col);
        }
    }

    /// Row keys ordered by `score` over each row's cells, highest score
    /// first.
    ///
    /// The rows are sorted ascending with a stable sort and the whole
    /// sequence is then reversed, so tied rows appear in the *reverse* of
    /// their current relative order. This is not the same as a stable
    /// descending sort, which would keep tied rows in their current order.
    pub fn rows_descending<S, F>(&self, mut score: F) -> Vec<String>
    where
        S: Ord,
        F: FnMut(&[Option<&V>]) -> S,
    {
        let mut scored: Vec<(S, &String)> = self
            .rows
            .iter()
            .map(|row| {
                let cells: Vec<Option<&V>> =
                    self.cols.iter().map(|col| self.get(row, col)).collect();
                (score(&cells), row)
            })
            .collect();
        scored.sort_by(|a, b| a.0.cmp(&b.0));
        scored.reverse();
        scored.into_iter().map(|(_, row)| row.clone()).collect()
    }

    /// Install the ordering produced by [`Table::rows_descending`] as the
    /// table's new row iteration order.
    pub fn sort_rows_descending<S, F>(&mut self, score: F)
    where
        S: Ord,
        F: FnMut(&[Option<&V>]) -> S,
    {
        let order = self.rows_descending(score);
        self.rows = order.into_iter().collect();
    }
}

impl<V> Table<V>
where
    V: Add<Output = V> + Clone,
{
    /// Store `value` at `(row, col)`, adding it onto the existing value when
    /// one is already stored there.
    pub fn set_or_add(&mut self, row: impl Into<String>, col: impl Into<String>, value: V) {
        let row = row.into();
        let col = col.into();
        match self.cells.get_mut(&row).and_then(|r| r.get_mut(&col)) {
            Some(cell) => *cell = cell.clone() + value,
            None => self.set(row, col, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_states_are_distinct() {
        let mut table = Table::new(0);
        table.set("r", "c", 7);
        table.ensure_row("empty");

        assert_eq!(table.state("r", "c"), CellState::Stored(&7));
        assert_eq!(table.state("empty", "c"), CellState::Empty);
        assert_eq!(table.state("r", "missing"), CellState::Absent);
        assert_eq!(table.state("missing", "c"), CellState::Absent);
    }

    #[test]
    fn empty_reads_as_default_only_when_one_is_configured() {
        let mut with_default = Table::new(5);
        with_default.ensure_row("r");
        with_default.ensure_col("c");
        assert_eq!(with_default.get("r", "c"), Some(&5));
        assert!(!with_default.has("r", "c"));

        let mut bare: Table<i64> = Table::without_default("");
        bare.ensure_row("r");
        bare.ensure_col("c");
        assert_eq!(bare.state("r", "c"), CellState::Empty);
        assert_eq!(bare.get("r", "c"), None);
    }

    #[test]
    fn stored_cells_imply_registered_keys() {
        let mut table = Table::new(0);
        table.set("r1", "c1", 1);
        table.set("r2", "c2", 2);

        for (row, col) in [("r1", "c1"), ("r2", "c2")] {
            assert!(table.rows().any(|r| r == row));
            assert!(table.cols().any(|c| c == col));
        }
        assert_eq!(table.cell_count(), 2);
    }

    #[test]
    fn removing_the_last_cell_unregisters_both_keys() {
        let mut table = Table::new(0);
        table.set("r", "c", 1);
        table.remove("r", "c");

        assert!(!table.has("r", "c"));
        assert_eq!(table.get("r", "c"), None);
        assert!(table.is_empty());
        assert_eq!(table.cell_count(), 0);
    }

    #[test]
    fn set_or_add_accumulates_only_stored_cells() {
        let mut table = Table::new(100);
        table.set_or_add("r", "c", 1);
        assert_eq!(table.get("r", "c"), Some(&1));

        // The default never participates in accumulation.
        table.set_or_add("r", "c", 2);
        assert_eq!(table.get("r", "c"), Some(&3));
    }
}
