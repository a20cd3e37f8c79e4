//! Row storage: one addressable 1D sequence of attribute words.
//!
//! A grid keeps one [`Row`] per slice. Three interchangeable encodings are
//! available, chosen once at grid construction through [`RowStorage`]:
//!
//! ```text
//! Dense:           [a][a][a][b][b][a][a][0][0][0] ...      one cell per position
//!
//! BitIntervals:    starts = [3, 5, 8, 9]                    even = rise, odd = fall
//!                  0 0 0 1 1 0 0 0 1 0 0 ...
//!
//! ValueIntervals:  marks = [(0,a), (3,b), (5,a), (7,0)]     value holds until next mark
//!                  a a a b b a a 0 0 0 ...
//! ```
//!
//! Interval rows are conceptually infinite: positions before the first
//! breakpoint and at or after the last one read as 0.
//!
//! # Placement
//!
//! Interval `set` is driven by classifying the target position against the
//! run structure. A *run* is the constant region `[b[j], b[j+1])`:
//!
//! ```text
//!            run j
//!        ┌───────────┐
//!   ...  b[j]  ...  b[j+1]-1  b[j+1]  ...           b[last]  ...
//!        ▲      ▲       ▲                              ▲
//!   RisingEdge  │   FallingEdge                    AfterRun (x >= b[last])
//!           InsideRun
//!   BeforeRun: x < b[0] (or the row is empty)
//! ```
//!
//! A run of length one reports `RisingEdge`.

mod bit_intervals;
mod dense;
mod value_intervals;

pub use bit_intervals::BitIntervals;
pub use dense::{CellWidth, DenseRow};
pub use value_intervals::ValueIntervals;

/// Position of a target cell relative to the runs of an interval row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
  /// Before the first breakpoint (or the row has none).
  BeforeRun,
  /// First cell of run `j`.
  RisingEdge(usize),
  /// Strictly inside run `j`, neither first nor last cell.
  InsideRun(usize),
  /// Last cell of run `j`, which is at least two cells long.
  FallingEdge(usize),
  /// At or after the last breakpoint, in the implicit trailing zero region.
  AfterRun,
}

impl Placement {
  /// Classify `x` against the strictly increasing breakpoint list `starts`.
  #[inline]
  pub fn classify(starts: &[u32], x: u32) -> Self {
    let last = match starts.last() {
      Some(&last) => last,
      None => return Placement::BeforeRun,
    };
    if x >= last {
      return Placement::AfterRun;
    }
    // number of breakpoints <= x
    let i = starts.partition_point(|&b| b <= x);
    if i == 0 {
      return Placement::BeforeRun;
    }
    let j = i - 1;
    if starts[j] == x {
      Placement::RisingEdge(j)
    } else if x + 1 == starts[j + 1] {
      Placement::FallingEdge(j)
    } else {
      Placement::InsideRun(j)
    }
  }
}

/// Row encoding selected when a grid is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RowStorage {
  /// One cell per position, `CellWidth` bits each.
  Dense(CellWidth),
  /// Binary on/off runs; suits mostly empty or mostly full masks.
  BitIntervals,
  /// Arbitrary values as runs; suits rows of one background value with
  /// localized exceptions.
  ValueIntervals,
}

impl RowStorage {
  /// Widest attribute (in bits) this storage can hold without truncation.
  pub fn attribute_bits(&self) -> u32 {
    match self {
      RowStorage::Dense(width) => width.bits(),
      RowStorage::BitIntervals => 1,
      RowStorage::ValueIntervals => 64,
    }
  }

  /// Whether rows address positions with `usize` rather than `u32`.
  pub fn supports_wide_positions(&self) -> bool {
    matches!(self, RowStorage::Dense(_))
  }

  /// Allocate an empty row of `len` cells.
  pub fn make_row(&self, len: usize) -> Row {
    match self {
      RowStorage::Dense(width) => Row::Dense(DenseRow::new(*width, len)),
      RowStorage::BitIntervals => Row::BitIntervals(BitIntervals::new()),
      RowStorage::ValueIntervals => Row::ValueIntervals(ValueIntervals::new()),
    }
  }
}

/// One slice worth of attribute words in any of the supported encodings.
#[derive(Clone, Debug, PartialEq)]
pub enum Row {
  Dense(DenseRow),
  BitIntervals(BitIntervals),
  ValueIntervals(ValueIntervals),
}

impl Row {
  #[inline]
  pub fn get(&self, pos: usize) -> u64 {
    match self {
      Row::Dense(row) => row.get(pos),
      Row::BitIntervals(row) => row.get(pos as u32),
      Row::ValueIntervals(row) => row.get(pos as u32),
    }
  }

  /// Store `value` at `pos`. Binary rows treat any non-zero value as 1.
  #[inline]
  pub fn set(&mut self, pos: usize, value: u64) {
    match self {
      Row::Dense(row) => row.set(pos, value),
      Row::BitIntervals(row) => row.set(pos as u32, value != 0),
      Row::ValueIntervals(row) => row.set(pos as u32, value),
    }
  }

  /// Reset every position to 0, keeping allocated capacity.
  pub fn clear(&mut self) {
    match self {
      Row::Dense(row) => row.clear(),
      Row::BitIntervals(row) => row.clear(),
      Row::ValueIntervals(row) => row.clear(),
    }
  }

  /// Bytes of backing storage currently allocated.
  pub fn memory_bytes(&self) -> usize {
    match self {
      Row::Dense(row) => row.memory_bytes(),
      Row::BitIntervals(row) => row.memory_bytes(),
      Row::ValueIntervals(row) => row.memory_bytes(),
    }
  }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
