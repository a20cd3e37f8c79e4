//! Value-tagged interval rows: runs of arbitrary attribute words.

use super::Placement;

/// Run-length encoded row of attribute words.
///
/// Each mark `(starts[i], values[i])` opens a run holding `values[i]` up to
/// the next mark. Invariants:
///
/// - `starts` strictly increases;
/// - adjacent marks carry different values;
/// - the first mark is non-zero (the leading region already reads 0);
/// - the last mark is zero (it opens the infinite trailing region).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValueIntervals {
  starts: Vec<u32>,
  values: Vec<u64>,
}

impl ValueIntervals {
  pub fn new() -> Self {
    Self { starts: Vec::new(), values: Vec::new() }
  }

  #[inline]
  pub fn get(&self, x: u32) -> u64 {
    match self.starts.partition_point(|&b| b <= x) {
      0 => 0,
      i => self.values[i - 1],
    }
  }

  /// Store `value` at `x`. `x` must be below `u32::MAX`.
  pub fn set(&mut self, x: u32, value: u64) {
    debug_assert!(x < u32::MAX, "interval positions must leave room for x + 1");
    match Placement::classify(&self.starts, x) {
      Placement::BeforeRun => {
        if value == 0 {
          return;
        }
        match self.starts.first() {
          Some(&first) if first == x + 1 => {
            if self.values[0] == value {
              self.starts[0] = x;
            } else {
              self.insert_mark(0, x, value);
            }
          }
          _ => {
            self.insert_mark(0, x + 1, 0);
            self.insert_mark(0, x, value);
          }
        }
      }
      Placement::AfterRun => {
        if value == 0 {
          return;
        }
        let last = self.starts.len() - 1;
        if self.starts[last] == x {
          // a trailing mark always follows a non-zero run
          if self.values[last - 1] == value {
            self.starts[last] = x + 1;
          } else {
            self.values[last] = value;
            self.push_mark(x + 1, 0);
          }
        } else {
          self.push_mark(x, value);
          self.push_mark(x + 1, 0);
        }
      }
      Placement::RisingEdge(j) => {
        let current = self.values[j];
        if current == value {
          return;
        }
        let prev = if j == 0 { 0 } else { self.values[j - 1] };
        if self.starts[j + 1] - self.starts[j] == 1 {
          let next = self.values[j + 1];
          match (prev == value, next == value) {
            (true, true) => self.remove_marks(j, 2),
            (true, false) => self.remove_marks(j, 1),
            (false, true) => {
              self.starts[j + 1] = x;
              self.remove_marks(j, 1);
            }
            (false, false) => self.values[j] = value,
          }
        } else if prev == value {
          self.starts[j] = x + 1;
        } else {
          self.values[j] = value;
          self.insert_mark(j + 1, x + 1, current);
        }
      }
      Placement::FallingEdge(j) => {
        if self.values[j] == value {
          return;
        }
        if self.values[j + 1] == value {
          self.starts[j + 1] = x;
        } else {
          self.insert_mark(j + 1, x, value);
        }
      }
      Placement::InsideRun(j) => {
        let current = self.values[j];
        if current == value {
          return;
        }
        self.insert_mark(j + 1, x + 1, current);
        self.insert_mark(j + 1, x, value);
      }
    }
  }

  /// Remove every run, keeping the allocation.
  pub fn clear(&mut self) {
    self.starts.clear();
    self.values.clear();
  }

  pub fn breakpoint_count(&self) -> usize {
    self.starts.len()
  }

  /// `(start, end, value)` of every non-zero run, end exclusive.
  pub fn runs(&self) -> impl Iterator<Item = (u32, u32, u64)> + '_ {
    self
      .starts
      .windows(2)
      .zip(&self.values)
      .filter(|(_, value)| **value != 0)
      .map(|(pair, &value)| (pair[0], pair[1], value))
  }

  pub fn memory_bytes(&self) -> usize {
    self.starts.capacity() * std::mem::size_of::<u32>()
      + self.values.capacity() * std::mem::size_of::<u64>()
  }

  #[inline]
  fn insert_mark(&mut self, index: usize, start: u32, value: u64) {
    self.starts.insert(index, start);
    self.values.insert(index, value);
  }

  #[inline]
  fn push_mark(&mut self, start: u32, value: u64) {
    self.starts.push(start);
    self.values.push(value);
  }

  #[inline]
  fn remove_marks(&mut self, index: usize, count: usize) {
    self.starts.drain(index..index + count);
    self.values.drain(index..index + count);
  }
}

#[cfg(test)]
#[path = "value_intervals_test.rs"]
mod value_intervals_test;
