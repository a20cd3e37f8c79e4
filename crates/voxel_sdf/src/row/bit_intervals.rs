//! Binary interval rows: on/off runs stored as sorted breakpoints.

use super::Placement;

/// Run-length encoded bit row.
///
/// `starts` is strictly increasing. An even index opens a run of ones, the
/// following odd index closes it, so the length is always even:
///
/// ```text
///   starts = [2, 4, 7, 8]
///   bits   = 0 0 1 1 0 0 0 1 0 0 ...
/// ```
///
/// Two runs of equal value are never adjacent: merging happens on every
/// `set` that closes a gap.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitIntervals {
  starts: Vec<u32>,
}

impl BitIntervals {
  pub fn new() -> Self {
    Self { starts: Vec::new() }
  }

  /// Empty row with room for `runs` runs before the first reallocation.
  pub fn with_capacity(runs: usize) -> Self {
    Self { starts: Vec::with_capacity(runs * 2) }
  }

  #[inline]
  pub fn get(&self, x: u32) -> u64 {
    let i = self.starts.partition_point(|&b| b <= x);
    (i % 2 == 1) as u64
  }

  #[inline]
  pub fn is_set(&self, x: u32) -> bool {
    self.get(x) == 1
  }

  /// Set or clear the bit at `x`. `x` must be below `u32::MAX`.
  pub fn set(&mut self, x: u32, on: bool) {
    debug_assert!(x < u32::MAX, "interval positions must leave room for x + 1");
    let starts = &mut self.starts;
    match Placement::classify(starts, x) {
      Placement::BeforeRun => {
        if !on {
          return;
        }
        if starts.first() == Some(&(x + 1)) {
          starts[0] = x;
        } else {
          starts.splice(0..0, [x, x + 1]);
        }
      }
      Placement::AfterRun => {
        if !on {
          return;
        }
        match starts.last_mut() {
          // trailing gap starts exactly here: the last run grows by one
          Some(last) if *last == x => *last = x + 1,
          _ => starts.extend_from_slice(&[x, x + 1]),
        }
      }
      Placement::RisingEdge(j) => {
        if run_is_on(j) == on {
          return;
        }
        if starts[j + 1] - starts[j] == 1 {
          // single-cell run disappears, its neighbours merge
          starts.drain(j..j + 2);
        } else {
          starts[j] += 1;
        }
      }
      Placement::FallingEdge(j) => {
        if run_is_on(j) == on {
          return;
        }
        starts[j + 1] -= 1;
      }
      Placement::InsideRun(j) => {
        if run_is_on(j) == on {
          return;
        }
        starts.splice(j + 1..j + 1, [x, x + 1]);
      }
    }
  }

  /// Remove every run, keeping the allocation.
  pub fn clear(&mut self) {
    self.starts.clear();
  }

  /// Raw breakpoint list.
  pub fn breakpoints(&self) -> &[u32] {
    &self.starts
  }

  pub fn breakpoint_count(&self) -> usize {
    self.starts.len()
  }

  /// `(start, end)` of every run of ones, end exclusive.
  pub fn runs(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
    self.starts.chunks_exact(2).map(|pair| (pair[0], pair[1]))
  }

  /// Number of set bits.
  pub fn count_ones(&self) -> u64 {
    self.runs().map(|(start, end)| (end - start) as u64).sum()
  }

  pub fn memory_bytes(&self) -> usize {
    self.starts.capacity() * std::mem::size_of::<u32>()
  }
}

#[inline]
fn run_is_on(j: usize) -> bool {
  j % 2 == 0
}

#[cfg(test)]
#[path = "bit_intervals_test.rs"]
mod bit_intervals_test;
