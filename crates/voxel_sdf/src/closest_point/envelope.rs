//! One-dimensional nearest-point pass.
//!
//! Every point `i` on a line contributes the parabola
//! `f_i(t) = (t - c_i)^2 + o_i`, where `c_i` is its coordinate along the line
//! and `o_i` its squared distance to the line. The nearest point of a cell is
//! the owner of the lower envelope at the cell center:
//!
//! ```text
//!   f(t)
//!    │ \         /\            /
//!    │  \       /  \          /
//!    │   \_____/    \________/
//!    │     p0    ▲     p1
//!    └───────────┼───────────────► t
//!              w[1] (boundary p0 | p1)
//! ```
//!
//! Parabolas are pushed in coordinate order; a new one pops every parabola
//! whose region it swallows. Cell `q` is sampled at `q + 0.5` and a center
//! lying exactly on a boundary stays with the left (lower coordinate)
//! parabola.

/// Coordinates closer than this along the line count as coincident.
pub const EPS: f64 = 1e-5;

/// Offset of a cell center from its integer coordinate.
pub const HALF: f64 = 0.5;

/// Points found on one line, ordered by coordinate along the line.
#[derive(Clone, Debug, Default)]
pub struct LinePoints {
  ids: Vec<u32>,
  coords: Vec<f64>,
  offsets: Vec<f64>,
}

impl LinePoints {
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      ids: Vec::with_capacity(capacity),
      coords: Vec::with_capacity(capacity),
      offsets: Vec::with_capacity(capacity),
    }
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.ids.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.ids.is_empty()
  }

  pub fn clear(&mut self) {
    self.ids.clear();
    self.coords.clear();
    self.offsets.clear();
  }

  pub fn ids(&self) -> &[u32] {
    &self.ids
  }

  pub fn coords(&self) -> &[f64] {
    &self.coords
  }

  pub fn offsets(&self) -> &[f64] {
    &self.offsets
  }

  /// Insert point `id` keeping the coordinates ascending.
  ///
  /// A point within [`EPS`] of an existing entry replaces it only when its
  /// offset is strictly smaller; otherwise it is dropped. Points arrive in
  /// cell order, so the insertion position is searched from the back.
  pub fn insert_sorted(&mut self, id: u32, coord: f64, offset: f64) {
    if !(coord.is_finite() && offset.is_finite()) {
      return;
    }

    let mut pos = self.coords.len();
    while pos > 0 && self.coords[pos - 1] > coord {
      pos -= 1;
    }

    let before = pos.checked_sub(1);
    for near in before.into_iter().chain(Some(pos)) {
      let Some(&existing) = self.coords.get(near) else {
        continue;
      };
      if (existing - coord).abs() <= EPS {
        if offset < self.offsets[near] {
          self.ids[near] = id;
          self.coords[near] = coord;
          self.offsets[near] = offset;
        }
        return;
      }
    }

    self.ids.insert(pos, id);
    self.coords.insert(pos, coord);
    self.offsets.insert(pos, offset);
  }
}

/// Lower envelope stack: `v[k]` is the line-point index owning segment `k`,
/// which starts at `w[k]`.
#[derive(Clone, Debug, Default)]
pub struct Envelope {
  v: Vec<usize>,
  w: Vec<f64>,
}

impl Envelope {
  pub fn with_capacity(capacity: usize) -> Self {
    Self { v: Vec::with_capacity(capacity), w: Vec::with_capacity(capacity) }
  }

  /// Number of parabolas on the envelope after the last build.
  #[inline]
  pub fn len(&self) -> usize {
    self.v.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.v.is_empty()
  }

  /// Build the envelope of `points`, which must be non-empty and sorted.
  fn build(&mut self, points: &LinePoints) {
    let c = points.coords();
    let o = points.offsets();

    self.v.clear();
    self.w.clear();
    self.v.push(0);
    self.w.push(f64::NEG_INFINITY);

    'points: for i in 1..c.len() {
      let fi = c[i] * c[i] + o[i];
      loop {
        let j = self.v[self.v.len() - 1];
        let dx = c[i] - c[j];
        if dx.abs() <= EPS {
          // coincident: keep the current winner
          continue 'points;
        }
        let s = (fi - (c[j] * c[j] + o[j])) / (2.0 * dx);
        if s <= self.w[self.w.len() - 1] {
          self.v.pop();
          self.w.pop();
          continue;
        }
        self.v.push(i);
        self.w.push(s);
        break;
      }
    }
  }
}

/// Per-worker buffers, sized once to the largest grid dimension.
#[derive(Clone, Debug)]
pub struct LineScratch {
  pub points: LinePoints,
  pub envelope: Envelope,
  pub cells: Vec<u32>,
}

impl LineScratch {
  pub fn new(max_dim: usize) -> Self {
    Self {
      points: LinePoints::with_capacity(max_dim),
      envelope: Envelope::with_capacity(max_dim),
      cells: vec![0; max_dim],
    }
  }
}

/// Assign every cell of `out` the identifier of its nearest line point.
///
/// Cell `q` is sampled at `(q + 0.5) * scale`; point coordinates and offsets
/// must use the same scaling. Cells whose squared distance to their point
/// exceeds `max_d2` are set to 0. Returns the number of such cells. An
/// empty point list clears `out`.
pub fn nearest_on_line(
  points: &LinePoints,
  scale: f64,
  max_d2: f64,
  envelope: &mut Envelope,
  out: &mut [u32],
) -> usize {
  if points.is_empty() {
    out.fill(0);
    return 0;
  }
  envelope.build(points);

  let ids = points.ids();
  let c = points.coords();
  let o = points.offsets();
  let (v, w) = (&envelope.v, &envelope.w);

  let mut k = 0;
  let mut cut = 0;
  for (q, cell) in out.iter_mut().enumerate() {
    let t = (q as f64 + HALF) * scale;
    while k + 1 < v.len() && w[k + 1] < t {
      k += 1;
    }
    let p = v[k];
    let d = t - c[p];
    if d * d + o[p] > max_d2 {
      *cell = 0;
      cut += 1;
    } else {
      *cell = ids[p];
    }
  }
  cut
}

#[cfg(test)]
#[path = "envelope_test.rs"]
mod envelope_test;
