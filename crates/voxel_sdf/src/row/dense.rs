//! Dense rows: one stored cell per position.

/// Storage width of a dense cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellWidth {
  U8,
  U16,
  U32,
  U64,
}

impl CellWidth {
  #[inline]
  pub fn bits(&self) -> u32 {
    match self {
      CellWidth::U8 => 8,
      CellWidth::U16 => 16,
      CellWidth::U32 => 32,
      CellWidth::U64 => 64,
    }
  }

  /// Narrowest width holding `bits` bits, if any.
  pub fn for_bits(bits: u32) -> Option<Self> {
    match bits {
      0..=8 => Some(CellWidth::U8),
      9..=16 => Some(CellWidth::U16),
      17..=32 => Some(CellWidth::U32),
      33..=64 => Some(CellWidth::U64),
      _ => None,
    }
  }
}

/// Fixed-length array of cells; O(1) access, memory proportional to length.
///
/// Values wider than the cell width are truncated, so grids validate their
/// attribute layout against the width at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DenseRow {
  U8(Vec<u8>),
  U16(Vec<u16>),
  U32(Vec<u32>),
  U64(Vec<u64>),
}

impl DenseRow {
  pub fn new(width: CellWidth, len: usize) -> Self {
    match width {
      CellWidth::U8 => DenseRow::U8(vec![0; len]),
      CellWidth::U16 => DenseRow::U16(vec![0; len]),
      CellWidth::U32 => DenseRow::U32(vec![0; len]),
      CellWidth::U64 => DenseRow::U64(vec![0; len]),
    }
  }

  pub fn width(&self) -> CellWidth {
    match self {
      DenseRow::U8(_) => CellWidth::U8,
      DenseRow::U16(_) => CellWidth::U16,
      DenseRow::U32(_) => CellWidth::U32,
      DenseRow::U64(_) => CellWidth::U64,
    }
  }

  #[inline]
  pub fn len(&self) -> usize {
    match self {
      DenseRow::U8(d) => d.len(),
      DenseRow::U16(d) => d.len(),
      DenseRow::U32(d) => d.len(),
      DenseRow::U64(d) => d.len(),
    }
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  #[inline]
  pub fn get(&self, pos: usize) -> u64 {
    match self {
      DenseRow::U8(d) => d[pos] as u64,
      DenseRow::U16(d) => d[pos] as u64,
      DenseRow::U32(d) => d[pos] as u64,
      DenseRow::U64(d) => d[pos],
    }
  }

  #[inline]
  pub fn set(&mut self, pos: usize, value: u64) {
    match self {
      DenseRow::U8(d) => d[pos] = value as u8,
      DenseRow::U16(d) => d[pos] = value as u16,
      DenseRow::U32(d) => d[pos] = value as u32,
      DenseRow::U64(d) => d[pos] = value,
    }
  }

  pub fn fill(&mut self, value: u64) {
    match self {
      DenseRow::U8(d) => d.fill(value as u8),
      DenseRow::U16(d) => d.fill(value as u16),
      DenseRow::U32(d) => d.fill(value as u32),
      DenseRow::U64(d) => d.fill(value),
    }
  }

  pub fn clear(&mut self) {
    self.fill(0);
  }

  pub fn memory_bytes(&self) -> usize {
    self.len() * (self.width().bits() as usize / 8)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_for_bits_picks_narrowest() {
    assert_eq!(CellWidth::for_bits(1), Some(CellWidth::U8));
    assert_eq!(CellWidth::for_bits(8), Some(CellWidth::U8));
    assert_eq!(CellWidth::for_bits(9), Some(CellWidth::U16));
    assert_eq!(CellWidth::for_bits(32), Some(CellWidth::U32));
    assert_eq!(CellWidth::for_bits(64), Some(CellWidth::U64));
    assert_eq!(CellWidth::for_bits(65), None);
  }

  #[test]
  fn test_get_set_clear() {
    let mut row = DenseRow::new(CellWidth::U16, 10);
    row.set(3, 0xBEEF);
    assert_eq!(row.get(3), 0xBEEF);
    assert_eq!(row.get(4), 0);
    row.clear();
    assert_eq!(row.get(3), 0);
    assert_eq!(row.len(), 10, "clear keeps the length");
  }

  #[test]
  fn test_memory_follows_width() {
    assert_eq!(DenseRow::new(CellWidth::U8, 100).memory_bytes(), 100);
    assert_eq!(DenseRow::new(CellWidth::U32, 100).memory_bytes(), 400);
    assert_eq!(DenseRow::new(CellWidth::U64, 100).memory_bytes(), 800);
  }
}
