use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;

// =============================================================================
// Batch 1: Placement classification
// =============================================================================

#[test]
fn test_classify_empty_row() {
  assert_eq!(Placement::classify(&[], 0), Placement::BeforeRun);
  assert_eq!(Placement::classify(&[], 100), Placement::BeforeRun);
}

#[test]
fn test_classify_every_region() {
  // runs: [2,3) [3,7) [7,10), trailing from 10
  let starts = [2, 3, 7, 10];
  assert_eq!(Placement::classify(&starts, 0), Placement::BeforeRun);
  assert_eq!(Placement::classify(&starts, 1), Placement::BeforeRun);
  assert_eq!(Placement::classify(&starts, 2), Placement::RisingEdge(0), "single-cell run");
  assert_eq!(Placement::classify(&starts, 3), Placement::RisingEdge(1));
  assert_eq!(Placement::classify(&starts, 4), Placement::InsideRun(1));
  assert_eq!(Placement::classify(&starts, 5), Placement::InsideRun(1));
  assert_eq!(Placement::classify(&starts, 6), Placement::FallingEdge(1));
  assert_eq!(Placement::classify(&starts, 7), Placement::RisingEdge(2));
  assert_eq!(Placement::classify(&starts, 9), Placement::FallingEdge(2));
  assert_eq!(Placement::classify(&starts, 10), Placement::AfterRun);
  assert_eq!(Placement::classify(&starts, 1000), Placement::AfterRun);
}

// =============================================================================
// Batch 2: Row dispatch
// =============================================================================

#[test]
fn test_storage_allocates_matching_variant() {
  assert!(matches!(RowStorage::Dense(CellWidth::U32).make_row(4), Row::Dense(_)));
  assert!(matches!(RowStorage::BitIntervals.make_row(4), Row::BitIntervals(_)));
  assert!(matches!(RowStorage::ValueIntervals.make_row(4), Row::ValueIntervals(_)));
  assert_eq!(RowStorage::BitIntervals.attribute_bits(), 1);
  assert!(RowStorage::Dense(CellWidth::U8).supports_wide_positions());
  assert!(!RowStorage::ValueIntervals.supports_wide_positions());
}

#[test]
fn test_binary_row_stores_nonzero_as_one() {
  let mut row = RowStorage::BitIntervals.make_row(8);
  row.set(3, 42);
  assert_eq!(row.get(3), 1);
  row.clear();
  assert_eq!(row.get(3), 0);
}

#[test]
fn test_interval_rows_use_less_memory_when_sparse() {
  let len = 4096;
  let mut dense = RowStorage::Dense(CellWidth::U32).make_row(len);
  let mut values = RowStorage::ValueIntervals.make_row(len);
  for pos in 100..200 {
    dense.set(pos, 9);
    values.set(pos, 9);
  }
  assert!(values.memory_bytes() < dense.memory_bytes());
}

// =============================================================================
// Batch 3: Equivalence against a dense reference
// =============================================================================

#[test]
fn test_binary_row_matches_dense_bits_after_each_op() {
  let len = 64u32;
  let mut rng = StdRng::seed_from_u64(0x5EED);
  let mut reference = vec![false; len as usize];
  let mut row = BitIntervals::new();

  for step in 0..2000 {
    let pos = rng.random_range(0..len);
    let on = rng.random_bool(0.5);
    reference[pos as usize] = on;
    row.set(pos, on);

    for x in 0..len {
      assert_eq!(
        row.is_set(x),
        reference[x as usize],
        "step {step}: set({pos}, {on}) left bit {x} wrong"
      );
    }
    assert!(row.breakpoints().windows(2).all(|w| w[0] < w[1]), "step {step}: unsorted");
  }
}

#[test]
fn test_all_row_variants_agree_on_random_sets() {
  let len = 96usize;
  let mut rng = StdRng::seed_from_u64(7);
  let mut dense = RowStorage::Dense(CellWidth::U64).make_row(len);
  let mut values = RowStorage::ValueIntervals.make_row(len);
  let mut dense_bits = RowStorage::Dense(CellWidth::U8).make_row(len);
  let mut bits = RowStorage::BitIntervals.make_row(len);

  for _ in 0..3000 {
    let pos = rng.random_range(0..len);
    // few distinct values so that merges actually happen
    let value = rng.random_range(0..4u64);
    dense.set(pos, value);
    values.set(pos, value);
    dense_bits.set(pos, value & 1);
    bits.set(pos, value & 1);
  }

  for pos in 0..len {
    assert_eq!(values.get(pos), dense.get(pos), "value row differs at {pos}");
    assert_eq!(bits.get(pos), dense_bits.get(pos), "bit row differs at {pos}");
  }
}

#[test]
fn test_clone_is_independent() {
  let mut row = RowStorage::ValueIntervals.make_row(16);
  row.set(3, 5);
  let snapshot = row.clone();
  row.set(3, 6);
  assert_eq!(snapshot.get(3), 5);
  assert_eq!(row.get(3), 6);
}
