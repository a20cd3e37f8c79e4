//! Typed bit field inside a 64-bit attribute word.

use crate::error::{GridError, Result};

/// Width of the packed attribute word.
pub const WORD_BITS: u32 = 64;

/// A `bits`-wide unsigned field starting at bit `shift` of an attribute word.
///
/// ```text
///  63                    shift+bits   shift          0
///  ┌──────────────────────┬──────────────┬───────────┐
///  │     other fields     │  this field  │  others   │
///  └──────────────────────┴──────────────┴───────────┘
/// ```
///
/// Every channel owns exactly one field, so shift/mask arithmetic never
/// leaks between channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BitField {
  bits: u32,
  shift: u32,
}

impl BitField {
  /// Create a field of `bits` bits at `shift`.
  ///
  /// Fails if the width is 64 or more, or if the field would run past the
  /// top of the word.
  pub fn new(bits: u32, shift: u32) -> Result<Self> {
    if bits >= WORD_BITS {
      return Err(GridError::BitCountTooLarge { bits });
    }
    if bits == 0 {
      return Err(GridError::InvalidConfig("channel bit count must be positive".into()));
    }
    if bits + shift > WORD_BITS {
      return Err(GridError::FieldOverflow { bits, shift });
    }
    Ok(Self { bits, shift })
  }

  #[inline]
  pub fn bits(&self) -> u32 {
    self.bits
  }

  #[inline]
  pub fn shift(&self) -> u32 {
    self.shift
  }

  /// Unshifted mask, equal to the largest raw value the field can hold.
  #[inline]
  pub fn mask(&self) -> u64 {
    (1u64 << self.bits) - 1
  }

  /// Index one past the highest bit this field occupies.
  #[inline]
  pub fn top_bit(&self) -> u32 {
    self.bits + self.shift
  }

  /// Raw field value of `word`.
  #[inline]
  pub fn extract(&self, word: u64) -> u64 {
    (word >> self.shift) & self.mask()
  }

  /// Place `raw` (masked to the field width) into an otherwise empty word.
  #[inline]
  pub fn insert(&self, raw: u64) -> u64 {
    (raw & self.mask()) << self.shift
  }

  /// Replace this field's bits inside `word`, keeping the other fields.
  #[inline]
  pub fn replace(&self, word: u64, raw: u64) -> u64 {
    (word & !(self.mask() << self.shift)) | self.insert(raw)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rejects_full_word_width() {
    assert_eq!(BitField::new(64, 0), Err(GridError::BitCountTooLarge { bits: 64 }));
    assert!(BitField::new(63, 0).is_ok());
  }

  #[test]
  fn test_rejects_field_past_word_end() {
    assert_eq!(BitField::new(8, 60), Err(GridError::FieldOverflow { bits: 8, shift: 60 }));
    assert!(BitField::new(8, 56).is_ok());
  }

  #[test]
  fn test_extract_insert_stay_in_field() {
    let field = BitField::new(8, 16).unwrap();
    assert_eq!(field.mask(), 0xFF);
    assert_eq!(field.insert(0x1AB), 0xAB << 16, "raw value must be masked");
    assert_eq!(field.extract(0x12_AB_34_56), 0xAB);
    assert_eq!(field.replace(0xFF_FF_FF_FF, 0x00), 0xFF_00_FF_FF);
  }
}
