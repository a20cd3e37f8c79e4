//! Quantizing codec for one physical channel of a packed attribute.

use std::fmt;

use super::bit_field::BitField;
use crate::error::{GridError, Result};

/// Semantic meaning of a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelKind {
  Density,
  Distance,
  Color,
  ColorRed,
  ColorGreen,
  ColorBlue,
  DensityColor,
  Material,
  PointIndex,
  Data,
}

impl fmt::Display for ChannelKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      ChannelKind::Density => "density",
      ChannelKind::Distance => "distance",
      ChannelKind::Color => "color",
      ChannelKind::ColorRed => "red",
      ChannelKind::ColorGreen => "green",
      ChannelKind::ColorBlue => "blue",
      ChannelKind::DensityColor => "density_color",
      ChannelKind::Material => "material",
      ChannelKind::PointIndex => "point_index",
      ChannelKind::Data => "data",
    };
    f.write_str(name)
  }
}

/// One named physical quantity packed into a bit field of the attribute.
///
/// The physical range `[value0, value1]` is mapped linearly onto the raw
/// range `[0, 2^bits - 1]`: `value0` encodes to raw 0 and `value1` to the
/// largest raw value. Either end may be the larger one.
///
/// ```text
///   value0 ─────────────── v ───────────────── value1
///     │                    │                     │
///     0 ───────── round((v-value0)*D2B) ───── mask
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeChannel {
  kind: ChannelKind,
  name: String,
  field: BitField,
  value0: f64,
  value1: f64,
  min: f64,
  max: f64,
  /// Physical-to-raw scale.
  d2b: f64,
  /// Raw-to-physical scale.
  b2d: f64,
}

impl AttributeChannel {
  /// Create a channel of `bits` bits at `shift` covering `[value0, value1]`.
  pub fn new(
    kind: ChannelKind,
    name: impl Into<String>,
    bits: u32,
    shift: u32,
    value0: f64,
    value1: f64,
  ) -> Result<Self> {
    let field = BitField::new(bits, shift)?;
    if value0 == value1 {
      return Err(GridError::DegenerateRange { value: value0 });
    }
    if !value0.is_finite() || !value1.is_finite() {
      return Err(GridError::InvalidConfig(format!(
        "channel range [{value0}, {value1}] must be finite"
      )));
    }
    let max_raw = field.mask() as f64;
    let d2b = max_raw / (value1 - value0);
    Ok(Self {
      kind,
      name: name.into(),
      field,
      value0,
      value1,
      min: value0.min(value1),
      max: value0.max(value1),
      d2b,
      b2d: 1.0 / d2b,
    })
  }

  #[inline]
  pub fn kind(&self) -> ChannelKind {
    self.kind
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  #[inline]
  pub fn field(&self) -> BitField {
    self.field
  }

  #[inline]
  pub fn bit_count(&self) -> u32 {
    self.field.bits()
  }

  #[inline]
  pub fn shift(&self) -> u32 {
    self.field.shift()
  }

  /// Smaller end of the physical range.
  #[inline]
  pub fn min(&self) -> f64 {
    self.min
  }

  /// Larger end of the physical range.
  #[inline]
  pub fn max(&self) -> f64 {
    self.max
  }

  /// Physical value encoded by raw 0.
  #[inline]
  pub fn value0(&self) -> f64 {
    self.value0
  }

  /// Physical value encoded by the largest raw value.
  #[inline]
  pub fn value1(&self) -> f64 {
    self.value1
  }

  /// Physical size of one quantization step.
  #[inline]
  pub fn step(&self) -> f64 {
    (self.max - self.min) / self.field.mask() as f64
  }

  /// Quantize `value` to this channel's raw code (unshifted).
  ///
  /// The value is clamped to the channel range first; NaN encodes as the
  /// lower end of the range.
  #[inline]
  pub fn quantize(&self, value: f64) -> u64 {
    let v = if value.is_nan() { self.min } else { value.clamp(self.min, self.max) };
    let scaled = ((v - self.value0) * self.d2b + 0.5).floor();
    let raw = scaled.clamp(0.0, self.field.mask() as f64) as u64;
    raw & self.field.mask()
  }

  /// Encode `value` into this channel's bits, shifted into place.
  #[inline]
  pub fn encode(&self, value: f64) -> u64 {
    self.field.insert(self.quantize(value))
  }

  /// Raw (unshifted) code of this channel inside `word`.
  #[inline]
  pub fn raw_value(&self, word: u64) -> u64 {
    self.field.extract(word)
  }

  /// Decode this channel's physical value from a packed `word`.
  #[inline]
  pub fn decode(&self, word: u64) -> f64 {
    self.b2d * self.field.extract(word) as f64 + self.value0
  }

  /// Overwrite this channel's bits inside `word` with `value`.
  #[inline]
  pub fn store(&self, word: u64, value: f64) -> u64 {
    self.field.replace(word, self.quantize(value))
  }
}

#[cfg(test)]
#[path = "attribute_test.rs"]
mod attribute_test;
