//! Ordered channel layout describing one packed attribute word.

use smallvec::SmallVec;

use super::attribute::{AttributeChannel, ChannelKind};
use crate::error::Result;

/// Channel values decoded from one attribute word.
pub type ChannelValues = SmallVec<[f64; 4]>;

/// Ordered set of channels sharing one 64-bit attribute word.
///
/// ```text
///  DensBGR preset:
///  31        24 23       16 15        8 7         0
///  ┌──────────┬───────────┬───────────┬───────────┐
///  │   red    │   green   │   blue    │  density  │
///  └──────────┴───────────┴───────────┴───────────┘
/// ```
///
/// Channels must not overlap; that is the caller's responsibility and is
/// not checked.
#[derive(Clone, Debug, PartialEq)]
pub struct GridDataDesc {
  channels: SmallVec<[AttributeChannel; 4]>,
}

impl Default for GridDataDesc {
  /// Single 8-bit density channel in `[0, 1]`.
  fn default() -> Self {
    // 8 bits at shift 0 with a non-degenerate range cannot fail.
    Self::density(8).unwrap_or_else(|_| Self::new())
  }
}

impl GridDataDesc {
  /// Empty layout.
  pub fn new() -> Self {
    Self { channels: SmallVec::new() }
  }

  /// Append a channel.
  pub fn add_channel(&mut self, channel: AttributeChannel) {
    self.channels.push(channel);
  }

  /// Builder form of [`add_channel`](Self::add_channel).
  pub fn with_channel(mut self, channel: AttributeChannel) -> Self {
    self.add_channel(channel);
    self
  }

  /// Single density channel of `bits` bits covering `[0, 1]`.
  pub fn density(bits: u32) -> Result<Self> {
    Ok(Self::new().with_channel(AttributeChannel::new(
      ChannelKind::Density,
      "density",
      bits,
      0,
      0.0,
      1.0,
    )?))
  }

  /// 8-bit density plus 8-bit blue, green and red channels.
  pub fn density_bgr() -> Result<Self> {
    Ok(
      Self::new()
        .with_channel(AttributeChannel::new(ChannelKind::Density, "density", 8, 0, 0.0, 1.0)?)
        .with_channel(AttributeChannel::new(ChannelKind::ColorRed, "red", 8, 24, 0.0, 1.0)?)
        .with_channel(AttributeChannel::new(ChannelKind::ColorGreen, "green", 8, 16, 0.0, 1.0)?)
        .with_channel(AttributeChannel::new(ChannelKind::ColorBlue, "blue", 8, 8, 0.0, 1.0)?),
    )
  }

  /// Single signed distance channel covering `[min, max]`.
  pub fn distance(bits: u32, min: f64, max: f64) -> Result<Self> {
    Ok(Self::new().with_channel(AttributeChannel::new(
      ChannelKind::Distance,
      "distance",
      bits,
      0,
      min,
      max,
    )?))
  }

  /// Single material id channel; raw codes equal material ids.
  pub fn material(bits: u32) -> Result<Self> {
    let max_id = ((1u64 << bits.min(63)) - 1) as f64;
    Ok(Self::new().with_channel(AttributeChannel::new(
      ChannelKind::Material,
      "material",
      bits,
      0,
      0.0,
      max_id,
    )?))
  }

  /// 32-bit point identifier layout used by index grids.
  pub fn point_index() -> Result<Self> {
    Ok(Self::new().with_channel(AttributeChannel::new(
      ChannelKind::PointIndex,
      "index",
      32,
      0,
      0.0,
      u32::MAX as f64,
    )?))
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.channels.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.channels.is_empty()
  }

  pub fn channels(&self) -> &[AttributeChannel] {
    &self.channels
  }

  pub fn channel(&self, index: usize) -> Option<&AttributeChannel> {
    self.channels.get(index)
  }

  /// First channel, the one used when a caller does not name a channel.
  pub fn default_channel(&self) -> Option<&AttributeChannel> {
    self.channels.first()
  }

  /// First channel of the given kind.
  pub fn channel_with_kind(&self, kind: ChannelKind) -> Option<&AttributeChannel> {
    self.channels.iter().find(|c| c.kind() == kind)
  }

  pub fn density_channel(&self) -> Option<&AttributeChannel> {
    self.channel_with_kind(ChannelKind::Density)
  }

  /// Sum of channel widths.
  pub fn bit_count(&self) -> u32 {
    self.channels.iter().map(|c| c.bit_count()).sum()
  }

  /// One past the highest bit any channel occupies.
  ///
  /// This is the cell width a row must provide, which can exceed
  /// [`bit_count`](Self::bit_count) when channels leave gaps.
  pub fn required_bits(&self) -> u32 {
    self.channels.iter().map(|c| c.field().top_bit()).max().unwrap_or(0)
  }

  /// Pack one value per channel into an attribute word.
  ///
  /// Missing trailing values leave their channels at raw 0; extra values are
  /// ignored.
  pub fn make_attribute(&self, values: &[f64]) -> u64 {
    self
      .channels
      .iter()
      .zip(values)
      .fold(0u64, |word, (channel, &value)| word | channel.encode(value))
  }

  /// Decode every channel of `word`, in channel order.
  pub fn decode_attribute(&self, word: u64) -> ChannelValues {
    self.channels.iter().map(|c| c.decode(word)).collect()
  }
}

#[cfg(test)]
#[path = "desc_test.rs"]
mod desc_test;
