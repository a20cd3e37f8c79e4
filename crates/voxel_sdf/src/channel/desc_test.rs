use super::*;

#[test]
fn test_default_is_single_8bit_density() {
  let desc = GridDataDesc::default();
  assert_eq!(desc.len(), 1);
  assert_eq!(desc.bit_count(), 8);
  let density = desc.density_channel().expect("default layout has a density channel");
  assert_eq!(density.bit_count(), 8);
  assert_eq!(density.shift(), 0);
  assert_eq!(desc.default_channel(), Some(density));
}

#[test]
fn test_density_bgr_layout() {
  let desc = GridDataDesc::density_bgr().unwrap();
  assert_eq!(desc.len(), 4);
  assert_eq!(desc.bit_count(), 32);
  assert_eq!(desc.required_bits(), 32);
  assert_eq!(desc.channel_with_kind(ChannelKind::ColorRed).map(|c| c.shift()), Some(24));
  assert_eq!(desc.channel_with_kind(ChannelKind::ColorGreen).map(|c| c.shift()), Some(16));
  assert_eq!(desc.channel_with_kind(ChannelKind::ColorBlue).map(|c| c.shift()), Some(8));
  assert_eq!(desc.density_channel().map(|c| c.shift()), Some(0));
  assert!(desc.channel_with_kind(ChannelKind::Material).is_none());
}

#[test]
fn test_make_attribute_or_combines_channels() {
  let desc = GridDataDesc::density_bgr().unwrap();
  // density, red, green, blue
  let word = desc.make_attribute(&[1.0, 1.0, 0.0, 1.0]);
  assert_eq!(word, 0xFF_00_FF_FF);

  let values = desc.decode_attribute(word);
  assert_eq!(values.len(), 4);
  assert!((values[0] - 1.0).abs() < 1e-12);
  assert!((values[1] - 1.0).abs() < 1e-12);
  assert_eq!(values[2], 0.0);
  assert!((values[3] - 1.0).abs() < 1e-12);
}

#[test]
fn test_make_attribute_tolerates_short_input() {
  let desc = GridDataDesc::density_bgr().unwrap();
  assert_eq!(desc.make_attribute(&[1.0]), 0xFF);
  assert_eq!(desc.make_attribute(&[]), 0);
}

#[test]
fn test_required_bits_counts_gaps() {
  let desc = GridDataDesc::new()
    .with_channel(AttributeChannel::new(ChannelKind::Density, "d", 4, 0, 0.0, 1.0).unwrap())
    .with_channel(AttributeChannel::new(ChannelKind::Material, "m", 4, 12, 0.0, 15.0).unwrap());
  assert_eq!(desc.bit_count(), 8);
  assert_eq!(desc.required_bits(), 16);
}

#[test]
fn test_material_codes_equal_ids() {
  let desc = GridDataDesc::material(6).unwrap();
  let channel = desc.default_channel().unwrap();
  assert_eq!(channel.encode(17.0), 17);
  assert_eq!(channel.decode(42), 42.0);
}

#[test]
fn test_presets_propagate_configuration_errors() {
  assert!(matches!(
    GridDataDesc::distance(64, -1.0, 1.0),
    Err(crate::error::GridError::BitCountTooLarge { bits: 64 })
  ));
  assert!(matches!(
    GridDataDesc::distance(16, 3.0, 3.0),
    Err(crate::error::GridError::DegenerateRange { .. })
  ));
}
