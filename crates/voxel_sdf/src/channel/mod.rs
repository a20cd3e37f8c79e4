//! Channel codecs and attribute layouts.
//!
//! A voxel stores one packed 64-bit attribute word. Each physical quantity
//! (density, distance, color component, material, point id) occupies its own
//! [`BitField`] and is quantized by an [`AttributeChannel`]. A
//! [`GridDataDesc`] lists the channels that make up one word.

mod attribute;
mod bit_field;
mod desc;

pub use attribute::{AttributeChannel, ChannelKind};
pub use bit_field::{BitField, WORD_BITS};
pub use desc::{ChannelValues, GridDataDesc};
