//! Data models for segmented vehicle parts.

mod part;
mod part_set;

pub use part::{DETECTED_ID_PREFIX, Part, PartId, Provenance};
pub use part_set::PartSet;
