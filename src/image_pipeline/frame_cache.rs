//! Temporal seed persistence
//!
//! Video frames are fused one at a time. To keep the pole region stable
//! across frames, the motion field and the two masked working images of
//! frame `n` can be saved and handed to frame `n + 1` as its seed. The
//! caller owns the cache directories; nothing here is global.

mod field_codec;
mod store;
pub mod types;

pub use field_codec::{decode_field, encode_field};
pub use store::{CacheLayout, FrameCacheStore};
pub use types::FrameCacheEntry;
