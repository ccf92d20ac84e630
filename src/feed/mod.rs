//! Feed reconstruction
//!
//! The page service cannot list a channel's posts, so feeds are rebuilt from
//! addresses alone:
//!
//! - [`probe`] asks whether the post at an ordinal exists
//! - [`count`] finds how many posts a channel has with O(log n) probes
//! - [`cache`] stores assembled windows as pages of their own
//! - [`assembler`] turns a page number into newest-first posts

pub mod assembler;
pub mod cache;
pub mod count;
pub mod probe;

pub use assembler::{CacheWriter, FeedCursor, FeedSource, Window};
pub use cache::CacheLookup;
pub use probe::ProbeOutcome;
