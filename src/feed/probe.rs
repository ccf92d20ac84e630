//! Existence probe for post ordinals

use crate::address::{self, BucketDate, PageKind};
use crate::api::{PageStore, StoreError};
use crate::models::{Channel, Page};

/// Result of looking up a post address
#[derive(Debug)]
pub enum ProbeOutcome {
    /// A page lives at the address
    Found(Page),
    /// The service reported no such page
    NotFound,
    /// The lookup failed for another reason
    Error(StoreError),
}

impl ProbeOutcome {
    /// Whether the post counts as existing
    ///
    /// Errors count as absent, same as `NotFound`.
    pub const fn exists(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// The fetched page, if any
    pub fn into_page(self) -> Option<Page> {
        match self {
            Self::Found(page) => Some(page),
            Self::NotFound | Self::Error(_) => None,
        }
    }
}

/// Look up the post at ordinal `index` of `channel`
pub async fn probe<S: PageStore>(
    store: &S,
    channel: &Channel,
    date: BucketDate,
    index: u64,
) -> ProbeOutcome {
    let path = address::address(PageKind::Post, channel, date, index);

    match store.get_page(&path, false).await {
        Ok(page) => ProbeOutcome::Found(page),
        Err(StoreError::NotFound) => {
            tracing::trace!("Probe {path}: not found");
            ProbeOutcome::NotFound
        }
        Err(e) => {
            tracing::debug!("Probe {path} failed: {e}");
            ProbeOutcome::Error(e)
        }
    }
}

/// Whether the post at ordinal `index` of `channel` exists
pub async fn exists<S: PageStore>(
    store: &S,
    channel: &Channel,
    date: BucketDate,
    index: u64,
) -> bool {
    probe(store, channel, date, index).await.exists()
}
