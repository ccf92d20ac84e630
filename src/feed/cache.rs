//! List cache: assembled feed windows stored as pages
//!
//! A window of posts `start..=end` is saved as a page titled
//! `rnwlist{channel}-{start}-{end}` whose body is the JSON array of posts.
//! Entries are a memo, never a source of truth. Only the first page with a
//! given title is ever read, so an unreadable entry is left alone rather than
//! written again.

use crate::address::{self, BucketDate, PageKind};
use crate::api::{Credential, PageStore, StoreError};
use crate::models::{Channel, Page, PageDraft, Post};

/// Result of looking up a cached window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// The window was cached and readable
    Hit(Vec<Post>),
    /// No cache page exists for the window
    Miss,
    /// A cache page may exist but could not be read
    ///
    /// Another write would land at a suffixed path that is never read, so
    /// callers must not refill the cache.
    Unreadable,
}

impl CacheLookup {
    /// Cached posts, or an empty list
    pub fn into_posts(self) -> Vec<Post> {
        match self {
            Self::Hit(posts) => posts,
            Self::Miss | Self::Unreadable => Vec::new(),
        }
    }
}

/// Look up the cached window `start..=end` of `channel`
pub async fn get<S: PageStore>(
    store: &S,
    channel: &Channel,
    date: BucketDate,
    start: u64,
    end: u64,
) -> CacheLookup {
    let path = address::address(PageKind::List { start, end }, channel, date, 1);

    match store.get_page(&path, true).await {
        Ok(page) => match parse_payload(&page) {
            Some(posts) if !posts.is_empty() => CacheLookup::Hit(posts),
            _ => {
                tracing::debug!("Ignoring unreadable list cache {path}");
                CacheLookup::Unreadable
            }
        },
        Err(StoreError::NotFound) => CacheLookup::Miss,
        Err(e) => {
            tracing::debug!("List cache {path} unavailable: {e}");
            CacheLookup::Unreadable
        }
    }
}

/// Save `posts` as the cached window `start..=end` of `channel`
pub async fn put<S: PageStore>(
    store: &S,
    credential: &Credential,
    author_name: Option<&str>,
    channel: &Channel,
    start: u64,
    end: u64,
    posts: &[Post],
) -> Result<(), StoreError> {
    let payload = serde_json::to_string(posts).map_err(|e| StoreError::Decode(e.to_string()))?;
    let title = address::title(PageKind::List { start, end }, channel);
    let draft = PageDraft::text(title, author_name, payload);

    let page = store.create_page(credential, &draft).await?;
    tracing::debug!("Cached {} posts at {}", posts.len(), page.path);
    Ok(())
}

/// Decode a cached window from either the content or the description
fn parse_payload(page: &Page) -> Option<Vec<Post>> {
    [page.leading_text(), page.description.as_deref()]
        .into_iter()
        .flatten()
        .find_map(|text| serde_json::from_str(text).ok())
}
