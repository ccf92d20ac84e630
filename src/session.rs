//! Session: the context every microblog operation runs in
//!
//! A session owns the page store, the optional credential and the author
//! name. It is created once at startup and passed to whatever needs it; there
//! is no global client state.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::address::{self, BucketDate, PageKind};
use crate::api::{Credential, PageStore, StoreError};
use crate::feed::{CacheWriter, FeedCursor, assembler, count};
use crate::models::{Channel, Page, PageDraft, Post};

/// Errors returned by [`Session::write`]
#[derive(Debug, Error)]
pub enum WriteError {
    /// Nothing to post
    #[error("post content is empty")]
    EmptyContent,
    /// The session has no credential to create pages with
    #[error("no credential available; an account is required to write")]
    MissingCredential,
    /// The page service refused or failed the write
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Microblog session over a page store
pub struct Session<S> {
    store: S,
    credential: Option<Credential>,
    author_name: Option<String>,
    pinned_date: Option<BucketDate>,
}

impl<S: PageStore> Session<S> {
    /// Create a read-only session
    pub const fn new(store: S) -> Self {
        Self {
            store,
            credential: None,
            author_name: None,
            pinned_date: None,
        }
    }

    /// Attach a credential, enabling writes and cache refills
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Author name stamped on pages this session creates
    pub fn with_author(mut self, author_name: &str) -> Self {
        self.author_name = Some(author_name.to_string());
        self
    }

    /// Read a fixed day's bucket instead of today's
    pub fn with_date(mut self, date: BucketDate) -> Self {
        self.pinned_date = Some(date);
        self
    }

    /// Underlying page store
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Whether writes are possible
    pub const fn can_write(&self) -> bool {
        self.credential.is_some()
    }

    /// Bucket date used for reads
    pub fn date(&self) -> BucketDate {
        self.pinned_date.unwrap_or_else(BucketDate::today)
    }

    /// Publish a post to `channel`
    ///
    /// The service files the page under the current UTC day, whatever date
    /// the session reads from.
    pub async fn write(&self, content: &str, channel: &Channel) -> Result<Page, WriteError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(WriteError::EmptyContent);
        }
        let credential = self.credential.as_ref().ok_or(WriteError::MissingCredential)?;

        let title = address::title(PageKind::Post, channel);
        let draft = PageDraft::text(title, self.author_name.as_deref(), content);
        let page = self.store.create_page(credential, &draft).await?;

        tracing::info!("Posted to {channel} at {}", page.path);
        Ok(page)
    }

    /// Number of posts in `channel`
    pub async fn post_count(&self, channel: &Channel) -> u64 {
        count::count(&self.store, channel, self.date()).await
    }

    /// Open a lazy newest-first cursor over page `page_no` of `channel`
    pub async fn feed_cursor(
        &self,
        channel: &Channel,
        page_no: u64,
        page_size: u64,
    ) -> FeedCursor<'_, S> {
        FeedCursor::open(
            &self.store,
            self.cache_writer(),
            channel,
            self.date(),
            page_no,
            page_size,
        )
        .await
    }

    /// Read page `page_no` of `channel`, newest first
    pub async fn read_feed(&self, channel: &Channel, page_no: u64, page_size: u64) -> Vec<Post> {
        assembler::feed(
            &self.store,
            self.cache_writer(),
            channel,
            self.date(),
            page_no,
            page_size,
        )
        .await
    }

    fn cache_writer(&self) -> Option<CacheWriter<'_>> {
        self.credential.as_ref().map(|credential| CacheWriter {
            credential,
            author_name: self.author_name.as_deref(),
        })
    }
}

impl<S: PageStore + 'static> Session<S> {
    /// Warm the list cache for `pages` pages starting at `first_page`
    ///
    /// Each page is read on its own task. Results and failures are dropped:
    /// the only effect is the cache pages left behind. Dropping the returned
    /// handles detaches the tasks.
    pub fn prefetch(
        self: &Arc<Self>,
        channel: &Channel,
        first_page: u64,
        pages: u64,
        page_size: u64,
    ) -> Vec<JoinHandle<()>> {
        let first_page = first_page.max(1);

        (first_page..first_page.saturating_add(pages))
            .map(|page_no| {
                let session = Arc::clone(self);
                let channel = channel.clone();
                tokio::spawn(async move {
                    let posts = session.read_feed(&channel, page_no, page_size).await;
                    tracing::trace!("Prefetched {channel} page {page_no}: {} posts", posts.len());
                })
            })
            .collect()
    }
}
