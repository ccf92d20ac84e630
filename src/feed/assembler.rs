//! Feed assembly: page number to newest-first posts

use crate::address::BucketDate;
use crate::api::{Credential, PageStore};
use crate::models::{Channel, Post};

use super::cache::{self, CacheLookup};
use super::{count, probe};

/// Inclusive range of ordinals shown on one feed page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Oldest ordinal (inclusive)
    pub start: u64,
    /// Newest ordinal (inclusive)
    pub end: u64,
}

impl Window {
    /// Window for page `page_no` of `page_size` posts out of `total`
    ///
    /// Page 1 holds the newest posts. Returns `None` past the oldest post.
    /// Zero page numbers and sizes are treated as 1.
    pub fn for_page(total: u64, page_no: u64, page_size: u64) -> Option<Self> {
        let page_no = page_no.max(1);
        let page_size = page_size.max(1);

        let skipped = (page_no - 1).saturating_mul(page_size);
        if skipped >= total {
            return None;
        }

        let end = total - skipped;
        let start = if end >= page_size { end - page_size + 1 } else { 1 };
        Some(Self { start, end })
    }

    /// Number of ordinals in the window
    pub const fn size(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Where a cursor's posts come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSource {
    /// The page is past the end of the channel
    Empty,
    /// Served from a list-cache page
    Cache,
    /// Fetched post by post
    Posts,
}

/// Identity used to write list-cache pages
#[derive(Debug, Clone, Copy)]
pub struct CacheWriter<'a> {
    /// Credential for page creation
    pub credential: &'a Credential,
    /// Author name stamped on cache pages
    pub author_name: Option<&'a str>,
}

enum State {
    Cached(std::vec::IntoIter<Post>),
    Fetching { next: u64, buffer: Vec<Post> },
    Done,
}

/// Lazy, single-pass sequence of feed posts, newest first
///
/// On a cache miss each post is fetched only when asked for. Once the window
/// is exhausted the collected posts are written back to the list cache,
/// unless a cache page for the window already exists but is unreadable.
pub struct FeedCursor<'a, S> {
    store: &'a S,
    writer: Option<CacheWriter<'a>>,
    channel: Channel,
    date: BucketDate,
    window: Option<Window>,
    source: FeedSource,
    state: State,
    refill: bool,
    skipped: usize,
}

impl<'a, S: PageStore> FeedCursor<'a, S> {
    /// Count the channel, pick the window and try the list cache
    pub async fn open(
        store: &'a S,
        writer: Option<CacheWriter<'a>>,
        channel: &Channel,
        date: BucketDate,
        page_no: u64,
        page_size: u64,
    ) -> Self {
        let total = count::count(store, channel, date).await;
        let window = Window::for_page(total, page_no, page_size);

        let mut refill = false;
        let (source, state) = match window {
            None => (FeedSource::Empty, State::Done),
            Some(window) => match cache::get(store, channel, date, window.start, window.end).await {
                CacheLookup::Hit(cached) => {
                    tracing::debug!("List cache hit for {channel} {}..={}", window.start, window.end);
                    (FeedSource::Cache, State::Cached(cached.into_iter()))
                }
                lookup => {
                    refill = lookup == CacheLookup::Miss;
                    let state = State::Fetching {
                        next: window.end,
                        buffer: Vec::with_capacity(window.size() as usize),
                    };
                    (FeedSource::Posts, state)
                }
            },
        };

        Self {
            store,
            writer,
            channel: channel.clone(),
            date,
            window,
            source,
            state,
            refill,
            skipped: 0,
        }
    }

    /// Next post, or `None` once the window is exhausted
    pub async fn next(&mut self) -> Option<Post> {
        loop {
            match &mut self.state {
                State::Done => return None,
                State::Cached(posts) => {
                    let post = posts.next();
                    if post.is_none() {
                        self.state = State::Done;
                    }
                    return post;
                }
                State::Fetching { next, buffer } => {
                    let start = self.window.map_or(1, |w| w.start);
                    if *next < start {
                        let buffer = std::mem::take(buffer);
                        self.state = State::Done;
                        self.write_back(&buffer).await;
                        return None;
                    }

                    let index = *next;
                    *next -= 1;

                    let page = probe::probe(self.store, &self.channel, self.date, index)
                        .await
                        .into_page();
                    match page.as_ref().and_then(Post::from_page) {
                        Some(post) => {
                            buffer.push(post.clone());
                            return Some(post);
                        }
                        None => {
                            tracing::debug!("Skipping unreadable post {index} in {}", self.channel);
                            self.skipped += 1;
                        }
                    }
                }
            }
        }
    }

    /// Drain the remaining posts into a list
    pub async fn collect(mut self) -> Vec<Post> {
        let mut posts = Vec::new();
        while let Some(post) = self.next().await {
            posts.push(post);
        }
        posts
    }

    /// Where the posts come from
    pub const fn source(&self) -> FeedSource {
        self.source
    }

    /// Ordinals covered, if the page is not past the end
    pub const fn window(&self) -> Option<Window> {
        self.window
    }

    /// Posts skipped so far because they could not be fetched or read
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    async fn write_back(&self, posts: &[Post]) {
        if posts.is_empty() {
            return;
        }
        if !self.refill {
            tracing::debug!("List cache for {} is unreadable, not rewriting it", self.channel);
            return;
        }
        let (Some(window), Some(writer)) = (self.window, self.writer) else {
            tracing::debug!("No credential, not caching {}", self.channel);
            return;
        };

        if let Err(e) = cache::put(
            self.store,
            writer.credential,
            writer.author_name,
            &self.channel,
            window.start,
            window.end,
            posts,
        )
        .await
        {
            tracing::warn!("Failed to cache {} {}..={}: {e}", self.channel, window.start, window.end);
        }
    }
}

/// Read page `page_no` of `channel`, newest first
pub async fn feed<S: PageStore>(
    store: &S,
    writer: Option<CacheWriter<'_>>,
    channel: &Channel,
    date: BucketDate,
    page_no: u64,
    page_size: u64,
) -> Vec<Post> {
    FeedCursor::open(store, writer, channel, date, page_no, page_size)
        .await
        .collect()
        .await
}
