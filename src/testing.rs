//! In-memory page store for tests

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::address::{self, BucketDate, PageKind};
use crate::api::{Credential, PageStore, StoreError};
use crate::models::{Channel, Page, PageDraft, Post};

/// Token accepted by [`MemoryStore::create_page`]
pub const TEST_TOKEN: &str = "test-token";

/// Page store that behaves like the service for a single day
///
/// Page paths are derived from titles the same way the service does it:
/// escaped title, `-MM-DD`, then `-N` for the N-th page with that title.
pub struct MemoryStore {
    date: BucketDate,
    pages: Mutex<HashMap<String, Page>>,
    title_counts: Mutex<HashMap<String, u64>>,
    failing: Mutex<HashSet<String>>,
    get_calls: AtomicUsize,
    create_calls: AtomicUsize,
    fail_creates: bool,
}

impl MemoryStore {
    pub fn new(date: BucketDate) -> Self {
        Self {
            date,
            pages: Mutex::new(HashMap::new()),
            title_counts: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            get_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            fail_creates: false,
        }
    }

    /// A store whose `create_page` always fails with a network error
    pub fn rejecting_writes(date: BucketDate) -> Self {
        Self {
            fail_creates: true,
            ..Self::new(date)
        }
    }

    /// Publish `n` posts in `channel`, numbered `post 1` .. `post n`
    pub fn seed_posts(&self, channel: &Channel, n: u64) {
        let title = address::title(PageKind::Post, channel);
        for i in 1..=n {
            let path = self.next_path(&title);
            self.insert(&path, post_page(&format!("author{i}"), &format!("post {i}")));
        }
    }

    /// Store `page` at `path`, counting it against its title like a created page
    pub fn insert(&self, path: &str, page: Page) {
        self.record(path);
        self.pages.lock().unwrap().insert(path.to_string(), page);
    }

    pub fn page(&self, path: &str) -> Option<Page> {
        self.pages.lock().unwrap().get(path).cloned()
    }

    /// Make every fetch of `path` fail with a network error
    pub fn fail(&self, path: &str) {
        self.failing.lock().unwrap().insert(path.to_string());
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) {
        self.get_calls.store(0, Ordering::SeqCst);
        self.create_calls.store(0, Ordering::SeqCst);
    }

    /// Path the service gives the next page titled `title`
    fn next_path(&self, title: &str) -> String {
        let base = format!("{}-{}", urlencoding::encode(title), self.date);
        let mut counts = self.title_counts.lock().unwrap();
        let n = counts.entry(base.clone()).or_insert(0);
        *n += 1;
        if *n > 1 { format!("{base}-{n}") } else { base }
    }

    /// Count an explicitly placed page so later creates do not overwrite it
    fn record(&self, path: &str) {
        let date = format!("-{}", self.date);
        let (base, n) = match path.rsplit_once('-') {
            Some((head, n)) if head.ends_with(&date) => match n.parse::<u64>() {
                Ok(n) => (head, n),
                Err(_) => (path, 1),
            },
            _ => (path, 1),
        };
        if !base.ends_with(&date) {
            return;
        }

        let mut counts = self.title_counts.lock().unwrap();
        let count = counts.entry(base.to_string()).or_insert(0);
        *count = (*count).max(n);
    }
}

/// A post page as the service returns it
pub fn post_page(author: &str, text: &str) -> Page {
    Page {
        author_name: Some(author.to_string()),
        description: Some(text.to_string()),
        ..Page::default()
    }
}

/// Posts `post end` down to `post start`
pub fn expected_posts(start: u64, end: u64) -> Vec<Post> {
    (start..=end)
        .rev()
        .map(|i| Post::new(format!("author{i}"), format!("post {i}")))
        .collect()
}

impl PageStore for MemoryStore {
    async fn create_page(
        &self,
        credential: &Credential,
        draft: &PageDraft,
    ) -> Result<Page, StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        if credential.token() != TEST_TOKEN {
            return Err(StoreError::Unauthorized("ACCESS_TOKEN_INVALID".to_string()));
        }
        if self.fail_creates {
            return Err(StoreError::Network("connection reset".to_string()));
        }

        let path = self.next_path(&draft.title);

        let mut page = Page {
            path: path.clone(),
            url: format!("https://telegra.ph/{path}"),
            title: draft.title.clone(),
            author_name: draft.author_name.clone(),
            content: Some(draft.content.clone()),
            ..Page::default()
        };
        page.description = page.leading_text().map(str::to_string);

        self.insert(&path, page.clone());
        Ok(page)
    }

    async fn get_page(&self, path: &str, return_content: bool) -> Result<Page, StoreError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.lock().unwrap().contains(path) {
            return Err(StoreError::Network("timed out".to_string()));
        }

        let mut page = self.page(path).ok_or(StoreError::NotFound)?;
        if !return_content {
            page.content = None;
        }
        Ok(page)
    }
}
