//! # rnw
//!
//! A tiny terminal microblog that publishes posts as Telegraph pages.
//!
//! ## Overview
//!
//! The page service can create a page and fetch a page by path, and nothing
//! else: there is no way to list what a channel contains. rnw rebuilds a feed
//! from addresses alone. Every post in a channel lands at a predictable path,
//! the number of posts is discovered by probing, and assembled feed pages are
//! cached as pages of their own.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Session                             │
//! │      store + credential + author; write / feed / count      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │      Feed       │ │     Address     │ │       API       │
//! │                 │ │                 │ │                 │
//! │ • Probe         │ │ • Titles        │ │ • PageStore     │
//! │ • Count         │ │ • Paths         │ │ • Telegraph     │
//! │ • List cache    │ │ • Date bucket   │ │                 │
//! │ • Assembler     │ │                 │ │                 │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`address`] — Page naming scheme
//! - [`api`] — Page store trait and the Telegraph client
//! - [`auth`] — Encrypted access-token storage
//! - [`config`] — Configuration management
//! - [`feed`] — Post counting, list cache and feed assembly
//! - [`models`] — Data models (Post, Page, Channel, Account)
//! - [`paths`] — Config directory paths
//! - [`session`] — The context all operations run in
//!
//! ## Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use rnw::api::telegraph::{DEFAULT_API_URL, TelegraphClient};
//! use rnw::{Channel, Session};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let client = TelegraphClient::new(DEFAULT_API_URL, Duration::from_secs(15))?;
//! let session = Session::new(client);
//! for post in session.read_feed(&Channel::global(), 1, 20).await {
//!     println!("{}: {}", post.name, post.content);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::return_self_not_must_use)]

pub mod address;
pub mod api;
pub mod auth;
pub mod config;
pub mod feed;
pub mod models;
pub mod paths;
pub mod session;

#[cfg(test)]
mod testing;

pub use address::{BucketDate, PageKind};
pub use api::{Credential, PageStore, StoreError};
pub use config::Config;
pub use models::{Channel, Page, Post};
pub use session::{Session, WriteError};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
