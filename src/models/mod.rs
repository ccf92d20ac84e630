//! Data models for rnw

mod account;
mod channel;
mod page;
mod post;

pub use account::Account;
pub use channel::Channel;
pub use page::{Node, NodeElement, Page, PageDraft};
pub use post::Post;
