//! Post model (a single microblog entry)

use serde::{Deserialize, Serialize};

use super::Page;

/// Author name used when a page carries none
pub const ANONYMOUS: &str = "Anonymous";

/// A post as shown in a feed
///
/// Serialized as `{"name": ..., "content": ...}`; list-cache pages store
/// arrays of this shape, so the field names are part of the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Author display name
    pub name: String,
    /// Post text
    pub content: String,
}

impl Post {
    /// Create a new post
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Build a post from a fetched page
    ///
    /// Returns `None` when the page has no readable text.
    pub fn from_page(page: &Page) -> Option<Self> {
        let content = page.description.as_deref()?;
        if content.trim().is_empty() {
            return None;
        }

        let name = page
            .author_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(ANONYMOUS);

        Some(Self::new(name, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_page_uses_description() {
        let page = Page {
            description: Some("hello there".to_string()),
            author_name: Some("alice".to_string()),
            ..Page::default()
        };
        let post = Post::from_page(&page).unwrap();
        assert_eq!(post, Post::new("alice", "hello there"));
    }

    #[test]
    fn test_from_page_defaults_author() {
        let page = Page {
            description: Some("hi".to_string()),
            ..Page::default()
        };
        assert_eq!(Post::from_page(&page).unwrap().name, ANONYMOUS);
    }

    #[test]
    fn test_from_page_without_text() {
        let page = Page {
            description: Some("   ".to_string()),
            ..Page::default()
        };
        assert!(Post::from_page(&page).is_none());
        assert!(Post::from_page(&Page::default()).is_none());
    }

    #[test]
    fn test_from_page_keeps_raw_text() {
        let page = Page {
            description: Some("  indented\n".to_string()),
            ..Page::default()
        };
        assert_eq!(Post::from_page(&page).unwrap().content, "  indented\n");
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_string(&Post::new("bob", "yo")).unwrap();
        assert_eq!(json, r#"{"name":"bob","content":"yo"}"#);
    }
}
