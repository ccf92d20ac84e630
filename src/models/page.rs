//! Telegraph page and content node models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A page record as returned by the page service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Path of the page (the address)
    #[serde(default)]
    pub path: String,
    /// Full URL of the page
    #[serde(default)]
    pub url: String,
    /// Page title
    #[serde(default)]
    pub title: String,
    /// Plain-text description generated by the service from the content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Author name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    /// Author profile link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
    /// Content nodes (only present when requested)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Node>>,
    /// Number of views
    #[serde(default)]
    pub views: u64,
    /// Whether the current account may edit the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_edit: Option<bool>,
}

impl Page {
    /// First text child of the first content node, if present
    pub fn leading_text(&self) -> Option<&str> {
        match self.content.as_ref()?.first()? {
            Node::Text(text) => Some(text),
            Node::Element(element) => match element.children.first()? {
                Node::Text(text) => Some(text),
                Node::Element(_) => None,
            },
        }
    }
}

/// A DOM-like content node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Bare text
    Text(String),
    /// Element with a tag, attributes and children
    Element(NodeElement),
}

impl Node {
    /// A `<p>` element wrapping a single text child
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Element(NodeElement {
            tag: "p".to_string(),
            attrs: None,
            children: vec![Self::Text(text.into())],
        })
    }
}

/// Element node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeElement {
    /// Tag name (p, a, h3, ...)
    pub tag: String,
    /// Attributes (href, src)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<BTreeMap<String, String>>,
    /// Child nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

/// A page to be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDraft {
    /// Title; the service derives the page path from it
    pub title: String,
    /// Author name shown on the page
    pub author_name: Option<String>,
    /// Page body
    pub content: Vec<Node>,
}

impl PageDraft {
    /// A draft whose body is a single paragraph of text
    pub fn text(title: impl Into<String>, author_name: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author_name: author_name.map(str::to_string),
            content: vec![Node::paragraph(text)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_with_content() {
        let json = r#"{
            "path": "rnwpost-10-19",
            "url": "https://telegra.ph/rnwpost-10-19",
            "title": "rnwpost",
            "description": "hello",
            "author_name": "carol",
            "content": [{"tag": "p", "children": ["hello"]}],
            "views": 3
        }"#;
        let page: Page = serde_json::from_str(json).unwrap();
        assert_eq!(page.path, "rnwpost-10-19");
        assert_eq!(page.views, 3);
        assert_eq!(page.leading_text(), Some("hello"));
    }

    #[test]
    fn test_leading_text_missing() {
        let page = Page {
            content: Some(vec![Node::Element(NodeElement {
                tag: "hr".to_string(),
                attrs: None,
                children: Vec::new(),
            })]),
            ..Page::default()
        };
        assert_eq!(page.leading_text(), None);
        assert_eq!(Page::default().leading_text(), None);
    }

    #[test]
    fn test_paragraph_serializes_like_telegraph() {
        let json = serde_json::to_string(&vec![Node::paragraph("hi")]).unwrap();
        assert_eq!(json, r#"[{"tag":"p","children":["hi"]}]"#);
    }
}
