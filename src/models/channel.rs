//! Channel namespace

use std::fmt;

/// A channel scoping posts and list-cache pages
///
/// `None` is the global channel. Channels are never enumerated; a channel is
/// simply whatever label has been used in addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Channel(Option<String>);

impl Channel {
    /// The global (unscoped) channel
    pub const fn global() -> Self {
        Self(None)
    }

    /// A named channel; blank names fall back to the global channel
    pub fn named(name: &str) -> Self {
        let name = name.trim();
        if name.is_empty() {
            Self(None)
        } else {
            Self(Some(name.to_string()))
        }
    }

    /// Channel name, if any
    pub fn name(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Label used inside addresses (empty for the global channel)
    pub fn label(&self) -> &str {
        self.0.as_deref().unwrap_or("")
    }

    /// Whether this is the global channel
    pub const fn is_global(&self) -> bool {
        self.0.is_none()
    }
}

impl From<Option<&str>> for Channel {
    fn from(name: Option<&str>) -> Self {
        name.map_or_else(Self::global, Self::named)
    }
}

impl From<&str> for Channel {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(name) => write!(f, "#{name}"),
            None => write!(f, "global"),
        }
    }
}
