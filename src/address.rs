//! Page naming scheme
//!
//! Every post and every list-cache page lives at an address the service
//! derives from the page title and the UTC creation date:
//!
//! ```text
//! rnw{kind}-{MM-DD}[-{index}]
//! ```
//!
//! The first page of a given title on a given day has no suffix; the service
//! appends `-2`, `-3`, ... to later ones. Reads reproduce exactly that shape.

use chrono::{Datelike, NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;

use crate::models::Channel;

/// Namespace tag prefixed to every title and address
pub const NAMESPACE: &str = "rnw";

/// What a page holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// A single post
    Post,
    /// A list-cache window covering ordinals `start..=end`
    List {
        /// First ordinal (inclusive)
        start: u64,
        /// Last ordinal (inclusive)
        end: u64,
    },
}

impl PageKind {
    /// Kind label including the channel, before escaping
    fn label(self, channel: &Channel) -> String {
        match self {
            Self::Post => format!("post{}", channel.label()),
            Self::List { start, end } => format!("list{}-{start}-{end}", channel.label()),
        }
    }
}

/// UTC calendar day embedded in addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketDate {
    month: u32,
    day: u32,
}

impl BucketDate {
    /// Today's bucket (UTC)
    pub fn today() -> Self {
        Self::from_date(Utc::now().date_naive())
    }

    /// Bucket for a calendar date
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }

    /// Bucket for a month/day pair, if it names a real day
    pub fn new(month: u32, day: u32) -> Option<Self> {
        // 2000 is a leap year, so 02-29 is accepted
        NaiveDate::from_ymd_opt(2000, month, day).map(Self::from_date)
    }
}

impl fmt::Display for BucketDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for BucketDate {
    type Err = anyhow::Error;

    /// Parse `MM-DD`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (month, day) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| anyhow::anyhow!("Expected a date like 10-19, got {s:?}"))?;
        let month: u32 = month.parse()?;
        let day: u32 = day.parse()?;
        Self::new(month, day).ok_or_else(|| anyhow::anyhow!("Not a calendar day: {s}"))
    }
}

/// Title used when creating a page of `kind` in `channel`
///
/// Titles are not escaped; the service slugifies them itself.
pub fn title(kind: PageKind, channel: &Channel) -> String {
    format!("{NAMESPACE}{}", kind.label(channel))
}

/// Address of the `index`-th page of `kind` in `channel` on `date`
///
/// `index` is 1-based; index 1 (and 0) carry no suffix.
pub fn address(kind: PageKind, channel: &Channel, date: BucketDate, index: u64) -> String {
    let label = urlencoding::encode(&kind.label(channel)).into_owned();
    if index > 1 {
        format!("{NAMESPACE}{label}-{date}-{index}")
    } else {
        format!("{NAMESPACE}{label}-{date}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oct19() -> BucketDate {
        BucketDate::new(10, 19).unwrap()
    }

    #[test]
    fn test_first_index_has_no_suffix() {
        let global = Channel::global();
        assert_eq!(address(PageKind::Post, &global, oct19(), 1), "rnwpost-10-19");
        assert_eq!(address(PageKind::Post, &global, oct19(), 2), "rnwpost-10-19-2");
        assert_eq!(address(PageKind::Post, &global, oct19(), 37), "rnwpost-10-19-37");
    }

    #[test]
    fn test_channel_is_escaped() {
        let channel = Channel::named("rust lang/新");
        assert_eq!(
            address(PageKind::Post, &channel, oct19(), 1),
            "rnwpostrust%20lang%2F%E6%96%B0-10-19"
        );
        assert_eq!(title(PageKind::Post, &channel), "rnwpostrust lang/新");
    }

    #[test]
    fn test_list_address() {
        let channel = Channel::named("dev");
        let kind = PageKind::List { start: 5, end: 9 };
        assert_eq!(address(kind, &channel, oct19(), 1), "rnwlistdev-5-9-10-19");
        assert_eq!(title(kind, &channel), "rnwlistdev-5-9");
    }

    #[test]
    fn test_date_is_zero_padded() {
        let date = BucketDate::new(3, 7).unwrap();
        assert_eq!(date.to_string(), "03-07");
        assert_eq!(address(PageKind::Post, &Channel::global(), date, 1), "rnwpost-03-07");
    }

    #[test]
    fn test_parse_bucket_date() {
        assert_eq!("10-19".parse::<BucketDate>().unwrap(), oct19());
        assert_eq!("02-29".parse::<BucketDate>().unwrap().to_string(), "02-29");
        assert!("13-01".parse::<BucketDate>().is_err());
        assert!("1019".parse::<BucketDate>().is_err());
    }
}
