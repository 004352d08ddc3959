//! Marker-delimited assistant content.
//!
//! Assistant replies embed `[PRODUCTS]` and `[POSTS]` markers inside free
//! text to say where the product cards and post cards go. This module splits
//! such strings into ordered segments and converts them into typed
//! [`ContentBlock`]s, which is the only place the marker syntax is known.

use std::error::Error as StdError;
use std::fmt;

pub const PRODUCTS_MARKER: &str = "[PRODUCTS]";
pub const POSTS_MARKER: &str = "[POSTS]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Products,
    Posts,
}

impl Marker {
    pub fn token(self) -> &'static str {
        match self {
            Marker::Products => PRODUCTS_MARKER,
            Marker::Posts => POSTS_MARKER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Marker(Marker),
}

impl Segment {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Segment::Text(text) => Some(text),
            Segment::Marker(_) => None,
        }
    }
}

/// Content that cannot be laid out unambiguously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerError {
    /// `[POSTS]` appears before `[PRODUCTS]`.
    OutOfOrder,
    /// The marker occurs more than once.
    Repeated(Marker),
}

impl fmt::Display for MarkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerError::OutOfOrder => write!(
                f,
                "{} marker appears before {} marker",
                POSTS_MARKER, PRODUCTS_MARKER
            ),
            MarkerError::Repeated(marker) => {
                write!(f, "{} marker appears more than once", marker.token())
            }
        }
    }
}

impl StdError for MarkerError {}

/// Result of splitting a content string on the two markers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitContent {
    pub segments: Vec<Segment>,
    /// Index of the `[PRODUCTS]` segment. With repeats the last one wins.
    pub products_index: Option<usize>,
    /// Index of the `[POSTS]` segment. With repeats the last one wins.
    pub posts_index: Option<usize>,
    products_seen: usize,
    posts_seen: usize,
}

/// Split `content` into text and marker segments in source order.
///
/// Text between markers is trimmed; whitespace-only pieces are dropped.
pub fn split_content(content: &str) -> SplitContent {
    let mut split = SplitContent::default();
    let mut rest = content;

    loop {
        let next = [Marker::Products, Marker::Posts]
            .into_iter()
            .filter_map(|marker| rest.find(marker.token()).map(|pos| (pos, marker)))
            .min_by_key(|(pos, _)| *pos);

        let Some((pos, marker)) = next else {
            split.push_text(rest);
            break;
        };

        split.push_text(&rest[..pos]);
        split.push_marker(marker);
        rest = &rest[pos + marker.token().len()..];
    }

    split
}

impl SplitContent {
    fn push_text(&mut self, text: &str) {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            self.segments.push(Segment::Text(trimmed.to_string()));
        }
    }

    fn push_marker(&mut self, marker: Marker) {
        let index = self.segments.len();
        match marker {
            Marker::Products => {
                self.products_index = Some(index);
                self.products_seen += 1;
            }
            Marker::Posts => {
                self.posts_index = Some(index);
                self.posts_seen += 1;
            }
        }
        self.segments.push(Segment::Marker(marker));
    }

    pub fn has_markers(&self) -> bool {
        self.products_index.is_some() || self.posts_index.is_some()
    }

    pub fn text_at(&self, index: usize) -> Option<&str> {
        self.segments.get(index).and_then(Segment::as_text)
    }

    /// Reject layouts where the index arithmetic is meaningless.
    pub fn validate(&self) -> Result<(), MarkerError> {
        if self.products_seen > 1 {
            return Err(MarkerError::Repeated(Marker::Products));
        }
        if self.posts_seen > 1 {
            return Err(MarkerError::Repeated(Marker::Posts));
        }
        if let (Some(products), Some(posts)) = (self.products_index, self.posts_index) {
            if posts < products {
                return Err(MarkerError::OutOfOrder);
            }
        }
        Ok(())
    }

    /// Text ahead of `[PRODUCTS]`. `None` when there is no products marker
    /// or nothing precedes it; the reply is then shown as its full content.
    pub fn lead_text(&self) -> Option<&str> {
        match self.products_index {
            Some(index) if index > 0 => self.text_at(0),
            _ => None,
        }
    }

    /// Text strictly between `[PRODUCTS]` and `[POSTS]`.
    pub fn interstitial_text(&self) -> Option<&str> {
        match (self.products_index, self.posts_index) {
            (Some(products), Some(posts)) if posts > products + 1 => self.text_at(products + 1),
            _ => None,
        }
    }

    /// Text after the last marker.
    pub fn trailing_text(&self) -> Option<&str> {
        let last_marker = self.last_marker_index()?;
        let last = self.segments.len().checked_sub(1)?;
        if last > last_marker {
            self.text_at(last)
        } else {
            None
        }
    }

    fn last_marker_index(&self) -> Option<usize> {
        match (self.products_index, self.posts_index) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }
}

/// Typed, marker-free form of an assistant reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    Text(String),
    Products,
    Posts,
}

/// Convert legacy marker content into an ordered block list.
///
/// Content without markers becomes a single text block holding the whole
/// string. Cards for a message without markers are placed by the renderer,
/// not by this list.
pub fn parse_blocks(content: &str) -> Result<Vec<ContentBlock>, MarkerError> {
    let split = split_content(content);
    split.validate()?;

    if !split.has_markers() {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }
        return Ok(vec![ContentBlock::Text(trimmed.to_string())]);
    }

    Ok(split
        .segments
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(text) => ContentBlock::Text(text),
            Segment::Marker(Marker::Products) => ContentBlock::Products,
            Segment::Marker(Marker::Posts) => ContentBlock::Posts,
        })
        .collect())
}
