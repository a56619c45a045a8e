use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::FusedIterator;
use std::ops::RangeInclusive;

/// Preferred number of pages handed to the extractor in one call.
///
/// The actual part size is balanced around this value, see [`PageRanges`].
pub const DEFAULT_PAGES_PER_PART: u32 = 20;

/// Inclusive, 1-based span of pages processed as one extraction unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRange {
    pub first: u32,
    pub last: u32,
}

impl PageRange {
    pub fn new(first: u32, last: u32) -> Self {
        debug_assert!(first >= 1 && first <= last, "invalid page range {first}-{last}");
        Self { first, last }
    }

    pub fn len(&self) -> u32 {
        self.last - self.first + 1
    }

    /// Always `false`: a range holds at least one page.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn pages(&self) -> RangeInclusive<u32> {
        self.first..=self.last
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.last)
    }
}

/// Number of parts a document of `total_pages` is split into.
pub fn part_count(total_pages: u32, pages_per_part: u32) -> u32 {
    if total_pages == 0 {
        return 0;
    }
    let effective = pages_per_part.max(1).min(total_pages);
    total_pages / effective
}

/// Lazy sequence of balanced page ranges covering `1..=total_pages`.
///
/// With `total_pages = k * parts + m`, the first `m` parts get `k + 1` pages
/// and the rest get `k`. Ranges are contiguous, non-overlapping and strictly
/// increasing. The iterator is fused: once exhausted it stays exhausted.
#[derive(Debug, Clone)]
pub struct PageRanges {
    parts: u32,
    base_len: u32,
    longer_parts: u32,
    emitted: u32,
    next_first: u32,
}

impl PageRanges {
    pub fn new(total_pages: u32, pages_per_part: u32) -> Self {
        let parts = part_count(total_pages, pages_per_part);
        let (base_len, longer_parts) = if parts == 0 {
            (0, 0)
        } else {
            (total_pages / parts, total_pages % parts)
        };

        Self {
            parts,
            base_len,
            longer_parts,
            emitted: 0,
            next_first: 1,
        }
    }

    pub fn with_default_size(total_pages: u32) -> Self {
        Self::new(total_pages, DEFAULT_PAGES_PER_PART)
    }

    pub fn part_count(&self) -> u32 {
        self.parts
    }
}

impl Iterator for PageRanges {
    type Item = PageRange;

    fn next(&mut self) -> Option<PageRange> {
        if self.emitted >= self.parts {
            return None;
        }

        let len = if self.emitted < self.longer_parts {
            self.base_len + 1
        } else {
            self.base_len
        };
        let range = PageRange::new(self.next_first, self.next_first + (len - 1));

        self.emitted += 1;
        self.next_first = range.last.saturating_add(1);
        Some(range)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.parts - self.emitted) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PageRanges {}

impl FusedIterator for PageRanges {}
