//! Label-scan tokenizer.
//!
//! A scan is a run of `<TAGvalue>` segments with no separator between tag and value,
//! so tags are recognized by prefix. Scanning is a fold over the segment sequence:
//! [`ScanState::apply`] is the whole state machine and knows nothing about strings
//! with angle brackets in them.

use crate::domain::model::{LineItem, Order, OrderHeader};
use crate::utils::error::{OrderEntryError, Result};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SegmentTag {
    ItemNumber,
    PoNumber,
    Quantity,
    BolNumber,
    TrailerNumber,
    LineCount,
}

/// Known prefixes. Two-letter prefixes come first so a one-letter prefix can never
/// shadow them; [`classify`] additionally prefers the longest match.
const PREFIXES: [(&str, SegmentTag); 6] = [
    ("PR", SegmentTag::ItemNumber),
    ("PN", SegmentTag::PoNumber),
    ("B", SegmentTag::BolNumber),
    ("T", SegmentTag::TrailerNumber),
    ("L", SegmentTag::LineCount),
    ("Q", SegmentTag::Quantity),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Tagged { tag: SegmentTag, value: String },
    Unrecognized(String),
}

/// Input that was accepted but had no effect on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Discard {
    UnrecognizedSegment { content: String },
    /// A `PN` or `Q` value seen before any `PR` opened an item.
    OrphanField { tag: SegmentTag, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReport {
    pub order: Order,
    pub discards: Vec<Discard>,
}

/// Accumulator of the scan fold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanState {
    pub header: OrderHeader,
    pub completed: Vec<LineItem>,
    pub in_progress: Option<LineItem>,
    pub discards: Vec<Discard>,
}

impl ScanState {
    pub fn apply(mut self, segment: Segment) -> Self {
        let (tag, value) = match segment {
            Segment::Tagged { tag, value } => (tag, value),
            Segment::Unrecognized(content) => {
                self.discards.push(Discard::UnrecognizedSegment { content });
                return self;
            }
        };

        match tag {
            SegmentTag::BolNumber => self.header.bol_number = Some(value),
            SegmentTag::TrailerNumber => self.header.trailer_number = Some(value),
            SegmentTag::LineCount => {
                self.header.declared_line_count = parse_leading_integer(&value)
            }
            SegmentTag::ItemNumber => {
                self.flush();
                self.in_progress = Some(LineItem::with_item_number(value));
            }
            SegmentTag::PoNumber | SegmentTag::Quantity => match self.in_progress.as_mut() {
                Some(item) if tag == SegmentTag::PoNumber => item.po_number = Some(value),
                Some(item) => item.quantity = parse_leading_integer(&value),
                None => self.discards.push(Discard::OrphanField { tag, value }),
            },
        }

        self
    }

    fn flush(&mut self) {
        if let Some(item) = self.in_progress.take() {
            if item.has_any_field() {
                self.completed.push(item);
            }
        }
    }

    pub fn finish(mut self) -> ParseReport {
        self.flush();
        ParseReport {
            order: Order {
                header: self.header,
                items: self.completed,
            },
            discards: self.discards,
        }
    }
}

fn segment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<([^>]+)>").expect("segment pattern is valid"))
}

/// Match `content` against the prefix table, longest prefix first.
pub fn classify(content: &str) -> Segment {
    PREFIXES
        .iter()
        .filter(|(prefix, _)| content.starts_with(prefix))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(prefix, tag)| Segment::Tagged {
            tag: *tag,
            value: content[prefix.len()..].to_string(),
        })
        .unwrap_or_else(|| Segment::Unrecognized(content.to_string()))
}

/// All bracketed segments of `raw`, in input order.
pub fn segments(raw: &str) -> Vec<Segment> {
    segment_pattern()
        .captures_iter(raw)
        .map(|caps| classify(&caps[1]))
        .collect()
}

/// Integer prefix of `value`: optional surrounding whitespace and sign, then digits.
/// Trailing junk is ignored; no digits at all yields `None`.
pub fn parse_leading_integer(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

pub fn parse_with_report(raw: &str) -> Result<ParseReport> {
    let segments = segments(raw);
    if segments.is_empty() {
        return Err(OrderEntryError::FormatError {
            message: "no segments found".to_string(),
        });
    }

    tracing::debug!("🔎 Scan contains {} segment(s)", segments.len());
    let report = segments
        .into_iter()
        .fold(ScanState::default(), ScanState::apply)
        .finish();

    for discard in &report.discards {
        tracing::debug!("Ignored scan input: {:?}", discard);
    }

    Ok(report)
}

pub fn parse(raw: &str) -> Result<Order> {
    parse_with_report(raw).map(|report| report.order)
}
