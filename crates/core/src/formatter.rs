//! Line-by-line classification of free-text travel responses into display
//! blocks.
//!
//! Every line is run through [`LINE_RULES`] top to bottom and the first rule
//! that matches decides the block. The table is plain data so callers (and
//! tests) can enumerate it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const CURRENCY_SYMBOLS: [char; 5] = ['₹', '$', '€', '£', '¥'];

static BOLD_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid emphasis regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum DisplayBlock {
    Heading(String),
    Subheading(String),
    Bullet(String),
    DayMarker(String),
    CostLine(String),
    Paragraph(String),
    Spacer,
}

impl DisplayBlock {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Heading(text)
            | Self::Subheading(text)
            | Self::Bullet(text)
            | Self::DayMarker(text)
            | Self::CostLine(text)
            | Self::Paragraph(text) => Some(text),
            Self::Spacer => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LineRule {
    pub name: &'static str,
    pub classify: fn(&str) -> Option<DisplayBlock>,
}

pub const LINE_RULES: &[LineRule] = &[
    LineRule {
        name: "heading",
        classify: heading,
    },
    LineRule {
        name: "subheading",
        classify: subheading,
    },
    LineRule {
        name: "bullet",
        classify: bullet,
    },
    LineRule {
        name: "day_marker",
        classify: day_marker,
    },
    LineRule {
        name: "cost_line",
        classify: cost_line,
    },
    LineRule {
        name: "spacer",
        classify: spacer,
    },
    LineRule {
        name: "paragraph",
        classify: paragraph,
    },
];

/// Splits on `\n` so a trailing newline still yields its own spacer; a
/// trailing `\r` is dropped from each line.
pub fn format_response(text: &str) -> Vec<DisplayBlock> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter_map(classify_line)
        .collect()
}

/// `None` only for a line that trims to nothing yet escaped the spacer rule.
pub fn classify_line(line: &str) -> Option<DisplayBlock> {
    LINE_RULES.iter().find_map(|rule| (rule.classify)(line))
}

fn heading(line: &str) -> Option<DisplayBlock> {
    line.strip_prefix("##")
        .map(|rest| DisplayBlock::Heading(rest.trim().to_string()))
}

fn subheading(line: &str) -> Option<DisplayBlock> {
    let trimmed = line.trim();
    if trimmed.starts_with("**") && trimmed.ends_with("**") {
        Some(DisplayBlock::Subheading(
            trimmed.replace("**", "").trim().to_string(),
        ))
    } else {
        None
    }
}

fn bullet(line: &str) -> Option<DisplayBlock> {
    line.trim()
        .strip_prefix('*')
        .map(|rest| DisplayBlock::Bullet(rest.trim().to_string()))
}

fn day_marker(line: &str) -> Option<DisplayBlock> {
    (line.contains("Day ") && line.contains(':'))
        .then(|| DisplayBlock::DayMarker(line.trim().to_string()))
}

fn cost_line(line: &str) -> Option<DisplayBlock> {
    (line.contains(CURRENCY_SYMBOLS) || line.contains("Cost") || line.contains("Budget"))
        .then(|| DisplayBlock::CostLine(line.trim().to_string()))
}

fn spacer(line: &str) -> Option<DisplayBlock> {
    line.trim().is_empty().then_some(DisplayBlock::Spacer)
}

fn paragraph(line: &str) -> Option<DisplayBlock> {
    let trimmed = line.trim();
    (!trimmed.is_empty()).then(|| DisplayBlock::Paragraph(trimmed.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum InlineSpan {
    Plain(String),
    Bold(String),
}

/// Splits block text on `**bold**` runs. Unpaired `**` markers are dropped.
pub fn inline_spans(text: &str) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    let mut last = 0;

    for captures in BOLD_SPAN.captures_iter(text) {
        let (Some(whole), Some(inner)) = (captures.get(0), captures.get(1)) else {
            continue;
        };

        push_plain(&mut spans, &text[last..whole.start()]);
        spans.push(InlineSpan::Bold(inner.as_str().to_string()));
        last = whole.end();
    }

    push_plain(&mut spans, &text[last..]);
    spans
}

fn push_plain(spans: &mut Vec<InlineSpan>, segment: &str) {
    let cleaned = segment.replace("**", "");
    if !cleaned.is_empty() {
        spans.push(InlineSpan::Plain(cleaned));
    }
}
