//! Heuristic conversion of extracted PDF text into Markdown.
//!
//! Each non-blank line of a page is classified on its own as a heading,
//! a list item, or body text. There is no state carried between lines or
//! between pages.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Numbered list marker: `1.`, `2)`, `3、` followed by whitespace.
static NUMBERED_ITEM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)、]\s+").unwrap());

/// Lettered list marker: `a.`, `B)` followed by whitespace.
static LETTERED_ITEM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][.)]\s+").unwrap());

/// Bullet glyph followed by whitespace.
static BULLET_ITEM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[•\-*▪◦]\s+").unwrap());

/// Separator placed between the Markdown of consecutive pages.
pub const PAGE_SEPARATOR: &str = "\n\n---\n\n";

/// UTF-8 byte-order mark.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Tunable thresholds for the line classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Lines longer than this are never headings.
    pub max_title_chars: usize,

    /// All-caps lines shorter than this are headings.
    pub max_upper_title_chars: usize,

    /// Capitalised lines need fewer spaces than this to be headings.
    pub max_title_spaces: usize,

    /// Capitalised lines need a digit share below this to be headings.
    pub max_digit_ratio: f64,

    /// Headings shorter than this are level 1.
    pub h1_below: usize,

    /// Headings shorter than this (and not level 1) are level 2.
    pub h2_below: usize,

    /// Also rewrite `1. item` lines to `- 1. item`.
    pub prefix_numbered_items: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_title_chars: 100,
            max_upper_title_chars: 80,
            max_title_spaces: 8,
            max_digit_ratio: 0.3,
            h1_below: 30,
            h2_below: 50,
            prefix_numbered_items: false,
        }
    }
}

/// What a single line was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Heading with level 1 to 3.
    Heading(u8),
    /// List item, with the marker style that matched.
    ListItem(ListMarker),
    /// Plain paragraph text.
    Body,
}

/// The kind of marker a list line starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    /// Already `- `.
    Dash,
    Numbered,
    Lettered,
    Bullet,
}

/// Whether a Markdown file starts with a UTF-8 byte-order mark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BomPolicy {
    /// BOM on Windows only, plain UTF-8 elsewhere.
    #[default]
    Auto,
    Always,
    Never,
}

impl BomPolicy {
    /// Whether this policy writes a BOM on the current platform.
    pub fn writes_bom(&self) -> bool {
        match self {
            Self::Auto => cfg!(windows),
            Self::Always => true,
            Self::Never => false,
        }
    }

    /// Encode Markdown text to bytes under this policy.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(text.len() + UTF8_BOM.len());
        if self.writes_bom() {
            bytes.extend_from_slice(UTF8_BOM);
        }
        bytes.extend_from_slice(text.as_bytes());
        bytes
    }
}

impl std::str::FromStr for BomPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            other => Err(format!("unknown BOM policy '{}'", other)),
        }
    }
}

/// Classifies lines of extracted text and renders them as Markdown.
#[derive(Debug, Clone, Default)]
pub struct MarkdownClassifier {
    config: ClassifierConfig,
}

impl MarkdownClassifier {
    /// Create a classifier with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the thresholds.
    pub fn with_config(mut self, config: ClassifierConfig) -> Self {
        self.config = config;
        self
    }

    /// Current thresholds.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify one trimmed, non-blank line.
    ///
    /// The heading check runs first; a heading is never also a list item.
    pub fn classify_line(&self, line: &str) -> LineKind {
        if let Some(level) = self.heading_level(line) {
            return LineKind::Heading(level);
        }

        match list_marker(line) {
            Some(marker) => LineKind::ListItem(marker),
            None => LineKind::Body,
        }
    }

    /// Render one line as Markdown according to its classification.
    pub fn render_line(&self, line: &str) -> String {
        match self.classify_line(line) {
            LineKind::Heading(level) => format!("{} {}", "#".repeat(level as usize), line),
            LineKind::ListItem(ListMarker::Dash) => line.to_string(),
            LineKind::ListItem(ListMarker::Numbered) if !self.config.prefix_numbered_items => {
                line.to_string()
            }
            LineKind::ListItem(_) => format!("- {}", line),
            LineKind::Body => line.to_string(),
        }
    }

    /// Convert the text of one page to Markdown.
    ///
    /// Lines are trimmed, blank lines dropped, and the rendered lines joined
    /// with a blank line between each. Returns an empty string for a page
    /// with no text.
    pub fn classify(&self, page_text: &str) -> String {
        page_text
            .split('\n')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| self.render_line(l))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Convert a sequence of pages, joining them with a horizontal rule.
    ///
    /// Pages without text are skipped entirely, so no separator is emitted
    /// for them.
    pub fn render_pages<S: AsRef<str>>(&self, pages: &[S]) -> String {
        pages
            .iter()
            .map(|p| self.classify(p.as_ref()))
            .filter(|md| !md.is_empty())
            .collect::<Vec<_>>()
            .join(PAGE_SEPARATOR)
    }

    /// Heading level for a line, or `None` when it is not a likely title.
    fn heading_level(&self, line: &str) -> Option<u8> {
        let cfg = &self.config;
        let len = line.chars().count();

        if len == 0 || len > cfg.max_title_chars {
            return None;
        }

        let all_caps = is_upper(line) && len < cfg.max_upper_title_chars;
        let capitalised = line.chars().next().is_some_and(char::is_uppercase)
            && line.matches(' ').count() < cfg.max_title_spaces
            && digit_ratio(line, len) < cfg.max_digit_ratio;

        if !(all_caps || capitalised) {
            return None;
        }

        let level = if len < cfg.h1_below {
            1
        } else if len < cfg.h2_below {
            2
        } else {
            3
        };
        Some(level)
    }
}

/// Upper-case in the sense of "has cased letters and none lower-case".
fn is_upper(line: &str) -> bool {
    let mut has_upper = false;
    for c in line.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_upper = true;
        }
    }
    has_upper
}

fn digit_ratio(line: &str, len: usize) -> f64 {
    let digits = line.chars().filter(char::is_ascii_digit).count();
    digits as f64 / len as f64
}

fn list_marker(line: &str) -> Option<ListMarker> {
    if line.starts_with("- ") {
        Some(ListMarker::Dash)
    } else if NUMBERED_ITEM_REGEX.is_match(line) {
        Some(ListMarker::Numbered)
    } else if LETTERED_ITEM_REGEX.is_match(line) {
        Some(ListMarker::Lettered)
    } else if BULLET_ITEM_REGEX.is_match(line) {
        Some(ListMarker::Bullet)
    } else {
        None
    }
}
