//! HTML to visible-text normalization.
//!
//! Reduces a raw HTML document to the stable text a reader would see, so
//! fingerprints change only when the page's visible content does. Markup
//! noise (attribute churn, reordered scripts, style tweaks) must not
//! register as a content change.

use chrono::{DateTime, Utc};
use ego_tree::NodeRef;
use scraper::{node::Node, Html};

use crate::fingerprint::ContentFingerprint;

/// Tags whose entire subtree is dropped before text extraction.
///
/// Removal has to happen before extraction: text collected first would
/// still contain script bodies and boilerplate.
const STRIPPED_TAGS: &[&str] = &["script", "style", "footer", "nav", "noscript"];

/// Extract the visible text of an HTML document.
///
/// Every text node outside the stripped subtrees is collected, nodes are
/// joined with newlines, then each line is trimmed and empty lines are
/// dropped. Deterministic: identical HTML always yields identical text.
pub fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut raw = String::new();
    collect_text(document.tree.root(), &mut raw);

    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&text);
        }
        Node::Element(element) if STRIPPED_TAGS.contains(&element.name()) => {}
        _ => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
    }
}

/// Normalized visible text of the monitored page at one point in time.
///
/// Ephemeral: lives for one run, never persisted in full. Only its
/// fingerprint outlives the process.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    /// URL the page was fetched from.
    pub url: String,

    /// When the snapshot was taken.
    pub fetched_at: DateTime<Utc>,

    /// Normalized visible text.
    pub text: String,
}

impl PageSnapshot {
    /// Normalize raw HTML fetched from `url` into a snapshot.
    pub fn from_html(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            fetched_at: Utc::now(),
            text: extract_visible_text(html),
        }
    }

    /// Fingerprint of the snapshot text.
    pub fn fingerprint(&self) -> ContentFingerprint {
        ContentFingerprint::from_text(&self.text)
    }
}
