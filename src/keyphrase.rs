//! Keyphrase reconstruction from sequence-tagging output
//!
//! The keyphrase model answers either with entities already merged by the
//! serving layer (`entity_group` set) or with one record per token tagged in
//! a begin/inside/outside scheme. Both shapes are folded into [`TaggedSpan`]
//! on ingestion, then turned back into whitespace-normalized, deduplicated
//! phrases cut from the source text.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::deserializers::{
    de_option_label_lenient, de_option_offset_lenient, de_option_score_lenient,
};
use crate::utils::text::{CharSlicer, normalize_whitespace};

/// Returned instead of an empty list when no phrase survives processing
pub const NO_KEYPHRASES: &str = "No keyphrases found.";

/// Marker an aggregated group label must contain to count as a keyphrase
pub const KEYPHRASE_GROUP_MARKER: &str = "KEY";

/// Upper bound on phrases returned by a single extraction
pub const MAX_KEYWORDS_LIMIT: usize = 10;

/// One record of a token-classification response, as it comes over the wire.
///
/// Every field is optional because backends disagree on the shape: raw
/// per-token output names the tag `entity` (or `label`), aggregated output
/// names it `entity_group`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaggingRecord {
    #[serde(default, deserialize_with = "de_option_offset_lenient")]
    pub start: Option<usize>,
    #[serde(default, deserialize_with = "de_option_offset_lenient")]
    pub end: Option<usize>,
    #[serde(default, deserialize_with = "de_option_label_lenient")]
    pub label: Option<String>,
    /// Raw tag as named by the hosted API; `label` wins when both are present
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_option_label_lenient"
    )]
    pub entity: Option<String>,
    #[serde(default, deserialize_with = "de_option_label_lenient")]
    pub entity_group: Option<String>,
    #[serde(default, deserialize_with = "de_option_score_lenient")]
    pub score: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
}

/// A tagged region of the source text, in one of the two shapes a tagging
/// model can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum TaggedSpan {
    /// Tokens pre-merged into an entity by the serving layer
    Aggregated {
        group: String,
        start: Option<usize>,
        end: Option<usize>,
        score: Option<f32>,
    },
    /// A single token with a begin/inside/outside tag
    Token {
        label: String,
        start: Option<usize>,
        end: Option<usize>,
        score: Option<f32>,
    },
}

impl TaggedSpan {
    pub fn start(&self) -> Option<usize> {
        match self {
            TaggedSpan::Aggregated { start, .. } | TaggedSpan::Token { start, .. } => *start,
        }
    }

    pub fn end(&self) -> Option<usize> {
        match self {
            TaggedSpan::Aggregated { end, .. } | TaggedSpan::Token { end, .. } => *end,
        }
    }

    pub fn score(&self) -> Option<f32> {
        match self {
            TaggedSpan::Aggregated { score, .. } | TaggedSpan::Token { score, .. } => *score,
        }
    }

    pub fn is_aggregated(&self) -> bool {
        matches!(self, TaggedSpan::Aggregated { .. })
    }

    /// Both offsets, if present
    fn bounds(&self) -> Option<(usize, usize)> {
        Some((self.start()?, self.end()?))
    }
}

impl From<TaggingRecord> for TaggedSpan {
    fn from(record: TaggingRecord) -> Self {
        match record.entity_group {
            Some(group) if !group.is_empty() => TaggedSpan::Aggregated {
                group,
                start: record.start,
                end: record.end,
                score: record.score,
            },
            _ => TaggedSpan::Token {
                label: record.label.or(record.entity).unwrap_or_default(),
                start: record.start,
                end: record.end,
                score: record.score,
            },
        }
    }
}

/// Normalize a raw response into spans
pub fn ingest(records: Vec<TaggingRecord>) -> Vec<TaggedSpan> {
    records.into_iter().map(TaggedSpan::from).collect()
}

/// Role a token label plays in the begin/inside/outside scheme.
///
/// `B` is checked before `I`, so a malformed label that starts with `B` always
/// begins a phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagRole {
    Begin,
    Inside,
    Outside,
}

impl TagRole {
    fn of(label: &str) -> Self {
        match label.chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('B') => TagRole::Begin,
            Some('I') => TagRole::Inside,
            _ => TagRole::Outside,
        }
    }
}

/// Walk state while merging tokens
#[derive(Debug, Clone, Copy)]
enum Walk {
    Idle,
    Open { start: usize, end: usize },
}

/// Rebuild the ordered, deduplicated phrase list for `text`.
pub fn reconstruct_phrases(text: &str, spans: &[TaggedSpan]) -> Vec<String> {
    let slicer = CharSlicer::new(text);
    let aggregated = spans.iter().any(TaggedSpan::is_aggregated);

    let raw = if aggregated {
        aggregated_phrases(&slicer, spans)
    } else {
        token_phrases(&slicer, spans)
    };
    debug!(
        "Reconstructed {} raw phrases from {} spans (aggregated={})",
        raw.len(),
        spans.len(),
        aggregated
    );

    dedupe(raw)
}

/// Format up to `max_keywords` phrases (clamped to 1..=10) as a comma list,
/// or [`NO_KEYPHRASES`] when nothing was found.
pub fn extract_keyphrases(text: &str, spans: &[TaggedSpan], max_keywords: usize) -> String {
    let limit = max_keywords.clamp(1, MAX_KEYWORDS_LIMIT);
    let phrases = reconstruct_phrases(text, spans);
    if phrases.is_empty() {
        return NO_KEYPHRASES.to_string();
    }
    phrases
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn aggregated_phrases<'a>(slicer: &CharSlicer<'a>, spans: &[TaggedSpan]) -> Vec<&'a str> {
    spans
        .iter()
        .filter_map(|span| match span {
            TaggedSpan::Aggregated {
                group,
                start: Some(start),
                end: Some(end),
                ..
            } if group.to_uppercase().contains(KEYPHRASE_GROUP_MARKER) => {
                Some(slicer.slice(*start, *end).trim())
            }
            _ => None,
        })
        .collect()
}

fn token_phrases<'a>(slicer: &CharSlicer<'a>, spans: &[TaggedSpan]) -> Vec<&'a str> {
    let mut tokens: Vec<(usize, usize, TagRole)> = spans
        .iter()
        .filter_map(|span| {
            let (start, end) = span.bounds()?;
            let role = match span {
                TaggedSpan::Token { label, .. } => TagRole::of(label),
                TaggedSpan::Aggregated { .. } => TagRole::Outside,
            };
            Some((start, end, role))
        })
        .collect();
    // Token order in raw output is not guaranteed
    tokens.sort_by_key(|&(start, end, _)| (start, end));

    let mut phrases = Vec::new();
    let mut state = Walk::Idle;
    for (start, end, role) in tokens {
        state = match (role, state) {
            (TagRole::Begin, prev) => {
                if let Walk::Open { start: s, end: e } = prev {
                    phrases.push(slicer.slice(s, e));
                }
                Walk::Open { start, end }
            }
            (TagRole::Inside, Walk::Open { start: open, .. }) => Walk::Open { start: open, end },
            (_, prev) => {
                if let Walk::Open { start: s, end: e } = prev {
                    phrases.push(slicer.slice(s, e));
                }
                Walk::Idle
            }
        };
    }
    if let Walk::Open { start, end } = state {
        phrases.push(slicer.slice(start, end));
    }
    phrases
}

fn dedupe(raw: Vec<&str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for phrase in raw {
        let key = normalize_whitespace(phrase);
        if !key.is_empty() && seen.insert(key.clone()) {
            out.push(key);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(start: usize, end: usize, label: &str) -> TaggedSpan {
        TaggedSpan::Token {
            label: label.to_string(),
            start: Some(start),
            end: Some(end),
            score: None,
        }
    }

    fn agg(start: usize, end: usize, group: &str) -> TaggedSpan {
        TaggedSpan::Aggregated {
            group: group.to_string(),
            start: Some(start),
            end: Some(end),
            score: Some(0.9),
        }
    }

    #[test]
    fn test_aggregated_single_entity() {
        let text = "Graph databases enable fast traversal.";
        let spans = vec![agg(0, 16, "KEY")];
        assert_eq!(reconstruct_phrases(text, &spans), vec!["Graph databases"]);
    }

    #[test]
    fn test_aggregated_keeps_input_order_and_filters_groups() {
        let text = "alpha beta gamma";
        let spans = vec![agg(11, 16, "key"), agg(0, 5, "OTHER"), agg(6, 10, "Keyphrase")];
        assert_eq!(reconstruct_phrases(text, &spans), vec!["gamma", "beta"]);
    }

    #[test]
    fn test_aggregated_skips_missing_offsets() {
        let text = "alpha beta";
        let spans = vec![
            TaggedSpan::Aggregated {
                group: "KEY".into(),
                start: None,
                end: Some(5),
                score: None,
            },
            agg(6, 10, "KEY"),
        ];
        assert_eq!(reconstruct_phrases(text, &spans), vec!["beta"]);
    }

    #[test]
    fn test_aggregated_mode_ignores_token_spans() {
        let text = "alpha beta";
        let spans = vec![tok(0, 5, "B-KEY"), agg(6, 10, "KEY")];
        assert_eq!(reconstruct_phrases(text, &spans), vec!["beta"]);
    }

    #[test]
    fn test_raw_unsorted_begin_inside_outside() {
        let text = "machine learning models";
        let spans = vec![tok(8, 16, "I-KEY"), tok(0, 7, "B-KEY"), tok(17, 23, "O")];
        assert_eq!(reconstruct_phrases(text, &spans), vec!["machine learning"]);
    }

    #[test]
    fn test_raw_lone_inside_is_dropped() {
        let text = "deep neural nets";
        let spans = vec![tok(0, 4, "I-KEY"), tok(5, 11, "O")];
        assert!(reconstruct_phrases(text, &spans).is_empty());
    }

    #[test]
    fn test_raw_consecutive_begins_split_phrases() {
        let text = "rust tokio serde";
        let spans = vec![tok(0, 4, "B-KEY"), tok(5, 10, "B-KEY"), tok(11, 16, "I-KEY")];
        assert_eq!(reconstruct_phrases(text, &spans), vec!["rust", "tokio serde"]);
    }

    #[test]
    fn test_raw_open_span_closed_at_end() {
        let text = "open phrase";
        let spans = vec![tok(0, 4, "b"), tok(5, 11, "i")];
        assert_eq!(reconstruct_phrases(text, &spans), vec!["open phrase"]);
    }

    #[test]
    fn test_raw_missing_offsets_skipped() {
        let text = "alpha beta";
        let spans = vec![
            TaggedSpan::Token {
                label: "B-KEY".into(),
                start: Some(0),
                end: None,
                score: None,
            },
            tok(6, 10, "B-KEY"),
        ];
        assert_eq!(reconstruct_phrases(text, &spans), vec!["beta"]);
    }

    #[test]
    fn test_tag_role_precedence() {
        assert_eq!(TagRole::of("B-KEY"), TagRole::Begin);
        assert_eq!(TagRole::of("bogus"), TagRole::Begin);
        assert_eq!(TagRole::of("I-KEY"), TagRole::Inside);
        assert_eq!(TagRole::of("O"), TagRole::Outside);
        assert_eq!(TagRole::of(""), TagRole::Outside);
    }

    #[test]
    fn test_dedupe_normalizes_whitespace() {
        let text = "fast  search\nfast search";
        let spans = vec![tok(0, 12, "B"), tok(13, 24, "B")];
        assert_eq!(reconstruct_phrases(text, &spans), vec!["fast search"]);
    }

    #[test]
    fn test_extract_sentinel_on_empty() {
        assert_eq!(extract_keyphrases("anything", &[], 5), NO_KEYPHRASES);
    }

    #[test]
    fn test_extract_clamps_low_limit() {
        let text = "one two";
        let spans = vec![tok(0, 3, "B"), tok(4, 7, "B")];
        assert_eq!(extract_keyphrases(text, &spans, 0), "one");
        assert_eq!(extract_keyphrases(text, &spans, 2), "one, two");
    }

    #[test]
    fn test_record_ingestion_discriminates_shapes() {
        let records = vec![
            TaggingRecord {
                start: Some(0),
                end: Some(3),
                entity_group: Some("KEY".into()),
                ..Default::default()
            },
            TaggingRecord {
                start: Some(4),
                end: Some(7),
                entity_group: Some(String::new()),
                label: Some("B-KEY".into()),
                ..Default::default()
            },
        ];
        let spans = ingest(records);
        assert!(spans[0].is_aggregated());
        assert!(!spans[1].is_aggregated());
    }
}
