//! Domain records shared across the pipeline crates.
//!
//! Posts are consumed read-only from the snapshot; everything else is
//! pipeline-owned and rebuilt from scratch on every run.

use serde::{Deserialize, Serialize};

/// One blog post from the ingested snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub blog_id: i64,
    pub blog_name: String,
    #[serde(default)]
    pub title: String,
    /// Raw description, may contain markup. Hyperlinks are read from
    /// this field before stripping.
    #[serde(default)]
    pub description: String,
    /// Unique per snapshot.
    pub url: String,
    /// ISO date string; may be absent or unparseable.
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub author: String,
}

/// The six pain-pattern families, in extraction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalType {
    Wish,
    Frustration,
    Gap,
    Difficulty,
    Broken,
    Opportunity,
}

impl SignalType {
    /// All types in their fixed extraction order. This order is also
    /// the dominant-type tie-break in labeling.
    pub const ALL: [SignalType; 6] = [
        SignalType::Wish,
        SignalType::Frustration,
        SignalType::Gap,
        SignalType::Difficulty,
        SignalType::Broken,
        SignalType::Opportunity,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SignalType::Wish => "wish",
            SignalType::Frustration => "frustration",
            SignalType::Gap => "gap",
            SignalType::Difficulty => "difficulty",
            SignalType::Broken => "broken",
            SignalType::Opportunity => "opportunity",
        }
    }
}

impl std::fmt::Display for SignalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse position of a match within the post text, by offset thirds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalLocation {
    Beginning,
    Midway,
    End,
}

impl std::fmt::Display for SignalLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SignalLocation::Beginning => "beginning",
            SignalLocation::Midway => "midway",
            SignalLocation::End => "end",
        })
    }
}

/// A matched pain expression extracted from one post.
///
/// At most one exists per `(post_url, signal_type)` pair; the longest
/// qualifying match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PainSignal {
    pub post_url: String,
    pub blog_name: String,
    pub published: Option<String>,
    pub signal_type: SignalType,
    /// The minimal enclosing sentence of the match.
    pub signal_text: String,
    /// 2-3 surrounding sentences.
    pub signal_context: String,
    pub signal_location: SignalLocation,
}

/// A pain signal plus its score components, each in `[0, 1]`.
///
/// `breadth` is 0.0 until cluster membership is known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredSignal {
    #[serde(flatten)]
    pub signal: PainSignal,
    pub trend: f64,
    pub authority: f64,
    pub breadth: f64,
    pub recency: f64,
    pub impact: f64,
}

impl ScoredSignal {
    #[must_use]
    pub fn unscored(signal: PainSignal) -> Self {
        ScoredSignal {
            signal,
            trend: 0.0,
            authority: 0.0,
            breadth: 0.0,
            recency: 0.0,
            impact: 0.0,
        }
    }
}

/// A keyword whose recent frequency accelerates against its baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergingTopic {
    pub keyword: String,
    pub recent_score: f64,
    /// Always > 0; zero-baseline keywords are excluded upstream.
    pub historical_avg: f64,
    pub acceleration: f64,
}

/// A directed citation from one blog's post to another blog.
///
/// Duplicate edges are allowed and strengthen the link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationEdge {
    pub source_blog: String,
    pub target_blog: String,
    pub source_post_url: String,
}

/// A cluster of related pain signals presented as one ranked idea.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Idea {
    pub idea_id: usize,
    pub label: String,
    /// Equals the best member impact.
    pub impact_score: f64,
    /// Distinct blogs among members.
    pub blog_count: usize,
    pub signal_count: usize,
    /// Ordered by descending impact.
    pub members: Vec<ScoredSignal>,
}
