//! The ideas pipeline for painmine.
//!
//! Mines a blog-post corpus for recurring pain expressions and distills
//! them into ranked, labeled, evidence-backed project ideas: pattern
//! extraction, TF-IDF vectorization, trend acceleration, citation
//! centrality, composite scoring, similarity clustering, labeling, and
//! quality filtering, in one deterministic batch pass.

pub mod cluster;
pub mod extract;
pub mod label;
pub mod network;
pub mod pipeline;
pub mod score;
pub mod trends;
pub mod vectorizer;

pub use cluster::{cluster_signals, cosine_similarity, SIMILARITY_THRESHOLD};
pub use extract::extract_signals;
pub use network::{score_authority, AuthorityReport};
pub use pipeline::{mine_ideas, CorpusStats, MiningOutcome};
pub use trends::{detect_trends, find_leading_blogs, LeadingBlog, TrendReport};
pub use vectorizer::{Vectorizer, VectorizerOptions};
