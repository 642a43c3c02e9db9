//! Ideas pipeline orchestration.
//!
//! 1. Extract pain signals from the post corpus.
//! 2. Fit the shared TF-IDF space over signal documents.
//! 3. Detect keyword trends and score blog authority (independent,
//!    run on parallel workers).
//! 4. Preliminary scoring pass with breadth 0, to order members.
//! 5. Agglomerative clustering over the signal vectors.
//! 6. Breadth recomputation and final scoring pass.
//! 7. Label synthesis, quality filtering, renumbering, top-N cap.
//!
//! Degenerate corpora (no signals, no edges, no trend baseline) flow
//! through with zeroed components; the worst outcome is an empty idea
//! list, never an error.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use painmine_core::{Idea, MiningConfig, Post, ScoredSignal};

use crate::cluster::cluster_signals;
use crate::extract::extract_signals;
use crate::label::label_idea;
use crate::network::AuthorityReport;
use crate::score::{score_signal, ScoringContext};
use crate::trends::TrendReport;
use crate::vectorizer::{raw_tokens, Vectorizer, VectorizerOptions};

/// Corpus-level counts carried along for reporting.
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct CorpusStats {
    pub posts: usize,
    pub blogs: usize,
    pub signals: usize,
    /// Distinct blogs that produced at least one signal; the breadth
    /// denominator.
    pub signal_blogs: usize,
    pub citation_edges: usize,
}

/// Everything a renderer needs from one pipeline run.
#[derive(Debug, Clone)]
pub struct MiningOutcome {
    /// Post-filter, renumbered, capped at `top_n`.
    pub ideas: Vec<Idea>,
    pub trends: TrendReport,
    pub authority: AuthorityReport,
    pub stats: CorpusStats,
}

/// Run the full batch pipeline over an immutable post snapshot.
///
/// `today` is explicit so that runs are reproducible; re-running on an
/// unchanged snapshot with the same date yields identical ideas.
#[must_use]
pub fn mine_ideas(posts: &[Post], config: &MiningConfig, today: NaiveDate) -> MiningOutcome {
    let signals = extract_signals(posts, config.max_age_days, today);

    let titles_by_url: HashMap<String, String> = posts
        .iter()
        .map(|p| (p.url.clone(), p.title.clone()))
        .collect();

    let documents: Vec<String> = signals
        .iter()
        .map(|s| {
            let title = titles_by_url.get(&s.post_url).map_or("", String::as_str);
            format!("{title} {title} {}", s.signal_text)
        })
        .collect();
    let options = VectorizerOptions::for_signals(config.max_features, documents.len());
    let (vectorizer, rows) = Vectorizer::fit_transform(&documents, &options);

    let (trends, authority) = rayon::join(
        || crate::trends::detect_trends(posts, config.period),
        || crate::network::score_authority(posts),
    );

    let doc_tokens: Vec<HashSet<String>> = documents
        .iter()
        .map(|doc| raw_tokens(doc).into_iter().collect())
        .collect();

    let ctx = ScoringContext {
        emerging: &trends.emerging,
        max_acceleration: trends.max_acceleration,
        centrality: &authority.centrality,
        max_centrality: authority.max_centrality,
        today,
    };

    let mut scored: Vec<ScoredSignal> = signals.into_iter().map(ScoredSignal::unscored).collect();
    for (signal, tokens) in scored.iter_mut().zip(&doc_tokens) {
        score_signal(signal, tokens, 0.0, &ctx);
    }

    let signal_blogs: HashSet<&str> = scored.iter().map(|s| s.signal.blog_name.as_str()).collect();
    let signal_blog_count = signal_blogs.len();

    let clusters = cluster_signals(&rows);
    tracing::info!(
        signals = scored.len(),
        clusters = clusters.len(),
        "clustering done"
    );

    let mut ideas: Vec<Idea> = Vec::with_capacity(clusters.len());
    for member_indices in clusters {
        let cluster_blogs: HashSet<&str> = member_indices
            .iter()
            .map(|&i| scored[i].signal.blog_name.as_str())
            .collect();
        #[allow(clippy::cast_precision_loss)]
        let breadth = if signal_blog_count == 0 {
            0.0
        } else {
            cluster_blogs.len() as f64 / signal_blog_count as f64
        };

        let mut members: Vec<ScoredSignal> = member_indices
            .iter()
            .map(|&i| {
                let mut member = scored[i].clone();
                score_signal(&mut member, &doc_tokens[i], breadth, &ctx);
                member
            })
            .collect();
        members.sort_by(|a, b| b.impact.total_cmp(&a.impact));

        let impact_score = members.first().map_or(0.0, |m| m.impact);
        let label = label_idea(&members, &titles_by_url, &vectorizer);
        ideas.push(Idea {
            idea_id: 0,
            label,
            impact_score,
            blog_count: cluster_blogs.len(),
            signal_count: members.len(),
            members,
        });
    }

    ideas.sort_by(|a, b| b.impact_score.total_cmp(&a.impact_score));

    // Single-source ideas are unsupported speculation, but only when
    // the corpus produced at least one multi-blog idea to prefer.
    if ideas.iter().any(|idea| idea.blog_count >= 2) {
        ideas.retain(|idea| idea.blog_count >= 2);
    }
    for (id, idea) in ideas.iter_mut().enumerate() {
        idea.idea_id = id;
    }
    ideas.truncate(config.top_n);

    let blogs: HashSet<&str> = posts.iter().map(|p| p.blog_name.as_str()).collect();
    let stats = CorpusStats {
        posts: posts.len(),
        blogs: blogs.len(),
        signals: scored.len(),
        signal_blogs: signal_blog_count,
        citation_edges: authority.edges.len(),
    };
    tracing::info!(ideas = ideas.len(), "ideas pipeline done");

    MiningOutcome {
        ideas,
        trends,
        authority,
        stats,
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
