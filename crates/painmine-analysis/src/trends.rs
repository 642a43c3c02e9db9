//! Keyword trend detection over period-bucketed posts.
//!
//! Keywords come from a vectorizer fit independently of the shared
//! signal vectorizer, over whole posts. A keyword is emerging when its
//! most recent period score is more than twice its historical average.

use std::collections::BTreeMap;

use chrono::Datelike;
use painmine_core::{parse_iso_date, strip_markup, EmergingTopic, Period, Post};

use crate::vectorizer::{Vectorizer, VectorizerOptions};

/// A keyword counts as emerging only when its recent-to-historical
/// ratio strictly exceeds this.
const MIN_ACCELERATION: f64 = 2.0;

/// Leading-blog attribution is computed for at most this many of the
/// top emerging keywords.
const LEADING_BLOG_KEYWORDS: usize = 10;

/// One blog's record of mentioning a keyword.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct LeadingBlog {
    pub blog_name: String,
    /// Earliest `published` string among mentioning posts; empty when
    /// none of them carries a date.
    pub first_mention: String,
    pub mention_count: usize,
}

/// Per-period keyword scores plus the ranked emerging set.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct TrendReport {
    /// Period key -> keyword -> normalized score. Keys sort
    /// chronologically (`YYYY-MM` / `YYYY-Www`).
    pub periods: BTreeMap<String, BTreeMap<String, f64>>,
    /// Sorted by acceleration descending.
    pub emerging: Vec<EmergingTopic>,
    /// Highest acceleration among emerging keywords; the trend-score
    /// normalizer. 0.0 when nothing is emerging.
    pub max_acceleration: f64,
    /// Keyword -> blogs that mentioned it, earliest first. Covers the
    /// top emerging keywords only.
    pub leading_blogs: BTreeMap<String, Vec<LeadingBlog>>,
}

/// Bucket posts by period and detect accelerating keywords.
///
/// Posts without a parseable date are excluded from bucketing (they
/// cannot be placed on the timeline) but still flow through the rest
/// of the pipeline. Fewer than two populated periods yields an empty
/// emerging set.
#[must_use]
pub fn detect_trends(posts: &[Post], period: Period) -> TrendReport {
    let documents: Vec<String> = posts
        .iter()
        .map(|p| format!("{} {}", p.title, strip_markup(&p.description)))
        .collect();
    if documents.is_empty() {
        return TrendReport::default();
    }

    let options = VectorizerOptions::for_posts(documents.len());
    let (vectorizer, rows) = Vectorizer::fit_transform(&documents, &options);
    let vocabulary = vectorizer.vocabulary();

    let mut period_indices: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, post) in posts.iter().enumerate() {
        let Some(date) = post.published.as_deref().and_then(parse_iso_date) else {
            continue;
        };
        period_indices.entry(period_key(date, period)).or_default().push(idx);
    }

    let mut periods: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    for (key, indices) in &period_indices {
        #[allow(clippy::cast_precision_loss)]
        let post_count = indices.len() as f64;
        let mut scores: BTreeMap<String, f64> = BTreeMap::new();
        for &idx in indices {
            for &(term_idx, weight) in &rows[idx] {
                *scores.entry(vocabulary[term_idx].clone()).or_insert(0.0) += weight;
            }
        }
        scores.retain(|_, total| {
            *total /= post_count;
            *total > 0.0
        });
        if !scores.is_empty() {
            periods.insert(key.clone(), scores);
        }
    }

    let (emerging, max_acceleration) = detect_emerging(&periods);
    let leading_blogs: BTreeMap<String, Vec<LeadingBlog>> = emerging
        .iter()
        .take(LEADING_BLOG_KEYWORDS)
        .map(|topic| (topic.keyword.clone(), find_leading_blogs(posts, &topic.keyword)))
        .collect();
    tracing::info!(
        periods = periods.len(),
        emerging = emerging.len(),
        max_acceleration,
        "trend detection done"
    );

    TrendReport {
        periods,
        emerging,
        max_acceleration,
        leading_blogs,
    }
}

/// Which blogs mentioned `keyword` earliest and most often.
///
/// A mention is a case-insensitive substring hit in the post title plus
/// stripped description. Results sort by first mention ascending, with
/// undated blogs last and blog name breaking ties.
#[must_use]
pub fn find_leading_blogs(posts: &[Post], keyword: &str) -> Vec<LeadingBlog> {
    let needle = keyword.to_lowercase();
    let mut stats: BTreeMap<&str, (String, usize)> = BTreeMap::new();

    for post in posts {
        let haystack =
            format!("{} {}", post.title, strip_markup(&post.description)).to_lowercase();
        if !haystack.contains(&needle) {
            continue;
        }
        let entry = stats.entry(post.blog_name.as_str()).or_default();
        entry.1 += 1;
        if let Some(published) = post.published.as_deref() {
            if !published.is_empty() && (entry.0.is_empty() || published < entry.0.as_str()) {
                entry.0 = published.to_string();
            }
        }
    }

    let mut results: Vec<LeadingBlog> = stats
        .into_iter()
        .map(|(blog_name, (first_mention, mention_count))| LeadingBlog {
            blog_name: blog_name.to_string(),
            first_mention,
            mention_count,
        })
        .collect();
    results.sort_by(|a, b| {
        a.first_mention
            .is_empty()
            .cmp(&b.first_mention.is_empty())
            .then_with(|| a.first_mention.cmp(&b.first_mention))
            .then_with(|| a.blog_name.cmp(&b.blog_name))
    });
    results
}

/// Compare the most recent period against the mean of all prior
/// periods (zero-filled). Keywords with a zero historical baseline are
/// excluded outright: their acceleration is undefined, not infinite.
fn detect_emerging(
    periods: &BTreeMap<String, BTreeMap<String, f64>>,
) -> (Vec<EmergingTopic>, f64) {
    if periods.len() < 2 {
        return (Vec::new(), 0.0);
    }

    let keys: Vec<&String> = periods.keys().collect();
    let (historical_keys, recent_key) = keys.split_at(keys.len() - 1);
    let recent = &periods[recent_key[0]];

    let mut keywords: Vec<&String> = periods.values().flat_map(BTreeMap::keys).collect();
    keywords.sort();
    keywords.dedup();

    #[allow(clippy::cast_precision_loss)]
    let historical_len = historical_keys.len() as f64;

    let mut emerging = Vec::new();
    for keyword in keywords {
        let recent_score = recent.get(keyword).copied().unwrap_or(0.0);
        let historical_sum: f64 = historical_keys
            .iter()
            .map(|key| periods[*key].get(keyword).copied().unwrap_or(0.0))
            .sum();
        let historical_avg = historical_sum / historical_len;

        if historical_avg <= 0.0 || recent_score <= 0.0 {
            continue;
        }
        let acceleration = recent_score / historical_avg;
        if acceleration > MIN_ACCELERATION {
            emerging.push(EmergingTopic {
                keyword: keyword.clone(),
                recent_score,
                historical_avg,
                acceleration,
            });
        }
    }

    emerging.sort_by(|a, b| {
        b.acceleration
            .total_cmp(&a.acceleration)
            .then_with(|| a.keyword.cmp(&b.keyword))
    });
    let max_acceleration = emerging.first().map_or(0.0, |t| t.acceleration);
    (emerging, max_acceleration)
}

fn period_key(date: chrono::NaiveDate, period: Period) -> String {
    match period {
        Period::Month => format!("{:04}-{:02}", date.year(), date.month()),
        Period::Week => {
            let week = date.iso_week();
            format!("{:04}-W{:02}", week.year(), week.week())
        }
    }
}
