//! Composite impact scoring.
//!
//! `impact = 0.35·trend + 0.25·authority + 0.25·breadth + 0.15·recency`,
//! every component in `[0, 1]` and every normalizer guarded so that no
//! NaN or infinity can reach the output.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use painmine_core::{parse_iso_date, EmergingTopic, ScoredSignal};

pub const TREND_WEIGHT: f64 = 0.35;
pub const AUTHORITY_WEIGHT: f64 = 0.25;
pub const BREADTH_WEIGHT: f64 = 0.25;
pub const RECENCY_WEIGHT: f64 = 0.15;

/// Recency decay scale, in days.
const RECENCY_SCALE: f64 = 365.0;

/// Corpus-level inputs shared by every signal's score.
#[derive(Debug)]
pub struct ScoringContext<'a> {
    pub emerging: &'a [EmergingTopic],
    pub max_acceleration: f64,
    pub centrality: &'a BTreeMap<String, f64>,
    pub max_centrality: f64,
    pub today: NaiveDate,
}

/// Score one signal in place given its document token set and breadth.
pub fn score_signal(
    signal: &mut ScoredSignal,
    doc_tokens: &HashSet<String>,
    breadth: f64,
    ctx: &ScoringContext<'_>,
) {
    signal.trend = trend_component(doc_tokens, ctx.emerging, ctx.max_acceleration);
    signal.authority =
        authority_component(&signal.signal.blog_name, ctx.centrality, ctx.max_centrality);
    signal.breadth = breadth.clamp(0.0, 1.0);
    signal.recency = recency_component(signal.signal.published.as_deref(), ctx.today);
    signal.impact = impact(signal.trend, signal.authority, signal.breadth, signal.recency);
}

/// The fixed weighted sum.
#[must_use]
pub fn impact(trend: f64, authority: f64, breadth: f64, recency: f64) -> f64 {
    TREND_WEIGHT * trend
        + AUTHORITY_WEIGHT * authority
        + BREADTH_WEIGHT * breadth
        + RECENCY_WEIGHT * recency
}

/// Maximum acceleration among emerging keywords all of whose terms
/// occur in the signal document, normalized by the corpus-wide maximum.
/// 0 when nothing overlaps or when the normalizer is 0.
#[must_use]
pub fn trend_component(
    doc_tokens: &HashSet<String>,
    emerging: &[EmergingTopic],
    max_acceleration: f64,
) -> f64 {
    if max_acceleration <= 0.0 {
        return 0.0;
    }
    let best = emerging
        .iter()
        .filter(|topic| {
            topic
                .keyword
                .split_whitespace()
                .all(|term| doc_tokens.contains(term))
        })
        .map(|topic| topic.acceleration)
        .fold(0.0, f64::max);
    (best / max_acceleration).clamp(0.0, 1.0)
}

/// Centrality of the signal's blog over the corpus maximum. 0 for an
/// edgeless graph (normalizer 0 by convention).
#[must_use]
pub fn authority_component(
    blog_name: &str,
    centrality: &BTreeMap<String, f64>,
    max_centrality: f64,
) -> f64 {
    if max_centrality <= 0.0 {
        return 0.0;
    }
    let score = centrality.get(blog_name).copied().unwrap_or(0.0);
    (score / max_centrality).clamp(0.0, 1.0)
}

/// `exp(-days_since_published / 365)`, with days clamped at zero for
/// future-dated posts. Missing or unparseable dates score 0.0: kept in
/// the corpus but treated as very old.
#[must_use]
pub fn recency_component(published: Option<&str>, today: NaiveDate) -> f64 {
    let Some(date) = published.and_then(parse_iso_date) else {
        return 0.0;
    };
    #[allow(clippy::cast_precision_loss)]
    let days = (today - date).num_days().max(0) as f64;
    (-days / RECENCY_SCALE).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use painmine_core::{PainSignal, SignalLocation, SignalType};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn topic(keyword: &str, acceleration: f64) -> EmergingTopic {
        EmergingTopic {
            keyword: keyword.to_string(),
            recent_score: 0.5,
            historical_avg: 0.5 / acceleration,
            acceleration,
        }
    }

    fn tokens(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| (*w).to_string()).collect()
    }

    #[test]
    fn impact_is_the_exact_weighted_sum() {
        let value = impact(0.5, 0.4, 0.3, 0.2);
        assert!((value - (0.35 * 0.5 + 0.25 * 0.4 + 0.25 * 0.3 + 0.15 * 0.2)).abs() < 1e-9);
    }

    #[test]
    fn trend_picks_max_overlapping_acceleration() {
        let emerging = vec![topic("rust", 9.0), topic("wasm", 4.5), topic("zig", 45.0)];
        let doc = tokens(&["rust", "wasm", "tooling"]);
        let value = trend_component(&doc, &emerging, 45.0);
        assert!((value - 9.0 / 45.0).abs() < 1e-9);
    }

    #[test]
    fn trend_requires_every_term_of_a_bigram() {
        let emerging = vec![topic("machine learning", 10.0)];
        let partial = tokens(&["machine", "tooling"]);
        assert!(trend_component(&partial, &emerging, 10.0).abs() < f64::EPSILON);
        let full = tokens(&["machine", "learning"]);
        assert!((trend_component(&full, &emerging, 10.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn trend_is_zero_without_overlap_or_normalizer() {
        let emerging = vec![topic("rust", 9.0)];
        let doc = tokens(&["python"]);
        assert!(trend_component(&doc, &emerging, 9.0).abs() < f64::EPSILON);
        assert!(trend_component(&doc, &emerging, 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn authority_is_zero_for_edgeless_graph() {
        let centrality = BTreeMap::from([("Alpha".to_string(), 0.5)]);
        assert!(authority_component("Alpha", &centrality, 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn authority_normalizes_by_max() {
        let centrality = BTreeMap::from([
            ("Alpha".to_string(), 0.029_136),
            ("Beta".to_string(), 0.037_951),
        ]);
        let value = authority_component("Alpha", &centrality, 0.037_951);
        assert!((value - 0.029_136 / 0.037_951).abs() < 1e-9);
        assert!(authority_component("Unknown", &centrality, 0.037_951).abs() < f64::EPSILON);
    }

    #[test]
    fn recency_decays_exponentially() {
        let value = recency_component(Some("2024-05-27"), today());
        assert!((value - (-5.0 / 365.0_f64).exp()).abs() < 1e-9);
    }

    #[test]
    fn recency_handles_missing_and_future_dates() {
        assert!(recency_component(None, today()).abs() < f64::EPSILON);
        assert!(recency_component(Some("not a date"), today()).abs() < f64::EPSILON);
        let future = recency_component(Some("2024-07-01"), today());
        assert!((future - 1.0).abs() < 1e-9);
    }

    #[test]
    fn scenario_five_day_difficulty_signal() {
        // Shared keyword acceleration 4.41 against corpus max 45.03,
        // blog centrality 0.029136 of max 0.037951, breadth 3/46,
        // published 5 days ago.
        let emerging = vec![topic("deploy", 4.41)];
        let ctx = ScoringContext {
            emerging: &emerging,
            max_acceleration: 45.03,
            centrality: &BTreeMap::from([("Alpha".to_string(), 0.029_136)]),
            max_centrality: 0.037_951,
            today: today(),
        };
        let mut signal = ScoredSignal::unscored(PainSignal {
            post_url: "https://alpha.com/1".to_string(),
            blog_name: "Alpha".to_string(),
            published: Some("2024-05-27".to_string()),
            signal_type: SignalType::Difficulty,
            signal_text: "hard to deploy".to_string(),
            signal_context: String::new(),
            signal_location: SignalLocation::Midway,
        });
        score_signal(&mut signal, &tokens(&["deploy", "hard"]), 3.0 / 46.0, &ctx);
        assert!((signal.impact - 0.3905).abs() < 5e-5, "impact {}", signal.impact);
    }

    #[test]
    fn scenario_eighty_day_companion_signal() {
        let emerging = vec![topic("deploy", 4.41)];
        let ctx = ScoringContext {
            emerging: &emerging,
            max_acceleration: 45.03,
            centrality: &BTreeMap::from([("Beta".to_string(), 0.009_252)]),
            max_centrality: 0.037_951,
            today: today(),
        };
        let mut signal = ScoredSignal::unscored(PainSignal {
            post_url: "https://beta.com/1".to_string(),
            blog_name: "Beta".to_string(),
            published: Some("2024-03-13".to_string()),
            signal_type: SignalType::Difficulty,
            signal_text: "hard to deploy".to_string(),
            signal_context: String::new(),
            signal_location: SignalLocation::Midway,
        });
        score_signal(&mut signal, &tokens(&["deploy", "hard"]), 3.0 / 46.0, &ctx);
        assert!((signal.impact - 0.2320).abs() < 5e-5, "impact {}", signal.impact);
    }

    #[test]
    fn all_components_stay_in_unit_range() {
        let emerging = vec![topic("deploy", 50.0)];
        let ctx = ScoringContext {
            emerging: &emerging,
            max_acceleration: 50.0,
            centrality: &BTreeMap::from([("Alpha".to_string(), 1.0)]),
            max_centrality: 1.0,
            today: today(),
        };
        let mut signal = ScoredSignal::unscored(PainSignal {
            post_url: "u".to_string(),
            blog_name: "Alpha".to_string(),
            published: Some("2024-06-01".to_string()),
            signal_type: SignalType::Wish,
            signal_text: String::new(),
            signal_context: String::new(),
            signal_location: SignalLocation::Beginning,
        });
        score_signal(&mut signal, &tokens(&["deploy"]), 2.0, &ctx);
        for component in [
            signal.trend,
            signal.authority,
            signal.breadth,
            signal.recency,
            signal.impact,
        ] {
            assert!((0.0..=1.0).contains(&component), "out of range: {component}");
        }
    }
}
