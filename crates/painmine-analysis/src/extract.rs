//! Pain-signal extraction from post text.
//!
//! Each of the six pattern families is applied in a fixed order; every
//! match is reduced to its minimal enclosing sentence plus a short
//! context window. Per `(post_url, signal_type)` only the longest
//! qualifying match survives.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDate};
use painmine_core::{
    parse_iso_date, sentence_spans, strip_markup, PainSignal, Post, SignalLocation, SignalType,
};
use regex::Regex;

/// Matched sentences shorter than this carry too little context to be
/// meaningful and are skipped.
const MIN_SENTENCE_LEN: usize = 10;

struct PatternFamily {
    signal_type: SignalType,
    pattern: &'static str,
}

/// The six families, in extraction order.
const PATTERN_FAMILIES: [PatternFamily; 6] = [
    PatternFamily {
        signal_type: SignalType::Wish,
        pattern: r"(?i)\bi wish\b|\bif only\b|\bwould be (?:great|nice|awesome) if\b|\bwould love (?:to|a|an|it if)\b",
    },
    PatternFamily {
        signal_type: SignalType::Frustration,
        pattern: r"(?i)\bfrustrat(?:ing|ed|ion)\b|\bannoying\b|\bdrives me (?:crazy|nuts)\b|\bsick of\b|\btired of\b|\bhate (?:that|how|when)\b",
    },
    PatternFamily {
        signal_type: SignalType::Gap,
        pattern: r"(?i)\bthere(?:'s| is) no\b|\bno (?:good|easy|simple) way to\b|\black of\b|\bdoesn't exist\b|\bcouldn't find (?:a|any)\b|\bmissing\b",
    },
    PatternFamily {
        signal_type: SignalType::Difficulty,
        pattern: r"(?i)\b(?:hard|difficult|tricky|painful) to\b|\bstruggl(?:e|ed|ing) (?:to|with)\b|\btook (?:me )?(?:hours|days|weeks) to\b",
    },
    PatternFamily {
        signal_type: SignalType::Broken,
        pattern: r"(?i)\bbroken\b|\bdoesn't work\b|\bdoes not work\b|\bstopped working\b|\bkeeps? (?:failing|breaking|crashing)\b|\bbuggy\b",
    },
    PatternFamily {
        signal_type: SignalType::Opportunity,
        pattern: r"(?i)\bsomeone should (?:build|make|create)\b|\bopportunity\b|\buntapped\b|\bwould pay for\b|\bwide open\b",
    },
];

static COMPILED_FAMILIES: LazyLock<Vec<(SignalType, Regex)>> = LazyLock::new(|| {
    PATTERN_FAMILIES
        .iter()
        .map(|f| (f.signal_type, Regex::new(f.pattern).expect("valid regex")))
        .collect()
});

/// Extract the corpus-wide pain-signal set.
///
/// Posts with a parseable `published` date strictly older than
/// `today - max_age_days` contribute nothing; posts with missing or
/// unparseable dates are always kept.
#[must_use]
pub fn extract_signals(posts: &[Post], max_age_days: i64, today: NaiveDate) -> Vec<PainSignal> {
    let cutoff = today - Duration::days(max_age_days);
    let mut signals = Vec::new();

    for post in posts {
        if let Some(published) = post.published.as_deref() {
            match parse_iso_date(published) {
                Some(date) if date < cutoff => {
                    tracing::debug!(url = %post.url, %date, "post older than cutoff, skipped");
                    continue;
                }
                Some(_) => {}
                None => {
                    tracing::warn!(url = %post.url, published, "unparseable date, keeping post");
                }
            }
        }

        let full_text = format!("{}. {}", post.title, strip_markup(&post.description));
        let spans = sentence_spans(&full_text);

        for (signal_type, regex) in COMPILED_FAMILIES.iter() {
            let mut best: Option<PainSignal> = None;
            for m in regex.find_iter(&full_text) {
                let Some(signal) = signal_from_match(post, &full_text, &spans, *signal_type, m.start())
                else {
                    continue;
                };
                let longer = best
                    .as_ref()
                    .is_none_or(|b| signal.signal_text.len() > b.signal_text.len());
                if longer {
                    best = Some(signal);
                }
            }
            if let Some(signal) = best {
                signals.push(signal);
            }
        }
    }

    tracing::info!(posts = posts.len(), signals = signals.len(), "signal extraction done");
    signals
}

fn signal_from_match(
    post: &Post,
    full_text: &str,
    spans: &[(usize, usize)],
    signal_type: SignalType,
    match_start: usize,
) -> Option<PainSignal> {
    let sentence_idx = spans
        .iter()
        .position(|&(start, end)| match_start >= start && match_start < end)?;
    let (start, end) = spans[sentence_idx];
    let sentence = &full_text[start..end];
    if sentence.chars().count() < MIN_SENTENCE_LEN {
        return None;
    }

    let context_start = sentence_idx.saturating_sub(1);
    let context_end = (sentence_idx + 2).min(spans.len());
    let context = spans[context_start..context_end]
        .iter()
        .map(|&(s, e)| &full_text[s..e])
        .collect::<Vec<_>>()
        .join(". ");

    Some(PainSignal {
        post_url: post.url.clone(),
        blog_name: post.blog_name.clone(),
        published: post.published.clone(),
        signal_type,
        signal_text: sentence.to_string(),
        signal_context: context,
        signal_location: location_of(match_start, full_text.len()),
    })
}

fn location_of(offset: usize, total_len: usize) -> SignalLocation {
    if total_len == 0 {
        return SignalLocation::Beginning;
    }
    match offset * 3 / total_len {
        0 => SignalLocation::Beginning,
        1 => SignalLocation::Midway,
        _ => SignalLocation::End,
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
