//! Idea label synthesis from member titles and the dominant pain type.

use std::collections::HashMap;

use painmine_core::{ScoredSignal, SignalType};

use crate::vectorizer::{filtered_tokens, Vectorizer};

/// Keyword budget for the label; Tier 2 tops the selection up to this.
const KEYWORD_TARGET: usize = 5;

/// Keywords actually substituted into the template.
const LABEL_KEYWORDS: usize = 2;

/// Build a short human-readable label for one idea.
///
/// `members` must already be sorted by descending impact;
/// `titles_by_url` maps post URLs to post titles.
#[must_use]
pub fn label_idea(
    members: &[ScoredSignal],
    titles_by_url: &HashMap<String, String>,
    vectorizer: &Vectorizer,
) -> String {
    let keywords = select_keywords(members, titles_by_url, vectorizer);
    let subject = keywords
        .iter()
        .take(LABEL_KEYWORDS)
        .map(|k| title_case(k))
        .collect::<Vec<_>>()
        .join(" ");
    let subject = if subject.is_empty() {
        fallback_subject(members, titles_by_url)
    } else {
        subject
    };

    match dominant_type(members) {
        SignalType::Wish => format!("Better {subject}"),
        SignalType::Frustration => format!("Improved {subject}"),
        SignalType::Gap => format!("{subject} Solution"),
        SignalType::Difficulty => format!("Simplified {subject}"),
        SignalType::Broken => format!("Reliable {subject}"),
        SignalType::Opportunity => format!("{subject} Platform"),
    }
}

/// Tier 1: tokens shared by at least two distinct member titles,
/// ordered by title count then first-seen. Tier 2: tokens from the
/// highest-impact member's title that exist in the shared vectorizer
/// vocabulary, in title order, until the target is met.
fn select_keywords(
    members: &[ScoredSignal],
    titles_by_url: &HashMap<String, String>,
    vectorizer: &Vectorizer,
) -> Vec<String> {
    let mut distinct: Vec<&str> = Vec::new();
    for member in members {
        if let Some(title) = titles_by_url.get(&member.signal.post_url) {
            if !distinct.contains(&title.as_str()) {
                distinct.push(title);
            }
        }
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();
    for title in &distinct {
        let mut in_this_title: Vec<String> = Vec::new();
        for token in filtered_tokens(title, true) {
            if in_this_title.contains(&token) {
                continue;
            }
            in_this_title.push(token.clone());
            let entry = counts.entry(token.clone()).or_insert(0);
            *entry += 1;
            if *entry == 1 {
                first_seen.push(token);
            }
        }
    }

    let mut keywords: Vec<String> = first_seen
        .iter()
        .filter(|t| counts[*t] >= 2)
        .cloned()
        .collect();
    keywords.sort_by(|a, b| counts[b].cmp(&counts[a]).then_with(|| {
        let pos = |t: &String| first_seen.iter().position(|x| x == t).unwrap_or(usize::MAX);
        pos(a).cmp(&pos(b))
    }));

    if keywords.len() < KEYWORD_TARGET {
        if let Some(top_title) = members
            .first()
            .and_then(|m| titles_by_url.get(&m.signal.post_url))
        {
            for token in filtered_tokens(top_title, true) {
                if keywords.len() >= KEYWORD_TARGET {
                    break;
                }
                if vectorizer.contains(&token) && !keywords.contains(&token) {
                    keywords.push(token);
                }
            }
        }
    }

    keywords
}

/// Most frequent signal type among members. Ties resolve to the type
/// that comes first in the fixed extraction order.
#[must_use]
pub fn dominant_type(members: &[ScoredSignal]) -> SignalType {
    let mut counts: HashMap<SignalType, usize> = HashMap::new();
    for member in members {
        *counts.entry(member.signal.signal_type).or_insert(0) += 1;
    }
    SignalType::ALL
        .iter()
        .copied()
        .max_by_key(|t| (counts.get(t).copied().unwrap_or(0), std::cmp::Reverse(position(*t))))
        .unwrap_or(SignalType::Wish)
}

fn position(signal_type: SignalType) -> usize {
    SignalType::ALL
        .iter()
        .position(|&t| t == signal_type)
        .unwrap_or(0)
}

fn fallback_subject(
    members: &[ScoredSignal],
    titles_by_url: &HashMap<String, String>,
) -> String {
    members
        .first()
        .and_then(|m| titles_by_url.get(&m.signal.post_url))
        .and_then(|title| filtered_tokens(title, true).into_iter().next())
        .map_or_else(|| "Niche".to_string(), |t| title_case(&t))
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "label_test.rs"]
mod tests;
