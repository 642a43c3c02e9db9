//! TF-IDF vectorization over signal and post documents.
//!
//! Rows use smoothed IDF and are L2-normalized, matching the behavior
//! the rest of the pipeline was calibrated against. Vectors are sparse
//! `(term_index, weight)` pairs sorted by term index.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

/// General-language stop words, applied to every document.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "all", "also", "and", "any", "are", "aren",
    "because", "been", "before", "being", "below", "between", "both", "but", "can", "cannot",
    "could", "couldn", "did", "didn", "does", "doesn", "doing", "don", "down", "during", "each",
    "few", "for", "from", "further", "get", "got", "had", "hadn", "has", "hasn", "have", "haven",
    "having", "her", "here", "hers", "herself", "him", "himself", "his", "how", "into", "isn",
    "its", "itself", "just", "let", "like", "made", "make", "many", "more", "most", "much",
    "mustn", "myself", "new", "nor", "not", "now", "off", "once", "one", "only", "other", "our",
    "ours", "ourselves", "out", "over", "own", "same", "shan", "she", "should", "shouldn", "some",
    "still", "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "there", "these", "they", "this", "those", "through", "too", "under", "until", "use", "used",
    "using", "very", "was", "wasn", "were", "weren", "what", "when", "where", "which", "while",
    "who", "whom", "why", "will", "with", "won", "would", "wouldn", "you", "your", "yours",
    "yourself", "yourselves",
];

/// Pain-expression vocabulary filtered out of signal documents so that
/// signals do not cluster merely because they share trigger phrasing.
pub const PAIN_STOPWORDS: &[&str] = &[
    "annoyed", "annoying", "break", "breaking", "breaks", "broke", "broken", "bug", "buggy",
    "crash", "crashed", "crashes", "crashing", "difficult", "difficulty", "exist", "fail",
    "failed", "failing", "fails", "find", "frustrated", "frustrating", "frustration", "hard",
    "hate", "hours", "lack", "lacking", "love", "missing", "need", "needs", "nice", "opportunity",
    "pay", "painful", "really", "should", "sick", "simple", "someone", "something", "stopped",
    "struggle", "struggled", "struggling", "stuff", "thing", "things", "tired", "took", "tricky",
    "untapped", "way", "ways", "wide", "wish", "wished", "wishes", "wishing", "work", "worked",
    "working", "works",
];

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-zA-Z][a-zA-Z0-9]{2,}\b").expect("valid regex"));

static ENGLISH_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ENGLISH_STOPWORDS.iter().copied().collect());

static PAIN_SET: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ENGLISH_STOPWORDS
        .iter()
        .chain(PAIN_STOPWORDS.iter())
        .copied()
        .collect()
});

/// Sparse TF-IDF row: `(term_index, weight)` sorted by term index.
pub type SparseVec = Vec<(usize, f64)>;

/// Vectorization parameters. See `fit_transform` for how `min_df` and
/// `max_df_ratio` interact with corpus size.
#[derive(Debug, Clone)]
pub struct VectorizerOptions {
    pub max_features: usize,
    pub min_df: usize,
    pub max_df_ratio: f64,
    /// When set, the pain vocabulary is unioned into the stop-word set.
    pub filter_pain_vocabulary: bool,
}

impl VectorizerOptions {
    /// Parameters for the shared signal vectorizer: `min_df` 2 (1 for a
    /// corpus of fewer than 2 documents), `max_df` 80%, pain vocabulary
    /// filtered.
    #[must_use]
    pub fn for_signals(max_features: usize, n_docs: usize) -> Self {
        VectorizerOptions {
            max_features,
            min_df: if n_docs < 2 { 1 } else { 2 },
            max_df_ratio: 0.8,
            filter_pain_vocabulary: true,
        }
    }

    /// Parameters for the trend keyword vectorizer, fit over whole
    /// posts rather than signals.
    #[must_use]
    pub fn for_posts(n_docs: usize) -> Self {
        VectorizerOptions {
            max_features: 500,
            min_df: n_docs.min(3).max(1),
            max_df_ratio: 0.7,
            filter_pain_vocabulary: false,
        }
    }
}

/// A fitted vocabulary with per-term inverse document frequencies.
#[derive(Debug, Clone)]
pub struct Vectorizer {
    vocabulary: Vec<String>,
    index: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl Vectorizer {
    /// Fit a vocabulary over `documents` and transform them in one pass.
    ///
    /// Terms are 1- and 2-grams over stop-word-filtered tokens. Terms
    /// outside `[min_df, max_df_ratio * n_docs]` are dropped; when more
    /// than `max_features` survive, the highest corpus counts win, with
    /// an alphabetical tie-break for determinism.
    #[must_use]
    pub fn fit_transform(documents: &[String], options: &VectorizerOptions) -> (Self, Vec<SparseVec>) {
        let token_lists: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| ngram_terms(doc, options.filter_pain_vocabulary))
            .collect();

        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        let mut term_count: HashMap<&str, u64> = HashMap::new();
        for terms in &token_lists {
            let mut seen: HashSet<&str> = HashSet::new();
            for term in terms {
                *term_count.entry(term).or_insert(0) += 1;
                if seen.insert(term) {
                    *doc_freq.entry(term).or_insert(0) += 1;
                }
            }
        }

        let n_docs = documents.len();
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let max_df = (options.max_df_ratio * n_docs as f64).floor() as usize;
        let max_df = max_df.max(options.min_df);

        let mut candidates: Vec<(&str, u64)> = doc_freq
            .iter()
            .filter(|&(_, &df)| df >= options.min_df && df <= max_df)
            .map(|(&term, _)| (term, term_count[term]))
            .collect();
        candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        candidates.truncate(options.max_features);

        let mut vocabulary: Vec<String> = candidates.iter().map(|&(t, _)| t.to_string()).collect();
        vocabulary.sort();
        let index: HashMap<String, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();

        #[allow(clippy::cast_precision_loss)]
        let idf: Vec<f64> = vocabulary
            .iter()
            .map(|term| {
                let df = doc_freq.get(term.as_str()).copied().unwrap_or(0);
                ((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0
            })
            .collect();

        let vectorizer = Vectorizer {
            vocabulary,
            index,
            idf,
        };
        let rows = token_lists
            .iter()
            .map(|terms| vectorizer.transform_terms(terms))
            .collect();
        (vectorizer, rows)
    }

    fn transform_terms(&self, terms: &[String]) -> SparseVec {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in terms {
            if let Some(&idx) = self.index.get(term.as_str()) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut row: SparseVec = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx]))
            .collect();
        row.sort_by_key(|&(idx, _)| idx);

        let norm = row.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for entry in &mut row {
                entry.1 /= norm;
            }
        }
        row
    }

    #[must_use]
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    #[must_use]
    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }
}

/// Lowercased tokens of `text` matching the token rule (length >= 3,
/// leading letter), before any stop-word filtering.
#[must_use]
pub fn raw_tokens(text: &str) -> Vec<String> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Stop-word-filtered tokens of `text`.
#[must_use]
pub fn filtered_tokens(text: &str, filter_pain_vocabulary: bool) -> Vec<String> {
    let stopwords: &HashSet<&str> = if filter_pain_vocabulary {
        &PAIN_SET
    } else {
        &ENGLISH_SET
    };
    raw_tokens(text)
        .into_iter()
        .filter(|t| !stopwords.contains(t.as_str()))
        .collect()
}

/// 1- and 2-gram terms over the filtered token stream. Bigrams join
/// adjacent surviving tokens with a single space.
fn ngram_terms(text: &str, filter_pain_vocabulary: bool) -> Vec<String> {
    let tokens = filtered_tokens(text, filter_pain_vocabulary);
    let mut terms = tokens.clone();
    for pair in tokens.windows(2) {
        terms.push(format!("{} {}", pair[0], pair[1]));
    }
    terms
}
