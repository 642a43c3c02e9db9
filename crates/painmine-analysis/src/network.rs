//! Cross-blog citation extraction and centrality scoring.
//!
//! Citations are read from the RAW post descriptions, before markup
//! stripping, because hyperlinks live in the markup. Centrality is
//! weighted PageRank over the resulting directed multigraph.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use painmine_core::{CitationEdge, Post};
use regex::Regex;

const DAMPING: f64 = 0.85;
const MAX_ITERATIONS: usize = 100;
const CONVERGENCE_TOL: f64 = 1e-8;

static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)href=["']([^"']+)["']"#).expect("valid regex"));

/// Citation edges plus per-blog centrality.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct AuthorityReport {
    pub edges: Vec<CitationEdge>,
    /// Blog name -> PageRank score. Every blog in the corpus has an
    /// entry; blogs nobody links to keep the teleport-only score.
    pub centrality: BTreeMap<String, f64>,
    /// The authority normalizer. 0.0 when the graph has no edges at
    /// all, which zeroes the authority component for every signal.
    pub max_centrality: f64,
}

/// Extract citations and compute per-blog centrality.
#[must_use]
pub fn score_authority(posts: &[Post]) -> AuthorityReport {
    let mut blog_names: Vec<&str> = posts.iter().map(|p| p.blog_name.as_str()).collect();
    blog_names.sort_unstable();
    blog_names.dedup();
    let blog_index: HashMap<&str, usize> = blog_names
        .iter()
        .enumerate()
        .map(|(i, &name)| (name, i))
        .collect();

    // Each blog is known by the host of its own post URLs.
    let mut domain_map: HashMap<String, &str> = HashMap::new();
    for post in posts {
        if let Some(host) = host_of(&post.url) {
            domain_map.entry(host).or_insert(post.blog_name.as_str());
        }
    }

    let edges = extract_citations(posts, &domain_map);

    let n = blog_names.len();
    let mut weights: HashMap<(usize, usize), f64> = HashMap::new();
    for edge in &edges {
        let (Some(&source), Some(&target)) = (
            blog_index.get(edge.source_blog.as_str()),
            blog_index.get(edge.target_blog.as_str()),
        ) else {
            continue;
        };
        *weights.entry((source, target)).or_insert(0.0) += 1.0;
    }

    let mut out_edges: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
    for (&(source, target), &weight) in &weights {
        out_edges[source].push((target, weight));
    }
    for list in &mut out_edges {
        list.sort_by_key(|&(target, _)| target);
    }

    let ranks = pagerank(n, &out_edges);
    let centrality: BTreeMap<String, f64> = blog_names
        .iter()
        .zip(&ranks)
        .map(|(&name, &rank)| (name.to_string(), rank))
        .collect();
    let max_centrality = if edges.is_empty() {
        0.0
    } else {
        ranks.iter().copied().fold(0.0, f64::max)
    };

    tracing::info!(
        blogs = n,
        edges = edges.len(),
        max_centrality,
        "authority scoring done"
    );

    AuthorityReport {
        edges,
        centrality,
        max_centrality,
    }
}

/// One edge per matched outbound link; self-citations are skipped.
fn extract_citations(posts: &[Post], domain_map: &HashMap<String, &str>) -> Vec<CitationEdge> {
    let mut edges = Vec::new();
    for post in posts {
        for capture in HREF_RE.captures_iter(&post.description) {
            let Some(host) = host_of(&capture[1]) else {
                continue;
            };
            let Some(&target_blog) = domain_map.get(&host) else {
                continue;
            };
            if target_blog == post.blog_name {
                continue;
            }
            edges.push(CitationEdge {
                source_blog: post.blog_name.clone(),
                target_blog: target_blog.to_string(),
                source_post_url: post.url.clone(),
            });
        }
    }
    edges
}

/// Normalized host of a URL: lowercase, `www.` stripped. `None` for
/// relative links and anything without a plausible host.
fn host_of(url: &str) -> Option<String> {
    let rest = url.split_once("://").map_or(url.strip_prefix("//").unwrap_or(url), |(_, r)| r);
    let authority = rest.split(['/', '?', '#']).next()?;
    let host = authority.rsplit('@').next()?.split(':').next()?;
    if host.is_empty() || !host.contains('.') {
        return None;
    }
    let host = host.to_lowercase();
    Some(host.strip_prefix("www.").unwrap_or(&host).to_string())
}

/// Standard iterative random-surfer centrality: damping 0.85, uniform
/// teleport, dangling mass redistributed uniformly, stopping on L1
/// change below tolerance or the iteration cap, whichever first.
fn pagerank(n: usize, out_edges: &[Vec<(usize, f64)>]) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    #[allow(clippy::cast_precision_loss)]
    let n_f = n as f64;
    let out_weight: Vec<f64> = out_edges
        .iter()
        .map(|list| list.iter().map(|&(_, w)| w).sum())
        .collect();

    let mut ranks = vec![1.0 / n_f; n];
    for _ in 0..MAX_ITERATIONS {
        let dangling: f64 = (0..n)
            .filter(|&u| out_weight[u] == 0.0)
            .map(|u| ranks[u])
            .sum();
        let base = (1.0 - DAMPING) / n_f + DAMPING * dangling / n_f;

        let mut next = vec![base; n];
        for (u, list) in out_edges.iter().enumerate() {
            if out_weight[u] == 0.0 {
                continue;
            }
            let share = DAMPING * ranks[u] / out_weight[u];
            for &(v, w) in list {
                next[v] += share * w;
            }
        }

        let delta: f64 = ranks
            .iter()
            .zip(&next)
            .map(|(old, new)| (old - new).abs())
            .sum();
        ranks = next;
        if delta < CONVERGENCE_TOL {
            break;
        }
    }
    ranks
}
