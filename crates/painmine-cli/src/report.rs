//! Stdout views and report file rendering.
//!
//! Each idea's evidence is grouped by source post: one entry per post
//! with one pain-type bullet per signal, so a post that triggered two
//! pattern families shows up once, not twice.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use painmine_analysis::MiningOutcome;
use painmine_core::{parse_iso_date, Idea, Post, ScoredSignal};

/// Print a snapshot overview table.
pub fn print_status(posts: &[Post]) {
    let blogs: std::collections::HashSet<&str> =
        posts.iter().map(|p| p.blog_name.as_str()).collect();
    let mut dates: Vec<NaiveDate> = posts
        .iter()
        .filter_map(|p| p.published.as_deref().and_then(parse_iso_date))
        .collect();
    dates.sort_unstable();

    println!("{:<12}{}", "POSTS", posts.len());
    println!("{:<12}{}", "BLOGS", blogs.len());
    match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => println!("{:<12}{first} .. {last}", "DATES"),
        _ => println!("{:<12}none parseable", "DATES"),
    }
}

/// Print ranked ideas, emerging topics, and top blogs to stdout.
pub fn print_analysis(outcome: &MiningOutcome) {
    if outcome.ideas.is_empty() {
        println!("no ideas survived extraction and filtering");
    } else {
        println!("{:<4}{:<40}{:<9}{:<7}SIGNALS", "ID", "IDEA", "IMPACT", "BLOGS");
        for idea in &outcome.ideas {
            println!(
                "{:<4}{:<40}{:<9.4}{:<7}{}",
                idea.idea_id, idea.label, idea.impact_score, idea.blog_count, idea.signal_count
            );
        }
    }

    println!();
    if outcome.trends.emerging.is_empty() {
        println!("no emerging topics");
    } else {
        println!("{:<24}{:<9}RECENT", "EMERGING TOPIC", "ACCEL");
        for topic in outcome.trends.emerging.iter().take(10) {
            println!(
                "{:<24}{:<9.2}{:.4}",
                topic.keyword, topic.acceleration, topic.recent_score
            );
        }
    }

    println!();
    if outcome.authority.edges.is_empty() {
        println!("no citation data");
    } else {
        let mut ranked: Vec<(&String, &f64)> = outcome.authority.centrality.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));
        println!("{:<30}CENTRALITY", "BLOG");
        for (name, score) in ranked.iter().take(10) {
            println!("{name:<30}{score:.6}");
        }
    }
}

/// Write the markdown/JSON report set (`summary.md`, `ideas.md` +
/// `ideas.json`, `trends.md` + `trends.json`, `network.md` +
/// `network.json`) into `output_dir`, creating it if needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a file
/// cannot be written.
pub fn write_reports(
    outcome: &MiningOutcome,
    output_dir: &Path,
    today: NaiveDate,
) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating report directory {}", output_dir.display()))?;

    let (nodes, distinct_edges, density) = graph_stats(outcome);
    let files = [
        ("summary.md", render_summary(outcome, today)),
        ("ideas.md", render_ideas(outcome, today)),
        (
            "ideas.json",
            serde_json::to_string_pretty(&serde_json::json!({
                "generated": today.to_string(),
                "stats": outcome.stats,
                "ideas": outcome.ideas,
            }))?,
        ),
        ("trends.md", render_trends(outcome, today)),
        (
            "trends.json",
            serde_json::to_string_pretty(&serde_json::json!({
                "periods": outcome.trends.periods,
                "emerging_topics": outcome.trends.emerging,
                "max_acceleration": outcome.trends.max_acceleration,
                "leading_blogs": outcome.trends.leading_blogs,
            }))?,
        ),
        ("network.md", render_network(outcome, today)),
        (
            "network.json",
            serde_json::to_string_pretty(&serde_json::json!({
                "graph_stats": {
                    "nodes": nodes,
                    "edges": distinct_edges,
                    "citations": outcome.authority.edges.len(),
                    "density": density,
                },
                "centrality": outcome.authority.centrality,
            }))?,
        ),
    ];

    let mut paths = Vec::with_capacity(files.len());
    for (name, content) in files {
        let path = output_dir.join(name);
        std::fs::write(&path, content)
            .with_context(|| format!("writing report {}", path.display()))?;
        paths.push(path);
    }
    Ok(paths)
}

/// Node count, distinct directed edge count, and graph density.
fn graph_stats(outcome: &MiningOutcome) -> (usize, usize, f64) {
    let nodes = outcome.authority.centrality.len();
    let pairs: std::collections::HashSet<(&str, &str)> = outcome
        .authority
        .edges
        .iter()
        .map(|e| (e.source_blog.as_str(), e.target_blog.as_str()))
        .collect();
    #[allow(clippy::cast_precision_loss)]
    let density = if nodes > 1 {
        pairs.len() as f64 / (nodes * (nodes - 1)) as f64
    } else {
        0.0
    };
    (nodes, pairs.len(), density)
}

fn render_trends(outcome: &MiningOutcome, today: NaiveDate) -> String {
    let mut out = String::new();
    out.push_str("# Trend Analysis\n\n");
    out.push_str(&format!("Generated: {today}\n\n"));

    out.push_str("## Emerging Topics\n\n");
    if outcome.trends.emerging.is_empty() {
        out.push_str("No emerging topics.\n\n");
    } else {
        push_emerging_table(&mut out, outcome);
    }

    out.push_str("## Leading Blogs\n\n");
    if outcome.trends.leading_blogs.is_empty() {
        out.push_str("No leading blog data.\n");
    } else {
        for (keyword, blogs) in &outcome.trends.leading_blogs {
            out.push_str(&format!("### {keyword}\n\n"));
            for blog in blogs {
                let first = if blog.first_mention.is_empty() {
                    "undated"
                } else {
                    blog.first_mention.as_str()
                };
                out.push_str(&format!(
                    "- {} — first {first}, {} mention{}\n",
                    blog.blog_name,
                    blog.mention_count,
                    if blog.mention_count == 1 { "" } else { "s" }
                ));
            }
            out.push('\n');
        }
    }
    out
}

fn render_network(outcome: &MiningOutcome, today: NaiveDate) -> String {
    let (nodes, distinct_edges, density) = graph_stats(outcome);
    let mut out = String::new();
    out.push_str("# Network Analysis\n\n");
    out.push_str(&format!("Generated: {today}\n\n"));

    out.push_str("## Graph\n\n");
    out.push_str(&format!("- Nodes (blogs): {nodes}\n"));
    out.push_str(&format!("- Edges: {distinct_edges}\n"));
    out.push_str(&format!(
        "- Citations: {}\n",
        outcome.authority.edges.len()
    ));
    out.push_str(&format!("- Density: {density:.4}\n\n"));

    out.push_str("## PageRank Centrality\n\n");
    if outcome.authority.centrality.is_empty() {
        out.push_str("No centrality data.\n");
    } else {
        let mut ranked: Vec<(&String, &f64)> = outcome.authority.centrality.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (name, score) in ranked {
            out.push_str(&format!("- {name}: {score:.6}\n"));
        }
    }
    out
}

/// Evidence for one idea, grouped by source post in member order.
fn group_by_post(idea: &Idea) -> Vec<(&str, Vec<&ScoredSignal>)> {
    let mut groups: Vec<(&str, Vec<&ScoredSignal>)> = Vec::new();
    for member in &idea.members {
        let url = member.signal.post_url.as_str();
        match groups.iter_mut().find(|(u, _)| *u == url) {
            Some((_, members)) => members.push(member),
            None => groups.push((url, vec![member])),
        }
    }
    groups
}

fn render_summary(outcome: &MiningOutcome, today: NaiveDate) -> String {
    let mut out = String::new();
    out.push_str("# Pain Mining Summary\n\n");
    out.push_str(&format!("Generated: {today}\n\n"));

    out.push_str("## Dataset Overview\n\n");
    out.push_str(&format!("- Posts: {}\n", outcome.stats.posts));
    out.push_str(&format!("- Blogs: {}\n", outcome.stats.blogs));
    out.push_str(&format!("- Pain signals: {}\n", outcome.stats.signals));
    out.push_str(&format!(
        "- Blogs with signals: {}\n",
        outcome.stats.signal_blogs
    ));
    out.push_str(&format!(
        "- Citation edges: {}\n\n",
        outcome.stats.citation_edges
    ));

    out.push_str("## Emerging Topics\n\n");
    if outcome.trends.emerging.is_empty() {
        out.push_str("No emerging topics.\n\n");
    } else {
        push_emerging_table(&mut out, outcome);
    }

    out.push_str("## Top Blogs by Centrality\n\n");
    if outcome.authority.edges.is_empty() {
        out.push_str("No citation data.\n\n");
    } else {
        let mut ranked: Vec<(&String, &f64)> = outcome.authority.centrality.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (name, score) in ranked.iter().take(10) {
            out.push_str(&format!("- {name}: {score:.6}\n"));
        }
        out.push('\n');
    }

    out.push_str("## Ideas\n\n");
    if outcome.ideas.is_empty() {
        out.push_str("No ideas survived filtering.\n");
    } else {
        for idea in &outcome.ideas {
            out.push_str(&format!(
                "{}. **{}** — impact {:.4}, {} blogs, {} signals\n",
                idea.idea_id + 1,
                idea.label,
                idea.impact_score,
                idea.blog_count,
                idea.signal_count
            ));
        }
    }
    out
}

fn push_emerging_table(out: &mut String, outcome: &MiningOutcome) {
    out.push_str("| Keyword | Acceleration | Recent | Baseline |\n");
    out.push_str("|---------|--------------|--------|----------|\n");
    for topic in outcome.trends.emerging.iter().take(15) {
        out.push_str(&format!(
            "| {} | {:.2} | {:.4} | {:.4} |\n",
            topic.keyword, topic.acceleration, topic.recent_score, topic.historical_avg
        ));
    }
    out.push('\n');
}

fn render_ideas(outcome: &MiningOutcome, today: NaiveDate) -> String {
    let mut out = String::new();
    out.push_str("# Project Ideas\n\n");
    out.push_str(&format!("Generated: {today}\n\n"));

    if outcome.ideas.is_empty() {
        out.push_str("No ideas survived filtering.\n");
        return out;
    }

    for idea in &outcome.ideas {
        out.push_str(&format!(
            "## {}. {}\n\n",
            idea.idea_id + 1,
            idea.label
        ));
        out.push_str(&format!(
            "Impact {:.4} | {} blogs | {} signals\n\n",
            idea.impact_score, idea.blog_count, idea.signal_count
        ));

        for (url, members) in group_by_post(idea) {
            let first = members[0];
            out.push_str(&format!(
                "- **{}** — [{}]({url})\n",
                first.signal.blog_name,
                first.signal.published.as_deref().unwrap_or("undated"),
            ));
            for member in members {
                out.push_str(&format!(
                    "  - *{}* ({}): \"{}\"\n",
                    member.signal.signal_type,
                    member.signal.signal_location,
                    member.signal.signal_text
                ));
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use painmine_analysis::mine_ideas;
    use painmine_core::{MiningConfig, Post};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn make_post(id: i64, blog: &str, title: &str, description: &str) -> Post {
        Post {
            id,
            blog_id: id,
            blog_name: blog.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            url: format!("https://{}.example.com/{id}", blog.to_lowercase()),
            published: Some("2024-05-20".to_string()),
            author: String::new(),
        }
    }

    fn outcome() -> MiningOutcome {
        let posts = vec![
            make_post(
                1,
                "Alpha",
                "Kubernetes deploy pain",
                "I wish kubernetes deploys were calmer. The deploy tooling is broken on Fridays.",
            ),
            make_post(
                2,
                "Beta",
                "Kubernetes deploy woes",
                "It is hard to deploy kubernetes clusters without downtime.",
            ),
        ];
        mine_ideas(&posts, &MiningConfig::default(), today())
    }

    #[test]
    fn evidence_is_grouped_by_source_post() {
        let outcome = outcome();
        let idea = &outcome.ideas[0];
        // Post 1 produced two signals (wish + broken); it must appear
        // as one source entry with two bullets.
        let groups = group_by_post(idea);
        let alpha = groups
            .iter()
            .find(|(url, _)| url.contains("alpha"))
            .unwrap();
        assert_eq!(alpha.1.len(), 2);

        let rendered = render_ideas(&outcome, today());
        let alpha_mentions = rendered.matches("**Alpha**").count();
        assert_eq!(alpha_mentions, 1);
        assert!(rendered.contains("*wish*"));
        assert!(rendered.contains("*broken*"));
    }

    #[test]
    fn summary_covers_all_sections() {
        let rendered = render_summary(&outcome(), today());
        assert!(rendered.contains("Dataset Overview"));
        assert!(rendered.contains("Emerging Topics"));
        assert!(rendered.contains("Top Blogs by Centrality"));
        assert!(rendered.contains("## Ideas"));
    }

    #[test]
    fn empty_outcome_renders_placeholders() {
        let empty = mine_ideas(&[], &MiningConfig::default(), today());
        let summary = render_summary(&empty, today());
        assert!(summary.contains("No emerging topics."));
        assert!(summary.contains("No citation data."));
        assert!(summary.contains("No ideas survived filtering."));
        let ideas = render_ideas(&empty, today());
        assert!(ideas.contains("No ideas survived filtering."));
        let trends = render_trends(&empty, today());
        assert!(trends.contains("No emerging topics."));
        assert!(trends.contains("No leading blog data."));
        let network = render_network(&empty, today());
        assert!(network.contains("No centrality data."));
    }

    #[test]
    fn trends_markdown_lists_leading_blogs() {
        let mut outcome = outcome();
        outcome.trends.emerging.push(painmine_core::EmergingTopic {
            keyword: "kubernetes".to_string(),
            recent_score: 0.5,
            historical_avg: 0.1,
            acceleration: 5.0,
        });
        outcome.trends.leading_blogs.insert(
            "kubernetes".to_string(),
            vec![
                painmine_analysis::LeadingBlog {
                    blog_name: "Alpha".to_string(),
                    first_mention: "2024-05-20".to_string(),
                    mention_count: 2,
                },
                painmine_analysis::LeadingBlog {
                    blog_name: "Beta".to_string(),
                    first_mention: String::new(),
                    mention_count: 1,
                },
            ],
        );
        let rendered = render_trends(&outcome, today());
        assert!(rendered.contains("# Trend Analysis"));
        assert!(rendered.contains("### kubernetes"));
        assert!(rendered.contains("- Alpha — first 2024-05-20, 2 mentions"));
        assert!(rendered.contains("- Beta — first undated, 1 mention\n"));
    }

    #[test]
    fn network_markdown_covers_graph_and_centrality() {
        let rendered = render_network(&outcome(), today());
        assert!(rendered.contains("# Network Analysis"));
        assert!(rendered.contains("- Nodes (blogs): 2"));
        assert!(rendered.contains("PageRank Centrality"));
        assert!(rendered.contains("- Alpha:"));
        assert!(rendered.contains("- Beta:"));
    }

    #[test]
    fn write_reports_creates_the_full_report_set() {
        let dir = std::env::temp_dir().join("painmine-report-test");
        let _ = std::fs::remove_dir_all(&dir);
        let paths = write_reports(&outcome(), &dir, today()).unwrap();
        assert_eq!(paths.len(), 7);
        for path in &paths {
            assert!(path.exists(), "missing {}", path.display());
        }
        for name in ["trends.md", "trends.json", "network.md", "network.json"] {
            assert!(dir.join(name).exists(), "missing {name}");
        }
        let ideas_json = std::fs::read_to_string(dir.join("ideas.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&ideas_json).unwrap();
        assert!(value["ideas"].is_array());
        assert_eq!(value["generated"], "2024-06-01");

        let trends_json = std::fs::read_to_string(dir.join("trends.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&trends_json).unwrap();
        assert!(value["leading_blogs"].is_object());

        let network_json = std::fs::read_to_string(dir.join("network.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&network_json).unwrap();
        assert_eq!(value["graph_stats"]["nodes"], 2);
        assert!(value["graph_stats"]["density"].is_number());
    }

    #[test]
    fn ideas_json_roundtrips_into_idea_records() {
        let outcome = outcome();
        let raw = serde_json::to_string(&outcome.ideas).unwrap();
        let parsed: Vec<painmine_core::Idea> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), outcome.ideas.len());
        assert_eq!(parsed[0].label, outcome.ideas[0].label);
    }
}
