//! Post snapshot loading.
//!
//! The ingestion side hands the pipeline a consistent snapshot as a
//! JSON array of posts; this is the program's only fatal error path.

use std::path::Path;

use anyhow::Context;
use painmine_core::Post;

/// Load a JSON post snapshot from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_posts(path: &Path) -> anyhow::Result<Vec<Post>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading post snapshot {}", path.display()))?;
    let posts: Vec<Post> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing post snapshot {}", path.display()))?;
    tracing::info!(posts = posts.len(), path = %path.display(), "snapshot loaded");
    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_a_valid_snapshot() {
        let dir = std::env::temp_dir().join("painmine-snapshot-ok");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("posts.json");
        std::fs::write(
            &path,
            r#"[{"id": 1, "blog_id": 1, "blog_name": "Alpha", "title": "T",
                "description": "D", "url": "https://alpha.com/1",
                "published": "2024-01-01", "author": "A"}]"#,
        )
        .unwrap();
        let posts = load_posts(&path).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].blog_name, "Alpha");
    }

    #[test]
    fn missing_file_is_an_error_with_context() {
        let err = load_posts(Path::new("/nonexistent/posts.json")).unwrap_err();
        assert!(err.to_string().contains("reading post snapshot"));
    }

    #[test]
    fn malformed_json_is_an_error_with_context() {
        let dir = std::env::temp_dir().join("painmine-snapshot-bad");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("posts.json");
        std::fs::write(&path, "not json").unwrap();
        let err = load_posts(&path).unwrap_err();
        assert!(err.to_string().contains("parsing post snapshot"));
    }
}
