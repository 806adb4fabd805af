use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::post::Post;

pub const DEFAULT_STORE: &str = "aita_posts.json";

pub fn load_posts(path: &Path) -> anyhow::Result<Vec<Post>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let data = fs::read_to_string(path)?;
    let posts: Vec<Post> = serde_json::from_str(&data)?;
    Ok(posts)
}

fn save_posts(path: &Path, posts: &[Post]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(posts)?;
    fs::write(path, data)?;
    Ok(())
}

/// Merge `candidates` into the collection at `path` and return the ones not
/// seen before, in their original order. Existing records are kept as they
/// are, even when a candidate with the same id carries newer data.
pub fn save_new_posts(path: &Path, candidates: Vec<Post>) -> anyhow::Result<Vec<Post>> {
    let mut all_posts = load_posts(path)?;
    let mut seen: HashSet<String> = all_posts.iter().map(|p| p.id.clone()).collect();

    let mut new_posts = Vec::new();
    for post in candidates {
        if seen.insert(post.id.clone()) {
            new_posts.push(post);
        } else {
            debug!("Already stored: {}", post.id);
        }
    }

    all_posts.extend(new_posts.iter().cloned());
    save_posts(path, &all_posts)?;
    info!(
        "Stored {} new posts in {} ({} total)",
        new_posts.len(),
        path.display(),
        all_posts.len()
    );
    Ok(new_posts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn post(id: &str, title: &str) -> Post {
        Post {
            id: id.into(),
            title: title.into(),
            text: format!("text of {id}"),
            score: 10,
            url: format!("https://reddit.com/r/AmITheAsshole/comments/{id}/"),
            created_utc: 1_700_000_000.0,
            num_comments: 3,
        }
    }

    fn ids(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        assert!(load_posts(&dir.path().join("nope.json")).unwrap().is_empty());
    }

    #[test]
    fn only_unseen_posts_are_returned_and_appended() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join(DEFAULT_STORE);
        save_new_posts(&store, vec![post("A", "a"), post("B", "b")]).unwrap();

        let new_posts = save_new_posts(&store, vec![post("B", "b"), post("C", "c")]).unwrap();

        assert_eq!(ids(&new_posts), ["C"]);
        assert_eq!(ids(&load_posts(&store).unwrap()), ["A", "B", "C"]);
    }

    #[test]
    fn saving_twice_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join(DEFAULT_STORE);
        let batch = vec![post("A", "a"), post("B", "b")];

        save_new_posts(&store, batch.clone()).unwrap();
        let once = fs::read_to_string(&store).unwrap();
        let second = save_new_posts(&store, batch).unwrap();
        let twice = fs::read_to_string(&store).unwrap();

        assert!(second.is_empty());
        assert_eq!(once, twice);
        assert_eq!(load_posts(&store).unwrap().len(), 2);
    }

    #[test]
    fn stored_records_are_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join(DEFAULT_STORE);
        save_new_posts(&store, vec![post("A", "original")]).unwrap();
        save_new_posts(&store, vec![post("A", "edited upstream")]).unwrap();

        let stored = load_posts(&store).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, "original");
    }

    #[test]
    fn duplicate_candidates_collapse_to_first() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join(DEFAULT_STORE);
        let new_posts =
            save_new_posts(&store, vec![post("A", "first"), post("A", "second")]).unwrap();
        assert_eq!(new_posts.len(), 1);
        assert_eq!(new_posts[0].title, "first");
    }

    #[test]
    fn corrupt_store_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join(DEFAULT_STORE);
        fs::write(&store, "{not json").unwrap();
        assert!(save_new_posts(&store, vec![post("A", "a")]).is_err());
        assert_eq!(fs::read_to_string(&store).unwrap(), "{not json");
    }

    #[test]
    fn store_uses_reddit_field_names() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join("nested").join(DEFAULT_STORE);
        save_new_posts(&store, vec![post("A", "a")]).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&store).unwrap()).unwrap();
        assert_eq!(raw[0]["id"], "A");
        assert_eq!(raw[0]["num_comments"], 3);
        assert_eq!(raw[0]["url"], "https://reddit.com/r/AmITheAsshole/comments/A/");
    }
}
