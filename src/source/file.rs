use std::io::BufRead;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Post;

/// Read posts from `path`.
///
/// `.json` files hold an array of post objects (`{"text": ..., "author": ..., "id": ...}`);
/// any other file is read as one post per non-empty line.
pub fn read_posts(path: &Path) -> Result<Vec<Post>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading posts from {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let posts: Vec<Post> = serde_json::from_str(&content)
            .with_context(|| format!("parsing posts from {}", path.display()))?;
        return Ok(posts);
    }

    Ok(posts_from_lines(content.lines()))
}

/// Read one post per non-empty line from a reader (used for stdin).
pub fn read_lines(reader: impl BufRead) -> Result<Vec<Post>> {
    let lines = reader.lines().collect::<std::io::Result<Vec<String>>>()?;
    Ok(posts_from_lines(lines.iter().map(String::as_str)))
}

fn posts_from_lines<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<Post> {
    lines
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(Post::from_text)
        .collect()
}
