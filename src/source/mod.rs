//! Collaborators that yield [`Post`](crate::models::Post)s for the pipeline.
//!
//! - [`nitter`] — async scraping of a user's latest posts from Nitter instances.
//!   Returns `Ok(vec![])` when an instance answers without posts and `Err` on
//!   network failures.
//! - [`file`] — posts read from a local file (JSON array or one post per line)
//!   or from stdin.

pub mod file;
pub mod nitter;
