//! Presenters for classified posts.
//!
//! - [`terminal`] — colored summary box and table; respects `--verbose` / `--quiet`.
//!
//! JSON output is a plain `serde_json` dump of the results and lives in `main`.

pub mod terminal;
