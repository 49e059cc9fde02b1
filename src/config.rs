use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::artifacts::ArtifactPaths;

/// Root configuration structure, deserialized from `.tweet-sentiment/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Location of the fitted artifacts.
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    /// Remote post source settings.
    #[serde(default)]
    pub source: SourceConfig,
}

/// Where the stopword list, vocabulary and model are read from.
#[derive(Debug, Deserialize)]
pub struct ArtifactsConfig {
    /// Directory that relative artifact file names are resolved against.
    #[serde(default = "default_artifacts_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_vocabulary")]
    pub vocabulary: PathBuf,
    #[serde(default = "default_model")]
    pub model: PathBuf,
    /// Word-per-line stopword list. Defaults to the built-in English list.
    #[serde(default)]
    pub stopwords: Option<PathBuf>,
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

fn default_vocabulary() -> PathBuf {
    PathBuf::from("vocabulary.json")
}

fn default_model() -> PathBuf {
    PathBuf::from("model.json")
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        ArtifactsConfig {
            dir: default_artifacts_dir(),
            vocabulary: default_vocabulary(),
            model: default_model(),
            stopwords: None,
        }
    }
}

impl ArtifactsConfig {
    /// Resolve every artifact path against `dir` (absolute paths are kept as-is).
    pub fn paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            stopwords: self.stopwords.as_ref().map(|p| self.dir.join(p)),
            vocabulary: self.dir.join(&self.vocabulary),
            model: self.dir.join(&self.model),
        }
    }
}

/// Settings for fetching posts from Nitter instances.
#[derive(Debug, Deserialize)]
pub struct SourceConfig {
    /// Instances tried in order until one answers.
    #[serde(default = "default_instances")]
    pub instances: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Posts fetched per user.
    #[serde(default = "default_number")]
    pub number: usize,
}

fn default_instances() -> Vec<String> {
    vec![
        "https://nitter.net".to_string(),
        "https://nitter.poast.org".to_string(),
        "https://nitter.privacydev.net".to_string(),
    ]
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_number() -> usize {
    5
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            instances: default_instances(),
            timeout_secs: default_timeout_secs(),
            number: default_number(),
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<cwd>/.tweet-sentiment/config.toml`
/// 3. `~/.config/tweet-sentiment/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(cwd: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = cwd.join(".tweet-sentiment").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("tweet-sentiment")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        let paths = cfg.artifacts.paths();
        assert_eq!(paths.vocabulary, PathBuf::from("artifacts/vocabulary.json"));
        assert_eq!(paths.model, PathBuf::from("artifacts/model.json"));
        assert!(paths.stopwords.is_none());
        assert_eq!(cfg.source.number, 5);
        assert_eq!(cfg.source.timeout_secs, 10);
        assert!(!cfg.source.instances.is_empty());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "[artifacts]").unwrap();
        writeln!(f, "dir = \"/srv/models\"").unwrap();
        writeln!(f, "stopwords = \"stop.txt\"").unwrap();
        writeln!(f, "[source]").unwrap();
        writeln!(f, "number = 20").unwrap();

        let cfg = load_config(Path::new("."), Some(f.path())).unwrap();
        let paths = cfg.artifacts.paths();
        assert_eq!(paths.model, PathBuf::from("/srv/models/model.json"));
        assert_eq!(paths.stopwords, Some(PathBuf::from("/srv/models/stop.txt")));
        assert_eq!(cfg.source.number, 20);
        assert_eq!(cfg.source.timeout_secs, 10);
    }

    #[test]
    fn test_absolute_artifact_path_wins() {
        let cfg: Config = toml::from_str(
            r#"
[artifacts]
model = "/opt/model.json"
"#,
        )
        .unwrap();
        assert_eq!(cfg.artifacts.paths().model, PathBuf::from("/opt/model.json"));
    }

    #[test]
    fn test_local_config_discovered() {
        let dir = TempDir::new().unwrap();
        let conf_dir = dir.path().join(".tweet-sentiment");
        std::fs::create_dir(&conf_dir).unwrap();
        std::fs::write(conf_dir.join("config.toml"), "[source]\ntimeout_secs = 3\n").unwrap();

        let cfg = load_config(dir.path(), None).unwrap();
        assert_eq!(cfg.source.timeout_secs, 3);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "[source").unwrap();
        assert!(load_config(Path::new("."), Some(f.path())).is_err());
    }
}
