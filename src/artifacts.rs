use std::path::{Path, PathBuf};
use std::time::Instant;

use once_cell::sync::OnceCell;
use tracing::{debug, error, info};

use crate::classifier::ClassifierParameters;
use crate::error::{ArtifactKind, Result, SentimentError};
use crate::features::vocabulary::Vocabulary;
use crate::text::stopwords::StopwordSet;

/// Where the fitted artifacts live on disk.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    /// Word-per-line stopword list; `None` selects the built-in English list.
    pub stopwords: Option<PathBuf>,
    pub vocabulary: PathBuf,
    pub model: PathBuf,
}

/// Process-wide holder of the stopword set, vocabulary and model weights.
///
/// Each artifact is loaded on first access and the outcome is kept for the
/// lifetime of the store. Concurrent first accesses block on a single loader, so
/// an artifact is never read twice and never observed half-built; afterwards
/// reads are lock-free. A failed load is kept too: every later access returns the
/// same error and the file is not read again.
#[derive(Debug)]
pub struct ArtifactStore {
    paths: Option<ArtifactPaths>,
    stopwords: OnceCell<Result<StopwordSet>>,
    vocabulary: OnceCell<Result<Vocabulary>>,
    model: OnceCell<Result<ClassifierParameters>>,
}

impl ArtifactStore {
    /// A store that loads lazily from `paths`.
    pub fn new(paths: ArtifactPaths) -> Self {
        Self {
            paths: Some(paths),
            stopwords: OnceCell::new(),
            vocabulary: OnceCell::new(),
            model: OnceCell::new(),
        }
    }

    /// A store built from artifacts already in memory.
    pub fn from_artifacts(
        stopwords: StopwordSet,
        vocabulary: Vocabulary,
        model: ClassifierParameters,
    ) -> Result<Self> {
        check_dimensions(&vocabulary, &model)?;
        Ok(Self {
            paths: None,
            stopwords: OnceCell::with_value(Ok(stopwords)),
            vocabulary: OnceCell::with_value(Ok(vocabulary)),
            model: OnceCell::with_value(Ok(model)),
        })
    }

    pub fn stopwords(&self) -> Result<&StopwordSet> {
        cached(&self.stopwords, || {
            let started = Instant::now();
            let set = match self.paths()?.stopwords.as_deref() {
                Some(path) => {
                    debug!(path = %path.display(), "loading stopword list");
                    StopwordSet::load(path)?
                }
                None => StopwordSet::english(),
            };
            info!(
                words = set.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "stopword list ready"
            );
            Ok(set)
        })
    }

    pub fn vocabulary(&self) -> Result<&Vocabulary> {
        cached(&self.vocabulary, || {
            let path = &self.paths()?.vocabulary;
            load_logged(ArtifactKind::Vocabulary, path, Vocabulary::load, |v: &Vocabulary| {
                v.dimension()
            })
        })
    }

    pub fn classifier_parameters(&self) -> Result<&ClassifierParameters> {
        cached(&self.model, || {
            let path = &self.paths()?.model;
            load_logged(
                ArtifactKind::Model,
                path,
                ClassifierParameters::load,
                |m: &ClassifierParameters| m.dimension(),
            )
        })
    }

    /// Eagerly load all three artifacts and check that the vocabulary and the
    /// model weights share a dimension. Run before serving concurrent requests.
    pub fn preload(&self) -> Result<()> {
        self.stopwords()?;
        let vocabulary = self.vocabulary()?;
        let model = self.classifier_parameters()?;
        check_dimensions(vocabulary, model)?;
        info!(
            dimension = vocabulary.dimension(),
            default_label = %model.default_label(),
            "artifacts loaded"
        );
        Ok(())
    }

    fn paths(&self) -> Result<&ArtifactPaths> {
        self.paths.as_ref().ok_or_else(|| {
            SentimentError::invalid(ArtifactKind::Model, "store has no artifact paths configured")
        })
    }
}

/// Run `load` at most once per cell and replay its outcome on every call.
fn cached<T>(cell: &OnceCell<Result<T>>, load: impl FnOnce() -> Result<T>) -> Result<&T> {
    match cell.get_or_init(|| {
        load().map_err(|e| {
            error!(error = %e, "artifact load failed, store will not retry");
            e
        })
    }) {
        Ok(artifact) => Ok(artifact),
        Err(e) => Err(e.clone()),
    }
}

fn load_logged<T>(
    kind: ArtifactKind,
    path: &Path,
    load: impl FnOnce(&Path) -> Result<T>,
    dimension: impl FnOnce(&T) -> usize,
) -> Result<T> {
    let started = Instant::now();
    debug!(%kind, path = %path.display(), "loading artifact");
    let artifact = load(path)?;
    info!(
        %kind,
        dimension = dimension(&artifact),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "artifact ready"
    );
    Ok(artifact)
}

fn check_dimensions(vocabulary: &Vocabulary, model: &ClassifierParameters) -> Result<()> {
    if vocabulary.dimension() != model.dimension() {
        return Err(SentimentError::invalid(
            ArtifactKind::Model,
            format!(
                "model has {} weights but the vocabulary has {} tokens",
                model.dimension(),
                vocabulary.dimension()
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    fn store_in(dir: &TempDir, model: &str) -> ArtifactStore {
        let vocabulary = write(
            dir,
            "vocabulary.json",
            r#"{"vocabulary": {"love": 0, "hate": 1}}"#,
        );
        let model = write(dir, "model.json", model);
        ArtifactStore::new(ArtifactPaths {
            stopwords: None,
            vocabulary,
            model,
        })
    }

    #[test]
    fn test_lazy_load_and_cache() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, r#"{"coef": [1.0, -1.0], "intercept": 0.0}"#);

        let first = store.vocabulary().unwrap();
        // Removing the file proves the second access hits the cache
        std::fs::remove_file(dir.path().join("vocabulary.json")).unwrap();
        let second = store.vocabulary().unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(store.stopwords().unwrap().len(), 179);
    }

    #[test]
    fn test_concurrent_first_access_sees_one_instance() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, r#"{"coef": [1.0, -1.0], "intercept": 0.0}"#);

        let store = &store;
        let addrs: Vec<usize> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(move || store.classifier_parameters().unwrap() as *const _ as usize)
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_preload_detects_dimension_mismatch() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, r#"{"coef": [1.0, -1.0, 0.5], "intercept": 0.0}"#);
        let err = store.preload().unwrap_err();
        assert!(err
            .to_string()
            .contains("model has 3 weights but the vocabulary has 2 tokens"));
    }

    #[test]
    fn test_failed_load_is_remembered() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, "{ broken");
        let first = store.classifier_parameters().unwrap_err();
        assert!(matches!(first, SentimentError::ArtifactDecode { .. }));

        // A valid file appearing later must not bring the store back
        write(&dir, "model.json", r#"{"coef": [1.0, -1.0], "intercept": 0.0}"#);
        let second = store.classifier_parameters().unwrap_err();
        assert_eq!(second.to_string(), first.to_string());
        assert!(store.preload().is_err());
    }

    #[test]
    fn test_concurrent_failed_load_stays_failed() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, r#"{"coef": [1.0, -1.0], "intercept": 0.0}"#);
        std::fs::remove_file(dir.path().join("vocabulary.json")).unwrap();

        let store = &store;
        let failures = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(move || store.vocabulary().is_err()))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|failed| *failed)
                .count()
        });
        assert_eq!(failures, 8);

        write(&dir, "vocabulary.json", r#"{"vocabulary": {"love": 0, "hate": 1}}"#);
        assert!(matches!(
            store.vocabulary().unwrap_err(),
            SentimentError::ArtifactIo { .. }
        ));
    }

    #[test]
    fn test_custom_stopword_file() {
        let dir = TempDir::new().unwrap();
        let stopwords = write(&dir, "stopwords.txt", "love\n");
        let mut store = store_in(&dir, r#"{"coef": [1.0, -1.0], "intercept": 0.0}"#);
        if let Some(paths) = store.paths.as_mut() {
            paths.stopwords = Some(stopwords);
        }
        let set = store.stopwords().unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains("love"));
    }

    #[test]
    fn test_from_artifacts_checks_dimensions() {
        let vocabulary = Vocabulary::new(
            [("love".to_string(), 0)].into_iter().collect(),
            Default::default(),
        )
        .unwrap();
        let model = ClassifierParameters::new(vec![1.0, 2.0], 0.0).unwrap();
        assert!(ArtifactStore::from_artifacts(StopwordSet::english(), vocabulary, model).is_err());
    }
}
