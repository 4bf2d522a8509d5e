//! Lesson store: resolves the catalog from its configured source and applies
//! admin mutations with write-through.
//!
//! The store owns:
//!   - the source (static file, persisted blob, or memory)
//!   - the in-memory catalog cache every read is served from
//!   - the last load error, if the source could not be read
//!
//! Every mutation runs under the cache's write lock: the new catalog is built on
//! a copy, written to the source, and only then swapped into the cache. A
//! following `load` therefore always sees the write.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

use crate::config::{SourceKind, StorageCfg};
use crate::domain::{normalize_lesson_topics, Catalog, Lesson};
use crate::error::StoreError;
use crate::seeds::seed_catalog;

/// Where the catalog is read from and written to.
#[derive(Clone, Debug)]
pub enum CatalogSource {
    /// Read-only JSON document. Mutations live in memory until restart.
    Static { path: PathBuf },
    /// One JSON blob stored as `<dir>/<key>.json`, replaced wholesale on write.
    Persisted { dir: PathBuf, key: String },
    /// Built-in seed catalog, never written anywhere.
    Memory,
}

impl CatalogSource {
    pub fn from_config(cfg: &StorageCfg) -> Self {
        match cfg.source {
            SourceKind::Static => CatalogSource::Static {
                path: cfg.static_path.clone(),
            },
            SourceKind::Persisted => CatalogSource::Persisted {
                dir: cfg.persisted_dir.clone(),
                key: cfg.persisted_key.clone(),
            },
            SourceKind::Memory => CatalogSource::Memory,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CatalogSource::Static { .. } => "static",
            CatalogSource::Persisted { .. } => "persisted",
            CatalogSource::Memory => "memory",
        }
    }

    fn blob_path(dir: &Path, key: &str) -> PathBuf {
        dir.join(format!("{}.json", key))
    }

    async fn read(&self) -> Result<Catalog, StoreError> {
        match self {
            CatalogSource::Static { path } => {
                let text = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| StoreError::CatalogLoad(format!("{}: {}", path.display(), e)))?;
                parse_catalog(&text)
            }
            CatalogSource::Persisted { dir, key } => {
                let path = Self::blob_path(dir, key);
                match tokio::fs::read_to_string(&path).await {
                    Ok(text) => parse_catalog(&text),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        info!(target: "catalog", path = %path.display(), "No persisted catalog yet; starting empty");
                        Ok(Catalog::default())
                    }
                    Err(e) => Err(StoreError::CatalogLoad(format!("{}: {}", path.display(), e))),
                }
            }
            CatalogSource::Memory => Ok(seed_catalog()),
        }
    }

    async fn write(&self, catalog: &Catalog) -> Result<(), StoreError> {
        let CatalogSource::Persisted { dir, key } = self else {
            return Ok(());
        };
        let persist = |e: std::io::Error| StoreError::Persist(e.to_string());
        let body = serde_json::to_string(catalog).map_err(|e| StoreError::Persist(e.to_string()))?;
        tokio::fs::create_dir_all(dir).await.map_err(persist)?;
        let path = Self::blob_path(dir, key);
        let tmp = dir.join(format!("{}.json.tmp", key));
        tokio::fs::write(&tmp, body).await.map_err(persist)?;
        tokio::fs::rename(&tmp, &path).await.map_err(persist)?;
        Ok(())
    }
}

fn parse_catalog(text: &str) -> Result<Catalog, StoreError> {
    let mut catalog: Catalog =
        serde_json::from_str(text).map_err(|e| StoreError::CatalogLoad(format!("malformed catalog JSON: {}", e)))?;
    catalog.normalize();
    for lesson in &catalog.lessons {
        let dangling = catalog.dangling_refs(lesson);
        if !dangling.is_empty() {
            warn!(target: "catalog", id = %lesson.id, refs = ?dangling, "Lesson references entries outside the catalog; they will be skipped");
        }
        if !lesson.has_numeric_duration() {
            warn!(target: "catalog", id = %lesson.id, duration = %lesson.duration, "Non-numeric lesson duration; counting as 0 minutes");
        }
    }
    Ok(catalog)
}

/// Pause before the one automatic retry of a failed catalog read.
const RETRY_DELAY: Duration = Duration::from_millis(250);

/// Run `attempt`, and once more after `RETRY_DELAY` if it fails.
async fn retry_once<T, F, Fut>(what: &str, mut attempt: F) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    match attempt().await {
        Ok(v) => Ok(v),
        Err(e) => {
            warn!(target: "catalog", error = %e, "{} failed; retrying once", what);
            tokio::time::sleep(RETRY_DELAY).await;
            attempt().await
        }
    }
}

#[derive(Debug, Default)]
struct Cache {
    catalog: Catalog,
    load_error: Option<String>,
}

#[derive(Debug)]
pub struct LessonStore {
    source: CatalogSource,
    cache: RwLock<Cache>,
}

impl LessonStore {
    /// Read the source, retrying once on failure. A failed read is remembered
    /// and reported by `load` until a later `reload` or `replace` succeeds.
    #[instrument(level = "info", skip_all, fields(source = source.name()))]
    pub async fn open(source: CatalogSource) -> Self {
        let cache = match retry_once("Catalog load", || source.read()).await {
            Ok(catalog) => {
                info!(target: "catalog", lessons = catalog.lessons.len(), topics = catalog.topics.len(), languages = catalog.languages.len(), "Catalog loaded");
                Cache { catalog, load_error: None }
            }
            Err(e) => {
                error!(target: "catalog", error = %e, "Catalog load failed");
                Cache { catalog: Catalog::default(), load_error: Some(e.to_string()) }
            }
        };
        Self { source, cache: RwLock::new(cache) }
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Current catalog, or the load error that made it unavailable.
    pub async fn load(&self) -> Result<Catalog, StoreError> {
        let cache = self.cache.read().await;
        match &cache.load_error {
            Some(msg) => Err(StoreError::CatalogLoad(msg.clone())),
            None => Ok(cache.catalog.clone()),
        }
    }

    /// Re-read the source, replacing the cache (and any in-memory edits).
    #[instrument(level = "info", skip(self), fields(source = self.source.name()))]
    pub async fn reload(&self) -> Result<Catalog, StoreError> {
        let mut cache = self.cache.write().await;
        match retry_once("Catalog reload", || self.source.read()).await {
            Ok(catalog) => {
                info!(target: "catalog", lessons = catalog.lessons.len(), "Catalog reloaded");
                cache.catalog = catalog.clone();
                cache.load_error = None;
                Ok(catalog)
            }
            Err(e) => {
                error!(target: "catalog", error = %e, "Catalog reload failed");
                cache.catalog = Catalog::default();
                cache.load_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn get(&self, id: &str) -> Result<Lesson, StoreError> {
        let catalog = self.load().await?;
        catalog
            .find(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Add a lesson. A blank id is replaced by the next free `SEC###` token.
    #[instrument(level = "info", skip(self, lesson), fields(id = %lesson.id))]
    pub async fn create(&self, mut lesson: Lesson) -> Result<Lesson, StoreError> {
        self.mutate(move |catalog| {
            lesson.id = lesson.id.trim().to_string();
            if lesson.id.is_empty() {
                lesson.id = next_lesson_id(catalog);
            } else if catalog.find(&lesson.id).is_some() {
                return Err(StoreError::DuplicateId(lesson.id.clone()));
            }
            prepare(catalog, &mut lesson)?;
            catalog.lessons.push(lesson.clone());
            info!(target: "catalog", id = %lesson.id, "Lesson created");
            Ok(lesson)
        })
        .await
    }

    /// Replace the lesson with the same id.
    #[instrument(level = "info", skip(self, lesson), fields(id = %lesson.id))]
    pub async fn update(&self, mut lesson: Lesson) -> Result<Lesson, StoreError> {
        self.mutate(move |catalog| {
            let idx = catalog
                .lessons
                .iter()
                .position(|l| l.id == lesson.id)
                .ok_or_else(|| StoreError::NotFound(lesson.id.clone()))?;
            prepare(catalog, &mut lesson)?;
            catalog.lessons[idx] = lesson.clone();
            info!(target: "catalog", id = %lesson.id, "Lesson updated");
            Ok(lesson)
        })
        .await
    }

    #[instrument(level = "info", skip(self))]
    pub async fn delete(&self, id: &str) -> Result<Lesson, StoreError> {
        self.mutate(|catalog| {
            let idx = catalog
                .lessons
                .iter()
                .position(|l| l.id == id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            let removed = catalog.lessons.remove(idx);
            info!(target: "catalog", id = %removed.id, "Lesson deleted");
            Ok(removed)
        })
        .await
    }

    /// Replace the whole catalog (bulk import). Clears a previous load error.
    #[instrument(level = "info", skip_all, fields(lessons = catalog.lessons.len()))]
    pub async fn replace(&self, mut catalog: Catalog) -> Result<(), StoreError> {
        catalog.normalize();
        {
            let mut seen = std::collections::HashSet::new();
            for lesson in &catalog.lessons {
                if !seen.insert(lesson.id.as_str()) {
                    return Err(StoreError::DuplicateId(lesson.id.clone()));
                }
                validate(&catalog, lesson)?;
            }
        }
        let mut cache = self.cache.write().await;
        self.source.write(&catalog).await?;
        cache.catalog = catalog;
        cache.load_error = None;
        Ok(())
    }

    /// Apply `f` to a copy of the catalog, write it through, then publish it.
    async fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Catalog) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut cache = self.cache.write().await;
        if let Some(msg) = &cache.load_error {
            return Err(StoreError::CatalogLoad(msg.clone()));
        }
        let mut next = cache.catalog.clone();
        let out = f(&mut next)?;
        if let Err(e) = self.source.write(&next).await {
            error!(target: "catalog", error = %e, "Write-through failed; cache left unchanged");
            return Err(e);
        }
        cache.catalog = next;
        Ok(out)
    }
}

/// `SEC` + zero-padded (count + 1), advanced past ids already in use.
pub fn next_lesson_id(catalog: &Catalog) -> String {
    let mut n = catalog.lessons.len() + 1;
    loop {
        let id = format!("SEC{:03}", n);
        if catalog.find(&id).is_none() {
            return id;
        }
        n += 1;
    }
}

fn prepare(catalog: &mut Catalog, lesson: &mut Lesson) -> Result<(), StoreError> {
    normalize_lesson_topics(lesson, &mut catalog.topics);
    validate(catalog, lesson)
}

/// Required fields plus reference integrity, checked on every write.
pub fn validate(catalog: &Catalog, lesson: &Lesson) -> Result<(), StoreError> {
    let mut missing = Vec::new();
    if lesson.id.trim().is_empty() {
        missing.push("lessonId");
    }
    if lesson.title.trim().is_empty() {
        missing.push("title");
    }
    if lesson.description.trim().is_empty() {
        missing.push("description");
    }
    if lesson.duration.trim().is_empty() {
        missing.push("timeConsumption");
    }
    if lesson.difficulty.is_none() {
        missing.push("difficultyLevel");
    }
    if !missing.is_empty() {
        return Err(StoreError::Validation(format!("missing required fields: {}", missing.join(", "))));
    }
    if lesson.duration.trim().parse::<u32>().is_err() {
        return Err(StoreError::Validation(format!(
            "timeConsumption must be whole minutes, got '{}'",
            lesson.duration
        )));
    }
    let dangling = catalog.dangling_refs(lesson);
    if !dangling.is_empty() {
        return Err(StoreError::Validation(format!("out of range references: {}", dangling.join("; "))));
    }
    Ok(())
}
