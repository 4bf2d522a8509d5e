//! Loading service configuration (storage source, paging, course prose) from TOML.
//!
//! See `CatalogConfig` and `Templates` for expected schema. Every field has a default,
//! so an empty file (or no file at all) yields a working setup.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct CatalogConfig {
  #[serde(default)]
  pub storage: StorageCfg,
  #[serde(default)]
  pub browse: BrowseCfg,
  #[serde(default)]
  pub course: CourseCfg,
}

/// Where the lesson catalog lives.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
  /// Read-only JSON file bundled with the front-end. Edits stay in memory.
  #[default]
  Static,
  /// JSON blob under a fixed key, rewritten on every mutation.
  Persisted,
  /// Built-in sample catalog, memory only.
  Memory,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct StorageCfg {
  pub source: SourceKind,
  pub static_path: PathBuf,
  pub persisted_dir: PathBuf,
  pub persisted_key: String,
}

impl Default for StorageCfg {
  fn default() -> Self {
    Self {
      source: SourceKind::Static,
      static_path: PathBuf::from("./static/lessons.json"),
      persisted_dir: PathBuf::from("./data"),
      persisted_key: "lessonsData".into(),
    }
  }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BrowseCfg {
  pub page_size: usize,
}

impl Default for BrowseCfg {
  fn default() -> Self {
    Self { page_size: 6 }
  }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CourseCfg {
  /// Used in the opening sentence ("in the field of ...").
  pub subject: String,
  /// Used in the closing sentences ("various aspects of ...").
  pub field: String,
  pub default_budget_minutes: u32,
  pub templates: Templates,
}

impl Default for CourseCfg {
  fn default() -> Self {
    Self {
      subject: "cyber and data security awareness".into(),
      field: "cyber security".into(),
      default_budget_minutes: 60,
      templates: Templates::default(),
    }
  }
}

/// Course description prose. `{key}` placeholders are filled by `util::fill_template`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Templates {
  /// Keys: count, topic_count, subject, total_minutes, difficulty
  pub summary: String,
  pub areas_header: String,
  /// Keys: topic
  pub area_item: String,
  /// Keys: field, first, last
  pub closing_span: String,
  /// Keys: field, first
  pub closing_single: String,
  /// Keys: goal, field
  pub audience: String,
  pub goal_basic: String,
  pub goal_intermediate: String,
  pub goal_advanced: String,
  pub goal_unrated: String,
  pub unrated_label: String,
}

impl Default for Templates {
  fn default() -> Self {
    Self {
      summary: "This course consists of {count} lessons covering {topic_count} main topics in the field of {subject}.\nThe total duration of the course is approximately {total_minutes} minutes, with an average difficulty level of {difficulty}.".into(),
      areas_header: "The course covers the following key areas:".into(),
      area_item: "- {topic}".into(),
      closing_span: "By completing this course, you will gain a comprehensive understanding of various aspects of {field},\nfrom {first} to {last}.".into(),
      closing_single: "By completing this course, you will gain a comprehensive understanding of various aspects of {field},\nfocusing on {first}.".into(),
      audience: "This course is suitable for individuals looking to {goal} {field} awareness.".into(),
      goal_basic: "start their journey in".into(),
      goal_intermediate: "expand their knowledge of".into(),
      goal_advanced: "master".into(),
      goal_unrated: "learn about".into(),
      unrated_label: "Unrated".into(),
    }
  }
}

pub fn parse_config(s: &str) -> Result<CatalogConfig, toml::de::Error> {
  toml::from_str::<CatalogConfig>(s)
}

/// Attempt to load `CatalogConfig` from CATALOG_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<CatalogConfig> {
  let path = std::env::var("CATALOG_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_config(&s) {
      Ok(cfg) => {
        info!(target: "lesson_catalog", %path, source = ?cfg.storage.source, "Loaded catalog config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "lesson_catalog", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "lesson_catalog", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_file_gives_defaults() {
    let cfg = parse_config("").unwrap();
    assert_eq!(cfg.storage.source, SourceKind::Static);
    assert_eq!(cfg.browse.page_size, 6);
    assert_eq!(cfg.course.default_budget_minutes, 60);
    assert_eq!(cfg.storage.persisted_key, "lessonsData");
  }

  #[test]
  fn partial_sections_keep_remaining_defaults() {
    let cfg = parse_config(
      r#"
      [storage]
      source = "persisted"
      persisted_dir = "/var/lib/lessons"

      [course.templates]
      goal_advanced = "become an expert in"
      "#,
    )
    .unwrap();
    assert_eq!(cfg.storage.source, SourceKind::Persisted);
    assert_eq!(cfg.storage.persisted_dir, PathBuf::from("/var/lib/lessons"));
    assert_eq!(cfg.storage.persisted_key, "lessonsData");
    assert_eq!(cfg.course.templates.goal_advanced, "become an expert in");
    assert_eq!(cfg.course.templates.goal_basic, "start their journey in");
  }

  #[test]
  fn unknown_source_is_rejected() {
    assert!(parse_config("[storage]\nsource = \"s3\"").is_err());
  }
}
