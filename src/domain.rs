//! Domain models used by the backend: lessons, difficulty scale, and the catalog document.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Fixed three-level difficulty scale. Ordering follows the rank.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Difficulty {
  #[serde(alias = "Beginner", alias = "basic", alias = "beginner")]
  Basic,
  #[serde(alias = "intermediate")]
  Intermediate,
  #[serde(alias = "advanced")]
  Advanced,
}

impl Difficulty {
  pub const SCALE: [Difficulty; 3] = [Difficulty::Basic, Difficulty::Intermediate, Difficulty::Advanced];

  pub fn rank(self) -> usize {
    self as usize
  }

  /// Label at `rank`, clamped to the top of the scale.
  pub fn from_rank(rank: usize) -> Self {
    Self::SCALE[rank.min(Self::SCALE.len() - 1)]
  }

  pub fn parse_label(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "basic" | "beginner" => Some(Difficulty::Basic),
      "intermediate" => Some(Difficulty::Intermediate),
      "advanced" => Some(Difficulty::Advanced),
      _ => None,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Difficulty::Basic => "Basic",
      Difficulty::Intermediate => "Intermediate",
      Difficulty::Advanced => "Advanced",
    }
  }
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// Topic reference as stored in a lesson. Indices are canonical; names come
/// from older catalog files and are resolved by `Catalog::normalize`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum TopicRef {
  Index(usize),
  Name(String),
}

/// One lesson record. JSON keys follow the catalog file layout.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
  #[serde(rename = "lessonId", default)]
  pub id: String,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub topics: Vec<TopicRef>,
  #[serde(default)]
  pub video_length: String,
  /// Minutes, kept as entered. See `duration_minutes`.
  #[serde(rename = "timeConsumption", default, deserialize_with = "string_or_number")]
  pub duration: String,
  #[serde(rename = "difficultyLevel", default, deserialize_with = "lenient_difficulty")]
  pub difficulty: Option<Difficulty>,
  #[serde(default, deserialize_with = "string_or_number")]
  pub quiz_questions: String,
  #[serde(default)]
  pub available_languages: Vec<usize>,
  #[serde(default)]
  pub thumb_image: String,
}

impl Lesson {
  /// Parsed duration in whole minutes. Anything that is not a plain
  /// non-negative integer counts as 0; the store warns about it at load time.
  pub fn duration_minutes(&self) -> u32 {
    self.duration.trim().parse::<u32>().unwrap_or(0)
  }

  pub fn has_numeric_duration(&self) -> bool {
    self.duration.trim().parse::<u32>().is_ok()
  }

  pub fn topic_indices(&self) -> impl Iterator<Item = usize> + '_ {
    self.topics.iter().filter_map(|t| match t {
      TopicRef::Index(i) => Some(*i),
      TopicRef::Name(_) => None,
    })
  }

  pub fn has_topic(&self, idx: usize) -> bool {
    self.topic_indices().any(|i| i == idx)
  }

  pub fn has_language(&self, idx: usize) -> bool {
    self.available_languages.contains(&idx)
  }
}

/// The catalog document: `{ lessons, topics, languages }`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
  #[serde(default)]
  pub lessons: Vec<Lesson>,
  #[serde(default)]
  pub topics: Vec<String>,
  #[serde(default)]
  pub languages: Vec<String>,
}

impl Catalog {
  pub fn topic_name(&self, idx: usize) -> Option<&str> {
    self.topics.get(idx).map(String::as_str)
  }

  /// Names of the topics a lesson references. Dangling indices are skipped.
  pub fn topic_names<'a>(&'a self, lesson: &'a Lesson) -> impl Iterator<Item = &'a str> + 'a {
    lesson.topic_indices().filter_map(move |i| self.topic_name(i))
  }

  pub fn find(&self, id: &str) -> Option<&Lesson> {
    self.lessons.iter().find(|l| l.id == id)
  }

  /// Rewrite name-based topic references into indices. Names missing from the
  /// topic list are appended to it.
  pub fn normalize(&mut self) {
    let Catalog { lessons, topics, .. } = self;
    for lesson in lessons.iter_mut() {
      normalize_lesson_topics(lesson, topics);
    }
  }

  /// Human-readable list of out-of-range topic/language references in `lesson`.
  pub fn dangling_refs(&self, lesson: &Lesson) -> Vec<String> {
    let mut out = Vec::new();
    for i in lesson.topic_indices() {
      if i >= self.topics.len() {
        out.push(format!("topic index {} (catalog has {})", i, self.topics.len()));
      }
    }
    for &i in &lesson.available_languages {
      if i >= self.languages.len() {
        out.push(format!("language index {} (catalog has {})", i, self.languages.len()));
      }
    }
    out
  }
}

pub(crate) fn normalize_lesson_topics(lesson: &mut Lesson, topics: &mut Vec<String>) {
  for t in lesson.topics.iter_mut() {
    if let TopicRef::Name(name) = t {
      let idx = match topics.iter().position(|n| n.eq_ignore_ascii_case(name)) {
        Some(i) => i,
        None => {
          topics.push(name.clone());
          topics.len() - 1
        }
      };
      *t = TopicRef::Index(idx);
    }
  }
}

fn string_or_number<'de, D>(d: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Raw {
    S(String),
    N(serde_json::Number),
    Null(()),
  }
  Ok(match Raw::deserialize(d)? {
    Raw::S(s) => s,
    Raw::N(n) => n.to_string(),
    Raw::Null(()) => String::new(),
  })
}

fn lenient_difficulty<'de, D>(d: D) -> Result<Option<Difficulty>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw: Option<String> = Option::deserialize(d)?;
  Ok(raw.and_then(|s| {
    if s.trim().is_empty() {
      return None;
    }
    let parsed = Difficulty::parse_label(&s);
    if parsed.is_none() {
      warn!(target: "catalog", label = %s, "Unknown difficulty label; treating as unset");
    }
    parsed
  }))
}
