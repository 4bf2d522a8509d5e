//! Course description generator: aggregate statistics over a lesson set and the
//! templated prose built from them.

use serde::Serialize;

use crate::config::CourseCfg;
use crate::domain::{Catalog, Difficulty, Lesson};
use crate::util::fill_template;

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CourseStats {
  pub lesson_count: usize,
  pub total_minutes: u32,
  /// Distinct topic names, first-seen order.
  pub topics: Vec<String>,
  pub average_difficulty: Option<Difficulty>,
}

/// Mean rank rounded half-up, mapped back onto the scale. `None` when no
/// lesson carries a difficulty.
pub fn average_difficulty(levels: impl IntoIterator<Item = Difficulty>) -> Option<Difficulty> {
  let (sum, n) = levels
    .into_iter()
    .fold((0usize, 0usize), |(sum, n), d| (sum + d.rank(), n + 1));
  if n == 0 {
    return None;
  }
  let mean = sum as f64 / n as f64;
  Some(Difficulty::from_rank((mean + 0.5).floor() as usize))
}

pub fn course_stats(catalog: &Catalog, lessons: &[Lesson]) -> CourseStats {
  let mut topics: Vec<String> = Vec::new();
  for lesson in lessons {
    for name in catalog.topic_names(lesson) {
      if !topics.iter().any(|t| t == name) {
        topics.push(name.to_string());
      }
    }
  }
  CourseStats {
    lesson_count: lessons.len(),
    total_minutes: lessons.iter().map(Lesson::duration_minutes).fold(0u32, u32::saturating_add),
    topics,
    average_difficulty: average_difficulty(lessons.iter().filter_map(|l| l.difficulty)),
  }
}

/// Render the course description for `lessons` in their current order.
/// An empty set renders as an empty string.
pub fn describe(catalog: &Catalog, lessons: &[Lesson], cfg: &CourseCfg) -> String {
  let (Some(first), Some(last)) = (lessons.first(), lessons.last()) else {
    return String::new();
  };
  let stats = course_stats(catalog, lessons);
  let t = &cfg.templates;

  let difficulty = stats
    .average_difficulty
    .map(|d| d.label().to_string())
    .unwrap_or_else(|| t.unrated_label.clone());
  let goal = match stats.average_difficulty {
    Some(Difficulty::Basic) => &t.goal_basic,
    Some(Difficulty::Intermediate) => &t.goal_intermediate,
    Some(Difficulty::Advanced) => &t.goal_advanced,
    None => &t.goal_unrated,
  };

  let mut out = fill_template(
    &t.summary,
    &[
      ("count", &stats.lesson_count.to_string()),
      ("topic_count", &stats.topics.len().to_string()),
      ("subject", &cfg.subject),
      ("total_minutes", &stats.total_minutes.to_string()),
      ("difficulty", &difficulty),
    ],
  );

  if !stats.topics.is_empty() {
    out.push_str("\n\n");
    out.push_str(&t.areas_header);
    for topic in &stats.topics {
      out.push('\n');
      out.push_str(&fill_template(&t.area_item, &[("topic", topic)]));
    }
  }

  let first_title = first.title.to_lowercase();
  let closing = if lessons.len() > 1 {
    fill_template(
      &t.closing_span,
      &[("field", &cfg.field), ("first", &first_title), ("last", &last.title.to_lowercase())],
    )
  } else {
    fill_template(&t.closing_single, &[("field", &cfg.field), ("first", &first_title)])
  };
  out.push_str("\n\n");
  out.push_str(&closing);
  out.push('\n');
  out.push_str(&fill_template(&t.audience, &[("goal", goal), ("field", &cfg.field)]));
  out.trim().to_string()
}
