//! Course assembler: picks lessons for a free-text requirement under a duration budget.
//!
//! Selection is greedy first-fit in catalog order. It does not search for the
//! combination that fills the budget best.

use tracing::{debug, instrument};

use crate::domain::{Catalog, Lesson};
use crate::util::contains_lower;

/// Lowercased whitespace-separated keywords. Blank input yields none.
pub fn keywords(prompt: &str) -> Vec<String> {
  prompt.split_whitespace().map(str::to_lowercase).collect()
}

/// True when any keyword occurs in the title, the description, or a resolved topic name.
pub fn is_candidate(catalog: &Catalog, lesson: &Lesson, keywords: &[String]) -> bool {
  keywords.iter().any(|k| {
    contains_lower(&lesson.title, k)
      || contains_lower(&lesson.description, k)
      || catalog.topic_names(lesson).any(|name| contains_lower(name, k))
  })
}

/// Result of one assembly run. The caller owns it; nothing is retained here.
#[derive(Clone, Debug, PartialEq)]
pub struct Assembly {
  pub lessons: Vec<Lesson>,
  pub total_minutes: u32,
}

/// Walk candidates in catalog order, accepting each one whose duration still
/// fits, and stop as soon as the running total reaches the budget.
#[instrument(level = "debug", skip(catalog, prompt), fields(prompt = %crate::util::trunc_for_log(prompt, 80)))]
pub fn assemble(catalog: &Catalog, prompt: &str, budget_minutes: u32) -> Assembly {
  let keywords = keywords(prompt);
  let mut total: u32 = 0;
  let mut lessons = Vec::new();
  if keywords.is_empty() {
    return Assembly { lessons, total_minutes: 0 };
  }

  for lesson in catalog.lessons.iter().filter(|l| is_candidate(catalog, l, &keywords)) {
    if total >= budget_minutes {
      break;
    }
    let minutes = lesson.duration_minutes();
    match total.checked_add(minutes) {
      Some(next) if next <= budget_minutes => {
        total = next;
        lessons.push(lesson.clone());
      }
      _ => debug!(target: "course", id = %lesson.id, minutes, total, budget_minutes, "Candidate does not fit"),
    }
  }
  Assembly { lessons, total_minutes: total }
}
