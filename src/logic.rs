//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Browsing (filter + paginate) the catalog
//!   - Assembling a course from a prompt and a duration budget
//!   - Describing an explicit lesson list
//!   - Applying course builder actions to a session

use tracing::{info, instrument};

use crate::assembler::assemble;
use crate::describe::{course_stats, describe, CourseStats};
use crate::domain::{Catalog, Lesson};
use crate::error::StoreError;
use crate::filter::{paginate, IndexFilter, LessonFilter, Page};
use crate::protocol::SelectionOut;
use crate::selection::CourseSession;
use crate::state::AppState;

/// UI languages the front-end ships strings for.
pub const UI_LANGUAGES: &[&str] = &["en", "da"];

#[instrument(level = "info", skip(state), fields(query = %filter.query))]
pub async fn browse(state: &AppState, filter: &LessonFilter, page: usize) -> Result<Page<Lesson>, StoreError> {
  let catalog = state.store.load().await?;
  let matches: Vec<Lesson> = filter.apply(&catalog).into_iter().cloned().collect();
  let out = paginate(&matches, page, state.config.browse.page_size);
  info!(target: "catalog", total = out.total, page = out.page, page_count = out.page_count, "Browse page served");
  Ok(out)
}

pub struct AssembledCourse {
  pub lessons: Vec<Lesson>,
  pub total_minutes: u32,
  pub budget_minutes: u32,
  pub description: String,
}

#[instrument(level = "info", skip(state, prompt), fields(prompt_len = prompt.len()))]
pub async fn assemble_course(state: &AppState, prompt: &str, budget: Option<u32>) -> Result<AssembledCourse, StoreError> {
  let catalog = state.store.load().await?;
  let cfg = &state.config.course;
  let budget_minutes = budget.unwrap_or(cfg.default_budget_minutes);
  let assembly = assemble(&catalog, prompt, budget_minutes);
  let description = describe(&catalog, &assembly.lessons, cfg);
  info!(target: "course", picked = assembly.lessons.len(), total = assembly.total_minutes, budget_minutes, "Course assembled");
  Ok(AssembledCourse {
    lessons: assembly.lessons,
    total_minutes: assembly.total_minutes,
    budget_minutes,
    description,
  })
}

/// Resolve ids in the given order. Repeated ids count once.
fn resolve_ids(catalog: &Catalog, ids: &[String]) -> Result<Vec<Lesson>, StoreError> {
  let mut out: Vec<Lesson> = Vec::with_capacity(ids.len());
  for id in ids {
    if out.iter().any(|l| &l.id == id) {
      continue;
    }
    let lesson = catalog.find(id).cloned().ok_or_else(|| StoreError::NotFound(id.clone()))?;
    out.push(lesson);
  }
  Ok(out)
}

#[instrument(level = "info", skip(state, ids), fields(count = ids.len()))]
pub async fn describe_lessons(state: &AppState, ids: &[String]) -> Result<(CourseStats, String), StoreError> {
  let catalog = state.store.load().await?;
  let lessons = resolve_ids(&catalog, ids)?;
  let stats = course_stats(&catalog, &lessons);
  let text = describe(&catalog, &lessons, &state.config.course);
  Ok((stats, text))
}

pub fn selection_out(session: &CourseSession) -> SelectionOut {
  SelectionOut {
    lesson_ids: session.selection.ids(),
    total_duration: session.selection.total_minutes(),
    description: session.description().to_string(),
    description_edited: session.is_description_edited(),
  }
}

#[instrument(level = "info", skip(state, session))]
pub async fn toggle_lesson(state: &AppState, session: &mut CourseSession, lesson_id: &str) -> Result<bool, StoreError> {
  let catalog = state.store.load().await?;
  let lesson = catalog.find(lesson_id).cloned().ok_or_else(|| StoreError::NotFound(lesson_id.to_string()))?;
  let selected = session.toggle(&lesson, &catalog, &state.config.course);
  info!(target: "course", %lesson_id, selected, size = session.selection.lessons().len(), "Selection toggled");
  Ok(selected)
}

pub async fn remove_lesson(state: &AppState, session: &mut CourseSession, lesson_id: &str) -> Result<bool, StoreError> {
  let catalog = state.store.load().await?;
  Ok(session.remove(lesson_id, &catalog, &state.config.course))
}

pub async fn regenerate(state: &AppState, session: &mut CourseSession) -> Result<(), StoreError> {
  let catalog = state.store.load().await?;
  session.regenerate(&catalog, &state.config.course);
  Ok(())
}

/// Replace the session's selection with a freshly assembled course.
pub async fn assemble_into(state: &AppState, session: &mut CourseSession, prompt: &str, budget: Option<u32>) -> Result<(), StoreError> {
  let catalog = state.store.load().await?;
  let budget_minutes = budget.unwrap_or(state.config.course.default_budget_minutes);
  let assembly = assemble(&catalog, prompt, budget_minutes);
  session.replace(assembly.lessons, &catalog, &state.config.course);
  Ok(())
}

/// Merge browse criteria into the session and serve the resulting page.
pub async fn browse_session(
  state: &AppState,
  session: &mut CourseSession,
  query: Option<String>,
  topic: Option<IndexFilter>,
  language: Option<IndexFilter>,
  page: Option<usize>,
) -> Result<Page<Lesson>, StoreError> {
  if let Some(q) = query {
    session.filter.query = q;
  }
  if let Some(t) = topic {
    session.filter.topic = t;
  }
  if let Some(l) = language {
    session.filter.language = l;
  }
  if let Some(p) = page {
    session.page = p;
  }
  let out = browse(state, &session.filter, session.page).await?;
  session.page = out.page;
  Ok(out)
}

pub fn set_ui_language(session: &mut CourseSession, language: &str) -> Result<(), String> {
  let code = language.trim().to_ascii_lowercase();
  if !UI_LANGUAGES.contains(&code.as_str()) {
    return Err(format!("Unsupported UI language '{}'; expected one of {:?}", language, UI_LANGUAGES));
  }
  session.ui_language = code;
  Ok(())
}
