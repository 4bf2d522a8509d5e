//! HTTP endpoint handlers. These are thin wrappers that forward to the store and core logic.
//! Each handler is instrumented and logs its parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use tracing::{info, instrument};

use crate::domain::{Catalog, Lesson};
use crate::error::ApiError;
use crate::filter::{IndexFilter, LessonFilter};
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, source: state.store.source().name() })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_catalog(State(state): State<Arc<AppState>>) -> Result<Json<Catalog>, ApiError> {
  let catalog = state.store.load().await?;
  info!(target: "catalog", lessons = catalog.lessons.len(), "HTTP catalog served");
  Ok(Json(catalog))
}

#[instrument(level = "info", skip(state, body), fields(lessons = body.lessons.len()))]
pub async fn http_put_catalog(
  State(state): State<Arc<AppState>>,
  Json(body): Json<Catalog>,
) -> Result<Json<Catalog>, ApiError> {
  state.store.replace(body).await?;
  Ok(Json(state.store.load().await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_reload_catalog(State(state): State<Arc<AppState>>) -> Result<Json<Catalog>, ApiError> {
  Ok(Json(state.store.reload().await?))
}

fn parse_index_filter(name: &str, raw: Option<&str>) -> Result<IndexFilter, ApiError> {
  match raw {
    None => Ok(IndexFilter::All),
    Some(s) => IndexFilter::parse(s)
      .ok_or_else(|| ApiError::BadRequest(format!("{} must be a catalog index or 'all', got '{}'", name, s))),
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_browse_lessons(
  State(state): State<Arc<AppState>>,
  Query(q): Query<LessonsQuery>,
) -> Result<impl IntoResponse, ApiError> {
  let filter = LessonFilter {
    query: q.q.unwrap_or_default(),
    topic: parse_index_filter("topic", q.topic.as_deref())?,
    language: parse_index_filter("language", q.language.as_deref())?,
  };
  let page = browse(&state, &filter, q.page.unwrap_or(1)).await?;
  Ok(Json(page))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_lesson(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<Lesson>, ApiError> {
  Ok(Json(state.store.get(&id).await?))
}

#[instrument(level = "info", skip(state, body), fields(id = %body.id))]
pub async fn http_create_lesson(
  State(state): State<Arc<AppState>>,
  Json(body): Json<Lesson>,
) -> Result<impl IntoResponse, ApiError> {
  let created = state.store.create(body).await?;
  info!(target: "catalog", id = %created.id, "HTTP lesson created");
  Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_update_lesson(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<Lesson>,
) -> Result<Json<Lesson>, ApiError> {
  let mut body = body;
  if body.id.trim().is_empty() {
    body.id = id.clone();
  } else if body.id != id {
    return Err(ApiError::BadRequest(format!("lessonId '{}' does not match path '{}'", body.id, id)));
  }
  Ok(Json(state.store.update(body).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_delete_lesson(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<Lesson>, ApiError> {
  Ok(Json(state.store.delete(&id).await?))
}

#[instrument(level = "info", skip(state, body), fields(prompt_len = body.prompt.len(), max_duration = ?body.max_duration))]
pub async fn http_assemble_course(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AssembleIn>,
) -> Result<Json<AssembleOut>, ApiError> {
  let course = assemble_course(&state, &body.prompt, body.max_duration).await?;
  info!(target: "course", picked = course.lessons.len(), total = course.total_minutes, "HTTP course assembled");
  Ok(Json(AssembleOut {
    lessons: course.lessons,
    total_duration: course.total_minutes,
    max_duration: course.budget_minutes,
    description: course.description,
  }))
}

#[instrument(level = "info", skip(state, body), fields(count = body.lesson_ids.len()))]
pub async fn http_describe_course(
  State(state): State<Arc<AppState>>,
  Json(body): Json<DescribeIn>,
) -> Result<Json<DescribeOut>, ApiError> {
  let (stats, description) = describe_lessons(&state, &body.lesson_ids).await?;
  Ok(Json(DescribeOut { stats, description }))
}
