//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::describe::CourseStats;
use crate::domain::Lesson;
use crate::filter::{lenient_page, IndexFilter, Page};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    ToggleLesson {
        #[serde(rename = "lessonId")]
        lesson_id: String,
    },
    RemoveLesson {
        #[serde(rename = "lessonId")]
        lesson_id: String,
    },
    Reset,
    Regenerate,
    EditDescription {
        text: String,
    },
    Assemble {
        prompt: String,
        #[serde(rename = "maxDuration", default)]
        max_duration: Option<u32>,
    },
    /// Absent fields keep the session's current value.
    Browse {
        #[serde(default)]
        query: Option<String>,
        #[serde(default)]
        topic: Option<IndexFilter>,
        #[serde(default)]
        language: Option<IndexFilter>,
        #[serde(default, deserialize_with = "lenient_page")]
        page: Option<usize>,
    },
    SetLanguage {
        language: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Selection(SelectionOut),
    Page(Page<Lesson>),
    Language { language: String },
    Error { message: String },
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SelectionOut {
    pub lesson_ids: Vec<String>,
    pub total_duration: u32,
    pub description: String,
    pub description_edited: bool,
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize, Default)]
pub struct LessonsQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "lenient_page")]
    pub page: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct AssembleIn {
    pub prompt: String,
    #[serde(rename = "maxDuration", default)]
    pub max_duration: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembleOut {
    pub lessons: Vec<Lesson>,
    pub total_duration: u32,
    pub max_duration: u32,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct DescribeIn {
    #[serde(rename = "lessonIds")]
    pub lesson_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DescribeOut {
    pub stats: CourseStats,
    pub description: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub source: &'static str,
}
