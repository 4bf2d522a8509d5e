//! WebSocket upgrade + message loop for the course builder. Each connection owns
//! one `CourseSession`; client messages are parsed as JSON, applied to that
//! session, and answered with a single JSON message.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument, Instrument};
use uuid::Uuid;

use crate::logic::*;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::selection::CourseSession;
use crate::state::AppState;

#[instrument(level = "info", skip(ws, state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "lesson_catalog", "WebSocket upgrade requested");
  let session_id = Uuid::new_v4();
  let span = tracing::info_span!("builder_session", %session_id);
  ws.on_upgrade(move |socket| handle_ws(socket, state).instrument(span))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "lesson_catalog", "WebSocket connected");
  let mut session = CourseSession::default();
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "lesson_catalog", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state, &mut session).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "lesson_catalog", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => {
        let _ = socket.send(Message::Pong(payload)).await;
      }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "lesson_catalog", selected = session.selection.lessons().len(), "WebSocket disconnected");
}

fn selection_reply<E: std::fmt::Display>(res: Result<(), E>, session: &CourseSession) -> ServerWsMessage {
  match res {
    Ok(()) => ServerWsMessage::Selection(selection_out(session)),
    Err(e) => ServerWsMessage::Error { message: e.to_string() },
  }
}

/// Apply one client message to `session` and build the reply.
#[instrument(level = "info", skip(state, session))]
pub async fn handle_client_ws(msg: ClientWsMessage, state: &AppState, session: &mut CourseSession) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::ToggleLesson { lesson_id } => {
      let res = toggle_lesson(state, session, &lesson_id).await.map(|_| ());
      selection_reply(res, session)
    }

    ClientWsMessage::RemoveLesson { lesson_id } => {
      let res = remove_lesson(state, session, &lesson_id).await.map(|_| ());
      selection_reply(res, session)
    }

    ClientWsMessage::Reset => {
      session.reset();
      info!(target: "course", "WS selection reset");
      ServerWsMessage::Selection(selection_out(session))
    }

    ClientWsMessage::Regenerate => {
      let res = regenerate(state, session).await;
      selection_reply(res, session)
    }

    ClientWsMessage::EditDescription { text } => {
      session.edit_description(text);
      ServerWsMessage::Selection(selection_out(session))
    }

    ClientWsMessage::Assemble { prompt, max_duration } => {
      let res = assemble_into(state, session, &prompt, max_duration).await;
      info!(target: "course", picked = session.selection.lessons().len(), "WS course assembled");
      selection_reply(res, session)
    }

    ClientWsMessage::Browse { query, topic, language, page } => {
      match browse_session(state, session, query, topic, language, page).await {
        Ok(p) => ServerWsMessage::Page(p),
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }

    ClientWsMessage::SetLanguage { language } => match set_ui_language(session, &language) {
      Ok(()) => ServerWsMessage::Language { language: session.ui_language.clone() },
      Err(message) => ServerWsMessage::Error { message },
    },
  }
}
