use std::collections::HashMap;
use std::sync::Arc;

use arq_catalog::Catalog;
use arq_core::{GeoPoint, Session, Update};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::targeting::{TargetChoice, select_target};

/// Open sessions one server keeps before refusing new ones.
pub const DEFAULT_MAX_SESSIONS: usize = 64;

/// MCP host for proximity sessions.
///
/// Every tool call takes the state lock, so sensor events from one host
/// are applied to a session strictly in call order.
#[derive(Clone)]
pub struct ArqServer {
    state: Arc<Mutex<ServerState>>,
    tool_router: ToolRouter<Self>,
}

struct ServerState {
    catalog: Catalog,
    sessions: HashMap<Uuid, Session>,
    max_sessions: usize,
}

impl ArqServer {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_session_limit(catalog, DEFAULT_MAX_SESSIONS)
    }

    pub fn with_session_limit(catalog: Catalog, max_sessions: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(ServerState {
                catalog,
                sessions: HashMap::new(),
                max_sessions,
            })),
            tool_router: Self::tool_router(),
        }
    }

    fn update_json(update: &Update) -> serde_json::Value {
        serde_json::json!({
            "snapshot": update.snapshot,
            "event": update.event,
        })
    }
}

fn parse_session_id(raw: &str) -> Result<Uuid, McpError> {
    Uuid::parse_str(raw)
        .map_err(|e| McpError::invalid_params(format!("invalid session_id: {e}"), None))
}

fn session_mut<'a>(
    sessions: &'a mut HashMap<Uuid, Session>,
    raw_id: &str,
) -> Result<&'a mut Session, McpError> {
    let id = parse_session_id(raw_id)?;
    sessions
        .get_mut(&id)
        .ok_or_else(|| McpError::invalid_params(format!("unknown session {id}"), None))
}

fn json_result(value: &serde_json::Value) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(value).unwrap_or_default(),
    )]))
}

// --- Tool parameter types ---

#[derive(Debug, Default, Deserialize, JsonSchema)]
struct StartSessionRequest {
    /// AR deep link such as "/ar?lat=51.1283&lng=71.4305"
    link: Option<String>,
    /// Catalog quest id (use together with task_id)
    quest_id: Option<String>,
    /// Task id inside quest_id
    task_id: Option<String>,
    /// Explicit target latitude (use together with longitude)
    latitude: Option<f64>,
    /// Explicit target longitude
    longitude: Option<f64>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct PositionRequest {
    session_id: String,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct HeadingRequest {
    session_id: String,
    /// Raw compass reading in degrees
    degrees: f64,
    /// True when the platform compass grows counter-clockwise
    inverted: Option<bool>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SessionRequest {
    session_id: String,
}

#[tool_router]
impl ArqServer {
    #[tool(
        description = "Start a proximity session. Give an AR link, a quest_id/task_id pair, or latitude/longitude for a fixed target; give none for demo mode, where a target is placed a few meters ahead of the first position fix. Returns the session_id used by the other tools."
    )]
    async fn arq_start_session(
        &self,
        Parameters(req): Parameters<StartSessionRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut state = self.state.lock().await;
        let ServerState {
            catalog,
            sessions,
            max_sessions,
        } = &mut *state;
        if sessions.len() >= *max_sessions {
            return Err(McpError::invalid_request(
                format!("session limit of {max_sessions} reached, end one with arq_end_session"),
                None,
            ));
        }

        let point = match (req.latitude, req.longitude) {
            (Some(lat), Some(lng)) => Some(
                GeoPoint::new(lat, lng)
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?,
            ),
            (None, None) => None,
            _ => {
                return Err(McpError::invalid_params(
                    "latitude and longitude must be given together",
                    None,
                ));
            }
        };
        let choice = TargetChoice {
            link: req.link.as_deref(),
            quest: req.quest_id.as_deref(),
            task: req.task_id.as_deref(),
            point,
        };
        let target = select_target(catalog, &choice)
            .map_err(|e| McpError::invalid_params(format!("{e:#}"), None))?;

        let session = Session::new(catalog.engine, target)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        let snapshot = session.snapshot();
        let id = Uuid::new_v4();
        sessions.insert(id, session);
        tracing::info!(%id, demo = target.is_none(), "session started");

        json_result(&serde_json::json!({
            "session_id": id.to_string(),
            "snapshot": snapshot,
        }))
    }

    #[tool(
        description = "Feed a position fix into a session. Returns the updated snapshot and, exactly once per session, a collected event. Out-of-range coordinates are rejected and the session keeps its previous state."
    )]
    async fn arq_position(
        &self,
        Parameters(req): Parameters<PositionRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut state = self.state.lock().await;
        let session = session_mut(&mut state.sessions, &req.session_id)?;
        let update = session
            .on_position_update(req.latitude, req.longitude)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        json_result(&Self::update_json(&update))
    }

    #[tool(
        description = "Feed a compass heading into a session. Set inverted for platforms whose compass grows counter-clockwise."
    )]
    async fn arq_heading(
        &self,
        Parameters(req): Parameters<HeadingRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut state = self.state.lock().await;
        let session = session_mut(&mut state.sessions, &req.session_id)?;
        let update = session.on_heading_update(req.degrees, req.inverted.unwrap_or(false));
        json_result(&Self::update_json(&update))
    }

    #[tool(description = "Read the current snapshot of a session without changing it.")]
    async fn arq_snapshot(
        &self,
        Parameters(req): Parameters<SessionRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut state = self.state.lock().await;
        let session = session_mut(&mut state.sessions, &req.session_id)?;
        json_result(&serde_json::json!({ "snapshot": session.snapshot() }))
    }

    #[tool(description = "End a session and drop its state.")]
    async fn arq_end_session(
        &self,
        Parameters(req): Parameters<SessionRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut state = self.state.lock().await;
        let id = parse_session_id(&req.session_id)?;
        let ended = state.sessions.remove(&id).is_some();
        json_result(&serde_json::json!({ "ended": ended }))
    }

    #[tool(description = "List quests and tasks. Tasks with a location carry an AR link.")]
    async fn arq_quests(&self) -> Result<CallToolResult, McpError> {
        let state = self.state.lock().await;
        let quests: Vec<_> = state
            .catalog
            .quests
            .iter()
            .map(|q| {
                let tasks: Vec<_> = q
                    .tasks
                    .iter()
                    .map(|t| {
                        serde_json::json!({
                            "id": t.id,
                            "text": t.text,
                            "ar_link": t.ar_link(),
                        })
                    })
                    .collect();
                serde_json::json!({
                    "id": q.id,
                    "title": q.title,
                    "description": q.description,
                    "tasks": tasks,
                })
            })
            .collect();
        json_result(&serde_json::json!({ "quests": quests }))
    }
}

#[tool_handler]
impl ServerHandler for ArqServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "AR quest proximity engine.\n\n\
                 1. Call arq_start_session with a quest task, AR link, or nothing for demo mode.\n\
                 2. Forward every position fix to arq_position and every compass reading to arq_heading, \
                    in the order the device reports them.\n\
                 3. Render the returned snapshot: distance_m is null while unknown; angle_offset_deg is \
                    negative when the target is to the left; placement_scale shrinks towards the \
                    visibility threshold.\n\
                 4. A collected event arrives once; the session stays COLLECTED afterwards.\n\
                 5. Call arq_end_session when done. Open sessions are capped and new starts fail \
                    once the cap is reached."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
