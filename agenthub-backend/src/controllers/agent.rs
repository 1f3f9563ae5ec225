use crate::AppState;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRequest {
    pub agent_id: String,
    #[serde(default)]
    pub agent_name: String,
    pub user_message: String,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/agent").route(web::post().to(run_agent)));
}

/// Individual mode: one message through one agent.
async fn run_agent(state: web::Data<AppState>, body: web::Json<AgentRequest>) -> impl Responder {
    if body.user_message.trim().is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": "userMessage must not be empty"
        }));
    }

    // Echo the client's display name back, or fill it from the catalog.
    let agent_name = if body.agent_name.is_empty() {
        state.registry.resolve(&body.agent_id).name.clone()
    } else {
        body.agent_name.clone()
    };

    match state.dispatcher.dispatch(&body.agent_id, &body.user_message).await {
        Ok(response) => HttpResponse::Ok().json(json!({
            "success": true,
            "agentName": agent_name,
            "response": response
        })),
        Err(error) => {
            log::error!("[api] /api/agent failed: {}", error);
            HttpResponse::ServiceUnavailable().json(json!({
                "success": false,
                "error": "The assistant service is temporarily unavailable. Please try again later."
            }))
        }
    }
}
