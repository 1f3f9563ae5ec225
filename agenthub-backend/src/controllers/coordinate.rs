use crate::AppState;
use crate::coordinate::{CoordinateError, compose_transcript, planner};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateRequest {
    pub user_message: String,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/coordinate").route(web::post().to(run_coordinate)));
}

/// Coordinate mode: generate a plan, execute it step by step, and return
/// the full transcript. Partial success is a normal outcome; only plan
/// generation itself can fail the request.
async fn run_coordinate(
    state: web::Data<AppState>,
    body: web::Json<CoordinateRequest>,
) -> impl Responder {
    if body.user_message.trim().is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": "userMessage must not be empty"
        }));
    }

    let plan = match planner::generate_plan(&state.gateway, &state.registry, &body.user_message).await
    {
        Ok(plan) => plan,
        Err(CoordinateError::MalformedPlan(detail)) => {
            log::error!("[api] /api/coordinate got an unusable plan: {}", detail);
            return HttpResponse::InternalServerError().json(json!({
                "success": false,
                "error": "The coordinator could not produce a valid plan. Please rephrase your request."
            }));
        }
        Err(CoordinateError::Gateway(error)) => {
            log::error!("[api] /api/coordinate gateway failure: {}", error);
            return HttpResponse::ServiceUnavailable().json(json!({
                "success": false,
                "error": "The assistant service is temporarily unavailable. Please try again later."
            }));
        }
    };

    let results = state.executor.execute(&plan).await;

    HttpResponse::Ok().json(json!({
        "success": true,
        "response": compose_transcript(&plan, &results)
    }))
}
