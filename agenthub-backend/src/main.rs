use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use std::sync::Arc;

mod agents;
mod ai;
mod config;
mod controllers;
mod coordinate;
mod directive;
mod dispatch;
mod enrich;

use agents::AgentRegistry;
use ai::{GeminiClient, ModelClient, ModelGateway};
use config::Config;
use coordinate::executor::PlanExecutor;
use dispatch::AgentDispatcher;
use enrich::Enrichers;

pub struct AppState {
    pub config: Config,
    pub registry: Arc<AgentRegistry>,
    pub gateway: Arc<ModelGateway>,
    pub dispatcher: Arc<AgentDispatcher>,
    pub executor: Arc<PlanExecutor>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    // Check ./config first, then ../config (for running from a subdirectory)
    let config_dir = if std::path::Path::new("./config").exists() {
        std::path::Path::new("./config")
    } else if std::path::Path::new("../config").exists() {
        std::path::Path::new("../config")
    } else {
        panic!("Config directory not found in ./config or ../config");
    };
    log::info!("Using config directory: {:?}", config_dir);

    let registry = Arc::new(AgentRegistry::load(config_dir));

    let config = Config::from_env();
    let port = config.port;

    log::info!("Initializing model gateway");
    let primary = GeminiClient::new(&config.gemini_api_key, &config.gemini_model, "primary")
        .expect("Failed to create primary Gemini client");
    let secondary = match &config.gemini_api_key_secondary {
        Some(key) => {
            let client = GeminiClient::new(key, &config.gemini_model, "secondary")
                .expect("Failed to create secondary Gemini client");
            Some(Box::new(client) as Box<dyn ModelClient>)
        }
        None => {
            log::warn!("GEMINI_API_KEY_SECONDARY not set - model calls have no credential fallback");
            None
        }
    };
    let gateway = Arc::new(ModelGateway::new(Box::new(primary), secondary));

    log::info!("Initializing dispatcher and plan executor");
    let enrichers = Enrichers::new(config.clone(), gateway.clone());
    let dispatcher = Arc::new(AgentDispatcher::new(
        registry.clone(),
        gateway.clone(),
        enrichers,
    ));
    let executor = Arc::new(PlanExecutor::new(dispatcher.clone(), registry.clone()));

    log::info!("Starting AgentHub backend on port {}", port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                config: config.clone(),
                registry: Arc::clone(&registry),
                gateway: Arc::clone(&gateway),
                dispatcher: Arc::clone(&dispatcher),
                executor: Arc::clone(&executor),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::agent::config)
            .configure(controllers::coordinate::config)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
