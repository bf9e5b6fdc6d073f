use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod application;
mod auth;
mod models;
mod routes;
mod services;

use adapters::{
    HttpCallAnalyzer, HttpMemoryService, PgCallLogRepository, PgScoreHistoryRepository,
    PgUserRepository, PlatformClient, ProfileContextBuilder,
};
use application::{CallService, InboundService, ToolService};
use kizuna::{
    CallingPlatform, ScoreAggregator, ScoreHistoryRepository, SessionRegistry, TokenAuthority,
    WebhookVerifier,
};
use services::availability::RuleAvailability;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub admin_api_key: Option<String>,
    pub token_authority: TokenAuthority,
    pub webhook_verifier: WebhookVerifier,
    pub sessions: Arc<SessionRegistry>,
    pub call_service: Arc<CallService>,
    pub tool_service: Arc<ToolService>,
    pub inbound_service: Arc<InboundService>,
    pub history: Arc<dyn ScoreHistoryRepository>,
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "Kizuna API is running - every call deepens the bond".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("📞 Kizuna API initializing...");

    // Shared secrets. Missing signing secrets are deployment errors,
    // not per-call errors: fail here, loudly.
    let token_secret = secrets
        .get("KIZUNA_TOKEN_SECRET")
        .expect("KIZUNA_TOKEN_SECRET must be configured");
    let webhook_secret = secrets
        .get("KIZUNA_WEBHOOK_SECRET")
        .expect("KIZUNA_WEBHOOK_SECRET must be configured");

    let admin_api_key = secrets.get("KIZUNA_API_KEY");
    if admin_api_key.is_some() {
        tracing::info!("🔐 Admin API key authentication enabled");
    } else {
        tracing::warn!("⚠️  No KIZUNA_API_KEY set - admin authentication disabled");
    }

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("✅ Database migrations completed");

    // External collaborators
    let analyzer_url = secrets
        .get("ANALYZER_URL")
        .unwrap_or_else(|| "http://localhost:8801".to_string());
    let memory_url = secrets
        .get("MEMORY_URL")
        .unwrap_or_else(|| "http://localhost:8802".to_string());

    let analyzer = Arc::new(HttpCallAnalyzer::new(analyzer_url));
    let memory = Arc::new(HttpMemoryService::new(memory_url));

    // Outbound dialing is optional: without platform credentials the
    // API still serves inbound calls and tools.
    let platform_agent_id = secrets.get("PLATFORM_AGENT_ID");
    let platform: Option<Arc<dyn CallingPlatform>> =
        match (secrets.get("PLATFORM_API_KEY"), platform_agent_id.clone()) {
            (Some(api_key), Some(agent_id)) => {
                let base_url = secrets
                    .get("PLATFORM_API_URL")
                    .unwrap_or_else(|| "https://api.elevenlabs.io".to_string());
                tracing::info!("📡 Calling platform client initialized");
                Some(Arc::new(PlatformClient::new(base_url, api_key, agent_id)))
            }
            _ => {
                tracing::warn!("⚠️  No PLATFORM_API_KEY/PLATFORM_AGENT_ID set - outbound dialing disabled");
                None
            }
        };

    // Repositories
    let users = Arc::new(PgUserRepository::new(pool.clone()));
    let history: Arc<dyn ScoreHistoryRepository> =
        Arc::new(PgScoreHistoryRepository::new(pool.clone()));
    let call_logs = Arc::new(PgCallLogRepository::new(pool.clone()));

    // Core protocol components
    let token_authority = TokenAuthority::new(token_secret);
    let webhook_verifier = WebhookVerifier::new(webhook_secret);
    let sessions = Arc::new(SessionRegistry::new());
    let context = Arc::new(ProfileContextBuilder::new(secrets.get("PERSONA_LANGUAGE")));
    let availability = Arc::new(RuleAvailability::new(None));

    // Application services
    let call_service = Arc::new(CallService::new(
        users.clone(),
        history.clone(),
        call_logs,
        context.clone(),
        platform,
        token_authority.clone(),
        sessions.clone(),
        ScoreAggregator::new(analyzer.clone()),
        platform_agent_id.clone(),
    ));
    let tool_service = Arc::new(ToolService::new(users.clone(), memory, analyzer));
    let inbound_service = Arc::new(InboundService::new(
        users,
        availability,
        context,
        token_authority.clone(),
        sessions.clone(),
        platform_agent_id,
    ));

    // Create application state
    let state = AppState {
        admin_api_key,
        token_authority,
        webhook_verifier,
        sessions,
        call_service,
        tool_service,
        inbound_service,
        history,
    };

    // Operator routes (require admin authentication)
    let protected_routes = Router::new()
        .merge(routes::call::router())
        .merge(routes::users::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::admin_auth,
        ));

    // Platform-facing routes carry their own trust boundaries:
    // capability tokens for tools, signatures for webhooks.
    let platform_routes = Router::new()
        .merge(routes::inbound::router())
        .merge(routes::tools::router())
        .merge(routes::webhook::router());

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    // Build router with shared state
    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(protected_routes)
        .merge(platform_routes)
        .layer(CorsLayer::permissive())
        .with_state(state);

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ Kizuna API ready - the line is open");

    Ok(router.into())
}
