pub mod endpoints;
pub mod errors;
pub mod mappers;
pub mod requests;
pub mod responses;

use std::sync::Arc;

use poem::Route;
use poem_openapi::OpenApiService;

use endpoints::{
    contacts::ContactsEndpoints, health::HealthEndpoints, messages::MessagesEndpoints,
    root::ApiState, scheduled::ScheduledEndpoints, webhooks::WebhookEndpoints,
};

/// API under `/api`, Swagger UI at `/`.
pub fn routes(state: Arc<ApiState>, health: HealthEndpoints, server_url: &str) -> Route {
    let api_service = OpenApiService::new(
        (
            health,
            ContactsEndpoints::new(state.clone()),
            MessagesEndpoints::new(state.clone()),
            ScheduledEndpoints::new(state.clone()),
            WebhookEndpoints::new(state),
        ),
        "Inbox API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!("{}/api", server_url));
    let ui = api_service.swagger_ui();
    Route::new().nest("/api", api_service).nest("/", ui)
}
