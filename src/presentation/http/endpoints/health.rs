use poem_openapi::{OpenApi, payload::Json};

use crate::presentation::http::{endpoints::root::EndpointsTags, responses::HealthDto};

/// Liveness probe. Also reports how the process was wired at startup.
pub struct HealthEndpoints {
    storage: &'static str,
    sweep_interval_secs: Option<u64>,
}

impl HealthEndpoints {
    pub fn new(storage: &'static str, sweep_interval_secs: Option<u64>) -> Self {
        Self {
            storage,
            sweep_interval_secs,
        }
    }
}

#[OpenApi]
impl HealthEndpoints {
    #[oai(path = "/health", method = "get", tag = EndpointsTags::Health)]
    pub async fn health(&self) -> Json<HealthDto> {
        Json(HealthDto {
            status: "ok".to_string(),
            storage: self.storage.to_string(),
            sweep_interval_secs: self.sweep_interval_secs,
        })
    }
}
