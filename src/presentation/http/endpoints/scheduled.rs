use std::sync::Arc;

use poem::Result as PoemResult;
use poem_openapi::{OpenApi, payload::Json};

use crate::presentation::http::{
    endpoints::root::{ApiState, EndpointsTags},
    errors::internal_error,
    mappers::{map_message, map_sweep_report},
    responses::{MessageDto, SweepReportDto},
};

#[derive(Clone)]
pub struct ScheduledEndpoints {
    state: Arc<ApiState>,
}

impl ScheduledEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl ScheduledEndpoints {
    /// Messages still waiting for delivery, earliest first.
    #[oai(path = "/scheduled", method = "get", tag = EndpointsTags::Scheduled)]
    pub async fn list_scheduled(&self) -> PoemResult<Json<Vec<MessageDto>>> {
        let messages = self
            .state
            .list_scheduled_usecase
            .execute()
            .await
            .map_err(internal_error)?;

        Ok(Json(messages.iter().map(map_message).collect()))
    }

    /// Deliver every due scheduled message. Meant for an external cron.
    #[oai(path = "/scheduled/run", method = "post", tag = EndpointsTags::Scheduled)]
    pub async fn run_sweep(&self) -> PoemResult<Json<SweepReportDto>> {
        let report = self
            .state
            .run_sweep_usecase
            .execute()
            .await
            .map_err(internal_error)?;

        Ok(Json(map_sweep_report(&report)))
    }
}
