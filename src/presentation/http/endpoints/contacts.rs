use std::sync::Arc;

use poem::Result as PoemResult;
use poem_openapi::{OpenApi, payload::Json};

use crate::{
    domain::models::NewContact,
    presentation::http::{
        endpoints::root::{ApiState, EndpointsTags},
        errors::dispatch_error,
        mappers::map_contact,
        requests::CreateContactRequestDto,
        responses::ContactDto,
    },
};

#[derive(Clone)]
pub struct ContactsEndpoints {
    state: Arc<ApiState>,
}

impl ContactsEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl ContactsEndpoints {
    #[oai(path = "/contacts", method = "post", tag = EndpointsTags::Contacts)]
    pub async fn create_contact(
        &self,
        request: Json<CreateContactRequestDto>,
    ) -> PoemResult<Json<ContactDto>> {
        let request = request.0;
        let contact = self
            .state
            .create_contact_usecase
            .execute(NewContact {
                name: request.name,
                phone: request.phone,
                email: request.email,
                social_handles: request.social_handles,
                metadata: request.metadata,
            })
            .await
            .map_err(dispatch_error)?;

        Ok(Json(map_contact(&contact)))
    }
}
