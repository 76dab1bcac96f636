use std::sync::Arc;

use tracing::info;

use crate::domain::{
    errors::DispatchError,
    models::{Contact, NewContact},
    repositories::ContactRepository,
};

pub struct CreateContactUseCase {
    repo: Arc<dyn ContactRepository>,
}

impl CreateContactUseCase {
    pub fn new(repo: Arc<dyn ContactRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, request: NewContact) -> Result<Contact, DispatchError> {
        let contact = self.repo.insert(request.normalized()?).await?;
        info!(contact_id = %contact.id, "contact created");
        Ok(contact)
    }
}
