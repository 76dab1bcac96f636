use std::sync::Arc;

use crate::domain::{models::Message, repositories::MessageRepository};

pub struct ListScheduledUseCase {
    repo: Arc<dyn MessageRepository>,
}

impl ListScheduledUseCase {
    pub fn new(repo: Arc<dyn MessageRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> anyhow::Result<Vec<Message>> {
        self.repo.list_scheduled().await
    }
}
