use std::sync::Arc;

use crate::domain::{
    models::Message,
    repositories::{MAX_LIST_LIMIT, MessageFilter, MessageRepository},
};

pub struct ListMessagesUseCase {
    repo: Arc<dyn MessageRepository>,
}

impl ListMessagesUseCase {
    pub fn new(repo: Arc<dyn MessageRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, mut filter: MessageFilter) -> anyhow::Result<Vec<Message>> {
        filter.limit = filter.limit.clamp(1, MAX_LIST_LIMIT);
        self.repo.list(&filter).await
    }
}
