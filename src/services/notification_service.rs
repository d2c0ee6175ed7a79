use std::sync::Arc;

use uuid::Uuid;

use crate::domain::lifecycle::StatusNotice;
use crate::dto::notification_dto::{NotificationFilter, NotificationListResponse};
use crate::error::{Error, Result};
use crate::gateway::RecordStore;
use crate::models::notification::{NewNotification, Notification};

#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn RecordStore>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn notify(&self, user_id: Uuid, notice: StatusNotice) -> Result<Notification> {
        self.store
            .insert_notification(NewNotification {
                user_id,
                title: notice.title,
                message: notice.message,
                kind: notice.kind,
            })
            .await
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        filter: NotificationFilter,
    ) -> Result<NotificationListResponse> {
        let all = self.store.list_notifications(user_id).await?;
        let unread_count = all.iter().filter(|n| !n.read).count();
        let items = all.into_iter().filter(|n| filter.keeps(n)).collect();
        Ok(NotificationListResponse {
            items,
            unread_count,
        })
    }

    pub async fn mark_read(&self, user_id: Uuid, id: Uuid) -> Result<Notification> {
        self.store.mark_notification_read(id, user_id).await
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        let updated = self.store.mark_all_notifications_read(user_id).await?;
        tracing::debug!(user_id = %user_id, updated, "notifications marked read");
        Ok(updated)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        if self.store.delete_notification(id, user_id).await? {
            Ok(())
        } else {
            Err(Error::NotFound("Notification not found".into()))
        }
    }
}
