//! Chat service.

use tracing::info;

use sharedrop_core::error::AppError;
use sharedrop_core::result::AppResult;
use sharedrop_core::types::ShareId;
use sharedrop_entity::collab::ChatMessage;
use sharedrop_realtime::message::builder::{build_chat_delete, build_chat_message};

use super::{file_name, user_name};
use crate::context::{ServiceContext, required};

/// Maximum length of one chat message.
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Posts, lists and deletes chat messages.
#[derive(Debug, Clone)]
pub struct ChatService {
    ctx: ServiceContext,
}

impl ChatService {
    /// Creates a new chat service.
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Saves a message and broadcasts `chat.message`.
    pub async fn post_message(
        &self,
        share_id: &ShareId,
        user: &str,
        message: &str,
        photo_ref: Option<&str>,
    ) -> AppResult<ChatMessage> {
        let user = user_name(user)?;
        let message = required("message", message, MAX_MESSAGE_LEN)?;
        let photo_ref = photo_ref
            .filter(|p| !p.trim().is_empty())
            .map(file_name)
            .transpose()?;
        self.ctx.require_share(share_id).await?;

        let chat = ChatMessage::new(share_id.clone(), user, message, photo_ref);
        self.ctx.store.save_chat_message(&chat).await?;
        self.ctx.publish(build_chat_message(&chat)).await;
        Ok(chat)
    }

    /// Chat history, oldest first.
    pub async fn list_messages(&self, share_id: &ShareId) -> AppResult<Vec<ChatMessage>> {
        self.ctx.require_share(share_id).await?;
        self.ctx.store.get_chat_messages(share_id).await
    }

    /// Deletes a message. Only its author may do so.
    pub async fn delete_message(
        &self,
        share_id: &ShareId,
        message_id: &str,
        user: &str,
    ) -> AppResult<()> {
        let user = user_name(user)?;
        self.ctx.require_share(share_id).await?;

        let message = self
            .ctx
            .store
            .find_chat_message(share_id, message_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Message '{message_id}' not found")))?;
        if message.user_name != user {
            return Err(AppError::forbidden("Only the author can delete a message"));
        }

        let deleted = self
            .ctx
            .store
            .delete_chat_message(share_id, message_id)
            .await?;
        if deleted {
            info!(share_id = %share_id, message_id, user = %user, "Chat message deleted");
            self.ctx
                .publish(build_chat_delete(share_id, &user, message_id))
                .await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sharedrop_core::error::ErrorKind;
    use sharedrop_realtime::EventType;
    use sharedrop_realtime::connection::ConnectionHandle;

    use super::*;
    use crate::context::test_support;

    #[tokio::test]
    async fn test_post_persists_then_broadcasts() {
        let (ctx, engine, share) = test_support::seeded().await;
        let (conn, mut rx) = ConnectionHandle::new(share.clone(), "ben", 8);
        engine.hub.register(conn).await.unwrap();
        let service = ChatService::new(ctx);

        let posted = service
            .post_message(&share, "ana", "hello", Some("a.jpg"))
            .await
            .unwrap();
        let messages = service.list_messages(&share).await.unwrap();
        assert_eq!(messages, vec![posted.clone()]);

        let payload = rx.recv().await.unwrap();
        let event: sharedrop_realtime::Event = serde_json::from_str(&payload).unwrap();
        assert_eq!(event.event_type, EventType::ChatMessage);
        assert_eq!(event.photo_id.as_deref(), Some("a.jpg"));
        assert_eq!(event.data.unwrap()["id"], posted.id);
    }

    #[tokio::test]
    async fn test_delete_requires_author() {
        let (ctx, _engine, share) = test_support::seeded().await;
        let service = ChatService::new(ctx);
        let posted = service
            .post_message(&share, "ana", "hi", None)
            .await
            .unwrap();

        let err = service
            .delete_message(&share, &posted.id, "ben")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        service
            .delete_message(&share, &posted.id, "ana")
            .await
            .unwrap();
        assert!(service.list_messages(&share).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let (ctx, _engine, share) = test_support::seeded().await;
        let service = ChatService::new(ctx);
        let err = service
            .post_message(&share, "ana", "  ", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
