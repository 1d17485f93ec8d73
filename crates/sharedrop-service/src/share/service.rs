//! Share CRUD service.

use serde::{Deserialize, Serialize};
use tracing::info;

use sharedrop_core::error::AppError;
use sharedrop_core::result::AppResult;
use sharedrop_core::types::ShareId;
use sharedrop_entity::share::{Share, ShareSession};

use crate::context::{ServiceContext, required};

/// Longest share lifetime accepted, one year.
pub const MAX_EXPIRY_HOURS: i64 = 8760;

/// Request to create a new share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShareRequest {
    /// Folder exposed by the share.
    pub folder_path: String,
    /// Password gating the share.
    pub password: String,
    /// Display name of the session; defaults to the folder name.
    pub session_name: Option<String>,
    /// Whether several people may join at once.
    pub allow_multiple: Option<bool>,
    /// Lifetime in hours (None = no expiry).
    pub expires_in_hours: Option<i64>,
}

/// Manages share creation and lookup.
#[derive(Debug, Clone)]
pub struct ShareService {
    ctx: ServiceContext,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Creates a share and its collaborative session.
    pub async fn create_share(&self, req: CreateShareRequest) -> AppResult<(Share, ShareSession)> {
        let folder_path = required("folder_path", &req.folder_path, 4096)?;
        if req.password.is_empty() {
            return Err(AppError::validation("password is required"));
        }
        if req
            .expires_in_hours
            .is_some_and(|h| !(1..=MAX_EXPIRY_HOURS).contains(&h))
        {
            return Err(AppError::validation(format!(
                "expires_in_hours must be between 1 and {MAX_EXPIRY_HOURS}"
            )));
        }

        let session_name = match req.session_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => folder_name(&folder_path),
        };

        let share = Share::new(folder_path, req.password, req.expires_in_hours)?;
        let session = ShareSession::new(
            share.id.clone(),
            session_name,
            req.allow_multiple.unwrap_or(true),
        );
        self.ctx.store.create_share(&share, &session).await?;

        info!(share_id = %share.id, session = %session.session_name, "Share created");
        Ok((share, session))
    }

    /// Returns a share and counts the access.
    pub async fn get_share(&self, share_id: &ShareId) -> AppResult<Share> {
        self.ctx.require_share(share_id).await?;
        self.ctx.store.record_share_access(share_id).await?;
        self.ctx.require_share(share_id).await
    }
}

fn folder_name(path: &str) -> String {
    path.trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("Shared folder")
        .to_string()
}

#[cfg(test)]
mod tests {
    use sharedrop_core::error::ErrorKind;

    use super::*;
    use crate::context::test_support;

    fn request(folder: &str) -> CreateShareRequest {
        CreateShareRequest {
            folder_path: folder.into(),
            password: "pw".into(),
            session_name: None,
            allow_multiple: None,
            expires_in_hours: Some(24),
        }
    }

    #[tokio::test]
    async fn test_create_defaults_session_name_to_folder() {
        let (ctx, _engine) = test_support::context().await;
        let service = ShareService::new(ctx);
        let (share, session) = service
            .create_share(request("/photos/Wedding 2024/"))
            .await
            .unwrap();

        assert_eq!(session.session_name, "Wedding 2024");
        assert!(session.allow_multiple);
        assert_eq!(share.id.as_str().len(), 8);
        assert!(share.expires_at.is_some());
    }

    #[tokio::test]
    async fn test_expiry_bounds_enforced() {
        let (ctx, _engine) = test_support::context().await;
        let service = ShareService::new(ctx);

        for hours in [0, MAX_EXPIRY_HOURS + 1, i64::MAX] {
            let mut req = request("/p");
            req.expires_in_hours = Some(hours);
            let err = service.create_share(req).await.unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation);
        }

        let mut req = request("/p");
        req.expires_in_hours = Some(MAX_EXPIRY_HOURS);
        assert!(service.create_share(req).await.is_ok());
    }

    #[tokio::test]
    async fn test_get_share_counts_access() {
        let (ctx, _engine) = test_support::context().await;
        let service = ShareService::new(ctx);
        let (share, _) = service.create_share(request("/p")).await.unwrap();

        service.get_share(&share.id).await.unwrap();
        let again = service.get_share(&share.id).await.unwrap();
        assert_eq!(again.access_count, 2);
    }

    #[tokio::test]
    async fn test_unknown_share_is_not_found() {
        let (ctx, _engine) = test_support::context().await;
        let service = ShareService::new(ctx);
        let missing = ShareId::parse("missing").unwrap();
        let err = service.get_share(&missing).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_folder_name() {
        assert_eq!(folder_name("/a/b/c"), "c");
        assert_eq!(folder_name("C:\\pics\\trip\\"), "trip");
        assert_eq!(folder_name("/"), "Shared folder");
    }
}
