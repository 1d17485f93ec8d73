//! Share entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use sharedrop_core::error::AppError;
use sharedrop_core::result::AppResult;
use sharedrop_core::types::ShareId;

/// A password-gated, optionally time-bounded grant of browsing access to
/// one folder tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Share {
    /// Share identifier (appears in the share link).
    pub id: ShareId,
    /// Root folder exposed by the share.
    pub folder_path: String,
    /// Access password. Never serialized into responses.
    #[serde(skip_serializing, default)]
    pub password: String,
    /// When the share stops being valid.
    pub expires_at: Option<DateTime<Utc>>,
    /// When the share was created.
    pub created_at: DateTime<Utc>,
    /// Number of times the share page has been opened.
    pub access_count: i64,
}

impl Share {
    /// Build a new share expiring `expires_in_hours` from now, if given.
    ///
    /// Fails when the expiry cannot be represented as a timestamp.
    pub fn new(
        folder_path: impl Into<String>,
        password: impl Into<String>,
        expires_in_hours: Option<i64>,
    ) -> AppResult<Self> {
        let now = Utc::now();
        let expires_at = expires_in_hours
            .map(|h| {
                Duration::try_hours(h)
                    .and_then(|lifetime| now.checked_add_signed(lifetime))
                    .ok_or_else(|| {
                        AppError::validation(format!("expires_in_hours {h} is out of range"))
                    })
            })
            .transpose()?;

        Ok(Self {
            id: ShareId::generate(),
            folder_path: folder_path.into(),
            password: password.into(),
            expires_at,
            created_at: now,
            access_count: 0,
        })
    }

    /// Whether the share has passed its expiry.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_not_serialized() {
        let share = Share::new("/photos/wedding", "hunter2", None).unwrap();
        let json = serde_json::to_value(&share).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["folder_path"], "/photos/wedding");
    }

    #[test]
    fn test_expiry() {
        let mut share = Share::new("/p", "pw", Some(1)).unwrap();
        assert!(!share.is_expired());
        share.expires_at = Some(Utc::now() - Duration::seconds(1));
        assert!(share.is_expired());
    }

    #[test]
    fn test_unrepresentable_expiry_rejected() {
        assert!(Share::new("/p", "pw", Some(i64::MAX)).is_err());
        assert!(Share::new("/p", "pw", Some(i64::MAX / 3600)).is_err());
    }
}
