use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Telegram user identity, used as the session key.
///
/// ```
/// use sitebot_core::UserId;
///
/// let user = UserId(42);
/// assert_eq!(user.0, 42);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A site that was successfully deployed for a user.
///
/// Appended to the owning session on deployment success, never mutated
/// or removed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublishedSite {
    /// Sanitized project name as accepted by the hosting platform.
    pub name: String,
    /// Public URL of the deployed site.
    pub url: String,
    /// RFC3339 timestamp.
    pub published_at: String,
    /// Opaque deployment reference on the hosting platform.
    pub deployment_id: String,
}

impl PublishedSite {
    /// Builds a record stamped with the current time.
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        deployment_id: impl Into<String>,
    ) -> Self {
        let published_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "1970-01-01T00:00:00Z".into());
        Self {
            name: name.into(),
            url: url.into(),
            published_at,
            deployment_id: deployment_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn published_site_stamps_rfc3339() {
        let site = PublishedSite::new("my-site", "https://my-site.example", "dpl_1");
        assert_eq!(site.name, "my-site");
        assert!(site.published_at.contains('T'));
        OffsetDateTime::parse(&site.published_at, &Rfc3339).expect("rfc3339 timestamp");
    }

    #[test]
    fn user_id_serializes_as_number() {
        let json = serde_json::to_string(&UserId(99)).unwrap();
        assert_eq!(json, "99");
    }
}
