//! Social profile links listed in the site footer and contact section.
//!
//! # Invariants
//! - An active link always carries an `http(s)://` URL.
//! - Inactive links may keep an empty URL as a placeholder.

use crate::model::record::{
    require_http_url, require_id, require_text, Record, RecordId, RecordValidationError,
};
use serde::{Deserialize, Serialize};

pub const SOCIAL_LINKS_STORAGE_KEY: &str = "website_social_links";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub id: RecordId,
    pub platform: String,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl SocialLink {
    pub fn new(id: impl Into<RecordId>, platform: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            platform: platform.into(),
            url: url.into(),
            is_active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

impl Record for SocialLink {
    const KIND: &'static str = "social";
    const STORAGE_KEY: &'static str = SOCIAL_LINKS_STORAGE_KEY;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn defaults() -> Vec<Self> {
        vec![
            SocialLink::new(
                "1",
                "LinkedIn",
                "https://www.linkedin.com/in/anooshiravan-mostmand/",
            ),
            SocialLink::new("2", "GitHub", "https://github.com/Anooshirvan"),
            SocialLink::new("3", "Google Scholar", "https://scholar.google.com"),
            SocialLink::new("4", "X (Twitter)", "").inactive(),
        ]
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        require_id(&self.id)?;
        require_text("platform", &self.platform)?;
        if self.is_active || !self.url.is_empty() {
            require_http_url("url", &self.url)?;
        }
        Ok(())
    }

    fn normalize(&mut self) {
        self.platform = self.platform.trim().to_string();
        self.url = self.url.trim().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::SocialLink;
    use crate::model::record::{Record, RecordValidationError};

    #[test]
    fn active_link_requires_http_url() {
        let link = SocialLink::new("9", "Mastodon", "mastodon.social/@me");
        assert_eq!(
            link.validate(),
            Err(RecordValidationError::InvalidUrl {
                field: "url",
                value: "mastodon.social/@me".to_string(),
            })
        );
    }

    #[test]
    fn inactive_placeholder_may_have_empty_url() {
        assert!(SocialLink::new("9", "X", "").inactive().validate().is_ok());
        assert!(SocialLink::new("9", "X", "").validate().is_err());
    }

    #[test]
    fn seed_links_are_valid() {
        for link in SocialLink::defaults() {
            link.validate().expect("seed link should validate");
        }
    }
}
