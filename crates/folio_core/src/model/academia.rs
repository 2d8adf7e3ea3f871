//! Degrees and academic positions shown on the Academia page.

use crate::model::project::{non_blank, visible_by_default};
use crate::model::record::{
    require_http_url, require_id, require_text, Record, RecordId, RecordValidationError, Showcase,
};
use serde::{Deserialize, Serialize};

pub const ACADEMIA_STORAGE_KEY: &str = "website_academia_data";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademiaEntry {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub institution: String,
    /// Free text (`2020`, `2016-2018`).
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub description: String,
    /// Thesis, paper or program page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default = "visible_by_default")]
    pub is_visible: bool,
    #[serde(default)]
    pub is_newest: bool,
}

impl AcademiaEntry {
    pub fn new(
        id: impl Into<RecordId>,
        title: impl Into<String>,
        institution: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            institution: institution.into(),
            year: year.into(),
            description: String::new(),
            link: None,
            is_visible: true,
            is_newest: false,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl Record for AcademiaEntry {
    const KIND: &'static str = "academia";
    const STORAGE_KEY: &'static str = ACADEMIA_STORAGE_KEY;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn defaults() -> Vec<Self> {
        vec![
            AcademiaEntry::new(
                "1",
                "Ph.D. in Energy Engineering",
                "University of Energy Sciences",
                "2020",
            )
            .with_description("Research focused on optimization of energy systems"),
            AcademiaEntry::new(
                "2",
                "Master of Science in Data Analytics",
                "Data University",
                "2016",
            )
            .with_description("Specialized in big data analysis for energy applications"),
        ]
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        require_id(&self.id)?;
        require_text("title", &self.title)?;
        require_text("institution", &self.institution)?;
        if let Some(link) = &self.link {
            require_http_url("link", link)?;
        }
        Ok(())
    }

    fn normalize(&mut self) {
        self.year = self.year.trim().to_string();
        self.link = non_blank(self.link.take());
    }
}

impl Showcase for AcademiaEntry {
    fn is_visible(&self) -> bool {
        self.is_visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.is_visible = visible;
    }

    fn is_newest(&self) -> bool {
        self.is_newest
    }

    fn set_newest(&mut self, newest: bool) {
        self.is_newest = newest;
    }
}

#[cfg(test)]
mod tests {
    use super::AcademiaEntry;
    use crate::model::record::{Record, RecordValidationError};

    #[test]
    fn legacy_entry_without_link_or_flags_decodes() {
        let entry: AcademiaEntry = serde_json::from_str(
            r#"{"id":"1","title":"Ph.D.","institution":"Uni","year":"2020","description":""}"#,
        )
        .unwrap();
        assert_eq!(entry.link, None);
        assert!(entry.is_visible);
        assert!(!entry.is_newest);
    }

    #[test]
    fn link_must_be_http() {
        let entry = AcademiaEntry::new("3", "Postdoc", "Grid Lab", "2023").with_link("doi:10.1/x");
        assert!(matches!(
            entry.validate(),
            Err(RecordValidationError::InvalidUrl { field: "link", .. })
        ));
    }
}
