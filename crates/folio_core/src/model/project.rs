//! Project cards shown on the Projects page.
//!
//! # Invariants
//! - `technologies` holds trimmed, non-empty, case-insensitively unique tags
//!   once a project has passed through `normalize()`.
//! - Every link present on a persisted project is an `http(s)://` URL.

use crate::model::record::{
    require_http_url, require_id, require_text, Record, RecordId, RecordValidationError, Showcase,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const PROJECTS_STORAGE_KEY: &str = "website_projects_data";

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "ProjectLinks::is_empty")]
    pub links: ProjectLinks,
    #[serde(default = "visible_by_default")]
    pub is_visible: bool,
    #[serde(default)]
    pub is_newest: bool,
}

pub(crate) fn visible_by_default() -> bool {
    true
}

/// External links rendered as buttons on a project card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other: Vec<NamedLink>,
}

impl ProjectLinks {
    pub fn is_empty(&self) -> bool {
        self.github.is_none() && self.demo.is_none() && self.other.is_empty()
    }
}

/// Extra labelled link such as "Research Paper".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedLink {
    pub label: String,
    pub url: String,
}

impl NamedLink {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

impl Project {
    pub fn new(id: impl Into<RecordId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            image_url: None,
            technologies: Vec::new(),
            links: ProjectLinks::default(),
            is_visible: true,
            is_newest: false,
        }
    }

    pub fn with_github(mut self, url: impl Into<String>) -> Self {
        self.links.github = Some(url.into());
        self
    }

    pub fn with_demo(mut self, url: impl Into<String>) -> Self {
        self.links.demo = Some(url.into());
        self
    }

    pub fn newest(mut self) -> Self {
        self.is_newest = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_technologies<I, T>(mut self, technologies: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.technologies = technologies.into_iter().map(Into::into).collect();
        self
    }
}

impl Record for Project {
    const KIND: &'static str = "projects";
    const STORAGE_KEY: &'static str = PROJECTS_STORAGE_KEY;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn defaults() -> Vec<Self> {
        vec![
            Project::new("1", "Energy Data Analysis Dashboard")
                .with_description("Interactive dashboard for analyzing energy consumption patterns")
                .with_image_url("/images/project1.jpg")
                .with_technologies(["React", "D3.js", "Python"])
                .newest(),
            Project::new("2", "Renewable Energy Forecasting")
                .with_description("Machine learning model to predict renewable energy generation")
                .with_image_url("/images/project2.jpg")
                .with_technologies(["TensorFlow", "Python", "SQL"])
                .newest(),
        ]
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        require_id(&self.id)?;
        require_text("title", &self.title)?;
        if let Some(url) = &self.links.github {
            require_http_url("links.github", url)?;
        }
        if let Some(url) = &self.links.demo {
            require_http_url("links.demo", url)?;
        }
        for link in &self.links.other {
            require_text("links.other.label", &link.label)?;
            require_http_url("links.other.url", &link.url)?;
        }
        Ok(())
    }

    fn normalize(&mut self) {
        self.technologies = normalize_technologies(&self.technologies);
        self.image_url = non_blank(self.image_url.take());
        self.links.github = non_blank(self.links.github.take());
        self.links.demo = non_blank(self.links.demo.take());
        for link in &mut self.links.other {
            link.label = link.label.trim().to_string();
            link.url = link.url.trim().to_string();
        }
    }
}

impl Showcase for Project {
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

/// Trims an optional field, mapping blank text to `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Trims tags, collapses inner whitespace and drops empty or repeated
/// (case-insensitive) entries while keeping first-seen order.
pub fn normalize_technologies(values: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut normalized = Vec::with_capacity(values.len());
    for value in values {
        let collapsed = WHITESPACE_RE.replace_all(value.trim(), " ").into_owned();
        if collapsed.is_empty() {
            continue;
        }
        if seen.insert(collapsed.to_lowercase()) {
            normalized.push(collapsed);
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::{normalize_technologies, NamedLink, Project};
    use crate::model::record::{Record, RecordValidationError};

    #[test]
    fn normalize_technologies_dedupes_case_insensitively() {
        let input = vec![
            " Python ".to_string(),
            "machine   learning".to_string(),
            "python".to_string(),
            String::new(),
            "SQL".to_string(),
        ];
        assert_eq!(
            normalize_technologies(&input),
            vec!["Python", "machine learning", "SQL"]
        );
    }

    #[test]
    fn sparse_json_decodes_with_empty_optionals() {
        let project: Project = serde_json::from_str(r#"{"id":"x","title":"T"}"#).unwrap();
        assert_eq!(project, Project::new("x", "T"));
    }

    #[test]
    fn wire_format_uses_camel_case_and_skips_empty_optionals() {
        let json = serde_json::to_value(Project::new("x", "T").with_image_url("/a.png")).unwrap();
        assert_eq!(json["imageUrl"], "/a.png");
        assert!(json.get("technologies").is_none());
    }

    #[test]
    fn normalize_drops_blank_image_url() {
        let mut project = Project::new("x", "T").with_image_url("  ");
        project.normalize();
        assert_eq!(project.image_url, None);
    }

    #[test]
    fn links_and_flags_use_site_wire_names() {
        let mut project = Project::new("x", "T")
            .with_github("https://github.com/me/grid")
            .newest();
        project
            .links
            .other
            .push(NamedLink::new("Research Paper", "https://example.com/paper"));

        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["links"]["github"], "https://github.com/me/grid");
        assert_eq!(json["links"]["other"][0]["label"], "Research Paper");
        assert!(json["links"].get("demo").is_none());
        assert_eq!(json["isVisible"], true);
        assert_eq!(json["isNewest"], true);
    }

    #[test]
    fn missing_flags_decode_as_visible_and_not_newest() {
        let project: Project = serde_json::from_str(r#"{"id":"x","title":"T"}"#).unwrap();
        assert!(project.is_visible);
        assert!(!project.is_newest);
        assert!(project.links.is_empty());
    }

    #[test]
    fn validate_rejects_non_http_demo_link() {
        let project = Project::new("x", "T").with_demo("ftp://example.com");
        assert_eq!(
            project.validate(),
            Err(RecordValidationError::InvalidUrl {
                field: "links.demo",
                value: "ftp://example.com".to_string(),
            })
        );
    }

    #[test]
    fn normalize_drops_blank_links() {
        let mut project = Project::new("x", "T").with_github("   ");
        project.normalize();
        assert!(project.links.is_empty());
        assert!(project.validate().is_ok());
    }
}
