//! Per-section visibility switches toggled from the admin dashboard.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const SECTION_VISIBILITY_STORAGE_KEY: &str = "website_section_visibility";

/// Top-level site sections that can be hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Hero,
    About,
    Expertise,
    Projects,
    Academia,
    Contact,
    Social,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Hero,
        Section::About,
        Section::Expertise,
        Section::Projects,
        Section::Academia,
        Section::Contact,
        Section::Social,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Hero => "hero",
            Section::About => "about",
            Section::Expertise => "expertise",
            Section::Projects => "projects",
            Section::Academia => "academia",
            Section::Contact => "contact",
            Section::Social => "social",
        }
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown section `{}`; expected one of {}",
                    value.trim(),
                    Section::ALL.map(Section::as_str).join("|")
                )
            })
    }
}

/// Visibility flags stored as one JSON object keyed by section name.
///
/// Sections missing from a stored object decode as visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionVisibility {
    pub hero: bool,
    pub about: bool,
    pub expertise: bool,
    pub projects: bool,
    pub academia: bool,
    pub contact: bool,
    pub social: bool,
}

impl Default for SectionVisibility {
    fn default() -> Self {
        Self {
            hero: true,
            about: true,
            expertise: true,
            projects: true,
            academia: true,
            contact: true,
            social: true,
        }
    }
}

impl SectionVisibility {
    pub fn is_visible(&self, section: Section) -> bool {
        *self.flag(section)
    }

    pub fn set(&mut self, section: Section, visible: bool) {
        *self.flag_mut(section) = visible;
    }

    /// Flips one section and returns its new state.
    pub fn toggle(&mut self, section: Section) -> bool {
        let flag = self.flag_mut(section);
        *flag = !*flag;
        *flag
    }

    /// Sections currently hidden, in display order.
    pub fn hidden(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|section| !self.is_visible(*section))
            .collect()
    }

    fn flag(&self, section: Section) -> &bool {
        match section {
            Section::Hero => &self.hero,
            Section::About => &self.about,
            Section::Expertise => &self.expertise,
            Section::Projects => &self.projects,
            Section::Academia => &self.academia,
            Section::Contact => &self.contact,
            Section::Social => &self.social,
        }
    }

    fn flag_mut(&mut self, section: Section) -> &mut bool {
        match section {
            Section::Hero => &mut self.hero,
            Section::About => &mut self.about,
            Section::Expertise => &mut self.expertise,
            Section::Projects => &mut self.projects,
            Section::Academia => &mut self.academia,
            Section::Contact => &mut self.contact,
            Section::Social => &mut self.social,
        }
    }
}
