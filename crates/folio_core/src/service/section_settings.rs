//! Persisted section visibility switches.
//!
//! # Invariants
//! - An absent stored object means every section is visible.
//! - In-memory flags change only after the store accepted the new object.

use crate::model::visibility::{Section, SectionVisibility, SECTION_VISIBILITY_STORAGE_KEY};
use crate::service::content_manager::ContentResult;
use crate::store::json::{try_read_value, write_value};
use crate::store::Store;
use log::info;

/// Loads, edits and saves the site's section visibility object.
pub struct SectionSettings<S: Store> {
    store: S,
    visibility: SectionVisibility,
}

impl<S: Store> SectionSettings<S> {
    /// Reads the stored flags, falling back to all-visible when absent.
    ///
    /// A corrupt stored object is surfaced, not replaced.
    pub fn open(store: S) -> ContentResult<Self> {
        let visibility: SectionVisibility =
            try_read_value(&store, SECTION_VISIBILITY_STORAGE_KEY)?.unwrap_or_default();
        Ok(Self { store, visibility })
    }

    pub fn visibility(&self) -> &SectionVisibility {
        &self.visibility
    }

    pub fn is_visible(&self, section: Section) -> bool {
        self.visibility.is_visible(section)
    }

    pub fn set(&mut self, section: Section, visible: bool) -> ContentResult<()> {
        let mut next = self.visibility;
        next.set(section, visible);
        self.commit(next, section)
    }

    /// Flips `section` and returns its new state.
    pub fn toggle(&mut self, section: Section) -> ContentResult<bool> {
        let mut next = self.visibility;
        let visible = next.toggle(section);
        self.commit(next, section)?;
        Ok(visible)
    }

    fn commit(&mut self, next: SectionVisibility, section: Section) -> ContentResult<()> {
        write_value(&self.store, SECTION_VISIBILITY_STORAGE_KEY, &next)?;
        info!(
            "event=section_visibility module=content status=ok section={} visible={}",
            section,
            next.is_visible(section)
        );
        self.visibility = next;
        Ok(())
    }
}
