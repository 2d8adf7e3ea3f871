//! Per-record-type CRUD manager.
//!
//! # Responsibility
//! - Seed a type's storage key with defaults when absent.
//! - Hold the loaded list and rewrite it in full on every mutation.
//!
//! # Invariants
//! - Ids are unique within the list; insertion order is the only order.
//! - The in-memory list changes only after the store accepted the new list.
//! - Mutations before the first successful `load` are rejected.

use crate::model::record::{Record, RecordId, RecordValidationError, Showcase};
use crate::store::json::{try_read_list, write_list};
use crate::store::{error_chain, Store, StoreError};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ContentResult<T> = Result<T, ContentError>;

/// Failure surfaced by content manager operations.
#[derive(Debug)]
pub enum ContentError {
    /// The list for `key` could not be encoded.
    Serialize {
        key: String,
        source: serde_json::Error,
    },
    /// The stored list for `key` could not be decoded.
    Corrupt {
        key: String,
        source: serde_json::Error,
    },
    /// Stored list decoded but breaks list invariants (blank or repeated ids).
    InvalidData(String),
    NotFound(RecordId),
    DuplicateId(RecordId),
    Validation(RecordValidationError),
    /// Mutation attempted before the list was loaded.
    NotLoaded,
    Store(StoreError),
}

impl Display for ContentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialize { key, .. } => write!(f, "failed to serialize `{key}`"),
            Self::Corrupt { key, .. } => write!(f, "stored `{key}` is corrupt"),
            Self::InvalidData(message) => write!(f, "invalid stored content: {message}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::DuplicateId(id) => write!(f, "record id already exists: {id}"),
            Self::Validation(err) => Display::fmt(err, f),
            Self::NotLoaded => write!(f, "content has not been loaded yet"),
            Self::Store(err) => Display::fmt(err, f),
        }
    }
}

impl Error for ContentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialize { source, .. } | Self::Corrupt { source, .. } => Some(source),
            // Validation and Store print their inner error directly.
            Self::Store(err) => err.source(),
            Self::Validation(_)
            | Self::InvalidData(_)
            | Self::NotFound(_)
            | Self::DuplicateId(_)
            | Self::NotLoaded => None,
        }
    }
}

impl From<StoreError> for ContentError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Serialize { key, source } => Self::Serialize { key, source },
            StoreError::Corrupt { key, source } => Self::Corrupt { key, source },
            other => Self::Store(other),
        }
    }
}

impl From<RecordValidationError> for ContentError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Borrowed snapshot handed to presentation code.
#[derive(Debug, PartialEq, Eq)]
pub struct ContentView<'a, T> {
    pub items: &'a [T],
    /// `true` until the first `load` completes.
    pub loading: bool,
}

// Only a slice borrow and a flag: copyable whatever `T` is.
impl<T> Clone for ContentView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ContentView<'_, T> {}

/// CRUD accessor for one record type over an injected store.
pub struct ContentManager<T: Record, S: Store> {
    store: S,
    items: Vec<T>,
    loading: bool,
}

impl<T: Record, S: Store> ContentManager<T, S> {
    /// Creates an unloaded manager. `list()` reports `loading = true` until
    /// `load()` succeeds.
    pub fn new(store: S) -> Self {
        Self {
            store,
            items: Vec::new(),
            loading: true,
        }
    }

    /// Creates a manager and loads it immediately.
    pub fn open(store: S) -> ContentResult<Self> {
        let mut manager = Self::new(store);
        manager.load()?;
        Ok(manager)
    }

    /// Seeds `T::defaults()` when the store has no value for `T::STORAGE_KEY`.
    ///
    /// Returns whether seeding happened. An existing value, even an empty
    /// list, is never overwritten.
    pub fn initialize(&self) -> ContentResult<bool> {
        if self.store.contains(T::STORAGE_KEY)? {
            return Ok(false);
        }

        let defaults = T::defaults();
        write_list(&self.store, T::STORAGE_KEY, &defaults)?;
        info!(
            "event=content_seed module=content status=ok kind={} count={}",
            T::KIND,
            defaults.len()
        );
        Ok(true)
    }

    /// Initializes defaults if needed, then replaces the in-memory list with
    /// the stored one.
    pub fn load(&mut self) -> ContentResult<()> {
        self.initialize()?;
        let items = match try_read_list::<T, _>(&self.store, T::STORAGE_KEY) {
            Ok(items) => items.unwrap_or_default(),
            Err(err) => {
                warn!(
                    "event=content_load module=content status=error kind={} error={}",
                    T::KIND,
                    error_chain(&err)
                );
                return Err(err.into());
            }
        };
        check_ids(&items)?;

        debug!(
            "event=content_load module=content status=ok kind={} count={}",
            T::KIND,
            items.len()
        );
        self.items = items;
        self.loading = false;
        Ok(())
    }

    pub fn list(&self) -> ContentView<'_, T> {
        ContentView {
            items: &self.items,
            loading: self.loading,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &RecordId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Appends a record carrying a caller-supplied id.
    ///
    /// # Errors
    /// - `DuplicateId` when the id is already present.
    /// - `Validation` when the record fails its field rules.
    pub fn add(&mut self, mut record: T) -> ContentResult<RecordId> {
        self.ensure_loaded()?;
        record.normalize();
        record.validate()?;
        let id = record.id().clone();
        if self.get(&id).is_some() {
            return Err(ContentError::DuplicateId(id));
        }

        let mut next = self.items.clone();
        next.push(record);
        self.commit(next, "add", &id)?;
        Ok(id)
    }

    /// Appends a record after stamping it with a freshly generated id.
    ///
    /// Any id already on `draft` is discarded.
    pub fn create(&mut self, mut draft: T) -> ContentResult<RecordId> {
        draft.set_id(RecordId::generate());
        self.add(draft)
    }

    /// Replaces the record whose id matches `record.id()`.
    pub fn update(&mut self, mut record: T) -> ContentResult<()> {
        self.ensure_loaded()?;
        record.normalize();
        record.validate()?;
        let id = record.id().clone();
        let position = self
            .position(&id)
            .ok_or_else(|| ContentError::NotFound(id.clone()))?;

        let mut next = self.items.clone();
        next[position] = record;
        self.commit(next, "update", &id)
    }

    /// Edits the record with `id` in place through `edit`, then persists it
    /// like `update`. Returns whatever `edit` returned.
    ///
    /// `edit` must not change the record's id.
    pub fn modify<R>(&mut self, id: &RecordId, edit: impl FnOnce(&mut T) -> R) -> ContentResult<R> {
        self.ensure_loaded()?;
        let mut record = self
            .get(id)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(id.clone()))?;
        let result = edit(&mut record);
        if record.id() != id {
            return Err(ContentError::InvalidData(format!(
                "edit of `{id}` changed its id to `{}`",
                record.id()
            )));
        }
        self.update(record)?;
        Ok(result)
    }

    /// Removes the record with `id` and returns it.
    pub fn delete(&mut self, id: &RecordId) -> ContentResult<T> {
        self.ensure_loaded()?;
        let position = self
            .position(id)
            .ok_or_else(|| ContentError::NotFound(id.clone()))?;

        let mut next = self.items.clone();
        let removed = next.remove(position);
        self.commit(next, "delete", id)?;
        Ok(removed)
    }

    /// Drops the stored list and reloads, which re-seeds the defaults.
    pub fn reset(&mut self) -> ContentResult<()> {
        self.store.remove(T::STORAGE_KEY)?;
        self.loading = true;
        self.items.clear();
        info!(
            "event=content_reset module=content status=ok kind={}",
            T::KIND
        );
        self.load()
    }

    fn position(&self, id: &RecordId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn ensure_loaded(&self) -> ContentResult<()> {
        if self.loading {
            return Err(ContentError::NotLoaded);
        }
        Ok(())
    }

    fn commit(&mut self, next: Vec<T>, op: &'static str, id: &RecordId) -> ContentResult<()> {
        if let Err(err) = write_list(&self.store, T::STORAGE_KEY, &next) {
            warn!(
                "event=content_{} module=content status=error kind={} id={} error={}",
                op,
                T::KIND,
                id,
                error_chain(&err)
            );
            return Err(err.into());
        }

        debug!(
            "event=content_{} module=content status=ok kind={} id={} count={}",
            op,
            T::KIND,
            id,
            next.len()
        );
        self.items = next;
        Ok(())
    }
}

impl<T: Showcase, S: Store> ContentManager<T, S> {
    /// Records the public page renders, in list order.
    pub fn visible(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.iter().filter(|item| item.is_visible())
    }

    /// Visible records flagged "show in initial view".
    pub fn initial_view(&self) -> impl Iterator<Item = &T> + '_ {
        self.visible().filter(|item| item.is_newest())
    }

    /// Flips visibility of `id` and returns the new state.
    pub fn toggle_visible(&mut self, id: &RecordId) -> ContentResult<bool> {
        self.modify(id, |record| {
            let visible = !record.is_visible();
            record.set_visible(visible);
            visible
        })
    }

    /// Flips the initial-view flag of `id` and returns the new state.
    pub fn toggle_newest(&mut self, id: &RecordId) -> ContentResult<bool> {
        self.modify(id, |record| {
            let newest = !record.is_newest();
            record.set_newest(newest);
            newest
        })
    }
}

fn check_ids<T: Record>(items: &[T]) -> ContentResult<()> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        let id = item.id();
        if id.is_blank() {
            return Err(ContentError::InvalidData(format!(
                "blank id in `{}`",
                T::STORAGE_KEY
            )));
        }
        if !seen.insert(id) {
            return Err(ContentError::InvalidData(format!(
                "duplicate id `{id}` in `{}`",
                T::STORAGE_KEY
            )));
        }
    }
    Ok(())
}
