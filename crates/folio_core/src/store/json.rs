//! Typed JSON helpers layered over any `Store`.
//!
//! `write_list` / `read_list` are the list contract content managers build
//! on. `read_list` is lenient and degrades to an empty list; callers that must
//! not mask corruption use `try_read_list`.

use crate::store::{error_chain, Store, StoreError, StoreResult};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serializes `value` and stores it under `key`, replacing any prior value.
pub fn write_value<T, S>(store: &S, key: &str, value: &T) -> StoreResult<()>
where
    T: Serialize + ?Sized,
    S: Store + ?Sized,
{
    let encoded = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &encoded)?;
    debug!(
        "event=store_write module=store status=ok key={} bytes={}",
        key,
        encoded.len()
    );
    Ok(())
}

/// Reads and decodes the value under `key`.
///
/// Returns `Ok(None)` when the key is absent and `StoreError::Corrupt` when
/// the stored string does not decode as `T`.
pub fn try_read_value<T, S>(store: &S, key: &str) -> StoreResult<Option<T>>
where
    T: DeserializeOwned,
    S: Store + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::Corrupt {
            key: key.to_string(),
            source,
        })
}

/// Writes a full record list under `key`.
pub fn write_list<T, S>(store: &S, key: &str, items: &[T]) -> StoreResult<()>
where
    T: Serialize,
    S: Store + ?Sized,
{
    write_value(store, key, items)
}

/// Strict list read: absent is `Ok(None)`, undecodable is an error.
pub fn try_read_list<T, S>(store: &S, key: &str) -> StoreResult<Option<Vec<T>>>
where
    T: DeserializeOwned,
    S: Store + ?Sized,
{
    try_read_value(store, key)
}

/// Lenient list read.
///
/// Absent keys, backend failures and corrupt values all yield an empty list;
/// failures are logged at `warn`.
pub fn read_list<T, S>(store: &S, key: &str) -> Vec<T>
where
    T: DeserializeOwned,
    S: Store + ?Sized,
{
    match try_read_list(store, key) {
        Ok(items) => items.unwrap_or_default(),
        Err(err) => {
            warn!(
                "event=store_read module=store status=error key={} error_code={} error={}",
                key,
                error_code(&err),
                error_chain(&err)
            );
            Vec::new()
        }
    }
}

fn error_code(err: &StoreError) -> &'static str {
    match err {
        StoreError::InvalidKey(_) => "invalid_key",
        StoreError::Db(_) => "backend_failed",
        StoreError::Serialize { .. } => "serialize_failed",
        StoreError::Corrupt { .. } => "corrupt_value",
    }
}
