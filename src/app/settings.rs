//! User settings persisted across runs.
//!
//! | Key              | Type  | Default |
//! |------------------|-------|---------|
//! | `clickThrough`   | bool  | false   |
//! | `lockPosition`   | bool  | false   |
//! | `relativeOffset` | Point | (0, 0)  |
//!
//! Values are postcard-encoded under the [`NAMESPACE`] namespace of a
//! [`StoragePort`].  A missing key yields its default; so does a value
//! that fails to decode.

use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::geometry::Point;

use super::ports::{StorageError, StoragePort};

pub const NAMESPACE: &str = "docklambda";
pub const KEY_CLICK_THROUGH: &str = "clickThrough";
pub const KEY_LOCK_POSITION: &str = "lockPosition";
pub const KEY_RELATIVE_OFFSET: &str = "relativeOffset";

/// Largest encoded value we ever read back.
const VALUE_BUF_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Settings {
    /// Mouse events pass through the pet window.
    pub click_through: bool,
    /// Option-drag is ignored.
    pub lock_position: bool,
    /// User displacement from the dock-relative base position.
    pub relative_offset: Point,
}

impl Settings {
    /// Read every key, falling back to defaults key by key.
    pub fn load(storage: &dyn StoragePort) -> Self {
        let defaults = Self::default();
        let settings = Self {
            click_through: read_value(storage, KEY_CLICK_THROUGH)
                .unwrap_or(defaults.click_through),
            lock_position: read_value(storage, KEY_LOCK_POSITION)
                .unwrap_or(defaults.lock_position),
            relative_offset: read_value::<Point>(storage, KEY_RELATIVE_OFFSET)
                .filter(|p| p.is_finite())
                .unwrap_or(defaults.relative_offset),
        };
        debug!("Settings loaded: {:?}", settings);
        settings
    }

    /// Write every key.  Stops at the first failing write.
    pub fn persist(&self, storage: &mut dyn StoragePort) -> Result<(), StorageError> {
        write_value(storage, KEY_CLICK_THROUGH, &self.click_through)?;
        write_value(storage, KEY_LOCK_POSITION, &self.lock_position)?;
        write_value(storage, KEY_RELATIVE_OFFSET, &self.relative_offset)?;
        Ok(())
    }
}

fn read_value<T: DeserializeOwned>(storage: &dyn StoragePort, key: &str) -> Option<T> {
    let mut buf = [0u8; VALUE_BUF_LEN];
    match storage.read(NAMESPACE, key, &mut buf) {
        Ok(len) => match postcard::from_bytes(&buf[..len]) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Settings: '{}' undecodable ({}), using default", key, e);
                None
            }
        },
        Err(StorageError::NotFound) => None,
        Err(e) => {
            warn!("Settings: reading '{}' failed: {}", key, e);
            None
        }
    }
}

fn write_value<T: Serialize>(
    storage: &mut dyn StoragePort,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let bytes = postcard::to_allocvec(value).map_err(|_| StorageError::Corrupted)?;
    storage.write(NAMESPACE, key, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapStore(HashMap<String, Vec<u8>>);

    impl StoragePort for MapStore {
        fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
            let data = self
                .0
                .get(&format!("{namespace}::{key}"))
                .ok_or(StorageError::NotFound)?;
            if data.len() > buf.len() {
                return Err(StorageError::BufferTooSmall(data.len()));
            }
            buf[..data.len()].copy_from_slice(data);
            Ok(data.len())
        }

        fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
            self.0.insert(format!("{namespace}::{key}"), data.to_vec());
            Ok(())
        }

        fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
            self.0.remove(&format!("{namespace}::{key}"));
            Ok(())
        }

        fn exists(&self, namespace: &str, key: &str) -> bool {
            self.0.contains_key(&format!("{namespace}::{key}"))
        }
    }

    #[test]
    fn empty_store_gives_defaults() {
        let store = MapStore::default();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn persist_then_load() {
        let mut store = MapStore::default();
        let s = Settings {
            click_through: true,
            lock_position: false,
            relative_offset: Point::new(-40.0, 12.5),
        };
        s.persist(&mut store).unwrap();
        assert!(store.exists(NAMESPACE, KEY_RELATIVE_OFFSET));
        assert_eq!(Settings::load(&store), s);
    }

    #[test]
    fn garbage_offset_decodes_to_zero() {
        let mut store = MapStore::default();
        store.write(NAMESPACE, KEY_LOCK_POSITION, &[1]).unwrap();
        store.write(NAMESPACE, KEY_RELATIVE_OFFSET, &[0xFF, 0x01]).unwrap();
        let s = Settings::load(&store);
        assert!(s.lock_position);
        assert_eq!(s.relative_offset, Point::ZERO);
    }

    #[test]
    fn oversized_value_falls_back_to_default() {
        let mut store = MapStore::default();
        // A valid offset followed by trailing junk past the read buffer.
        let mut bytes = postcard::to_allocvec(&Point::new(-5.0, 5.0)).unwrap();
        bytes.resize(VALUE_BUF_LEN + 16, 0xAA);
        store.write(NAMESPACE, KEY_RELATIVE_OFFSET, &bytes).unwrap();
        store.write(NAMESPACE, KEY_CLICK_THROUGH, &[1]).unwrap();

        let s = Settings::load(&store);
        assert_eq!(s.relative_offset, Point::ZERO);
        assert!(s.click_through);
    }

    #[test]
    fn non_finite_offset_is_dropped() {
        let mut store = MapStore::default();
        let bytes = postcard::to_allocvec(&Point::new(f64::INFINITY, 0.0)).unwrap();
        store.write(NAMESPACE, KEY_RELATIVE_OFFSET, &bytes).unwrap();
        assert_eq!(Settings::load(&store).relative_offset, Point::ZERO);
    }
}
