//! The active symbol's annotation sequence and its persistence.

use std::cell::RefCell;
use std::rc::Rc;

use charter_core::{Annotation, AnnotationId};
use charter_data::{Persistence, StoreError};

/// Persistence provider shared between the annotation store and the
/// indicator registry.
pub type SharedPersistence = Rc<RefCell<dyn Persistence>>;

/// Owns the annotations of the active symbol, in z-order.
///
/// Every mutation updates memory first and then writes the whole sequence
/// for the symbol. A failed write leaves memory as the source of truth; the
/// error is logged, returned, and kept until the next successful write.
pub struct AnnotationStore {
    persistence: SharedPersistence,
    symbol: Option<String>,
    annotations: Vec<Annotation>,
    last_error: Option<String>,
}

impl AnnotationStore {
    pub fn new(persistence: SharedPersistence) -> Self {
        Self {
            persistence,
            symbol: None,
            annotations: Vec::new(),
            last_error: None,
        }
    }

    /// Replace the in-memory sequence with the persisted one for `symbol`.
    ///
    /// On a read failure the sequence is left empty and the error returned.
    pub fn load(&mut self, symbol: &str) -> Result<(), StoreError> {
        self.symbol = Some(symbol.to_string());
        self.annotations.clear();

        let loaded = self.persistence.borrow().load_annotations(symbol);
        match loaded {
            Ok(annotations) => {
                log::info!("Loaded {} annotations for {}", annotations.len(), symbol);
                self.annotations = annotations;
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load annotations for {}: {}", symbol, e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Append on top of the z-order and persist.
    ///
    /// Refused with [`StoreError::NoSymbol`] until a symbol has been loaded.
    pub fn add(&mut self, annotation: Annotation) -> Result<(), StoreError> {
        if self.symbol.is_none() {
            log::warn!("Annotation added before any symbol was loaded");
            self.last_error = Some(StoreError::NoSymbol.to_string());
            return Err(StoreError::NoSymbol);
        }
        log::debug!("Adding {} {}", annotation.kind().name(), annotation.id());
        self.annotations.push(annotation);
        self.persist()
    }

    /// Remove by id and persist. Returns whether anything was removed; an
    /// unknown id is a no-op and nothing is written.
    pub fn remove(&mut self, id: AnnotationId) -> Result<bool, StoreError> {
        let before = self.annotations.len();
        self.annotations.retain(|a| a.id() != id);
        if self.annotations.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Annotations in z-order, bottom first.
    pub fn all(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id() == id)
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    /// Message of the most recent persistence failure not yet followed by a
    /// successful write.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let Some(symbol) = self.symbol.as_deref() else {
            return Err(StoreError::NoSymbol);
        };

        let result = self.persistence.borrow_mut().save_annotations(symbol, &self.annotations);
        match result {
            Ok(()) => {
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to save annotations for {}: {}", symbol, e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charter_core::{Point, TimePoint};
    use charter_data::{KeyValueStore, MemoryStore};

    fn point(day: i64, price: f64) -> Point {
        Point::new(TimePoint::from_unix_seconds(day * 86_400), price)
    }

    /// Fails writes while `fail` is set.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail: bool,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
            if self.fail {
                return Err(StoreError::Backend("disk full".to_string()));
            }
            self.inner.set(key, value)
        }
    }

    #[test]
    fn test_add_persists_whole_sequence() {
        let backend = Rc::new(RefCell::new(MemoryStore::new()));
        let mut store = AnnotationStore::new(backend.clone());
        store.load("AAPL").unwrap();

        let a = Annotation::horizontal_line(point(1, 10.0));
        let b = Annotation::trendline(point(1, 10.0), point(3, 12.0));
        store.add(a.clone()).unwrap();
        store.add(b.clone()).unwrap();

        assert_eq!(store.all(), &[a.clone(), b.clone()]);
        assert_eq!(backend.borrow().load_annotations("AAPL").unwrap(), vec![a, b]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let backend = Rc::new(RefCell::new(MemoryStore::new()));
        let mut store = AnnotationStore::new(backend);
        store.load("AAPL").unwrap();
        store.add(Annotation::horizontal_line(point(1, 10.0))).unwrap();

        assert!(!store.remove(AnnotationId::new()).unwrap());
        assert_eq!(store.all().len(), 1);
    }

    #[test]
    fn test_load_switches_sets() {
        let backend = Rc::new(RefCell::new(MemoryStore::new()));
        let mut store = AnnotationStore::new(backend);
        store.load("AAPL").unwrap();
        store.add(Annotation::horizontal_line(point(1, 10.0))).unwrap();

        store.load("MSFT").unwrap();
        assert!(store.all().is_empty());
        assert_eq!(store.symbol(), Some("MSFT"));

        store.load("AAPL").unwrap();
        assert_eq!(store.all().len(), 1);
    }

    #[test]
    fn test_add_before_load_is_refused() {
        let backend = Rc::new(RefCell::new(MemoryStore::new()));
        let mut store = AnnotationStore::new(backend);

        let result = store.add(Annotation::horizontal_line(point(1, 10.0)));
        assert!(matches!(result, Err(StoreError::NoSymbol)));
        assert!(store.all().is_empty());
        assert_eq!(store.last_error(), Some("no active symbol"));

        store.load("AAPL").unwrap();
        store.add(Annotation::horizontal_line(point(1, 10.0))).unwrap();
        assert!(store.last_error().is_none());
    }

    #[test]
    fn test_failed_write_keeps_memory_and_recovers() {
        let backend = Rc::new(RefCell::new(FlakyStore::default()));
        let mut store = AnnotationStore::new(backend.clone());
        store.load("AAPL").unwrap();

        backend.borrow_mut().fail = true;
        let line = Annotation::horizontal_line(point(1, 10.0));
        assert!(store.add(line.clone()).is_err());
        assert_eq!(store.all(), &[line.clone()]);
        assert!(store.last_error().unwrap().contains("disk full"));

        // the next successful mutation writes everything and clears the error
        backend.borrow_mut().fail = false;
        let level = Annotation::horizontal_line(point(2, 11.0));
        store.add(level.clone()).unwrap();
        assert!(store.last_error().is_none());
        assert_eq!(backend.borrow().load_annotations("AAPL").unwrap(), vec![line, level]);
    }
}
