use parking_lot::Mutex;
use std::sync::Arc;

/// Single-entry cache keyed on a derivation's inputs.
///
/// A hit returns the stored value only when the key compares equal, so a
/// cached result is always the value a fresh computation would produce for
/// the same inputs.
#[derive(Debug)]
pub struct Memo<K, V> {
    cell: Mutex<Option<(K, Arc<V>)>>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            cell: Mutex::new(None),
        }
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    pub fn get_or_compute(&self, key: K, compute: impl FnOnce() -> V) -> Arc<V> {
        let mut cell = self.cell.lock();
        if let Some((cached_key, value)) = cell.as_ref() {
            if *cached_key == key {
                return Arc::clone(value);
            }
        }
        let value = Arc::new(compute());
        *cell = Some((key, Arc::clone(&value)));
        value
    }

    pub fn clear(&self) {
        *self.cell.lock() = None;
    }

    #[cfg(test)]
    pub fn is_cached(&self, key: &K) -> bool {
        self.cell
            .lock()
            .as_ref()
            .is_some_and(|(cached_key, _)| cached_key == key)
    }
}
