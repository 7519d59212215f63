//! Round-robin credential pool for the generative-language provider.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// An ordered set of API keys plus a shared rotation cursor.
///
/// The keys are fixed at construction; only the cursor moves. An empty pool is the
/// "unconfigured" state and never hands out a key.
pub struct KeyPool {
    keys: Vec<String>,
    cursor: AtomicUsize,
}

impl KeyPool {
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the key under the cursor and advances the cursor by one.
    ///
    /// The read and the advance are one atomic step, so concurrent callers never
    /// observe the same pre-advance position.
    pub fn next_key(&self) -> Option<&str> {
        let len = self.keys.len();
        if len == 0 {
            return None;
        }
        let idx = self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| Some((c + 1) % len))
            .unwrap_or_else(|c| c);
        self.keys.get(idx % len).map(String::as_str)
    }

    /// Keys in pool order, for diagnostics that must address each key directly.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

impl fmt::Debug for KeyPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPool")
            .field("keys", &self.keys.iter().map(|k| mask_key(k)).collect::<Vec<_>>())
            .field("cursor", &self.cursor.load(Ordering::Relaxed))
            .finish()
    }
}

/// Redacts a key down to its last four characters for log output.
pub fn mask_key(key: &str) -> String {
    let tail: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("…{tail}")
}
