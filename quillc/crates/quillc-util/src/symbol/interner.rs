//! String interner backing the `Symbol` type.
//!
//! One global table for the whole process. The forward map (string to
//! index) is a lock-free `DashMap` hashed with `ahash`; the reverse table
//! (index to string) is a `Vec` behind a `parking_lot` read-write lock,
//! read-locked only on `as_str`. Interned strings are leaked to obtain
//! `'static` lifetime; the table lives for the program duration and
//! entries are never removed.

use std::sync::LazyLock;

use ahash::RandomState;
use dashmap::DashMap;
use parking_lot::RwLock;

use super::Symbol;

/// Global interner instance, initialized on first use.
pub(super) static INTERNER: LazyLock<Interner> = LazyLock::new(Interner::new);

pub(super) struct Interner {
    /// String to index. The key is the leaked interned string itself.
    map: DashMap<&'static str, u32, RandomState>,
    /// Index to string. Pushes are serialized by the write lock.
    strings: RwLock<Vec<&'static str>>,
}

impl Interner {
    fn new() -> Self {
        Self {
            map: DashMap::with_hasher(RandomState::new()),
            strings: RwLock::new(Vec::with_capacity(256)),
        }
    }

    /// Interns a string, returning its stable symbol.
    pub(super) fn intern(&self, string: &str) -> Symbol {
        if let Some(entry) = self.map.get(string) {
            return Symbol { index: *entry };
        }

        // The write lock doubles as the insert lock: re-check under it so
        // two racing interns of the same string agree on one index.
        let mut strings = self.strings.write();
        if let Some(entry) = self.map.get(string) {
            return Symbol { index: *entry };
        }

        let leaked: &'static str = Box::leak(string.to_owned().into_boxed_str());
        let index = strings.len() as u32;
        strings.push(leaked);
        self.map.insert(leaked, index);
        Symbol { index }
    }

    /// Resolves a symbol back to its string.
    pub(super) fn resolve(&self, symbol: Symbol) -> &'static str {
        self.strings.read()[symbol.index as usize]
    }

    /// Number of distinct interned strings.
    #[cfg(test)]
    pub(super) fn len(&self) -> usize {
        self.strings.read().len()
    }
}
