//! Interned string symbols.
//!
//! Identifiers appear thousands of times in a compilation; interning them
//! makes every comparison an integer compare and every copy four bytes.
//! A [`Symbol`] is an index into the process-wide interner.
//!
//! # Examples
//!
//! ```
//! use quillc_util::Symbol;
//!
//! let a = Symbol::intern("main");
//! let b = Symbol::intern("main");
//! assert_eq!(a, b);
//! assert_eq!(a.as_str(), "main");
//! ```

mod interner;

use std::fmt;

use static_assertions::const_assert_eq;

use interner::INTERNER;

/// Handle to an interned string.
///
/// Equality, ordering, and hashing go through the index, never the text.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    index: u32,
}

// Symbols are embedded in every identifier token and AST name; keep the
// handle at exactly one word of u32.
const_assert_eq!(std::mem::size_of::<Symbol>(), 4);

impl Symbol {
    /// Interns a string, returning its symbol.
    pub fn intern(string: &str) -> Symbol {
        INTERNER.intern(string)
    }

    /// Returns the interned text.
    pub fn as_str(self) -> &'static str {
        INTERNER.resolve(self)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_round_trip() {
        let symbol = Symbol::intern("round_trip");
        assert_eq!(symbol.as_str(), "round_trip");
    }

    #[test]
    fn test_equality_by_index() {
        assert_eq!(Symbol::intern("x"), Symbol::intern("x"));
        assert_ne!(Symbol::intern("x"), Symbol::intern("y"));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Symbol::intern("shown")), "shown");
    }

    #[test]
    fn test_debug() {
        assert_eq!(format!("{:?}", Symbol::intern("dbg")), "Symbol(\"dbg\")");
    }

    #[test]
    fn test_usable_as_map_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(Symbol::intern("key"), 1);
        assert_eq!(map[&Symbol::intern("key")], 1);
    }
}
