//! Deduplicating string table for area metadata.
//!
//! Every piece of text attached to an area (labels, field names, formatted
//! values, tooltip fragments, hyperlink targets) is stored once in a
//! [`Palette`] and referenced by a small integer index. Indices are dense and
//! follow first-seen order, so they can be emitted positionally.
//!
//! A palette belongs to exactly one assembly pass. Indices taken from one
//! palette mean nothing in another.

use std::fmt;

use string_interner::{DefaultStringInterner, DefaultSymbol, Symbol};

/// Index used for "no value".
pub const NO_VALUE: i32 = -1;

/// Insertion-ordered string table mapping repeated strings to indices.
///
/// # Examples
///
/// ```
/// use chartarea_core::palette::{NO_VALUE, Palette};
///
/// let mut palette = Palette::new();
/// let region = palette.put("Region");
/// let sales = palette.put("Sales");
///
/// assert_eq!(palette.put("Region"), region);
/// assert_eq!(palette.get(sales), Some("Sales"));
/// assert_eq!(palette.put(""), NO_VALUE);
/// assert_eq!(palette.get(NO_VALUE), None);
/// ```
#[derive(Clone, Default)]
pub struct Palette {
    interner: DefaultStringInterner,
}

impl Palette {
    /// Creates an empty palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a palette from strings in index order.
    ///
    /// The strings are expected to be distinct and non-empty, which holds for
    /// any sequence produced by [`Palette::iter`].
    pub fn from_strings<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut palette = Self::new();
        for value in values {
            palette.put(value);
        }
        palette
    }

    /// Returns the index for `value`, adding it if it is new.
    ///
    /// Empty strings have no-value semantics and map to [`NO_VALUE`].
    pub fn put(&mut self, value: &str) -> i32 {
        if value.is_empty() {
            return NO_VALUE;
        }
        let symbol = self.interner.get_or_intern(value);
        symbol_to_index(symbol)
    }

    /// Like [`Palette::put`], mapping `None` to [`NO_VALUE`].
    pub fn put_opt(&mut self, value: Option<&str>) -> i32 {
        value.map_or(NO_VALUE, |value| self.put(value))
    }

    /// Returns the index of `value` without adding it.
    pub fn find(&self, value: &str) -> Option<i32> {
        self.interner.get(value).map(symbol_to_index)
    }

    /// Returns the string stored at `index`.
    pub fn get(&self, index: i32) -> Option<&str> {
        let index = usize::try_from(index).ok()?;
        let symbol = DefaultSymbol::try_from_usize(index)?;
        self.interner.resolve(symbol)
    }

    /// Returns the number of distinct strings.
    pub fn len(&self) -> usize {
        self.interner.len()
    }

    /// Returns true if no string has been added.
    pub fn is_empty(&self) -> bool {
        self.interner.is_empty()
    }

    /// Iterates over the stored strings in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.len()).filter_map(|index| {
            DefaultSymbol::try_from_usize(index).and_then(|symbol| self.interner.resolve(symbol))
        })
    }
}

fn symbol_to_index(symbol: DefaultSymbol) -> i32 {
    i32::try_from(symbol.to_usize()).unwrap_or(i32::MAX)
}

impl fmt::Debug for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl PartialEq for Palette {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_assigns_dense_indices() {
        let mut palette = Palette::new();
        assert_eq!(palette.put("a"), 0);
        assert_eq!(palette.put("b"), 1);
        assert_eq!(palette.put("a"), 0);
        assert_eq!(palette.put("c"), 2);
        assert_eq!(palette.len(), 3);
    }

    #[test]
    fn test_empty_is_no_value() {
        let mut palette = Palette::new();
        assert_eq!(palette.put(""), NO_VALUE);
        assert_eq!(palette.put_opt(None), NO_VALUE);
        assert!(palette.is_empty());
    }

    #[test]
    fn test_get_out_of_range() {
        let mut palette = Palette::new();
        palette.put("only");
        assert_eq!(palette.get(0), Some("only"));
        assert_eq!(palette.get(1), None);
        assert_eq!(palette.get(-7), None);
    }

    #[test]
    fn test_find_does_not_insert() {
        let mut palette = Palette::new();
        palette.put("x");
        assert_eq!(palette.find("x"), Some(0));
        assert_eq!(palette.find("y"), None);
        assert_eq!(palette.len(), 1);
    }

    #[test]
    fn test_iter_preserves_first_seen_order() {
        let mut palette = Palette::new();
        for value in ["West", "East", "West", "North", "East"] {
            palette.put(value);
        }
        let values: Vec<&str> = palette.iter().collect();
        assert_eq!(values, vec!["West", "East", "North"]);
    }

    #[test]
    fn test_from_strings_matches_original() {
        let mut palette = Palette::new();
        palette.put("Sales");
        palette.put("Profit");

        let rebuilt = Palette::from_strings(palette.iter());
        assert_eq!(rebuilt, palette);
        assert_eq!(rebuilt.find("Profit"), Some(1));
    }
}
