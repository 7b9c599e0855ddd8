//! Alphabet: ordered set of symbols the machine operates over.
//!
//! Every other component addresses symbols by their index in `0..size()`.
//! The alphabet is immutable once built and is shared between permutations,
//! rotors and the machine through an `Arc`.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigurationError, EnigmaError};

/// Characters reserved by the cycle notation and the settings grammar.
const RESERVED: [char; 3] = ['(', ')', '*'];

/// An ordered sequence of unique symbols with a symbol/index bijection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    index: HashMap<char, usize>,
}

impl Alphabet {
    /// Builds an alphabet from the characters of `chars`, in order.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::InvalidAlphabet`] if there are fewer
    /// than two symbols, a symbol repeats, or a symbol is whitespace or one
    /// of `(`, `)`, `*`.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::Alphabet;
    ///
    /// let alpha = Alphabet::new("ABCDE").unwrap();
    /// assert_eq!(alpha.size(), 5);
    /// assert_eq!(alpha.to_index('C').unwrap(), 2);
    /// assert!(Alphabet::new("AA").is_err());
    /// ```
    pub fn new(chars: &str) -> Result<Self, EnigmaError> {
        let symbols: Vec<char> = chars.chars().collect();
        if symbols.len() < 2 {
            return Err(ConfigurationError::InvalidAlphabet(format!(
                "{:?} has fewer than 2 symbols",
                chars
            ))
            .into());
        }

        let mut index = HashMap::with_capacity(symbols.len());
        for (i, &c) in symbols.iter().enumerate() {
            if c.is_whitespace() || RESERVED.contains(&c) {
                return Err(ConfigurationError::InvalidAlphabet(format!(
                    "reserved symbol {:?}",
                    c
                ))
                .into());
            }
            if index.insert(c, i).is_some() {
                return Err(ConfigurationError::InvalidAlphabet(format!(
                    "duplicate symbol {:?}",
                    c
                ))
                .into());
            }
        }

        Ok(Alphabet { symbols, index })
    }

    /// The 26 upper-case Latin letters `A..Z`.
    pub fn uppercase() -> Self {
        let symbols: Vec<char> = ('A'..='Z').collect();
        let index = symbols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Alphabet { symbols, index }
    }

    /// Returns the number of symbols.
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// Returns the position of `symbol`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidSymbol`] if `symbol` is not present.
    pub fn to_index(&self, symbol: char) -> Result<usize, EnigmaError> {
        self.index
            .get(&symbol)
            .copied()
            .ok_or(EnigmaError::InvalidSymbol(symbol))
    }

    /// Returns the symbol at `index`.
    ///
    /// # Panics
    /// Panics if `index >= size()`. Callers wrap indices before lookup.
    pub fn to_symbol(&self, index: usize) -> char {
        self.symbols[index]
    }

    /// Returns true iff `symbol` is in the alphabet.
    pub fn contains(&self, symbol: char) -> bool {
        self.index.contains_key(&symbol)
    }

    /// Returns the symbols in order.
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::uppercase()
    }
}

impl FromStr for Alphabet {
    type Err = EnigmaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Alphabet::new(s)
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.symbols {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uppercase() {
        let alpha = Alphabet::uppercase();
        assert_eq!(alpha.size(), 26);
        assert_eq!(alpha.to_index('A').unwrap(), 0);
        assert_eq!(alpha.to_index('Z').unwrap(), 25);
        assert_eq!(alpha.to_symbol(7), 'H');
        assert_eq!(alpha, Alphabet::new("ABCDEFGHIJKLMNOPQRSTUVWXYZ").unwrap());
    }

    #[test]
    fn test_index_symbol_bijection() {
        let alpha = Alphabet::new("XQ7z.").unwrap();
        for i in 0..alpha.size() {
            assert_eq!(alpha.to_index(alpha.to_symbol(i)).unwrap(), i);
        }
    }

    #[test]
    fn test_missing_symbol() {
        let alpha = Alphabet::new("ABC").unwrap();
        assert!(!alpha.contains('D'));
        assert_eq!(alpha.to_index('D'), Err(EnigmaError::InvalidSymbol('D')));
    }

    #[test]
    fn test_rejects_too_short() {
        assert!(matches!(
            Alphabet::new("A"),
            Err(EnigmaError::Configuration(
                ConfigurationError::InvalidAlphabet(_)
            ))
        ));
        assert!(Alphabet::new("").is_err());
    }

    #[test]
    fn test_rejects_duplicates_and_reserved() {
        assert!(Alphabet::new("ABCA").is_err());
        assert!(Alphabet::new("AB C").is_err());
        assert!(Alphabet::new("AB(").is_err());
        assert!(Alphabet::new("AB*").is_err());
    }

    #[test]
    fn test_display_and_from_str() {
        let alpha: Alphabet = "ABCDE".parse().unwrap();
        assert_eq!(alpha.to_string(), "ABCDE");
        assert_eq!(alpha.symbols(), &['A', 'B', 'C', 'D', 'E']);
    }
}
