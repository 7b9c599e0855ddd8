//! Permutation: a bijection on alphabet indices given in cycle notation.
//!
//! A cycle string such as `"(AELTPHQXRU) (BKNW) (S)"` is parsed once, in a
//! single pass, into successor and predecessor tables. `permute` and
//! `invert` are then O(1) table lookups. Symbols absent from every cycle
//! are fixed points.

use std::fmt;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, PermutationError};

/// A permutation of `0..alphabet.size()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    alphabet: Arc<Alphabet>,
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// Parses `cycles` over `alphabet`. Whitespace is ignored.
    ///
    /// # Errors
    /// Returns [`EnigmaError::MalformedPermutation`] on an unterminated or
    /// empty cycle, a stray `)`, a symbol outside any cycle, a symbol not in
    /// the alphabet, or a symbol mapped twice.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation};
    ///
    /// let alpha = Arc::new(Alphabet::new("ABCDE").unwrap());
    /// let perm = Permutation::new("(ACE) (BD)", &alpha).unwrap();
    /// assert_eq!(perm.permute_symbol('E').unwrap(), 'A');
    /// assert_eq!(perm.invert_symbol('A').unwrap(), 'E');
    /// assert!(Permutation::new("(AB)(BC)", &alpha).is_err());
    /// ```
    pub fn new(cycles: &str, alphabet: &Arc<Alphabet>) -> Result<Self, EnigmaError> {
        let size = alphabet.size();
        let mut forward: Vec<usize> = (0..size).collect();
        let mut seen = vec![false; size];
        let mut open: Option<Vec<usize>> = None;

        for c in cycles.chars() {
            match c {
                c if c.is_whitespace() => {}
                '(' => {
                    if open.is_some() {
                        return Err(PermutationError::UnterminatedCycle.into());
                    }
                    open = Some(Vec::new());
                }
                ')' => {
                    let cycle = open.take().ok_or(PermutationError::UnexpectedClose)?;
                    if cycle.is_empty() {
                        return Err(PermutationError::EmptyCycle.into());
                    }
                    for (k, &from) in cycle.iter().enumerate() {
                        forward[from] = cycle[(k + 1) % cycle.len()];
                    }
                }
                c => {
                    let cycle = open.as_mut().ok_or(PermutationError::OutsideCycle(c))?;
                    let i = alphabet
                        .to_index(c)
                        .map_err(|_| PermutationError::UnknownSymbol(c))?;
                    if seen[i] {
                        return Err(PermutationError::RepeatedSymbol(c).into());
                    }
                    seen[i] = true;
                    cycle.push(i);
                }
            }
        }
        if open.is_some() {
            return Err(PermutationError::UnterminatedCycle.into());
        }

        Ok(Self::from_forward(forward, alphabet))
    }

    /// The identity permutation over `alphabet`.
    pub fn identity(alphabet: &Arc<Alphabet>) -> Self {
        Self::from_forward((0..alphabet.size()).collect(), alphabet)
    }

    fn from_forward(forward: Vec<usize>, alphabet: &Arc<Alphabet>) -> Self {
        let mut inverse = vec![0; forward.len()];
        for (from, &to) in forward.iter().enumerate() {
            inverse[to] = from;
        }
        Permutation {
            alphabet: Arc::clone(alphabet),
            forward,
            inverse,
        }
    }

    /// Returns the alphabet this permutation is defined over.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns the size of the alphabet.
    pub fn size(&self) -> usize {
        self.forward.len()
    }

    /// Returns `p` modulo `size()`, always in `0..size()`.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation};
    ///
    /// let perm = Permutation::identity(&Arc::new(Alphabet::new("ABCDE").unwrap()));
    /// assert_eq!(perm.wrap(-1), 4);
    /// assert_eq!(perm.wrap(12), 2);
    /// ```
    pub fn wrap(&self, p: i64) -> usize {
        p.rem_euclid(self.size() as i64) as usize
    }

    /// Returns the successor of index `p` (taken modulo `size()`).
    pub fn permute(&self, p: usize) -> usize {
        self.forward[p % self.size()]
    }

    /// Returns the predecessor of index `c` (taken modulo `size()`).
    pub fn invert(&self, c: usize) -> usize {
        self.inverse[c % self.size()]
    }

    /// Applies the permutation to a symbol.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidSymbol`] if `p` is not in the alphabet.
    pub fn permute_symbol(&self, p: char) -> Result<char, EnigmaError> {
        let i = self.alphabet.to_index(p)?;
        Ok(self.alphabet.to_symbol(self.permute(i)))
    }

    /// Applies the inverse permutation to a symbol.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidSymbol`] if `c` is not in the alphabet.
    pub fn invert_symbol(&self, c: char) -> Result<char, EnigmaError> {
        let i = self.alphabet.to_index(c)?;
        Ok(self.alphabet.to_symbol(self.invert(i)))
    }

    /// Returns true iff no symbol maps to itself.
    pub fn is_derangement(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &j)| i != j)
    }

    /// Returns true iff applying the permutation twice is the identity.
    pub fn is_involution(&self) -> bool {
        self.forward == self.inverse
    }

    /// Returns the non-trivial cycles as index lists, each starting at its
    /// smallest index.
    pub fn cycles(&self) -> Vec<Vec<usize>> {
        let mut visited = vec![false; self.size()];
        let mut out = Vec::new();
        for start in 0..self.size() {
            if visited[start] || self.forward[start] == start {
                continue;
            }
            let mut cycle = Vec::new();
            let mut i = start;
            while !visited[i] {
                visited[i] = true;
                cycle.push(i);
                i = self.forward[i];
            }
            out.push(cycle);
        }
        out
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cycle in self.cycles() {
            write!(f, "(")?;
            for i in cycle {
                write!(f, "{}", self.alphabet.to_symbol(i))?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upper() -> Arc<Alphabet> {
        Arc::new(Alphabet::uppercase())
    }

    fn parse_err(cycles: &str) -> PermutationError {
        match Permutation::new(cycles, &upper()) {
            Err(EnigmaError::MalformedPermutation(e)) => e,
            other => panic!("expected malformed permutation, got {:?}", other),
        }
    }

    #[test]
    fn test_rotor_i_wiring() {
        let perm = Permutation::new(
            "(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)",
            &upper(),
        )
        .unwrap();
        let wired: String = ('A'..='Z')
            .map(|c| perm.permute_symbol(c).unwrap())
            .collect();
        assert_eq!(wired, "EKMFLGDQVZNTOWYHXUSPAIBRCJ");
        assert_eq!(perm.invert_symbol('E').unwrap(), 'A');
        assert_eq!(perm.permute_symbol('U').unwrap(), 'A');
    }

    #[test]
    fn test_fixed_points_implicit() {
        let perm = Permutation::new("(AB)", &upper()).unwrap();
        assert_eq!(perm.permute_symbol('C').unwrap(), 'C');
        assert_eq!(perm.invert_symbol('Z').unwrap(), 'Z');
        assert!(!perm.is_derangement());
    }

    #[test]
    fn test_whitespace_ignored() {
        let a = Permutation::new(" ( A B C )\n(D E) ", &upper()).unwrap();
        let b = Permutation::new("(ABC)(DE)", &upper()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_cycles_is_identity() {
        let alpha = upper();
        assert_eq!(
            Permutation::new("", &alpha).unwrap(),
            Permutation::identity(&alpha)
        );
    }

    #[test]
    fn test_index_wraps() {
        let perm = Permutation::new("(AB)", &upper()).unwrap();
        assert_eq!(perm.permute(26), 1);
        assert_eq!(perm.invert(27), 0);
        assert_eq!(perm.wrap(-27), 25);
        assert_eq!(perm.wrap(-26), 0);
    }

    #[test]
    fn test_round_trip_all_indices() {
        let perm = Permutation::new("(AELTPHQXRU)(BKNW)(CMOY)(DFG)(IV)(JZ)", &upper()).unwrap();
        for x in 0..perm.size() {
            assert_eq!(perm.invert(perm.permute(x)), x);
            assert_eq!(perm.permute(perm.invert(x)), x);
        }
    }

    #[test]
    fn test_rejects_repeated_symbol() {
        assert_eq!(parse_err("(AB)(BC)"), PermutationError::RepeatedSymbol('B'));
        assert_eq!(parse_err("(ABA)"), PermutationError::RepeatedSymbol('A'));
    }

    #[test]
    fn test_rejects_unterminated() {
        assert_eq!(parse_err("(AB"), PermutationError::UnterminatedCycle);
        assert_eq!(parse_err("(AB(CD)"), PermutationError::UnterminatedCycle);
    }

    #[test]
    fn test_rejects_unknown_and_stray() {
        assert_eq!(parse_err("(Ab)"), PermutationError::UnknownSymbol('b'));
        assert_eq!(parse_err("AB"), PermutationError::OutsideCycle('A'));
        assert_eq!(parse_err("(AB))"), PermutationError::UnexpectedClose);
        assert_eq!(parse_err("()"), PermutationError::EmptyCycle);
    }

    #[test]
    fn test_involution_and_derangement() {
        let reflector = Permutation::new(
            "(AY)(BR)(CU)(DH)(EQ)(FS)(GL)(IP)(JX)(KN)(MO)(TZ)(VW)",
            &upper(),
        )
        .unwrap();
        assert!(reflector.is_involution());
        assert!(reflector.is_derangement());

        let rotor = Permutation::new("(ABC)", &upper()).unwrap();
        assert!(!rotor.is_involution());
    }

    #[test]
    fn test_display_canonical() {
        let perm = Permutation::new("(CA) (E) (DB)", &upper()).unwrap();
        assert_eq!(perm.to_string(), "(AC)(BD)");
        assert_eq!(Permutation::identity(&upper()).to_string(), "");
    }
}
