//! Rotors: catalog definitions and per-slot mutable state.
//!
//! A [`RotorDef`] is the immutable catalog entry (name, kind, wiring,
//! notches). A [`Rotor`] is the state a machine holds for one inserted slot:
//! a shared reference to its definition plus its own rotational offset and
//! ring offset. Two machines built from one catalog therefore never share
//! offsets, and stepping one cannot disturb the other.

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::alphabet::Alphabet;
use crate::error::{ConfigurationError, EnigmaError};
use crate::permutation::Permutation;

/// The closed set of rotor variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Fixed in slot 0, reflects the signal back, never rotates.
    Reflector,
    /// Non-moving, non-reflecting rotor.
    Fixed,
    /// Pawl-driven rotor with notches given as alphabet indices.
    Moving { notches: Vec<usize> },
    /// The plugboard; only its permutation matters.
    Plugboard,
}

/// Immutable catalog entry describing one rotor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotorDef {
    name: String,
    kind: RotorKind,
    permutation: Permutation,
}

impl RotorDef {
    /// A reflector named `name` wired as `permutation`.
    ///
    /// A reflector that is not an involution is accepted, but the machine
    /// will then not decipher its own output; a warning is logged.
    pub fn reflector(name: impl Into<String>, permutation: Permutation) -> Self {
        let name = name.into();
        if !permutation.is_involution() {
            warn!(rotor = %name, "reflector wiring is not an involution");
        }
        RotorDef {
            name,
            kind: RotorKind::Reflector,
            permutation,
        }
    }

    /// A non-moving rotor named `name` wired as `permutation`.
    pub fn fixed(name: impl Into<String>, permutation: Permutation) -> Self {
        RotorDef {
            name: name.into(),
            kind: RotorKind::Fixed,
            permutation,
        }
    }

    /// A moving rotor named `name` with notches at each symbol of `notches`.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::UnknownNotch`] if a notch symbol is not
    /// in the permutation's alphabet.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation, RotorDef};
    ///
    /// let alpha = Arc::new(Alphabet::new("ABCDE").unwrap());
    /// let def = RotorDef::moving("I", Permutation::new("(ABCDE)", &alpha).unwrap(), "A").unwrap();
    /// assert!(def.rotates());
    /// assert_eq!(def.notches(), "A");
    /// ```
    pub fn moving(
        name: impl Into<String>,
        permutation: Permutation,
        notches: &str,
    ) -> Result<Self, EnigmaError> {
        let name = name.into();
        let alphabet = permutation.alphabet();
        let mut indices = Vec::with_capacity(notches.len());
        for symbol in notches.chars() {
            let i = alphabet
                .to_index(symbol)
                .map_err(|_| ConfigurationError::UnknownNotch {
                    rotor: name.clone(),
                    symbol,
                })?;
            if !indices.contains(&i) {
                indices.push(i);
            }
        }
        Ok(RotorDef {
            name,
            kind: RotorKind::Moving { notches: indices },
            permutation,
        })
    }

    /// The plugboard wired as `permutation`.
    pub fn plugboard(permutation: Permutation) -> Self {
        RotorDef {
            name: "Plugboard".to_string(),
            kind: RotorKind::Plugboard,
            permutation,
        }
    }

    /// Returns the rotor's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the rotor's kind.
    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    /// Returns the wiring in the rotor's zero position.
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// Returns the alphabet of the wiring.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        self.permutation.alphabet()
    }

    /// True iff the rotor is pawl-driven.
    pub fn rotates(&self) -> bool {
        matches!(self.kind, RotorKind::Moving { .. })
    }

    /// True iff the rotor is a reflector.
    pub fn reflects(&self) -> bool {
        matches!(self.kind, RotorKind::Reflector)
    }

    /// Returns the notch symbols, empty for non-moving kinds.
    pub fn notches(&self) -> String {
        match &self.kind {
            RotorKind::Moving { notches } => notches
                .iter()
                .map(|&i| self.alphabet().to_symbol(i))
                .collect(),
            _ => String::new(),
        }
    }
}

/// One inserted rotor: a definition plus its current offsets.
#[derive(Debug, Clone)]
pub struct Rotor {
    def: Arc<RotorDef>,
    position: usize,
    ring: usize,
}

impl Rotor {
    /// A rotor at position 0 with ring offset 0.
    pub fn new(def: Arc<RotorDef>) -> Self {
        Rotor {
            def,
            position: 0,
            ring: 0,
        }
    }

    /// Returns the definition this rotor was built from.
    pub fn def(&self) -> &Arc<RotorDef> {
        &self.def
    }

    /// Returns the catalog name.
    pub fn name(&self) -> &str {
        self.def.name()
    }

    /// Returns the wiring.
    pub fn permutation(&self) -> &Permutation {
        self.def.permutation()
    }

    /// Returns the alphabet the wiring is over.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        self.def.alphabet()
    }

    /// Returns the alphabet size.
    pub fn size(&self) -> usize {
        self.def.permutation().size()
    }

    /// True iff a pawl can advance this rotor.
    pub fn rotates(&self) -> bool {
        self.def.rotates()
    }

    /// True iff this rotor is a reflector.
    pub fn reflects(&self) -> bool {
        self.def.reflects()
    }

    /// Returns the rotational offset in `0..size()`.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the symbol currently at the reference point.
    pub fn position_symbol(&self) -> char {
        self.alphabet().to_symbol(self.position)
    }

    /// Returns the ring offset (Ringstellung) in `0..size()`.
    pub fn ring(&self) -> usize {
        self.ring
    }

    /// Sets the rotational offset to `posn` modulo the alphabet size.
    pub fn set_position(&mut self, posn: i64) {
        self.position = self.permutation().wrap(posn);
    }

    /// Sets the rotational offset to the index of `symbol`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidSymbol`] if `symbol` is not in the alphabet.
    pub fn set_position_symbol(&mut self, symbol: char) -> Result<(), EnigmaError> {
        self.position = self.alphabet().to_index(symbol)?;
        Ok(())
    }

    /// Sets the ring offset to `posn` modulo the alphabet size.
    pub fn set_ring(&mut self, posn: i64) {
        self.ring = self.permutation().wrap(posn);
    }

    /// Sets the ring offset to the index of `symbol`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidSymbol`] if `symbol` is not in the alphabet.
    pub fn set_ring_symbol(&mut self, symbol: char) -> Result<(), EnigmaError> {
        self.ring = self.alphabet().to_index(symbol)?;
        Ok(())
    }

    fn shift(&self) -> i64 {
        self.position as i64 - self.ring as i64
    }

    /// Passes index `p` through the wiring from the right-hand contacts.
    ///
    /// The contact is translated into the rotor's own frame by the net
    /// shift (position minus ring), permuted, and translated back.
    pub fn convert_forward(&self, p: usize) -> usize {
        let perm = self.permutation();
        let shift = self.shift();
        let entry = perm.wrap(p as i64 + shift);
        perm.wrap(perm.permute(entry) as i64 - shift)
    }

    /// Passes index `e` through the inverse wiring from the left-hand contacts.
    pub fn convert_backward(&self, e: usize) -> usize {
        let perm = self.permutation();
        let shift = self.shift();
        let entry = perm.wrap(e as i64 + shift);
        perm.wrap(perm.invert(entry) as i64 - shift)
    }

    /// True iff a notch sits at the reference point. Ignores the ring offset.
    pub fn at_notch(&self) -> bool {
        match self.def.kind() {
            RotorKind::Moving { notches } => notches.contains(&self.position),
            _ => false,
        }
    }

    /// Advances one position. No-op for non-moving kinds.
    pub fn advance(&mut self) {
        if self.rotates() {
            self.position = (self.position + 1) % self.size();
        }
    }
}

impl fmt::Display for Rotor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rotor {}", self.name())
    }
}
