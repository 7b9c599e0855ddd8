//! Machine: slot assignment, stepping and the conversion pipeline.
//!
//! Slot 0 holds the reflector and slot `R-1` the fastest rotor. The
//! trailing `P` slots hold pawl-driven rotors. Each conversion first steps
//! the rotors, then sends the signal through the plugboard, the rotor stack
//! right to left, the reflector, the stack left to right, and the plugboard
//! again.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::alphabet::Alphabet;
use crate::error::{ConfigurationError, EnigmaError};
use crate::observer::{ConversionObserver, Stage};
use crate::permutation::Permutation;
use crate::rotor::{Rotor, RotorDef};

/// A complete rotor cipher machine.
///
/// The catalog holds immutable [`RotorDef`]s. Inserting rotors creates fresh
/// per-slot [`Rotor`] state, so a machine never aliases offsets with
/// another machine built from the same definitions.
///
/// A machine is not meant for concurrent use: every conversion mutates the
/// rotor offsets. Use one machine per session.
pub struct Machine {
    alphabet: Arc<Alphabet>,
    num_rotors: usize,
    pawls: usize,
    catalog: HashMap<String, Arc<RotorDef>>,
    slots: Vec<Rotor>,
    plugboard: Rotor,
    observer: Option<Box<dyn ConversionObserver + Send>>,
}

impl Machine {
    /// Creates a machine with `num_rotors` slots and `pawls` pawls over
    /// `alphabet`, drawing rotors from `rotors`.
    ///
    /// The plugboard starts as the identity and no rotors are inserted.
    ///
    /// # Errors
    /// - [`ConfigurationError::InvalidShape`] unless `num_rotors >= 2` and
    ///   `pawls < num_rotors`.
    /// - [`ConfigurationError::AlphabetMismatch`] if a rotor is wired over a
    ///   different alphabet.
    /// - [`ConfigurationError::DuplicateRotor`] if two rotors share a name.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Machine, Permutation, RotorDef};
    ///
    /// let alpha = Arc::new(Alphabet::new("ABCDE").unwrap());
    /// let rotors = vec![
    ///     RotorDef::reflector("R", Permutation::new("(AB)(CD)", &alpha).unwrap()),
    ///     RotorDef::moving("I", Permutation::new("(ABCDE)", &alpha).unwrap(), "A").unwrap(),
    /// ];
    /// let mut machine = Machine::new(alpha, 2, 1, rotors).unwrap();
    /// machine.insert_rotors(&["R", "I"]).unwrap();
    /// machine.set_rotors("A").unwrap();
    /// assert_eq!(machine.convert_str("A").unwrap(), "E");
    /// ```
    pub fn new(
        alphabet: Arc<Alphabet>,
        num_rotors: usize,
        pawls: usize,
        rotors: impl IntoIterator<Item = RotorDef>,
    ) -> Result<Self, EnigmaError> {
        if num_rotors < 2 || pawls >= num_rotors {
            return Err(ConfigurationError::InvalidShape {
                slots: num_rotors,
                pawls,
            }
            .into());
        }

        let mut catalog = HashMap::new();
        for def in rotors {
            if **def.alphabet() != *alphabet {
                return Err(ConfigurationError::AlphabetMismatch(def.name().to_string()).into());
            }
            let name = def.name().to_string();
            if catalog.insert(name.clone(), Arc::new(def)).is_some() {
                return Err(ConfigurationError::DuplicateRotor(name).into());
            }
        }

        let plugboard = Rotor::new(Arc::new(RotorDef::plugboard(Permutation::identity(
            &alphabet,
        ))));

        Ok(Machine {
            alphabet,
            num_rotors,
            pawls,
            catalog,
            slots: Vec::new(),
            plugboard,
            observer: None,
        })
    }

    /// Returns the number of rotor slots, reflector included.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Returns the number of pawls, and thus of moving rotors.
    pub fn num_pawls(&self) -> usize {
        self.pawls
    }

    /// Returns the alphabet shared by the rotors and plugboard.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns the rotor in slot `k`; slot 0 is the reflector.
    /// `None` before rotors are inserted or if `k` is out of range.
    pub fn rotor(&self, k: usize) -> Option<&Rotor> {
        self.slots.get(k)
    }

    /// Returns the inserted rotors, reflector first.
    pub fn rotors(&self) -> &[Rotor] {
        &self.slots
    }

    /// Returns the catalog definition named `name`.
    pub fn available_rotor(&self, name: &str) -> Option<&RotorDef> {
        self.catalog.get(name).map(|def| def.as_ref())
    }

    /// Returns the current plugboard permutation.
    pub fn plugboard(&self) -> &Permutation {
        self.plugboard.permutation()
    }

    /// Returns the position symbols of slots `1..R`, leftmost first.
    pub fn positions(&self) -> String {
        self.slots
            .iter()
            .skip(1)
            .map(|rotor| rotor.position_symbol())
            .collect()
    }

    /// Attaches or detaches a conversion observer.
    pub fn set_observer(&mut self, observer: Option<Box<dyn ConversionObserver + Send>>) {
        self.observer = observer;
    }

    /// Fills the slots with the catalog rotors named in `names`, reflector
    /// first. Every inserted rotor starts at position 0 with ring offset 0.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Configuration`] if the list does not name
    /// exactly one known rotor per slot, repeats a name, lacks a reflector
    /// in slot 0, has a reflector elsewhere, or does not place exactly
    /// `num_pawls()` moving rotors in the trailing slots. The previous slot
    /// assignment is left untouched on error.
    pub fn insert_rotors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), EnigmaError> {
        let selected = self.select_rotors(names)?;
        self.slots = selected.into_iter().map(Rotor::new).collect();
        debug!(rotors = ?self.slot_names(), "rotors inserted");
        Ok(())
    }

    fn select_rotors<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Arc<RotorDef>>, EnigmaError> {
        if names.len() != self.num_rotors {
            return Err(ConfigurationError::SlotCountMismatch {
                expected: self.num_rotors,
                found: names.len(),
            }
            .into());
        }

        let mut selected: Vec<Arc<RotorDef>> = Vec::with_capacity(names.len());
        for (slot, name) in names.iter().enumerate() {
            let name = name.as_ref();
            let def = self
                .catalog
                .get(name)
                .ok_or_else(|| ConfigurationError::UnknownRotor(name.to_string()))?;
            if selected.iter().any(|d| d.name() == name) {
                return Err(ConfigurationError::DuplicateRotor(name.to_string()).into());
            }
            if slot == 0 && !def.reflects() {
                return Err(ConfigurationError::MissingReflector(name.to_string()).into());
            }
            if slot > 0 && def.reflects() {
                return Err(ConfigurationError::MisplacedReflector {
                    name: name.to_string(),
                    slot,
                }
                .into());
            }
            selected.push(Arc::clone(def));
        }

        let moving = selected.iter().filter(|d| d.rotates()).count();
        if moving != self.pawls {
            return Err(ConfigurationError::PawlMismatch {
                expected: self.pawls,
                found: moving,
            }
            .into());
        }
        let first_moving = self.num_rotors - self.pawls;
        for (slot, def) in selected.iter().enumerate().skip(first_moving) {
            if !def.rotates() {
                return Err(ConfigurationError::NonMovingInPawlSlot {
                    name: def.name().to_string(),
                    slot,
                }
                .into());
            }
        }

        Ok(selected)
    }

    fn slot_names(&self) -> Vec<&str> {
        self.slots.iter().map(|rotor| rotor.name()).collect()
    }

    /// Checks a position or ring setting and returns its indices.
    pub(crate) fn check_setting(&self, setting: &str) -> Result<Vec<usize>, EnigmaError> {
        let expected = self.num_rotors - 1;
        let found = setting.chars().count();
        if found != expected {
            return Err(ConfigurationError::SettingLength {
                setting: setting.to_string(),
                expected,
                found,
            }
            .into());
        }
        setting
            .chars()
            .map(|c| {
                self.alphabet
                    .to_index(c)
                    .map_err(|_| EnigmaError::from(ConfigurationError::SettingSymbol(c)))
            })
            .collect()
    }

    /// Sets the rotational positions of slots `1..R` from `setting`, whose
    /// first symbol is for the leftmost non-reflector slot.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Configuration`] if no rotors are inserted, the
    /// length is not `num_rotors() - 1`, or a symbol is outside the
    /// alphabet. No rotor changes on error.
    pub fn set_rotors(&mut self, setting: &str) -> Result<(), EnigmaError> {
        if self.slots.is_empty() {
            return Err(ConfigurationError::NoRotors.into());
        }
        let indices = self.check_setting(setting)?;
        for (rotor, posn) in self.slots.iter_mut().skip(1).zip(indices) {
            rotor.set_position(posn as i64);
        }
        debug!(setting, "rotor positions set");
        Ok(())
    }

    /// Sets the ring offsets (Ringstellung) of slots `1..R` from `setting`.
    ///
    /// # Errors
    /// Same contract as [`set_rotors`](Self::set_rotors).
    pub fn set_ringstellung(&mut self, setting: &str) -> Result<(), EnigmaError> {
        if self.slots.is_empty() {
            return Err(ConfigurationError::NoRotors.into());
        }
        let indices = self.check_setting(setting)?;
        for (rotor, ring) in self.slots.iter_mut().skip(1).zip(indices) {
            rotor.set_ring(ring as i64);
        }
        debug!(setting, "ring settings set");
        Ok(())
    }

    /// Replaces the plugboard permutation.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::AlphabetMismatch`] if `plugboard` is
    /// over a different alphabet than the machine.
    pub fn set_plugboard(&mut self, plugboard: Permutation) -> Result<(), EnigmaError> {
        if **plugboard.alphabet() != *self.alphabet {
            return Err(ConfigurationError::AlphabetMismatch("Plugboard".to_string()).into());
        }
        debug!(plugboard = %plugboard, "plugboard set");
        self.plugboard = Rotor::new(Arc::new(RotorDef::plugboard(plugboard)));
        Ok(())
    }

    /// Steps the rotors once.
    ///
    /// The fastest rotor always advances. Any other moving rotor advances
    /// when its right neighbour is at a notch, or when it is itself at a
    /// notch and its left neighbour is a moving rotor (double step). Notches
    /// are read before any rotor moves.
    pub fn advance_rotors(&mut self) {
        let n = self.slots.len();
        if n == 0 || self.pawls == 0 {
            return;
        }
        let first_moving = n - self.pawls;

        let mut step = vec![false; n];
        step[n - 1] = true;
        for i in first_moving..n - 1 {
            if self.slots[i + 1].at_notch() {
                step[i] = true;
            }
            if i > first_moving && self.slots[i].at_notch() {
                step[i] = true;
            }
        }

        for (rotor, _) in self.slots.iter_mut().zip(step).filter(|(_, s)| *s) {
            rotor.advance();
        }
    }

    /// Steps the rotors, then converts index `c` through the pipeline.
    ///
    /// # Errors
    /// - [`ConfigurationError::NoRotors`] before any rotors are inserted.
    /// - [`EnigmaError::IndexOutOfRange`] if `c >= alphabet().size()`.
    ///
    /// Neither error steps the rotors.
    pub fn convert(&mut self, c: usize) -> Result<usize, EnigmaError> {
        if self.slots.is_empty() {
            return Err(ConfigurationError::NoRotors.into());
        }
        let size = self.alphabet.size();
        if c >= size {
            return Err(EnigmaError::IndexOutOfRange { index: c, size });
        }
        Ok(self.convert_index(c))
    }

    fn convert_index(&mut self, c: usize) -> usize {
        self.advance_rotors();
        if self.observer.is_some() {
            let positions = self.positions();
            if let Some(observer) = self.observer.as_mut() {
                observer.stepped(&positions);
            }
        }

        let mut out = self.plugboard.permutation().permute(c);
        self.report(Stage::PlugboardIn, c, out);

        for slot in (0..self.slots.len()).rev() {
            let before = out;
            out = self.slots[slot].convert_forward(out);
            let stage = if slot == 0 {
                Stage::Reflector
            } else {
                Stage::Forward { slot }
            };
            self.report(stage, before, out);
        }

        for slot in 1..self.slots.len() {
            let before = out;
            out = self.slots[slot].convert_backward(out);
            self.report(Stage::Backward { slot }, before, out);
        }

        let before = out;
        out = self.plugboard.permutation().permute(out);
        self.report(Stage::PlugboardOut, before, out);
        out
    }

    fn report(&mut self, stage: Stage, before: usize, after: usize) {
        if let Some(observer) = self.observer.as_mut() {
            observer.stage(
                stage,
                self.alphabet.to_symbol(before),
                self.alphabet.to_symbol(after),
            );
        }
    }

    /// Steps the rotors, then converts symbol `c`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidSymbol`] if `c` is not in the alphabet,
    /// or [`ConfigurationError::NoRotors`] before rotors are inserted.
    pub fn convert_char(&mut self, c: char) -> Result<char, EnigmaError> {
        let index = self.alphabet.to_index(c)?;
        let out = self.convert(index)?;
        Ok(self.alphabet.to_symbol(out))
    }

    /// Converts `msg` symbol by symbol, stepping once per symbol.
    ///
    /// The whole message is checked against the alphabet first, so an
    /// invalid symbol leaves the rotors where they were.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidSymbol`] for the first symbol outside
    /// the alphabet, or [`ConfigurationError::NoRotors`].
    pub fn convert_str(&mut self, msg: &str) -> Result<String, EnigmaError> {
        if self.slots.is_empty() {
            return Err(ConfigurationError::NoRotors.into());
        }
        let indices = msg
            .chars()
            .map(|c| self.alphabet.to_index(c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(indices
            .into_iter()
            .map(|i| {
                let out = self.convert_index(i);
                self.alphabet.to_symbol(out)
            })
            .collect())
    }
}
