//! Error types for the Enigma library.
//!
//! Errors fall into three families: configuration problems (bad rotor
//! selection, bad setting strings, bad machine descriptions), malformed
//! cycle-notation permutations, and symbols outside the alphabet presented
//! at conversion time. Everything except conversion-time symbol errors is
//! detected before any character is enciphered.

use thiserror::Error;

/// Errors produced by the core machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnigmaError {
    /// The machine or one of its components was configured incorrectly.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    /// A cycle-notation permutation could not be parsed.
    #[error("malformed permutation: {0}")]
    MalformedPermutation(#[from] PermutationError),
    /// A symbol outside the alphabet was presented for conversion.
    #[error("symbol {0:?} is not in the alphabet")]
    InvalidSymbol(char),
    /// An index-addressed conversion received an index outside `0..size`.
    #[error("index {index} is outside the alphabet range 0..{size}")]
    IndexOutOfRange { index: usize, size: usize },
}

/// Reasons a configuration attempt is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A rotor name is not present in the catalog.
    #[error("unknown rotor {0:?}")]
    UnknownRotor(String),
    /// A rotor name appears twice, in the catalog or in a slot list.
    #[error("duplicate rotor {0:?}")]
    DuplicateRotor(String),
    /// Slot 0 holds a rotor that does not reflect.
    #[error("slot 0 must hold a reflector, found {0:?}")]
    MissingReflector(String),
    /// A reflector was placed in a slot other than 0.
    #[error("reflector {name:?} placed in slot {slot}")]
    MisplacedReflector { name: String, slot: usize },
    /// The number of moving rotors does not match the pawl count.
    #[error("expected {expected} moving rotors, found {found}")]
    PawlMismatch { expected: usize, found: usize },
    /// A non-moving rotor sits among the trailing pawl-driven slots.
    #[error("rotor {name:?} in slot {slot} does not rotate but is driven by a pawl")]
    NonMovingInPawlSlot { name: String, slot: usize },
    /// The rotor list does not name one rotor per slot.
    #[error("expected {expected} rotor names, found {found}")]
    SlotCountMismatch { expected: usize, found: usize },
    /// A position or ring setting has the wrong number of symbols.
    #[error("setting {setting:?} has {found} symbols, expected {expected}")]
    SettingLength {
        setting: String,
        expected: usize,
        found: usize,
    },
    /// A position or ring setting contains a symbol outside the alphabet.
    #[error("setting symbol {0:?} is not in the alphabet")]
    SettingSymbol(char),
    /// An operation that needs inserted rotors ran before `insert_rotors`.
    #[error("no rotors have been inserted")]
    NoRotors,
    /// The alphabet text is unusable.
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),
    /// Slot and pawl counts violate `R >= 2` and `P < R`.
    #[error("invalid machine shape: {slots} slots with {pawls} pawls")]
    InvalidShape { slots: usize, pawls: usize },
    /// Two components were built over different alphabets.
    #[error("alphabet mismatch for {0:?}")]
    AlphabetMismatch(String),
    /// A moving rotor names a notch symbol outside the alphabet.
    #[error("notch {symbol:?} of rotor {rotor:?} is not in the alphabet")]
    UnknownNotch { rotor: String, symbol: char },
    /// A machine description could not be parsed.
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    /// A per-message settings line could not be parsed.
    #[error("invalid settings line: {0}")]
    InvalidSettings(String),
    /// A machine description could not be written out.
    #[error("cannot serialize machine description: {0}")]
    Serialization(String),
}

/// Reasons a cycle-notation string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermutationError {
    /// A `(` was not closed before the next `(` or the end of input.
    #[error("unterminated cycle")]
    UnterminatedCycle,
    /// A `)` appeared with no open cycle.
    #[error("unexpected ')' outside a cycle")]
    UnexpectedClose,
    /// `()` with nothing inside.
    #[error("empty cycle")]
    EmptyCycle,
    /// A symbol appeared outside any parenthesized cycle.
    #[error("symbol {0:?} is outside any cycle")]
    OutsideCycle(char),
    /// A symbol is not part of the permutation's alphabet.
    #[error("symbol {0:?} is not in the alphabet")]
    UnknownSymbol(char),
    /// A symbol is mapped more than once.
    #[error("symbol {0:?} appears more than once")]
    RepeatedSymbol(char),
}

/// Errors produced while driving a stream of settings and message lines.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading input or writing output failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// The machine rejected a settings line or a message.
    #[error("line {line}: {source}")]
    Enigma {
        line: usize,
        #[source]
        source: EnigmaError,
    },
    /// A message line appeared before any settings line.
    #[error("line {0}: message before the first settings line")]
    MissingSettings(usize),
}
