//! Enigma: rotor cipher machine simulator.
//!
//! Simulates an electromechanical rotor machine: a plugboard, a stack of
//! substitution rotors, a reflector, and a pawl-driven stepping mechanism
//! with the historical double-stepping anomaly. Because the signal path is
//! an involution, a machine reset to the same settings deciphers its own
//! output.
//!
//! # Architecture
//!
//! ```text
//! Alphabet     (symbol <-> index bijection)
//!     |
//! Permutation  (cycle notation parsed into successor/predecessor tables)
//!     |
//! RotorDef     (immutable catalog entry: reflector, fixed, moving, plugboard)
//! Rotor        (per-slot state: definition + rotational offset + ring offset)
//!     |
//! Machine      (slots, stepping, plugboard -> rotors -> reflector -> rotors -> plugboard)
//! ```
//!
//! # Examples
//!
//! Enigma I with reflector B and rotors I, II, III:
//!
//! ```
//! use std::sync::Arc;
//! use enigma::{Alphabet, Machine, Permutation, RotorDef};
//!
//! let alpha = Arc::new(Alphabet::uppercase());
//! let perm = |cycles: &str| Permutation::new(cycles, &alpha).unwrap();
//! let rotors = vec![
//!     RotorDef::reflector("B", perm("(AY)(BR)(CU)(DH)(EQ)(FS)(GL)(IP)(JX)(KN)(MO)(TZ)(VW)")),
//!     RotorDef::moving("I", perm("(AELTPHQXRU)(BKNW)(CMOY)(DFG)(IV)(JZ)(S)"), "Q").unwrap(),
//!     RotorDef::moving("II", perm("(FIXVYOMW)(CDKLHUP)(ESZ)(BJ)(GR)(NT)(A)(Q)"), "E").unwrap(),
//!     RotorDef::moving("III", perm("(ABDHPEJT)(CFLVMZOYQIRWUKXSG)(N)"), "V").unwrap(),
//! ];
//!
//! let mut machine = Machine::new(Arc::clone(&alpha), 4, 3, rotors).unwrap();
//! machine.insert_rotors(&["B", "I", "II", "III"]).unwrap();
//! machine.set_rotors("AAA").unwrap();
//! assert_eq!(machine.convert_str("AAAAA").unwrap(), "BDZGO");
//!
//! machine.set_rotors("AAA").unwrap();
//! assert_eq!(machine.convert_str("BDZGO").unwrap(), "AAAAA");
//! ```
//!
//! Machines are usually built from a text description:
//!
//! ```
//! use enigma::config::{MachineConfig, Settings};
//!
//! let config = MachineConfig::parse("ABCDE\n2 1\nR R (AB)(CD)\nI MA (ABCDE)\n").unwrap();
//! let mut machine = config.build().unwrap();
//! Settings::parse("* R I A", 2).unwrap().apply(&mut machine).unwrap();
//! assert_eq!(machine.convert_str("A").unwrap(), "E");
//! ```

#![deny(clippy::all)]

pub mod alphabet;
pub mod config;
pub mod error;
pub mod machine;
pub mod observer;
pub mod permutation;
pub mod rotor;
pub mod session;
pub mod utils;

pub use alphabet::Alphabet;
pub use error::{ConfigurationError, EnigmaError, PermutationError, SessionError};
pub use machine::Machine;
pub use observer::{ConversionObserver, Stage, TracingObserver};
pub use permutation::Permutation;
pub use rotor::{Rotor, RotorDef, RotorKind};
