//! Machine descriptions and per-message settings.
//!
//! A machine description gives the alphabet, the slot and pawl counts, and
//! the rotor catalog. It can be written as plain text or as JSON. A settings
//! line chooses rotors, positions, ring settings and plugboard for the
//! messages that follow it.

pub mod description;
pub mod settings;

pub use description::MachineConfig;
pub use settings::Settings;
