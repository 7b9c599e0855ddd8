//! Conversion observers: optional hooks into each pipeline stage.
//!
//! The machine reports every stage of a conversion to an attached observer.
//! Output is the same whether or not an observer is attached.

use std::fmt;

use tracing::trace;

/// One step of the conversion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Plugboard on the way in.
    PlugboardIn,
    /// Right-to-left pass through the rotor in `slot`.
    Forward { slot: usize },
    /// The reflector in slot 0.
    Reflector,
    /// Left-to-right pass through the rotor in `slot`.
    Backward { slot: usize },
    /// Plugboard on the way out.
    PlugboardOut,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::PlugboardIn => write!(f, "plugboard-in"),
            Stage::Forward { slot } => write!(f, "forward[{}]", slot),
            Stage::Reflector => write!(f, "reflector"),
            Stage::Backward { slot } => write!(f, "backward[{}]", slot),
            Stage::PlugboardOut => write!(f, "plugboard-out"),
        }
    }
}

/// Receives a callback after the rotors step and after each stage.
pub trait ConversionObserver {
    /// Called once per character after stepping, with the position
    /// symbols of slots `1..R`.
    fn stepped(&mut self, _positions: &str) {}

    /// Called after `stage` mapped `before` to `after`.
    fn stage(&mut self, stage: Stage, before: char, after: char);
}

/// Emits one `trace!` event per callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ConversionObserver for TracingObserver {
    fn stepped(&mut self, positions: &str) {
        trace!(positions, "rotors stepped");
    }

    fn stage(&mut self, stage: Stage, before: char, after: char) {
        trace!(%stage, %before, %after, "conversion stage");
    }
}
