//! Per-message settings lines.
//!
//! ```text
//! * B BETA III IV I AXLE LLAA (HQ) (EX) (IP) (TR) (BY)
//! ```
//!
//! The `*` is followed by one rotor name per slot (reflector first), the
//! position setting, an optional ring setting and optional plugboard cycles.

use crate::error::{ConfigurationError, EnigmaError};
use crate::machine::Machine;
use crate::permutation::Permutation;

/// A parsed settings line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub rotors: Vec<String>,
    pub positions: String,
    pub ring: Option<String>,
    pub plugboard: String,
}

/// True iff `line` is a settings line rather than a message.
pub fn is_settings_line(line: &str) -> bool {
    line.trim_start().starts_with('*')
}

fn invalid(message: impl Into<String>) -> EnigmaError {
    ConfigurationError::InvalidSettings(message.into()).into()
}

impl Settings {
    /// Parses a settings line for a machine with `num_rotors` slots.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::InvalidSettings`] if the line does not
    /// start with `*`, names fewer than `num_rotors` rotors, or has no
    /// position setting.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::config::Settings;
    ///
    /// let s = Settings::parse("* B I II III AXL BBB (AB) (CD)", 4).unwrap();
    /// assert_eq!(s.rotors, vec!["B", "I", "II", "III"]);
    /// assert_eq!(s.positions, "AXL");
    /// assert_eq!(s.ring.as_deref(), Some("BBB"));
    /// assert_eq!(s.plugboard, "(AB) (CD)");
    /// ```
    pub fn parse(line: &str, num_rotors: usize) -> Result<Self, EnigmaError> {
        let body = line
            .trim_start()
            .strip_prefix('*')
            .ok_or_else(|| invalid("missing leading '*'"))?;
        let mut tokens = body.split_whitespace().peekable();

        let mut rotors = Vec::with_capacity(num_rotors);
        for slot in 0..num_rotors {
            match tokens.next() {
                Some(name) if !name.starts_with('(') => rotors.push(name.to_string()),
                _ => {
                    return Err(invalid(format!(
                        "expected {} rotor names, found {}",
                        num_rotors, slot
                    )))
                }
            }
        }

        let positions = match tokens.next() {
            Some(token) if !token.starts_with('(') => token.to_string(),
            _ => return Err(invalid("missing position setting")),
        };

        let ring = match tokens.peek() {
            Some(token) if !token.starts_with('(') => tokens.next().map(str::to_string),
            _ => None,
        };

        let plugboard = tokens.collect::<Vec<_>>().join(" ");

        Ok(Settings {
            rotors,
            positions,
            ring,
            plugboard,
        })
    }

    /// Configures `machine`: inserts the rotors, sets positions, ring
    /// settings and plugboard.
    ///
    /// Setting strings and plugboard are checked before the machine is
    /// touched, so a rejected line leaves the previous configuration intact.
    ///
    /// # Errors
    /// Any error from [`Machine::insert_rotors`], [`Machine::set_rotors`],
    /// [`Machine::set_ringstellung`] or plugboard parsing.
    pub fn apply(&self, machine: &mut Machine) -> Result<(), EnigmaError> {
        machine.check_setting(&self.positions)?;
        if let Some(ring) = &self.ring {
            machine.check_setting(ring)?;
        }
        let plugboard = Permutation::new(&self.plugboard, machine.alphabet())?;

        machine.insert_rotors(&self.rotors)?;
        machine.set_rotors(&self.positions)?;
        if let Some(ring) = &self.ring {
            machine.set_ringstellung(ring)?;
        }
        machine.set_plugboard(plugboard)
    }
}
