//! Session: drives a machine over a stream of settings and message lines.
//!
//! Lines starting with `*` reconfigure the machine. Every other line is a
//! message: whitespace is dropped, the remaining symbols are converted, and
//! the result is written in five-symbol groups. Blank lines are echoed.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::config::settings::{is_settings_line, Settings};
use crate::error::{EnigmaError, SessionError};
use crate::machine::Machine;
use crate::utils::grouping::{group, strip_whitespace, GROUP_WIDTH};

/// A machine plus the bookkeeping needed to process a message stream.
pub struct Session {
    machine: Machine,
    configured: bool,
}

impl Session {
    /// Wraps `machine`. Messages are rejected until a settings line is seen.
    pub fn new(machine: Machine) -> Self {
        Session {
            machine,
            configured: false,
        }
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    /// Processes every line of `input`, writing converted messages to `output`.
    ///
    /// # Errors
    /// - [`SessionError::Io`] if reading or writing fails.
    /// - [`SessionError::Enigma`] if a settings line or message is rejected.
    /// - [`SessionError::MissingSettings`] for a message before any settings line.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::config::MachineConfig;
    /// use enigma::session::Session;
    ///
    /// let config = MachineConfig::parse("ABCDE\n2 1\nR R (AB)(CD)\nI MA (ABCDE)\n").unwrap();
    /// let mut session = Session::new(config.build().unwrap());
    /// let mut out = Vec::new();
    /// session.run("* R I A\nA\n".as_bytes(), &mut out).unwrap();
    /// assert_eq!(String::from_utf8(out).unwrap(), "E\n");
    /// ```
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<(), SessionError> {
        for (i, line) in input.lines().enumerate() {
            let line = line?;
            let number = i + 1;
            let at_line = |source: EnigmaError| SessionError::Enigma {
                line: number,
                source,
            };

            if is_settings_line(&line) {
                Settings::parse(&line, self.machine.num_rotors())
                    .and_then(|settings| settings.apply(&mut self.machine))
                    .map_err(at_line)?;
                self.configured = true;
                debug!(line = number, positions = %self.machine.positions(), "machine configured");
                continue;
            }

            let message = strip_whitespace(&line);
            if message.is_empty() {
                writeln!(output)?;
                continue;
            }
            if !self.configured {
                return Err(SessionError::MissingSettings(number));
            }
            let converted = self.machine.convert_str(&message).map_err(at_line)?;
            writeln!(output, "{}", group(&converted, GROUP_WIDTH))?;
        }
        output.flush()?;
        Ok(())
    }
}
