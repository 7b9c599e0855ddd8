//! Machine description parsing.
//!
//! Text format, whitespace-separated tokens that may span lines:
//!
//! ```text
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ
//! 5 3
//! I MQ   (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//! B R    (AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)
//! ```
//!
//! The first token is the alphabet, then the slot and pawl counts. Each
//! rotor is a name, a kind token (`M` followed by its notches, `N` for
//! fixed, `R` for a reflector) and the cycles that follow it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::alphabet::Alphabet;
use crate::error::{ConfigurationError, EnigmaError};
use crate::machine::Machine;
use crate::permutation::Permutation;
use crate::rotor::{RotorDef, RotorKind};

/// Everything needed to build a [`Machine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineConfig {
    alphabet: Arc<Alphabet>,
    num_rotors: usize,
    pawls: usize,
    rotors: Vec<RotorDef>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct DescriptionRecord {
    alphabet: String,
    slots: usize,
    pawls: usize,
    rotors: Vec<RotorRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RotorRecord {
    name: String,
    kind: KindRecord,
    #[serde(default)]
    cycles: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    notches: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum KindRecord {
    Reflector,
    Moving,
    Fixed,
}

fn syntax(line: usize, message: impl Into<String>) -> EnigmaError {
    ConfigurationError::Syntax {
        line,
        message: message.into(),
    }
    .into()
}

impl MachineConfig {
    /// Assembles a description from parts.
    pub fn new(
        alphabet: Arc<Alphabet>,
        num_rotors: usize,
        pawls: usize,
        rotors: Vec<RotorDef>,
    ) -> Self {
        MachineConfig {
            alphabet,
            num_rotors,
            pawls,
            rotors,
        }
    }

    /// Parses the text format.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::Syntax`] for missing or malformed
    /// tokens, and the usual alphabet, permutation and notch errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::config::MachineConfig;
    ///
    /// let config = MachineConfig::parse("ABCDE\n2 1\nR R (AB)(CD)\nI MA (ABCDE)\n").unwrap();
    /// assert_eq!(config.num_rotors(), 2);
    /// assert_eq!(config.rotors().len(), 2);
    /// ```
    pub fn parse(text: &str) -> Result<Self, EnigmaError> {
        let mut tokens = text
            .lines()
            .enumerate()
            .flat_map(|(i, line)| line.split_whitespace().map(move |t| (i + 1, t)))
            .peekable();

        let (alpha_line, alpha_text) = tokens
            .next()
            .ok_or_else(|| syntax(1, "missing alphabet"))?;
        let alphabet = Arc::new(Alphabet::new(alpha_text)?);

        let mut last_line = alpha_line;
        let mut count = |what: &str| -> Result<usize, EnigmaError> {
            let (line, token) = tokens
                .next()
                .ok_or_else(|| syntax(last_line, format!("missing {}", what)))?;
            last_line = line;
            token
                .parse::<usize>()
                .map_err(|_| syntax(line, format!("invalid {} {:?}", what, token)))
        };
        let num_rotors = count("slot count")?;
        let pawls = count("pawl count")?;

        let mut rotors = Vec::new();
        while let Some((line, name)) = tokens.next() {
            if name.starts_with('(') {
                return Err(syntax(line, format!("cycle {:?} has no rotor name", name)));
            }
            let (kind_line, kind) = tokens
                .next()
                .ok_or_else(|| syntax(line, format!("rotor {:?} has no kind", name)))?;

            let mut cycles = String::new();
            let mut depth = 0i64;
            while let Some(&(_, token)) = tokens.peek() {
                if depth == 0 && !token.starts_with('(') {
                    break;
                }
                depth += token.matches('(').count() as i64 - token.matches(')').count() as i64;
                cycles.push_str(token);
                cycles.push(' ');
                tokens.next();
            }
            let permutation = Permutation::new(&cycles, &alphabet)?;

            let mut kind_chars = kind.chars();
            let def = match (kind_chars.next(), kind_chars.as_str()) {
                (Some('M'), notches) => RotorDef::moving(name, permutation, notches)?,
                (Some('N'), "") => RotorDef::fixed(name, permutation),
                (Some('R'), "") => RotorDef::reflector(name, permutation),
                _ => {
                    return Err(syntax(
                        kind_line,
                        format!("invalid kind {:?} for rotor {:?}", kind, name),
                    ))
                }
            };
            rotors.push(def);
        }

        Ok(MachineConfig {
            alphabet,
            num_rotors,
            pawls,
            rotors,
        })
    }

    /// Parses the JSON format.
    ///
    /// ```
    /// use enigma::config::MachineConfig;
    ///
    /// let json = r#"{ "alphabet": "ABCDE", "slots": 2, "pawls": 1, "rotors": [
    ///     { "name": "R", "kind": "reflector", "cycles": "(AB)(CD)" },
    ///     { "name": "I", "kind": "moving", "cycles": "(ABCDE)", "notches": "A" } ] }"#;
    /// let config = MachineConfig::from_json(json).unwrap();
    /// assert_eq!(config.pawls(), 1);
    /// ```
    ///
    /// # Errors
    /// Returns [`ConfigurationError::Syntax`] if the JSON does not match the
    /// schema, and the usual alphabet, permutation and notch errors.
    pub fn from_json(text: &str) -> Result<Self, EnigmaError> {
        let record: DescriptionRecord =
            serde_json::from_str(text).map_err(|e| syntax(e.line(), e.to_string()))?;

        let alphabet = Arc::new(Alphabet::new(&record.alphabet)?);
        let rotors = record
            .rotors
            .into_iter()
            .map(|r| -> Result<RotorDef, EnigmaError> {
                if !matches!(r.kind, KindRecord::Moving) && !r.notches.is_empty() {
                    return Err(syntax(
                        0,
                        format!("rotor {:?} does not move but has notches", r.name),
                    ));
                }
                let permutation = Permutation::new(&r.cycles, &alphabet)?;
                Ok(match r.kind {
                    KindRecord::Reflector => RotorDef::reflector(r.name, permutation),
                    KindRecord::Fixed => RotorDef::fixed(r.name, permutation),
                    KindRecord::Moving => RotorDef::moving(r.name, permutation, &r.notches)?,
                })
            })
            .collect::<Result<Vec<_>, EnigmaError>>()?;

        Ok(MachineConfig {
            alphabet,
            num_rotors: record.slots,
            pawls: record.pawls,
            rotors,
        })
    }

    /// Serializes to the JSON format.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::Serialization`] if `serde_json` fails.
    pub fn to_json(&self) -> Result<String, EnigmaError> {
        let record = DescriptionRecord {
            alphabet: self.alphabet.to_string(),
            slots: self.num_rotors,
            pawls: self.pawls,
            rotors: self
                .rotors
                .iter()
                .filter_map(|def| {
                    let kind = match def.kind() {
                        RotorKind::Reflector => KindRecord::Reflector,
                        RotorKind::Moving { .. } => KindRecord::Moving,
                        RotorKind::Fixed => KindRecord::Fixed,
                        RotorKind::Plugboard => return None,
                    };
                    Some(RotorRecord {
                        name: def.name().to_string(),
                        kind,
                        cycles: def.permutation().to_string(),
                        notches: def.notches(),
                    })
                })
                .collect(),
        };
        serde_json::to_string_pretty(&record)
            .map_err(|e| EnigmaError::from(ConfigurationError::Serialization(e.to_string())))
    }

    /// Returns the alphabet every rotor is wired over.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns the slot count, reflector included.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Returns the pawl count.
    pub fn pawls(&self) -> usize {
        self.pawls
    }

    /// Returns the rotor catalog in description order.
    pub fn rotors(&self) -> &[RotorDef] {
        &self.rotors
    }

    /// Builds a fresh machine. Each call yields independent rotor state.
    ///
    /// # Errors
    /// See [`Machine::new`].
    pub fn build(&self) -> Result<Machine, EnigmaError> {
        Machine::new(
            Arc::clone(&self.alphabet),
            self.num_rotors,
            self.pawls,
            self.rotors.iter().cloned(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOY: &str = "ABCDE\n3 2\nR R (AB)(CD)\nI MA (ABCDE)\nII MCE\n  (AC)\n  (BED)\nF N\n";

    #[test]
    fn test_parse_toy() {
        let config = MachineConfig::parse(TOY).unwrap();
        assert_eq!(config.alphabet().to_string(), "ABCDE");
        assert_eq!(config.num_rotors(), 3);
        assert_eq!(config.pawls(), 2);
        let names: Vec<&str> = config.rotors().iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["R", "I", "II", "F"]);
        assert!(config.rotors()[0].reflects());
        assert_eq!(config.rotors()[2].notches(), "CE");
        assert_eq!(config.rotors()[2].permutation().to_string(), "(AC)(BED)");
        assert_eq!(config.rotors()[3].permutation().to_string(), "");
    }

    #[test]
    fn test_parse_split_cycle_tokens() {
        let config = MachineConfig::parse("ABCDE 2 1 R R ( A B ) I M (ABCDE)").unwrap();
        assert_eq!(config.rotors()[0].permutation().to_string(), "(AB)");
        assert_eq!(config.rotors()[1].notches(), "");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            MachineConfig::parse(""),
            Err(EnigmaError::Configuration(ConfigurationError::Syntax { .. }))
        ));
        assert_eq!(
            MachineConfig::parse("ABCDE\nthree 1\n"),
            Err(syntax(2, "invalid slot count \"three\""))
        );
        assert_eq!(
            MachineConfig::parse("ABCDE\n3 1\nI X (AB)\n"),
            Err(syntax(3, "invalid kind \"X\" for rotor \"I\""))
        );
        assert_eq!(
            MachineConfig::parse("ABCDE\n3 1\nI\n"),
            Err(syntax(3, "rotor \"I\" has no kind"))
        );
        assert!(matches!(
            MachineConfig::parse("ABCDE\n3 1\nI MA (AB)(BC)\n"),
            Err(EnigmaError::MalformedPermutation(_))
        ));
        assert!(matches!(
            MachineConfig::parse("ABCDE\n3 1\nI MZ (AB)\n"),
            Err(EnigmaError::Configuration(
                ConfigurationError::UnknownNotch { .. }
            ))
        ));
    }

    #[test]
    fn test_missing_counts_report_last_line() {
        assert_eq!(
            MachineConfig::parse("ABCDE\n"),
            Err(syntax(1, "missing slot count"))
        );
        assert_eq!(
            MachineConfig::parse("ABCDE\n\n3\n"),
            Err(syntax(3, "missing pawl count"))
        );
    }

    #[test]
    fn test_json_rejects_notches_on_non_moving() {
        for kind in ["reflector", "fixed"] {
            let json = format!(
                r#"{{"alphabet":"ABCDE","slots":2,"pawls":0,"rotors":[{{"name":"X","kind":"{}","cycles":"(AB)","notches":"A"}}]}}"#,
                kind
            );
            assert!(matches!(
                MachineConfig::from_json(&json),
                Err(EnigmaError::Configuration(ConfigurationError::Syntax { .. }))
            ));
        }
    }

    #[test]
    fn test_to_json_keeps_notches() {
        let json = MachineConfig::parse(TOY).unwrap().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rotors"][2]["notches"], "CE");
        assert_eq!(value["rotors"][0]["kind"], "reflector");
        assert!(value["rotors"][0].get("notches").is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let config = MachineConfig::parse(TOY).unwrap();
        let again = MachineConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(config, again);
    }

    #[test]
    fn test_json_rejects_unknown_kind() {
        let json = r#"{"alphabet":"AB","slots":2,"pawls":0,"rotors":[{"name":"X","kind":"spinning"}]}"#;
        assert!(matches!(
            MachineConfig::from_json(json),
            Err(EnigmaError::Configuration(ConfigurationError::Syntax { .. }))
        ));
    }

    #[test]
    fn test_build_independent_machines() {
        let config = MachineConfig::parse(TOY).unwrap();
        let mut a = config.build().unwrap();
        let mut b = config.build().unwrap();
        a.insert_rotors(&["R", "I", "II"]).unwrap();
        b.insert_rotors(&["R", "I", "II"]).unwrap();
        a.convert_str("ABCDE").unwrap();
        assert_eq!(b.positions(), "AA");
        assert_ne!(a.positions(), "AA");
    }
}
