//! Property-based tests for permutations, index wrapping and the machine.
//!
//! These check the algebraic guarantees the cipher relies on: permute and
//! invert are mutual inverses, wrapping is periodic, and a machine reset
//! to the same settings deciphers its own output.

use std::sync::Arc;

use proptest::prelude::*;

use enigma::config::{MachineConfig, Settings};
use enigma::{Alphabet, Permutation};

const ENIGMA_I: &str = include_str!("data/enigma_i.conf");

/// Writes `mapping` (index -> image) in cycle notation over `alphabet`.
fn cycle_notation(mapping: &[usize], alphabet: &Alphabet) -> String {
    let mut visited = vec![false; mapping.len()];
    let mut out = String::new();
    for start in 0..mapping.len() {
        if visited[start] {
            continue;
        }
        out.push('(');
        let mut i = start;
        while !visited[i] {
            visited[i] = true;
            out.push(alphabet.to_symbol(i));
            i = mapping[i];
        }
        out.push(')');
    }
    out
}

fn shuffled_indices() -> impl Strategy<Value = Vec<usize>> {
    Just((0..26).collect::<Vec<usize>>()).prop_shuffle()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn permutation_matches_cycles(mapping in shuffled_indices()) {
        let alpha = Arc::new(Alphabet::uppercase());
        let perm = Permutation::new(&cycle_notation(&mapping, &alpha), &alpha).unwrap();
        for (x, &y) in mapping.iter().enumerate() {
            prop_assert_eq!(perm.permute(x), y);
            prop_assert_eq!(perm.invert(y), x);
        }
    }

    #[test]
    fn permute_invert_round_trip(mapping in shuffled_indices(), x in 0usize..26) {
        let alpha = Arc::new(Alphabet::uppercase());
        let perm = Permutation::new(&cycle_notation(&mapping, &alpha), &alpha).unwrap();
        prop_assert_eq!(perm.invert(perm.permute(x)), x);
        prop_assert_eq!(perm.permute(perm.invert(x)), x);
    }

    #[test]
    fn display_reparses_to_same_permutation(mapping in shuffled_indices()) {
        let alpha = Arc::new(Alphabet::uppercase());
        let perm = Permutation::new(&cycle_notation(&mapping, &alpha), &alpha).unwrap();
        let again = Permutation::new(&perm.to_string(), &alpha).unwrap();
        prop_assert_eq!(perm, again);
    }

    #[test]
    fn wrap_is_periodic(x in -1_000_000i64..1_000_000i64) {
        let alpha = Arc::new(Alphabet::uppercase());
        let perm = Permutation::identity(&alpha);
        let n = perm.size() as i64;
        let w = perm.wrap(x);
        prop_assert!(w < perm.size());
        prop_assert_eq!(w, perm.wrap(x + n));
        prop_assert_eq!(w, perm.wrap(x - n));
    }

    #[test]
    fn machine_is_self_inverse(
        positions in "[A-Z]{3}",
        ring in "[A-Z]{3}",
        message in "[A-Z]{0,80}",
    ) {
        let config = MachineConfig::parse(ENIGMA_I).unwrap();
        let line = format!("* B I II III {} {} (AZ) (QR) (MN)", positions, ring);
        let settings = Settings::parse(&line, 4).unwrap();

        let mut encoder = config.build().unwrap();
        settings.apply(&mut encoder).unwrap();
        let cipher = encoder.convert_str(&message).unwrap();

        let mut decoder = config.build().unwrap();
        settings.apply(&mut decoder).unwrap();
        prop_assert_eq!(decoder.convert_str(&cipher).unwrap(), message.clone());

        for (p, c) in message.chars().zip(cipher.chars()) {
            prop_assert_ne!(p, c);
        }
    }
}
