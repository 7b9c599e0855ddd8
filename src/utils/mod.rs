//! Text helpers shared by the session driver and the CLI.

pub mod grouping;
