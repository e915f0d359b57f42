//! Command implementations behind the `mcanopy` binary.

pub mod commands;
