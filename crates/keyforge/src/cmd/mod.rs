//! Command implementations for the Keyforge CLI

pub mod serve;
pub mod token;
