//! This crate provides the vocabulary that the other crates in the workspace share: the names of
//! the JSON-RPC methods and transaction fields the gas providers understand, the codec for the
//! hex "quantity" encoding used on the wire, and the gas multiplier.

pub mod multiplier;
pub mod names;
pub mod quantity;

pub use multiplier::*;
pub use quantity::*;
