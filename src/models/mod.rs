//! Gateway request and response types.
//!
//! Request bodies serialize to Braintree's kebab-case XML; responses decode
//! from it. Nothing here is persisted.

pub mod credit_card;
pub mod search;
pub mod transaction;
