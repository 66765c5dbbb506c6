//! Per-resource gateways.
//!
//! Each gateway borrows a [`crate::Braintree`] and maps one method per
//! remote operation onto a fixed path and accepted status set.

pub mod credit_card_service;
pub mod testing_service;
pub mod transaction_service;
