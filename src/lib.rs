//! Braintree gateway client.
//!
//! Typed requests are serialized to Braintree's XML wire format, sent to
//! fixed resource paths under `/merchants/{merchant_id}/`, and responses are
//! decoded back into typed results.
//!
//! # Layout
//!
//! - [`config`]: credentials and environment, loaded from `BRAINTREE_*` variables
//! - [`gateway`]: the [`Braintree`] client and request execution
//! - [`services`]: transaction, credit card and sandbox testing gateways
//! - [`models`]: request/response types and search queries
//! - [`pagination`]: page-offset arithmetic for search cursors

pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod pagination;
pub mod services;
pub mod xml;

pub use config::{Config, Environment};
pub use error::{BraintreeError, Result};
pub use gateway::Braintree;
pub use models::credit_card::{CreditCard, CreditCardOptions};
pub use models::search::{Page, SearchQuery, SearchResult};
pub use models::transaction::{
    Transaction, TransactionCloneOptions, TransactionCloneRequest, TransactionOptions,
    TransactionRequest, TransactionStatus, TransactionType,
};
pub use services::credit_card_service::{CreditCardGateway, CreditCardSearchResult};
pub use services::testing_service::TestingGateway;
pub use services::transaction_service::{TransactionGateway, TransactionSearchResult};
