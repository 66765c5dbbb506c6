//! Testing gateway - force settlement states in the sandbox.
//!
//! These calls only exist on non-production gateways. In production they
//! fail with `TestOperationInProduction` before any request is sent.

use reqwest::Method;

use crate::{
    config::Environment,
    error::{BraintreeError, Result},
    gateway::{Braintree, require_id},
    models::transaction::Transaction,
};

#[derive(Debug, Clone, Copy)]
pub struct TestingGateway<'a> {
    braintree: &'a Braintree,
}

impl<'a> TestingGateway<'a> {
    pub(crate) fn new(braintree: &'a Braintree) -> Self {
        Self { braintree }
    }

    /// Move a submitted transaction to `settled`.
    pub async fn settle(&self, id: &str) -> Result<Transaction> {
        self.transition(id, "settle").await
    }

    /// Move a transaction to `settlement_confirmed`.
    pub async fn settlement_confirm(&self, id: &str) -> Result<Transaction> {
        self.transition(id, "settlement_confirm").await
    }

    /// Move a transaction to `settlement_declined`.
    pub async fn settlement_decline(&self, id: &str) -> Result<Transaction> {
        self.transition(id, "settlement_decline").await
    }

    /// Move a transaction to `settlement_pending`.
    pub async fn settlement_pending(&self, id: &str) -> Result<Transaction> {
        self.transition(id, "settlement_pending").await
    }

    async fn transition(&self, id: &str, action: &str) -> Result<Transaction> {
        if self.braintree.config().environment == Environment::Production {
            return Err(BraintreeError::TestOperationInProduction);
        }

        let id = require_id("transaction id", id)?;
        self.braintree
            .execute(Method::PUT, &["transactions", id, action], None, None)
            .await?
            .accept(&[200])?
            .transaction()
    }
}
