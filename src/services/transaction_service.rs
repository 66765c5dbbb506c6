//! Transaction gateway - creating, settling, refunding and searching transactions.
//!
//! Every operation issues one call (search issues two) and accepts a fixed
//! set of status codes; anything else becomes `InvalidResponse`.
//!
//! # Search
//!
//! Searching is two-phase: `advanced_search_ids` returns every matching ID
//! plus a page size, then each page is fetched by re-running the query
//! restricted to that page's slice of IDs.

use std::sync::Arc;

use reqwest::Method;
use rust_decimal::Decimal;

use crate::{
    error::Result,
    gateway::{Braintree, require_id},
    models::search::{Page, SearchQuery, SearchResult},
    models::transaction::{Transaction, TransactionCloneRequest, TransactionList, TransactionRequest},
    xml,
};

/// Operations on `transactions/*`.
#[derive(Debug, Clone, Copy)]
pub struct TransactionGateway<'a> {
    braintree: &'a Braintree,
}

/// A page of transaction search results that can fetch the page after it.
#[derive(Debug, Clone)]
pub struct TransactionSearchResult {
    pub page: Page<Transaction>,
    cursor: Arc<SearchResult>,
    query: SearchQuery,
}

impl TransactionSearchResult {
    pub fn transactions(&self) -> &[Transaction] {
        &self.page.items
    }

    /// Every matching ID, across all pages.
    pub fn total_ids(&self) -> &[String] {
        &self.cursor.ids
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }
}

impl<'a> TransactionGateway<'a> {
    pub(crate) fn new(braintree: &'a Braintree) -> Self {
        Self { braintree }
    }

    /// Create a sale or credit.
    ///
    /// `POST transactions`, expects 201.
    pub async fn create(&self, request: &TransactionRequest) -> Result<Transaction> {
        let body = xml::to_xml(request)?;
        self.braintree
            .execute(Method::POST, &["transactions"], None, Some(body))
            .await?
            .accept(&[201])?
            .transaction()
    }

    /// Create a new transaction from an existing one's payment details.
    ///
    /// `POST transactions/{id}/clone`, expects 201.
    pub async fn clone_transaction(
        &self,
        id: &str,
        request: &TransactionCloneRequest,
    ) -> Result<Transaction> {
        let id = require_id("transaction id", id)?;
        let body = xml::to_xml(request)?;
        self.braintree
            .execute(Method::POST, &["transactions", id, "clone"], None, Some(body))
            .await?
            .accept(&[201])?
            .transaction()
    }

    /// Submit an authorized transaction for settlement.
    ///
    /// When `amount` is `None` the full authorized amount is settled and no
    /// body is sent.
    ///
    /// `PUT transactions/{id}/submit_for_settlement`, expects 200.
    pub async fn submit_for_settlement(
        &self,
        id: &str,
        amount: Option<Decimal>,
    ) -> Result<Transaction> {
        let body = amount
            .map(|amount| xml::to_xml(&TransactionRequest::amount_only(amount)))
            .transpose()?;
        self.put_action(id, "submit_for_settlement", body).await
    }

    /// Void an authorized or submitted-for-settlement transaction.
    ///
    /// The gateway reverses the authorization where possible so the customer
    /// is not left with a pending charge.
    pub async fn void(&self, id: &str) -> Result<Transaction> {
        self.put_action(id, "void", None).await
    }

    /// Cancel a pending release from escrow.
    pub async fn cancel_release(&self, id: &str) -> Result<Transaction> {
        self.put_action(id, "cancel_release", None).await
    }

    /// Release a held transaction from escrow.
    pub async fn release_from_escrow(&self, id: &str) -> Result<Transaction> {
        self.put_action(id, "release_from_escrow", None).await
    }

    /// Hold a transaction in escrow.
    pub async fn hold_in_escrow(&self, id: &str) -> Result<Transaction> {
        self.put_action(id, "hold_in_escrow", None).await
    }

    /// Refund a settled or settling transaction.
    ///
    /// When `amount` is `None` the entire amount is refunded. Transactions
    /// that have not begun settling must be voided instead.
    ///
    /// `POST transactions/{id}/refund`, expects 200 or 201.
    pub async fn refund(&self, id: &str, amount: Option<Decimal>) -> Result<Transaction> {
        let id = require_id("transaction id", id)?;
        let body = amount
            .map(|amount| xml::to_xml(&TransactionRequest::amount_only(amount)))
            .transpose()?;
        self.braintree
            .execute(Method::POST, &["transactions", id, "refund"], None, body)
            .await?
            .accept(&[200, 201])?
            .transaction()
    }

    /// Find a transaction by ID.
    ///
    /// `GET transactions/{id}`, expects 200.
    pub async fn find(&self, id: &str) -> Result<Transaction> {
        let id = require_id("transaction id", id)?;
        self.braintree
            .execute(Method::GET, &["transactions", id], None, None)
            .await?
            .accept(&[200])?
            .transaction()
    }

    /// Settle a transaction. Sandbox only.
    #[deprecated(note = "use `Braintree::testing().settle(id)` instead")]
    pub async fn settle(&self, id: &str) -> Result<Transaction> {
        self.braintree.testing().settle(id).await
    }

    /// Run a search and fetch its first page.
    ///
    /// # Process
    ///
    /// 1. Fetch every matching ID and the page size
    /// 2. Fetch the first page restricted to its slice of IDs
    ///
    /// A search with no matches returns an empty first page without a
    /// second call. Use [`search_next`](Self::search_next) for later pages.
    pub async fn search(&self, query: &SearchQuery) -> Result<TransactionSearchResult> {
        let cursor = Arc::new(self.fetch_ids(query).await?);

        let transactions = match cursor.page_ids(1) {
            Some(ids) => self.fetch_page(&query.restricted_to(ids)).await?,
            None => Vec::new(),
        };

        Ok(TransactionSearchResult {
            page: Page {
                items: transactions,
                current_page_number: 1,
                page_size: cursor.page_size,
                total_items: cursor.total_items(),
            },
            cursor,
            query: query.clone(),
        })
    }

    /// Fetch the page after `result`, or `None` once all IDs are consumed
    /// (or the page number cannot advance).
    pub async fn search_next(
        &self,
        result: &TransactionSearchResult,
    ) -> Result<Option<TransactionSearchResult>> {
        let Some(next_page) = result.page.current_page_number.checked_add(1) else {
            return Ok(None);
        };
        let Some(ids) = result.cursor.page_ids(next_page) else {
            return Ok(None);
        };

        let transactions = self.fetch_page(&result.query.restricted_to(ids)).await?;

        Ok(Some(TransactionSearchResult {
            page: Page {
                items: transactions,
                current_page_number: next_page,
                page_size: result.page.page_size,
                total_items: result.page.total_items,
            },
            cursor: Arc::clone(&result.cursor),
            query: result.query.clone(),
        }))
    }

    async fn put_action(
        &self,
        id: &str,
        action: &str,
        body: Option<String>,
    ) -> Result<Transaction> {
        let id = require_id("transaction id", id)?;
        self.braintree
            .execute(Method::PUT, &["transactions", id, action], None, body)
            .await?
            .accept(&[200])?
            .transaction()
    }

    async fn fetch_ids(&self, query: &SearchQuery) -> Result<SearchResult> {
        let body = xml::to_xml(query)?;
        self.braintree
            .execute(
                Method::POST,
                &["transactions", "advanced_search_ids"],
                None,
                Some(body),
            )
            .await?
            .accept(&[200])?
            .decode()
    }

    async fn fetch_page(&self, query: &SearchQuery) -> Result<Vec<Transaction>> {
        let body = xml::to_xml(query)?;
        let list: TransactionList = self
            .braintree
            .execute(
                Method::POST,
                &["transactions", "advanced_search"],
                None,
                Some(body),
            )
            .await?
            .accept(&[200])?
            .decode()?;
        Ok(list.transactions)
    }
}
