//! Credit card gateway - vault management and expiring-card searches.

use chrono::{DateTime, Utc};
use reqwest::Method;

use crate::{
    error::Result,
    gateway::{Braintree, require_id},
    models::credit_card::{CreditCard, CreditCardList, CreditCardRequest},
    models::search::{Page, SearchQuery, SearchResult},
    xml,
};

/// Operations on `payment_methods/*`.
#[derive(Debug, Clone, Copy)]
pub struct CreditCardGateway<'a> {
    braintree: &'a Braintree,
}

/// Page of cards returned by [`CreditCardGateway::expiring_between_page`].
pub type CreditCardSearchResult = Page<CreditCard>;

impl<'a> CreditCardGateway<'a> {
    pub(crate) fn new(braintree: &'a Braintree) -> Self {
        Self { braintree }
    }

    /// Vault a new credit card.
    ///
    /// `POST payment_methods`, expects 201.
    pub async fn create(&self, card: &CreditCard) -> Result<CreditCard> {
        let body = xml::to_xml(&CreditCardRequest::from(card))?;
        self.braintree
            .execute(Method::POST, &["payment_methods"], None, Some(body))
            .await?
            .accept(&[201])?
            .credit_card()
    }

    /// Update a vaulted card identified by its token.
    ///
    /// `PUT payment_methods/{token}`, expects 200.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest`: the card has no token (no call is made)
    pub async fn update(&self, card: &CreditCard) -> Result<CreditCard> {
        let token = card.require_token()?;
        let body = xml::to_xml(&CreditCardRequest::from(card))?;
        self.braintree
            .execute(Method::PUT, &["payment_methods", token], None, Some(body))
            .await?
            .accept(&[200])?
            .credit_card()
    }

    /// Find a vaulted card by payment method token.
    ///
    /// `GET payment_methods/{token}`, expects 200.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest`: the token is blank (no call is made)
    pub async fn find(&self, token: &str) -> Result<CreditCard> {
        let token = require_id("credit card token", token)?;
        self.braintree
            .execute(Method::GET, &["payment_methods", token], None, None)
            .await?
            .accept(&[200])?
            .credit_card()
    }

    /// Remove a card from the vault.
    ///
    /// `DELETE payment_methods/{token}`, expects 200.
    pub async fn delete(&self, card: &CreditCard) -> Result<()> {
        let token = card.require_token()?;
        self.braintree
            .execute(Method::DELETE, &["payment_methods", token], None, None)
            .await?
            .accept(&[200])?;
        Ok(())
    }

    /// IDs of cards expiring between the two dates (month granularity).
    ///
    /// Feed the result to [`expiring_between_page`](Self::expiring_between_page)
    /// to fetch the cards themselves.
    pub async fn expiring_between_ids(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<SearchResult> {
        let query = expiry_range_query(from, to);
        self.braintree
            .execute(
                Method::POST,
                &["payment_methods", "all", "expiring_ids"],
                Some(&query),
                None,
            )
            .await?
            .accept(&[200])?
            .decode()
    }

    /// Fetch the 1-based `page` of cards expiring between the two dates.
    ///
    /// Returns `None` when `page` lies past the end of `search_result`.
    pub async fn expiring_between_page(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        search_result: &SearchResult,
        page: usize,
    ) -> Result<Option<CreditCardSearchResult>> {
        let Some(ids) = search_result.page_ids(page) else {
            return Ok(None);
        };

        let body = xml::to_xml(&SearchQuery::new().restricted_to(ids))?;
        let query = expiry_range_query(from, to);
        let list: CreditCardList = self
            .braintree
            .execute(
                Method::POST,
                &["payment_methods", "all", "expiring"],
                Some(&query),
                Some(body),
            )
            .await?
            .accept(&[200])?
            .decode()?;

        Ok(Some(Page {
            items: list.credit_cards,
            current_page_number: page,
            page_size: search_result.page_size,
            total_items: search_result.total_items(),
        }))
    }
}

/// `start=MMYYYY&end=MMYYYY` in UTC.
fn expiry_range_query(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("start", &from.format("%m%Y").to_string())
        .append_pair("end", &to.format("%m%Y").to_string())
        .finish()
}
