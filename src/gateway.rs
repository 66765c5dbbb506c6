//! Gateway client and request execution.
//!
//! [`Braintree`] owns the configuration and a pooled `reqwest::Client`. The
//! per-resource gateways borrow it and go through [`Braintree::execute`],
//! which builds `{base_url}/merchants/{merchant_id}/{segments..}`, attaches the
//! API key pair and XML headers, and returns the raw status and body.
//!
//! Caller-supplied IDs travel as single path segments and are percent-encoded,
//! so an ID containing `/`, `?` or `#` never addresses another resource.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::config::Config;
use crate::error::{BraintreeError, Result};
use crate::models::credit_card::CreditCard;
use crate::models::transaction::Transaction;
use crate::services::credit_card_service::CreditCardGateway;
use crate::services::testing_service::TestingGateway;
use crate::services::transaction_service::TransactionGateway;
use crate::xml;

/// Braintree API version sent with every request.
const API_VERSION: &str = "4";

/// Entry point to the Braintree gateway.
///
/// Cheap to clone; clones share the connection pool.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> braintree_client::Result<()> {
/// use braintree_client::{Braintree, Config};
///
/// let gateway = Braintree::new(Config::from_env()?)?;
/// let transaction = gateway.transaction().find("k2m9pq").await?;
/// println!("{:?}", transaction.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Braintree {
    config: Config,
    client: Client,
    merchant_url: Url,
}

impl Braintree {
    /// Create a client for the given configuration.
    ///
    /// # Errors
    ///
    /// - `Url`: the configured base URL is not a valid URL
    /// - `InvalidRequest`: the base URL cannot carry a path (e.g., `mailto:`)
    /// - `Http`: the HTTP client could not be built (e.g., TLS backend failure)
    pub fn new(config: Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/xml"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/xml"));
        headers.insert(
            HeaderName::from_static("x-apiversion"),
            HeaderValue::from_static(API_VERSION),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("braintree-rust/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let mut merchant_url = Url::parse(config.base_url())?;
        push_segments(&mut merchant_url, &["merchants", &config.merchant_id])?;

        Ok(Self {
            config,
            client,
            merchant_url,
        })
    }

    /// Create a client from `BRAINTREE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env()?)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transaction(&self) -> TransactionGateway<'_> {
        TransactionGateway::new(self)
    }

    pub fn credit_card(&self) -> CreditCardGateway<'_> {
        CreditCardGateway::new(self)
    }

    /// Sandbox-only operations that force transaction state changes.
    pub fn testing(&self) -> TestingGateway<'_> {
        TestingGateway::new(self)
    }

    /// Merchant URL extended by `segments`, each percent-encoded on its own.
    pub(crate) fn url_for(&self, segments: &[&str], query: Option<&str>) -> Result<Url> {
        let mut url = self.merchant_url.clone();
        push_segments(&mut url, segments)?;
        url.set_query(query);
        Ok(url)
    }

    /// Send one request and return the raw response.
    ///
    /// Status codes are not interpreted here; each operation decides which
    /// codes it accepts via [`GatewayResponse::accept`].
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method
    /// * `segments` - Path below the merchant, e.g. `["transactions", id, "void"]`
    /// * `query` - Already-encoded query string, if any
    /// * `body` - Already-serialized XML body, if any
    pub(crate) async fn execute(
        &self,
        method: Method,
        segments: &[&str],
        query: Option<&str>,
        body: Option<String>,
    ) -> Result<GatewayResponse> {
        let url = self.url_for(segments, query)?;
        let path = url.path().to_string();
        tracing::debug!(%method, %path, "Sending gateway request");

        let mut request = self
            .client
            .request(method.clone(), url)
            .basic_auth(&self.config.public_key, Some(&self.config.private_key));
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(%method, %path, status = status.as_u16(), "Gateway responded");

        Ok(GatewayResponse {
            method,
            path,
            status,
            body,
        })
    }
}

/// Validate a caller-supplied resource ID before it becomes a path segment.
///
/// Blank IDs would address the collection itself, and `.`/`..` are dropped
/// by URL normalization.
pub(crate) fn require_id<'i>(what: &str, id: &'i str) -> Result<&'i str> {
    if id.trim().is_empty() {
        return Err(BraintreeError::InvalidRequest(format!("{what} is required")));
    }
    if id == "." || id == ".." {
        return Err(BraintreeError::InvalidRequest(format!("invalid {what}: {id:?}")));
    }
    Ok(id)
}

fn push_segments(url: &mut Url, segments: &[&str]) -> Result<()> {
    let base = url.to_string();
    url.path_segments_mut()
        .map_err(|()| BraintreeError::InvalidRequest(format!("base URL {base} cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(())
}

/// Raw gateway response: status plus XML body.
#[derive(Debug)]
pub(crate) struct GatewayResponse {
    method: Method,
    path: String,
    pub status: StatusCode,
    pub body: String,
}

impl GatewayResponse {
    /// Accept the response if its status is one of `accepted`, otherwise
    /// turn it into [`BraintreeError::InvalidResponse`].
    pub fn accept(self, accepted: &[u16]) -> Result<Self> {
        if accepted.contains(&self.status.as_u16()) {
            return Ok(self);
        }

        tracing::warn!(
            method = %self.method,
            path = %self.path,
            status = self.status.as_u16(),
            "Unexpected gateway response"
        );
        Err(BraintreeError::InvalidResponse {
            status: self.status,
            body: self.body,
        })
    }

    pub fn decode<T: for<'de> Deserialize<'de>>(&self) -> Result<T> {
        xml::from_xml(&self.body)
    }

    pub fn transaction(&self) -> Result<Transaction> {
        self.decode()
    }

    pub fn credit_card(&self) -> Result<CreditCard> {
        self.decode()
    }
}
