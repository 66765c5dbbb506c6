//! In-process mock of the Braintree gateway.
//!
//! Canned responses are registered per (method, merchant-relative path) and
//! served in order; the last one repeats. Every request is recorded so tests
//! can assert exactly what the client sent.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use braintree_client::{Braintree, Config, Environment};
use tower_http::trace::TraceLayer;

pub const MERCHANT_ID: &str = "merchant-1";

/// `Basic base64("public:private")`
pub const EXPECTED_AUTHORIZATION: &str = "Basic cHVibGljOnByaXZhdGU=";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: String,
    pub headers: HeaderMap,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

type Canned = HashMap<(Method, String), VecDeque<(StatusCode, String)>>;

#[derive(Clone, Default)]
struct MockState {
    responses: Arc<Mutex<Canned>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct MockGateway {
    pub base_url: String,
    state: MockState,
}

impl MockGateway {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock gateway");
        let addr = listener.local_addr().expect("mock gateway address");

        let state = MockState::default();
        let app = Router::new()
            .fallback(handle)
            .layer(TraceLayer::new_for_http())
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock gateway serve");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Queue a response for `method` on the merchant-relative `path`.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: impl Into<String>) {
        let status = StatusCode::from_u16(status).expect("valid status");
        self.state
            .responses
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back((status, body.into()));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn client(&self) -> Braintree {
        self.client_for(Environment::Sandbox)
    }

    pub fn client_for(&self, environment: Environment) -> Braintree {
        let config = Config::new(environment, MERCHANT_ID, "public", "private")
            .with_base_url(&self.base_url);
        Braintree::new(config).expect("client should build")
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let prefix = format!("/merchants/{MERCHANT_ID}/");
    let path = uri
        .path()
        .strip_prefix(&prefix)
        .unwrap_or(uri.path())
        .to_string();

    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        body,
        headers,
    });

    let canned = {
        let mut responses = state.responses.lock().unwrap();
        responses.get_mut(&(method, path)).and_then(|queue| {
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        })
    };

    match canned {
        Some((status, body)) => {
            (status, [(header::CONTENT_TYPE, "application/xml")], body).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub fn transaction_xml(id: &str, status: &str, amount: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<transaction>
  <id>{id}</id>
  <status>{status}</status>
  <type>sale</type>
  <currency-iso-code>USD</currency-iso-code>
  <amount>{amount}</amount>
  <created-at type="datetime">2024-05-01T10:00:00Z</created-at>
  <updated-at type="datetime">2024-05-01T10:00:00Z</updated-at>
</transaction>"#
    )
}

pub fn transactions_xml(ids: &[&str]) -> String {
    let transactions: String = ids
        .iter()
        .map(|id| format!("<transaction><id>{id}</id><status>settled</status></transaction>"))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<credit-card-transactions type="collection">{transactions}</credit-card-transactions>"#
    )
}

pub fn search_results_xml(page_size: usize, ids: &[&str]) -> String {
    let items: String = ids
        .iter()
        .map(|id| format!("<item>{id}</item>"))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<search-results>
  <page-size type="integer">{page_size}</page-size>
  <ids type="array">{items}</ids>
</search-results>"#
    )
}

pub fn credit_card_xml(token: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<credit-card>
  <bin>411111</bin>
  <card-type>Visa</card-type>
  <customer-id>cust-1</customer-id>
  <expiration-month>05</expiration-month>
  <expiration-year>2030</expiration-year>
  <last-4>1111</last-4>
  <token>{token}</token>
</credit-card>"#
    )
}

pub const API_ERROR_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<api-error-response>
  <errors><errors type="array"/></errors>
  <message>Amount is required.</message>
</api-error-response>"#;
