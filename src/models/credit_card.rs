//! Credit card payment method.
//!
//! `CreditCard` is the decoded `<credit-card>` response and the input to
//! create/update. Requests go out through [`CreditCardRequest`], which leaves
//! the fields the gateway computes (card type, BIN, last four, timestamps)
//! off the wire; serializing a `CreditCard` directly keeps all of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::Result;
use crate::gateway::require_id;
use crate::xml::{self, XmlRoot};

/// A vaulted credit card.
///
/// # XML Example
///
/// ```xml
/// <credit-card>
///   <customer-id>cust-1</customer-id>
///   <number>4111111111111111</number>
///   <expiration-date>05/2030</expiration-date>
///   <cvv>100</cvv>
/// </credit-card>
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CreditCard {
    /// Customer the card is vaulted under
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "xml::optional"
    )]
    pub customer_id: Option<String>,

    /// Payment method token, the card's identifier in the vault
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "xml::optional"
    )]
    pub token: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "xml::optional"
    )]
    pub cardholder_name: Option<String>,

    /// Full card number (request only; the gateway never returns it)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "xml::optional"
    )]
    pub number: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "xml::optional"
    )]
    pub cvv: Option<String>,

    /// `MM/YYYY`; alternative to month and year
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "xml::optional"
    )]
    pub expiration_date: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "xml::optional"
    )]
    pub expiration_month: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "xml::optional"
    )]
    pub expiration_year: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "xml::optional"
    )]
    pub payment_method_nonce: Option<String>,

    /// Whether this is the customer's default payment method
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "xml::optional"
    )]
    pub default: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<CreditCardOptions>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "xml::optional"
    )]
    pub card_type: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "xml::optional"
    )]
    pub bin: Option<String>,

    #[serde(
        default,
        rename = "last-4",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "xml::optional"
    )]
    pub last_4: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "xml::optional"
    )]
    pub expired: Option<bool>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "xml::optional"
    )]
    pub unique_number_identifier: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "xml::optional"
    )]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "xml::optional"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Vaulting options sent with create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CreditCardOptions {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "xml::optional"
    )]
    pub verify_card: Option<bool>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "xml::optional"
    )]
    pub make_default: Option<bool>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "xml::optional"
    )]
    pub fail_on_duplicate_payment_method: Option<bool>,
}

impl CreditCard {
    /// Token of a vaulted card, rejecting missing or blank tokens.
    pub(crate) fn require_token(&self) -> Result<&str> {
        require_id("credit card token", self.token.as_deref().unwrap_or_default())
    }
}

/// Create/update body: the writable subset of a [`CreditCard`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct CreditCardRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cardholder_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    number: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cvv: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiration_date: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiration_month: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiration_year: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_method_nonce: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<&'a CreditCardOptions>,
}

impl<'a> From<&'a CreditCard> for CreditCardRequest<'a> {
    fn from(card: &'a CreditCard) -> Self {
        Self {
            customer_id: card.customer_id.as_deref(),
            token: card.token.as_deref(),
            cardholder_name: card.cardholder_name.as_deref(),
            number: card.number.as_deref(),
            cvv: card.cvv.as_deref(),
            expiration_date: card.expiration_date.as_deref(),
            expiration_month: card.expiration_month.as_deref(),
            expiration_year: card.expiration_year.as_deref(),
            payment_method_nonce: card.payment_method_nonce.as_deref(),
            default: card.default,
            options: card.options.as_ref(),
        }
    }
}

impl XmlRoot for CreditCardRequest<'_> {
    const ROOT: &'static str = "credit-card";
}

/// `serialize_with` for card details nested in another request body.
pub(crate) fn serialize_request<S: Serializer>(
    card: &Option<CreditCard>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    card.as_ref().map(CreditCardRequest::from).serialize(serializer)
}

/// `<payment-methods>` page returned by the expiring-cards search.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct CreditCardList {
    #[serde(default, rename = "credit-card")]
    pub credit_cards: Vec<CreditCard>,
}
