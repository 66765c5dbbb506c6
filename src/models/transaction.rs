//! Transaction data models and gateway request types.
//!
//! This module defines:
//! - `Transaction`: the `<transaction>` document returned by the gateway
//! - `TransactionRequest`: body for sale/credit creation, settlement and refunds
//! - `TransactionCloneRequest`: body for cloning an existing transaction

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use crate::models::credit_card::{self, CreditCard};
use crate::xml::{self, XmlRoot};

/// Kind of transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    /// Charge a payment method
    Sale,
    /// Pay money out to a payment method
    Credit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Sale => "sale",
            TransactionType::Credit => "credit",
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "sale" => Ok(TransactionType::Sale),
            "credit" => Ok(TransactionType::Credit),
            other => Err(format!("unknown transaction type: {other}")),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TransactionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Lifecycle status reported by the gateway.
///
/// Statuses this client does not know about decode as `Unrecognized` rather
/// than failing the whole response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    AuthorizationExpired,
    Authorizing,
    Authorized,
    GatewayRejected,
    Failed,
    ProcessorDeclined,
    Settled,
    SettlementConfirmed,
    SettlementDeclined,
    SettlementPending,
    Settling,
    SubmittedForSettlement,
    Voided,
    Unrecognized,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::AuthorizationExpired => "authorization_expired",
            TransactionStatus::Authorizing => "authorizing",
            TransactionStatus::Authorized => "authorized",
            TransactionStatus::GatewayRejected => "gateway_rejected",
            TransactionStatus::Failed => "failed",
            TransactionStatus::ProcessorDeclined => "processor_declined",
            TransactionStatus::Settled => "settled",
            TransactionStatus::SettlementConfirmed => "settlement_confirmed",
            TransactionStatus::SettlementDeclined => "settlement_declined",
            TransactionStatus::SettlementPending => "settlement_pending",
            TransactionStatus::Settling => "settling",
            TransactionStatus::SubmittedForSettlement => "submitted_for_settlement",
            TransactionStatus::Voided => "voided",
            TransactionStatus::Unrecognized => "unrecognized",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value {
            "authorization_expired" => TransactionStatus::AuthorizationExpired,
            "authorizing" => TransactionStatus::Authorizing,
            "authorized" => TransactionStatus::Authorized,
            "gateway_rejected" => TransactionStatus::GatewayRejected,
            "failed" => TransactionStatus::Failed,
            "processor_declined" => TransactionStatus::ProcessorDeclined,
            "settled" => TransactionStatus::Settled,
            "settlement_confirmed" => TransactionStatus::SettlementConfirmed,
            "settlement_declined" => TransactionStatus::SettlementDeclined,
            "settlement_pending" => TransactionStatus::SettlementPending,
            "settling" => TransactionStatus::Settling,
            "submitted_for_settlement" => TransactionStatus::SubmittedForSettlement,
            "voided" => TransactionStatus::Voided,
            _ => TransactionStatus::Unrecognized,
        })
    }
}

impl Serialize for TransactionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A transaction as returned by the gateway.
///
/// # XML Example
///
/// ```xml
/// <transaction>
///   <id>k2m9pq</id>
///   <status>authorized</status>
///   <type>sale</type>
///   <currency-iso-code>USD</currency-iso-code>
///   <amount>10.00</amount>
///   <created-at type="datetime">2024-05-01T10:00:00Z</created-at>
/// </transaction>
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Transaction {
    /// Gateway-assigned identifier
    pub id: String,

    #[serde(default, deserialize_with = "xml::optional")]
    pub status: Option<TransactionStatus>,

    #[serde(default, rename = "type", deserialize_with = "xml::optional")]
    pub transaction_type: Option<TransactionType>,

    /// ISO 4217 currency code
    #[serde(default, deserialize_with = "xml::optional")]
    pub currency_iso_code: Option<String>,

    #[serde(default, deserialize_with = "xml::optional")]
    pub amount: Option<Decimal>,

    #[serde(default, deserialize_with = "xml::optional")]
    pub order_id: Option<String>,

    #[serde(default, deserialize_with = "xml::optional")]
    pub merchant_account_id: Option<String>,

    #[serde(default, deserialize_with = "xml::optional")]
    pub customer_id: Option<String>,

    #[serde(default, deserialize_with = "xml::optional")]
    pub payment_method_token: Option<String>,

    /// Set on refunds: the transaction this one refunds
    #[serde(default, deserialize_with = "xml::optional")]
    pub refunded_transaction_id: Option<String>,

    #[serde(default, deserialize_with = "xml::optional")]
    pub settlement_batch_id: Option<String>,

    /// Marketplace escrow state (`held`, `release_pending`, `released`, ...)
    #[serde(default, deserialize_with = "xml::optional")]
    pub escrow_status: Option<String>,

    #[serde(default, deserialize_with = "xml::optional")]
    pub processor_response_code: Option<String>,

    #[serde(default, deserialize_with = "xml::optional")]
    pub processor_response_text: Option<String>,

    #[serde(default, deserialize_with = "xml::optional")]
    pub tax_amount: Option<Decimal>,

    #[serde(default, deserialize_with = "xml::optional")]
    pub service_fee_amount: Option<Decimal>,

    /// Card details when the payment method was a credit card
    #[serde(default)]
    pub credit_card: Option<CreditCard>,

    #[serde(default, deserialize_with = "xml::optional")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "xml::optional")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request body for creating a transaction, and for the optional amount of
/// settlement and refund calls.
///
/// # XML Example
///
/// ```xml
/// <transaction>
///   <type>sale</type>
///   <amount>10.00</amount>
///   <payment-method-nonce>fake-valid-nonce</payment-method-nonce>
///   <options><submit-for-settlement>true</submit-for-settlement></options>
/// </transaction>
/// ```
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TransactionRequest {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_account_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_nonce: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<Decimal>,

    /// Marketplace fee withheld from a sub-merchant sale
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_fee_amount: Option<Decimal>,

    /// Raw card details, when not paying with a token or nonce
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "credit_card::serialize_request"
    )]
    pub credit_card: Option<CreditCard>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<TransactionOptions>,
}

impl TransactionRequest {
    /// A sale of `amount`, to be completed with a payment method.
    pub fn sale(amount: Decimal) -> Self {
        Self {
            transaction_type: Some(TransactionType::Sale),
            amount: Some(amount),
            ..Default::default()
        }
    }

    /// A credit (payout) of `amount`.
    pub fn credit(amount: Decimal) -> Self {
        Self {
            transaction_type: Some(TransactionType::Credit),
            amount: Some(amount),
            ..Default::default()
        }
    }

    /// Body carrying only an amount, for partial settlement and refunds.
    pub(crate) fn amount_only(amount: Decimal) -> Self {
        Self {
            amount: Some(amount),
            ..Default::default()
        }
    }
}

impl XmlRoot for TransactionRequest {
    const ROOT: &'static str = "transaction";
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TransactionOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit_for_settlement: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_in_vault: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_in_escrow: Option<bool>,
}

/// Request body for cloning a transaction.
///
/// # XML Example
///
/// ```xml
/// <transaction-clone>
///   <amount>5.00</amount>
///   <channel>MyShoppingCart</channel>
///   <options><submit-for-settlement>false</submit-for-settlement></options>
/// </transaction-clone>
/// ```
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TransactionCloneRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<TransactionCloneOptions>,
}

impl XmlRoot for TransactionCloneRequest {
    const ROOT: &'static str = "transaction-clone";
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TransactionCloneOptions {
    pub submit_for_settlement: bool,
}

/// `<credit-card-transactions>` page returned by advanced search.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TransactionList {
    #[serde(default, rename = "transaction")]
    pub transactions: Vec<Transaction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_request_encodes_kebab_case() {
        let request = TransactionRequest {
            payment_method_nonce: Some("fake-valid-nonce".to_string()),
            order_id: Some("order-42".to_string()),
            options: Some(TransactionOptions {
                submit_for_settlement: Some(true),
                ..Default::default()
            }),
            ..TransactionRequest::sale(Decimal::new(1000, 2))
        };

        let body = xml::to_xml(&request).expect("should encode");

        assert_eq!(
            body,
            "<transaction><type>sale</type><amount>10.00</amount><order-id>order-42</order-id>\
             <payment-method-nonce>fake-valid-nonce</payment-method-nonce>\
             <options><submit-for-settlement>true</submit-for-settlement></options></transaction>"
        );
    }

    #[test]
    fn test_nested_card_sends_only_writable_fields() {
        let request = TransactionRequest {
            credit_card: Some(CreditCard {
                number: Some("4111111111111111".to_string()),
                expiration_date: Some("05/2030".to_string()),
                card_type: Some("Visa".to_string()),
                ..Default::default()
            }),
            ..TransactionRequest::sale(Decimal::new(1000, 2))
        };

        let body = xml::to_xml(&request).expect("should encode");

        assert!(body.contains(
            "<credit-card><number>4111111111111111</number>\
             <expiration-date>05/2030</expiration-date></credit-card>"
        ));
        assert!(!body.contains("card-type"));
    }

    #[test]
    fn test_clone_request_uses_clone_root() {
        let request = TransactionCloneRequest {
            amount: Some(Decimal::new(500, 2)),
            channel: Some("MyShoppingCart".to_string()),
            options: Some(TransactionCloneOptions {
                submit_for_settlement: false,
            }),
        };

        let body = xml::to_xml(&request).expect("should encode");

        assert!(body.starts_with("<transaction-clone>"));
        assert!(body.contains("<amount>5.00</amount>"));
        assert!(body.contains("<submit-for-settlement>false</submit-for-settlement>"));
    }

    #[test]
    fn test_decodes_transaction_with_nested_card() {
        let transaction: Transaction = xml::from_xml(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<transaction>
  <id>k2m9pq</id>
  <status>submitted_for_settlement</status>
  <type>sale</type>
  <currency-iso-code>USD</currency-iso-code>
  <amount>10.00</amount>
  <order-id>order-42</order-id>
  <refunded-transaction-id nil="true"/>
  <tax-amount nil="true"/>
  <processor-response-code>1000</processor-response-code>
  <processor-response-text>Approved</processor-response-text>
  <created-at type="datetime">2024-05-01T10:00:00Z</created-at>
  <credit-card>
    <token>tok-1</token>
    <bin>411111</bin>
    <last-4>1111</last-4>
    <card-type>Visa</card-type>
  </credit-card>
  <status-history type="array">
    <status-event><status>authorized</status></status-event>
  </status-history>
</transaction>"#,
        )
        .expect("should decode");

        assert_eq!(transaction.id, "k2m9pq");
        assert_eq!(
            transaction.status,
            Some(TransactionStatus::SubmittedForSettlement)
        );
        assert_eq!(transaction.transaction_type, Some(TransactionType::Sale));
        assert_eq!(transaction.amount, Some(Decimal::new(1000, 2)));
        assert_eq!(transaction.refunded_transaction_id, None);
        assert_eq!(transaction.tax_amount, None);
        assert_eq!(transaction.processor_response_code.as_deref(), Some("1000"));

        let card = transaction.credit_card.expect("card should decode");
        assert_eq!(card.last_4.as_deref(), Some("1111"));
    }

    #[test]
    fn test_unknown_status_is_unrecognized() {
        assert_eq!(
            "something_new".parse::<TransactionStatus>().ok(),
            Some(TransactionStatus::Unrecognized)
        );
    }
}
