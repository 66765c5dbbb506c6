//! Braintree CLI - Command-line access to the gateway client.
//!
//! Reads credentials from `BRAINTREE_*` environment variables (or a `.env`
//! file) and prints gateway results as JSON.
//!
//! # Commands
//!
//! - `braintree transaction <id>` - Find a transaction
//! - `braintree void <id>` - Void a transaction
//! - `braintree expiring <MMYYYY> <MMYYYY>` - First page of cards expiring in the range

use anyhow::{Context, bail};
use braintree_client::{Braintree, Config};
use chrono::{DateTime, TimeZone, Utc};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: braintree <transaction <id> | void <id> | expiring <MMYYYY> <MMYYYY>>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    // Load configuration
    let config = Config::from_env().context("loading BRAINTREE_* configuration")?;
    tracing::info!(environment = ?config.environment, "Configuration loaded");

    let gateway = Braintree::new(config)?;

    match args.as_slice() {
        ["transaction", id] => {
            let transaction = gateway.transaction().find(id).await?;
            println!("{}", serde_json::to_string_pretty(&transaction)?);
        }
        ["void", id] => {
            let transaction = gateway.transaction().void(id).await?;
            tracing::info!(id = %transaction.id, "Transaction voided");
            println!("{}", serde_json::to_string_pretty(&transaction)?);
        }
        ["expiring", from, to] => {
            let from = parse_month_year(from)?;
            let to = parse_month_year(to)?;

            let cards = gateway.credit_card();
            let ids = cards.expiring_between_ids(from, to).await?;
            tracing::info!(total = ids.total_items(), pages = ids.page_count(), "Expiring cards found");

            match cards.expiring_between_page(from, to, &ids, 1).await? {
                Some(page) => println!("{}", serde_json::to_string_pretty(&page)?),
                None => println!("[]"),
            }
        }
        _ => bail!(USAGE),
    }

    Ok(())
}

/// Parse `MMYYYY` into the first instant of that month (UTC).
fn parse_month_year(value: &str) -> anyhow::Result<DateTime<Utc>> {
    if value.len() != 6 || !value.bytes().all(|b| b.is_ascii_digit()) {
        bail!("expected MMYYYY, got {value:?}");
    }
    let (month, year) = value.split_at(2);
    let month: u32 = month.parse().with_context(|| format!("invalid month in {value:?}"))?;
    let year: i32 = year.parse().with_context(|| format!("invalid year in {value:?}"))?;

    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .with_context(|| format!("invalid month/year {value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month_year() {
        assert_eq!(
            parse_month_year("052030").unwrap(),
            Utc.with_ymd_and_hms(2030, 5, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_month_year_rejects_non_digits() {
        for value in ["+12024", "-12024", "05 203", "0520301", "13", "132024", "é2024"] {
            assert!(parse_month_year(value).is_err(), "{value:?} should be rejected");
        }
    }
}
