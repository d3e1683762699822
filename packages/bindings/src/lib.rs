use chrono::{Local, NaiveDate};
use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use std::str::FromStr;

use pay_or_invest_core::installments::{comparison, invoice_date, taxation};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse an optional ISO date, defaulting to the local calendar date.
fn as_of_or_today(as_of: Option<String>) -> NapiResult<NaiveDate> {
    match as_of {
        Some(s) => NaiveDate::from_str(&s).map_err(to_napi_error),
        None => Ok(Local::now().date_naive()),
    }
}

// ---------------------------------------------------------------------------
// Installments
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_payment_options(input_json: String, as_of: Option<String>) -> NapiResult<String> {
    let input: comparison::PurchaseInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let as_of = as_of_or_today(as_of)?;
    let output = comparison::compare_payment_options(&input, as_of).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn resolve_invoice_date(invoice_day: u32, as_of: Option<String>) -> NapiResult<String> {
    let as_of = as_of_or_today(as_of)?;
    let date = invoice_date::resolve_invoice_date(as_of, invoice_day).map_err(to_napi_error)?;
    Ok(date.to_string())
}

#[napi]
pub fn net_earnings(gross: String, days: u32) -> NapiResult<String> {
    let gross = Decimal::from_str(&gross).map_err(to_napi_error)?;
    let net = taxation::net_earnings(gross, days);
    serde_json::to_string(&net).map_err(to_napi_error)
}
