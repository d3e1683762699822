use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use pay_or_invest_core::installments::accrual::AccrualStrategy;
use pay_or_invest_core::installments::comparison::{self, PurchaseInput};
use pay_or_invest_core::installments::invoice_date::{
    resolve_invoice_date, rolled_over, whole_days_between,
};
use pay_or_invest_core::installments::taxation;

use crate::currency;
use crate::input;

/// How the money kept by paying in installments is invested
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    /// Installments are paid out of the invested balance
    Decreasing,
    /// The whole amount stays invested; installments come from salary
    #[value(alias = "salary")]
    LumpSum,
}

impl From<StrategyArg> for AccrualStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Decreasing => AccrualStrategy::DecreasingBalance,
            StrategyArg::LumpSum => AccrualStrategy::LumpSum,
        }
    }
}

/// Arguments for the upfront vs. installments comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Purchase amount, plain ("1234.56") or Brazilian notation ("R$ 1.234,56")
    #[arg(long)]
    pub total_value: Option<String>,

    /// Number of installments
    #[arg(long)]
    pub installments: Option<u32>,

    /// Discount for paying upfront (e.g. 0.10 for 10%)
    #[arg(long)]
    pub discount_rate: Option<Decimal>,

    /// Annual reference (CDI) rate (e.g. 0.1375 for 13.75%)
    #[arg(long, alias = "cdi")]
    pub reference_rate: Option<Decimal>,

    /// Portion of the reference rate the investment earns (e.g. 1.0 for 100% of CDI)
    #[arg(long)]
    pub rate_share: Option<Decimal>,

    /// Day of month the card invoice closes (1-31)
    #[arg(long)]
    pub invoice_day: Option<u32>,

    /// Investment strategy for the kept capital
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Calculation date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for invoice date resolution
#[derive(Args)]
pub struct InvoiceDateArgs {
    /// Day of month the card invoice closes (1-31)
    #[arg(long)]
    pub invoice_day: u32,

    /// Reference date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

/// Arguments for net earnings after tax
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct NetEarningsArgs {
    /// Gross earnings
    #[arg(long)]
    pub gross: Decimal,

    /// Holding period in days
    #[arg(long)]
    pub days: u32,
}

/// JSON request body: a purchase plus an optional calculation date.
#[derive(Deserialize)]
struct CompareRequest {
    #[serde(flatten)]
    purchase: PurchaseInput,
    #[serde(default)]
    as_of: Option<NaiveDate>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let from_json: Option<CompareRequest> = input::read_request(args.input.as_deref())?;
    let request = if let Some(request) = from_json {
        request
    } else {
        let total_value = args
            .total_value
            .as_deref()
            .ok_or("--total-value is required (or provide --input)")?;
        CompareRequest {
            purchase: PurchaseInput {
                total_value: currency::parse_amount(total_value)?,
                installments: args
                    .installments
                    .ok_or("--installments is required (or provide --input)")?,
                discount_rate: args
                    .discount_rate
                    .ok_or("--discount-rate is required (or provide --input)")?,
                annual_reference_rate: args
                    .reference_rate
                    .ok_or("--reference-rate is required (or provide --input)")?,
                reference_rate_share: args.rate_share.unwrap_or(dec!(1.0)),
                invoice_day: args
                    .invoice_day
                    .ok_or("--invoice-day is required (or provide --input)")?,
                strategy: args
                    .strategy
                    .ok_or("--strategy is required (or provide --input)")?
                    .into(),
            },
            as_of: None,
        }
    };

    let as_of = args.as_of.or(request.as_of).unwrap_or_else(today);
    debug!(%as_of, strategy = ?request.purchase.strategy, "running comparison");
    let output = comparison::compare_payment_options(&request.purchase, as_of)?;

    let result = &output.result;
    let display = json!({
        "recommendation": result.recommendation_message,
        "upfront_discount": currency::format_brl(result.comparison.discount_value),
        "investment_earnings": currency::format_brl(result.comparison.total_earnings),
        "difference": currency::format_brl(result.comparison.difference.abs()),
    });

    let mut value = serde_json::to_value(&output)?;
    if let Value::Object(ref mut map) = value {
        map.insert("display".to_string(), display);
    }
    Ok(value)
}

pub fn run_invoice_date(args: InvoiceDateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let as_of = args.as_of.unwrap_or_else(today);
    let invoice_date = resolve_invoice_date(as_of, args.invoice_day)?;
    Ok(json!({
        "as_of": as_of,
        "invoice_day": args.invoice_day,
        "invoice_date": invoice_date,
        "days_until_invoice": whole_days_between(as_of, invoice_date),
        "rolled_over": rolled_over(invoice_date, args.invoice_day),
    }))
}

pub fn run_net_earnings(args: NetEarningsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if args.gross < Decimal::ZERO {
        return Err("--gross cannot be negative".into());
    }
    let net = taxation::net_earnings(args.gross, args.days);
    Ok(serde_json::to_value(net)?)
}
