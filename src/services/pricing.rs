use chrono::NaiveDate;
use serde::Serialize;

/// Flat tax applied to every booking at insert time.
pub const TAX_RATE: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceBreakdown {
    pub base_price: f64,
    pub tax_amount: f64,
    pub total_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quote {
    pub nights: i64,
    pub nightly_rate: f64,
    #[serde(flatten)]
    pub breakdown: PriceBreakdown,
}

#[derive(Debug, PartialEq)]
pub enum QuoteError {
    CheckOutNotAfterCheckIn,
    NegativeRate,
}

impl std::fmt::Display for QuoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteError::CheckOutNotAfterCheckIn => {
                write!(f, "check-out date must be after check-in date")
            }
            QuoteError::NegativeRate => write!(f, "nightly rate must not be negative"),
        }
    }
}

fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Treats `base` as the pre-tax amount.
pub fn apply_tax(base: f64) -> PriceBreakdown {
    let base_price = round_cents(base);
    let tax_amount = round_cents(base_price * TAX_RATE);
    PriceBreakdown {
        base_price,
        tax_amount,
        total_price: round_cents(base_price + tax_amount),
    }
}

pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> Result<i64, QuoteError> {
    let n = (check_out - check_in).num_days();
    if n <= 0 {
        return Err(QuoteError::CheckOutNotAfterCheckIn);
    }
    Ok(n)
}

pub fn quote_stay(
    nightly_rate: f64,
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> Result<Quote, QuoteError> {
    if nightly_rate < 0.0 {
        return Err(QuoteError::NegativeRate);
    }
    let nights = nights(check_in, check_out)?;
    Ok(Quote {
        nights,
        nightly_rate,
        breakdown: apply_tax(nightly_rate * nights as f64),
    })
}
