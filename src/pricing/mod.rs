mod calculator;
mod duration;

pub use calculator::{PriceBreakdown, PricingCalculator};
pub use duration::{BilledDuration, DurationPolicy};
