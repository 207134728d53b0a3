use serde::{Deserialize, Serialize};

use crate::availability::Window;

/// how a window's length turns into billable units.
///
/// the split rule is canonical: whole days at the daily rate plus leftover
/// hours at the hourly rate. the day ceiling survives for rate cards that
/// only quote daily prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationPolicy {
    /// days = hours / 24 at the daily rate, remainder at the hourly rate
    DayHourSplit,
    /// days = max(1, ceil(hours / 24)), all at the daily rate
    DayCeiling,
}

/// billable units derived from a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BilledDuration {
    pub hours: u32,
    pub days: u32,
    pub remainder_hours: u32,
}

impl DurationPolicy {
    pub fn bill(&self, window: &Window) -> BilledDuration {
        let hours = window.billable_hours();
        match self {
            DurationPolicy::DayHourSplit => BilledDuration {
                hours,
                days: hours / 24,
                remainder_hours: hours % 24,
            },
            DurationPolicy::DayCeiling => BilledDuration {
                hours,
                days: hours.div_ceil(24).max(1),
                remainder_hours: 0,
            },
        }
    }
}
