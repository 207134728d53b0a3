use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};

/// half-open reservation interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Window {
    /// create a window; start must be strictly before end
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(EngineError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// two half-open intervals overlap iff s1 < e2 && s2 < e1;
    /// touching boundaries (e1 == s2) do not overlap
    pub fn overlaps(&self, other: &Window) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// a booking may start today; comparison is date-only
    pub fn validate_not_past(&self, now: DateTime<Utc>) -> Result<()> {
        if self.start.date_naive() < now.date_naive() {
            return Err(EngineError::PastStartDate { start: self.start });
        }
        Ok(())
    }

    /// duration in whole minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// hours billed: duration rounded up to whole hours, minimum 1
    pub fn billable_hours(&self) -> u32 {
        let minutes = self.duration_minutes();
        let hours = (minutes + 59) / 60;
        hours.max(1) as u32
    }

    /// lengthen the end instant; the added interval is `[old_end, new_end)`
    pub fn extended_to(&self, new_end: DateTime<Utc>) -> Result<(Window, Window)> {
        let delta = Window::new(self.end, new_end)?;
        let full = Window {
            start: self.start,
            end: new_end,
        };
        Ok((full, delta))
    }
}
