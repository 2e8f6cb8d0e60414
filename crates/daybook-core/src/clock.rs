//! Source of "today" for the expander and the todo list.
//!
//! Today is always computed in an explicit IANA timezone rather than the
//! host locale, so the batch job and the interactive client agree on which
//! day it is.

use crate::error::CoreError;
use crate::timezone::{local_date, parse_timezone};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock in a fixed timezone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn utc() -> Self {
        Self::new(Tz::UTC)
    }

    pub fn from_name(timezone: &str) -> Result<Self, CoreError> {
        Ok(Self::new(parse_timezone(timezone)?))
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        local_date(Utc::now(), self.tz)
    }
}

/// Clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
