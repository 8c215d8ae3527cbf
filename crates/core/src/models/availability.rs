use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::availability::DayStatus;

/// One month of day statuses, keyed by date in calendar order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthAvailabilityResponse {
    pub year: i32,
    pub month: u32,
    pub days: BTreeMap<NaiveDate, DayStatus>,
}

/// The slots still bookable on a single day, in catalog order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySlotsResponse {
    pub date: NaiveDate,
    pub slots: Vec<NaiveTime>,
}
