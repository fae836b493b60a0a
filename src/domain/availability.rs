use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{Day, ValidationError};

/// Weekly availability declared on a user profile.
///
/// The daily window runs from `min_hour:00` to `max_hour:00` on the start date
/// of a slot. When `max_hour <= min_hour` the window wraps into the next day,
/// so `22 -> 6` covers a night and `0 -> 0` covers a whole day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub days: Vec<Day>,
    #[serde(rename = "minHour")]
    pub min_hour: u32,
    #[serde(rename = "maxHour")]
    pub max_hour: u32,
    #[serde(rename = "hoursPerDay")]
    pub hours_per_day: i64,
}

impl Availability {
    pub fn new(
        days: Vec<Day>,
        min_hour: u32,
        max_hour: u32,
        hours_per_day: i64,
    ) -> Result<Self, ValidationError> {
        if min_hour > 23 || max_hour > 23 {
            return Err(ValidationError::new(String::from(
                "Availability hours must be between 0 and 23",
            )));
        }
        if !(0..=24).contains(&hours_per_day) {
            return Err(ValidationError::new(String::from(
                "Hours per day must be between 0 and 24",
            )));
        }
        Ok(Self {
            days,
            min_hour,
            max_hour,
            hours_per_day,
        })
    }

    pub fn covers(&self, start: &NaiveDateTime, end: &NaiveDateTime) -> bool {
        let start_day = Day::from(start.weekday());
        let end_day = Day::from(end.weekday());
        if !self.days.contains(&start_day) || !self.days.contains(&end_day) {
            return false;
        }

        // Whole hours, truncated: 8h30 fits in an 8 hour day.
        let worked = (*end - *start).num_hours().abs();
        if worked > self.hours_per_day {
            return false;
        }

        let min_time = start.date().and_time(hour_of_day(self.min_hour));
        let mut max_time = start.date().and_time(hour_of_day(self.max_hour));
        if min_time >= max_time {
            max_time += Duration::hours(24);
        }

        *start >= min_time && *end <= max_time
    }
}

fn hour_of_day(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Weekly window check. A user without a declared rule never fits.
pub fn fits_availability(
    rule: Option<&Availability>,
    start: &NaiveDateTime,
    end: &NaiveDateTime,
) -> bool {
    rule.is_some_and(|rule| rule.covers(start, end))
}

/// Two slots conflict unless one ends strictly before the other starts.
/// Slots sharing a boundary instant conflict.
pub fn slots_conflict(
    start: &NaiveDateTime,
    end: &NaiveDateTime,
    other_start: &NaiveDateTime,
    other_end: &NaiveDateTime,
) -> bool {
    !(end < other_start || start > other_end)
}
