use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Recurring start/end pattern rotated across the dates of a planning cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shift {
    #[serde(rename = "startHour")]
    start_hour: u32,
    #[serde(rename = "startMinute")]
    start_minute: u32,
    #[serde(rename = "endHour")]
    end_hour: u32,
    #[serde(rename = "endMinute")]
    end_minute: u32,
}

impl Shift {
    pub fn new(
        start_hour: u32,
        start_minute: u32,
        end_hour: u32,
        end_minute: u32,
    ) -> Result<Self, ValidationError> {
        validate_hour(start_hour)?;
        validate_hour(end_hour)?;
        validate_minute(start_minute)?;
        validate_minute(end_minute)?;

        Ok(Self {
            start_hour,
            start_minute,
            end_hour,
            end_minute,
        })
    }

    /// An end hour before the start hour rolls the shift into the next day.
    pub fn spans_midnight(&self) -> bool {
        self.end_hour < self.start_hour
    }

    pub fn instantiate(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let start = date.and_time(time_of_day(self.start_hour, self.start_minute));
        let end_date = if self.spans_midnight() {
            date + Duration::days(1)
        } else {
            date
        };
        let end = end_date.and_time(time_of_day(self.end_hour, self.end_minute));
        (start, end)
    }
}

// Bounds are checked in Shift::new.
fn time_of_day(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

fn validate_hour(hour: u32) -> Result<(), ValidationError> {
    match hour {
        0..=23 => Ok(()),
        _ => Err(ValidationError::new(format!(
            "Hour must be between 0 and 23, got {hour}"
        ))),
    }
}

fn validate_minute(minute: u32) -> Result<(), ValidationError> {
    match minute {
        0..=59 => Ok(()),
        _ => Err(ValidationError::new(format!(
            "Minute must be between 0 and 59, got {minute}"
        ))),
    }
}

/// Serialized as its discriminant, Sunday being 0.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum Day {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl From<Weekday> for Day {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => Day::Sunday,
            Weekday::Mon => Day::Monday,
            Weekday::Tue => Day::Tuesday,
            Weekday::Wed => Day::Wednesday,
            Weekday::Thu => Day::Thursday,
            Weekday::Fri => Day::Friday,
            Weekday::Sat => Day::Saturday,
        }
    }
}

impl From<Day> for i16 {
    fn from(day: Day) -> Self {
        day as i16
    }
}

impl TryFrom<i16> for Day {
    type Error = ValidationError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Day::Sunday),
            1 => Ok(Day::Monday),
            2 => Ok(Day::Tuesday),
            3 => Ok(Day::Wednesday),
            4 => Ok(Day::Thursday),
            5 => Ok(Day::Friday),
            6 => Ok(Day::Saturday),
            _ => Err(ValidationError::new(format!(
                "Day must be between 0 and 6, got {value}"
            ))),
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Day::Sunday => "Sunday",
                Day::Monday => "Monday",
                Day::Tuesday => "Tuesday",
                Day::Wednesday => "Wednesday",
                Day::Thursday => "Thursday",
                Day::Friday => "Friday",
                Day::Saturday => "Saturday",
            }
        )
    }
}
