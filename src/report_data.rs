// src/report_data.rs

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// --- Input Data Structures ---

/// One entry of the employee roster file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub record_id: String,
    pub name: String,
    pub work_id_number: String,
    pub email_address: String,
    pub country: String,
    pub phone_number: String,
}

/// One clock-in/clock-out entry of the attendance file. Both punches
/// missing means the employee did not show up that day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub employee_record_id: String,
    pub date: NaiveDate,
    pub clock_in: Option<NaiveTime>,
    pub clock_out: Option<NaiveTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    Hail,
    Thunderstorm,
    Blizzard,
    Hurricane,
    // The feed carries plenty of benign conditions (sunny, cloudy, ...);
    // none of them matter here.
    #[serde(other)]
    Other,
}

/// Daily weather observation from the remote weather dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub country: String,
    pub date: NaiveDate,
    pub condition: WeatherCondition,
    pub max_temp: f64,
}

/// Max temperature above which a day counts as severe regardless of condition.
pub const SEVERE_MAX_TEMP: f64 = 40.0;

impl WeatherRecord {
    /// Whether this observation is bad enough to excuse a missed or
    /// shortened work day.
    pub fn is_severe(&self) -> bool {
        matches!(
            self.condition,
            WeatherCondition::Hail
                | WeatherCondition::Thunderstorm
                | WeatherCondition::Blizzard
                | WeatherCondition::Hurricane
        ) || self.max_temp > SEVERE_MAX_TEMP
    }
}

/// One entry of the remote public events dataset. Several events may share
/// a date, and the same event may sit near more than one delinquent day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub country: String,
    pub event_date: NaiveDate,
    pub event_name: String,
}

// --- Report Output Structures ---

/// An event found within a day of an unexplained delinquency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMatch {
    pub country: String,
    pub event_name: String,
    pub event_date: NaiveDate,
}

/// Output record for an employee whose delinquencies line up with more
/// than three nearby events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaywardEmployeeReport {
    pub record_id: String,
    pub name: String,
    pub work_id_number: String,
    pub email_address: String,
    pub country: String,
    pub phone_number: String,
    pub average_hours_per_week: f64,
    pub events: Vec<EventMatch>,
}

impl WaywardEmployeeReport {
    pub fn new(employee: &Employee, average_hours_per_week: f64, events: Vec<EventMatch>) -> Self {
        Self {
            record_id: employee.record_id.clone(),
            name: employee.name.clone(),
            work_id_number: employee.work_id_number.clone(),
            email_address: employee.email_address.clone(),
            country: employee.country.clone(),
            phone_number: employee.phone_number.clone(),
            average_hours_per_week,
            events,
        }
    }
}
