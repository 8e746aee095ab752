// src/attendance_report.rs

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use crate::report_data::{
    AttendanceRecord, Employee, EventMatch, EventRecord, WaywardEmployeeReport, WeatherRecord,
};

// --- Report Configuration ---

/// Policy knobs for a report run. Arrivals strictly after
/// `clock_in_cutoff` and departures strictly before `clock_out_cutoff`
/// count as delinquent; the cutoffs themselves are compliant.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub target_year: i32,
    pub clock_in_cutoff: NaiveTime,
    pub clock_out_cutoff: NaiveTime,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            target_year: 2023,
            clock_in_cutoff: NaiveTime::from_hms_opt(8, 15, 0).unwrap(),
            clock_out_cutoff: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
        }
    }
}

// An employee is reported only with strictly more correlated events than this.
const EVENT_THRESHOLD: usize = 3;

// --- Report Pipeline ---

/// Runs the delinquency/weather/event cross-referencing pipeline over the
/// fully loaded datasets. Every method is a pure function of its inputs
/// and the config; nothing is mutated across employees.
pub struct AttendanceReportService {
    config: ReportConfig,
}

impl AttendanceReportService {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Attendance rows belonging to one employee within the target year,
    /// in their original order.
    pub fn employee_attendance<'a>(
        &self,
        attendance: &'a [AttendanceRecord],
        record_id: &str,
    ) -> Vec<&'a AttendanceRecord> {
        attendance
            .iter()
            .filter(|row| {
                row.employee_record_id == record_id
                    && row.date.year() == self.config.target_year
            })
            .collect()
    }

    /// Dates on which the employee arrived late, left early, or has no
    /// complete punch pair. Duplicate source rows stay duplicated here.
    pub fn delinquent_dates(&self, rows: &[&AttendanceRecord]) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        for row in rows {
            let (Some(clock_in), Some(clock_out)) = (row.clock_in, row.clock_out) else {
                // No complete punch pair recorded: counts as an absence.
                dates.push(row.date);
                continue;
            };
            if clock_in > self.config.clock_in_cutoff || clock_out < self.config.clock_out_cutoff {
                dates.push(row.date);
            }
        }
        dates
    }

    /// Dates with weather severe enough to excuse a delinquency, scoped to
    /// one country and the target year.
    pub fn severe_weather_dates(
        &self,
        weather: &[WeatherRecord],
        country: &str,
    ) -> HashSet<NaiveDate> {
        weather
            .iter()
            .filter(|w| {
                w.country == country
                    && w.date.year() == self.config.target_year
                    && w.is_severe()
            })
            .map(|w| w.date)
            .collect()
    }

    /// Set difference: delinquent dates minus severe-weather dates. The
    /// surviving dates keep their original order, deduplicated.
    pub fn without_weather_excuse(
        &self,
        delinquent: &[NaiveDate],
        severe: &HashSet<NaiveDate>,
    ) -> Vec<NaiveDate> {
        let mut seen = HashSet::new();
        delinquent
            .iter()
            .copied()
            .filter(|date| !severe.contains(date))
            .filter(|date| seen.insert(*date))
            .collect()
    }

    /// Events in the employee's country held on, the day before, or the
    /// day after an unexplained delinquent date. When several candidates
    /// share an event date, only the first one found is kept, even if the
    /// names differ.
    pub fn correlate_events(
        &self,
        events: &[EventRecord],
        country: &str,
        unexplained: &[NaiveDate],
    ) -> Vec<EventMatch> {
        let candidates: Vec<&EventRecord> = events
            .iter()
            .filter(|e| {
                e.country == country && e.event_date.year() == self.config.target_year
            })
            .collect();

        let mut seen_dates = HashSet::new();
        let mut matches = Vec::new();
        for &date in unexplained {
            let window_start = date - Duration::days(1);
            let window_end = date + Duration::days(1);

            for event in &candidates {
                if event.event_date < window_start || event.event_date > window_end {
                    continue;
                }
                if seen_dates.insert(event.event_date) {
                    matches.push(EventMatch {
                        country: country.to_string(),
                        event_name: event.event_name.clone(),
                        event_date: event.event_date,
                    });
                }
            }
        }
        matches
    }

    /// Average hours worked per ISO week over the rows given. A day with
    /// an incomplete punch pair contributes zero hours but still counts
    /// its week; weeks with no rows at all stay out of the denominator.
    /// No rows at all yields 0.0.
    pub fn average_hours_per_week(&self, rows: &[&AttendanceRecord]) -> f64 {
        let mut weekly_hours: HashMap<u32, f64> = HashMap::new();
        for row in rows {
            let hours = match (row.clock_in, row.clock_out) {
                (Some(clock_in), Some(clock_out)) => {
                    (clock_out - clock_in).num_seconds() as f64 / 3600.0
                }
                _ => 0.0,
            };
            *weekly_hours.entry(row.date.iso_week().week()).or_insert(0.0) += hours;
        }

        if weekly_hours.is_empty() {
            return 0.0;
        }
        let total: f64 = weekly_hours.values().sum();
        total / weekly_hours.len() as f64
    }

    /// Runs the full pipeline for every employee on the roster and keeps
    /// those whose correlated event count exceeds the threshold.
    pub fn build_report(
        &self,
        employees: &[Employee],
        attendance: &[AttendanceRecord],
        weather: &[WeatherRecord],
        events: &[EventRecord],
    ) -> Vec<WaywardEmployeeReport> {
        info!(
            "Building attendance report for {} employee(s), year {}",
            employees.len(),
            self.config.target_year
        );

        // Severe-weather dates depend only on the country, so compute them
        // once per country rather than once per employee.
        let mut severe_by_country: HashMap<String, HashSet<NaiveDate>> = HashMap::new();
        let mut wayward = Vec::new();

        for employee in employees {
            let severe = severe_by_country
                .entry(employee.country.clone())
                .or_insert_with(|| self.severe_weather_dates(weather, &employee.country));

            let rows = self.employee_attendance(attendance, &employee.record_id);
            let delinquent = self.delinquent_dates(&rows);
            let unexplained = self.without_weather_excuse(&delinquent, severe);
            let matches = self.correlate_events(events, &employee.country, &unexplained);
            let average_hours = self.average_hours_per_week(&rows);

            debug!(
                "Employee {}: {} row(s), {} delinquent, {} unexplained, {} correlated event(s)",
                employee.record_id,
                rows.len(),
                delinquent.len(),
                unexplained.len(),
                matches.len()
            );

            if matches.len() > EVENT_THRESHOLD {
                wayward.push(WaywardEmployeeReport::new(employee, average_hours, matches));
            }
        }

        info!("Flagged {} wayward employee(s).", wayward.len());
        wayward
    }
}
