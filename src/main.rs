// src/main.rs

use anyhow::{Context, Result};
use chrono::NaiveTime;
use reqwest::Client;
use std::{env, fs, path::PathBuf, time::Duration};
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

mod attendance_report;
mod dataset_client;
mod report_data;

use attendance_report::{AttendanceReportService, ReportConfig};
use dataset_client::{load_json_file, DatasetClient};
use report_data::{AttendanceRecord, Employee};

// Default endpoints and file names; every one can be overridden via env.
const DEFAULT_WEATHER_URL: &str = "https://www.pingtt.com/exam/weather";
const DEFAULT_EVENTS_URL: &str = "https://www.pingtt.com/exam/events";
const DEFAULT_EMPLOYEE_FILE: &str = "employees.json";
const DEFAULT_ATTENDANCE_FILE: &str = "attendance.json";
const DEFAULT_OUTPUT_FILE: &str = "output.json";

// --- General App Configuration ---

#[derive(Debug, Clone)]
struct AppConfig {
    weather_url: Url,
    events_url: Url,
    employee_file: PathBuf,
    attendance_file: PathBuf,
    output_file: PathBuf,
    report: ReportConfig,
}

impl AppConfig {
    fn from_env() -> Result<Self> {
        let weather_url =
            env::var("WEATHER_URL").unwrap_or_else(|_| DEFAULT_WEATHER_URL.to_string());
        let events_url = env::var("EVENTS_URL").unwrap_or_else(|_| DEFAULT_EVENTS_URL.to_string());

        let defaults = ReportConfig::default();
        let report = ReportConfig {
            target_year: match env::var("REPORT_YEAR") {
                Ok(value) => value
                    .parse()
                    .with_context(|| format!("REPORT_YEAR is not a valid year: {}", value))?,
                Err(_) => defaults.target_year,
            },
            clock_in_cutoff: parse_cutoff_var("CLOCK_IN_CUTOFF", defaults.clock_in_cutoff)?,
            clock_out_cutoff: parse_cutoff_var("CLOCK_OUT_CUTOFF", defaults.clock_out_cutoff)?,
        };

        Ok(Self {
            weather_url: Url::parse(&weather_url)
                .with_context(|| format!("WEATHER_URL is not a valid URL: {}", weather_url))?,
            events_url: Url::parse(&events_url)
                .with_context(|| format!("EVENTS_URL is not a valid URL: {}", events_url))?,
            employee_file: env::var("EMPLOYEE_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_EMPLOYEE_FILE)),
            attendance_file: env::var("ATTENDANCE_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_ATTENDANCE_FILE)),
            output_file: env::var("OUTPUT_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_FILE)),
            report,
        })
    }
}

fn parse_cutoff_var(var: &str, default: NaiveTime) -> Result<NaiveTime> {
    match env::var(var) {
        Ok(value) => NaiveTime::parse_from_str(&value, "%H:%M:%S")
            .with_context(|| format!("{} is not a valid HH:MM:SS time: {}", var, value)),
        Err(_) => Ok(default),
    }
}

// --- Main Application Logic ---

#[tokio::main]
async fn main() -> Result<()> {
    // --- Setup ---
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    info!(
        "Configuration loaded. Year: {}, roster: {}, attendance: {}, output: {}",
        config.report.target_year,
        config.employee_file.display(),
        config.attendance_file.display(),
        config.output_file.display()
    );

    let http_client = Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to build HTTP client")?;
    let dataset_client = DatasetClient::new(
        http_client,
        config.weather_url.clone(),
        config.events_url.clone(),
    );

    // --- Load Datasets ---
    // Both remote fetches happen up front; a failed fetch aborts the run
    // rather than continuing with an empty exclusion/event signal.
    let weather = dataset_client
        .fetch_weather()
        .await
        .context("Failed to fetch the weather dataset")?;
    let events = dataset_client
        .fetch_events()
        .await
        .context("Failed to fetch the events dataset")?;

    let employees: Vec<Employee> = load_json_file(&config.employee_file)
        .context("Failed to load the employee roster")?;
    let attendance: Vec<AttendanceRecord> = load_json_file(&config.attendance_file)
        .context("Failed to load the attendance records")?;
    info!(
        "Loaded {} employee(s) and {} attendance record(s).",
        employees.len(),
        attendance.len()
    );

    // --- Build and Write the Report ---
    let service = AttendanceReportService::new(config.report.clone());
    let report = service.build_report(&employees, &attendance, &weather, &events);

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize the report")?;
    fs::write(&config.output_file, json)
        .with_context(|| format!("Failed to write {}", config.output_file.display()))?;
    info!(
        "Wrote {} wayward employee record(s) to {}.",
        report.len(),
        config.output_file.display()
    );

    Ok(())
}
