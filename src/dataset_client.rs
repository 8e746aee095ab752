// src/dataset_client.rs

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, error, info};
use url::Url;

use crate::report_data::{EventRecord, WeatherRecord};

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Dataset request to {url} failed: status={status}, body={body:?}")]
    Api {
        url: Url,
        status: StatusCode,
        body: Option<String>,
    },

    #[error("JSON decoding failed for {source_name}: {source}")]
    Json {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Client for the two public dataset endpoints. Both are plain
/// unauthenticated GETs returning a JSON array.
#[derive(Debug, Clone)]
pub struct DatasetClient {
    http_client: Client,
    weather_url: Url,
    events_url: Url,
}

impl DatasetClient {
    pub fn new(http_client: Client, weather_url: Url, events_url: Url) -> Self {
        Self {
            http_client,
            weather_url,
            events_url,
        }
    }

    /// Fetches the weather dataset for severe-weather exclusion.
    pub async fn fetch_weather(&self) -> Result<Vec<WeatherRecord>, DatasetError> {
        info!("Fetching weather dataset from {}...", self.weather_url);
        let records: Vec<WeatherRecord> = self.fetch_json(self.weather_url.clone()).await?;
        info!("Fetched {} weather record(s).", records.len());
        Ok(records)
    }

    /// Fetches the public events dataset for delinquency correlation.
    pub async fn fetch_events(&self) -> Result<Vec<EventRecord>, DatasetError> {
        info!("Fetching events dataset from {}...", self.events_url);
        let records: Vec<EventRecord> = self.fetch_json(self.events_url.clone()).await?;
        info!("Fetched {} event record(s).", records.len());
        Ok(records)
    }

    /// Issues the GET and deserializes the response body. The body is
    /// pulled as text first so a decode failure can report the endpoint
    /// it came from.
    async fn fetch_json<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, DatasetError> {
        let response = self.http_client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok();
            error!(
                "Dataset request to {} failed. Status: {}, Body: {:?}",
                url, status, body
            );
            return Err(DatasetError::Api { url, status, body });
        }

        let body = response.text().await?;
        debug!("Received {} bytes from {}", body.len(), url);
        serde_json::from_str(&body).map_err(|source| DatasetError::Json {
            source_name: url.to_string(),
            source,
        })
    }
}

/// Loads a local JSON input file (roster or attendance). A missing file
/// or undecodable content is fatal to the run.
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DatasetError> {
    info!("Loading {}...", path.display());
    let content = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| DatasetError::Json {
        source_name: path.display().to_string(),
        source,
    })
}
