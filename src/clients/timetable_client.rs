use std::fmt;

use async_trait::async_trait;
use chrono::SecondsFormat;

use crate::models::timetable::{
    DateWindow, SWIMMING_TIMETABLE, TimetableEntry, TimetableRequest, TimetableResponse,
};

pub const DEFAULT_API_URL: &str =
    "https://www.oneleisure.net/umbraco/api/activeintime/TimetableHelperApi";

#[derive(Debug)]
pub enum FetchError {
    Network(reqwest::Error),
    Upstream { status: u16, body: String },
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(err) => write!(f, "timetable request failed: {}", err),
            FetchError::Upstream { status, body } => {
                write!(f, "timetable API returned status {}: {}", status, body)
            }
            FetchError::Decode(err) => write!(f, "failed to parse timetable response: {}", err),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Network(err) => Some(err),
            _ => None,
        }
    }
}

#[async_trait]
pub trait TimetableApi: Send + Sync {
    async fn fetch_timetable(
        &self,
        window: &DateWindow,
        center: &str,
    ) -> Result<Vec<TimetableEntry>, FetchError>;
}

pub struct TimetableClient {
    http: reqwest::Client,
    api_url: String,
}

impl TimetableClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into(),
        }
    }
}

#[async_trait]
impl TimetableApi for TimetableClient {
    async fn fetch_timetable(
        &self,
        window: &DateWindow,
        center: &str,
    ) -> Result<Vec<TimetableEntry>, FetchError> {
        let request = TimetableRequest {
            name: center.to_string(),
            timetable_names: vec![SWIMMING_TIMETABLE.to_string()],
            from_date: window.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            days: window.days(),
        };

        // One attempt, no retry.
        let response = self
            .http
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(FetchError::Network)?;

        let status = response.status();
        let text = response.text().await.map_err(FetchError::Network)?; // read the body once

        if !status.is_success() {
            // Non-2xx response: keep the raw body for debugging
            println!("Error {}: {}", status, text);
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: TimetableResponse = serde_json::from_str(&text)
            .map_err(|e| FetchError::Decode(format!("{}\nRaw body: {}", e, text)))?;
        Ok(parsed.swimming_timetable)
    }
}
