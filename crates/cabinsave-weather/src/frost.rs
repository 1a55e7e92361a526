//! Winter length suggestion from last season's daily mean temperatures.
//! Uses the Open-Meteo historical archive (no API key).

use std::time::Duration;

use cabinsave_core::{NetworkError, ReqwestErrorExt, WeatherConfig};
use chrono::{Local, NaiveDate};
use reqwest::Client;
use serde::Deserialize;

use crate::types::{
    DailyTemperatureSample, FrostEstimate, WinterPeriod, NOTE_FETCH_FAILED, NOTE_NO_DATA,
};

const DAILY_VARIABLE: &str = "temperature_2m_mean";

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    daily: Option<ArchiveDaily>,
}

#[derive(Debug, Deserialize)]
struct ArchiveDaily {
    time: Option<Vec<serde_json::Value>>,
    temperature_2m_mean: Option<Vec<serde_json::Value>>,
}

/// What the archive gave back for a season
#[derive(Debug)]
enum ArchiveOutcome {
    Samples(Vec<DailyTemperatureSample>),
    /// Non-success status or a body without the daily series
    Unavailable,
}

/// Pair dates with temperatures, keeping only numeric readings.
fn collect_samples(times: &[serde_json::Value], temps: &[serde_json::Value]) -> Vec<DailyTemperatureSample> {
    times
        .iter()
        .zip(temps)
        .filter_map(|(time, temp)| {
            let date = time.as_str()?.parse::<NaiveDate>().ok()?;
            let mean_temp = temp.as_f64().filter(|t| t.is_finite())?;
            Some(DailyTemperatureSample { date, mean_temp })
        })
        .collect()
}

fn parse_archive(body: serde_json::Value) -> ArchiveOutcome {
    let Ok(ArchiveResponse { daily: Some(daily) }) = serde_json::from_value::<ArchiveResponse>(body) else {
        return ArchiveOutcome::Unavailable;
    };
    match (daily.time, daily.temperature_2m_mean) {
        (Some(times), Some(temps)) => ArchiveOutcome::Samples(collect_samples(&times, &temps)),
        _ => ArchiveOutcome::Unavailable,
    }
}

/// Suggests a winter length for a location from historical weather.
#[derive(Debug, Clone)]
pub struct WinterLengthEstimator {
    client: Client,
    url: String,
}

impl WinterLengthEstimator {
    pub fn new(config: &WeatherConfig) -> Result<Self, NetworkError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(ReqwestErrorExt::into_network_error)?;

        Ok(Self {
            client,
            url: config.archive_url.clone(),
        })
    }

    /// Estimate for the last completed winter relative to today's local date.
    pub async fn estimate(&self, latitude: f64, longitude: f64) -> FrostEstimate {
        self.estimate_on(latitude, longitude, Local::now().date_naive())
            .await
    }

    /// Estimate for the last completed winter relative to `today`.
    ///
    /// Every failure yields the default 4-month estimate with a note
    /// explaining why; this never returns an error.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn estimate_on(&self, latitude: f64, longitude: f64, today: NaiveDate) -> FrostEstimate {
        let period = WinterPeriod::last_completed(today);

        match self.fetch_season(latitude, longitude, period).await {
            Ok(ArchiveOutcome::Samples(samples)) => {
                let estimate = FrostEstimate::from_samples(period, &samples);
                tracing::info!(
                    samples = samples.len(),
                    frost_days = ?estimate.frost_days_count,
                    months = estimate.suggested_winter_months,
                    "Estimated winter length"
                );
                estimate
            }
            Ok(ArchiveOutcome::Unavailable) => {
                tracing::info!("No weather data for {}, {}", latitude, longitude);
                FrostEstimate::fallback(period, NOTE_NO_DATA)
            }
            Err(e) => {
                tracing::warn!("Weather archive request failed: {}", e);
                FrostEstimate::fallback(period, NOTE_FETCH_FAILED)
            }
        }
    }

    async fn fetch_season(
        &self,
        latitude: f64,
        longitude: f64,
        period: WinterPeriod,
    ) -> Result<ArchiveOutcome, NetworkError> {
        let params = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("start_date", period.from.to_string()),
            ("end_date", period.to.to_string()),
            ("daily", DAILY_VARIABLE.to_string()),
            ("timezone", "UTC".to_string()),
        ];

        let response = self
            .client
            .get(&self.url)
            .query(&params)
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        if !response.status().is_success() {
            tracing::debug!("Weather archive returned status {}", response.status());
            return Ok(ArchiveOutcome::Unavailable);
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| NetworkError::InvalidResponse(e.to_string()))?;

        Ok(parse_archive(body))
    }
}
