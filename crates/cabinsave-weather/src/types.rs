use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Winter length assumed when no weather data is available
pub const DEFAULT_WINTER_MONTHS: u8 = 4;
pub const MIN_WINTER_MONTHS: u8 = 1;
pub const MAX_WINTER_MONTHS: u8 = 7;

/// Mean daily temperature at or below this counts as a frost day (°C)
pub const FROST_THRESHOLD_CELSIUS: f64 = 0.0;

/// Frost days per suggested winter month
pub const DAYS_PER_WINTER_MONTH: f64 = 30.0;

pub const NOTE_BASED_ON_DATA: &str = "Basert på døgnmiddeltemperatur ≤ 0 °C for valgt område.";
pub const NOTE_NO_DATA: &str = "Ingen værdata tilgjengelig, bruker standard 4 måneder.";
pub const NOTE_FETCH_FAILED: &str = "Feil ved henting av værdata, bruker standard 4 måneder.";

/// A place the user can pick as the cabin's location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCandidate {
    pub name: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl LocationCandidate {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// Dedup key for provider results: coordinates rounded to 4 decimals.
    pub fn rounded_key(&self) -> String {
        format!(
            "{}-{:.4}-{:.4}",
            self.name.to_lowercase(),
            self.latitude,
            self.longitude
        )
    }

    /// Dedup key for gazetteer entries: coordinates as written.
    pub fn exact_key(&self) -> String {
        format!(
            "{}-{}-{}",
            self.name.to_lowercase(),
            self.latitude,
            self.longitude
        )
    }
}

/// Date range of one Nov 1 - Mar 31 winter season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinterPeriod {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl WinterPeriod {
    /// The season ending on March 31 of the year before `today`'s year.
    ///
    /// The current month is not consulted: in late 2026 this is still
    /// 2024-11-01 to 2025-03-31.
    pub fn last_completed(today: NaiveDate) -> Self {
        Self::ending_in(today.year() - 1)
    }

    fn ending_in(end_year: i32) -> Self {
        // Nov 1 and Mar 31 exist in every year chrono can represent here
        let from = NaiveDate::from_ymd_opt(end_year - 1, 11, 1).unwrap_or(NaiveDate::MIN);
        let to = NaiveDate::from_ymd_opt(end_year, 3, 31).unwrap_or(NaiveDate::MIN);
        Self { from, to }
    }
}

/// One day's mean temperature from the archive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTemperatureSample {
    pub date: NaiveDate,
    pub mean_temp: f64,
}

impl DailyTemperatureSample {
    pub fn is_frost_day(&self) -> bool {
        self.mean_temp <= FROST_THRESHOLD_CELSIUS
    }
}

/// Suggested winter length for a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrostEstimate {
    pub suggested_winter_months: u8,
    /// `None` when no usable weather response was received at all;
    /// `Some(0)` when the response had no frost days (or no valid samples).
    #[serde(rename = "frostDays", alias = "frostDaysCount")]
    pub frost_days_count: Option<u32>,
    pub period: WinterPeriod,
    pub note: String,
}

impl FrostEstimate {
    /// Default-length estimate used whenever weather data is unavailable.
    pub fn fallback(period: WinterPeriod, note: &str) -> Self {
        Self {
            suggested_winter_months: DEFAULT_WINTER_MONTHS,
            frost_days_count: None,
            period,
            note: note.to_string(),
        }
    }

    /// Derive the estimate from the valid samples of a season.
    pub fn from_samples(period: WinterPeriod, samples: &[DailyTemperatureSample]) -> Self {
        let frost_days = samples.iter().filter(|s| s.is_frost_day()).count();
        let months = if samples.is_empty() {
            f64::NAN
        } else {
            (frost_days as f64 / DAYS_PER_WINTER_MONTH).round()
        };

        Self {
            suggested_winter_months: clamp_winter_months(months),
            frost_days_count: Some(u32::try_from(frost_days).unwrap_or(u32::MAX)),
            period,
            note: NOTE_BASED_ON_DATA.to_string(),
        }
    }
}

/// Clamp a raw month count into the supported winter length.
///
/// NaN maps to the default of 4 months.
pub fn clamp_winter_months(value: f64) -> u8 {
    if value.is_nan() {
        return DEFAULT_WINTER_MONTHS;
    }
    if value < f64::from(MIN_WINTER_MONTHS) {
        return MIN_WINTER_MONTHS;
    }
    if value > f64::from(MAX_WINTER_MONTHS) {
        return MAX_WINTER_MONTHS;
    }
    value as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn samples(temps: &[f64]) -> Vec<DailyTemperatureSample> {
        temps
            .iter()
            .enumerate()
            .map(|(i, &t)| DailyTemperatureSample {
                date: date(2024, 11, 1) + chrono::Days::new(i as u64),
                mean_temp: t,
            })
            .collect()
    }

    #[test]
    fn test_clamp_nan_is_default() {
        assert_eq!(clamp_winter_months(f64::NAN), 4);
    }

    #[test]
    fn test_clamp_bounds() {
        assert_eq!(clamp_winter_months(0.0), 1);
        assert_eq!(clamp_winter_months(-3.0), 1);
        assert_eq!(clamp_winter_months(8.0), 7);
        assert_eq!(clamp_winter_months(f64::INFINITY), 7);
    }

    #[test]
    fn test_clamp_passthrough() {
        for months in 1..=7u8 {
            assert_eq!(clamp_winter_months(f64::from(months)), months);
        }
    }

    #[test]
    fn test_period_ignores_current_month() {
        let expected = WinterPeriod {
            from: date(2024, 11, 1),
            to: date(2025, 3, 31),
        };
        assert_eq!(WinterPeriod::last_completed(date(2026, 1, 15)), expected);
        assert_eq!(WinterPeriod::last_completed(date(2026, 4, 1)), expected);
        assert_eq!(WinterPeriod::last_completed(date(2026, 12, 31)), expected);
    }

    #[test]
    fn test_period_serializes_as_iso_dates() {
        let period = WinterPeriod::last_completed(date(2026, 10, 18));
        let json = serde_json::to_value(period).unwrap();
        assert_eq!(json["from"], "2024-11-01");
        assert_eq!(json["to"], "2025-03-31");
    }

    #[test]
    fn test_frost_day_threshold_is_inclusive() {
        let s = samples(&[0.0, 0.1, -0.1]);
        let frost: Vec<bool> = s.iter().map(DailyTemperatureSample::is_frost_day).collect();
        assert_eq!(frost, vec![true, false, true]);
    }

    #[test]
    fn test_estimate_rounds_frost_days_to_months() {
        let period = WinterPeriod::last_completed(date(2026, 1, 1));
        // 104 frost days -> 3.47 -> 3 months
        let mut temps = vec![-5.0; 104];
        temps.extend(vec![2.0; 47]);
        let estimate = FrostEstimate::from_samples(period, &samples(&temps));
        assert_eq!(estimate.frost_days_count, Some(104));
        assert_eq!(estimate.suggested_winter_months, 3);
        assert_eq!(estimate.note, NOTE_BASED_ON_DATA);
    }

    #[test]
    fn test_estimate_rounds_half_up() {
        let period = WinterPeriod::last_completed(date(2026, 1, 1));
        let estimate = FrostEstimate::from_samples(period, &samples(&vec![-1.0; 135]));
        assert_eq!(estimate.suggested_winter_months, 5);
    }

    #[test]
    fn test_mild_winter_clamps_to_one_month() {
        let period = WinterPeriod::last_completed(date(2026, 1, 1));
        let estimate = FrostEstimate::from_samples(period, &samples(&vec![4.0; 151]));
        assert_eq!(estimate.frost_days_count, Some(0));
        assert_eq!(estimate.suggested_winter_months, 1);
    }

    #[test]
    fn test_no_samples_keeps_zero_count() {
        let period = WinterPeriod::last_completed(date(2026, 1, 1));
        let estimate = FrostEstimate::from_samples(period, &[]);
        assert_eq!(estimate.suggested_winter_months, 4);
        assert_eq!(estimate.frost_days_count, Some(0));
    }

    #[test]
    fn test_fallback_has_no_count() {
        let period = WinterPeriod::last_completed(date(2026, 1, 1));
        let estimate = FrostEstimate::fallback(period, NOTE_NO_DATA);
        assert_eq!(estimate.suggested_winter_months, DEFAULT_WINTER_MONTHS);
        assert_eq!(estimate.frost_days_count, None);

        let json = serde_json::to_value(&estimate).unwrap();
        assert!(json["frostDays"].is_null());
        assert_eq!(json["suggestedWinterMonths"], 4);
    }

    #[test]
    fn test_frost_estimate_accepts_either_count_key() {
        let json = r#"{
            "suggestedWinterMonths": 5,
            "frostDaysCount": 142,
            "period": {"from": "2024-11-01", "to": "2025-03-31"},
            "note": "x"
        }"#;
        let estimate: FrostEstimate = serde_json::from_str(json).unwrap();
        assert_eq!(estimate.frost_days_count, Some(142));
    }

    #[test]
    fn test_candidate_keys() {
        let c = LocationCandidate::new("Geilo", 60.533_333, 8.205);
        assert_eq!(c.rounded_key(), "geilo-60.5333-8.2050");
        assert_eq!(c.exact_key(), "geilo-60.533333-8.205");
    }

    #[test]
    fn test_candidate_wire_format() {
        let c = LocationCandidate::new("Oslo", 59.9139, 10.7522);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Oslo", "lat": 59.9139, "lon": 10.7522}));
    }
}
