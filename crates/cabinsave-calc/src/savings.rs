//! Seasonal saving from replacing frost-protection heating with heating pads.

use serde::de::{Error as _, IgnoredAny};
use serde::{Deserialize, Deserializer, Serialize};

/// Winter length the per-area baselines are calibrated to
pub const REFERENCE_WINTER_MONTHS: f64 = 4.0;

/// Standard electricity price, kr/kWh
pub const STANDARD_PRICE_PER_KWH: f64 = 0.5;

/// Three pads at 20 W each, running continuously
pub const PADS_POWER_KW: f64 = 0.06;

const HOURS_PER_DAY: f64 = 24.0;
const DAYS_PER_MONTH: f64 = 30.0;

/// Baseline used when no age class has been chosen
pub const UNSPECIFIED_BASELINE_KWH_PER_M2: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CabinAge {
    /// Built after 2010
    New,
    /// Built roughly 1990-2010
    Normal,
    /// Built before 1990
    Old,
}

impl CabinAge {
    pub const ALL: [CabinAge; 3] = [CabinAge::New, CabinAge::Normal, CabinAge::Old];

    /// kWh per m² needed to keep the cabin frost-free through a reference winter.
    pub fn baseline_kwh_per_m2(self) -> f64 {
        match self {
            CabinAge::New => 55.0,
            CabinAge::Normal => 75.0,
            CabinAge::Old => 100.0,
        }
    }
}

/// Baseline for an optional age class.
pub fn baseline_kwh_per_m2(age: Option<CabinAge>) -> f64 {
    age.map_or(UNSPECIFIED_BASELINE_KWH_PER_M2, CabinAge::baseline_kwh_per_m2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceMode {
    #[default]
    Standard,
    Custom,
}

/// Answers collected so far. Every field may still be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorInputs {
    #[serde(default, deserialize_with = "whole_months")]
    pub winter_months: Option<u8>,
    #[serde(default)]
    pub floor_area_m2: Option<f64>,
    #[serde(default, deserialize_with = "known_age_or_none")]
    pub cabin_age_class: Option<CabinAge>,
    #[serde(default)]
    pub price_mode: Option<PriceMode>,
    #[serde(default)]
    pub custom_price_per_kwh: Option<f64>,
}

impl CalculatorInputs {
    /// Price per kWh: the custom price when selected and positive, otherwise standard.
    pub fn effective_price(&self) -> f64 {
        match (self.price_mode, self.custom_price_per_kwh) {
            (Some(PriceMode::Custom), Some(price)) if price > 0.0 && price.is_finite() => price,
            _ => STANDARD_PRICE_PER_KWH,
        }
    }

    /// Winter length and a positive floor area are required; the rest has defaults.
    pub fn is_complete(&self) -> bool {
        self.required().is_some()
    }

    fn required(&self) -> Option<(u8, f64)> {
        let months = self.winter_months.filter(|&m| m > 0)?;
        let area = self.floor_area_m2.filter(|a| *a > 0.0 && a.is_finite())?;
        Some((months, area))
    }
}

/// Month counts may arrive as `4` or `4.0`.
fn whole_months<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if value.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(&value) {
        Ok(Some(value as u8))
    } else {
        Err(D::Error::custom(format!(
            "winterMonths must be a whole number of months, got {}",
            value
        )))
    }
}

/// An age class outside the known set counts as not chosen.
fn known_age_or_none<'de, D>(deserializer: D) -> Result<Option<CabinAge>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AgeValue {
        Known(CabinAge),
        Other(IgnoredAny),
    }

    Ok(match Option::<AgeValue>::deserialize(deserializer)? {
        Some(AgeValue::Known(age)) => Some(age),
        Some(AgeValue::Other(_)) | None => None,
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsResult {
    pub estimated_saving_kr: f64,
    pub frost_protection_kwh: f64,
    pub pads_energy_kwh: f64,
}

/// Energy for conventional frost protection over the season.
pub fn frost_protection_kwh(floor_area_m2: f64, age: Option<CabinAge>, winter_months: u8) -> f64 {
    floor_area_m2 * baseline_kwh_per_m2(age) * (f64::from(winter_months) / REFERENCE_WINTER_MONTHS)
}

/// Energy drawn by the pads over the season.
pub fn pads_energy_kwh(winter_months: u8) -> f64 {
    PADS_POWER_KW * HOURS_PER_DAY * DAYS_PER_MONTH * f64::from(winter_months)
}

/// Estimated saving for the given answers.
///
/// Incomplete answers give an all-zero result. The saving never goes below zero.
pub fn compute(inputs: &CalculatorInputs) -> SavingsResult {
    let Some((months, area)) = inputs.required() else {
        return SavingsResult::default();
    };

    let frost = frost_protection_kwh(area, inputs.cabin_age_class, months);
    let pads = pads_energy_kwh(months);
    let saving = ((frost - pads) * inputs.effective_price()).max(0.0);

    SavingsResult {
        estimated_saving_kr: saving,
        frost_protection_kwh: frost,
        pads_energy_kwh: pads,
    }
}
