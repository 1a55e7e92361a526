//! Presentation of a savings result: labels and Norwegian number formatting.

use serde::Serialize;

use crate::savings::{baseline_kwh_per_m2, compute, CabinAge, CalculatorInputs, SavingsResult};

const NBSP: char = '\u{a0}';

impl CabinAge {
    /// Display label for the age class
    pub fn label(self) -> &'static str {
        match self {
            CabinAge::New => "Nyere hytte (etter 2010)",
            CabinAge::Normal => "Normal hytte (ca. 1990–2010)",
            CabinAge::Old => "Eldre hytte (før 1990)",
        }
    }
}

/// A savings result together with the figures it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsReport {
    #[serde(flatten)]
    pub result: SavingsResult,
    pub price_per_kwh: f64,
    pub baseline_kwh_per_m2: f64,
    pub cabin_age_label: &'static str,
    /// Whole kroner, nb-NO digit grouping
    pub formatted_saving: String,
}

impl SavingsReport {
    pub fn from_inputs(inputs: &CalculatorInputs) -> Self {
        let result = compute(inputs);

        Self {
            result,
            price_per_kwh: inputs.effective_price(),
            baseline_kwh_per_m2: baseline_kwh_per_m2(inputs.cabin_age_class),
            cabin_age_label: inputs.cabin_age_class.map_or("Ikke valgt", CabinAge::label),
            formatted_saving: format_kroner(result.estimated_saving_kr),
        }
    }
}

/// Round to whole kroner and group thousands the Norwegian way ("12 345").
///
/// Negative and non-finite amounts format as "0".
pub fn format_kroner(amount: f64) -> String {
    let rounded = if amount.is_finite() && amount > 0.0 {
        amount.round() as u64
    } else {
        0
    };

    let digits = rounded.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * 2);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(NBSP);
        }
        out.push(c);
    }
    out
}
