//! Step-by-step answer collection as an immutable state value.
//!
//! Every transition consumes the state and returns the next one, so callers
//! hold exactly one current state and never share mutable answers.

use serde::{Deserialize, Serialize};

use crate::report::SavingsReport;
use crate::savings::{compute, CabinAge, CalculatorInputs, PriceMode, SavingsResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    #[default]
    Intro,
    Location,
    Size,
    Age,
    Price,
    Result,
}

impl Step {
    pub const ORDER: [Step; 6] = [
        Step::Intro,
        Step::Location,
        Step::Size,
        Step::Age,
        Step::Price,
        Step::Result,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn next(self) -> Option<Step> {
        Self::ORDER.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<Step> {
        self.index().checked_sub(1).map(|i| Self::ORDER[i])
    }

    /// "Steg 2/6"
    pub fn label(self) -> String {
        format!("Steg {}/{}", self.index() + 1, Self::ORDER.len())
    }
}

/// The chosen place for the cabin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    pub step: Step,
    pub location: Option<SelectedLocation>,
    pub inputs: CalculatorInputs,
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the current step has what it needs to move on.
    pub fn can_continue(&self) -> bool {
        match self.step {
            Step::Intro => true,
            Step::Location => {
                self.location.is_some() && self.inputs.winter_months.is_some_and(|m| m > 0)
            }
            Step::Size => self.inputs.floor_area_m2.is_some_and(|a| a > 0.0),
            Step::Age => self.inputs.cabin_age_class.is_some(),
            Step::Price => match self.inputs.price_mode.unwrap_or_default() {
                PriceMode::Standard => true,
                PriceMode::Custom => self.inputs.custom_price_per_kwh.is_some_and(|p| p > 0.0),
            },
            Step::Result => false,
        }
    }

    /// Move to the next step if the current one is complete.
    #[must_use]
    pub fn advance(self) -> Self {
        if !self.can_continue() {
            return self;
        }
        match self.step.next() {
            Some(step) => {
                tracing::debug!(from = ?self.step, to = ?step, "Wizard advanced");
                Self { step, ..self }
            }
            None => self,
        }
    }

    /// Step back one screen. From the price step this is the age step; the
    /// old jump straight back to size was dropped on purpose.
    #[must_use]
    pub fn back(self) -> Self {
        match self.step.previous() {
            Some(step) => Self { step, ..self },
            None => self,
        }
    }

    /// Pick a place. The winter length from an earlier pick is kept until
    /// a new suggestion arrives.
    #[must_use]
    pub fn select_location(self, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            location: Some(SelectedLocation {
                name: name.into(),
                latitude,
                longitude,
            }),
            ..self
        }
    }

    #[must_use]
    pub fn with_winter_months(self, months: u8) -> Self {
        Self {
            inputs: CalculatorInputs {
                winter_months: Some(months),
                ..self.inputs
            },
            ..self
        }
    }

    #[must_use]
    pub fn with_floor_area(self, floor_area_m2: Option<f64>) -> Self {
        Self {
            inputs: CalculatorInputs {
                floor_area_m2,
                ..self.inputs
            },
            ..self
        }
    }

    #[must_use]
    pub fn with_cabin_age(self, age: CabinAge) -> Self {
        Self {
            inputs: CalculatorInputs {
                cabin_age_class: Some(age),
                ..self.inputs
            },
            ..self
        }
    }

    /// Switching to the standard price forgets any custom price.
    #[must_use]
    pub fn with_price_mode(self, mode: PriceMode) -> Self {
        let custom_price_per_kwh = match mode {
            PriceMode::Standard => None,
            PriceMode::Custom => self.inputs.custom_price_per_kwh,
        };
        Self {
            inputs: CalculatorInputs {
                price_mode: Some(mode),
                custom_price_per_kwh,
                ..self.inputs
            },
            ..self
        }
    }

    #[must_use]
    pub fn with_custom_price(self, price_per_kwh: Option<f64>) -> Self {
        Self {
            inputs: CalculatorInputs {
                custom_price_per_kwh: price_per_kwh,
                ..self.inputs
            },
            ..self
        }
    }

    /// Start over from the intro with no answers.
    #[must_use]
    pub fn reset(self) -> Self {
        Self::new()
    }

    pub fn savings(&self) -> SavingsResult {
        compute(&self.inputs)
    }

    pub fn report(&self) -> SavingsReport {
        SavingsReport::from_inputs(&self.inputs)
    }
}
