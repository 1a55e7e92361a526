//! Heating-pad savings model
//!
//! Pure calculations only; nothing in this crate performs I/O.

pub mod report;
pub mod savings;
pub mod wizard;

pub use report::{format_kroner, SavingsReport};
pub use savings::{
    baseline_kwh_per_m2, compute, CabinAge, CalculatorInputs, PriceMode, SavingsResult,
    STANDARD_PRICE_PER_KWH,
};
pub use wizard::{SelectedLocation, Step, WizardState};
