//! surveypool-harmonize: per-country harmonization engine
//!
//! Turns one raw household-survey extract into a standardized table:
//! tri-state menopause outcomes, harmonized covariates, and the
//! analysis-sample flag, each derived through presence-tolerant resolvers so
//! that a field missing from one country's source never aborts the pass.

pub mod country;
pub mod covariate;
pub mod fields;
pub mod outcome;
pub mod params;
pub mod sample;

pub use country::{CountrySource, process_country};
pub use params::DeriveParams;
