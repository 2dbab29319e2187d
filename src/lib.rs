//! Document risk and compliance analysis.
//!
//! The [`analysis`] module hosts the request pipeline (validation, classification, risk
//! category mapping, narrative synthesis, sanity checks and response assembly). The
//! [`assessment`] module scores raw text for sensitive-content risk.

pub mod analysis;
pub mod assessment;
pub mod config;
pub mod error;
pub mod telemetry;
