//! Saber Pro benefit classification.
//!
//! [`benefits::classify`] maps a global exam score to a benefit tier and
//! [`benefits::narrate`] explains it. The remaining modules are the record
//! store, roster reporting and CLI plumbing around that core.

pub mod benefits;
pub mod config;
pub mod logging;
pub mod output;
pub mod records;
pub mod roster;
pub mod service;

pub use benefits::{classify, classify_with, narrate, BenefitClassification, BenefitOutcome, Tier};
pub use service::{BenefitService, StudentResult};
