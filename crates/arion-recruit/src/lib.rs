//! Team Arion recruitment intake.
//!
//! The [`applications`] module holds the applicant wizard and everything behind the
//! registration endpoint; [`config`], [`telemetry`] and [`error`] carry the service plumbing.

pub mod applications;
pub mod config;
pub mod error;
pub mod telemetry;
