//! dynaproof-report: Cohort report rendering.
//!
//! Turns a [`dynaproof_core::report::CohortReport`] into a self-contained
//! HTML page for the class instructor.

pub mod html;

pub use html::{generate_html, write_html_report};
