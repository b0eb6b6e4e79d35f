//! Screening Dashboard - facility summary report & interactive dashboard
//!
//! Loads a screening spreadsheet, keeps consenting participants above the age
//! and risk thresholds, and summarizes them per health facility.

pub mod charts;
pub mod config;
pub mod data;
pub mod export;
pub mod gui;
pub mod pipeline;
pub mod stats;
