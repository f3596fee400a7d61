//! Core library for the klima-report command line application.
//!
//! The library turns a PPD hourly meter export into a monthly heating/cooling
//! consumption report. Columns are classified in [`classify`], totalled in
//! [`aggregate`], identified in [`identify`], merged per apartment in
//! [`group`] and arranged in [`order`]. [`report`] shapes the result into one
//! encoding-neutral table that the writers under [`io`] render as text and as
//! a styled workbook. [`pipeline`] ties the stages together.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod error;
pub mod group;
pub mod identify;
pub mod io;
pub mod model;
pub mod order;
pub mod pipeline;
pub mod report;
pub mod summary;

pub use config::PipelineConfig;
pub use error::{ReportError, Result};
pub use pipeline::{ConsumptionReport, Pipeline};
