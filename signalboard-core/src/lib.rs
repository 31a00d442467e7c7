//! Signalboard Core: bar types, indicators, trend annotation, signal scoring,
//! transition detection, and the market-data sources that feed them.
//!
//! This crate contains the whole engine:
//! - Domain types (bars, annotated bars, indicator sets, triggers)
//! - Indicator primitives behind a single-series trait
//! - Annotation, warm-up filtering and trend classification
//! - Composite scoring and transition detection
//! - Data loading with CSV, Yahoo Finance and synthetic sources

pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
