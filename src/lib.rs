//! shortbox - a single-user URL shortener
//!
//! Short codes map to target URLs with a fixed validity window. Every
//! successful resolution records a click (time, source, rough location).
//! A small logging sink ships structured records to a remote collector and
//! keeps a local queue when that fails.
//!
//! # Architecture
//! - `storage`: blob backends and the mapping store
//! - `services`: validation, link lifecycle, geo lookup, logging sink
//! - `api`: HTTP handlers
//! - `interfaces`: CLI commands
//! - `config`: configuration management
//! - `runtime`: application wiring and execution modes
//! - `system`: logging initialization

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
