pub mod aggregator;
pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod normalizer;
pub mod render;
pub mod transport;
pub mod types;
pub mod views;
