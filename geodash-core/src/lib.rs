//! Core types for the GeoDash map dashboard.
//!
//! This crate provides:
//! - `geometry`: lat/lng points, bounding boxes and their GeoJSON form
//! - `layers`: the fixed base-layer catalog and its tile/WMS sources
//! - `ogc`: imagery query parameters and export formats
//! - `wms`: GetMap URL construction, format substitution and legend URLs
//! - `stats`: statistics endpoint requests and chart merging
//! - `view_state`: shareable `lat`/`lng`/`z`/`layer` query strings
//! - `config`: compiled defaults and JSON config loading
//! - `client` (feature `api`): `reqwest` client for the external endpoints

pub mod config;
pub mod dates;
pub mod error;
pub mod geometry;
pub mod layers;
pub mod ogc;
pub mod stats;
pub mod view_state;
pub mod wms;

#[cfg(feature = "api")]
pub mod client;
