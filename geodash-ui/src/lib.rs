//! Dioxus components and Leaflet/D3.js bridge for the GeoDash dashboard.
//!
//! This crate provides:
//! - `js_bridge`: Rust wrappers for the Leaflet map and D3 chart via `js_sys::eval()`
//! - `browser`: browser implementations of the map renderer and address bar
//! - `state`: Reactive AppState with Dioxus Signals, plus the shared services
//! - `hooks`: mirrors a state channel into a Signal for the lifetime of a component
//! - `components`: the map, the panels and small reusable RSX pieces

pub mod browser;
pub mod components;
pub mod hooks;
pub mod js_bridge;
pub mod state;
