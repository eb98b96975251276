//! Coordination layer between the map and its control panels.
//!
//! Nothing here knows about a UI toolkit. Components talk to each other only
//! through [`channel::Channel`]s bundled in [`channels::StateChannels`], and
//! reach the outside world through the traits in [`backend`] and
//! [`map_surface::MapRenderer`] / [`view_sync::AddressBar`]:
//!
//! - `LayerPicker`, `ImageryPanel` write the base-layer and OGC channels
//! - `MapSurface` reacts to them, draws the region and publishes bounds + WMS URL
//! - `StatisticsPanel` reads bounds and runs one request per reducer, in order
//! - `ViewSync` mirrors viewport + base layer into the address bar
//!
//! Every subscribing component has an `attach`/`detach` pair and detaches on
//! drop.

pub mod backend;
pub mod channel;
pub mod channels;
pub mod error;
pub mod imagery_panel;
pub mod layer_picker;
pub mod map_surface;
pub mod statistics_panel;
pub mod view_sync;

#[cfg(test)]
pub(crate) mod testing;

pub use channel::{Channel, Subscription, SubscriptionSet};
pub use channels::StateChannels;
pub use error::PanelError;
