//! Keeps the page query string in step with the map view.

use crate::backend::Clipboard;
use crate::channel::SubscriptionSet;
use crate::channels::StateChannels;
use crate::error::PanelError;
use geodash_core::config::DashConfig;
use geodash_core::layers::BaseLayer;
use geodash_core::view_state::{ViewState, Viewport};
use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// How long the "copied" confirmation stays up after sharing.
pub const COPIED_FEEDBACK_MS: u32 = 1200;

/// The page's query string. Writes replace the current history entry.
pub trait AddressBar {
    fn query(&self) -> String;
    fn replace_query(&self, query: &str);
    /// Full address of the page, query included.
    fn href(&self) -> String;
}

/// View to start from: whatever the address bar validly encodes, the
/// configured defaults for the rest.
pub fn initial_view(bar: &impl AddressBar, config: &DashConfig) -> ViewState {
    let view = ViewState::from_query(&bar.query(), &config.default_view());
    debug!("Initial view {}", view.to_query());
    view
}

/// Copy the current page address, which carries the view, to the clipboard.
pub async fn share_view(bar: &impl AddressBar, clipboard: &impl Clipboard) -> Result<String, PanelError> {
    let url = bar.href();
    if let Err(err) = clipboard.write_text(&url).await {
        warn!("Share copy failed: {}", err);
        return Err(PanelError::Clipboard(err));
    }
    info!("Copied {} to the clipboard", url);
    Ok(url)
}

struct Inner<A> {
    bar: A,
    channels: StateChannels,
    view: Cell<ViewState>,
    last_written: RefCell<Option<String>>,
    subscriptions: RefCell<SubscriptionSet>,
}

pub struct ViewSync<A: AddressBar + 'static> {
    inner: Rc<Inner<A>>,
}

impl<A: AddressBar + 'static> ViewSync<A> {
    /// `fallback_layer` is used until the base-layer channel carries a
    /// recognized name.
    pub fn new(bar: A, channels: StateChannels, fallback_layer: BaseLayer) -> Self {
        let layer = BaseLayer::from_name(&channels.base_layer.get()).unwrap_or(fallback_layer);
        let viewport = channels.viewport.get();
        Self {
            inner: Rc::new(Inner {
                bar,
                channels,
                view: Cell::new(ViewState { viewport, layer }),
                last_written: RefCell::new(None),
                subscriptions: RefCell::new(SubscriptionSet::new()),
            }),
        }
    }

    pub fn attach(&self) {
        if !self.inner.subscriptions.borrow().is_empty() {
            return;
        }

        let weak = Rc::downgrade(&self.inner);
        let viewport = self.inner.channels.viewport.subscribe(move |viewport: &Viewport| {
            if let Some(inner) = weak.upgrade() {
                let mut view = inner.view.get();
                view.viewport = *viewport;
                inner.write(view);
            }
        });

        let weak = Rc::downgrade(&self.inner);
        let layer = self.inner.channels.base_layer.subscribe(move |name: &String| {
            let Some(inner) = weak.upgrade() else { return };
            if let Some(layer) = BaseLayer::from_name(name) {
                let mut view = inner.view.get();
                view.layer = layer;
                inner.write(view);
            }
        });

        let mut set = self.inner.subscriptions.borrow_mut();
        set.push(viewport);
        set.push(layer);
        info!("View sync attached");
    }

    pub fn detach(&self) {
        let mut set = std::mem::take(&mut *self.inner.subscriptions.borrow_mut());
        set.clear();
    }

    pub fn current(&self) -> ViewState {
        self.inner.view.get()
    }
}

impl<A: AddressBar + 'static> Drop for ViewSync<A> {
    fn drop(&mut self) {
        self.detach();
    }
}

impl<A: AddressBar> Inner<A> {
    fn write(&self, view: ViewState) {
        self.view.set(view);
        let query = view.to_query();
        if self.last_written.borrow().as_deref() == Some(query.as_str()) {
            return;
        }
        self.bar.replace_query(&query);
        *self.last_written.borrow_mut() = Some(query);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeClipboard, MemoryAddressBar};
    use geodash_core::geometry::LatLng;

    fn setup(query: &str) -> (StateChannels, ViewSync<MemoryAddressBar>, MemoryAddressBar) {
        let config = DashConfig::default();
        let bar = MemoryAddressBar::with_query(query);
        let view = initial_view(&bar, &config);
        let channels = StateChannels::new(&config, &view);
        let sync = ViewSync::new(bar.clone(), channels.clone(), config.default_base_layer);
        sync.attach();
        (channels, sync, bar)
    }

    #[test]
    fn address_bar_view_wins_over_defaults() {
        let (channels, sync, bar) = setup("?lat=36.8&lng=10.18&z=9&layer=Topographic");
        assert_eq!(channels.base_layer.get(), "Topographic");
        assert_eq!(sync.current().viewport.zoom, 9.0);
        assert_eq!(bar.writes(), vec!["?lat=36.80000&lng=10.18000&z=9&layer=Topographic"]);
    }

    #[test]
    fn garbage_query_falls_back_to_defaults() {
        let (channels, sync, _bar) = setup("?lat=north&lng=&z=far&layer=Sepia");
        assert_eq!(channels.base_layer.get(), "Satellite");
        assert_eq!(sync.current(), DashConfig::default().default_view());
    }

    #[test]
    fn viewport_and_layer_changes_replace_query() {
        let (channels, _sync, bar) = setup("");
        channels.viewport.set(Viewport {
            center: LatLng::new(35.0, 10.0),
            zoom: 7.0,
        });
        channels.base_layer.set("NDVI".to_string());
        let writes = bar.writes();
        assert_eq!(writes.len(), 3);
        assert_eq!(writes[1], "?lat=35.00000&lng=10.00000&z=7&layer=Satellite");
        assert_eq!(writes[2], "?lat=35.00000&lng=10.00000&z=7&layer=NDVI");
    }

    #[test]
    fn unknown_layer_and_repeats_do_not_write() {
        let (channels, _sync, bar) = setup("");
        channels.base_layer.set("Sepia".to_string());
        channels.viewport.set(channels.viewport.get());
        assert_eq!(bar.writes().len(), 1);
    }

    #[test]
    fn detached_sync_stops_writing() {
        let (channels, sync, bar) = setup("");
        drop(sync);
        channels.base_layer.set("Dark".to_string());
        assert_eq!(bar.writes().len(), 1);
        assert_eq!(channels.viewport.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn share_copies_address_with_current_view() {
        let (channels, _sync, bar) = setup("");
        channels.base_layer.set("Dark".to_string());
        let clipboard = FakeClipboard::default();
        let url = share_view(&bar, &clipboard).await.unwrap();
        assert!(url.ends_with("&layer=Dark"));
        assert_eq!(url, format!("https://geodash.test/{}", bar.query()));
        assert_eq!(clipboard.copied(), vec![url]);
    }

    #[tokio::test]
    async fn refused_copy_is_an_error() {
        let (_channels, _sync, bar) = setup("");
        let clipboard = FakeClipboard::refusing("permission denied");
        let err = share_view(&bar, &clipboard).await.unwrap_err();
        assert!(matches!(err, PanelError::Clipboard(ref reason) if reason == "permission denied"));
        assert!(clipboard.copied().is_empty());
    }
}
