//! Bridges from state channels into Dioxus signals.

use dioxus::prelude::*;
use geodash_state::{Channel, Subscription};
use std::cell::RefCell;
use std::rc::Rc;

/// Mirror `channel` into a Signal while the calling component is mounted.
///
/// The subscription is released in `use_drop`, so the signal is never
/// written after its owner is gone.
pub fn use_channel<T>(channel: &Channel<T>) -> Signal<T>
where
    T: Clone + PartialEq + 'static,
{
    let signal = use_signal(|| channel.get());
    let subscription: Rc<RefCell<Option<Subscription>>> = use_hook(|| {
        let subscription = channel.subscribe(move |value: &T| {
            let mut signal = signal;
            if *signal.peek() != *value {
                signal.set(value.clone());
            }
        });
        Rc::new(RefCell::new(Some(subscription)))
    });

    use_drop(move || {
        subscription.borrow_mut().take();
    });

    signal
}
