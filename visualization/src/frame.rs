//! Browser tickers pacing the poll loop.

use futures::channel::oneshot;
use std::time::Duration;
use viz_lib::config::PollCadence;
use viz_lib::poller::Ticker;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Used when the animation frame callback cannot be registered.
const FRAME_FALLBACK: Duration = Duration::from_millis(16);

/// Resolves on the next display refresh.
async fn next_animation_frame() {
    let (tx, rx) = oneshot::channel::<()>();
    let callback = Closure::once(move |_timestamp: f64| {
        let _ = tx.send(());
    });
    let registered = web_sys::window()
        .map(|w| w.request_animation_frame(callback.as_ref().unchecked_ref()))
        .is_some_and(|r| r.is_ok());
    if registered {
        let _ = rx.await;
    } else {
        tracing::debug!("requestAnimationFrame unavailable, using a timer");
        gloo_timers::future::sleep(FRAME_FALLBACK).await;
    }
    drop(callback);
}

pub enum BrowserTicker {
    AnimationFrame,
    Interval(Duration),
}

impl From<PollCadence> for BrowserTicker {
    fn from(cadence: PollCadence) -> Self {
        match cadence {
            PollCadence::EveryFrame => BrowserTicker::AnimationFrame,
            PollCadence::Interval(every) => BrowserTicker::Interval(every),
        }
    }
}

impl Ticker for BrowserTicker {
    async fn tick(&mut self) {
        match self {
            BrowserTicker::AnimationFrame => next_animation_frame().await,
            BrowserTicker::Interval(every) => gloo_timers::future::sleep(*every).await,
        }
    }
}
