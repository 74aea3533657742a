use futures::executor::block_on;
use std::ops::ControlFlow;
use viz_lib::config::VizConfig;
use viz_lib::control::ApiClient;
use viz_lib::error::VizError;
use viz_lib::poller::Poller;

mod harness;
use harness::{state_json, CountingTicker, FakeBackend};

#[test]
fn poll_loop_skips_failures_and_keeps_going() {
    viz_lib::init_test_tracing();
    let backend = FakeBackend::with_states(vec![
        Ok(state_json(&[(1, 0.0, 0.0)], 10.0)),
        Err(VizError::transport("/api/state", "connection reset")),
        Ok("{not json".to_string()),
        Ok(state_json(&[(1, 0.0, 0.0), (2, 5.0, 5.0)], 10.0)),
    ]);
    let ticker = CountingTicker::default();
    let ticks = ticker.0.clone();
    let poller = Poller::new(ApiClient::new(backend, VizConfig::default()), ticker);

    let mut counts = Vec::new();
    block_on(poller.run(|snapshot| {
        counts.push(snapshot.nodes.len());
        if counts.len() == 2 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }));

    assert_eq!(counts, vec![1, 2]);
    assert_eq!(*ticks.borrow(), 4);
}

#[test]
fn poller_uses_configured_api_base() {
    let config = VizConfig::default().with_query("?api=/sim/api").unwrap();
    assert_eq!(config.endpoint("state"), "/sim/api/state");

    let backend = FakeBackend::with_states(vec![Ok(state_json(&[], 1.0))]);
    let mut poller = Poller::new(ApiClient::new(backend, config), CountingTicker::default());
    let snapshot = block_on(poller.poll_once()).expect("snapshot");
    assert!(snapshot.nodes.is_empty());
    assert_eq!(poller.skipped(), 0);
}

#[test]
fn cancelled_poller_stops_against_a_dead_backend() {
    let ticker = CountingTicker::default();
    let ticks = ticker.0.clone();
    let poller = Poller::new(
        ApiClient::new(FakeBackend::default(), VizConfig::default()),
        ticker,
    );
    let mut delivered = 0;
    block_on(poller.run_while(
        || *ticks.borrow() < 3,
        |_| {
            delivered += 1;
            ControlFlow::Continue(())
        },
    ));
    assert_eq!(delivered, 0);
    assert_eq!(*ticks.borrow(), 3);
}
