use common::snapshot::Snapshot;
use futures::executor::block_on;
use viz_lib::config::VizConfig;
use viz_lib::control::{ApiClient, ControlAction};
use viz_lib::input::InputEvent;
use viz_lib::poller::SnapshotSource;
use viz_lib::preferences::{MemoryStore, PacketStyle, PrefChange, PreferenceStore};
use viz_lib::test_helpers::{Op, Recorder};
use viz_lib::App;

mod harness;
use harness::{state_json, state_json_in_mode, FakeBackend};
use viz_lib::error::VizError;

fn fetch(client: &ApiClient<FakeBackend>) -> Snapshot {
    block_on(client.fetch_snapshot()).expect("state")
}

#[test]
fn poll_fit_select_and_render() {
    viz_lib::init_test_tracing();
    let backend = FakeBackend::with_states(vec![
        Ok(state_json(&[(1, 0.0, 0.0), (2, 10.0, 0.0), (3, 100.0, 100.0)], 15.0)),
        Ok(state_json(&[(1, 0.0, 0.0), (3, 100.0, 100.0)], 15.0)),
    ]);
    let client = ApiClient::new(backend, VizConfig::default());
    let mut app = App::new(VizConfig::default(), Box::new(MemoryStore::default()));
    app.set_canvas_size(800.0, 600.0);

    app.apply_snapshot(fetch(&client));
    let (sx, sy) = app.viewport().world_to_screen(10.0, 0.0);
    app.handle_input(InputEvent::Click {
        sx: sx + 2.0,
        sy: sy - 2.0,
    });
    assert_eq!(app.selected_id(), Some(2));

    let panel = app.panel();
    assert_eq!(panel.info.time, "Time: 1.00");
    assert_eq!(panel.info.event, "Event: 1/10");
    assert_eq!(panel.selection.kind, "REGULAR");
    assert_eq!(panel.selection.neighbors, "(1)");

    let mut surface = Recorder::default();
    assert!(app.render(&mut surface));
    // range disc of the selection comes right after the clear
    assert!(matches!(&surface.ops[1], Op::Circle { fill: Some(_), .. }));

    // node 2 disappears: selection is dropped silently
    app.apply_snapshot(fetch(&client));
    assert_eq!(app.selected_id(), None);
    surface.take();
    app.render(&mut surface);
    assert_eq!(surface.ops.len(), 3);
}

#[test]
fn preferences_survive_a_reload() {
    #[derive(Clone, Default)]
    struct Shared(std::rc::Rc<std::cell::RefCell<MemoryStore>>);

    impl PreferenceStore for Shared {
        fn load(&self, key: &str) -> viz_lib::error::VizResult<Option<String>> {
            self.0.borrow().load(key)
        }

        fn save(&mut self, key: &str, value: &str) -> viz_lib::error::VizResult<()> {
            self.0.borrow_mut().save(key, value)
        }
    }

    let store = Shared::default();
    let mut app = App::new(VizConfig::default(), Box::new(store.clone()));
    app.change_pref(PrefChange::ShowGraph(true));
    app.change_pref(PrefChange::PacketStyle(PacketStyle::Packet));
    app.change_pref(PrefChange::GrowNodes);

    let reloaded = App::new(VizConfig::default(), Box::new(store));
    assert_eq!(reloaded.prefs(), app.prefs());
    assert_eq!(reloaded.prefs().node_size, 7.0);
}

#[test]
fn close_then_new_scenario() {
    let backend = FakeBackend {
        cookies: Some("sessionid=x; csrftoken=secret".to_string()),
        ..FakeBackend::with_states(vec![
            Ok(state_json(&[(1, 50.0, 50.0)], 5.0)),
            Ok(state_json(&[(9, 150.0, 150.0)], 5.0)),
        ])
    };
    let client = ApiClient::new(backend.clone(), VizConfig::default());
    let mut app = App::new(VizConfig::default(), Box::new(MemoryStore::default()));
    app.set_canvas_size(400.0, 400.0);
    app.apply_snapshot(fetch(&client));

    assert!(block_on(client.dispatch(&ControlAction::Close)));
    app.close_reset();
    assert!(!app.snapshot().is_some_and(Snapshot::has_nodes));

    app.apply_snapshot(fetch(&client));
    assert_eq!(app.viewport().x, 140.0);

    let posted = backend.posted();
    assert_eq!(posted[0].path, "/api/close");
    assert_eq!(posted[0].csrf.as_deref(), Some("secret"));
}

#[test]
fn reverse_playback_keeps_the_view_updating() {
    let backend = FakeBackend::with_states(vec![
        Ok(state_json_in_mode(&[(1, 0.0, 0.0), (2, 10.0, 0.0)], 15.0, "BACK")),
        Ok(state_json_in_mode(&[(1, 0.0, 0.0)], 15.0, "PAUSE")),
    ]);
    let client = ApiClient::new(backend, VizConfig::default());
    assert!(block_on(client.dispatch(&ControlAction::Back)));
    assert_eq!(client.transport().posted()[0].path, "/api/back");

    let mut app = App::new(VizConfig::default(), Box::new(MemoryStore::default()));
    app.set_canvas_size(800.0, 600.0);
    app.apply_snapshot(fetch(&client));
    assert_eq!(app.snapshot().expect("snapshot").nodes.len(), 2);
    assert!(app.panel().info.playing);

    app.apply_snapshot(fetch(&client));
    assert!(!app.panel().info.playing);
}

#[test]
fn refused_speed_reports_the_server_message() {
    let backend = FakeBackend::default().refuse("/api/speed", 400, "speed inválido");
    let client = ApiClient::new(backend, VizConfig::default());

    let err = block_on(client.send(&ControlAction::Speed("fast".to_string()))).unwrap_err();
    assert!(matches!(err, VizError::Rejected(ref m) if m == "speed inválido"));
    assert!(!block_on(client.dispatch(&ControlAction::Speed("fast".to_string()))));
    // other endpoints are unaffected
    assert!(block_on(client.dispatch(&ControlAction::Play)));
}
