//! Scripted backend shared by the integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use viz_lib::control::{Form, Transport};
use viz_lib::error::{VizError, VizResult};
use viz_lib::poller::Ticker;

/// A request the fake backend received.
#[derive(Debug, Clone, PartialEq)]
pub struct Posted {
    pub path: String,
    pub form: Vec<(String, String)>,
    pub csrf: Option<String>,
}

/// Serves queued `/state` bodies in order; every POST is recorded and
/// succeeds with `{"ok": true}` unless a refusal was registered for its path.
#[derive(Clone, Default)]
pub struct FakeBackend {
    pub states: Rc<RefCell<VecDeque<VizResult<String>>>>,
    pub posted: Rc<RefCell<Vec<Posted>>>,
    pub refusals: Rc<RefCell<HashMap<String, (u16, String)>>>,
    pub cookies: Option<String>,
}

impl FakeBackend {
    pub fn with_states(states: impl IntoIterator<Item = VizResult<String>>) -> Self {
        Self {
            states: Rc::new(RefCell::new(states.into_iter().collect())),
            ..Self::default()
        }
    }

    /// Answer POSTs to `path` with `status` and a `{"ok": false}` body,
    /// the way the backend refuses bad input.
    pub fn refuse(self, path: &str, status: u16, error: &str) -> Self {
        let body = serde_json::json!({"ok": false, "error": error}).to_string();
        self.refusals
            .borrow_mut()
            .insert(path.to_string(), (status, body));
        self
    }

    pub fn posted(&self) -> Vec<Posted> {
        self.posted.borrow().clone()
    }
}

impl Transport for FakeBackend {
    async fn get(&self, path: &str) -> VizResult<String> {
        if !path.ends_with("/state") {
            return Err(VizError::Status {
                path: path.to_string(),
                status: 404,
                body: String::new(),
            });
        }
        self.states
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(VizError::transport(path, "no more states")))
    }

    async fn post(&self, path: &str, form: Form<'_>, csrf: Option<&str>) -> VizResult<String> {
        self.posted.borrow_mut().push(Posted {
            path: path.to_string(),
            form: form
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            csrf: csrf.map(str::to_string),
        });
        if let Some((status, body)) = self.refusals.borrow().get(path).cloned() {
            return Err(VizError::Status {
                path: path.to_string(),
                status,
                body,
            });
        }
        Ok(r#"{"ok": true}"#.to_string())
    }

    fn cookies(&self) -> Option<String> {
        self.cookies.clone()
    }
}

/// Ticker that resolves immediately and counts how often it was asked.
#[derive(Clone, Default)]
pub struct CountingTicker(pub Rc<RefCell<u32>>);

impl Ticker for CountingTicker {
    async fn tick(&mut self) {
        *self.0.borrow_mut() += 1;
    }
}

pub fn state_json(nodes: &[(u64, f64, f64)], radius: f64) -> String {
    state_json_in_mode(nodes, radius, "PLAY")
}

/// State body with the given playback `mode` (`PLAY`, `PAUSE` or `BACK`).
pub fn state_json_in_mode(nodes: &[(u64, f64, f64)], radius: f64, mode: &str) -> String {
    let nodes: Vec<_> = nodes
        .iter()
        .map(|(id, x, y)| serde_json::json!({"id": id, "x": x, "y": y, "type": "REGULAR"}))
        .collect();
    serde_json::json!({
        "nodes": nodes,
        "radius_comm": radius,
        "dim": {"x": 200, "y": 200},
        "time": 1.0,
        "idx": 1,
        "total": 10,
        "mode": mode
    })
    .to_string()
}
