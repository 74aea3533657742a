//! Requests to the simulation backend.
//!
//! [`ApiClient`] builds paths, form bodies and the CSRF header value on top
//! of a [`Transport`], which only moves bytes. The browser build implements
//! the transport with `gloo-net`; tests script it.

use crate::config::VizConfig;
use crate::error::{VizError, VizResult};
use crate::poller::SnapshotSource;
use common::control::ControlReply;
use common::mapping::MappingList;
use common::snapshot::Snapshot;
use std::fmt;

/// Cookie holding the token echoed back in `X-CSRFToken`.
pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_HEADER: &str = "X-CSRFToken";
/// Shown when an upload fails without a server message.
pub const UPLOAD_FALLBACK_MESSAGE: &str = "Upload failed";

/// Url-encoded form fields of a POST body.
pub type Form<'a> = &'a [(&'a str, String)];

/// Raw HTTP access. Implementations resolve with the response body of 2xx
/// responses; other statuses become [`VizError::Status`] carrying the body.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get(&self, path: &str) -> VizResult<String>;
    async fn post(&self, path: &str, form: Form<'_>, csrf: Option<&str>) -> VizResult<String>;
    /// The page's `document.cookie` string, if there is one.
    fn cookies(&self) -> Option<String>;
}

/// Value of the `csrftoken` cookie in a `document.cookie` string.
pub fn csrf_token(cookies: &str) -> Option<&str> {
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|c| c.strip_prefix(CSRF_COOKIE)?.strip_prefix('='))
}

/// Server message of an `{"ok": false, "error": ...}` reply.
fn rejection_message(body: &str) -> Option<String> {
    serde_json::from_str::<ControlReply>(body)
        .ok()?
        .rejection()
        .map(str::to_string)
}

/// Error statuses whose body explains the refusal become [`VizError::Rejected`].
fn into_rejection(e: VizError) -> VizError {
    let message = match &e {
        VizError::Status { body, .. } => rejection_message(body),
        _ => None,
    };
    message.map_or(e, VizError::Rejected)
}

/// A simulation control command.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlAction {
    Play,
    Pause,
    Back,
    StepForward,
    StepBack,
    Speed(String),
    Close,
    SetMapping(String),
}

impl ControlAction {
    /// Endpoint name relative to the API base.
    pub fn endpoint(&self) -> &'static str {
        match self {
            ControlAction::Play => "play",
            ControlAction::Pause => "pause",
            ControlAction::Back => "back",
            ControlAction::StepForward => "step_f",
            ControlAction::StepBack => "step_b",
            ControlAction::Speed(_) => "speed",
            ControlAction::Close => "close",
            ControlAction::SetMapping(_) => "mapping/set",
        }
    }

    pub fn form(&self) -> Vec<(&'static str, String)> {
        match self {
            ControlAction::Speed(speed) => vec![("speed", speed.clone())],
            ControlAction::SetMapping(key) => vec![("key", key.clone())],
            _ => Vec::new(),
        }
    }

    /// Parse the `data-act` style name used by the control buttons.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "play" => ControlAction::Play,
            "pause" => ControlAction::Pause,
            "back" => ControlAction::Back,
            "step_f" => ControlAction::StepForward,
            "step_b" => ControlAction::StepBack,
            "close" => ControlAction::Close,
            _ => return None,
        })
    }
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

pub struct ApiClient<T> {
    transport: T,
    config: VizConfig,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, config: VizConfig) -> Self {
        Self { transport, config }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &VizConfig {
        &self.config
    }

    fn csrf(&self) -> Option<String> {
        let cookies = self.transport.cookies()?;
        csrf_token(&cookies).map(str::to_string)
    }

    /// POST `action`. A JSON reply with `ok: false` and a message becomes
    /// [`VizError::Rejected`]; bodies that are not a reply are accepted.
    pub async fn send(&self, action: &ControlAction) -> VizResult<()> {
        let path = self.config.endpoint(action.endpoint());
        let csrf = self.csrf();
        let body = self
            .transport
            .post(&path, &action.form(), csrf.as_deref())
            .await
            .map_err(into_rejection)?;
        if let Some(msg) = rejection_message(&body) {
            return Err(VizError::Rejected(msg));
        }
        tracing::debug!(%action, "Control request sent");
        Ok(())
    }

    /// Like [`send`](Self::send), but failures are only logged.
    pub async fn dispatch(&self, action: &ControlAction) -> bool {
        match self.send(action).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(%action, error = %e, "Control request failed");
                false
            }
        }
    }

    /// Available colour mappings and the active one.
    pub async fn mappings(&self) -> VizResult<MappingList> {
        let body = self.transport.get(&self.config.endpoint("mapping/list")).await?;
        let list: MappingList = serde_json::from_str(&body)?;
        if !list.ok {
            return Err(VizError::Rejected("mapping list unavailable".to_string()));
        }
        Ok(list)
    }

    /// CSRF token for requests the transport builds itself, like uploads.
    pub fn csrf_token(&self) -> Option<String> {
        self.csrf()
    }
}

impl<T: Transport> SnapshotSource for ApiClient<T> {
    async fn fetch_snapshot(&self) -> VizResult<Snapshot> {
        let body = self.transport.get(&self.config.endpoint("state")).await?;
        Ok(Snapshot::from_json(&body)?)
    }
}

/// Message to show the user for a finished upload, `None` on success.
pub fn upload_failure(result: &VizResult<String>) -> Option<String> {
    let body = match result {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(error = %e, "Upload request failed");
            let message = match e {
                VizError::Status { body, .. } => rejection_message(body),
                _ => None,
            };
            return Some(message.unwrap_or_else(|| UPLOAD_FALLBACK_MESSAGE.to_string()));
        }
    };
    match serde_json::from_str::<ControlReply>(body) {
        Ok(reply) if reply.ok => {
            tracing::info!("Upload accepted");
            None
        }
        Ok(reply) => Some(
            reply
                .rejection()
                .unwrap_or(UPLOAD_FALLBACK_MESSAGE)
                .to_string(),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Upload reply is not valid JSON");
            Some(UPLOAD_FALLBACK_MESSAGE.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeTransport {
        cookies: Option<String>,
        reply: String,
        posts: RefCell<Vec<(String, Vec<(String, String)>, Option<String>)>>,
    }

    impl Transport for FakeTransport {
        async fn get(&self, path: &str) -> VizResult<String> {
            if path.ends_with("/state") || path.ends_with("/mapping/list") {
                Ok(self.reply.clone())
            } else {
                Err(VizError::Status {
                    path: path.to_string(),
                    status: 404,
                    body: String::new(),
                })
            }
        }

        async fn post(&self, path: &str, form: Form<'_>, csrf: Option<&str>) -> VizResult<String> {
            self.posts.borrow_mut().push((
                path.to_string(),
                form.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
                csrf.map(str::to_string),
            ));
            Ok(self.reply.clone())
        }

        fn cookies(&self) -> Option<String> {
            self.cookies.clone()
        }
    }

    fn client(cookies: Option<&str>, reply: &str) -> ApiClient<FakeTransport> {
        ApiClient::new(
            FakeTransport {
                cookies: cookies.map(str::to_string),
                reply: reply.to_string(),
                ..FakeTransport::default()
            },
            VizConfig::default(),
        )
    }

    #[test]
    fn csrf_cookie_lookup() {
        assert_eq!(csrf_token("a=1; csrftoken=abc123; b=2"), Some("abc123"));
        assert_eq!(csrf_token("csrftoken="), Some(""));
        assert_eq!(csrf_token("xcsrftoken=nope; csrftokenx=no"), None);
        assert_eq!(csrf_token(""), None);
    }

    #[test]
    fn action_paths_and_bodies() {
        assert_eq!(ControlAction::StepForward.endpoint(), "step_f");
        assert_eq!(ControlAction::StepBack.endpoint(), "step_b");
        assert!(ControlAction::Play.form().is_empty());
        assert_eq!(
            ControlAction::Speed("2.5".to_string()).form(),
            vec![("speed", "2.5".to_string())]
        );
        assert_eq!(
            ControlAction::SetMapping("degree".to_string()).endpoint(),
            "mapping/set"
        );
        assert_eq!(ControlAction::from_name("back"), Some(ControlAction::Back));
        assert_eq!(ControlAction::from_name("speed"), None);
    }

    #[test]
    fn send_carries_csrf_when_cookie_present() {
        let c = client(Some("csrftoken=tok"), r#"{"ok": true}"#);
        block_on(c.send(&ControlAction::Speed("3".to_string()))).unwrap();
        let posts = c.transport().posts.borrow();
        assert_eq!(posts[0].0, "/api/speed");
        assert_eq!(posts[0].1, vec![("speed".to_string(), "3".to_string())]);
        assert_eq!(posts[0].2.as_deref(), Some("tok"));
    }

    #[test]
    fn send_without_cookie_omits_token() {
        let c = client(None, "");
        assert!(block_on(c.dispatch(&ControlAction::Pause)));
        assert_eq!(c.transport().posts.borrow()[0].2, None);
    }

    #[test]
    fn rejection_is_reported() {
        let c = client(None, r#"{"ok": false, "error": "no simulation loaded"}"#);
        let err = block_on(c.send(&ControlAction::Play)).unwrap_err();
        assert!(matches!(err, VizError::Rejected(ref m) if m == "no simulation loaded"));
        assert!(!block_on(c.dispatch(&ControlAction::Play)));
    }

    #[test]
    fn snapshot_is_fetched_from_state_endpoint() {
        let c = client(None, r#"{"nodes": [{"id": 1, "x": 0, "y": 0}], "time": 1.5}"#);
        let s = block_on(c.fetch_snapshot()).unwrap();
        assert_eq!(s.nodes.len(), 1);
        assert_eq!(s.time, 1.5);

        let bad = client(None, "<html>");
        assert!(block_on(bad.fetch_snapshot()).is_err());
    }

    #[test]
    fn mapping_list_requires_ok() {
        let c = client(
            None,
            r#"{"ok": true, "mappings": [{"key": "type", "label": "Type"}], "current": "type"}"#,
        );
        let list = block_on(c.mappings()).unwrap();
        assert_eq!(list.current.as_deref(), Some("type"));

        let c = client(None, r#"{"ok": false}"#);
        assert!(matches!(block_on(c.mappings()), Err(VizError::Rejected(_))));
    }

    #[test]
    fn upload_messages() {
        assert_eq!(upload_failure(&Ok(r#"{"ok": true}"#.to_string())), None);
        assert_eq!(
            upload_failure(&Ok(r#"{"ok": false, "error": "bad file"}"#.to_string())).as_deref(),
            Some("bad file")
        );
        assert_eq!(
            upload_failure(&Ok(r#"{"ok": false}"#.to_string())).as_deref(),
            Some(UPLOAD_FALLBACK_MESSAGE)
        );
        assert_eq!(
            upload_failure(&Err(VizError::transport("/api/upload", "offline"))).as_deref(),
            Some(UPLOAD_FALLBACK_MESSAGE)
        );
    }

    #[test]
    fn upload_error_status_shows_server_message() {
        let missing_file = VizError::Status {
            path: "/api/upload".to_string(),
            status: 400,
            body: r#"{"ok": false, "error": "Arquivo não enviado"}"#.to_string(),
        };
        assert_eq!(
            upload_failure(&Err(missing_file)).as_deref(),
            Some("Arquivo não enviado")
        );

        let proxy_page = VizError::Status {
            path: "/api/upload".to_string(),
            status: 502,
            body: "<html>Bad Gateway</html>".to_string(),
        };
        assert_eq!(
            upload_failure(&Err(proxy_page)).as_deref(),
            Some(UPLOAD_FALLBACK_MESSAGE)
        );
    }

    #[test]
    fn error_status_with_reply_becomes_rejection() {
        let err = into_rejection(VizError::Status {
            path: "/api/speed".to_string(),
            status: 400,
            body: r#"{"ok": false, "error": "speed inválido"}"#.to_string(),
        });
        assert!(matches!(err, VizError::Rejected(ref m) if m == "speed inválido"));

        let err = into_rejection(VizError::Status {
            path: "/api/speed".to_string(),
            status: 500,
            body: String::new(),
        });
        assert!(matches!(err, VizError::Status { status: 500, .. }));
    }
}
