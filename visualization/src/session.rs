//! Glue between the viewer controller, the canvas and the backend.
//!
//! One [`Session`] lives per mounted page. DOM listeners, the poll loop and
//! the yew callbacks all share it through an `Rc`; every `RefCell` borrow is
//! released before any `.await`.

use crate::canvas::{CanvasSurface, Sprites};
use crate::frame::BrowserTicker;
use crate::http::GlooTransport;
use crate::storage::preference_store;
use common::mapping::MappingList;
use common::snapshot::Snapshot;
use gloo_events::{EventListener, EventListenerOptions};
use std::cell::{Cell, RefCell};
use std::ops::ControlFlow;
use std::rc::Rc;
use viz_lib::config::VizConfig;
use viz_lib::control::{upload_failure, ApiClient, ControlAction};
use viz_lib::input::{InputEvent, Reaction};
use viz_lib::panel::PanelView;
use viz_lib::poller::Poller;
use viz_lib::preferences::{PrefChange, Preferences};
use viz_lib::App;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{File, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent};
use yew::Callback;

/// Where the session reports state the page renders.
#[derive(Clone)]
pub struct Outputs {
    pub panel: Callback<PanelView>,
    pub prefs: Callback<Preferences>,
    pub mappings: Callback<MappingList>,
}

pub struct Session {
    app: RefCell<App>,
    surface: RefCell<CanvasSurface>,
    client: ApiClient<GlooTransport>,
    outputs: Outputs,
    stopped: Cell<bool>,
}

/// Read the configuration from the page query string.
pub fn page_config() -> VizConfig {
    let query = web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default();
    VizConfig::default().with_query(&query).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring query string overrides");
        VizConfig::default()
    })
}

impl Session {
    pub fn new(canvas: HtmlCanvasElement, outputs: Outputs) -> Result<Rc<Self>, JsValue> {
        let config = page_config();
        let surface = CanvasSurface::new(canvas, Sprites::load()?)?;
        let app = App::new(config.clone(), preference_store());
        let session = Rc::new(Self {
            app: RefCell::new(app),
            surface: RefCell::new(surface),
            client: ApiClient::new(GlooTransport, config),
            outputs,
            stopped: Cell::new(false),
        });
        session.publish_prefs();
        session.publish_panel();
        Ok(session)
    }

    pub fn stop(&self) {
        self.stopped.set(true);
    }

    fn publish_panel(&self) {
        let view = self.app.borrow_mut().panel();
        self.outputs.panel.emit(view);
    }

    fn publish_prefs(&self) {
        let prefs = self.app.borrow().prefs().clone();
        self.outputs.prefs.emit(prefs);
    }

    pub fn redraw(&self) {
        let mut surface = self.surface.borrow_mut();
        self.app.borrow_mut().render(&mut *surface);
    }

    fn react(&self, reaction: Reaction) {
        if reaction.redraw {
            self.redraw();
        }
        if reaction.selection_changed {
            self.publish_panel();
        }
    }

    fn on_snapshot(&self, snapshot: Snapshot) -> ControlFlow<()> {
        if self.stopped.get() {
            return ControlFlow::Break(());
        }
        {
            let (width, height) = self.surface.borrow().sync_size();
            let mut app = self.app.borrow_mut();
            app.set_canvas_size(width, height);
            app.apply_snapshot(snapshot);
        }
        self.redraw();
        self.publish_panel();
        ControlFlow::Continue(())
    }

    pub fn input(&self, event: InputEvent) {
        let reaction = self.app.borrow_mut().handle_input(event);
        self.react(reaction);
    }

    pub fn clear_selection(&self) {
        let reaction = self.app.borrow_mut().clear_selection();
        self.react(reaction);
    }

    pub fn change_pref(&self, change: PrefChange) {
        let redraw = self.app.borrow_mut().change_pref(change);
        self.publish_prefs();
        if redraw {
            self.redraw();
        }
    }

    pub fn zoom_in(&self) {
        if self.app.borrow_mut().zoom_in() {
            self.redraw();
        }
    }

    pub fn zoom_out(&self) {
        if self.app.borrow_mut().zoom_out() {
            self.redraw();
        }
    }

    pub fn fit(&self) {
        let (width, height) = self.surface.borrow().sync_size();
        {
            let mut app = self.app.borrow_mut();
            app.set_canvas_size(width, height);
            app.fit();
        }
        self.redraw();
    }

    pub fn save_png(&self) {
        let name = viz_lib::export::png_file_name_at_millis(js_sys::Date::now());
        if let Err(e) = self.surface.borrow().export_png(&name) {
            tracing::warn!(?e, "Failed to export canvas");
        }
    }

    pub async fn control(self: Rc<Self>, action: ControlAction) {
        let sent = self.client.dispatch(&action).await;
        if sent && action == ControlAction::Close {
            self.app.borrow_mut().close_reset();
            self.redraw();
            self.publish_panel();
        }
    }

    pub async fn upload(self: Rc<Self>, file: File) {
        let path = self.client.config().endpoint("upload");
        let csrf = self.client.csrf_token();
        let result = self
            .client
            .transport()
            .upload(&path, &file, csrf.as_deref())
            .await;
        if let Some(message) = upload_failure(&result) {
            alert(&message);
        }
        self.app.borrow_mut().after_upload();
        self.publish_panel();
    }

    pub async fn load_mappings(self: Rc<Self>) {
        match self.client.mappings().await {
            Ok(list) => self.outputs.mappings.emit(list),
            Err(e) => tracing::debug!(error = %e, "Mapping list unavailable"),
        }
    }

    /// Runs until the session is stopped.
    pub async fn poll(self: Rc<Self>) {
        let config = self.client.config().clone();
        let ticker = BrowserTicker::from(config.cadence);
        let poller = Poller::new(ApiClient::new(GlooTransport, config), ticker);
        poller
            .run_while(
                || !self.stopped.get(),
                |snapshot| self.on_snapshot(snapshot),
            )
            .await;
    }

    /// Register the canvas and window listeners; they live as long as the
    /// returned handles.
    pub fn listen(self: &Rc<Self>) -> Vec<EventListener> {
        let Some(window) = web_sys::window() else {
            return Vec::new();
        };
        let canvas = self.surface.borrow().canvas().clone();
        let mut listeners = Vec::new();

        let s = Rc::clone(self);
        listeners.push(EventListener::new_with_options(
            &canvas,
            "wheel",
            EventListenerOptions::enable_prevent_default(),
            move |e| {
                let Some(wheel) = e.dyn_ref::<WheelEvent>() else {
                    return;
                };
                e.prevent_default();
                let (sx, sy) = s.point(wheel);
                s.input(InputEvent::Wheel {
                    delta_y: wheel.delta_y(),
                    sx,
                    sy,
                });
            },
        ));

        let s = Rc::clone(self);
        listeners.push(EventListener::new(&canvas, "mousedown", move |e| {
            if let Some(mouse) = e.dyn_ref::<MouseEvent>() {
                let (sx, sy) = s.point(mouse);
                s.input(InputEvent::PointerDown {
                    button: mouse.button(),
                    sx,
                    sy,
                });
            }
        }));

        let s = Rc::clone(self);
        listeners.push(EventListener::new(&window, "mousemove", move |e| {
            if let Some(mouse) = e.dyn_ref::<MouseEvent>() {
                let (sx, sy) = s.point(mouse);
                s.input(InputEvent::PointerMove { sx, sy });
            }
        }));

        let s = Rc::clone(self);
        listeners.push(EventListener::new(&window, "mouseup", move |_| {
            s.input(InputEvent::PointerUp);
        }));

        let s = Rc::clone(self);
        listeners.push(EventListener::new(&canvas, "click", move |e| {
            if let Some(mouse) = e.dyn_ref::<MouseEvent>() {
                let (sx, sy) = s.point(mouse);
                s.input(InputEvent::Click { sx, sy });
            }
        }));

        let s = Rc::clone(self);
        listeners.push(EventListener::new(&window, "keydown", move |e| {
            if let Some(key) = e.dyn_ref::<KeyboardEvent>() {
                s.input(InputEvent::Key(key.key()));
            }
        }));

        let images: Vec<_> = self
            .surface
            .borrow()
            .sprites()
            .all()
            .into_iter()
            .cloned()
            .collect();
        for img in images {
            let s = Rc::clone(self);
            listeners.push(EventListener::new(&img, "load", move |_| {
                if s.app.borrow().sprite_loaded() {
                    s.redraw();
                }
            }));
        }

        listeners
    }

    fn point(&self, mouse: &MouseEvent) -> (f64, f64) {
        self.surface
            .borrow()
            .backing_point(mouse.client_x(), mouse.client_y())
    }
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}
