//! The viewer controller.
//!
//! [`App`] owns all client state: configuration, viewport, preferences,
//! the latest snapshot, selection, drag state and the one-time fit flag.
//! The browser shell holds it behind `Rc<RefCell<_>>` and calls into it from
//! event handlers and the poll loop; nothing here awaits.

use crate::config::VizConfig;
use crate::input::{wheel_factor, DragState, InputEvent, Reaction, PRIMARY_BUTTON};
use crate::panel::PanelView;
use crate::preferences::{
    load_preferences, save_preferences, NodeSizeLimits, PrefChange, PreferenceStore, Preferences,
};
use crate::render::{self, Frame, Surface};
use crate::selection::{pick_node, Selection, SelectionInfo};
use crate::viewport::{Bounds, Viewport};
use common::snapshot::{Dim, NodeId, Snapshot};

pub struct App {
    config: VizConfig,
    limits: NodeSizeLimits,
    viewport: Viewport,
    prefs: Preferences,
    store: Box<dyn PreferenceStore>,
    snapshot: Option<Snapshot>,
    selection: Selection,
    drag: DragState,
    did_initial_fit: bool,
    /// World dimensions from the most recent snapshot that declared them.
    declared_dim: Option<Dim>,
    /// Communication radius from the most recent snapshot that declared one.
    declared_radius: f64,
    /// Canvas backing size in pixels.
    canvas: (f64, f64),
}

impl App {
    pub fn new(config: VizConfig, store: Box<dyn PreferenceStore>) -> Self {
        let prefs = load_preferences(store.as_ref(), &config);
        tracing::debug!(?prefs, "Preferences loaded");
        Self {
            limits: NodeSizeLimits::from(&config),
            viewport: Viewport::new(config.min_scale, config.max_scale),
            prefs,
            store,
            snapshot: None,
            selection: Selection::default(),
            drag: DragState::default(),
            did_initial_fit: false,
            declared_dim: None,
            declared_radius: 0.0,
            canvas: (0.0, 0.0),
            config,
        }
    }

    pub fn config(&self) -> &VizConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn selected_id(&self) -> Option<NodeId> {
        self.selection.id()
    }

    pub fn declared_radius(&self) -> f64 {
        self.declared_radius
    }

    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas = (width.max(0.0), height.max(0.0));
    }

    /// Replace the held snapshot. The first snapshot with nodes triggers the
    /// one-time fit; a selected node that disappeared is deselected.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        if let Some(dim) = snapshot.dim {
            let prior = self.declared_dim.unwrap_or_default();
            self.declared_dim = Some(Dim {
                x: if dim.x > 0.0 { dim.x } else { prior.x },
                y: if dim.y > 0.0 { dim.y } else { prior.y },
            });
            if snapshot.radius_comm > 0.0 {
                self.declared_radius = snapshot.radius_comm;
            }
        }
        let needs_fit = !self.did_initial_fit && snapshot.has_nodes();
        self.snapshot = Some(snapshot);
        if needs_fit {
            self.fit();
            self.did_initial_fit = true;
        }
        if let Some(s) = &self.snapshot {
            self.selection.resolve(s);
        }
    }

    /// Frame the current content in the canvas.
    pub fn fit(&mut self) {
        let empty = Snapshot::default();
        let snapshot = self.snapshot.as_ref().unwrap_or(&empty);
        let bounds = Bounds::of_content(snapshot, self.declared_dim);
        self.viewport
            .fit_to_bounds(bounds, self.canvas.0, self.canvas.1);
        tracing::info!(
            scale = self.viewport.scale(),
            x = self.viewport.x,
            y = self.viewport.y,
            "Viewport fitted"
        );
    }

    fn zoom_about_center(&mut self, factor: f64) -> bool {
        let (w, h) = self.canvas;
        self.viewport.zoom_at_point(factor, w / 2.0, h / 2.0)
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom_about_center(self.config.button_zoom_step)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom_about_center(1.0 / self.config.button_zoom_step)
    }

    /// Redraw is only worth it while a snapshot is held.
    fn redraw_if(&self, changed: bool) -> Reaction {
        if changed && self.snapshot.is_some() {
            Reaction::redraw()
        } else {
            Reaction::NONE
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Reaction {
        match event {
            InputEvent::Wheel { delta_y, sx, sy } => {
                let changed = wheel_factor(delta_y, self.config.wheel_zoom_step)
                    .is_some_and(|factor| self.viewport.zoom_at_point(factor, sx, sy));
                self.redraw_if(changed)
            }
            InputEvent::PointerDown { button, sx, sy } => {
                if button == PRIMARY_BUTTON {
                    self.drag.begin((sx, sy));
                }
                Reaction::NONE
            }
            InputEvent::PointerMove { sx, sy } => match self.drag.move_to((sx, sy)) {
                Some((dx, dy)) => {
                    self.viewport.pan(dx, dy);
                    self.redraw_if(dx != 0.0 || dy != 0.0)
                }
                None => Reaction::NONE,
            },
            InputEvent::PointerUp => {
                self.drag.end();
                Reaction::NONE
            }
            InputEvent::Click { sx, sy } => self.select_at(sx, sy),
            InputEvent::Key(key) if key == "Escape" => self.clear_selection(),
            InputEvent::Key(_) => Reaction::NONE,
        }
    }

    /// Select the node under `(sx, sy)`, or clear the selection when there
    /// is none.
    pub fn select_at(&mut self, sx: f64, sy: f64) -> Reaction {
        let Some(snapshot) = &self.snapshot else {
            return Reaction::NONE;
        };
        let picked = pick_node(snapshot, &self.viewport, sx, sy, self.prefs.node_size).map(|n| n.id);
        self.selection.select(picked);
        Reaction::selection()
    }

    pub fn clear_selection(&mut self) -> Reaction {
        self.selection.clear();
        if self.snapshot.is_some() {
            Reaction::selection()
        } else {
            Reaction {
                selection_changed: true,
                ..Reaction::NONE
            }
        }
    }

    /// Apply a preference edit and persist the result. Returns whether a
    /// redraw is due.
    pub fn change_pref(&mut self, change: PrefChange) -> bool {
        if !self.prefs.apply(change, self.limits) {
            return false;
        }
        save_preferences(self.store.as_mut(), &self.config, &self.prefs);
        self.snapshot.is_some()
    }

    /// A node sprite finished loading.
    pub fn sprite_loaded(&self) -> bool {
        self.prefs.show_sprites && self.snapshot.is_some()
    }

    /// The simulation was closed on the server: show the empty placeholder.
    pub fn close_reset(&mut self) {
        self.selection.clear();
        self.snapshot = Some(Snapshot::closed());
        self.did_initial_fit = false;
        tracing::info!("Simulation closed, view reset");
    }

    /// A new scenario was uploaded; fit again once its nodes arrive.
    pub fn after_upload(&mut self) {
        self.selection.clear();
        self.did_initial_fit = false;
    }

    /// Full redraw of the held snapshot. Returns false when there is nothing
    /// to draw yet.
    pub fn render(&mut self, surface: &mut dyn Surface) -> bool {
        let Some(snapshot) = &self.snapshot else {
            return false;
        };
        let selected = self.selection.resolve(snapshot);
        render::render(
            surface,
            &Frame {
                snapshot,
                viewport: &self.viewport,
                prefs: &self.prefs,
                selected,
            },
        );
        true
    }

    pub fn selection_info(&mut self) -> Option<SelectionInfo> {
        let snapshot = self.snapshot.as_ref()?;
        let node = self.selection.resolve(snapshot)?;
        Some(SelectionInfo::collect(snapshot, node))
    }

    pub fn panel(&mut self) -> PanelView {
        let info = self.selection_info();
        match &self.snapshot {
            Some(s) => PanelView::new(s, info.as_ref()),
            None => PanelView::new(&Snapshot::default(), None),
        }
    }
}
