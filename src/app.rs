//! Application state for the terminal dashboard.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::layout::Rect;

use crate::controller::DashboardController;
use crate::data::format::angle_for_value;
use crate::settings::Settings;
use crate::source::HealthDataSource;
use crate::ui::gauge::NeedleAnimation;
use crate::ui::Theme;
use crate::view::{Renderer, ViewTree};

/// How long a status message stays in the status bar.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Main application state.
///
/// Owns the controller (the only writer of health state) plus everything
/// that is purely presentational: needle animation, sample focus, overlays.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    pub controller: DashboardController,
    pub renderer: Renderer,
    settings: Settings,

    /// Displayed needle position, eased toward the gauge angle.
    pub needle: NeedleAnimation,
    /// Index of the chart sample whose tooltip is shown.
    pub focused_sample: Option<usize>,
    /// Plot area of the chart from the last draw, for mouse hover.
    pub plot_area: Option<Rect>,

    pub theme: Theme,
    status_message: Option<(String, Instant)>,

    /// Controller revision shown by the last frame.
    drawn_revision: Option<u64>,
    /// Set by input and status changes until the next frame.
    dirty: bool,
}

impl App {
    /// Mount the dashboard at `now`.
    pub fn new(settings: Settings, theme: Theme, now: Instant) -> Self {
        let controller = DashboardController::mount(&settings, now);
        let needle = NeedleAnimation::at_rest(
            angle_for_value(controller.state().value()),
            settings.animation.needle,
            now,
        );

        Self {
            running: true,
            show_help: false,
            controller,
            renderer: Renderer::from_settings(&settings),
            settings,
            needle,
            focused_sample: None,
            plot_area: None,
            theme,
            status_message: None,
            drawn_revision: None,
            dirty: true,
        }
    }

    /// Replace the one-shot transition with a live source.
    pub fn attach_source(&mut self, source: Box<dyn HealthDataSource>) {
        self.controller.subscribe(source);
    }

    /// Current view tree.
    pub fn view(&self) -> ViewTree {
        let samples = self.controller.series().to_vec();
        self.renderer.render(self.controller.state(), &samples)
    }

    /// Advance the controller. Retargets the needle when the value changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self
            .status_message
            .as_ref()
            .is_some_and(|(_, shown)| now.saturating_duration_since(*shown) >= STATUS_MESSAGE_TTL)
        {
            self.status_message = None;
            self.dirty = true;
        }

        let changed = self.controller.tick(now);
        if changed {
            let target = angle_for_value(self.controller.state().value());
            self.needle.retarget(target, now);

            // Keep focus on a valid sample as the series shifts.
            let len = self.controller.series().len();
            if let Some(index) = self.focused_sample {
                self.focused_sample = (len > 0).then(|| index.min(len - 1));
            }
        }
        changed
    }

    /// Tear the dashboard down and mount a fresh one (replays the transition).
    pub fn remount(&mut self, now: Instant) {
        self.controller.teardown();
        self.controller = DashboardController::mount(&self.settings, now);
        self.needle.retarget(angle_for_value(self.controller.state().value()), now);
        self.focused_sample = None;
        self.set_status_message("Dashboard remounted".to_string());
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
        self.dirty = true;
    }

    /// Whether the screen is stale at `now`.
    ///
    /// A moving needle, a countdown in the header and a visible status
    /// message all keep redrawing; otherwise only new controller revisions
    /// and explicit requests do.
    pub fn needs_redraw(&self, now: Instant) -> bool {
        self.dirty
            || self.drawn_revision != Some(self.controller.revision())
            || !self.needle.is_settled(now)
            || self.controller.time_until_transition(now).is_some()
            || self.status_message.is_some()
    }

    pub fn request_redraw(&mut self) {
        self.dirty = true;
    }

    /// Record that a frame was painted.
    pub fn mark_drawn(&mut self) {
        self.drawn_revision = Some(self.controller.revision());
        self.dirty = false;
    }

    /// Current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < STATUS_MESSAGE_TTL => Some(msg),
            _ => None,
        }
    }

    /// Focus the next sample, starting from the first.
    pub fn focus_next(&mut self) {
        let len = self.controller.series().len();
        if len == 0 {
            return;
        }
        self.focused_sample = Some(match self.focused_sample {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        });
    }

    /// Focus the previous sample, starting from the last.
    pub fn focus_prev(&mut self) {
        let len = self.controller.series().len();
        if len == 0 {
            return;
        }
        self.focused_sample = Some(match self.focused_sample {
            Some(i) => i.saturating_sub(1),
            None => len - 1,
        });
    }

    pub fn focus_first(&mut self) {
        if !self.controller.series().is_empty() {
            self.focused_sample = Some(0);
        }
    }

    pub fn focus_last(&mut self) {
        let len = self.controller.series().len();
        if len > 0 {
            self.focused_sample = Some(len - 1);
        }
    }

    pub fn clear_focus(&mut self) {
        self.focused_sample = None;
    }

    /// Pointer moved to a terminal cell. Focus follows it over the plot.
    pub fn hover(&mut self, column: u16, row: u16) {
        let Some(area) = self.plot_area else {
            return;
        };
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        if !inside {
            return;
        }

        let span = area.width.saturating_sub(1).max(1) as f64;
        let fraction = (column - area.x) as f64 / span;
        if let Some(index) = self.view().chart.nearest_index(fraction) {
            self.focused_sample = Some(index);
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Tear down the controller and stop the event loop.
    pub fn quit(&mut self) {
        self.controller.teardown();
        self.running = false;
    }

    /// Write the current view tree as pretty JSON.
    pub fn export_view(&self, path: &Path) -> Result<()> {
        write_view(&self.view(), path)
    }
}

/// Serialize a view tree to `path`.
pub fn write_view(view: &ViewTree, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(view)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), "exported view");
    Ok(())
}
