//! Main render/view function

use mlog_widget::DisplaySurface;
use ratatui::Frame;

use crate::app::DemoApp;
use crate::layout;
use crate::widgets::{HelpBar, LogPanel, StatusBar, StatusInfo};

/// Render the complete UI
///
/// Only the viewport height is written back to the app, so the scroll
/// range matches what is on screen.
pub fn view(frame: &mut Frame, app: &mut DemoApp) {
    let areas = layout::create(frame.area());
    fit_viewport(app, layout::log_rows(areas.logs));

    let widget = app.widget();
    let panel = LogPanel::new(widget.surface())
        .indicator(widget.indicator().line())
        .paused(!widget.auto_scroll_enabled());
    frame.render_widget(panel, areas.logs);

    let info = status_info(app);
    frame.render_widget(StatusBar::new(&info), areas.status);
    frame.render_widget(HelpBar, areas.help);
}

/// Resize the surface viewport, keeping a followed view at the bottom
fn fit_viewport(app: &mut DemoApp, rows: usize) {
    let follow = app.widget().auto_scroll_enabled() && app.widget().is_at_bottom();
    let surface = app.widget_mut().surface_mut();
    if surface.viewport_height() == rows {
        return;
    }
    surface.set_viewport_height(rows);
    if follow {
        surface.scroll_to_bottom();
    }
}

pub fn status_info(app: &DemoApp) -> StatusInfo {
    let widget = app.widget();
    let surface = widget.surface();
    StatusInfo {
        loading: widget.loading_state(),
        queued: widget.queued_count(),
        producers: app.active_producers(),
        task: app.task().map(|t| t.label()),
        auto_scroll: widget.auto_scroll_enabled(),
        offset: surface.scroll_position(),
        visible: surface.viewport_height(),
        total: surface.len(),
    }
}
