//! Resizable side-by-side split

use eframe::egui::{self, Align, Layout, Rect, Sense, UiBuilder};

const HANDLE_WIDTH: f32 = 8.0;

/// Divider state after one frame of the split view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitResponse {
    /// Left share of the width; the caller is responsible for clamping it
    pub ratio: f32,
    /// The divider was released this frame
    pub drag_stopped: bool,
}

/// Lay out `left` and `right` side by side with a draggable divider.
///
/// `ratio` is the left share of the width.
pub fn split(
    ui: &mut egui::Ui,
    ratio: f32,
    left: impl FnOnce(&mut egui::Ui),
    right: impl FnOnce(&mut egui::Ui),
) -> SplitResponse {
    let rect = ui.available_rect_before_wrap();
    let content_width = (rect.width() - HANDLE_WIDTH).max(0.0);
    let left_width = content_width * ratio;

    let left_rect = Rect::from_min_size(rect.min, egui::vec2(left_width, rect.height()));
    let handle_rect = Rect::from_min_size(
        egui::pos2(left_rect.max.x, rect.min.y),
        egui::vec2(HANDLE_WIDTH, rect.height()),
    );
    let right_rect = Rect::from_min_max(egui::pos2(handle_rect.max.x, rect.min.y), rect.max);

    let mut new_ratio = ratio;
    let response = ui.interact(handle_rect, ui.id().with("split_handle"), Sense::drag());
    if response.hovered() || response.dragged() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
    }
    if response.dragged() {
        if let Some(pointer) = response.interact_pointer_pos() {
            new_ratio = ratio_at(pointer.x, rect.min.x, content_width);
        }
    }

    let stroke = if response.dragged() {
        ui.visuals().widgets.active.fg_stroke
    } else {
        ui.visuals().widgets.noninteractive.bg_stroke
    };
    ui.painter()
        .vline(handle_rect.center().x, rect.y_range(), stroke);

    let pane = |rect: Rect| UiBuilder::new().max_rect(rect).layout(Layout::top_down(Align::Min));
    left(&mut ui.new_child(pane(left_rect.shrink2(egui::vec2(4.0, 0.0)))));
    right(&mut ui.new_child(pane(right_rect.shrink2(egui::vec2(4.0, 0.0)))));

    ui.allocate_rect(rect, Sense::hover());
    SplitResponse {
        ratio: new_ratio,
        drag_stopped: response.drag_stopped(),
    }
}

/// Left share of the width for a divider dragged to `x`
fn ratio_at(x: f32, left_edge: f32, width: f32) -> f32 {
    if width <= 0.0 {
        return 0.5;
    }
    (x - left_edge - HANDLE_WIDTH / 2.0) / width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_at() {
        let width = 1000.0;
        assert!((ratio_at(504.0, 0.0, width) - 0.5).abs() < 1e-6);
        assert!((ratio_at(104.0, 100.0, width)).abs() < 1e-6);
        assert_eq!(ratio_at(10.0, 0.0, 0.0), 0.5);
    }
}
