use ratatui::Frame;
use ratatui::layout::Rect;

/// Something that draws itself into a region of the frame.
///
/// Props arrive as struct fields; `render` takes `&mut self` so stateful
/// widgets (lists with a selection) can update their ratatui state while drawing.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that consumes terminal events.
pub trait EventHandler {
    /// The high-level event this component emits.
    type Event;

    /// Consume one `TuiEvent`; `Some` when the component has something to report.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
