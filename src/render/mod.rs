// Rendering adapter contract

use crate::trace::Step;

/// Draws one step of a trace
///
/// Implementations redraw the structure from `step.state`, emphasize the
/// elements in `step.highlight`, and show `step.message`. Drawing must be a
/// pure function of the step: an adapter never mutates the step and never
/// reaches the live structure being operated on — it only ever sees recorded
/// copies.
///
/// The crate ships no graphical implementation; the CLI's line printer is the
/// reference adapter, and host UIs (terminal panes, canvases) plug in here.
pub trait RenderAdapter<S> {
    /// Render the step under the player cursor
    fn draw(&mut self, step: &Step<S>);
}
