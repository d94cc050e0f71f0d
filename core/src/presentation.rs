use crate::*;

/// Commands the driver issues to whatever draws the grid.
///
/// Animations are fire-and-forget: when one finishes, the presentation layer reports back through
/// [`GameDriver::on_activated`], [`GameDriver::on_revealed`] and [`GameDriver::on_hidden`].
pub trait Presentation {
    fn activate(&mut self);

    fn deactivate(&mut self);

    fn build_grid(&mut self, layout: &LayoutId, values: &[CardValue], matched: &[bool]);

    fn set_score(&mut self, matches: u32);

    fn set_clicks(&mut self, clicks: u32);

    fn set_interactable(&mut self, cell: CellIndex, interactable: bool);

    fn reveal(&mut self, cell: CellIndex, animated: bool);

    fn hide(&mut self, cell: CellIndex, animated: bool);

    /// Feedback for a freshly matched card.
    fn celebrate(&mut self, cell: CellIndex);
}

/// Owner of screen transitions, told once when the section has been won.
pub trait Navigation {
    fn section_ended(&mut self);
}

/// Presentation that draws nothing, for headless hosts.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Headless;

impl Presentation for Headless {
    fn activate(&mut self) {}

    fn deactivate(&mut self) {}

    fn build_grid(&mut self, _layout: &LayoutId, _values: &[CardValue], _matched: &[bool]) {}

    fn set_score(&mut self, _matches: u32) {}

    fn set_clicks(&mut self, _clicks: u32) {}

    fn set_interactable(&mut self, _cell: CellIndex, _interactable: bool) {}

    fn reveal(&mut self, _cell: CellIndex, _animated: bool) {}

    fn hide(&mut self, _cell: CellIndex, _animated: bool) {}

    fn celebrate(&mut self, _cell: CellIndex) {}
}

impl Navigation for Headless {
    fn section_ended(&mut self) {}
}
