use std::fmt::Write;
use unsegen::base::*;
use unsegen::widget::*;

use crate::holidays::LOADING_LABEL;

use super::Context;

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Full page placeholder shown until the loading delay has passed.
pub struct LoadingScreen<'a> {
    context: &'a Context,
}

impl<'a> LoadingScreen<'a> {
    pub fn new(context: &'a Context) -> Self {
        LoadingScreen { context }
    }
}

impl Widget for LoadingScreen<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(LOADING_LABEL.chars().count() + 2),
            height: RowDemand::at_least(1),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let width = window.get_width().raw_value() as usize;
        let height = window.get_height().raw_value();

        let mut cursor = Cursor::new(&mut window)
            .style_modifier(self.context.theme.month_header_style);
        cursor.move_by(ColDiff::new(0), RowDiff::new(height / 2));

        let spinner = SPINNER[self.context.spinner_frame() % SPINNER.len()];
        if let Err(err) = write!(
            &mut cursor,
            "{:^width$}",
            format!("{} {}", spinner, LOADING_LABEL),
            width = width
        ) {
            log::warn!("Error while writing loading screen: {}", err);
        }
    }
}
