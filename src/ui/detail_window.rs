use chrono::NaiveDate;
use std::fmt::Write;
use unsegen::base::*;
use unsegen::widget::*;

use crate::calendar;
use crate::holidays::HOLIDAY_HEADING;

use super::Theme;

/// Panel naming the selected holiday. Only shown while a holiday is selected.
pub struct DetailPanel<'a> {
    date: NaiveDate,
    label: &'static str,
    theme: &'a Theme,
}

impl<'a> DetailPanel<'a> {
    pub fn new(date: NaiveDate, label: &'static str, theme: &'a Theme) -> Self {
        DetailPanel { date, label, theme }
    }
}

impl Widget for DetailPanel<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(10),
            height: RowDemand::exact(3),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let mut cursor = Cursor::new(&mut window)
            .wrapping_mode(WrappingMode::Wrap)
            .style_modifier(self.theme.month_header_style);

        if let Err(err) = writeln!(
            &mut cursor,
            "{} ({})",
            HOLIDAY_HEADING,
            calendar::date_key(&self.date)
        ) {
            log::warn!("Error while writing holiday heading: {}", err);
        }

        cursor.set_style_modifier(self.theme.detail_style);
        if let Err(err) = write!(&mut cursor, "{}", self.label) {
            log::warn!("Error while writing holiday: {}", err);
        }
    }
}
