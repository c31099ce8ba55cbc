use std::fmt::{self, Write};
use unsegen::base::*;
use unsegen::widget::*;

use crate::calendar::{self, DayCell, GridCell, MonthGrid};
use crate::holidays;

use super::{Context, Theme};

const CELL_WIDTH: usize = MonthGrid::CELL_WIDTH;
const COLUMNS: usize = MonthGrid::COLUMNS;
const ROWS: usize = 6;

fn marker(day: &DayCell, theme: &Theme) -> char {
    if day.is_holiday() {
        theme.holiday_char
    } else {
        ' '
    }
}

/// Back-navigation hint and page title.
pub struct PageHeader<'a> {
    context: &'a Context,
}

impl<'a> PageHeader<'a> {
    const HEIGHT: usize = 3;

    pub fn new(context: &'a Context) -> Self {
        PageHeader { context }
    }
}

impl Widget for PageHeader<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(COLUMNS * CELL_WIDTH),
            height: RowDemand::exact(Self::HEIGHT),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let theme = &self.context.theme;
        let mut cursor = Cursor::new(&mut window).style_modifier(theme.back_style);

        if let Err(err) = writeln!(&mut cursor, "← {} (q)", holidays::BACK_LABEL) {
            log::warn!("Error while writing header: {}", err);
        }

        cursor.set_style_modifier(theme.title_style);
        if let Err(err) = writeln!(&mut cursor, "{}", holidays::TITLE) {
            log::warn!("Error while writing header: {}", err);
        }
    }
}

/// Month navigation header, weekday header and the day grid of the current
/// month, followed by the month's holidays.
pub struct MonthPane<'a> {
    grid: MonthGrid,
    context: &'a Context,
}

impl<'a> MonthPane<'a> {
    const HEADER_ROWS: usize = 2;

    pub fn new(context: &'a Context) -> Self {
        MonthPane {
            grid: context.month_grid(),
            context,
        }
    }

    fn legend_rows(&self) -> usize {
        if self.context.show_legend {
            calendar::holidays_of_month(self.grid.month).len() + 1
        } else {
            0
        }
    }

    fn draw_grid(&self, window: &mut Window) -> fmt::Result {
        let theme = &self.context.theme;
        let width = COLUMNS * CELL_WIDTH;

        let mut cursor = Cursor::new(window)
            .wrapping_mode(WrappingMode::Wrap)
            .style_modifier(theme.month_header_style);

        let title = format!("‹ {} {} ›", self.grid.month.name(), holidays::ACADEMIC_YEAR);
        writeln!(&mut cursor, "{:^width$}", title, width = width)?;

        cursor.set_style_modifier(theme.weekday_style);
        write!(&mut cursor, "{}", calendar::weekday_header())?;
        cursor.fill_and_wrap_line();

        cursor.set_style_modifier(theme.day_style);
        for week in self.grid.weeks() {
            for cell in week {
                match cell {
                    GridCell::Blank => write!(&mut cursor, "{:width$}", "", width = CELL_WIDTH)?,
                    GridCell::Day(day) => {
                        let saved_style = cursor.get_style_modifier();

                        cursor.apply_style_modifier(theme.day_style);
                        if day.is_holiday() {
                            cursor.apply_style_modifier(theme.holiday_day_style);
                        }
                        if day.selected {
                            cursor.apply_style_modifier(theme.selected_day_style);
                        }
                        if day.date == self.context.focused_date() {
                            cursor.apply_style_modifier(theme.focus_day_style);
                        }

                        write!(&mut cursor, "{:>5}{}", day.day_num, marker(day, theme))?;

                        cursor.set_style_modifier(saved_style);
                        write!(&mut cursor, " ")?;
                    }
                }
            }
            cursor.fill_and_wrap_line();
        }

        if self.context.show_legend {
            writeln!(&mut cursor)?;
            cursor.set_style_modifier(theme.holiday_day_style);
            for (date, label) in calendar::holidays_of_month(self.grid.month) {
                writeln!(&mut cursor, "{} {}: {}", theme.holiday_char, calendar::date_key(&date), label)?;
            }
        }

        Ok(())
    }
}

impl Widget for MonthPane<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(COLUMNS * CELL_WIDTH),
            height: RowDemand::exact(Self::HEADER_ROWS + ROWS + self.legend_rows()),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        if let Err(err) = self.draw_grid(&mut window) {
            log::warn!("Error while drawing month: {}", err);
        }
    }
}
