use chrono::{Datelike, NaiveDate};
use std::sync::mpsc;

use crate::calendar::{self, MonthGrid, MonthIndex};
use crate::config::Config;
use crate::error::{Error, ErrorKind, Result};
use crate::events::{Event, LoadingTimer};
use crate::holidays::{self, ACADEMIC_YEAR};

use unsegen::base::style::*;
use unsegen::widget::builtin::PromptLine;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mode {
    Normal,
    Command,
}

#[derive(Clone, Debug)]
pub struct Theme {
    pub title_style: StyleModifier,
    pub back_style: StyleModifier,
    pub month_header_style: StyleModifier,
    pub weekday_style: StyleModifier,
    pub day_style: StyleModifier,
    pub focus_day_style: StyleModifier,
    pub holiday_day_style: StyleModifier,
    pub selected_day_style: StyleModifier,
    pub holiday_char: char,
    pub detail_style: StyleModifier,
    pub error_style: StyleModifier,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            title_style: StyleModifier::new()
                .fg_color(Color::Yellow)
                .format(TextFormatModifier::default().bold(true)),
            back_style: StyleModifier::new().fg_color(Color::Yellow),
            month_header_style: StyleModifier::new()
                .fg_color(Color::Yellow)
                .format(TextFormatModifier::default().bold(true)),
            weekday_style: StyleModifier::new().fg_color(Color::Yellow),
            day_style: StyleModifier::new(),
            focus_day_style: StyleModifier::new().invert(true),
            holiday_day_style: StyleModifier::new().fg_color(Color::Red),
            selected_day_style: StyleModifier::new()
                .bg_color(Color::Yellow)
                .fg_color(Color::Black),
            holiday_char: '*',
            detail_style: StyleModifier::new().fg_color(Color::Red),
            error_style: StyleModifier::new().fg_color(Color::LightRed),
        }
    }
}

/// State of one calendar page instance.
///
/// The page starts out loading. Creating it through [`Context::mount`] arms a
/// [`LoadingTimer`] that is released again together with the context.
pub struct Context {
    pub mode: Mode,
    pub theme: Theme,
    pub show_legend: bool,
    pub command_line: PromptLine,
    pub last_error_message: Option<String>,
    pub quit: bool,
    current_month: MonthIndex,
    selected_date: Option<NaiveDate>,
    focus_day: u32,
    is_loading: bool,
    spinner_frame: usize,
    loading_timer: Option<LoadingTimer>,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            mode: Mode::Normal,
            theme: Theme::default(),
            show_legend: true,
            command_line: PromptLine::with_prompt(":".to_owned()),
            last_error_message: None,
            quit: false,
            current_month: MonthIndex::JANUARY,
            selected_date: None,
            focus_day: 1,
            is_loading: true,
            spinner_frame: 0,
            loading_timer: None,
        }
    }
}

impl Context {
    pub fn mount(config: &Config, sink: mpsc::Sender<Event>) -> Self {
        log::debug!("Mounting calendar page");
        Context {
            show_legend: config.show_legend,
            loading_timer: Some(LoadingTimer::start(config.loading_delay(), sink)),
            ..Context::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn finish_loading(&mut self) {
        if self.is_loading {
            log::debug!("Loading finished");
            self.is_loading = false;
            self.loading_timer = None;
        }
    }

    pub fn spinner_frame(&self) -> usize {
        self.spinner_frame
    }

    pub fn update(&mut self) {
        if self.is_loading {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    pub fn current_month(&self) -> MonthIndex {
        self.current_month
    }

    pub fn go_to_previous_month(&mut self) {
        self.show_month(self.current_month.prev());
    }

    pub fn go_to_next_month(&mut self) {
        self.show_month(self.current_month.next());
    }

    pub fn show_month(&mut self, month: MonthIndex) {
        self.current_month = month;
        self.clamp_focus();
    }

    pub fn selected_date(&self) -> Option<&NaiveDate> {
        self.selected_date.as_ref()
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = Some(date);
    }

    /// Parses a `YYYY-MM-DD` date of the academic year, shows its month and
    /// selects it.
    pub fn select_date_str(&mut self, date: &str) -> Result<()> {
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")?;
        if date.year() != ACADEMIC_YEAR {
            return Err(Error::new(
                ErrorKind::DateOutOfRange,
                &calendar::date_key(&date),
            ));
        }

        self.show_month(MonthIndex::from(date));
        self.focus_day = date.day();
        self.select_date(date);
        Ok(())
    }

    /// Holiday label of the selected date, if it is one.
    pub fn detail(&self) -> Option<&'static str> {
        self.selected_date
            .as_ref()
            .and_then(|date| holidays::holiday_label(&calendar::date_key(date)))
    }

    pub fn focus_day(&self) -> u32 {
        self.focus_day
    }

    pub fn focused_date(&self) -> NaiveDate {
        let first = self.current_month.first_day();
        first.with_day(self.focus_day).unwrap_or(first)
    }

    pub fn move_focus_by(&mut self, days: i64) {
        let target = self.focus_day as i64 + days;
        let last = calendar::days_in_month(self.current_month) as i64;
        self.focus_day = target.max(1).min(last) as u32;
    }

    pub fn select_focused_day(&mut self) {
        self.select_date(self.focused_date());
    }

    fn clamp_focus(&mut self) {
        self.move_focus_by(0);
    }

    pub fn month_grid(&self) -> MonthGrid {
        calendar::render_month_grid(self.current_month, self.selected_date.as_ref())
    }

    pub fn input_sink(&self, mode: Mode) -> Option<&PromptLine> {
        match mode {
            Mode::Command => Some(&self.command_line),
            Mode::Normal => None,
        }
    }

    pub fn input_sink_mut(&mut self) -> &mut PromptLine {
        &mut self.command_line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn initial_state() {
        let ctx = Context::default();
        assert_eq!(ctx.current_month(), MonthIndex::JANUARY);
        assert_eq!(ctx.selected_date(), None);
        assert!(ctx.is_loading());
        assert_eq!(ctx.detail(), None);
    }

    #[test]
    fn navigation_round_trips() {
        let mut ctx = Context::default();
        for i in 0..12 {
            ctx.show_month(MonthIndex::new(i).unwrap());
            ctx.go_to_next_month();
            ctx.go_to_previous_month();
            assert_eq!(ctx.current_month().index(), i);
            ctx.go_to_previous_month();
            ctx.go_to_next_month();
            assert_eq!(ctx.current_month().index(), i);
        }
    }

    #[test]
    fn navigation_wraps() {
        let mut ctx = Context::default();
        ctx.go_to_previous_month();
        assert_eq!(ctx.current_month(), MonthIndex::DECEMBER);
        ctx.go_to_next_month();
        assert_eq!(ctx.current_month(), MonthIndex::JANUARY);

        for _ in 0..12 {
            ctx.go_to_next_month();
        }
        assert_eq!(ctx.current_month(), MonthIndex::JANUARY);
    }

    #[test]
    fn holiday_selection_shows_detail() {
        let mut ctx = Context::default();
        ctx.select_date(date("2024-01-01"));
        assert_eq!(ctx.detail(), Some("নববর্ষ"));

        ctx.select_date(date("2024-01-02"));
        assert_eq!(ctx.selected_date(), Some(&date("2024-01-02")));
        assert_eq!(ctx.detail(), None);
    }

    #[test]
    fn second_selection_replaces_first() {
        let mut ctx = Context::default();
        ctx.select_date(date("2024-02-21"));
        ctx.select_date(date("2024-03-26"));

        assert_eq!(ctx.detail(), Some("স্বাধীনতা দিবস"));
        assert_eq!(ctx.month_grid().days().filter(|d| d.selected).count(), 0);

        ctx.show_month(MonthIndex::new(2).unwrap());
        let grid = ctx.month_grid();
        assert_eq!(grid.days().filter(|d| d.selected).count(), 1);
        assert!(grid.day(26).unwrap().selected);
    }

    #[test]
    fn selecting_same_date_twice_keeps_it() {
        let mut ctx = Context::default();
        ctx.select_date(date("2024-01-01"));
        ctx.select_date(date("2024-01-01"));
        assert_eq!(ctx.detail(), Some("নববর্ষ"));
    }

    #[test]
    fn select_date_str_checks_year() {
        let mut ctx = Context::default();
        ctx.select_date_str("2024-08-15").unwrap();
        assert_eq!(ctx.current_month().number_from_month(), 8);
        assert_eq!(ctx.focus_day(), 15);
        assert_eq!(ctx.detail(), Some("জাতীয় শোক দিবস"));

        let err = ctx.select_date_str("2023-08-15").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::DateOutOfRange));
        let err = ctx.select_date_str("2024-13-01").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::DateParse));
        assert_eq!(ctx.selected_date(), Some(&date("2024-08-15")));
    }

    #[test]
    fn focus_is_clamped_to_month() {
        let mut ctx = Context::default();
        ctx.move_focus_by(-7);
        assert_eq!(ctx.focus_day(), 1);
        ctx.move_focus_by(30);
        assert_eq!(ctx.focus_day(), 31);

        ctx.go_to_next_month();
        assert_eq!(ctx.focus_day(), 29);
        ctx.select_focused_day();
        assert_eq!(ctx.selected_date(), Some(&date("2024-02-29")));
    }

    #[test]
    fn focused_date_is_a_grid_cell() {
        let mut ctx = Context::default();
        ctx.show_month(MonthIndex::new(2).unwrap());
        ctx.move_focus_by(9);

        let focused = ctx.focused_date();
        assert_eq!(focused, date("2024-03-10"));
        let grid = ctx.month_grid();
        let cells: Vec<_> = grid.days().filter(|d| d.date == focused).collect();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].day_num as u32, ctx.focus_day());
    }

    #[test]
    fn mount_finishes_loading_after_delay() {
        let (tx, rx) = mpsc::channel();
        let config = Config {
            loading_delay: 20,
            ..Config::default()
        };
        let mut ctx = Context::mount(&config, tx);
        assert!(ctx.is_loading());

        match rx.recv_timeout(Duration::from_secs(5)) {
            Ok(Event::LoadingFinished) => ctx.finish_loading(),
            _ => panic!("expected the loading timer to fire"),
        }
        assert!(!ctx.is_loading());

        let grid = ctx.month_grid();
        assert_eq!(grid.month, MonthIndex::JANUARY);
        assert_eq!(grid.blank_count(), 1);
        assert_eq!(grid.days().count(), 31);
        assert!(grid.day(1).unwrap().is_holiday());

        // later timer events have no effect
        ctx.finish_loading();
        assert!(!ctx.is_loading());
    }

    #[test]
    fn teardown_before_delay_cancels_loading() {
        let (tx, rx) = mpsc::channel();
        let config = Config {
            loading_delay: 200,
            ..Config::default()
        };
        let ctx = Context::mount(&config, tx.clone());
        drop(ctx);

        assert!(rx.recv_timeout(Duration::from_millis(400)).is_err());
    }

    #[test]
    fn spinner_only_advances_while_loading() {
        let mut ctx = Context::default();
        ctx.update();
        ctx.update();
        assert_eq!(ctx.spinner_frame(), 2);
        ctx.finish_loading();
        ctx.update();
        assert_eq!(ctx.spinner_frame(), 2);
    }
}
