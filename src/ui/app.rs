use std::fmt::Write;
use std::sync::mpsc;

use crate::config::Config;
use crate::events::{Dispatcher, Event};

use super::{CommandParser, Context, DetailPanel, LoadingScreen, Mode, MonthPane, PageHeader};

use unsegen::base::{Cursor, Terminal, Window};
use unsegen::input::{
    EditBehavior, Input, Key, Navigatable, NavigateBehavior, OperationResult, ScrollBehavior,
    Scrollable,
};
use unsegen::widget::*;

/// Parts of the page, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Section {
    Loading,
    Header,
    Month,
    Detail,
    BottomBar,
}

pub struct App {
    context: Context,
}

impl App {
    /// Mounts the calendar page. The page stays in its loading state until
    /// the loading timer posts to `sink`.
    pub fn new(config: &Config, sink: mpsc::Sender<Event>) -> App {
        App {
            context: Context::mount(config, sink),
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    fn bottom_bar<'w>(&'w self) -> impl Widget + 'w {
        let mut layout = HLayout::new();
        if let Some(sink) = self.context.input_sink(self.context.mode) {
            layout = layout.widget(sink.as_widget());
        } else {
            layout = layout.widget(StatusLine(&self.context));
        }

        layout
    }

    /// The loading screen replaces the whole page until loading finished.
    pub fn sections(&self) -> Vec<Section> {
        if self.context.is_loading() {
            return vec![Section::Loading];
        }

        let mut sections = vec![Section::Header, Section::Month];
        if self.context.detail().is_some() {
            sections.push(Section::Detail);
        }
        sections.push(Section::BottomBar);
        sections
    }

    fn as_widget<'w>(&'w self) -> impl Widget + 'w {
        let mut layout = VLayout::new();

        for section in self.sections() {
            layout = match section {
                Section::Loading => layout.widget(LoadingScreen::new(&self.context)),
                Section::Header => layout.widget(PageHeader::new(&self.context)),
                Section::Month => layout.widget(MonthPane::new(&self.context)),
                Section::Detail => match (self.context.selected_date(), self.context.detail()) {
                    (Some(date), Some(label)) => {
                        layout.widget(DetailPanel::new(*date, label, &self.context.theme))
                    }
                    _ => layout,
                },
                Section::BottomBar => layout.widget(self.bottom_bar()),
            };
        }

        layout
    }

    pub fn handle(&mut self, event: Event) {
        match event {
            Event::Update => self.context.update(),
            Event::LoadingFinished => self.context.finish_loading(),
            Event::Input(input) => self.handle_input(input),
        }
    }

    fn handle_input(&mut self, input: Input) {
        if input.matches(Key::Esc) {
            self.context.mode = Mode::Normal;
            return;
        }

        // Only leaving the page is possible while loading
        if self.context.is_loading() {
            let _leftover = input
                .chain((Key::Char('q'), || self.context.quit = true))
                .finish();
            return;
        }

        match self.context.mode {
            Mode::Normal => {
                let _leftover = input
                    .chain((Key::Char('q'), || self.context.quit = true))
                    .chain((Key::Char(':'), || self.context.mode = Mode::Command))
                    .chain((Key::Char('\n'), || self.context.select_focused_day()))
                    .chain((Key::Char('n'), || self.context.go_to_next_month()))
                    .chain((Key::Char('p'), || self.context.go_to_previous_month()))
                    .chain(
                        NavigateBehavior::new(&mut FocusBehaviour(&mut self.context))
                            .down_on(Key::Char('j'))
                            .up_on(Key::Char('k'))
                            .left_on(Key::Char('h'))
                            .right_on(Key::Char('l')),
                    )
                    .chain(
                        ScrollBehavior::new(&mut MonthBehaviour(&mut self.context))
                            .forwards_on(Key::Char(']'))
                            .backwards_on(Key::Char('[')),
                    )
                    .finish();
            }
            Mode::Command => {
                let _leftover = input
                    .chain(
                        EditBehavior::new(self.context.input_sink_mut())
                            .delete_forwards_on(Key::Delete)
                            .delete_backwards_on(Key::Backspace)
                            .left_on(Key::Left)
                            .right_on(Key::Right),
                    )
                    .chain(
                        ScrollBehavior::new(self.context.input_sink_mut())
                            .backwards_on(Key::Up)
                            .forwards_on(Key::Down),
                    )
                    .chain(CommandParser::new(&mut self.context))
                    .finish();
            }
        }
    }

    pub fn run(
        &mut self,
        dispatcher: Dispatcher,
        mut term: Terminal,
    ) -> Result<(), Box<dyn std::error::Error>> {
        while !self.context.quit {
            let root = term.create_root_window();
            self.as_widget().draw(root, RenderingHints::new());
            term.present();

            let event = dispatcher.next()?;
            self.handle(event);
        }

        log::debug!("Leaving calendar page");
        Ok(())
    }
}

/// Last command error, or a short key reference.
struct StatusLine<'a>(&'a Context);

impl Widget for StatusLine<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(1),
            height: RowDemand::exact(1),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let mut cursor = Cursor::new(&mut window);

        let res = if let Some(msg) = &self.0.last_error_message {
            cursor.set_style_modifier(self.0.theme.error_style);
            write!(&mut cursor, "{}", msg)
        } else {
            write!(
                &mut cursor,
                "[/]: month  hjkl: move  enter: select  :: command  q: back"
            )
        };

        if let Err(err) = res {
            log::warn!("Error while writing status line: {}", err);
        }
    }
}

struct FocusBehaviour<'a>(&'a mut Context);

impl Navigatable for FocusBehaviour<'_> {
    fn move_down(&mut self) -> OperationResult {
        self.0.move_focus_by(7);
        Ok(())
    }

    fn move_left(&mut self) -> OperationResult {
        self.0.move_focus_by(-1);
        Ok(())
    }

    fn move_right(&mut self) -> OperationResult {
        self.0.move_focus_by(1);
        Ok(())
    }

    fn move_up(&mut self) -> OperationResult {
        self.0.move_focus_by(-7);
        Ok(())
    }
}

struct MonthBehaviour<'a>(&'a mut Context);

impl Scrollable for MonthBehaviour<'_> {
    fn scroll_backwards(&mut self) -> OperationResult {
        self.0.go_to_previous_month();
        Ok(())
    }

    fn scroll_forwards(&mut self) -> OperationResult {
        self.0.go_to_next_month();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn key(c: char) -> Event {
        Event::Input(Input {
            event: unsegen::input::Event::Key(Key::Char(c)),
            raw: Vec::new(),
        })
    }

    fn loaded_app() -> App {
        let (tx, _rx) = mpsc::channel();
        let config = Config {
            loading_delay: 60_000,
            ..Config::default()
        };
        let mut app = App::new(&config, tx);
        app.handle(Event::LoadingFinished);
        app
    }

    #[test]
    fn starts_loading_and_finishes_on_timer() {
        let (tx, rx) = mpsc::channel();
        let config = Config {
            loading_delay: 10,
            ..Config::default()
        };
        let mut app = App::new(&config, tx);
        assert!(app.context().is_loading());

        app.handle(Event::Update);
        assert!(app.context().is_loading());

        let event = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("loading timer should fire");
        app.handle(event);
        assert!(!app.context().is_loading());
        assert_eq!(app.context().month_grid().days().count(), 31);
    }

    #[test]
    fn handled_loading_event_stops_timer() {
        let app = loaded_app();
        assert!(!app.context().is_loading());
        assert_eq!(app.context().current_month().index(), 0);
    }

    #[test]
    fn grid_hidden_while_loading() {
        let (tx, _rx) = mpsc::channel();
        let config = Config {
            loading_delay: 60_000,
            ..Config::default()
        };
        let mut app = App::new(&config, tx);
        assert_eq!(app.sections(), vec![Section::Loading]);

        // Navigation keys are ignored until loading finished
        app.handle(key(']'));
        app.handle(key('\n'));
        assert_eq!(app.sections(), vec![Section::Loading]);
        assert_eq!(app.context().current_month().index(), 0);
        assert!(app.context().selected_date().is_none());

        app.handle(Event::LoadingFinished);
        assert_eq!(
            app.sections(),
            vec![Section::Header, Section::Month, Section::BottomBar]
        );
    }

    #[test]
    fn detail_shown_for_selected_holiday() {
        let mut app = loaded_app();

        app.handle(key('\n'));
        assert_eq!(
            app.sections(),
            vec![
                Section::Header,
                Section::Month,
                Section::Detail,
                Section::BottomBar
            ]
        );

        app.handle(key('l'));
        app.handle(key('\n'));
        assert_eq!(
            app.sections(),
            vec![Section::Header, Section::Month, Section::BottomBar]
        );
    }
}
