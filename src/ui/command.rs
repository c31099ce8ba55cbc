use unsegen::input::*;

use nom::{
    character::complete::{alpha1, digit1, space1},
    combinator::{all_consuming, map_res, opt, rest},
    sequence::{preceded, tuple},
    IResult,
};

use super::context::{Context, Mode};
use crate::calendar::MonthIndex;
use crate::error::{Error, ErrorKind};

pub struct CommandParser<'a> {
    context: &'a mut Context,
}

pub type ActionResult = Result<(), Error>;

pub enum Action {
    Arg(fn(&mut Context, &str) -> ActionResult),
    NoArg(fn(&mut Context) -> ActionResult),
    Repeatable(fn(&mut Context, u32) -> ActionResult),
}

const COMMANDS: &[(&str, Action)] = &[
    (
        "next",
        Action::Repeatable(|c, n| {
            c.show_month(c.current_month() + n);
            Ok(())
        }),
    ),
    (
        "n",
        Action::Repeatable(|c, n| {
            c.show_month(c.current_month() + n);
            Ok(())
        }),
    ),
    (
        "prev",
        Action::Repeatable(|c, n| {
            c.show_month(c.current_month() - n);
            Ok(())
        }),
    ),
    (
        "p",
        Action::Repeatable(|c, n| {
            c.show_month(c.current_month() - n);
            Ok(())
        }),
    ),
    (
        "month",
        Action::Arg(|c, arg| {
            let number = arg
                .trim()
                .parse::<u32>()
                .map_err(|_| Error::new(ErrorKind::MonthOutOfRange, arg))?;
            c.show_month(MonthIndex::from_number(number)?);
            Ok(())
        }),
    ),
    ("select", Action::Arg(|c, arg| c.select_date_str(arg))),
    (
        "quit",
        Action::NoArg(|c| {
            c.quit = true;
            Ok(())
        }),
    ),
    (
        "q",
        Action::NoArg(|c| {
            c.quit = true;
            Ok(())
        }),
    ),
];

pub fn match_action(name: &str) -> Option<&'static Action> {
    COMMANDS
        .iter()
        .find(|(cmd, _)| *cmd == name)
        .map(|(_, act)| act)
}

/// Splits `3next`, `month 4` and the like into repeat count, name and
/// argument.
fn command_parts(input: &str) -> IResult<&str, (Option<u32>, &str, Option<&str>)> {
    all_consuming(tuple((
        opt(map_res(digit1, |digits: &str| digits.parse::<u32>())),
        alpha1,
        opt(preceded(space1, rest)),
    )))(input)
}

impl<'a> CommandParser<'a> {
    pub fn new(context: &'a mut Context) -> Self {
        CommandParser { context }
    }

    pub fn run_command(&mut self, cmd: &str) -> ActionResult {
        let (_, (repeat, name, arg)) = command_parts(cmd.trim())?;

        let act = match_action(name).ok_or_else(|| {
            Error::new(
                ErrorKind::CommandParse,
                &format!("unknown command '{}'", name),
            )
        })?;

        match (act, repeat, arg) {
            (Action::Repeatable(a), repeat, None) => a(self.context, repeat.unwrap_or(1)),
            (Action::Arg(a), None, Some(arg)) => a(self.context, arg),
            (Action::NoArg(a), None, None) => a(self.context),
            _ => Err(Error::new(
                ErrorKind::CommandParse,
                &format!("wrong arguments for '{}'", name),
            )),
        }
    }

    fn report_error(&mut self, error: Error) {
        log::info!("Command failed: {}", error);
        self.context.last_error_message = Some(format!("{}", error));
    }
}

impl Behavior for CommandParser<'_> {
    fn input(mut self, input: Input) -> Option<Input> {
        if let Event::Key(key) = input.event {
            match key {
                Key::Char('\n') => {
                    let cmd = self.context.input_sink_mut().finish_line().to_owned();
                    if let Err(e) = self.run_command(&cmd) {
                        self.report_error(e);
                    } else {
                        self.context.last_error_message = None;
                        self.context.mode = Mode::Normal;
                    }
                    None
                }
                _ => Some(input),
            }
        } else {
            Some(input)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn run(ctx: &mut Context, cmd: &str) -> ActionResult {
        CommandParser::new(ctx).run_command(cmd)
    }

    #[test]
    fn parts() {
        assert_eq!(command_parts("next"), Ok(("", (None, "next", None))));
        assert_eq!(command_parts("3p"), Ok(("", (Some(3), "p", None))));
        assert_eq!(
            command_parts("select 2024-01-01"),
            Ok(("", (None, "select", Some("2024-01-01"))))
        );
        assert!(command_parts("").is_err());
        assert!(command_parts("3").is_err());
    }

    #[test]
    fn month_navigation() {
        let mut ctx = Context::default();
        run(&mut ctx, "next").unwrap();
        assert_eq!(ctx.current_month().index(), 1);
        run(&mut ctx, "3prev").unwrap();
        assert_eq!(ctx.current_month(), MonthIndex::new(10).unwrap());
        run(&mut ctx, "12n").unwrap();
        assert_eq!(ctx.current_month(), MonthIndex::new(10).unwrap());
        run(&mut ctx, " month 4 ").unwrap();
        assert_eq!(ctx.current_month().number_from_month(), 4);
    }

    #[test]
    fn select_shows_month_and_detail() {
        let mut ctx = Context::default();
        run(&mut ctx, "select 2024-04-14").unwrap();

        assert_eq!(ctx.current_month().number_from_month(), 4);
        assert_eq!(
            ctx.selected_date(),
            NaiveDate::from_ymd_opt(2024, 4, 14).as_ref()
        );
        assert_eq!(ctx.detail(), Some("বাংলা নববর্ষ"));
    }

    #[test]
    fn quit_sets_flag() {
        let mut ctx = Context::default();
        run(&mut ctx, "q").unwrap();
        assert!(ctx.quit);
    }

    #[test]
    fn errors() {
        let mut ctx = Context::default();

        let err = run(&mut ctx, "frobnicate").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::CommandParse));

        let err = run(&mut ctx, "month 13").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MonthOutOfRange));

        let err = run(&mut ctx, "month 0").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MonthOutOfRange));

        let err = run(&mut ctx, "select 2025-01-01").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::DateOutOfRange));

        let err = run(&mut ctx, "2select 2024-01-01").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::CommandParse));

        let err = run(&mut ctx, "quit now").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::CommandParse));

        assert_eq!(ctx.current_month(), MonthIndex::JANUARY);
        assert_eq!(ctx.selected_date(), None);
        assert!(!ctx.quit);
    }
}
