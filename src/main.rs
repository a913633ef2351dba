mod app;
mod editor;
mod grid;
mod help;
mod logging;
mod model;
mod panel;
mod presets;
mod print;
mod prompt;
mod theme;
use crate::app::App;
use crate::editor::{
    add_habit, parse_date_input, select_preset, set_date_range, set_field, DateRange, Field,
};
use crate::grid::GridView;
use crate::model::{Configuration, Theme, UnknownNameError};
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::path::PathBuf;

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        config: Configuration,
        output: Option<Output>,
    },
    Help,
    Version,
}

/// Where to send the sheet instead of opening the editor
#[derive(Clone, Debug, Eq, PartialEq)]
enum Output {
    Html(PathBuf),
    Text,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut config = Configuration::default();
        let mut output = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('n') | Arg::Long("name") => {
                    let name = parser.value()?.string()?;
                    config = set_field(&config, Field::ChildName(name));
                }
                Arg::Long("start") => {
                    let date = parser.value()?.parse_with(parse_date)?;
                    config = set_field(&config, Field::StartDate(Some(date)));
                }
                Arg::Long("end") => {
                    let date = parser.value()?.parse_with(parse_date)?;
                    config = set_field(&config, Field::EndDate(Some(date)));
                }
                Arg::Short('r') | Arg::Long("range") => {
                    let range = parser.value()?.parse::<DateRange>()?;
                    config = set_date_range(&config, range);
                }
                Arg::Short('p') | Arg::Long("preset") => {
                    let preset = parser.value()?.parse_with(|s| {
                        presets::find(s).ok_or_else(|| UnknownNameError::new("preset", s))
                    })?;
                    config = select_preset(&config, preset);
                }
                Arg::Long("habit") => {
                    let habit = parser.value()?.string()?;
                    config = add_habit(&config, &habit);
                }
                Arg::Long("reward") => {
                    let reward = parser.value()?.string()?;
                    config = set_field(&config, Field::Reward(reward));
                }
                Arg::Long("note") => {
                    let note = parser.value()?.string()?;
                    config = set_field(&config, Field::Note(note));
                }
                Arg::Short('t') | Arg::Long("theme") => {
                    let theme = parser.value()?.parse::<Theme>()?;
                    config = set_field(&config, Field::Theme(theme));
                }
                Arg::Short('o') | Arg::Long("html") => {
                    output = Some(Output::Html(PathBuf::from(parser.value()?)));
                }
                Arg::Long("text") => output = Some(Output::Text),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run { config, output })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run { config, output } => {
                if let Err(e) = logging::init_logging() {
                    eprintln!("habitgrid: logging disabled: {e:#}");
                }
                match output {
                    None => with_terminal(|mut terminal| {
                        terminal.hide_cursor().context("failed to hide cursor")?;
                        App::new(config)
                            .run(&mut terminal)
                            .context("error running terminal UI")?;
                        Ok(())
                    }),
                    Some(Output::Html(path)) => {
                        print::write_html(&path, &GridView::render(&config))
                    }
                    Some(Output::Text) => {
                        print!("{}", print::plain_text(&GridView::render(&config)));
                        Ok(())
                    }
                }
            }
            Command::Help => {
                println!("Usage: habitgrid [OPTIONS]");
                println!();
                println!("Design a printable holiday habit-tracking sheet");
                println!();
                println!("Options:");
                println!("  -n, --name NAME          Child's name, shown in the title");
                println!("      --start YYYY-MM-DD   First day on the sheet");
                println!("      --end YYYY-MM-DD     Last day on the sheet");
                println!("  -r, --range RANGE        Use a fixed range: standard, pre-holiday,");
                println!("                           or post-holiday");
                println!("  -p, --preset ID          Replace the habits with a preset: academic,");
                println!("                           health, balanced, or custom");
                println!("      --habit TEXT         Append a habit (may be given repeatedly)");
                println!("      --reward TEXT        Reward promised for finishing");
                println!("      --note TEXT          Note from the parents");
                println!("  -t, --theme THEME        monochrome or colorful");
                println!("  -o, --html FILE          Write the sheet as HTML to FILE and exit");
                println!("      --text               Print the sheet as plain text and exit");
                println!("  -h, --help               Display this help message and exit");
                println!("  -V, --version            Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn parse_date(s: &str) -> Result<time::Date, &'static str> {
    parse_date_input(s).ok_or("expected a date in YYYY-MM-DD format")
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
