mod app;
mod help;
mod host;
mod month;
mod panel;
mod theme;
mod year;
use crate::app::App;
use crate::host::Host;
use anyhow::Context;
use daymask::{DateEntry, DisabledPlugin, Opacity, StyleOptions};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(RunOptions),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct RunOptions {
    date: Option<Date>,
    disabled: Vec<DateEntry>,
    opacity: Opacity,
    log: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("opacity must be a percentage from 0 to 100")]
struct OpacityRangeError;

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = RunOptions::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('d') | Arg::Long("disable") => {
                    opts.disabled.push(parser.value()?.parse::<DateEntry>()?);
                }
                Arg::Short('o') | Arg::Long("opacity") => {
                    let value = parser.value()?.string()?;
                    let percent = value.parse::<u8>().map_err(|e| lexopt::Error::ParsingFailed {
                        value: value.clone(),
                        error: Box::new(e),
                    })?;
                    match Opacity::new(percent) {
                        Some(opacity) => opts.opacity = opacity,
                        None => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(OpacityRangeError),
                            })
                        }
                    }
                }
                Arg::Short('l') | Arg::Long("log") => {
                    opts.log = Some(parser.value()?.into());
                }
                Arg::Value(value) if opts.date.is_none() => {
                    let value = value.string()?;
                    match Date::parse(&value, &YMD_FMT) {
                        Ok(d) => opts.date = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                if let Some(path) = &opts.log {
                    init_logging(path)?;
                }
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                let plugin = DisabledPlugin::new(StyleOptions {
                    opacity: opts.opacity,
                    ..StyleOptions::default()
                });
                let mut app = App::new(Host::new(plugin), opts.date.unwrap_or(today));
                app.disable(opts.disabled);
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    app.run(&mut terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: daymask [options] [YYYY-MM-DD]");
                println!();
                println!("Terminal calendar for trying out a set of disabled dates");
                println!();
                println!("Options:");
                println!("  -d, --disable <ENTRY>  Disable a day (YYYY-MM-DD) or range");
                println!("                         (YYYY-MM-DD..YYYY-MM-DD); may be repeated");
                println!("  -o, --opacity <PCT>    Opacity of disabled days, 0-100 [default: 30]");
                println!("  -l, --log <FILE>       Write debug logs to FILE");
                println!("  -h, --help             Display this help message and exit");
                println!("  -V, --version          Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
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
