use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use zcalc::calculator::{CalcMode, Calculator, copy_to_clipboard, evaluate_expression};
use zcalc::config::Settings;
use zcalc::keys::parse_keys;

/// Width of the text display; longer lines are shown as they are.
const DISPLAY_WIDTH: usize = 24;

#[derive(Parser, Debug)]
#[command(name = "zcalc", version, about = "A keyboard-driven calculator")]
struct Cli {
    /// Calculator mode: standard, programming or scientific (overrides the saved default)
    #[arg(short, long)]
    mode: Option<CalcMode>,

    /// Settings file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the display as JSON after every line
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a whole expression and print the result
    Eval {
        /// Expression such as "2(3+4)**2"
        expression: String,
    },
    /// Print the effective settings
    Settings,
    /// Change one setting and save it
    Set {
        /// appearance, default_mode, on_top or opacity
        key: String,
        value: String,
    },
}

enum Flow {
    Continue,
    Quit,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Command::Eval { expression }) => eval(&expression, cli.json),
        Some(Command::Settings) => {
            let settings = Settings::load_or_create(&settings_path(cli.config.as_deref())?)?;
            print!("{}", toml::to_string_pretty(&settings)?);
            Ok(())
        }
        Some(Command::Set { key, value }) => {
            let path = settings_path(cli.config.as_deref())?;
            let mut settings = Settings::load_or_create(&path)?;
            settings.set(&key, &value)?;
            settings.save(&path)?;
            info!(%key, %value, "setting saved");
            Ok(())
        }
        None => {
            let settings = Settings::load_or_create(&settings_path(cli.config.as_deref())?)?;
            repl(cli.mode.unwrap_or(settings.default_mode), cli.json)
        }
    }
}

/// The `--config` path if given, else the per-user default.
fn settings_path(config: Option<&Path>) -> Result<PathBuf> {
    match config {
        Some(path) => Ok(path.to_path_buf()),
        None => Settings::default_path(),
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "zcalc=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn eval(expression: &str, json: bool) -> Result<()> {
    let result = evaluate_expression(expression)
        .with_context(|| format!("Could not evaluate '{expression}'"))?;

    if json {
        let value = serde_json::json!({
            "expression": result.expression,
            "result": result.display_result,
        });
        println!("{value}");
    } else {
        println!("{}", result.display_result);
    }
    Ok(())
}

/// Read key lines from stdin and print the display after each one.
fn repl(mode: CalcMode, json: bool) -> Result<()> {
    let mut calc = Calculator::new(mode);
    let mut stdout = io::stdout().lock();
    info!(%mode, "calculator ready");

    print_display(&mut stdout, &calc, json)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read input")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix(':') {
            match run_command(&mut calc, command) {
                Flow::Quit => break,
                Flow::Continue => continue,
            }
        }

        match parse_keys(line) {
            Ok(events) => {
                for event in events {
                    if let Err(err) = calc.handle(event)
                        && err.is_user_visible()
                    {
                        warn!("{err}");
                    }
                }
            }
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        }

        print_display(&mut stdout, &calc, json)?;
    }

    Ok(())
}

fn run_command(calc: &mut Calculator, command: &str) -> Flow {
    let mut parts = command.split_whitespace();

    match (parts.next(), parts.next()) {
        (Some("q" | "quit"), _) => return Flow::Quit,
        (Some("mode"), None) => println!("{}", calc.mode()),
        (Some("mode"), Some(name)) => match name.parse::<CalcMode>() {
            Ok(mode) => calc.set_mode(mode),
            Err(err) => eprintln!("{err}"),
        },
        (Some("copy"), _) => {
            if let Err(err) = copy_to_clipboard(&calc.display().input) {
                warn!("{err:#}");
            }
        }
        _ => eprintln!("Unknown command ':{command}' (try :mode, :copy or :quit)"),
    }

    Flow::Continue
}

fn print_display(out: &mut impl Write, calc: &Calculator, json: bool) -> Result<()> {
    let display = calc.display();

    if json {
        writeln!(out, "{}", serde_json::to_string(display)?)?;
    } else {
        writeln!(out, "{:>DISPLAY_WIDTH$}", display.operation)?;
        writeln!(out, "{:>DISPLAY_WIDTH$}", display.input)?;
    }
    out.flush()?;
    Ok(())
}
