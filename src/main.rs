//! Purpose: `quickmenu` CLI entry point.
//! Role: Binary crate root; parses args, runs commands, emits JSON on stdout.
//! Invariants: Stdout carries exactly one JSON document per successful command.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
//! Invariants: All menu mutations go through `api::LocalStore` (validation + locking).
#![allow(clippy::result_large_err)]
use std::error::Error as StdError;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind,
};
use clap_complete::aot::Shell;
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;

mod command_dispatch;

use quickmenu::api::{Error, ErrorKind, default_menu_dir, to_exit_code};
use quickmenu::notice::{Notice, notice_json};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse_from(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(clap_error_summary(&err))
                        .with_hint("Run `quickmenu <command> --help` for usage."),
                    ColorMode::Auto,
                ));
            }
        },
    };

    let menu_dir = cli.dir.unwrap_or_else(default_menu_dir);
    let color_mode = cli.color;

    command_dispatch::dispatch_command(cli.command, menu_dir, cli.vendor, color_mode)
        .map_err(add_decode_hint)
        .map_err(add_io_hint)
        .map_err(|err| (err, color_mode))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Parser)]
#[command(
    name = "quickmenu",
    version,
    about = "Edit a stall menu and share it as one QR-scannable URL",
    long_about = None,
    before_help = r#"The whole menu travels inside the URL, so customers need no backend to view it.

Mental model:
  - `add` / `update` / `remove` edit the stored menu
  - `encode` packs it into a `#/view?m=...` link for a QR code
  - `decode` reads any such link back (old formats included)
"#,
    after_help = r#"EXAMPLES
  $ quickmenu init
  $ quickmenu stall --name "Joe's" --wait 5
  $ quickmenu add --name Dosa --price 50 --category Breakfast
  $ quickmenu encode --base-url https://menu.example/
  $ quickmenu decode 'https://menu.example/#/view?m=...'"#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "Menu directory (default: ~/.quickmenu/menus)",
        value_hint = ValueHint::DirPath
    )]
    dir: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        default_value = "default",
        help = "Vendor id whose menu is read or edited"
    )]
    vendor: String,
    #[arg(
        long,
        global = true,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics: auto|always|never"
    )]
    color: ColorMode,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Create the vendor's menu with default stall settings")]
    Init,
    #[command(about = "Print the stored menu document")]
    Show,
    #[command(about = "List vendor ids that have a stored menu")]
    Vendors,
    #[command(about = "Save stall name and wait time")]
    Stall {
        #[arg(long, help = "Stall name shown above the menu")]
        name: String,
        #[arg(long, help = "Wait time in minutes (default: keep the stored value)")]
        wait: Option<u64>,
    },
    #[command(
        about = "Add a menu item",
        after_help = r#"NOTES
  - Categories: Breakfast, Main Course, Appetizers, Drinks, Desserts, Snacks, Other
  - Items are veg and available unless --non-veg / --sold-out is given"#
    )]
    Add {
        #[arg(long, help = "Item name (max 50 characters)")]
        name: String,
        #[arg(long, help = "Price, up to 2 decimal places")]
        price: String,
        #[arg(long, help = "Short description (max 100 characters)")]
        description: Option<String>,
        #[arg(long, help = "Menu category (default: Other)")]
        category: Option<String>,
        #[arg(long, help = "Mark the item as non-vegetarian")]
        non_veg: bool,
        #[arg(long, help = "Mark the item as sold out")]
        sold_out: bool,
    },
    #[command(about = "Change fields of an existing item")]
    Update {
        #[arg(help = "Item id")]
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, conflicts_with = "non_veg")]
        veg: bool,
        #[arg(long)]
        non_veg: bool,
        #[arg(long, conflicts_with = "sold_out")]
        available: bool,
        #[arg(long)]
        sold_out: bool,
    },
    #[command(about = "Remove an item by id or exact name")]
    Remove {
        #[arg(help = "Item id or exact name")]
        item: String,
    },
    #[command(
        about = "Encode the menu into a QR-ready link",
        after_help = r#"NOTES
  - Without --base-url only the `#/view?m=...` fragment is printed
  - A notice is written to stderr when the link exceeds QR capacity"#
    )]
    Encode {
        #[arg(long, help = "Viewer URL the fragment is appended to")]
        base_url: Option<String>,
    },
    #[command(about = "Decode a menu link or fragment")]
    Decode {
        #[arg(help = "Full URL or `#...` fragment")]
        input: String,
    },
    #[command(about = "Print a shell completion script")]
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, Error> {
    serde_json::to_value(value).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to encode output")
            .with_source(err)
    })
}

fn emit_json(value: Value) {
    let json = serde_json::to_string_pretty(&value)
        .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

fn emit_notice(notice: &Notice, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        let label = colorize_label("notice:", color_mode.use_color(is_tty), AnsiColor::Yellow);
        eprintln!("{label} {} (vendor: {})", notice.message, notice.vendor);
        return;
    }

    let json = serde_json::to_string(&notice_json(notice)).unwrap_or_else(|_| {
        "{\"notice\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let json = serde_json::to_string(&error_json(err)).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn add_decode_hint(err: Error) -> Error {
    if err.kind() != ErrorKind::Decode || err.hint().is_some() {
        return err;
    }
    err.with_hint("The menu could not be loaded. Rescan the QR code or contact the vendor.")
}

fn add_io_hint(err: Error) -> Error {
    if err.hint().is_some() {
        return err;
    }
    match err.kind() {
        ErrorKind::Permission => err.with_hint("Check permissions on the menu directory (--dir)."),
        ErrorKind::Busy => err.with_hint("Another quickmenu process holds the menu lock; retry."),
        ErrorKind::Corrupt => {
            err.with_hint("The menu file is damaged; restore it or remove it and run `init`.")
        }
        _ => err,
    }
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::NotFound => "not found".to_string(),
        ErrorKind::AlreadyExists => "already exists".to_string(),
        ErrorKind::Invalid => "invalid input".to_string(),
        ErrorKind::Encoding => "failed to encode menu".to_string(),
        ErrorKind::Decode => "failed to decode menu".to_string(),
        ErrorKind::Busy => "resource is busy".to_string(),
        ErrorKind::Permission => "permission denied".to_string(),
        ErrorKind::Corrupt => "corrupt data".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(field) = err.field() {
        inner.insert("field".to_string(), json!(field));
    }
    if let Some(stage) = err.stage() {
        inner.insert("stage".to_string(), json!(stage.as_str()));
    }
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    ));
    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(field) = err.field() {
        lines.push(format!(
            "{} {field}",
            colorize_label("field:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(path) = err.path() {
        lines.push(format!(
            "{} {}",
            colorize_label("path:", use_color, AnsiColor::Yellow),
            path.display()
        ));
    }
    if let Some(cause) = error_causes(err).first() {
        lines.push(format!(
            "{} {cause}",
            colorize_label("caused by:", use_color, AnsiColor::Yellow)
        ));
    }
    lines.join("\n")
}

#[derive(Copy, Clone)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, use_color: bool, color: AnsiColor) -> String {
    if !use_color {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}
