//! These structs provide the CLI interface for the expense-sheet CLI.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// expense-sheet: Validates household expenses and appends them to a Google sheet.
///
/// Each submission is a JSON object with `date` (DD-MM-YYYY), `description`, `category`, `amount`
/// and `account`. Valid expenses become one new row in the configured worksheet. Invalid ones are
/// rejected with a list of the offending fields.
///
/// Google access uses a service account. Share the spreadsheet with the service account's email
/// address and point `--credentials` at its downloaded JSON key.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write a new configuration file.
    ///
    /// - Get the URL of your Google Sheet and pass it as --sheet-url.
    ///
    /// - Pass the name of the tab that expenses go to as --worksheet.
    ///
    /// - Optionally pass the service account key as --credentials. By default it is expected as
    ///   credentials.json next to the configuration file.
    Init(InitArgs),
    /// Run an HTTP server that accepts expenses as POST requests.
    Serve(ServeArgs),
    /// Submit one expense and print the JSON response.
    Submit(PayloadArgs),
    /// Validate one expense without writing it and print the resulting row.
    Validate(PayloadArgs),
    /// List the categories that expenses may use.
    Categories,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The configuration file. Defaults to ~/.expense-sheet/config.json
    #[arg(long, env = "EXPENSE_SHEET_CONFIG", default_value_t = default_config_path())]
    config: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, config: PathBuf) -> Self {
        Self {
            log_level,
            config: config.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn config(&self) -> &DisplayPath {
        &self.config
    }
}

/// (Not shown): Args for the `expense-sheet init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The URL to your Google sheet. It looks like this:
    /// https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX
    #[arg(long)]
    sheet_url: String,

    /// The name of the worksheet (tab) that expenses are appended to.
    #[arg(long)]
    worksheet: String,

    /// The path to the service account JSON key.
    #[arg(long)]
    credentials: Option<PathBuf>,
}

impl InitArgs {
    pub fn new(
        sheet_url: impl Into<String>,
        worksheet: impl Into<String>,
        credentials: Option<PathBuf>,
    ) -> Self {
        Self {
            sheet_url: sheet_url.into(),
            worksheet: worksheet.into(),
            credentials,
        }
    }

    pub fn sheet_url(&self) -> &str {
        &self.sheet_url
    }

    pub fn worksheet(&self) -> &str {
        &self.worksheet
    }

    pub fn credentials(&self) -> Option<&Path> {
        self.credentials.as_deref()
    }
}

/// (Not shown): Args for the `expense-sheet serve` command.
#[derive(Debug, Parser, Clone)]
pub struct ServeArgs {
    /// The address to listen on. Overrides `listen` in the configuration file.
    #[arg(long)]
    listen: Option<SocketAddr>,
}

impl ServeArgs {
    pub fn new(listen: Option<SocketAddr>) -> Self {
        Self { listen }
    }

    pub fn listen(&self) -> Option<SocketAddr> {
        self.listen
    }
}

/// Where to read an expense payload from. Standard input is read when neither option is given.
#[derive(Debug, ClapArgs, Clone, Default)]
pub struct PayloadArgs {
    /// The payload as a JSON string.
    #[arg(long, conflicts_with = "file")]
    payload: Option<String>,

    /// A file holding the JSON payload.
    #[arg(long)]
    file: Option<PathBuf>,
}

impl PayloadArgs {
    pub fn new(payload: Option<String>, file: Option<PathBuf>) -> Self {
        Self { payload, file }
    }

    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}

fn default_config_path() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join(".expense-sheet").join("config.json"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --config or EXPENSE_SHEET_CONFIG instead of relying on the \
                default configuration path.",
            );
            PathBuf::from("config.json")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let args = Args::try_parse_from([
            "expense-sheet",
            "--config",
            "/tmp/expenses/config.json",
            "serve",
            "--listen",
            "0.0.0.0:9000",
        ])
        .unwrap();
        assert_eq!(
            args.common().config().path(),
            Path::new("/tmp/expenses/config.json")
        );
        match args.command() {
            Command::Serve(serve) => {
                assert_eq!(serve.listen(), Some("0.0.0.0:9000".parse().unwrap()))
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_submit_payload() {
        let args = Args::try_parse_from([
            "expense-sheet",
            "--log-level",
            "debug",
            "submit",
            "--payload",
            "{}",
        ])
        .unwrap();
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
        match args.command() {
            Command::Submit(payload) => {
                assert_eq!(payload.payload(), Some("{}"));
                assert!(payload.file().is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_payload_and_file_conflict() {
        let result = Args::try_parse_from([
            "expense-sheet",
            "validate",
            "--payload",
            "{}",
            "--file",
            "expense.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_init() {
        let args = Args::try_parse_from([
            "expense-sheet",
            "init",
            "--sheet-url",
            "https://docs.google.com/spreadsheets/d/abc123",
            "--worksheet",
            "Gastos",
        ])
        .unwrap();
        match args.command() {
            Command::Init(init) => {
                assert_eq!(init.worksheet(), "Gastos");
                assert!(init.credentials().is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
