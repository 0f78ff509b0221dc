//! These structs provide the CLI interface for the spendlog CLI.

use crate::model::{Amount, Granularity, ReferencePeriod};
use crate::render::Format;
use crate::Result;
use anyhow::Context;
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// spendlog: A personal spending journal for the command line.
///
/// Record your expenses, organize them into categories, and see where the money goes with
/// daily, weekly, monthly or all-time spending reports. Everything is stored as JSON in your
/// spendlog home directory, on top of a small bundled sample dataset.
#[derive(Debug, Parser, Clone)]
#[command(version)]
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
    /// Create the spendlog home directory and its configuration file.
    ///
    /// By default the home directory is $HOME/spendlog. Pass --spendlog-home or set SPENDLOG_HOME
    /// to put it somewhere else.
    Init,
    /// Record a new expense.
    Add(AddArgs),
    /// Delete one or more of your recorded expenses by ID.
    Delete(DeleteArgs),
    /// List every expense in the journal.
    List(ListArgs),
    /// Add or list categories.
    Category(CategoryArgs),
    /// Show spending over time, bucketed by day, week or month.
    Chart(ChartArgs),
    /// Show spending totals and the breakdown by category.
    Summary(SummaryArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where spendlog data and configuration is held. Defaults to ~/spendlog
    #[arg(long, env = "SPENDLOG_HOME", default_value_t = default_spendlog_home())]
    spendlog_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, spendlog_home: PathBuf) -> Self {
        Self {
            log_level,
            spendlog_home: spendlog_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn spendlog_home(&self) -> &DisplayPath {
        &self.spendlog_home
    }
}

/// Args for the `spendlog add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The category of the expense. It must already exist.
    #[arg(long)]
    pub category: String,

    /// The amount spent, e.g. 120.50. A leading currency symbol and commas are accepted.
    #[arg(long)]
    pub amount: Amount,

    /// The date of the expense as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// A short note about the expense.
    #[arg(long)]
    pub description: Option<String>,
}

/// Args for the `spendlog delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The IDs of the records to delete. Either all of them are deleted or none are.
    #[arg(required = true)]
    ids: Vec<u64>,
}

impl DeleteArgs {
    pub fn new(ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn ids(&self) -> &[u64] {
        &self.ids
    }
}

/// Args for the `spendlog list` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ListArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t)]
    pub format: Format,
}

/// Args for the `spendlog category` command.
#[derive(Debug, Parser, Clone)]
pub struct CategoryArgs {
    #[command(subcommand)]
    action: CategorySubcommand,
}

impl CategoryArgs {
    pub fn new(action: CategorySubcommand) -> Self {
        Self { action }
    }

    pub fn action(&self) -> &CategorySubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum CategorySubcommand {
    /// Add a custom category. Names must be unique.
    Add {
        /// The name of the new category.
        name: String,
    },
    /// List all categories, sorted by name.
    List(ListArgs),
}

/// The time scope shared by `chart` and `summary`.
#[derive(Debug, Parser, Clone, Default)]
pub struct PeriodArgs {
    /// How to bucket spending over time.
    #[arg(long, value_enum, default_value_t)]
    pub by: Granularity,

    /// The month to report on, 1-12. Defaults to the current month.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// The year to report on. Defaults to the current year.
    #[arg(long)]
    pub year: Option<i32>,
}

impl PeriodArgs {
    pub fn new(by: Granularity, month: Option<u32>, year: Option<i32>) -> Self {
        Self { by, month, year }
    }

    /// Resolves `--month` and `--year` against `today`.
    pub fn reference(&self, today: NaiveDate) -> Result<ReferencePeriod> {
        let month = self.month.unwrap_or_else(|| today.month());
        let year = self.year.unwrap_or_else(|| today.year());
        month
            .checked_sub(1)
            .and_then(|month0| ReferencePeriod::new(month0, year))
            .with_context(|| format!("{month}/{year} is not a valid month"))
    }
}

/// Args for the `spendlog chart` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ChartArgs {
    #[clap(flatten)]
    pub period: PeriodArgs,

    /// Break each bucket down by category instead of showing a single total.
    #[arg(long)]
    pub group: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t)]
    pub format: Format,
}

/// Args for the `spendlog summary` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct SummaryArgs {
    #[clap(flatten)]
    pub period: PeriodArgs,

    /// Output format.
    #[arg(long, value_enum, default_value_t)]
    pub format: Format,
}

fn default_spendlog_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("spendlog"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --spendlog-home or SPENDLOG_HOME instead of relying on the \
                default spendlog home directory.",
            );
            PathBuf::from("spendlog")
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

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
