use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, CommandFactory, Parser, ValueEnum};
use param_census::{InspectConfig, KeyFilter, MIN_DOCUMENTS, ParseErrorPolicy, RowPolicy};
use strum::Display;

use crate::logging::init_logger;
use crate::{print_err, print_info, print_warn};

const LONG_ABOUT: &str = "\
Checks which parameters differ across experiment configs and which values they take.
Prints every varying parameter with the number of experiments using each value, so the
composition of an experiment batch can be reviewed.

The tool does not check whether a setting is actually used by a given run: a tuning
parameter of an algorithm still shows up as varying when that algorithm is not selected.";

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = LONG_ABOUT)]
pub struct CliArgs {
    /// Relative or absolute path to the folder containing the experiment configs.
    #[clap(short = 'f', long = "folder", required = true)]
    pub folder: PathBuf,
    /// File extensions to read, without the dot
    #[clap(
        short = 'e',
        long = "extension",
        value_delimiter = ',',
        default_value = "yaml"
    )]
    pub extensions: Vec<String>,
    /// How to handle a config whose top level is a list of records
    #[clap(long = "rows", value_enum, default_value_t = RowsArg::First)]
    pub rows: RowsArg,
    /// Abort on the first config that cannot be read instead of skipping it
    #[clap(long)]
    pub strict: bool,
    /// Also ignore keys starting with this prefix
    #[clap(long = "ignore-prefix")]
    pub ignore_prefixes: Vec<String>,
    /// Also ignore keys containing this text (case-insensitive)
    #[clap(long = "ignore-substring")]
    pub ignore_substrings: Vec<String>,
    /// Do not ignore metrics, maps and paths
    #[clap(long)]
    pub no_default_ignores: bool,
    /// Print more diagnostics (repeat for more)
    #[clap(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "snake_case")]
pub enum RowsArg {
    /// Only the first record is examined
    First,
    /// Every record counts as an experiment
    All,
    /// Configs with several records are skipped as invalid
    Reject,
}

impl From<RowsArg> for RowPolicy {
    fn from(value: RowsArg) -> Self {
        match value {
            RowsArg::First => RowPolicy::First,
            RowsArg::All => RowPolicy::All,
            RowsArg::Reject => RowPolicy::Reject,
        }
    }
}

impl CliArgs {
    pub fn inspect_config(&self) -> InspectConfig {
        let base = if self.no_default_ignores {
            KeyFilter::empty()
        } else {
            KeyFilter::default()
        };
        let key_filter = self
            .ignore_prefixes
            .iter()
            .fold(base, |filter, prefix| filter.with_prefix(prefix.as_str()));
        let key_filter = self
            .ignore_substrings
            .iter()
            .fold(key_filter, |filter, text| filter.with_substring(text.as_str()));

        InspectConfig {
            extensions: self.extensions.clone(),
            key_filter,
            row_policy: self.rows.into(),
            on_parse_error: if self.strict {
                ParseErrorPolicy::Abort
            } else {
                ParseErrorPolicy::Skip
            },
        }
    }
}

pub fn cli_main() -> ExitCode {
    main_with_args(std::env::args_os())
}

fn main_with_args<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.len() <= 1 {
        let _ = CliArgs::command().write_long_help(&mut io::stderr());
        return ExitCode::FAILURE;
    }

    let args = CliArgs::parse_from(args);
    init_logger(args.verbose);

    match run(&args, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_err!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Inspects the folder named in `args` and writes the report to `out`.
pub fn run(args: &CliArgs, out: &mut impl Write) -> anyhow::Result<()> {
    print_info!("Checking {}.", args.folder.display());

    let config = args.inspect_config();
    log::debug!(
        "Extensions: {:?}, rows: {}, on parse error: {}",
        config.extensions,
        config.row_policy,
        config.on_parse_error
    );
    let inspection = param_census::inspect(&args.folder, &config)?;

    print_info!(
        "Total number of experiments: {}",
        inspection.documents().len()
    );
    for skipped in inspection.skipped() {
        print_warn!("Skipped: {}", skipped.error);
    }
    if inspection.tally().observations() < MIN_DOCUMENTS {
        print_warn!(
            "Only {} experiment(s) could be tallied, no variation can be detected.",
            inspection.tally().observations()
        );
    }

    write!(out, "{}", inspection.varying())?;
    out.flush()?;
    Ok(())
}
