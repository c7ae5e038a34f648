// SPDX-License-Identifier: Apache-2.0
//! Argument parsing and the command surface. Checking logic lives in `contractmap-core`.

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand, ValueEnum};

pub(crate) mod dispatch;

pub(crate) fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            return code;
        }
    };
    crate::logging::init_tracing(cli.log_json);
    dispatch::run_cli(cli)
}

#[derive(Parser, Debug)]
#[command(name = "contractmap", version, disable_help_subcommand = true)]
#[command(about = "Verify a contract map against the source tree it describes")]
pub struct Cli {
    #[arg(long, value_enum, default_value_t = FormatArg::Text, global = true)]
    pub format: FormatArg,
    #[arg(long = "no-color", default_value_t = false, global = true)]
    pub no_color: bool,
    #[arg(long = "log-json", default_value_t = false, global = true)]
    pub log_json: bool,
    #[arg(long, default_value_t = false, global = true)]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check every node, edge, flow and invariant, or query one node's impact.
    Verify {
        /// Contract map file or a directory holding exactly one. Defaults to the working directory.
        file: Option<PathBuf>,
        #[arg(long, value_name = "NODE_ID")]
        impact: Option<String>,
        /// Directory `loc` paths resolve against. Defaults to the contract map's directory.
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}
