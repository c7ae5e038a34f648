// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::io::{self, IsTerminal, Write};

use crate::cli::{Cli, Command, FormatArg};
use crate::commands::{run_verify, VerifyOptions};

/// `NO_COLOR`, `--no-color`, JSON output and non-terminal stdout all disable color.
pub(crate) fn color_enabled(format: FormatArg, no_color: bool, stdout_is_terminal: bool) -> bool {
    format == FormatArg::Text
        && !no_color
        && env::var_os("NO_COLOR").is_none()
        && stdout_is_terminal
}

pub(crate) fn run_cli(cli: Cli) -> i32 {
    let color = color_enabled(cli.format, cli.no_color, io::stdout().is_terminal());
    match cli.command {
        Command::Verify { file, impact, root } => {
            let options = VerifyOptions {
                file,
                impact,
                root,
                format: cli.format,
                color,
                quiet: cli.quiet,
            };
            match run_verify(&options) {
                Ok((rendered, code)) => {
                    if !rendered.is_empty() {
                        let _ = writeln!(io::stdout(), "{rendered}");
                    }
                    code
                }
                Err(err) => {
                    let _ = writeln!(io::stderr(), "contractmap verify failed: {err}");
                    1
                }
            }
        }
    }
}
