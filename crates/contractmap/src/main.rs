// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod cli;
#[path = "commands/verify.rs"]
mod commands;
mod logging;

fn main() {
    std::process::exit(cli::run());
}
