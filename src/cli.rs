// Copyright 2025 Chisomo Makombo Sakala
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use crate::command::RedirectKind;
use crate::config::LogMode;
use crate::config::PauseMode;
use clap::Parser;
use clap::ValueEnum;
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
  name = "cplaunch",
  version,
  about = "Runs an interpreter on a source file, times it and keeps an audit log",
  after_help = "Launcher options must come before the interpreter. Everything from the interpreter onwards is passed to the shell as given, bytes included.\n\nLauncher options are parsed before anything runs. An invalid option value exits with status 2, and -h/--help or -V/--version in first position print and exit with status 0. Neither case writes to the audit log."
)]
pub struct Cli {
  /// Interpreter the launcher accepts (default: python).
  #[arg(long, value_name = "NAME")]
  pub interpreter: Option<String>,

  /// Require the interpreter token to equal the accepted name instead of
  /// only starting with it.
  #[arg(long)]
  pub exact_interpreter: bool,

  /// Audit log location (default: ~/.atom/packages/atom-python-run/bin/cp.log).
  #[arg(long, value_name = "PATH")]
  pub log_path: Option<PathBuf>,

  /// Keep appending to the audit log or start it afresh on every run.
  #[arg(long, value_enum)]
  pub log_mode: Option<LogMode>,

  /// Wait for the user after the child exits.
  #[arg(long, value_enum)]
  pub pause: Option<PauseMode>,

  /// Redirect the child's output to this file.
  #[arg(short = 'p', long, value_name = "FILE")]
  pub pipe_to_file: Option<String>,

  /// Redirection used with --pipe-to-file. Quote it on the command line.
  #[arg(long, value_enum, requires = "pipe_to_file")]
  pub pipe_symbol: Option<PipeSymbol>,

  /// `<interpreter> [interpreter-args...] <source-file>`
  #[arg(
    trailing_var_arg = true,
    allow_hyphen_values = true,
    value_name = "COMMAND",
    value_parser = clap::value_parser!(OsString)
  )]
  pub command: Vec<OsString>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PipeSymbol {
  /// Truncate on stdout.
  #[value(name = ">")]
  Truncate,
  /// Append on stdout.
  #[value(name = ">>")]
  Append,
  /// Truncate on stdout and stderr (`&` is a synonym).
  #[value(name = "&>", alias = "&")]
  Both,
}

impl From<PipeSymbol> for RedirectKind {
  fn from(symbol: PipeSymbol) -> Self {
    match symbol {
      PipeSymbol::Truncate => RedirectKind::Truncate,
      PipeSymbol::Append => RedirectKind::Append,
      PipeSymbol::Both => RedirectKind::Both,
    }
  }
}
