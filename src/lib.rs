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

//! # cplaunch
//!
//! `cplaunch` runs an interpreter (by default `python`) on a source file
//! through the platform shell, times the run, keeps a plain-text audit log of
//! every invocation and exits with the child's own status.
//!
//! The binary is a thin wrapper; the pieces are usable on their own.
//!
//! ## Core Modules
//!
//! * [`launcher`]: [`launcher::Launcher`] ties everything together: validate,
//!   log, compose, execute, report, pause.
//! * [`command`]: argument validation and the composed shell command line.
//! * [`process`]: runs the command line through `sh -c` or `cmd /C` and
//!   measures it.
//! * [`audit`]: the append-only audit log.
//! * [`platform`]: the per-OS profile (shell, home variable, pause style).
//! * [`prompt`]: the post-run pause.
//! * [`config`]: `Settings` layered from defaults, `CPLAUNCH_*` env vars and
//!   flags.
//! * [`cli`]: the `clap`-based command-line interface.
//! * [`error`]: the error type and exit codes.
//! * [`logging`]: provides the `setup_tracing` utility.

pub mod audit;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod launcher;
pub mod logging;
pub mod platform;
pub mod process;
pub mod prompt;
