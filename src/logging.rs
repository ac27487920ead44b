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
use anyhow::Context;
use anyhow::Result;
use std::env;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Env var naming a file that receives diagnostics instead of stderr.
pub const TRACE_FILE_ENV: &str = "CPLAUNCH_TRACE_FILE";

/// Sets up the global tracing subscriber for diagnostics.
///
/// Reads the `CPLAUNCH_TRACE_FILE` env var.
/// - If set, logs to that file.
/// - If not set, logs to stderr.
///
/// Log level is controlled by the `RUST_LOG` env var and defaults to `warn`
/// so the child's own output stays readable.
///
/// This is separate from the audit log, whose line format is fixed. The
/// returned guard must be kept alive until the process exits, or buffered
/// file output is lost.
pub fn setup_tracing() -> Result<Option<WorkerGuard>> {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

  match env::var(TRACE_FILE_ENV) {
    Ok(trace_file) if !trace_file.is_empty() => {
      let path = Path::new(&trace_file);
      let file_name = path
        .file_name()
        .with_context(|| format!("{} has no file name: {}", TRACE_FILE_ENV, trace_file))?;
      let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
      };

      let file_appender = tracing_appender::rolling::never(dir, file_name);
      let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

      tracing_subscriber::registry()
        .with(env_filter)
        .with(
          fmt::layer()
            .with_writer(non_blocking_writer)
            .with_ansi(false),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

      Ok(Some(guard))
    }
    _ => {
      tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("Failed to install tracing subscriber")?;

      Ok(None)
    }
  }
}
