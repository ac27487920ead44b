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
use clap::Parser;
use cplaunch::audit::AuditLog;
use cplaunch::cli::Cli;
use cplaunch::config::Settings;
use cplaunch::config::redirect_from;
use cplaunch::error::EXIT_FAILURE;
use cplaunch::error::LaunchError;
use cplaunch::launcher::Launcher;
use cplaunch::logging::setup_tracing;
use cplaunch::platform::Platform;
use cplaunch::prompt::is_interactive;
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
  let cli = Cli::parse();

  let guard = match setup_tracing() {
    Ok(guard) => guard,
    Err(err) => {
      eprintln!("Error: {:#}", err);
      process::exit(EXIT_FAILURE);
    }
  };

  let code = match launch(cli).await {
    Ok(code) => code,
    Err(err) => {
      let code = err.exit_code();
      eprintln!("Error: {:#}", anyhow::Error::new(err));
      code
    }
  };

  drop(guard);
  process::exit(code);
}

async fn launch(cli: Cli) -> Result<i32, LaunchError> {
  let platform = Platform::detect();
  let settings = Settings::load(&cli)?;
  let log_path = settings.resolve_log_path(&platform, |var| std::env::var_os(var))?;
  tracing::debug!(?settings, log = %log_path.display(), "Resolved settings");

  let program = std::env::args_os()
    .next()
    .unwrap_or_else(|| "cplaunch".into());
  let mut tokens = vec![program];
  tokens.extend(cli.command.iter().cloned());

  Launcher::new(settings, platform, AuditLog::new(log_path))
    .with_redirect(redirect_from(&cli))
    .interactive(is_interactive())
    .run(tokens)
    .await
}
