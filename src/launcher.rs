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
use crate::audit::AuditLog;
use crate::command::CommandLine;
use crate::command::Invocation;
use crate::command::Redirect;
use crate::config::LogMode;
use crate::config::Settings;
use crate::error::LaunchError;
use crate::platform::Platform;
use crate::process;
use crate::prompt;
use std::ffi::OsString;
use tracing::Instrument;

/// Validates, logs, composes and runs one interpreter invocation.
///
/// Every step runs in order on the calling task; the launcher never has more
/// than one child at a time.
#[derive(Debug)]
pub struct Launcher {
  settings: Settings,
  platform: Platform,
  log: AuditLog,
  redirect: Option<Redirect>,
  interactive: bool,
}

impl Launcher {
  pub fn new(settings: Settings, platform: Platform, log: AuditLog) -> Self {
    Launcher {
      settings,
      platform,
      log,
      redirect: None,
      interactive: false,
    }
  }

  pub fn with_redirect(mut self, redirect: Option<Redirect>) -> Self {
    self.redirect = redirect;
    self
  }

  /// Whether a user is at the console, consulted by [`crate::config::PauseMode::Auto`].
  pub fn interactive(mut self, interactive: bool) -> Self {
    self.interactive = interactive;
    self
  }

  /// Runs `tokens` (program name first) and returns the child's exit status.
  ///
  /// Validation failures are written to the audit log before being returned;
  /// no child is spawned for them. Audit log failures abort the run. Once the
  /// child has exited its status is returned even if the console is gone.
  pub async fn run(&self, tokens: Vec<OsString>) -> Result<i32, LaunchError> {
    let span = tracing::info_span!(
      "launch",
      interpreter = %self.settings.interpreter,
      log = %self.log.path().display()
    );

    async {
      if self.settings.log_mode == LogMode::Truncate {
        self.log.reset()?;
      }

      self.log.version(env!("CARGO_PKG_VERSION"))?;
      self.log.system_type(self.platform.os)?;
      self.log.arg_tokens(&tokens)?;

      let invocation = self.validate(tokens)?;
      let mut line = CommandLine::compose(invocation.tokens());
      if let Some(redirect) = &self.redirect {
        line = line.with_redirect(redirect);
      }
      self.log.cmd(&line.to_string_lossy())?;

      tracing::info!(cmd = %line, "Launching");
      let execution = process::execute(&self.platform, &line).await?;
      self.log.exit(execution.code, execution.seconds())?;

      if let Err(err) = execution.write_report(&mut std::io::stdout().lock()) {
        tracing::warn!(error = %err, "Failed to print the run summary");
      }

      if self.settings.pause.should_pause(self.interactive) {
        if let Err(err) = prompt::pause(&self.platform).await {
          tracing::warn!(error = %err, "Post-run prompt failed");
        }
      }

      Ok::<_, LaunchError>(execution.code)
    }
    .instrument(span)
    .await
  }

  fn validate(&self, tokens: Vec<OsString>) -> Result<Invocation, LaunchError> {
    let invocation = match Invocation::validate(
      tokens,
      &self.settings.interpreter,
      self.settings.interpreter_match,
    ) {
      Ok(invocation) => invocation,
      Err(err) => {
        if let LaunchError::UnsupportedExecutable { .. } = err {
          self.log.exe_type(&self.settings.interpreter)?;
        }
        tracing::debug!(error = %err, "Rejected invocation");
        return Err(err);
      }
    };

    if let Err(err) = invocation.check_source() {
      self.log.file_read(invocation.source())?;
      tracing::debug!(error = %err, "Rejected invocation");
      return Err(err);
    }
    self.log.file_path(invocation.source())?;

    Ok(invocation)
  }
}
