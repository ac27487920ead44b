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
use crate::cli::Cli;
use crate::command::InterpreterMatch;
use crate::command::Redirect;
use crate::command::RedirectKind;
use crate::error::LaunchError;
use crate::platform::Platform;
use clap::ValueEnum;
use figment::Figment;
use figment::providers::Env;
use figment::providers::Serialized;
use serde::Deserialize;
use serde::Serialize;
use std::ffi::OsString;
use std::path::PathBuf;

/// Prefix of the environment variables that override [`Settings`].
pub const ENV_PREFIX: &str = "CPLAUNCH_";

/// What happens to the audit log at the start of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
  #[default]
  Append,
  /// Remove the previous log first.
  Truncate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PauseMode {
  /// Pause only when both stdin and stdout are terminals.
  #[default]
  Auto,
  Always,
  Never,
}

impl PauseMode {
  pub fn should_pause(self, interactive: bool) -> bool {
    match self {
      PauseMode::Auto => interactive,
      PauseMode::Always => true,
      PauseMode::Never => false,
    }
  }
}

/// Resolved launcher settings.
///
/// Layered with figment: compiled-in defaults, then `CPLAUNCH_*` environment
/// variables, then command-line flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
  pub interpreter: String,
  pub interpreter_match: InterpreterMatch,
  /// `None` means the platform default under the home directory.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub log_path: Option<PathBuf>,
  pub log_mode: LogMode,
  pub pause: PauseMode,
}

impl Default for Settings {
  fn default() -> Self {
    Settings {
      interpreter: "python".to_string(),
      interpreter_match: InterpreterMatch::default(),
      log_path: None,
      log_mode: LogMode::default(),
      pause: PauseMode::default(),
    }
  }
}

/// The subset of [`Cli`] that overrides [`Settings`]. Unset flags are skipped
/// so they don't shadow the environment.
#[derive(Debug, Default, Serialize)]
struct CliOverrides {
  #[serde(skip_serializing_if = "Option::is_none")]
  interpreter: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  interpreter_match: Option<InterpreterMatch>,
  #[serde(skip_serializing_if = "Option::is_none")]
  log_path: Option<PathBuf>,
  #[serde(skip_serializing_if = "Option::is_none")]
  log_mode: Option<LogMode>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pause: Option<PauseMode>,
}

impl From<&Cli> for CliOverrides {
  fn from(cli: &Cli) -> Self {
    CliOverrides {
      interpreter: cli.interpreter.clone(),
      interpreter_match: cli.exact_interpreter.then_some(InterpreterMatch::Exact),
      log_path: cli.log_path.clone(),
      log_mode: cli.log_mode,
      pause: cli.pause,
    }
  }
}

impl Settings {
  /// Defaults merged with the environment.
  pub fn figment() -> Figment {
    Figment::from(Serialized::defaults(Settings::default())).merge(Env::prefixed(ENV_PREFIX))
  }

  pub fn load(cli: &Cli) -> Result<Settings, LaunchError> {
    let settings = Self::figment()
      .merge(Serialized::defaults(CliOverrides::from(cli)))
      .extract()?;
    Ok(settings)
  }

  /// The audit log path: the configured one, or the platform default under
  /// the home directory named by `platform.home_var()`.
  pub fn resolve_log_path<F>(&self, platform: &Platform, lookup: F) -> Result<PathBuf, LaunchError>
  where
    F: Fn(&str) -> Option<OsString>,
  {
    if let Some(path) = &self.log_path {
      return Ok(path.clone());
    }

    let var = platform.home_var();
    match lookup(var) {
      Some(home) if !home.is_empty() => Ok(platform.default_log_path(&PathBuf::from(home))),
      _ => Err(LaunchError::HomeNotSet { var }),
    }
  }
}

/// The output redirection requested on the command line, if any.
pub fn redirect_from(cli: &Cli) -> Option<Redirect> {
  cli.pipe_to_file.as_ref().map(|file| Redirect {
    file: file.clone(),
    kind: cli.pipe_symbol.map(Into::into).unwrap_or(RedirectKind::Truncate),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::Parser;
  use figment::Jail;

  fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
  }

  #[test]
  fn defaults_without_env_or_flags() {
    Jail::expect_with(|_jail| {
      let settings = Settings::load(&cli(&["cplaunch"])).unwrap();
      assert_eq!(settings, Settings::default());
      Ok(())
    });
  }

  #[test]
  fn env_overrides_defaults() {
    Jail::expect_with(|jail| {
      jail.set_env("CPLAUNCH_INTERPRETER", "sh");
      jail.set_env("CPLAUNCH_INTERPRETER_MATCH", "exact");
      jail.set_env("CPLAUNCH_LOG_MODE", "truncate");
      jail.set_env("CPLAUNCH_PAUSE", "never");

      let settings = Settings::load(&cli(&["cplaunch"])).unwrap();
      assert_eq!(settings.interpreter, "sh");
      assert_eq!(settings.interpreter_match, InterpreterMatch::Exact);
      assert_eq!(settings.log_mode, LogMode::Truncate);
      assert_eq!(settings.pause, PauseMode::Never);
      Ok(())
    });
  }

  #[test]
  fn flags_override_env() {
    Jail::expect_with(|jail| {
      jail.set_env("CPLAUNCH_INTERPRETER", "sh");
      jail.set_env("CPLAUNCH_LOG_PATH", "/tmp/from-env.log");

      let settings = Settings::load(&cli(&[
        "cplaunch",
        "--interpreter",
        "python",
        "--log-path",
        "/tmp/from-flag.log",
      ]))
      .unwrap();
      assert_eq!(settings.interpreter, "python");
      assert_eq!(settings.log_path, Some(PathBuf::from("/tmp/from-flag.log")));
      Ok(())
    });
  }

  #[test]
  fn bad_env_value_is_a_config_error() {
    Jail::expect_with(|jail| {
      jail.set_env("CPLAUNCH_PAUSE", "sometimes");
      let err = Settings::load(&cli(&["cplaunch"])).unwrap_err();
      assert!(matches!(err, LaunchError::Config(_)));
      Ok(())
    });
  }

  #[test]
  fn log_path_falls_back_to_home() {
    let settings = Settings::default();
    let linux = Platform::from_os("linux");

    let path = settings
      .resolve_log_path(&linux, |var| (var == "HOME").then(|| OsString::from("/home/me")))
      .unwrap();
    assert_eq!(
      path,
      PathBuf::from("/home/me/.atom/packages/atom-python-run/bin/cp.log")
    );

    let err = settings.resolve_log_path(&linux, |_| None).unwrap_err();
    assert!(matches!(err, LaunchError::HomeNotSet { var: "HOME" }));
  }

  #[test]
  fn pause_mode_decision() {
    assert!(PauseMode::Auto.should_pause(true));
    assert!(!PauseMode::Auto.should_pause(false));
    assert!(PauseMode::Always.should_pause(false));
    assert!(!PauseMode::Never.should_pause(true));
  }

  #[test]
  fn redirect_defaults_to_truncate() {
    let redirect = redirect_from(&cli(&["cplaunch", "-p", "out.log", "python", "x.py"])).unwrap();
    assert_eq!(redirect.kind, RedirectKind::Truncate);
    assert!(redirect_from(&cli(&["cplaunch", "python", "x.py"])).is_none());
  }
}
