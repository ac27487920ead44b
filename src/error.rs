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
use std::path::PathBuf;
use thiserror::Error;

/// Exit status for infrastructure failures (log file, shell, configuration).
pub const EXIT_FAILURE: i32 = 1;
/// Exit status when fewer than the required tokens are given.
pub const EXIT_INVALID_ARGUMENTS: i32 = 2;
/// Exit status when the interpreter token is not the accepted interpreter.
pub const EXIT_UNSUPPORTED_EXECUTABLE: i32 = 4;
/// Exit status when the trailing source file cannot be opened for reading.
pub const EXIT_UNREADABLE_SOURCE: i32 = 8;

/// Top-level error enum for the cplaunch library.
///
/// A child process that exits unsuccessfully is not an error: its status is
/// passed through untouched. Everything here stops the run before or around
/// the launch.
#[derive(Error, Debug)]
pub enum LaunchError {
  #[error("invalid arguments: expected `<interpreter> [args...] <source-file>`, got {found} token(s)")]
  InvalidArguments { found: usize },

  #[error("unsupported executable '{found}': only {expected} programs can be launched")]
  UnsupportedExecutable { expected: String, found: String },

  #[error("source file '{path}' is not readable")]
  UnreadableSource {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to open log file {path}")]
  LogOpen {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to write log file {path}")]
  LogWrite {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to reset log file {path}")]
  LogReset {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("cannot locate the default log file: {var} is not set")]
  HomeNotSet { var: &'static str },

  #[error("failed to spawn shell '{shell}'")]
  Spawn {
    shell: &'static str,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to wait for the post-run prompt")]
  Prompt(#[source] std::io::Error),

  #[error("configuration error")]
  Config(#[source] Box<figment::Error>),
}

impl LaunchError {
  /// The process exit status this error terminates the launcher with.
  pub fn exit_code(&self) -> i32 {
    match self {
      LaunchError::InvalidArguments { .. } => EXIT_INVALID_ARGUMENTS,
      LaunchError::UnsupportedExecutable { .. } => EXIT_UNSUPPORTED_EXECUTABLE,
      LaunchError::UnreadableSource { .. } => EXIT_UNREADABLE_SOURCE,
      _ => EXIT_FAILURE,
    }
  }
}

impl From<figment::Error> for LaunchError {
  fn from(err: figment::Error) -> Self {
    LaunchError::Config(Box::new(err))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn usage_errors_map_to_fixed_codes() {
    let err = LaunchError::InvalidArguments { found: 1 };
    assert_eq!(err.exit_code(), 2);

    let err = LaunchError::UnsupportedExecutable {
      expected: "python".into(),
      found: "node".into(),
    };
    assert_eq!(err.exit_code(), 4);

    let err = LaunchError::UnreadableSource {
      path: PathBuf::from("missing.py"),
      source: std::io::Error::from(std::io::ErrorKind::NotFound),
    };
    assert_eq!(err.exit_code(), 8);
  }

  #[test]
  fn infrastructure_errors_are_fatal() {
    let err = LaunchError::LogOpen {
      path: PathBuf::from("/nowhere/cp.log"),
      source: std::io::Error::from(std::io::ErrorKind::NotFound),
    };
    assert_eq!(err.exit_code(), EXIT_FAILURE);
    assert_eq!(LaunchError::HomeNotSet { var: "HOME" }.exit_code(), 1);
  }
}
