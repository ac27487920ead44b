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
use crate::error::LaunchError;
use std::ffi::OsStr;
use std::ffi::OsString;
use std::fs;
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

/// The human readable audit trail of a launch.
///
/// Every call opens the file in append mode, writes one line and closes it
/// again. Nothing is buffered between calls and nothing is locked, so two
/// launchers running at the same time may interleave their lines.
#[derive(Debug, Clone)]
pub struct AuditLog {
  path: PathBuf,
}

impl AuditLog {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    AuditLog { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Removes the previous run's log. A missing file is not an error.
  pub fn reset(&self) -> Result<(), LaunchError> {
    match fs::remove_file(&self.path) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
      Err(source) => Err(LaunchError::LogReset {
        path: self.path.clone(),
        source,
      }),
    }
  }

  /// Appends a single line.
  pub fn line(&self, text: &str) -> Result<(), LaunchError> {
    let mut file = OpenOptions::new()
      .create(true)
      .append(true)
      .open(&self.path)
      .map_err(|source| LaunchError::LogOpen {
        path: self.path.clone(),
        source,
      })?;

    writeln!(file, "{}", text).map_err(|source| LaunchError::LogWrite {
      path: self.path.clone(),
      source,
    })
  }

  pub fn version(&self, version: &str) -> Result<(), LaunchError> {
    self.line(&format!("Log: cp-executable version: {}", version))
  }

  pub fn system_type(&self, os: &str) -> Result<(), LaunchError> {
    self.line(&format!("Log: system type: {}", os))
  }

  /// Tokens that are not valid UTF-8 are written with replacement characters.
  pub fn arg_tokens(&self, tokens: &[OsString]) -> Result<(), LaunchError> {
    for (index, token) in tokens.iter().enumerate() {
      self.line(&format!("Log: argv[{}]: '{}'", index, token.to_string_lossy()))?;
    }
    Ok(())
  }

  pub fn exe_type(&self, interpreter: &str) -> Result<(), LaunchError> {
    self.line(&format!("Error: exe type: {} programs only =p", interpreter))
  }

  pub fn file_read(&self, file: &OsStr) -> Result<(), LaunchError> {
    self.line(&format!(
      "Error: file: '{}' is not readable.",
      file.to_string_lossy()
    ))
  }

  pub fn file_path(&self, file: &OsStr) -> Result<(), LaunchError> {
    self.line(&format!(
      "Log: file path and name: '{}'",
      file.to_string_lossy()
    ))
  }

  pub fn cmd(&self, command_line: &str) -> Result<(), LaunchError> {
    self.line(&format!("Log: cmd: '{}'", command_line))
  }

  pub fn exit(&self, code: i32, seconds: f64) -> Result<(), LaunchError> {
    self.line(&format!(
      "Log: exit code: {}, execution time: {:.3} s",
      code, seconds
    ))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn appends_one_line_per_call() {
    let dir = tempdir().unwrap();
    let log = AuditLog::new(dir.path().join("cp.log"));

    log.system_type("linux").unwrap();
    log.cmd("python \"hello.py\"").unwrap();

    let content = fs::read_to_string(log.path()).unwrap();
    assert_eq!(
      content,
      "Log: system type: linux\nLog: cmd: 'python \"hello.py\"'\n"
    );
  }

  #[test]
  fn arg_tokens_are_indexed_from_zero() {
    let dir = tempdir().unwrap();
    let log = AuditLog::new(dir.path().join("cp.log"));
    let tokens = vec![OsString::from("cplaunch"), OsString::from("python")];

    log.arg_tokens(&tokens).unwrap();

    let content = fs::read_to_string(log.path()).unwrap();
    assert!(content.contains("Log: argv[0]: 'cplaunch'"));
    assert!(content.contains("Log: argv[1]: 'python'"));
  }

  #[test]
  fn reset_tolerates_a_missing_file() {
    let dir = tempdir().unwrap();
    let log = AuditLog::new(dir.path().join("cp.log"));
    log.reset().unwrap();

    log.line("first").unwrap();
    log.reset().unwrap();
    assert!(!log.path().exists());
  }

  #[test]
  fn missing_parent_directory_is_fatal() {
    let dir = tempdir().unwrap();
    let log = AuditLog::new(dir.path().join("missing").join("cp.log"));

    let err = log.line("never written").unwrap_err();
    assert!(matches!(err, LaunchError::LogOpen { .. }));
    assert_eq!(err.exit_code(), 1);
  }
}
