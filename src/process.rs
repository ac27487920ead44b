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
use crate::command::CommandLine;
use crate::error::LaunchError;
use crate::platform::Platform;
use std::io;
use std::io::Write;
use std::process::ExitStatus;
use std::process::Stdio;
use std::time::Duration;
use std::time::Instant;
use tokio::process::Command;

/// Outcome of running the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Execution {
  /// The shell's exit status, passed through as is.
  pub code: i32,
  pub elapsed: Duration,
}

impl Execution {
  pub fn seconds(&self) -> f64 {
    self.elapsed.as_secs_f64()
  }

  /// The console summary printed after the child exits.
  pub fn report(&self) -> String {
    format!(
      "\nProcess returned {} (0x{:X})\texecution time : {:.3} s\n",
      self.code,
      self.code,
      self.seconds()
    )
  }

  /// Writes and flushes the report. A closed or full console is reported
  /// back to the caller rather than panicking like `print!` would.
  pub fn write_report<W: Write>(&self, out: &mut W) -> io::Result<()> {
    out.write_all(self.report().as_bytes())?;
    out.flush()
  }
}

/// Builds `sh -c <line>` or `cmd /C <line>` with inherited stdio.
pub fn shell_command(platform: &Platform, line: &CommandLine) -> Command {
  let (shell, flag) = platform.shell();
  let mut cmd = Command::new(shell);
  cmd.arg(flag);

  // cmd.exe does its own parsing; quoting the line again would break it.
  #[cfg(windows)]
  cmd.raw_arg(line.as_os_str());
  #[cfg(not(windows))]
  cmd.arg(line.as_os_str());

  cmd
    .stdin(Stdio::inherit())
    .stdout(Stdio::inherit())
    .stderr(Stdio::inherit());
  cmd
}

/// Runs the command line through the platform shell and waits for it.
pub async fn execute(platform: &Platform, line: &CommandLine) -> Result<Execution, LaunchError> {
  let mut cmd = shell_command(platform, line);
  tracing::debug!(cmd = ?cmd, "Spawning shell");

  let start = Instant::now();
  let status = cmd.status().await.map_err(|source| LaunchError::Spawn {
    shell: platform.shell().0,
    source,
  })?;
  let elapsed = start.elapsed();

  let code = exit_code(status);
  tracing::debug!(code, ?elapsed, "Shell exited");
  Ok(Execution { code, elapsed })
}

fn exit_code(status: ExitStatus) -> i32 {
  match status.code() {
    Some(code) => code,
    None => terminated_by_signal(status),
  }
}

#[cfg(unix)]
fn terminated_by_signal(status: ExitStatus) -> i32 {
  use std::os::unix::process::ExitStatusExt;
  match status.signal() {
    Some(signal) => 128 + signal,
    None => -1,
  }
}

#[cfg(not(unix))]
fn terminated_by_signal(_status: ExitStatus) -> i32 {
  -1
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn report_matches_the_console_format() {
    let execution = Execution {
      code: 3,
      elapsed: Duration::from_millis(1500),
    };
    assert_eq!(
      execution.report(),
      "\nProcess returned 3 (0x3)\texecution time : 1.500 s\n"
    );
  }

  #[test]
  fn report_prints_hex_in_upper_case() {
    let execution = Execution {
      code: 255,
      elapsed: Duration::ZERO,
    };
    assert!(execution.report().contains("Process returned 255 (0xFF)"));
  }

  struct ClosedConsole;

  impl Write for ClosedConsole {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
      Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
      Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }
  }

  #[test]
  fn write_report_surfaces_a_closed_console() {
    let execution = Execution {
      code: 3,
      elapsed: Duration::ZERO,
    };
    let err = execution.write_report(&mut ClosedConsole).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

    let mut buffer = Vec::new();
    execution.write_report(&mut buffer).unwrap();
    assert_eq!(buffer, execution.report().into_bytes());
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn passes_the_exit_status_through() {
    let platform = Platform::from_os("linux");
    let line = CommandLine::compose(&["cplaunch".into(), "exit".into(), "7".into()]);

    let execution = execute(&platform, &line).await.unwrap();
    assert_eq!(execution.code, 7);
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn signal_deaths_use_the_shell_convention() {
    let platform = Platform::from_os("linux");
    let line = CommandLine::compose(&["cplaunch".into(), "kill -9 $$".into()]);

    let execution = execute(&platform, &line).await.unwrap();
    assert_eq!(execution.code, 128 + 9);
  }
}
