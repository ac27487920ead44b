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
use crate::platform::PauseStyle;
use crate::platform::Platform;
use std::io::IsTerminal;
use std::io::Write;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::process::Command;

/// True when a person is plausibly sitting at the console.
pub fn is_interactive() -> bool {
  std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

/// Asks the user to acknowledge the end of the run, the way the platform
/// expects it.
pub async fn pause(platform: &Platform) -> Result<(), LaunchError> {
  match platform.pause_style() {
    PauseStyle::ShellPause => {
      let (shell, flag) = platform.shell();
      Command::new(shell)
        .arg(flag)
        .arg("pause")
        .status()
        .await
        .map_err(LaunchError::Prompt)?;
    }
    PauseStyle::Notice(message) => {
      notice(message, &mut std::io::stdout().lock());
    }
    PauseStyle::WaitForEnter(message) => {
      let stdin = BufReader::new(tokio::io::stdin());
      wait_for_enter(message, stdin, &mut std::io::stdout()).await?;
    }
  }
  Ok(())
}

/// Writes `message` without waiting. Nothing waits on it, so a console that
/// can no longer be written to is ignored.
pub fn notice<W: Write>(message: &str, output: &mut W) {
  let _ = writeln!(output, "{}", message).and_then(|_| output.flush());
}

/// Writes `message` and waits for one line (or end of input) on `input`.
pub async fn wait_for_enter<R, W>(message: &str, mut input: R, output: &mut W) -> Result<(), LaunchError>
where
  R: AsyncBufRead + Unpin,
  W: Write,
{
  write!(output, "{}", message).map_err(LaunchError::Prompt)?;
  output.flush().map_err(LaunchError::Prompt)?;

  let mut line = String::new();
  input.read_line(&mut line).await.map_err(LaunchError::Prompt)?;
  Ok(())
}
