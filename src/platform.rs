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
//! The platform profile.
//!
//! Everything that differs between operating systems (the shell used to run
//! the command line, the home directory variable, the text of the post-run
//! prompt and the tag written to the audit log) is looked up on a [`Platform`]
//! value. It is chosen once at startup and handed down, so the rest of the
//! crate never branches on `cfg!` itself.
use std::path::Path;
use std::path::PathBuf;

/// The two shell worlds the launcher knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
  Posix,
  Windows,
}

/// How the launcher waits for the user once the child has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseStyle {
  /// Ask the platform shell to run its own `pause` builtin.
  ShellPause,
  /// Print the message and wait for a line on stdin.
  WaitForEnter(&'static str),
  /// Print the message and return immediately.
  Notice(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
  pub family: PlatformFamily,
  /// Tag written to the audit log (`win32`, `darwin`, `linux`, `unix`, `unknown`).
  pub os: &'static str,
}

impl Platform {
  /// Profile for the operating system this binary was compiled for.
  pub fn detect() -> Self {
    Self::from_os(std::env::consts::OS)
  }

  /// Maps a `std::env::consts::OS` value to a profile.
  pub fn from_os(os: &str) -> Self {
    let (family, tag) = match os {
      "windows" => (PlatformFamily::Windows, "win32"),
      "macos" => (PlatformFamily::Posix, "darwin"),
      "linux" => (PlatformFamily::Posix, "linux"),
      "freebsd" | "openbsd" | "netbsd" | "dragonfly" | "solaris" | "illumos" | "android"
      | "ios" => (PlatformFamily::Posix, "unix"),
      _ => (PlatformFamily::Posix, "unknown"),
    };
    Platform { family, os: tag }
  }

  /// Program and flag that run a single command line, e.g. `sh -c`.
  pub fn shell(&self) -> (&'static str, &'static str) {
    match self.family {
      PlatformFamily::Posix => ("sh", "-c"),
      PlatformFamily::Windows => ("cmd", "/C"),
    }
  }

  /// Environment variable holding the user's home directory.
  pub fn home_var(&self) -> &'static str {
    match self.family {
      PlatformFamily::Posix => "HOME",
      PlatformFamily::Windows => "USERPROFILE",
    }
  }

  /// Default audit log location under the given home directory.
  pub fn default_log_path(&self, home: &Path) -> PathBuf {
    home
      .join(".atom")
      .join("packages")
      .join("atom-python-run")
      .join("bin")
      .join("cp.log")
  }

  pub fn pause_style(&self) -> PauseStyle {
    match (self.family, self.os) {
      (PlatformFamily::Windows, _) => PauseStyle::ShellPause,
      // Terminal.app keeps the window open on its own.
      (PlatformFamily::Posix, "darwin") => PauseStyle::Notice("Close this window to continue..."),
      (PlatformFamily::Posix, _) => PauseStyle::WaitForEnter("Press [ENTER] to continue..."),
    }
  }
}
