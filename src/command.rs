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
//! Argument validation and command-line composition.
//!
//! The readability check on the trailing source file opens and closes the
//! file once. Nothing stops the file from changing between that check and the
//! moment the interpreter opens it itself; the check only guarantees that the
//! launcher refuses obviously bad input before spawning anything.
use crate::error::LaunchError;
use serde::Deserialize;
use serde::Serialize;
use std::ffi::OsStr;
use std::ffi::OsString;
use std::fs::File;
use std::io;
use std::path::Path;

/// How the interpreter token is compared against the accepted interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpreterMatch {
  /// The token only has to start with the accepted name, so `python3` passes
  /// a `python` check. This also lets through unrelated programs sharing the
  /// prefix.
  #[default]
  Prefix,
  Exact,
}

impl InterpreterMatch {
  /// Compares raw bytes, so tokens that are not valid UTF-8 are still judged.
  pub fn accepts(self, expected: &str, token: &OsStr) -> bool {
    match self {
      InterpreterMatch::Prefix => token.as_encoded_bytes().starts_with(expected.as_bytes()),
      InterpreterMatch::Exact => token == OsStr::new(expected),
    }
  }
}

/// A validated argument list: program name, interpreter, interpreter
/// arguments and the trailing source file.
#[derive(Debug, Clone)]
pub struct Invocation {
  tokens: Vec<OsString>,
}

impl Invocation {
  /// Program name, interpreter and source file.
  pub const MIN_TOKENS: usize = 3;

  /// Checks arity and the interpreter name. The source file is checked
  /// separately by [`Invocation::check_source`] so the caller can log the
  /// tokens first.
  pub fn validate(
    tokens: Vec<OsString>,
    interpreter: &str,
    matching: InterpreterMatch,
  ) -> Result<Self, LaunchError> {
    if tokens.len() < Self::MIN_TOKENS {
      return Err(LaunchError::InvalidArguments {
        found: tokens.len(),
      });
    }

    if !matching.accepts(interpreter, &tokens[1]) {
      return Err(LaunchError::UnsupportedExecutable {
        expected: interpreter.to_string(),
        found: tokens[1].to_string_lossy().into_owned(),
      });
    }

    Ok(Invocation { tokens })
  }

  pub fn tokens(&self) -> &[OsString] {
    &self.tokens
  }

  pub fn interpreter(&self) -> &OsStr {
    &self.tokens[1]
  }

  pub fn source(&self) -> &OsStr {
    &self.tokens[self.tokens.len() - 1]
  }

  pub fn check_source(&self) -> Result<(), LaunchError> {
    let source = self.source();
    check_readable(Path::new(source)).map_err(|source_err| LaunchError::UnreadableSource {
      path: source.into(),
      source: source_err,
    })
  }
}

/// Opens `path` for reading and closes it again.
pub fn check_readable(path: &Path) -> io::Result<()> {
  let file = File::open(path)?;
  if file.metadata()?.is_dir() {
    return Err(io::Error::from(io::ErrorKind::IsADirectory));
  }
  Ok(())
}

pub fn is_readable_file(path: &Path) -> bool {
  check_readable(path).is_ok()
}

/// Where the child's output goes when redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
  /// `>`: truncate, stdout only.
  Truncate,
  /// `>>`: append, stdout only.
  Append,
  /// `&>`: truncate, stdout and stderr.
  Both,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
  pub file: String,
  pub kind: RedirectKind,
}

impl Redirect {
  /// Renders the redirection in a form both `sh` and `cmd` understand.
  fn render(&self) -> String {
    match self.kind {
      RedirectKind::Truncate => format!("> \"{}\"", self.file),
      RedirectKind::Append => format!(">> \"{}\"", self.file),
      RedirectKind::Both => format!("> \"{}\" 2>&1", self.file),
    }
  }
}

/// The single string handed to the platform shell. Kept as an `OsString` so
/// arguments that are not valid UTF-8 reach the shell byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine(OsString);

impl CommandLine {
  /// Joins `args[1..]` with single spaces. The last argument is wrapped in
  /// double quotes, with no trailing space, when it names a readable file.
  pub fn compose(args: &[OsString]) -> Self {
    let mut line = OsString::new();
    let last = args.len().saturating_sub(1);

    for (index, arg) in args.iter().enumerate().skip(1) {
      if index == last && is_readable_file(Path::new(arg)) {
        line.push("\"");
        line.push(arg);
        line.push("\"");
      } else {
        line.push(arg);
        line.push(" ");
      }
    }

    CommandLine(line)
  }

  pub fn with_redirect(mut self, redirect: &Redirect) -> Self {
    if !self.0.is_empty() && self.0.as_encoded_bytes().last() != Some(&b' ') {
      self.0.push(" ");
    }
    self.0.push(redirect.render());
    self
  }

  pub fn as_os_str(&self) -> &OsStr {
    &self.0
  }

  /// The line for the audit log and diagnostics; invalid UTF-8 is replaced.
  pub fn to_string_lossy(&self) -> String {
    self.0.to_string_lossy().into_owned()
  }
}

impl std::fmt::Display for CommandLine {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0.to_string_lossy())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::tempdir;

  fn args(tokens: &[&str]) -> Vec<OsString> {
    tokens.iter().map(OsString::from).collect()
  }

  #[test]
  fn prefix_match_accepts_versioned_interpreters() {
    let accepts = |matching: InterpreterMatch, token: &str| matching.accepts("python", OsStr::new(token));
    assert!(accepts(InterpreterMatch::Prefix, "python"));
    assert!(accepts(InterpreterMatch::Prefix, "python3"));
    assert!(!accepts(InterpreterMatch::Prefix, "Python"));
    assert!(!accepts(InterpreterMatch::Prefix, "node"));

    assert!(accepts(InterpreterMatch::Exact, "python"));
    assert!(!accepts(InterpreterMatch::Exact, "python3"));
  }

  #[test]
  fn too_few_tokens_are_rejected() {
    let err = Invocation::validate(args(&["cp", "python"]), "python", InterpreterMatch::Prefix)
      .unwrap_err();
    assert!(matches!(err, LaunchError::InvalidArguments { found: 2 }));
  }

  #[test]
  fn wrong_interpreter_is_rejected() {
    let err = Invocation::validate(
      args(&["cp", "node", "hello.js"]),
      "python",
      InterpreterMatch::Prefix,
    )
    .unwrap_err();
    assert!(matches!(err, LaunchError::UnsupportedExecutable { .. }));
  }

  #[test]
  fn missing_source_is_unreadable() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.py");
    let invocation = Invocation::validate(
      vec!["cp".into(), "python".into(), missing.into_os_string()],
      "python",
      InterpreterMatch::Prefix,
    )
    .unwrap();

    let err = invocation.check_source().unwrap_err();
    assert_eq!(err.exit_code(), 8);
  }

  #[test]
  fn directory_is_not_a_readable_source() {
    let dir = tempdir().unwrap();
    assert!(!is_readable_file(dir.path()));
  }

  #[test]
  fn readable_trailing_file_is_quoted() {
    let dir = tempdir().unwrap();
    let script = dir.path().join("script.py");
    fs::write(&script, "print('hi')\n").unwrap();
    let line = CommandLine::compose(&["cp".into(), "python".into(), "-u".into(), script.clone().into_os_string()]);
    assert_eq!(line.to_string_lossy(), format!("python -u \"{}\"", script.display()));
  }

  #[test]
  fn unreadable_trailing_token_is_left_raw() {
    let line = CommandLine::compose(&args(&["cp", "python", "-c", "no-such-file.py"]));
    assert_eq!(line.to_string_lossy(), "python -c no-such-file.py ");
  }

  #[test]
  fn redirect_follows_the_command() {
    let redirect = Redirect {
      file: "out.log".into(),
      kind: RedirectKind::Both,
    };
    let line = CommandLine::compose(&args(&["cp", "python", "x.py"])).with_redirect(&redirect);
    assert_eq!(line.to_string_lossy(), "python x.py > \"out.log\" 2>&1");

    let redirect = Redirect {
      file: "out.log".into(),
      kind: RedirectKind::Append,
    };
    let line = CommandLine("python \"x.py\"".into()).with_redirect(&redirect);
    assert_eq!(line.to_string_lossy(), "python \"x.py\" >> \"out.log\"");
  }

  #[cfg(unix)]
  #[test]
  fn non_utf8_source_keeps_its_bytes() {
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir().unwrap();
    let script = dir.path().join(OsStr::from_bytes(b"script_\xff.py"));
    fs::write(&script, "print('hi')\n").unwrap();

    let invocation = Invocation::validate(
      vec!["cp".into(), "python".into(), script.clone().into_os_string()],
      "python",
      InterpreterMatch::Prefix,
    )
    .unwrap();
    invocation.check_source().unwrap();

    let line = CommandLine::compose(invocation.tokens());
    let mut expected = b"python \"".to_vec();
    expected.extend_from_slice(script.as_os_str().as_bytes());
    expected.push(b'"');
    assert_eq!(line.as_os_str().as_bytes(), &expected[..]);
  }
}
