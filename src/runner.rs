//! External command execution
//!
//! Every adapter talks to the OS audio subsystem by spawning short-lived
//! external processes (amixer, pactl, osascript, powershell). This module
//! wraps that in a small trait so the adapters and the dependency checker
//! can be tested against a scripted runner without touching the host
//! audio stack.

use crate::error::CommandError;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Per-invocation timeout. The audio utilities answer in milliseconds;
/// anything longer means a hung scripting host.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs an external command and captures its stdout.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `args`, returning trimmed stdout on success.
    async fn run(&self, program: &str, args: &[&str]) -> std::result::Result<String, CommandError>;
}

/// Render a program and its arguments as a single command line for
/// logging and error context.
pub fn command_line(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// [`ProcessRunner`] backed by real child processes.
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Runner with a non-default timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[&str]) -> std::result::Result<String, CommandError> {
        tracing::trace!("running: {}", command_line(program, args));

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(CommandError::Spawn)?;

        let output = timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| CommandError::Timeout(self.timeout.as_secs()))?
            .map_err(CommandError::Wait)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CommandError::NonZeroExit {
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Scripted [`ProcessRunner`] used by unit tests across the crate.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Maps command lines to canned responses and records every
    /// invocation. Unmatched command lines fall back to a per-program
    /// response; with neither registered, the command "does not exist".
    #[derive(Default)]
    pub struct FakeRunner {
        exact: Mutex<HashMap<String, std::result::Result<String, String>>>,
        by_program: Mutex<HashMap<String, std::result::Result<String, String>>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Respond to an exact command line with stdout.
        pub fn ok(self, line: &str, stdout: &str) -> Self {
            self.exact
                .lock()
                .unwrap()
                .insert(line.to_string(), Ok(stdout.to_string()));
            self
        }

        /// Respond to an exact command line with a non-zero exit.
        pub fn fail(self, line: &str, stderr: &str) -> Self {
            self.exact
                .lock()
                .unwrap()
                .insert(line.to_string(), Err(stderr.to_string()));
            self
        }

        /// Respond to any invocation of `program` with stdout.
        pub fn ok_program(self, program: &str, stdout: &str) -> Self {
            self.by_program
                .lock()
                .unwrap()
                .insert(program.to_string(), Ok(stdout.to_string()));
            self
        }

        /// Respond to any invocation of `program` with a non-zero exit.
        pub fn fail_program(self, program: &str, stderr: &str) -> Self {
            self.by_program
                .lock()
                .unwrap()
                .insert(program.to_string(), Err(stderr.to_string()));
            self
        }

        /// Every command line run so far, in order.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProcessRunner for FakeRunner {
        async fn run(
            &self,
            program: &str,
            args: &[&str],
        ) -> std::result::Result<String, CommandError> {
            let line = command_line(program, args);
            self.calls.lock().unwrap().push(line.clone());

            let response = {
                let exact = self.exact.lock().unwrap();
                match exact.get(&line) {
                    Some(r) => Some(r.clone()),
                    None => self.by_program.lock().unwrap().get(program).cloned(),
                }
            };

            match response {
                Some(Ok(stdout)) => Ok(stdout),
                Some(Err(stderr)) => Err(CommandError::NonZeroExit {
                    code: Some(1),
                    stderr,
                }),
                None => Err(CommandError::Spawn(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("{}: command not found", program),
                ))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_rendering() {
        assert_eq!(command_line("amixer", &[]), "amixer");
        assert_eq!(
            command_line("amixer", &["get", "Master"]),
            "amixer get Master"
        );
    }

    #[cfg(unix)]
    mod system {
        use super::*;

        #[tokio::test]
        async fn test_captures_trimmed_stdout() {
            let runner = SystemRunner::new();
            let out = runner.run("echo", &["hello world"]).await.unwrap();
            assert_eq!(out, "hello world");
        }

        #[tokio::test]
        async fn test_nonzero_exit_carries_code_and_stderr() {
            let runner = SystemRunner::new();
            let err = runner
                .run("sh", &["-c", "echo oops >&2; exit 3"])
                .await
                .unwrap_err();
            match err {
                CommandError::NonZeroExit { code, stderr } => {
                    assert_eq!(code, Some(3));
                    assert_eq!(stderr, "oops");
                }
                other => panic!("expected NonZeroExit, got {:?}", other),
            }
        }

        #[tokio::test]
        async fn test_missing_binary_is_a_spawn_failure() {
            let runner = SystemRunner::new();
            let err = runner
                .run("xvol-definitely-not-installed", &["--version"])
                .await
                .unwrap_err();
            assert!(matches!(err, CommandError::Spawn(_)));
        }

        #[tokio::test]
        async fn test_slow_command_times_out() {
            let runner = SystemRunner::with_timeout(Duration::from_millis(100));
            let err = runner.run("sleep", &["5"]).await.unwrap_err();
            assert!(matches!(err, CommandError::Timeout(_)));
        }
    }
}
