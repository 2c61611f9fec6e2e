//! Model backend that runs a local program.
//!
//! The configured command is split with shell-words (no shell is involved),
//! the prompt is written to its stdin, and its stdout is the response. The
//! process is killed when it outlives the timeout.

use super::{ModelClient, ModelError};
use std::io::{Read, Write};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs a command per completion.
#[derive(Debug, Clone)]
pub struct CommandClient {
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandClient {
    /// Parse `command` into program and arguments.
    pub fn new(command: &str, timeout: Duration) -> Result<Self, ModelError> {
        let args = shell_words::split(command).map_err(|e| ModelError::Command {
            command: command.to_string(),
            message: format!(
                "failed to parse command: {}. Check for unmatched quotes or invalid escape sequences.",
                e
            ),
        })?;

        if args.is_empty() {
            return Err(ModelError::Command {
                command: command.to_string(),
                message: "command is empty".to_string(),
            });
        }

        Ok(Self {
            command: command.to_string(),
            args,
            timeout,
        })
    }

    fn failure(&self, message: impl Into<String>) -> ModelError {
        ModelError::Command {
            command: self.command.clone(),
            message: message.into(),
        }
    }

    fn spawn(&self) -> Result<Child, ModelError> {
        Command::new(&self.args[0])
            .args(&self.args[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                self.failure(format!(
                    "failed to start '{}': {}. Ensure the command is installed and in PATH.",
                    self.args[0], e
                ))
            })
    }
}

impl ModelClient for CommandClient {
    fn provider(&self) -> &str {
        "Command"
    }

    fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        debug!(
            command = %self.command,
            prompt_chars = prompt.chars().count(),
            "running model command"
        );

        let mut child = self.spawn()?;

        // Feed stdin and drain both pipes on their own threads so a chatty
        // child cannot block on a full pipe while we poll.
        let stdin = child.stdin.take();
        let input = prompt.to_string();
        let writer = thread::spawn(move || {
            if let Some(mut stdin) = stdin {
                // A child that exits without reading stdin closes the pipe.
                let _ = stdin.write_all(input.as_bytes());
            }
        });
        let stdout = read_pipe(child.stdout.take());
        let stderr = read_pipe(child.stderr.take());

        let status = wait_with_timeout(&mut child, self.timeout)
            .map_err(|e| self.failure(format!("failed to check process status: {}", e)))?;
        let _ = writer.join();

        let Some(status) = status else {
            return Err(ModelError::Timeout {
                command: self.command.clone(),
                seconds: self.timeout.as_secs(),
            });
        };

        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();

        if !status.success() {
            let detail = stderr.trim();
            let message = match status.code() {
                Some(code) if detail.is_empty() => format!("exited with code {}", code),
                Some(code) => format!("exited with code {}: {}", code, detail),
                None => "terminated by a signal".to_string(),
            };
            return Err(self.failure(message));
        }

        if stdout.trim().is_empty() {
            return Err(ModelError::MissingContent {
                provider: self.provider().to_string(),
            });
        }

        Ok(stdout)
    }
}

fn read_pipe<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buffer);
        }
        String::from_utf8_lossy(&buffer).into_owned()
    })
}

/// Wait for a child process; `Ok(None)` means it was killed on timeout.
fn wait_with_timeout(
    child: &mut Child,
    timeout: Duration,
) -> std::io::Result<Option<std::process::ExitStatus>> {
    let start = Instant::now();

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= timeout {
            // On Unix this is SIGKILL; on Windows it is TerminateProcess.
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}
