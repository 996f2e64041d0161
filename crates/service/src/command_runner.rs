//! External command execution
//!
//! Runs the provisioning tooling as a child process, answers its interactive
//! confirmation prompts and captures its output. `run_with_retry` layers the
//! transient-failure retry policy on top of any `CommandRunner`.

use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use launchpad_types::ErrorKind;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Prompt fragments answered with `y` unless configured otherwise
pub const DEFAULT_PROMPTS: &[&str] = &[
	"(y/N)",
	"[y/N]",
	"(Y/n)",
	"yes/no",
	"Do you want to continue",
];

/// Failure texts worth retrying: expired blockhashes and nonce races
pub const DEFAULT_TRANSIENT_MARKERS: &[&str] = &[
	"block height exceeded",
	"blockhash not found",
	"TransactionExpiredBlockheightExceededError",
	"transaction expired",
	"nonce too low",
];

const READ_CHUNK: usize = 4096;
const PROMPT_WINDOW: usize = 1024;

/// A program with its arguments, working directory and extra environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
	pub program: String,
	pub args: Vec<String>,
	pub working_dir: Option<PathBuf>,
	pub env: Vec<(String, String)>,
}

impl CommandInvocation {
	pub fn new(program: impl Into<String>) -> Self {
		Self {
			program: program.into(),
			args: Vec::new(),
			working_dir: None,
			env: Vec::new(),
		}
	}

	pub fn arg(mut self, arg: impl Into<String>) -> Self {
		self.args.push(arg.into());
		self
	}

	pub fn args<I, S>(mut self, args: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.args.extend(args.into_iter().map(Into::into));
		self
	}

	/// Append `--name value`
	pub fn flag(self, name: &str, value: impl Into<String>) -> Self {
		self.arg(format!("--{}", name)).arg(value)
	}

	pub fn working_dir(mut self, dir: Option<PathBuf>) -> Self {
		self.working_dir = dir;
		self
	}

	pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.env.push((key.into(), value.into()));
		self
	}
}

impl fmt::Display for CommandInvocation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.program)?;
		for arg in &self.args {
			write!(f, " {}", arg)?;
		}
		Ok(())
	}
}

/// Captured output of a successful run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
	pub stdout: String,
	pub stderr: String,
	pub exit_code: i32,
}

#[derive(Debug, Error)]
pub enum CommandError {
	#[error("failed to start '{program}': {source}")]
	Spawn {
		program: String,
		#[source]
		source: std::io::Error,
	},

	#[error("'{program}' exited with {}: {}", exit_label(.exit_code), last_line(.stderr, .stdout))]
	Failed {
		program: String,
		exit_code: Option<i32>,
		stdout: String,
		stderr: String,
	},

	#[error("I/O error while running '{program}': {reason}")]
	Io { program: String, reason: String },
}

fn exit_label(code: &Option<i32>) -> String {
	match code {
		Some(code) => format!("exit code {}", code),
		None => "a signal".to_string(),
	}
}

fn last_line(stderr: &str, stdout: &str) -> String {
	stderr
		.lines()
		.chain(stdout.lines())
		.rev()
		.map(str::trim)
		.find(|line| !line.is_empty())
		.unwrap_or("no output")
		.to_string()
}

impl CommandError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			CommandError::Failed { .. } => ErrorKind::PermanentExternal,
			CommandError::Spawn { .. } | CommandError::Io { .. } => ErrorKind::Unexpected,
		}
	}

	/// Everything the failure captured, for marker matching and error details
	pub fn diagnostic_text(&self) -> String {
		match self {
			CommandError::Failed { stdout, stderr, .. } => format!("{}\n{}", stderr, stdout),
			other => other.to_string(),
		}
	}
}

/// Maps prompt fragments seen on the child's output to replies written to its stdin
#[derive(Debug, Clone)]
pub struct PromptResponder {
	rules: Vec<(String, String)>,
}

impl PromptResponder {
	pub fn new(rules: Vec<(String, String)>) -> Self {
		Self { rules }
	}

	/// Never answers; the child sees no input
	pub fn silent() -> Self {
		Self { rules: Vec::new() }
	}

	/// Reply for the first rule whose pattern occurs in `text`
	pub fn respond(&self, text: &str) -> Option<&str> {
		self.rules
			.iter()
			.find(|(pattern, _)| text.contains(pattern.as_str()))
			.map(|(_, reply)| reply.as_str())
	}
}

impl Default for PromptResponder {
	fn default() -> Self {
		Self::new(
			DEFAULT_PROMPTS
				.iter()
				.map(|pattern| (pattern.to_string(), "y\n".to_string()))
				.collect(),
		)
	}
}

/// Executes external commands
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
	/// Run to completion. Success is decided by the exit status alone.
	async fn run(&self, invocation: &CommandInvocation) -> Result<CommandOutput, CommandError>;
}

#[derive(Debug, Clone, Copy)]
enum Stream {
	Stdout,
	Stderr,
}

/// `CommandRunner` spawning real child processes
#[derive(Debug, Clone, Default)]
pub struct ProcessCommandRunner {
	responder: PromptResponder,
}

impl ProcessCommandRunner {
	pub fn new(responder: PromptResponder) -> Self {
		Self { responder }
	}
}

async fn forward_output<R>(mut reader: R, stream: Stream, tx: mpsc::UnboundedSender<(Stream, String)>)
where
	R: AsyncRead + Unpin,
{
	let mut buf = vec![0u8; READ_CHUNK];
	let mut pending = Vec::new();
	loop {
		match reader.read(&mut buf).await {
			Ok(0) => break,
			Ok(n) => {
				pending.extend_from_slice(&buf[..n]);
				let chunk = take_complete_utf8(&mut pending);
				if !chunk.is_empty() && tx.send((stream, chunk)).is_err() {
					return;
				}
			},
			Err(e) => {
				warn!(target: "command", error = %e, "Output stream closed with error");
				break;
			},
		}
	}
	if !pending.is_empty() {
		let _ = tx.send((stream, String::from_utf8_lossy(&pending).into_owned()));
	}
}

/// Length of a multi-byte character cut off at the end of `bytes`
fn incomplete_tail(bytes: &[u8]) -> usize {
	let floor = bytes.len().saturating_sub(3);
	for start in (floor..bytes.len()).rev() {
		if bytes[start] & 0xC0 != 0x80 {
			return match std::str::from_utf8(&bytes[start..]) {
				Err(e) if e.error_len().is_none() => bytes.len() - start,
				_ => 0,
			};
		}
	}
	0
}

/// Decode everything but a trailing partial character, which stays buffered
fn take_complete_utf8(pending: &mut Vec<u8>) -> String {
	let rest = pending.split_off(pending.len() - incomplete_tail(pending));
	let text = String::from_utf8_lossy(pending).into_owned();
	*pending = rest;
	text
}

/// Keep the unanswered tail bounded so long outputs don't grow the scan window
fn trim_window(window: &mut String) {
	if window.len() > READ_CHUNK {
		let mut cut = window.len() - PROMPT_WINDOW;
		while !window.is_char_boundary(cut) {
			cut += 1;
		}
		window.drain(..cut);
	}
}

#[async_trait]
impl CommandRunner for ProcessCommandRunner {
	async fn run(&self, invocation: &CommandInvocation) -> Result<CommandOutput, CommandError> {
		let program = invocation.program.clone();
		let mut command = Command::new(&invocation.program);
		command
			.args(&invocation.args)
			.envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
			.stdin(Stdio::piped())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped())
			.kill_on_drop(true);
		if let Some(dir) = &invocation.working_dir {
			command.current_dir(dir);
		}

		debug!(target: "command", command = %invocation, "Spawning");
		let mut child = command.spawn().map_err(|source| CommandError::Spawn {
			program: program.clone(),
			source,
		})?;

		let mut stdin = child.stdin.take();
		let (tx, mut rx) = mpsc::unbounded_channel();
		if let Some(stdout) = child.stdout.take() {
			tokio::spawn(forward_output(stdout, Stream::Stdout, tx.clone()));
		}
		if let Some(stderr) = child.stderr.take() {
			tokio::spawn(forward_output(stderr, Stream::Stderr, tx.clone()));
		}
		drop(tx);

		let mut stdout = String::new();
		let mut stderr = String::new();
		let mut window = String::new();

		while let Some((stream, chunk)) = rx.recv().await {
			for line in chunk.lines().filter(|line| !line.trim().is_empty()) {
				debug!(target: "command", program = %program, ?stream, "{}", line);
			}
			match stream {
				Stream::Stdout => stdout.push_str(&chunk),
				Stream::Stderr => stderr.push_str(&chunk),
			}

			window.push_str(&chunk);
			if let Some(reply) = self.responder.respond(&window) {
				window.clear();
				if let Some(input) = stdin.as_mut() {
					debug!(target: "command", program = %program, "Answering prompt");
					let written = match input.write_all(reply.as_bytes()).await {
						Ok(()) => input.flush().await,
						Err(e) => Err(e),
					};
					if let Err(e) = written {
						warn!(target: "command", program = %program, error = %e, "Could not answer prompt");
						stdin = None;
					}
				}
			} else {
				trim_window(&mut window);
			}
		}

		drop(stdin);
		let status = child.wait().await.map_err(|e| CommandError::Io {
			program: program.clone(),
			reason: e.to_string(),
		})?;

		if status.success() {
			Ok(CommandOutput {
				stdout,
				stderr,
				exit_code: status.code().unwrap_or(0),
			})
		} else {
			Err(CommandError::Failed {
				program,
				exit_code: status.code(),
				stdout,
				stderr,
			})
		}
	}
}

/// Bounded retry for transient command failures
#[derive(Debug, Clone)]
pub struct RetryPolicy {
	/// Total attempts, including the first
	pub max_retries: u32,
	/// Attempt `n` waits `n * base_delay` before the next one
	pub base_delay: Duration,
	pub transient_markers: Vec<String>,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			max_retries: 3,
			base_delay: Duration::from_secs(5),
			transient_markers: DEFAULT_TRANSIENT_MARKERS
				.iter()
				.map(|marker| marker.to_string())
				.collect(),
		}
	}
}

impl RetryPolicy {
	pub fn is_transient(&self, error: &CommandError) -> bool {
		let text = error.diagnostic_text();
		self.transient_markers
			.iter()
			.any(|marker| text.contains(marker.as_str()))
	}
}

/// Run `invocation`, retrying only failures that carry a transient marker
pub async fn run_with_retry(
	runner: &dyn CommandRunner,
	invocation: &CommandInvocation,
	policy: &RetryPolicy,
) -> Result<CommandOutput, CommandError> {
	let max_attempts = policy.max_retries.max(1);
	let mut attempt = 1;

	loop {
		info!(
			target: "command",
			command = %invocation,
			attempt,
			max_attempts,
			"Running command"
		);

		match runner.run(invocation).await {
			Ok(output) => return Ok(output),
			Err(error) => {
				if attempt >= max_attempts || !policy.is_transient(&error) {
					warn!(target: "command", attempt, error = %error, "Command failed");
					return Err(error);
				}

				let delay = policy.base_delay * attempt;
				warn!(
					target: "command",
					attempt,
					delay_ms = delay.as_millis() as u64,
					error = %error,
					"Transient failure, retrying"
				);
				tokio::time::sleep(delay).await;
				attempt += 1;
			},
		}
	}
}
