//! Command runner standing in for the provisioning tool

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use omnichain_launchpad::{CommandError, CommandInvocation, CommandOutput, CommandRunner};

/// Scripted behavior of the provisioning tool
#[derive(Debug, Clone, Default)]
pub struct ToolingScript {
	/// Network whose mirror deployment fails with `failure_stderr`
	pub fail_deploy_on: Option<String>,
	/// Network whose wiring fails with `failure_stderr`
	pub fail_wire_on: Option<String>,
	pub failure_stderr: String,
}

/// Answers every tooling task the way a healthy toolchain would, unless scripted to fail
#[derive(Debug, Clone)]
pub struct ToolingStub {
	script: ToolingScript,
	invocations: Arc<Mutex<Vec<CommandInvocation>>>,
}

pub const ORIGIN_MINT: &str = "MintTOFT1111111111111111111111111111111111";
pub const ORIGIN_STORE: &str = "StoreTOFT222222222222222222222222222222222";

impl ToolingStub {
	pub fn new() -> Self {
		Self::with_script(ToolingScript::default())
	}

	pub fn with_script(script: ToolingScript) -> Self {
		Self {
			script,
			invocations: Arc::new(Mutex::new(Vec::new())),
		}
	}

	pub fn invocations(&self) -> Vec<CommandInvocation> {
		self.invocations.lock().unwrap().clone()
	}

	/// Task name (third token: `pnpm hardhat <task>`) of every invocation
	pub fn tasks(&self) -> Vec<String> {
		self.invocations()
			.iter()
			.filter_map(|invocation| invocation.args.get(1).cloned())
			.collect()
	}

	/// Deterministic mirror address per network
	pub fn mirror_address(network: &str) -> String {
		let digit = match network {
			"arbitrum-sepolia" => '1',
			"bsc-testnet" => '2',
			"base-sepolia" => '3',
			_ => '9',
		};
		format!("0x{}", digit.to_string().repeat(40))
	}

	fn flag<'a>(invocation: &'a CommandInvocation, name: &str) -> Option<&'a str> {
		let flag = format!("--{}", name);
		invocation
			.args
			.iter()
			.position(|arg| *arg == flag)
			.and_then(|index| invocation.args.get(index + 1))
			.map(String::as_str)
	}

	fn failure(&self, invocation: &CommandInvocation) -> CommandError {
		CommandError::Failed {
			program: invocation.program.clone(),
			exit_code: Some(1),
			stdout: String::new(),
			stderr: self.script.failure_stderr.clone(),
		}
	}
}

#[async_trait]
impl CommandRunner for ToolingStub {
	async fn run(&self, invocation: &CommandInvocation) -> Result<CommandOutput, CommandError> {
		self.invocations.lock().unwrap().push(invocation.clone());

		let task = invocation.args.get(1).map(String::as_str).unwrap_or_default();
		let network = Self::flag(invocation, "network").unwrap_or_default();

		let stdout = match task {
			"lz:oft:solana:create" => format!(
				"Creating OFT store...\n{{\"mint\":\"{}\",\"oftStore\":\"{}\"}}\n",
				ORIGIN_MINT, ORIGIN_STORE
			),
			"lz:deploy" => {
				if self.script.fail_deploy_on.as_deref() == Some(network) {
					return Err(self.failure(invocation));
				}
				format!(
					"deploying \"MyOFT\"\ndeployed at {} with 1500000 gas\n",
					Self::mirror_address(network)
				)
			},
			"lz:oapp:wire" => {
				if self.script.fail_wire_on.as_deref() == Some(network) {
					return Err(self.failure(invocation));
				}
				"Wiring complete\n".to_string()
			},
			_ => "ok\n".to_string(),
		};

		Ok(CommandOutput {
			stdout,
			stderr: String::new(),
			exit_code: 0,
		})
	}
}
