//! Invocation templates for the external provisioning tool

use std::path::PathBuf;

use crate::command_runner::CommandInvocation;

/// Task names understood by the provisioning tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolingTasks {
	pub create_origin: String,
	pub deploy_mirror: String,
	pub init_config: String,
	pub wire: String,
	pub send: String,
}

impl Default for ToolingTasks {
	fn default() -> Self {
		Self {
			create_origin: "lz:oft:solana:create".to_string(),
			deploy_mirror: "lz:deploy".to_string(),
			init_config: "lz:oft:solana:init-config".to_string(),
			wire: "lz:oapp:wire".to_string(),
			send: "lz:oft:send".to_string(),
		}
	}
}

/// How to reach the provisioning tool: `program base_args.. task --flags..`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooling {
	pub program: String,
	pub base_args: Vec<String>,
	pub working_dir: Option<PathBuf>,
	pub tasks: ToolingTasks,
}

impl Default for Tooling {
	fn default() -> Self {
		Self {
			program: "pnpm".to_string(),
			base_args: vec!["hardhat".to_string()],
			working_dir: None,
			tasks: ToolingTasks::default(),
		}
	}
}

impl Tooling {
	/// Invocation of `task` with no flags yet
	pub fn task(&self, task: &str) -> CommandInvocation {
		CommandInvocation::new(&self.program)
			.args(self.base_args.iter().cloned())
			.arg(task)
			.working_dir(self.working_dir.clone())
	}
}
