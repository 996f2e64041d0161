//! Request-scoped cross-chain messaging configuration
//!
//! Built from one run's origin and step-2 deployments, then handed to the
//! init and wire actions. Never shared between runs.

use serde::{Deserialize, Serialize};

/// Minimum execution parameters for one message type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnforcedOption {
	#[serde(alias = "msg_type", alias = "msgtype")]
	pub msg_type: u8,
	pub gas: u64,
	pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginEndpoint {
	pub logical_id: String,
	pub endpoint_id: u32,
	/// Store account of the origin token
	pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationEndpoint {
	pub logical_id: String,
	pub endpoint_id: u32,
	pub network_name: String,
	/// Mirror contract address
	pub address: String,
}

/// One directed messaging route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
	pub from: String,
	pub to: String,
	pub enforced_options: Vec<EnforcedOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossChainConfig {
	pub origin: OriginEndpoint,
	pub destinations: Vec<DestinationEndpoint>,
	pub connections: Vec<ConnectionConfig>,
}

impl CrossChainConfig {
	/// Hub topology: every destination is connected to and from the origin
	pub fn hub(
		origin: OriginEndpoint,
		destinations: Vec<DestinationEndpoint>,
		to_destination_options: Vec<EnforcedOption>,
		to_origin_options: Vec<EnforcedOption>,
	) -> Self {
		let connections = destinations
			.iter()
			.flat_map(|destination| {
				[
					ConnectionConfig {
						from: origin.logical_id.clone(),
						to: destination.logical_id.clone(),
						enforced_options: to_destination_options.clone(),
					},
					ConnectionConfig {
						from: destination.logical_id.clone(),
						to: origin.logical_id.clone(),
						enforced_options: to_origin_options.clone(),
					},
				]
			})
			.collect();

		Self {
			origin,
			destinations,
			connections,
		}
	}

	pub fn destination(&self, logical_id: &str) -> Option<&DestinationEndpoint> {
		self.destinations
			.iter()
			.find(|destination| destination.logical_id == logical_id)
	}
}
