//! Chain registry
//!
//! Immutable lookup table from logical chain id to network parameters.

use std::collections::BTreeMap;

use launchpad_types::{ChainDescriptor, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainRegistryError {
	#[error("Unsupported chain: {0}")]
	NotFound(String),
	#[error("Chain registered twice: {0}")]
	Duplicate(String),
}

impl ChainRegistryError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			ChainRegistryError::NotFound(_) => ErrorKind::Validation,
			ChainRegistryError::Duplicate(_) => ErrorKind::Unexpected,
		}
	}
}

#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
	chains: BTreeMap<String, ChainDescriptor>,
}

impl ChainRegistry {
	pub fn from_descriptors(
		descriptors: impl IntoIterator<Item = ChainDescriptor>,
	) -> Result<Self, ChainRegistryError> {
		let mut chains = BTreeMap::new();
		for descriptor in descriptors {
			let id = descriptor.logical_id.clone();
			if chains.insert(id.clone(), descriptor).is_some() {
				return Err(ChainRegistryError::Duplicate(id));
			}
		}
		Ok(Self { chains })
	}

	pub fn resolve(&self, logical_id: &str) -> Result<&ChainDescriptor, ChainRegistryError> {
		self.chains
			.get(logical_id)
			.ok_or_else(|| ChainRegistryError::NotFound(logical_id.to_string()))
	}

	/// Every registered chain, ordered by logical id
	pub fn all(&self) -> Vec<&ChainDescriptor> {
		self.chains.values().collect()
	}

	/// Fails on the first id that is not registered
	pub fn validate_all<S: AsRef<str>>(&self, logical_ids: &[S]) -> Result<(), ChainRegistryError> {
		logical_ids
			.iter()
			.try_for_each(|id| self.resolve(id.as_ref()).map(|_| ()))
	}

	pub fn len(&self) -> usize {
		self.chains.len()
	}

	pub fn is_empty(&self) -> bool {
		self.chains.is_empty()
	}
}
