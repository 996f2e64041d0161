//! Hand-written collaborators for end-to-end tests

#![allow(dead_code)]

pub mod bridge;
pub mod runner;

#[allow(unused_imports)]
pub use bridge::{StubBridgeApi, StubNativeSender, StubWallet};
#[allow(unused_imports)]
pub use runner::{ToolingScript, ToolingStub};
