pub mod bridge;
pub mod chains;
pub mod common;
pub mod health;
pub mod tokens;
pub mod transfers;

pub use bridge::{get_bridge_connections, get_bridge_status, post_bridge};
pub use chains::get_chains;
pub use health::health;
pub use tokens::post_tokens;
pub use transfers::post_transfers;
