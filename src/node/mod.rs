//! Node
//!
//! The boundary between the consensus core and its collaborators: transaction
//! intake, background mining, remote chain import and outbound events.
//! Transport is not handled here; callers move the JSON payloads themselves.

pub mod events;
#[allow(clippy::module_inception)]
pub mod node;

pub use events::ChainEvent;
pub use node::{MiningHandle, Node};
