mod analysis;
pub mod connection;
pub mod edit;
mod flow;
pub mod node;

pub use connection::{Connection, ConnectionId};
pub use edit::{Edit, NodePatch};
pub use flow::FlowGraph;
pub use node::{ConditionConfig, END_NODE_ID, Node, NodeConfig, NodeId, NodeKind, Position, START_NODE_ID, TestConfig};
