mod connection;
mod flow;
mod node;

pub use connection::ConnectionModel;
pub use flow::FlowModel;
pub use node::NodeModel;
