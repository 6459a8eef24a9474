use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionModel {
    pub id: String,
    pub from: String,
    pub to: String,
}
