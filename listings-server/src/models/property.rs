//! Property record returned by the listings query

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// One row of the listings query: a property with its current status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub address: String,
    pub city: String,
    /// Name of the current status (`pre_venta`, `en_venta` or `vendido`)
    pub state: String,
    /// Integer prices stay integers on the wire
    pub price: Number,
    pub description: Option<String>,
}
