//! Department domain entity.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Department {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Engineering")]
    pub name: String,
}
