//! Entity kinds and the common record contract

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, ParentRef};

/// Every record kind the console manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Employee,
    TypeOfEmployee,
    Warehouse,
    Apiary,
    Product,
    RawMaterial,
    ProductBatch,
    RawMaterialBatch,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Employee => "employee",
            EntityKind::TypeOfEmployee => "type_of_employee",
            EntityKind::Warehouse => "warehouse",
            EntityKind::Apiary => "apiary",
            EntityKind::Product => "product",
            EntityKind::RawMaterial => "raw_material",
            EntityKind::ProductBatch => "product_batch",
            EntityKind::RawMaterialBatch => "raw_material_batch",
        }
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, EntityKind::ProductBatch | EntityKind::RawMaterialBatch)
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            EntityKind::Employee,
            EntityKind::TypeOfEmployee,
            EntityKind::Warehouse,
            EntityKind::Apiary,
            EntityKind::Product,
            EntityKind::RawMaterial,
            EntityKind::ProductBatch,
            EntityKind::RawMaterialBatch,
        ]
        .into_iter()
        .find(|kind| kind.as_str() == s)
        .ok_or_else(|| format!("unknown entity kind: {}", s))
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A server-owned record the client holds an immutable snapshot of
pub trait Entity {
    const KIND: EntityKind;

    fn id(&self) -> EntityId;

    /// Name or code shown to the user (stored lowercase)
    fn display_name(&self) -> String;

    /// Reference used to scope a batch listing to this record
    fn as_parent(&self) -> ParentRef {
        ParentRef::new(self.id(), self.display_name())
    }
}

/// Id and name as embedded by the API in related records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: EntityId,
    pub name: String,
}
