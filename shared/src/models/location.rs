//! Warehouses, apiaries and the country/province regions they sit in

use serde::{Deserialize, Serialize};

use super::{Entity, EntityKind};
use crate::types::EntityId;

/// Country or province option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: EntityId,
    pub name: String,
}

/// Storage site for batches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    pub id: EntityId,
    pub name: String,
    pub country: Region,
    pub province: Region,
    pub city: String,
}

impl Entity for Warehouse {
    const KIND: EntityKind = EntityKind::Warehouse;

    fn id(&self) -> EntityId {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

/// A group of hives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Apiary {
    pub id: EntityId,
    pub name: String,
    pub country: Region,
    pub province: Region,
    pub city: String,
}

impl Entity for Apiary {
    const KIND: EntityKind = EntityKind::Apiary;

    fn id(&self) -> EntityId {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}
