//! Products and raw materials, the parents of batches

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Entity, EntityKind};
use crate::types::EntityId;

/// Finished product, identified at the scanner by its barcode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: EntityId,
    pub barcode: String,
    pub name: String,
    /// Units in stock across all batches
    #[serde(default)]
    pub stock: Option<Decimal>,
    #[serde(default)]
    pub average_cost: Option<Decimal>,
    /// Stock valued at average cost
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for Product {
    const KIND: EntityKind = EntityKind::Product;

    fn id(&self) -> EntityId {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

/// Input material, identified at the scanner by its code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterial {
    pub id: EntityId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub measurement: String,
}

impl Entity for RawMaterial {
    const KIND: EntityKind = EntityKind::RawMaterial;

    fn id(&self) -> EntityId {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}
