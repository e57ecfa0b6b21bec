//! Inventory lot (batch) models
//!
//! A batch is one receipt of a product or raw material. Stock only goes down
//! through consumption recorded server-side; the client never edits it.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Entity, EntityKind, NamedRef};
use crate::types::EntityId;

/// Fields common to product and raw-material batches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchLot {
    pub id: EntityId,
    pub entry_date: NaiveDate,
    pub expiration_date: Option<NaiveDate>,
    /// Quantity received when the lot was registered
    #[serde(alias = "quantity")]
    pub quantity_received: Decimal,
    /// Remaining quantity
    pub stock: Decimal,
    pub unit_cost: Decimal,
    /// Server-computed `quantity_received * unit_cost`
    pub total_cost: Decimal,
    pub warehouse_id: EntityId,
    pub employee_id: EntityId,
    #[serde(default)]
    pub warehouse: Option<NamedRef>,
    #[serde(default)]
    pub employee: Option<EmployeeRef>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Employee summary embedded in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRef {
    pub id: EntityId,
    pub name: String,
    pub last_name: String,
}

/// A batch snapshot that breaks one of the lot invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchInvariant {
    #[error("quantity received must be positive")]
    NonPositiveQuantity,

    #[error("stock cannot be negative")]
    NegativeStock,

    #[error("stock {stock} exceeds quantity received {received}")]
    StockAboveReceived { stock: Decimal, received: Decimal },

    #[error("unit cost cannot be negative")]
    NegativeUnitCost,

    #[error("total cost {actual} does not match {expected}")]
    TotalCostMismatch { expected: Decimal, actual: Decimal },

    #[error("quantity received {received} times unit cost {unit_cost} is out of range")]
    TotalCostOverflow { received: Decimal, unit_cost: Decimal },
}

impl BatchLot {
    /// Quantity consumed since the lot was received. `None` when the
    /// difference does not fit a `Decimal`.
    pub fn consumed(&self) -> Option<Decimal> {
        self.quantity_received.checked_sub(self.stock)
    }

    pub fn is_depleted(&self) -> bool {
        self.stock <= Decimal::ZERO
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiration_date.is_some_and(|date| date < today)
    }

    /// `quantity_received * unit_cost`, rounded to cents. `None` on overflow.
    pub fn expected_total_cost(&self) -> Option<Decimal> {
        self.quantity_received
            .checked_mul(self.unit_cost)
            .map(|total| total.round_dp(2))
    }

    /// Every invariant the snapshot violates, empty when consistent
    pub fn violations(&self) -> Vec<BatchInvariant> {
        let mut violations = Vec::new();
        if self.quantity_received <= Decimal::ZERO {
            violations.push(BatchInvariant::NonPositiveQuantity);
        }
        if self.stock < Decimal::ZERO {
            violations.push(BatchInvariant::NegativeStock);
        }
        if self.stock > self.quantity_received {
            violations.push(BatchInvariant::StockAboveReceived {
                stock: self.stock,
                received: self.quantity_received,
            });
        }
        if self.unit_cost < Decimal::ZERO {
            violations.push(BatchInvariant::NegativeUnitCost);
        }
        match self.expected_total_cost() {
            Some(expected) if self.total_cost.round_dp(2) != expected => {
                violations.push(BatchInvariant::TotalCostMismatch {
                    expected,
                    actual: self.total_cost,
                });
            }
            Some(_) => {}
            None => violations.push(BatchInvariant::TotalCostOverflow {
                received: self.quantity_received,
                unit_cost: self.unit_cost,
            }),
        }
        violations
    }

    pub fn registered_by(&self) -> Option<String> {
        self.employee
            .as_ref()
            .map(|e| format!("{} {}", e.name, e.last_name))
    }
}

/// Raw material summary embedded in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMaterialRef {
    pub id: EntityId,
    pub name: String,
    /// Unit of measure, e.g. "kg"
    #[serde(default)]
    pub measurement: String,
}

/// A lot of raw material (wax, jars, labels…)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterialBatch {
    #[serde(flatten)]
    pub lot: BatchLot,
    pub raw_material_id: EntityId,
    #[serde(default)]
    pub raw_material: Option<RawMaterialRef>,
}

impl RawMaterialBatch {
    pub fn measurement(&self) -> &str {
        self.raw_material
            .as_ref()
            .map(|m| m.measurement.as_str())
            .unwrap_or("")
    }
}

impl Entity for RawMaterialBatch {
    const KIND: EntityKind = EntityKind::RawMaterialBatch;

    fn id(&self) -> EntityId {
        self.lot.id
    }

    fn display_name(&self) -> String {
        self.raw_material
            .as_ref()
            .map(|m| m.name.clone())
            .unwrap_or_else(|| format!("#{}", self.lot.id))
    }
}

/// Product summary embedded in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub barcode: Option<String>,
}

/// A lot of finished product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductBatch {
    #[serde(flatten)]
    pub lot: BatchLot,
    pub product_id: EntityId,
    #[serde(default)]
    pub product: Option<ProductRef>,
}

impl Entity for ProductBatch {
    const KIND: EntityKind = EntityKind::ProductBatch;

    fn id(&self) -> EntityId {
        self.lot.id
    }

    fn display_name(&self) -> String {
        self.product
            .as_ref()
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("#{}", self.lot.id))
    }
}
