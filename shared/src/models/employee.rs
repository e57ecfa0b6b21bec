//! Employee and employee-type models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, EntityKind, NamedRef};
use crate::types::EntityId;

/// A person who can register batches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EntityId,
    pub name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub type_of_employee_id: EntityId,
    #[serde(default)]
    pub type_of_employee: Option<NamedRef>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }
}

impl Entity for Employee {
    const KIND: EntityKind = EntityKind::Employee;

    fn id(&self) -> EntityId {
        self.id
    }

    fn display_name(&self) -> String {
        self.full_name()
    }
}

/// Role that grants access to a set of console modules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeOfEmployee {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub modules: Vec<NamedRef>,
}

impl Entity for TypeOfEmployee {
    const KIND: EntityKind = EntityKind::TypeOfEmployee;

    fn id(&self) -> EntityId {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}
