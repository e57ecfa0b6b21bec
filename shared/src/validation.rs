//! Form schemas for the add/edit modals
//!
//! Each form has a typed input structure with declarative rules. Failures
//! are coalesced into a single [`FieldError`]: the first invalid field in
//! the order the fields appear on the form.

use std::borrow::Cow;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::format::normalize_text;
use crate::types::EntityId;

/// Key under which struct-level rules report their failures
pub const SCHEMA_KEY: &str = "__all__";

/// Longest name or city the API accepts
pub const MAX_NAME_LEN: u64 = 50;

/// The one validation failure reported for a form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

/// A typed form input with an explicit field order
pub trait FormSchema: Validate {
    /// Field names in the order they appear on the form. [`SCHEMA_KEY`]
    /// marks where cross-field rules are reported.
    const FIELD_ORDER: &'static [&'static str];

    /// Trim and lowercase free text the way it is stored
    fn normalized(self) -> Self
    where
        Self: Sized,
    {
        self
    }

    /// Run every rule and keep the first failure
    fn check(&self) -> Result<(), FieldError> {
        first_failure(self.validate(), Self::FIELD_ORDER)
    }
}

/// Reduce a full validation report to its first failure in `order`
pub fn first_failure(
    result: Result<(), ValidationErrors>,
    order: &[&str],
) -> Result<(), FieldError> {
    let errors = match result {
        Ok(()) => return Ok(()),
        Err(errors) => errors,
    };
    let fields = errors.field_errors();

    let mut remaining: Vec<&str> = fields.keys().copied().collect();
    remaining.sort_unstable();
    let ordered = order
        .iter()
        .copied()
        .chain(remaining.into_iter().filter(|k| !order.contains(k)));

    for key in ordered {
        if let Some(first) = fields.get(key).and_then(|list| list.first()) {
            return Err(to_field_error(key, first));
        }
    }

    Err(FieldError {
        field: SCHEMA_KEY.to_string(),
        code: "invalid".to_string(),
        message: "form is invalid".to_string(),
    })
}

fn to_field_error(key: &str, error: &ValidationError) -> FieldError {
    let field = error
        .params
        .get("field")
        .and_then(|v| v.as_str())
        .unwrap_or(key)
        .to_string();
    let message = match &error.message {
        Some(message) => message.to_string(),
        None => default_message(&field, &error.code),
    };
    FieldError {
        field,
        code: error.code.to_string(),
        message,
    }
}

fn default_message(field: &str, code: &str) -> String {
    match code {
        "required" => format!("{} is required", field),
        "length" => format!("{} has an invalid length", field),
        "email" => format!("{} must be a valid email", field),
        other => format!("{} is invalid ({})", field, other),
    }
}

fn rule(code: &'static str, field: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error.add_param(Cow::Borrowed("field"), &field);
    error
}

fn positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut error = ValidationError::new("positive");
        error.message = Some(Cow::Borrowed("quantity must be greater than zero"));
        return Err(error);
    }
    Ok(())
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        let mut error = ValidationError::new("non_negative");
        error.message = Some(Cow::Borrowed("unit cost cannot be negative"));
        return Err(error);
    }
    Ok(())
}

fn dates_in_order(
    entry: Option<NaiveDate>,
    expiration: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    if let (Some(entry), Some(expiration)) = (entry, expiration) {
        if expiration < entry {
            return Err(rule(
                "expiration_before_entry",
                "expiration_date",
                "expiration date cannot be before the entry date",
            ));
        }
    }
    Ok(())
}

// ============================================================================
// Warehouses and apiaries
// ============================================================================

/// Add/edit input for a warehouse or an apiary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_site_region", skip_on_field_errors = false))]
pub struct SiteInput {
    #[validate(length(min = 1, max = 50, message = "name is required (max 50 characters)"))]
    pub name: String,
    pub country_id: Option<EntityId>,
    pub province_id: Option<EntityId>,
    #[validate(length(min = 1, max = 50, message = "city is required (max 50 characters)"))]
    pub city: String,
}

pub type WarehouseInput = SiteInput;
pub type ApiaryInput = SiteInput;

fn validate_site_region(input: &SiteInput) -> Result<(), ValidationError> {
    match (input.country_id, input.province_id) {
        (None, Some(_)) => Err(rule(
            "province_requires_country",
            "province_id",
            "a province requires a country",
        )),
        (None, None) => Err(rule("required", "country_id", "country is required")),
        (Some(_), None) => Err(rule("required", "province_id", "province is required")),
        (Some(_), Some(_)) => Ok(()),
    }
}

impl FormSchema for SiteInput {
    const FIELD_ORDER: &'static [&'static str] = &["name", SCHEMA_KEY, "city"];

    fn normalized(self) -> Self {
        Self {
            name: normalize_text(&self.name),
            city: normalize_text(&self.city),
            ..self
        }
    }
}

// ============================================================================
// Employees
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    #[validate(length(min = 1, max = 50, message = "name is required (max 50 characters)"))]
    pub name: String,
    #[validate(length(min = 1, max = 50, message = "last name is required (max 50 characters)"))]
    pub last_name: String,
    #[validate(email(message = "email is not valid"))]
    pub email: String,
    #[validate(length(max = 20, message = "phone is too long"))]
    pub phone: Option<String>,
    #[validate(required(message = "type of employee is required"))]
    pub type_of_employee_id: Option<EntityId>,
}

impl FormSchema for EmployeeInput {
    const FIELD_ORDER: &'static [&'static str] =
        &["name", "last_name", "email", "phone", "type_of_employee_id"];

    fn normalized(self) -> Self {
        Self {
            name: normalize_text(&self.name),
            last_name: normalize_text(&self.last_name),
            email: normalize_text(&self.email),
            phone: self
                .phone
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TypeOfEmployeeInput {
    #[validate(length(min = 1, max = 50, message = "name is required (max 50 characters)"))]
    pub name: String,
    #[validate(length(min = 1, message = "select at least one module"))]
    pub module_ids: Vec<EntityId>,
}

impl FormSchema for TypeOfEmployeeInput {
    const FIELD_ORDER: &'static [&'static str] = &["name", "module_ids"];

    fn normalized(self) -> Self {
        Self {
            name: normalize_text(&self.name),
            ..self
        }
    }
}

// ============================================================================
// Batches
// ============================================================================

/// Manual registration of a raw-material lot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_raw_material_batch_dates", skip_on_field_errors = false))]
pub struct RawMaterialBatchInput {
    #[validate(required(message = "raw material is required"))]
    pub raw_material_id: Option<EntityId>,
    #[validate(required(message = "warehouse is required"))]
    pub warehouse_id: Option<EntityId>,
    #[validate(required(message = "quantity is required"), custom = "positive")]
    pub quantity: Option<Decimal>,
    #[validate(required(message = "unit cost is required"), custom = "non_negative")]
    pub unit_cost: Option<Decimal>,
    pub entry_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
}

fn validate_raw_material_batch_dates(input: &RawMaterialBatchInput) -> Result<(), ValidationError> {
    dates_in_order(input.entry_date, input.expiration_date)
}

impl FormSchema for RawMaterialBatchInput {
    const FIELD_ORDER: &'static [&'static str] = &[
        "raw_material_id",
        "warehouse_id",
        "quantity",
        "unit_cost",
        SCHEMA_KEY,
    ];
}

/// Manual registration of a product lot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_product_batch_dates", skip_on_field_errors = false))]
pub struct ProductBatchInput {
    #[validate(required(message = "product is required"))]
    pub product_id: Option<EntityId>,
    #[validate(required(message = "warehouse is required"))]
    pub warehouse_id: Option<EntityId>,
    #[validate(required(message = "quantity is required"), custom = "positive")]
    pub quantity: Option<Decimal>,
    #[validate(required(message = "unit cost is required"), custom = "non_negative")]
    pub unit_cost: Option<Decimal>,
    pub entry_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
}

fn validate_product_batch_dates(input: &ProductBatchInput) -> Result<(), ValidationError> {
    dates_in_order(input.entry_date, input.expiration_date)
}

impl FormSchema for ProductBatchInput {
    const FIELD_ORDER: &'static [&'static str] = &[
        "product_id",
        "warehouse_id",
        "quantity",
        "unit_cost",
        SCHEMA_KEY,
    ];
}

/// Fields of an existing batch that may still be edited.
/// Quantities and stock are fixed once the lot exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_batch_update_dates", skip_on_field_errors = false))]
pub struct BatchUpdateInput {
    #[validate(required(message = "warehouse is required"))]
    pub warehouse_id: Option<EntityId>,
    #[validate(required(message = "unit cost is required"), custom = "non_negative")]
    pub unit_cost: Option<Decimal>,
    /// Used only to check the expiration date; never sent
    #[serde(skip)]
    pub entry_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
}

fn validate_batch_update_dates(input: &BatchUpdateInput) -> Result<(), ValidationError> {
    dates_in_order(input.entry_date, input.expiration_date)
}

impl FormSchema for BatchUpdateInput {
    const FIELD_ORDER: &'static [&'static str] = &["warehouse_id", "unit_cost", SCHEMA_KEY];
}
