//! Entity tables and their row actions
//!
//! A table is a projection of `{rows, loading}`; it owns no data. Row
//! actions go through the confirmation modal and the remote mutations, and
//! announce changes on the refresh bus.

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{
    capitalize, format_currency, format_lot_number, format_quantity, no_records_message, Apiary,
    BatchLot, Employee, Entity, EntityId, Language, Product, ProductBatch, RawMaterial,
    RawMaterialBatch, TypeOfEmployee, Warehouse,
};

use crate::context::ConsoleContext;
use crate::error::ConsoleResult;
use crate::modal::ConfirmationModal;
use crate::remote::Mutations;

const LOG_CONTEXT: &str = "table";

/// Column header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableColumn {
    pub key: &'static str,
    pub label: &'static str,
}

impl TableColumn {
    fn new(key: &'static str, language: Language, en: &'static str, es: &'static str) -> Self {
        Self {
            key,
            label: language.pick(en, es),
        }
    }
}

/// Label handed to the external label printer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintLabel {
    pub id: EntityId,
    pub name: String,
    pub time: Option<DateTime<Utc>>,
}

/// Per-row actions offered by a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Print,
    Edit,
    Delete,
}

/// A record that can be shown as a table row
pub trait TableRow: Entity {
    fn columns(language: Language) -> Vec<TableColumn>;

    /// Formatted cells, in column order
    fn cells(&self) -> Vec<String>;

    fn actions() -> &'static [RowAction] {
        &[RowAction::Edit, RowAction::Delete]
    }

    fn print_label(&self) -> Option<PrintLabel> {
        None
    }

    /// Inconsistencies worth a warning; the row is rendered anyway
    fn audit(&self) -> Vec<String> {
        Vec::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRow {
    pub id: EntityId,
    pub cells: Vec<String>,
}

/// The three ways a table can render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TableView {
    Loading,
    Empty(String),
    Rows {
        columns: Vec<TableColumn>,
        rows: Vec<RenderedRow>,
    },
}

impl TableView {
    pub fn row_count(&self) -> usize {
        match self {
            TableView::Rows { rows, .. } => rows.len(),
            _ => 0,
        }
    }
}

/// Project one page of records into a view
pub fn project<T: TableRow>(rows: &[T], loading: bool, context: &ConsoleContext) -> TableView {
    if loading {
        return TableView::Loading;
    }
    if rows.is_empty() {
        return TableView::Empty(no_records_message(context.language).to_string());
    }

    let rows = rows
        .iter()
        .map(|row| {
            for problem in row.audit() {
                context.logger.warn(
                    LOG_CONTEXT,
                    format!("{} {}: {}", T::KIND, row.id(), problem),
                );
            }
            RenderedRow {
                id: row.id(),
                cells: row.cells(),
            }
        })
        .collect();

    TableView::Rows {
        columns: T::columns(context.language),
        rows,
    }
}

fn capitalized_or_dash(value: Option<&str>) -> String {
    value.map(capitalize).unwrap_or_else(|| "-".to_string())
}

fn batch_columns(language: Language, parent: (&'static str, &'static str)) -> Vec<TableColumn> {
    vec![
        TableColumn::new("entry_date", language, "Entry date", "Fecha de entrada"),
        TableColumn::new("parent", language, parent.0, parent.1),
        TableColumn::new("lot", language, "Lot", "Lote"),
        TableColumn::new("registered_by", language, "Registered by", "Registrado por"),
        TableColumn::new("warehouse", language, "Warehouse", "Bodega"),
        TableColumn::new("expiration_date", language, "Expiration date", "Fecha de expiración"),
        TableColumn::new("quantity", language, "Quantity received", "Cantidad ingresada"),
        TableColumn::new("unit_cost", language, "Unit cost", "Costo unitario"),
        TableColumn::new("stock", language, "Available", "Disponible"),
        TableColumn::new("total_cost", language, "Total", "Total"),
    ]
}

fn batch_cells(lot: &BatchLot, parent_name: Option<&str>, unit: &str) -> Vec<String> {
    vec![
        lot.entry_date.to_string(),
        capitalized_or_dash(parent_name),
        format_lot_number(lot.id),
        capitalized_or_dash(lot.registered_by().as_deref()),
        capitalized_or_dash(lot.warehouse.as_ref().map(|w| w.name.as_str())),
        lot.expiration_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string()),
        format_quantity(lot.quantity_received, unit),
        format_currency(lot.unit_cost),
        format_quantity(lot.stock, unit),
        format_currency(lot.total_cost),
    ]
}

const BATCH_ACTIONS: &[RowAction] = &[RowAction::Print, RowAction::Edit, RowAction::Delete];

impl TableRow for RawMaterialBatch {
    fn columns(language: Language) -> Vec<TableColumn> {
        batch_columns(language, ("Raw material", "Materia Prima"))
    }

    fn cells(&self) -> Vec<String> {
        let name = self.raw_material.as_ref().map(|m| m.name.as_str());
        batch_cells(&self.lot, name, self.measurement())
    }

    fn actions() -> &'static [RowAction] {
        BATCH_ACTIONS
    }

    fn print_label(&self) -> Option<PrintLabel> {
        Some(PrintLabel {
            id: self.lot.id,
            name: self.display_name(),
            time: self.lot.created_at,
        })
    }

    fn audit(&self) -> Vec<String> {
        self.lot.violations().iter().map(ToString::to_string).collect()
    }
}

impl TableRow for ProductBatch {
    fn columns(language: Language) -> Vec<TableColumn> {
        batch_columns(language, ("Product", "Producto"))
    }

    fn cells(&self) -> Vec<String> {
        let name = self.product.as_ref().map(|p| p.name.as_str());
        batch_cells(&self.lot, name, "")
    }

    fn actions() -> &'static [RowAction] {
        BATCH_ACTIONS
    }

    fn print_label(&self) -> Option<PrintLabel> {
        Some(PrintLabel {
            id: self.lot.id,
            name: self.display_name(),
            time: self.lot.created_at,
        })
    }

    fn audit(&self) -> Vec<String> {
        self.lot.violations().iter().map(ToString::to_string).collect()
    }
}

impl TableRow for Employee {
    fn columns(language: Language) -> Vec<TableColumn> {
        vec![
            TableColumn::new("name", language, "Name", "Nombre"),
            TableColumn::new("email", language, "Email", "Correo"),
            TableColumn::new("phone", language, "Phone", "Teléfono"),
            TableColumn::new("type", language, "Type", "Tipo"),
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            capitalize(&self.full_name()),
            self.email.clone(),
            self.phone.clone().unwrap_or_else(|| "-".to_string()),
            capitalized_or_dash(self.type_of_employee.as_ref().map(|t| t.name.as_str())),
        ]
    }
}

impl TableRow for TypeOfEmployee {
    fn columns(language: Language) -> Vec<TableColumn> {
        vec![
            TableColumn::new("name", language, "Name", "Nombre"),
            TableColumn::new("modules", language, "Modules", "Módulos"),
        ]
    }

    fn cells(&self) -> Vec<String> {
        let modules: Vec<String> = self.modules.iter().map(|m| capitalize(&m.name)).collect();
        vec![capitalize(&self.name), modules.join(", ")]
    }
}

fn site_columns(language: Language) -> Vec<TableColumn> {
    vec![
        TableColumn::new("name", language, "Name", "Nombre"),
        TableColumn::new("country", language, "Country", "País"),
        TableColumn::new("province", language, "Province", "Provincia"),
        TableColumn::new("city", language, "City", "Ciudad"),
    ]
}

impl TableRow for Warehouse {
    fn columns(language: Language) -> Vec<TableColumn> {
        site_columns(language)
    }

    fn cells(&self) -> Vec<String> {
        vec![
            capitalize(&self.name),
            capitalize(&self.country.name),
            capitalize(&self.province.name),
            capitalize(&self.city),
        ]
    }
}

impl TableRow for Apiary {
    fn columns(language: Language) -> Vec<TableColumn> {
        site_columns(language)
    }

    fn cells(&self) -> Vec<String> {
        vec![
            capitalize(&self.name),
            capitalize(&self.country.name),
            capitalize(&self.province.name),
            capitalize(&self.city),
        ]
    }
}

impl TableRow for Product {
    fn columns(language: Language) -> Vec<TableColumn> {
        vec![
            TableColumn::new("barcode", language, "Barcode", "Código de barra"),
            TableColumn::new("name", language, "Name", "Nombre"),
            TableColumn::new("stock", language, "Stock", "Stock"),
            TableColumn::new("average_cost", language, "Average cost", "Costo promedio"),
            TableColumn::new("amount", language, "Amount", "Monto"),
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.barcode.clone(),
            capitalize(&self.name),
            self.stock
                .map(|s| format_quantity(s, ""))
                .unwrap_or_else(|| "-".to_string()),
            self.average_cost
                .map(format_currency)
                .unwrap_or_else(|| "-".to_string()),
            self.amount
                .map(format_currency)
                .unwrap_or_else(|| "-".to_string()),
        ]
    }
}

impl TableRow for RawMaterial {
    fn columns(language: Language) -> Vec<TableColumn> {
        vec![
            TableColumn::new("code", language, "Code", "Código"),
            TableColumn::new("name", language, "Name", "Nombre"),
            TableColumn::new("measurement", language, "Unit", "Medida"),
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.code.to_uppercase(),
            capitalize(&self.name),
            self.measurement.clone(),
        ]
    }
}

fn delete_question(kind_is_batch: bool, language: Language) -> &'static str {
    if kind_is_batch {
        language.pick("Delete this batch?", "¿Desea eliminar el lote?")
    } else {
        language.pick("Delete this record?", "¿Desea eliminar el registro?")
    }
}

fn deleted_message(kind_is_batch: bool, language: Language) -> &'static str {
    if kind_is_batch {
        language.pick("Batch deleted", "Lote eliminado")
    } else {
        language.pick("Record deleted", "Registro eliminado")
    }
}

/// Print, edit and delete for the rows of one table
pub struct RowActions<T, M> {
    mutations: Arc<M>,
    confirm: ConfirmationModal<EntityId>,
    context: ConsoleContext,
    _row: PhantomData<fn() -> T>,
}

impl<T, M> RowActions<T, M>
where
    T: TableRow,
    M: Mutations<T>,
{
    pub fn new(mutations: Arc<M>, context: ConsoleContext) -> Self {
        Self {
            mutations,
            confirm: ConfirmationModal::new(),
            context,
            _row: PhantomData,
        }
    }

    pub fn confirmation(&self) -> &ConfirmationModal<EntityId> {
        &self.confirm
    }

    /// Label for the printer, when the row kind supports printing
    pub fn print(&self, row: &T) -> Option<PrintLabel> {
        row.print_label()
    }

    /// Ask before deleting; nothing is removed until [`Self::accept`]
    pub fn request_delete(&mut self, row: &T) {
        self.request_delete_id(row.id());
    }

    pub fn request_delete_id(&mut self, id: EntityId) {
        self.confirm
            .ask(id, delete_question(T::KIND.is_batch(), self.context.language));
    }

    pub fn decline(&mut self) {
        self.confirm.decline();
    }

    /// Remove the confirmed record and publish one refresh. `None` when
    /// nothing was awaiting confirmation.
    pub async fn accept(&mut self) -> Option<ConsoleResult<()>> {
        let id = self.confirm.accept()?;
        let language = self.context.language;

        match self.mutations.remove(id).await {
            Ok(()) => {
                self.context.bus.publish(T::KIND);
                self.context
                    .notifier
                    .info(deleted_message(T::KIND.is_batch(), language));
                Some(Ok(()))
            }
            Err(err) => {
                self.context
                    .logger
                    .error(LOG_CONTEXT, format!("delete {} {} failed: {}", T::KIND, id, err));
                self.context.notifier.error(&err.user_message(language));
                Some(Err(err))
            }
        }
    }
}

impl<T, M> std::fmt::Debug for RowActions<T, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowActions")
            .field("confirm", &self.confirm)
            .finish_non_exhaustive()
    }
}
