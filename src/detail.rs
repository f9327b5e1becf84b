//! Consulta de detalle: de una arista o un nodo seleccionado a sus filas de origen.

use serde::Serialize;
use tracing::error;

use crate::{
    dataset::Dataset,
    models::{ContractRecord, NodeRef, Role},
};

/// Par (atributo, valor) para la tabla de detalle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailField {
    pub attribute: &'static str,
    pub value: String,
}

fn field(attribute: &'static str, value: impl Into<String>) -> DetailField {
    DetailField {
        attribute,
        value: value.into(),
    }
}

/// Aplana un contrato en la lista de atributos que muestra la tabla.
pub fn detail_fields(record: &ContractRecord) -> Vec<DetailField> {
    let date = record
        .convocation_date
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| record.convocation_date_raw.clone());

    let mut fields = vec![
        field("Entidad", record.entity_title.clone()),
        field("RUC Entidad", record.entity_ruc.to_string()),
        field("Tipo de Entidad", record.entity_type.clone()),
        field("Departamento", record.entity_department.clone()),
        field("Sector", record.entity_sector.clone()),
        field("Proveedor", record.supplier_title.clone()),
        field("RUC Proveedor", record.supplier_ruc.to_string()),
        field("Tipo de Proveedor", record.supplier_type.clone()),
        field("Monto Adjudicado (S/)", format!("{:.2}", record.amount)),
        field("Rubro", record.rubro.clone()),
        field("Fecha de Convocatoria", date),
        field("Descripción", record.description.clone()),
    ];
    if let Some(object) = &record.contract_object {
        fields.push(field("Objeto Contractual", object.clone()));
    }
    fields
}

/// Detalle de la arista con índice `row`. Un índice inexistente es un defecto
/// interno: se registra y el panel conserva su estado.
pub fn contract_detail(dataset: &Dataset, row: usize) -> Option<Vec<DetailField>> {
    match dataset.lookup(row) {
        Ok(record) => Some(detail_fields(record)),
        Err(e) => {
            error!("Inconsistencia interna en la consulta de detalle: {e}");
            None
        }
    }
}

/// Resumen de un nodo con todos sus contratos en la tabla completa.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDetail {
    pub id: String,
    pub role: Role,
    pub key: u64,
    pub label_complete: String,
    pub contract_count: usize,
    pub total_amount: f64,
    pub row_indices: Vec<usize>,
}

/// `None` si ningún contrato referencia al nodo (selección obsoleta).
pub fn node_detail(dataset: &Dataset, node: &NodeRef) -> Option<NodeDetail> {
    let records: Vec<&ContractRecord> = dataset.records().iter().filter(|r| r.touches(node)).collect();
    let first = records.first()?;
    Some(NodeDetail {
        id: node.id(),
        role: node.role,
        key: node.key,
        label_complete: first.title_for(node.role).to_string(),
        contract_count: records.len(),
        total_amount: records.iter().map(|r| r.amount).sum(),
        row_indices: records.iter().map(|r| r.df_index).collect(),
    })
}
