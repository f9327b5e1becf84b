//! Carga y limpieza única de la tabla de contratos (CSV del CONOSCE),
//! produciendo la tabla inmutable sobre la que se filtra.

use std::{fmt, fs::File, io::Read, path::Path};

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{
    error::{DatasetError, LookupError},
    models::ContractRecord,
    text::{title_case, truncate_label},
};

/// Columnas sin las que el panel no puede arrancar.
pub const REQUIRED_COLUMNS: [&str; 12] = [
    "RUC_ENTIDAD",
    "ENTIDAD",
    "TIPOENTIDADOEE",
    "ENTIDAD_DEPARTAMENTO",
    "SECTOR",
    "RUCPROVEEDOR",
    "PROVEEDOR",
    "TIPOPROVEEDOR",
    "MONTOADJUDICADOSOLES",
    "RUBROS",
    "FECHACONVOCATORIA",
    "DESCRIPCION_PROCESO",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y%m%d"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M"];

/// Rango visual al que se reescala el monto de cada contrato.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeWidthRange {
    pub min: f64,
    pub max: f64,
}

impl Default for EdgeWidthRange {
    fn default() -> Self {
        Self { min: 3.0, max: 15.0 }
    }
}

impl EdgeWidthRange {
    pub fn new(min: f64, max: f64) -> Result<Self, DatasetError> {
        if !(min.is_finite() && max.is_finite()) || min >= max || min < 0.0 {
            return Err(DatasetError::InvalidEdgeWidthRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Reescalado lineal de `amount` desde `[lo, hi]` a `[min, max]`.
    /// Si todos los montos son iguales, todas las aristas usan el mínimo.
    pub fn scale(&self, amount: f64, lo: f64, hi: f64) -> f64 {
        if hi > lo {
            self.min + (amount - lo) * (self.max - self.min) / (hi - lo)
        } else {
            self.min
        }
    }
}

/// Opciones de carga.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Leer sólo las primeras N filas de datos.
    pub row_limit: Option<usize>,
    pub edge_width: EdgeWidthRange,
}

/// Fila tal y como viene en el CSV.
#[derive(Debug, Deserialize)]
struct RawContract {
    #[serde(rename = "RUC_ENTIDAD")]
    entity_ruc: String,
    #[serde(rename = "ENTIDAD")]
    entity_name: String,
    #[serde(rename = "TIPOENTIDADOEE")]
    entity_type: String,
    #[serde(rename = "ENTIDAD_DEPARTAMENTO")]
    entity_department: String,
    #[serde(rename = "SECTOR")]
    entity_sector: String,
    #[serde(rename = "RUCPROVEEDOR")]
    supplier_ruc: String,
    #[serde(rename = "PROVEEDOR")]
    supplier_name: String,
    #[serde(rename = "TIPOPROVEEDOR")]
    supplier_type: String,
    #[serde(rename = "MONTOADJUDICADOSOLES")]
    amount: String,
    #[serde(rename = "RUBROS")]
    rubro: String,
    #[serde(rename = "FECHACONVOCATORIA")]
    convocation_date: String,
    #[serde(rename = "DESCRIPCION_PROCESO")]
    description: String,
    #[serde(rename = "OBJETOCONTRACTUAL", default)]
    contract_object: Option<String>,
}

/// Resumen de la tabla cargada.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub entities: usize,
    pub suppliers: usize,
    pub total_amount: f64,
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} contratos, {} entidades, {} proveedores, S/ {:.2} adjudicados.",
            self.rows, self.entities, self.suppliers, self.total_amount
        )
    }
}

/// Tabla inmutable de contratos. Nadie la modifica tras la carga, por lo que
/// puede compartirse entre peticiones sin bloqueo.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<ContractRecord>,
}

impl Dataset {
    /// Lee el CSV indicado. Cualquier violación del esquema aborta la carga.
    pub fn load(path: &Path, options: &LoadOptions) -> Result<Self, DatasetError> {
        info!("Cargando contratos desde {}...", path.display());
        let file = File::open(path)?;
        let dataset = Self::from_reader(file, options)?;
        if dataset.is_empty() {
            warn!("{} no contiene contratos; el panel arrancará vacío", path.display());
        }
        info!("Datos cargados: {}", dataset.summary());
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Self, DatasetError> {
        let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        validate_headers(rdr.headers()?)?;

        let limit = options.row_limit.unwrap_or(usize::MAX);
        let mut records = Vec::new();
        for (index, row) in rdr.deserialize::<RawContract>().take(limit).enumerate() {
            let raw = row?;
            records.push(clean_row(raw, index)?);
        }

        apply_edge_widths(&mut records, &options.edge_width);
        debug!("{} filas limpiadas", records.len());
        Ok(Self { records })
    }

    pub fn records(&self) -> &[ContractRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Recupera la fila original por su índice en la tabla completa.
    pub fn lookup(&self, row: usize) -> Result<&ContractRecord, LookupError> {
        self.records.get(row).ok_or(LookupError::RowOutOfRange {
            row,
            len: self.records.len(),
        })
    }

    pub fn summary(&self) -> DatasetSummary {
        let mut entities = std::collections::HashSet::new();
        let mut suppliers = std::collections::HashSet::new();
        let mut total_amount = 0.0;
        for record in &self.records {
            entities.insert(record.entity_ruc);
            suppliers.insert(record.supplier_ruc);
            total_amount += record.amount;
        }
        DatasetSummary {
            rows: self.records.len(),
            entities: entities.len(),
            suppliers: suppliers.len(),
            total_amount,
        }
    }
}

fn validate_headers(headers: &StringRecord) -> Result<(), DatasetError> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h.trim_start_matches('\u{feff}') == column) {
            return Err(DatasetError::MissingColumn(column));
        }
    }
    Ok(())
}

fn clean_row(raw: RawContract, index: usize) -> Result<ContractRecord, DatasetError> {
    let row = index + 1;
    let entity_ruc = parse_ruc(&raw.entity_ruc, row, "RUC_ENTIDAD")?;
    let supplier_ruc = parse_ruc(&raw.supplier_ruc, row, "RUCPROVEEDOR")?;
    let amount = parse_amount(&raw.amount, row)?;

    let entity_title = title_case(&raw.entity_name);
    let supplier_title = title_case(&raw.supplier_name);

    Ok(ContractRecord {
        df_index: index,
        entity_ruc,
        entity_label: truncate_label(&entity_title),
        entity_title,
        entity_name: raw.entity_name,
        entity_type: raw.entity_type,
        entity_department: raw.entity_department,
        entity_sector: raw.entity_sector,
        supplier_ruc,
        supplier_label: truncate_label(&supplier_title),
        supplier_title,
        supplier_name: raw.supplier_name,
        supplier_type: raw.supplier_type,
        amount,
        rubro: raw.rubro,
        convocation_date: parse_date(&raw.convocation_date),
        convocation_date_raw: raw.convocation_date,
        description: raw.description,
        contract_object: raw.contract_object.filter(|s| !s.is_empty()),
        edge_width: 0.0,
    })
}

fn parse_ruc(value: &str, row: usize, column: &'static str) -> Result<u64, DatasetError> {
    value.parse::<u64>().map_err(|e| DatasetError::InvalidField {
        row,
        column,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_amount(value: &str, row: usize) -> Result<f64, DatasetError> {
    let invalid = |reason: String| DatasetError::InvalidField {
        row,
        column: "MONTOADJUDICADOSOLES",
        value: value.to_string(),
        reason,
    };
    let amount = value.parse::<f64>().map_err(|e| invalid(e.to_string()))?;
    if !amount.is_finite() {
        return Err(invalid("el monto debe ser finito".to_string()));
    }
    if amount < 0.0 {
        return Err(invalid("el monto no puede ser negativo".to_string()));
    }
    Ok(amount)
}

/// Fecha de convocatoria; si ningún formato conocido encaja se conserva sólo el texto.
fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// El ancho se normaliza una sola vez sobre la tabla completa, nunca por subconjunto.
fn apply_edge_widths(records: &mut [ContractRecord], range: &EdgeWidthRange) {
    let (lo, hi) = records.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
        (lo.min(r.amount), hi.max(r.amount))
    });
    for record in records.iter_mut() {
        record.edge_width = range.scale(record.amount, lo, hi);
    }
}
