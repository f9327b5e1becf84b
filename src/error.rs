//! Errores de dominio: carga de datos y búsqueda de detalle.

use thiserror::Error;

/// Fallos detectados al cargar la tabla de contratos. Todos son fatales en el arranque.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("No se pudo leer el fichero de datos: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV mal formado: {0}")]
    Csv(#[from] csv::Error),

    #[error("Falta la columna obligatoria '{0}'")]
    MissingColumn(&'static str),

    #[error("Fila {row}: valor inválido en '{column}' ('{value}'): {reason}")]
    InvalidField {
        row: usize,
        column: &'static str,
        value: String,
        reason: String,
    },

    #[error("Rango de ancho de aristas inválido: mínimo {min} debe ser menor que máximo {max}")]
    InvalidEdgeWidthRange { min: f64, max: f64 },
}

/// Fallos al cargar los límites departamentales (GeoJSON).
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("No se pudo leer el GeoJSON: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON mal formado: {0}")]
    Json(#[from] serde_json::Error),

    #[error("El GeoJSON debe ser una FeatureCollection")]
    NotFeatureCollection,

    #[error("Feature {feature}: falta o es inválida la propiedad '{property}'")]
    InvalidProperty {
        feature: usize,
        property: &'static str,
    },
}

/// Fallo de consistencia interna: un índice de fila que no existe en la tabla.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Fila {row} fuera de rango (la tabla tiene {len} filas)")]
    RowOutOfRange { row: usize, len: usize },
}
