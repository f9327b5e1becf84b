//! Carga y gestión de configuración de la aplicación (datos, muestreo y servidor).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Result};

use crate::dataset::EdgeWidthRange;

/// Semilla por defecto del muestreo. Fija para que opciones y resultados
/// filtrados coincidan entre interacciones.
pub const DEFAULT_SAMPLE_SEED: u64 = 42;

/// Configuración completa de la aplicación.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_addr: String,
    pub frontend_dir: PathBuf,
    pub open_browser: bool,

    pub data_csv_path: PathBuf,
    pub geojson_path: PathBuf,
    pub data_row_limit: Option<usize>,

    pub sample_seed: u64,
    pub default_sample_size: Option<usize>,
    pub edge_width: EdgeWidthRange,
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno (usando .env si existe).
    pub fn from_env() -> Result<Self> {
        let server_addr =
            env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8050".to_string());
        let frontend_dir =
            PathBuf::from(env::var("FRONTEND_DIR").unwrap_or_else(|_| "frontend".to_string()));
        let open_browser = parse_var("OPEN_BROWSER")?.unwrap_or(true);

        let data_csv_path = PathBuf::from(
            env::var("DATA_CSV_PATH")
                .unwrap_or_else(|_| "inputs/CONOSCE_CONTRATACIONDIRECTA.csv".to_string()),
        );
        let geojson_path = PathBuf::from(
            env::var("GEOJSON_PATH").unwrap_or_else(|_| "inputs/departamentos.geojson".to_string()),
        );
        let data_row_limit = parse_var("DATA_ROW_LIMIT")?;

        let sample_seed = parse_var("SAMPLE_SEED")?.unwrap_or(DEFAULT_SAMPLE_SEED);
        let default_sample_size = parse_var("DEFAULT_SAMPLE_SIZE")?;

        let defaults = EdgeWidthRange::default();
        let edge_width = EdgeWidthRange::new(
            parse_var("EDGE_WIDTH_MIN")?.unwrap_or(defaults.min),
            parse_var("EDGE_WIDTH_MAX")?.unwrap_or(defaults.max),
        )
        .map_err(|e| anyhow!("Configuración de ancho de aristas inválida: {e}"))?;

        Ok(Self {
            server_addr,
            frontend_dir,
            open_browser,
            data_csv_path,
            geojson_path,
            data_row_limit,
            sample_seed,
            default_sample_size,
            edge_width,
        })
    }
}

/// Lee una variable opcional; si existe pero no se puede interpretar, es un error.
fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow!("Valor inválido para {name} ('{raw}'): {e}")),
        Err(_) => Ok(None),
    }
}
