//! Límites departamentales y sus métricas agregadas, leídos de un GeoJSON.
//! El núcleo no calcula estas métricas: sólo las entrega al mapa.

use std::{fs, path::Path};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::error::GeoError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Department {
    /// Nombre tal y como se compara con `ENTIDAD_DEPARTAMENTO`.
    pub name: String,
    pub population: f64,
    pub area_km2: f64,
    pub density: f64,
    pub amount_awarded: f64,
    pub amount_per_capita: f64,
    pub geometry: Value,
}

pub fn load_departments(path: &Path) -> Result<Vec<Department>, GeoError> {
    let raw = fs::read_to_string(path)?;
    let departments = parse_departments(&raw)?;
    info!(
        "{} departamentos cargados desde {}",
        departments.len(),
        path.display()
    );
    Ok(departments)
}

pub fn parse_departments(raw: &str) -> Result<Vec<Department>, GeoError> {
    let root: Value = serde_json::from_str(raw)?;
    if root.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
        return Err(GeoError::NotFeatureCollection);
    }
    let features = root
        .get("features")
        .and_then(Value::as_array)
        .ok_or(GeoError::NotFeatureCollection)?;

    features
        .iter()
        .enumerate()
        .map(|(i, feature)| parse_feature(i, feature))
        .collect()
}

fn parse_feature(index: usize, feature: &Value) -> Result<Department, GeoError> {
    let empty = Map::new();
    let props = feature
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let number = |property: &'static str| {
        props
            .get(property)
            .and_then(as_number)
            .ok_or(GeoError::InvalidProperty {
                feature: index,
                property,
            })
    };

    let name = props
        .get("Departamento")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(GeoError::InvalidProperty {
            feature: index,
            property: "Departamento",
        })?;

    Ok(Department {
        name,
        population: number("Poblacion Estimada 2020")?,
        area_km2: number("Superficie (km²)")?,
        density: number("Densidad 2017 (hab/km²)")?,
        amount_awarded: number("Monto Adjudicado")?,
        amount_per_capita: number("Monto Per Capita")?,
        geometry: feature.get("geometry").cloned().unwrap_or(Value::Null),
    })
}

/// Acepta números JSON y también cadenas numéricas (algunos exportadores las emiten así).
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(name: &str) -> Value {
        json!({
            "type": "Feature",
            "properties": {
                "Departamento": name,
                "Poblacion Estimada 2020": 2047954,
                "Superficie (km²)": "35,892.49",
                "Densidad 2017 (hab/km²)": 51.7,
                "Monto Adjudicado": 250000.0,
                "Monto Per Capita": 0.12
            },
            "geometry": {"type": "Polygon", "coordinates": [[[-81.0, -5.0], [-80.0, -5.0], [-80.0, -4.0], [-81.0, -5.0]]]}
        })
    }

    #[test]
    fn parses_metrics_and_keeps_geometry() {
        let raw = json!({"type": "FeatureCollection", "features": [feature("PIURA")]}).to_string();
        let departments = parse_departments(&raw).unwrap();
        assert_eq!(departments.len(), 1);
        let piura = &departments[0];
        assert_eq!(piura.name, "PIURA");
        assert_eq!(piura.population, 2047954.0);
        assert_eq!(piura.area_km2, 35892.49);
        assert_eq!(piura.geometry["type"], "Polygon");
    }

    #[test]
    fn missing_metric_is_a_load_fault() {
        let mut bad = feature("LIMA");
        bad["properties"]
            .as_object_mut()
            .unwrap()
            .remove("Monto Per Capita");
        let raw = json!({"type": "FeatureCollection", "features": [feature("PIURA"), bad]}).to_string();
        let err = parse_departments(&raw).unwrap_err();
        assert!(matches!(
            err,
            GeoError::InvalidProperty {
                feature: 1,
                property: "Monto Per Capita"
            }
        ));
    }

    #[test]
    fn rejects_non_collections() {
        let raw = feature("PIURA").to_string();
        assert!(matches!(
            parse_departments(&raw).unwrap_err(),
            GeoError::NotFeatureCollection
        ));
    }
}
