//! Opciones válidas de los desplegables, derivadas de la muestra en curso.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::{models::ContractRecord, text::title_case};

/// Una opción de desplegable. `value` es el valor crudo de la columna y es lo
/// único que se usa para filtrar; `label` es sólo para mostrar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub entity_types: Vec<DropdownOption>,
    pub supplier_types: Vec<DropdownOption>,
    pub sectors: Vec<DropdownOption>,
}

impl FilterOptions {
    pub fn entity_type_values(&self) -> BTreeSet<String> {
        values(&self.entity_types)
    }

    pub fn supplier_type_values(&self) -> BTreeSet<String> {
        values(&self.supplier_types)
    }

    pub fn sector_values(&self) -> BTreeSet<String> {
        values(&self.sectors)
    }
}

/// Deriva las opciones de los registros en alcance (la muestra, antes del
/// filtrado categórico). Cada lista conserva el orden de primera aparición.
pub fn derive_options(scope: &[&ContractRecord]) -> FilterOptions {
    FilterOptions {
        entity_types: distinct(scope, |r| &r.entity_type),
        supplier_types: distinct(scope, |r| &r.supplier_type),
        sectors: distinct(scope, |r| &r.rubro),
    }
}

fn distinct<F>(scope: &[&ContractRecord], column: F) -> Vec<DropdownOption>
where
    F: Fn(&ContractRecord) -> &String,
{
    let mut seen = HashSet::new();
    scope
        .iter()
        .map(|r| column(r))
        .filter(|value| seen.insert(value.as_str()))
        .map(|value| DropdownOption {
            label: title_case(value),
            value: value.clone(),
        })
        .collect()
}

fn values(options: &[DropdownOption]) -> BTreeSet<String> {
    options.iter().map(|o| o.value.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::dataset;

    #[test]
    fn options_are_distinct_in_first_seen_order() {
        let ds = dataset();
        let scope: Vec<&ContractRecord> = ds.records().iter().collect();
        let options = derive_options(&scope);

        let entity_values: Vec<&str> = options.entity_types.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(
            entity_values,
            ["GOBIERNO NACIONAL", "GOBIERNO REGIONAL", "GOBIERNO LOCAL"]
        );
        assert_eq!(options.supplier_types.len(), 2);
        assert_eq!(options.sectors.len(), 3);
    }

    #[test]
    fn labels_are_title_cased_but_values_stay_raw() {
        let ds = dataset();
        let scope: Vec<&ContractRecord> = ds.records().iter().collect();
        let options = derive_options(&scope);
        let natural = options
            .supplier_types
            .iter()
            .find(|o| o.value == "PERSONA NATURAL")
            .unwrap();
        assert_eq!(natural.label, "Persona Natural");
        assert!(options.supplier_type_values().contains("PERSONA NATURAL"));
        assert!(!options.supplier_type_values().contains("Persona Natural"));
    }

    #[test]
    fn options_follow_the_scope() {
        let ds = dataset();
        let scope: Vec<&ContractRecord> = ds.records().iter().take(2).collect();
        let options = derive_options(&scope);
        assert_eq!(options.entity_types.len(), 1);
        assert_eq!(options.sector_values(), BTreeSet::from(["SALUD".to_string(), "SERVICIOS".to_string()]));
    }

    #[test]
    fn empty_scope_has_no_options() {
        assert_eq!(derive_options(&[]), FilterOptions::default());
    }
}
