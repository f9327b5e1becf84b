//! Estado de filtros y reductor: combina todos los controles del panel en un
//! único conjunto de contratos.
//!
//! Orden de aplicación (cada paso sólo estrecha el anterior):
//!   1. Muestra determinista de `sample_size` filas.
//!   2. Tipo de entidad, tipo de proveedor y rubro (conjunción).
//!   3. Departamento seleccionado en el mapa.
//!   4. Nodo seleccionado en el grafo, sobre el resultado ya filtrado.
//!   5. Búsqueda por RUC: sustituye 2–4 y parte de la tabla completa,
//!      cruzada sólo con el filtro de rubros.
//!   6. Reinicio: descarta todo y devuelve la muestra inicial.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    dataset::Dataset,
    models::{ContractRecord, NodeRef},
    options::{derive_options, FilterOptions},
    sampling::Sampling,
};

/// Valores actuales de todos los controles. Vive en el cliente y viaja en
/// cada petición; el servidor no guarda ninguno.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub entity_types: BTreeSet<String>,
    pub supplier_types: BTreeSet<String>,
    pub sectors: BTreeSet<String>,
    pub sample_size: Option<usize>,
    pub selected_node: Option<NodeRef>,
    pub selected_department: Option<String>,
    pub search_key: Option<u64>,
    pub reset: bool,
}

impl FilterState {
    /// Estado tras la carga: muestra inicial con todas sus opciones seleccionadas.
    pub fn initial(dataset: &Dataset, sampling: &Sampling) -> Self {
        let mut state = Self {
            sample_size: sampling.initial_size,
            ..Self::default()
        };
        state.select_all_options(dataset, sampling);
        state
    }

    fn select_all_options(&mut self, dataset: &Dataset, sampling: &Sampling) {
        let options = derive_options(&sampling.draw(dataset, self.sample_size));
        self.entity_types = options.entity_type_values();
        self.supplier_types = options.supplier_type_values();
        self.sectors = options.sector_values();
    }

    /// Tras cambiar la muestra: conserva lo elegido que sigue disponible y
    /// marca sólo los valores que la muestra anterior no ofrecía.
    fn carry_selection_to(&mut self, previous: &FilterOptions, current: &FilterOptions) {
        self.entity_types = carry_over(
            &self.entity_types,
            &previous.entity_type_values(),
            &current.entity_type_values(),
        );
        self.supplier_types = carry_over(
            &self.supplier_types,
            &previous.supplier_type_values(),
            &current.supplier_type_values(),
        );
        self.sectors = carry_over(
            &self.sectors,
            &previous.sector_values(),
            &current.sector_values(),
        );
    }
}

fn carry_over(
    selected: &BTreeSet<String>,
    previous: &BTreeSet<String>,
    current: &BTreeSet<String>,
) -> BTreeSet<String> {
    current
        .iter()
        .filter(|value| selected.contains(*value) || !previous.contains(*value))
        .cloned()
        .collect()
}

/// Un evento de interacción. Cada uno sustituye sólo los campos de su control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterEvent {
    EntityTypesChanged { values: BTreeSet<String> },
    SupplierTypesChanged { values: BTreeSet<String> },
    SectorsChanged { values: BTreeSet<String> },
    SampleSizeChanged { size: Option<usize> },
    NodeTapped { node: NodeRef },
    NodeCleared,
    MapClicked { department: String },
    MapCleared,
    SearchSelected { key: u64 },
    SearchCleared,
    Reset,
}

/// Registros en alcance para derivar opciones: la muestra, antes de filtrar.
pub fn scope<'a>(
    dataset: &'a Dataset,
    sampling: &Sampling,
    state: &FilterState,
) -> Vec<&'a ContractRecord> {
    if state.reset {
        sampling.initial(dataset)
    } else {
        sampling.draw(dataset, state.sample_size)
    }
}

/// Reduce el estado de filtros a un conjunto de contratos en orden de tabla.
/// Función pura: mismas entradas, misma salida.
pub fn reduce<'a>(
    dataset: &'a Dataset,
    sampling: &Sampling,
    state: &FilterState,
) -> Vec<&'a ContractRecord> {
    if state.reset {
        return sampling.initial(dataset);
    }

    if let Some(key) = state.search_key {
        return dataset
            .records()
            .iter()
            .filter(|r| r.involves_ruc(key) && state.sectors.contains(&r.rubro))
            .collect();
    }

    sampling
        .draw(dataset, state.sample_size)
        .into_iter()
        .filter(|r| {
            state.entity_types.contains(&r.entity_type)
                && state.supplier_types.contains(&r.supplier_type)
                && state.sectors.contains(&r.rubro)
        })
        .filter(|r| {
            state
                .selected_department
                .as_ref()
                .map_or(true, |dep| &r.entity_department == dep)
        })
        .filter(|r| state.selected_node.as_ref().map_or(true, |node| r.touches(node)))
        .collect()
}

/// Aplica un evento al estado actual y devuelve el nuevo estado. El pulso de
/// reinicio sólo sobrevive a un evento `Reset`.
pub fn apply_event(
    dataset: &Dataset,
    sampling: &Sampling,
    state: &FilterState,
    event: FilterEvent,
) -> FilterState {
    let mut next = FilterState {
        reset: false,
        ..state.clone()
    };

    match event {
        FilterEvent::EntityTypesChanged { values } => next.entity_types = values,
        FilterEvent::SupplierTypesChanged { values } => next.supplier_types = values,
        FilterEvent::SectorsChanged { values } => next.sectors = values,
        FilterEvent::SampleSizeChanged { size } => {
            let previous = derive_options(&scope(dataset, sampling, state));
            next.sample_size = size;
            let current = derive_options(&sampling.draw(dataset, size));
            next.carry_selection_to(&previous, &current);
        }
        FilterEvent::NodeTapped { node } => {
            // Un toque sobre un nodo que ya no está en pantalla se ignora.
            let visible = reduce(dataset, sampling, state)
                .iter()
                .any(|r| r.touches(&node));
            if visible {
                next.selected_node = Some(node);
            } else {
                debug!("Toque ignorado: el nodo {node} no está en la vista actual");
            }
        }
        FilterEvent::NodeCleared => next.selected_node = None,
        FilterEvent::MapClicked { department } => {
            if department.trim().is_empty() {
                debug!("Clic en el mapa sin departamento; se ignora");
            } else {
                next.selected_department = Some(department);
            }
        }
        FilterEvent::MapCleared => next.selected_department = None,
        FilterEvent::SearchSelected { key } => next.search_key = Some(key),
        FilterEvent::SearchCleared => next.search_key = None,
        FilterEvent::Reset => {
            next = FilterState::initial(dataset, sampling);
            next.reset = true;
        }
    }

    next
}
