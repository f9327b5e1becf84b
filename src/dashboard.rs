//! Ensamblado de la vista completa del panel a partir de un estado de filtros:
//! reducción, proyección al grafo, gráfico y opciones.

use serde::Serialize;

use crate::{
    chart::{build_chart, ChartSeries},
    dataset::Dataset,
    filter::{reduce, scope, FilterState},
    graph::{project, GraphData},
    options::{derive_options, FilterOptions},
    sampling::Sampling,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub record_count: usize,
    pub total_amount: f64,
    pub graph: GraphData,
    pub chart: ChartSeries,
    pub options: FilterOptions,
}

/// Calcula la vista sin tocar ningún estado compartido.
pub fn build_view(dataset: &Dataset, sampling: &Sampling, state: &FilterState) -> DashboardView {
    let records = reduce(dataset, sampling, state);
    let selected = if state.reset || state.search_key.is_some() {
        None
    } else {
        state.selected_node.as_ref()
    };

    DashboardView {
        record_count: records.len(),
        total_amount: records.iter().map(|r| r.amount).sum(),
        graph: project(&records),
        chart: build_chart(&records, selected),
        options: derive_options(&scope(dataset, sampling, state)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dataset::fixtures::dataset, models::NodeRef};

    #[test]
    fn view_is_consistent_with_its_parts() {
        let ds = dataset();
        let sampling = Sampling::default();
        let mut state = FilterState::initial(&ds, &sampling);
        state.selected_node = Some(NodeRef::supplier(20100000001));

        let view = build_view(&ds, &sampling, &state);
        assert_eq!(view.record_count, 2);
        assert_eq!(view.graph.edges.len(), 2);
        assert_eq!(view.total_amount, 350000.0);
        assert!(view.chart.title.starts_with("Entidades que contrataron a"));
        // las opciones salen de la muestra, no del resultado filtrado
        assert_eq!(view.options.entity_types.len(), 3);
    }

    #[test]
    fn search_uses_the_default_chart() {
        let ds = dataset();
        let sampling = Sampling::default();
        let mut state = FilterState::initial(&ds, &sampling);
        state.selected_node = Some(NodeRef::entity(20453744168));
        state.search_key = Some(20131370645);
        let view = build_view(&ds, &sampling, &state);
        assert_eq!(view.record_count, 3);
        assert_eq!(view.chart.title, "Proveedores contratados por entidades del Estado");
    }
}
