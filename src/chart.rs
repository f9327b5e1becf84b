//! Serie del gráfico de barras: montos adjudicados agregados por contraparte.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{ContractRecord, NodeRef, Role};

pub const AMOUNT_AXIS_LABEL: &str = "Monto Adjudicado";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: String,
    pub y_label: &'static str,
    pub bars: Vec<ChartBar>,
}

/// Construye la serie a partir de los contratos filtrados.
///
/// Sin nodo seleccionado, o con una entidad, las barras son proveedores; con un
/// proveedor, son entidades. Orden: total descendente, empates por primera aparición.
pub fn build_chart(records: &[&ContractRecord], selected: Option<&NodeRef>) -> ChartSeries {
    let (title, bar_role) = match selected {
        None => (
            "Proveedores contratados por entidades del Estado".to_string(),
            Role::Supplier,
        ),
        Some(node) => {
            let name = records
                .iter()
                .find(|r| r.touches(node))
                .map(|r| r.title_for(node.role).to_string())
                .unwrap_or_else(|| node.key.to_string());
            match node.role {
                Role::Entity => (format!("Proveedores contratados por {name}"), Role::Supplier),
                Role::Supplier => (format!("Entidades que contrataron a {name}"), Role::Entity),
            }
        }
    };

    ChartSeries {
        title,
        y_label: AMOUNT_AXIS_LABEL,
        bars: ranked_totals(records, bar_role),
    }
}

fn ranked_totals(records: &[&ContractRecord], role: Role) -> Vec<ChartBar> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut bars: Vec<ChartBar> = Vec::new();
    for record in records {
        let category = record.name_for(role);
        match position.get(category) {
            Some(&i) => bars[i].amount += record.amount,
            None => {
                position.insert(category, bars.len());
                bars.push(ChartBar {
                    category: category.to_string(),
                    amount: record.amount,
                });
            }
        }
    }
    // sort_by es estable: los empates conservan el orden de aparición
    bars.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    bars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::dataset;

    #[test]
    fn default_chart_ranks_suppliers_by_total() {
        let ds = dataset();
        let records: Vec<&ContractRecord> = ds.records().iter().collect();
        let chart = build_chart(&records, None);
        assert_eq!(chart.title, "Proveedores contratados por entidades del Estado");
        assert_eq!(chart.y_label, "Monto Adjudicado");
        let bars: Vec<(&str, f64)> = chart.bars.iter().map(|b| (b.category.as_str(), b.amount)).collect();
        assert_eq!(
            bars,
            [
                ("DISTRIBUIDORA MEDICA SAC", 350000.0),
                ("ALIMENTOS DEL SUR EIRL", 40000.0),
                ("SEGURO SOCIAL DE SALUD", 10000.0),
                ("JUAN PEREZ QUISPE", 5000.0),
            ]
        );
    }

    #[test]
    fn supplier_selection_charts_entities() {
        let ds = dataset();
        let node = NodeRef::supplier(20600000002);
        let records: Vec<&ContractRecord> = ds.records().iter().filter(|r| r.touches(&node)).collect();
        let chart = build_chart(&records, Some(&node));
        assert_eq!(chart.title, "Entidades que contrataron a Alimentos Del Sur Eirl");
        let categories: Vec<&str> = chart.bars.iter().map(|b| b.category.as_str()).collect();
        assert_eq!(categories, ["MUNICIPALIDAD DISTRITAL DE SAN JUAN", "GOBIERNO REGIONAL PIURA"]);
    }

    #[test]
    fn entity_selection_charts_suppliers() {
        let ds = dataset();
        let node = NodeRef::entity(20131370645);
        let records: Vec<&ContractRecord> = ds.records().iter().filter(|r| r.touches(&node)).collect();
        let chart = build_chart(&records, Some(&node));
        assert_eq!(chart.title, "Proveedores contratados por Seguro Social De Salud");
        assert_eq!(chart.bars.len(), 2);
    }

    #[test]
    fn empty_records_give_empty_bars() {
        let chart = build_chart(&[], Some(&NodeRef::entity(1)));
        assert!(chart.bars.is_empty());
        assert_eq!(chart.title, "Proveedores contratados por 1");
    }
}
