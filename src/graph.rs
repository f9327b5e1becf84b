//! Proyección de un conjunto de contratos a la estructura `{nodes, edges}`
//! que consume el widget del grafo (el layout dirigido por fuerzas lo hace el cliente).

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{json, Value};

use crate::models::{ContractRecord, NodeRef, Role};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub key: u64,
    /// Etiqueta corta para dibujar.
    pub label: String,
    #[serde(rename = "label-complete")]
    pub full_label: String,
    #[serde(rename = "type")]
    pub role: Role,
}

impl GraphNode {
    fn from_record(record: &ContractRecord, role: Role) -> Self {
        let node = NodeRef {
            role,
            key: record.key_for(role),
        };
        Self {
            id: node.id(),
            key: node.key,
            label: record.label_for(role).to_string(),
            full_label: record.title_for(role).to_string(),
            role,
        }
    }

    pub fn node_ref(&self) -> NodeRef {
        NodeRef {
            role: self.role,
            key: self.key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub width: f64,
    pub amount: f64,
    /// Índice de la fila de origen, para la consulta de detalle.
    pub row_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphData {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Nodos de entidad (deduplicados por RUC, orden de primera aparición),
/// seguidos de los de proveedor; una arista por contrato.
pub fn project(records: &[&ContractRecord]) -> GraphData {
    let mut nodes = unique_nodes(records, Role::Entity);
    nodes.extend(unique_nodes(records, Role::Supplier));

    let edges = records
        .iter()
        .map(|r| GraphEdge {
            id: format!("contrato-{}", r.df_index),
            source: r.entity_node().id(),
            target: r.supplier_node().id(),
            width: r.edge_width,
            amount: r.amount,
            row_index: r.df_index,
        })
        .collect();

    GraphData { nodes, edges }
}

fn unique_nodes(records: &[&ContractRecord], role: Role) -> Vec<GraphNode> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.key_for(role)))
        .map(|r| GraphNode::from_record(r, role))
        .collect()
}

/// Reglas de estilo del grafo, indexadas por el rol del nodo y el ancho de la arista.
pub fn stylesheet() -> Value {
    json!([
        {
            "selector": "edge",
            "style": {
                "width": "data(width)",
                "line-color": "#000"
            }
        },
        {
            "selector": format!("[type = \"{}\"]", Role::Entity),
            "style": {
                "background-color": "#dc3545",
                "label": "data(label)"
            }
        },
        {
            "selector": format!("[type = \"{}\"]", Role::Supplier),
            "style": {
                "background-color": "#ffc107",
                "label": "data(label)"
            }
        }
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::dataset;

    #[test]
    fn projects_nodes_then_edges() {
        let ds = dataset();
        let records: Vec<&ContractRecord> = ds.records().iter().collect();
        let graph = project(&records);

        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "entidad-20131370645",
                "entidad-20453744168",
                "entidad-20175639391",
                "proveedor-20100000001",
                "proveedor-10456789012",
                "proveedor-20600000002",
                "proveedor-20131370645",
            ]
        );
        assert_eq!(graph.edges.len(), records.len());
        assert_eq!(graph.edges[5].source, "entidad-20175639391");
        assert_eq!(graph.edges[5].target, "proveedor-20131370645");
        assert_eq!(graph.edges[2].width, 15.0);
    }

    #[test]
    fn same_ruc_in_both_roles_gives_two_nodes() {
        let ds = dataset();
        let records: Vec<&ContractRecord> = ds.records().iter().collect();
        let graph = project(&records);
        let both: Vec<&GraphNode> = graph.nodes.iter().filter(|n| n.key == 20131370645).collect();
        assert_eq!(both.len(), 2);
        assert_ne!(both[0].role, both[1].role);
    }

    #[test]
    fn widths_do_not_change_with_the_subset() {
        let ds = dataset();
        let subset: Vec<&ContractRecord> = ds.records().iter().filter(|r| r.rubro == "ALIMENTOS").collect();
        let graph = project(&subset);
        let widths: Vec<f64> = graph.edges.iter().map(|e| e.width).collect();
        let expected: Vec<f64> = subset.iter().map(|r| r.edge_width).collect();
        assert_eq!(widths, expected);
        // el contrato de 40000 no pasa a ser el máximo del subconjunto
        assert!(widths[0] < 15.0);
    }

    #[test]
    fn empty_records_give_empty_graph() {
        let graph = project(&[]);
        assert!(graph.is_empty());
        assert_eq!(serde_json::to_value(&graph).unwrap(), json!({"nodes": [], "edges": []}));
    }

    #[test]
    fn nodes_serialize_role_as_type() {
        let ds = dataset();
        let records: Vec<&ContractRecord> = ds.records().iter().take(1).collect();
        let graph = project(&records);
        let value = serde_json::to_value(&graph.nodes[1]).unwrap();
        assert_eq!(value["type"], "proveedor");
        assert_eq!(value["label"], "Distribuidora M...");
        assert_eq!(value["label-complete"], "Distribuidora Medica Sac");
    }

    #[test]
    fn stylesheet_targets_both_roles() {
        let sheet = stylesheet();
        let selectors: Vec<&str> = sheet
            .as_array()
            .unwrap()
            .iter()
            .map(|rule| rule["selector"].as_str().unwrap())
            .collect();
        assert_eq!(selectors, ["edge", "[type = \"entidad\"]", "[type = \"proveedor\"]"]);
    }
}
