//! Búsqueda libre de entidades y proveedores, para elegir la clave de búsqueda (RUC).

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::{
    dataset::Dataset,
    models::{NodeRef, Role},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub role: Role,
    pub key: u64,
    pub label: String,
    pub label_complete: String,
    pub contract_count: usize,
}

/// Coincidencia sin distinguir mayúsculas en alguno de los nombres del nodo,
/// o por prefijo del RUC. Un resultado por nodo con todos sus contratos; las
/// etiquetas salen de la primera fila del nodo, igual que en el grafo.
/// Primero entidades, luego proveedores, en orden de tabla.
pub fn search(dataset: &Dataset, query: &str, limit: usize) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() || limit == 0 {
        return Vec::new();
    }
    let needle = needle.as_str();

    let matched: HashSet<NodeRef> = [Role::Entity, Role::Supplier]
        .into_iter()
        .flat_map(|role| {
            dataset.records().iter().filter_map(move |record| {
                let key = record.key_for(role);
                let matches = key.to_string().starts_with(needle)
                    || record.name_for(role).to_lowercase().contains(needle);
                matches.then_some(NodeRef { role, key })
            })
        })
        .collect();

    let mut hits: Vec<SearchHit> = Vec::new();
    let mut position: HashMap<NodeRef, usize> = HashMap::new();

    for role in [Role::Entity, Role::Supplier] {
        for record in dataset.records() {
            let node = NodeRef {
                role,
                key: record.key_for(role),
            };
            if !matched.contains(&node) {
                continue;
            }
            match position.get(&node) {
                Some(&i) => hits[i].contract_count += 1,
                None => {
                    position.insert(node, hits.len());
                    hits.push(SearchHit {
                        id: node.id(),
                        role,
                        key: node.key,
                        label: record.label_for(role).to_string(),
                        label_complete: record.title_for(role).to_string(),
                        contract_count: 1,
                    });
                }
            }
        }
    }

    hits.truncate(limit);
    hits
}
