//! Modelos de dominio (contratos, roles y referencias a nodos del grafo).

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Papel que juega un RUC dentro de un contrato.
///
/// La etiqueta serializada (`entidad` / `proveedor`) es la que usa la hoja de
/// estilos del grafo para colorear los nodos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "entidad")]
    Entity,
    #[serde(rename = "proveedor")]
    Supplier,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Entity => "entidad",
            Role::Supplier => "proveedor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identidad de un nodo: (rol, RUC). Un mismo RUC como entidad y como
/// proveedor son dos nodos distintos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeRef {
    pub role: Role,
    pub key: u64,
}

impl NodeRef {
    pub fn entity(key: u64) -> Self {
        Self { role: Role::Entity, key }
    }

    pub fn supplier(key: u64) -> Self {
        Self { role: Role::Supplier, key }
    }

    /// Identificador textual del nodo para el widget del grafo, p. ej. `entidad-20131370645`.
    pub fn id(&self) -> String {
        format!("{}-{}", self.role, self.key)
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.role, self.key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Identificador de nodo inválido: '{0}'")]
pub struct ParseNodeRefError(pub String);

impl FromStr for NodeRef {
    type Err = ParseNodeRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (role, key) = s
            .split_once('-')
            .ok_or_else(|| ParseNodeRefError(s.to_string()))?;
        let role = match role {
            "entidad" => Role::Entity,
            "proveedor" => Role::Supplier,
            _ => return Err(ParseNodeRefError(s.to_string())),
        };
        let key = key
            .parse::<u64>()
            .map_err(|_| ParseNodeRefError(s.to_string()))?;
        Ok(Self { role, key })
    }
}

/// Una fila del conjunto de datos ya limpio. Inmutable tras la carga.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractRecord {
    /// Posición de la fila en la tabla completa; clave primaria estable.
    pub df_index: usize,

    pub entity_ruc: u64,
    pub entity_name: String,
    pub entity_title: String,
    pub entity_label: String,
    pub entity_type: String,
    pub entity_department: String,
    pub entity_sector: String,

    pub supplier_ruc: u64,
    pub supplier_name: String,
    pub supplier_title: String,
    pub supplier_label: String,
    pub supplier_type: String,

    pub amount: f64,
    pub rubro: String,
    pub convocation_date_raw: String,
    pub convocation_date: Option<NaiveDate>,
    pub description: String,
    pub contract_object: Option<String>,

    /// Ancho de arista normalizado sobre la tabla completa.
    pub edge_width: f64,
}

impl ContractRecord {
    pub fn entity_node(&self) -> NodeRef {
        NodeRef::entity(self.entity_ruc)
    }

    pub fn supplier_node(&self) -> NodeRef {
        NodeRef::supplier(self.supplier_ruc)
    }

    /// RUC del contrato para el rol indicado.
    pub fn key_for(&self, role: Role) -> u64 {
        match role {
            Role::Entity => self.entity_ruc,
            Role::Supplier => self.supplier_ruc,
        }
    }

    pub fn touches(&self, node: &NodeRef) -> bool {
        self.key_for(node.role) == node.key
    }

    /// Verdadero si el RUC aparece como entidad o como proveedor.
    pub fn involves_ruc(&self, ruc: u64) -> bool {
        self.entity_ruc == ruc || self.supplier_ruc == ruc
    }

    /// Nombre completo (capitalizado) del extremo indicado.
    pub fn title_for(&self, role: Role) -> &str {
        match role {
            Role::Entity => &self.entity_title,
            Role::Supplier => &self.supplier_title,
        }
    }

    pub fn label_for(&self, role: Role) -> &str {
        match role {
            Role::Entity => &self.entity_label,
            Role::Supplier => &self.supplier_label,
        }
    }

    pub fn name_for(&self, role: Role) -> &str {
        match role {
            Role::Entity => &self.entity_name,
            Role::Supplier => &self.supplier_name,
        }
    }
}
