//! Panel analítico de las contrataciones de emergencia por COVID-19 (Perú).
//!
//! El núcleo es un motor sin estado: a partir de la tabla inmutable de
//! contratos y del estado de filtros de un usuario produce el conjunto
//! filtrado, el grafo entidad–proveedor, el gráfico de barras y las opciones
//! de los desplegables.

pub mod api;
pub mod app_state;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod detail;
pub mod error;
pub mod filter;
pub mod geo;
pub mod graph;
pub mod models;
pub mod options;
pub mod sampling;
pub mod search;
pub mod text;
