use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::{config::AppConfig, dataset::Dataset, geo::Department, sampling::Sampling};

/// Estado compartido del servidor. Todo es de sólo lectura salvo el canal de
/// apagado; el estado de filtros de cada usuario viaja en cada petición.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub departments: Arc<Vec<Department>>,
    pub sampling: Sampling,
    pub shutdown_sender: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        dataset: Dataset,
        departments: Vec<Department>,
        shutdown_sender: oneshot::Sender<()>,
    ) -> Self {
        let sampling = Sampling {
            seed: config.sample_seed,
            initial_size: config.default_sample_size,
        };
        Self {
            dataset: Arc::new(dataset),
            departments: Arc::new(departments),
            sampling,
            shutdown_sender: Arc::new(Mutex::new(Some(shutdown_sender))),
        }
    }
}
