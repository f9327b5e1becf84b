use std::path::PathBuf;

use contrataciones::dataset::{Dataset, LoadOptions};

pub fn data_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(file)
}

pub fn sample_dataset() -> Dataset {
    Dataset::load(&data_path("contrataciones_muestra.csv"), &LoadOptions::default())
        .expect("los datos de muestra deben cargar")
}

pub fn rows(records: &[&contrataciones::models::ContractRecord]) -> Vec<usize> {
    records.iter().map(|r| r.df_index).collect()
}
