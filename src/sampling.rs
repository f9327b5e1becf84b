//! Submuestreo determinista de la tabla para el control de tamaño de muestra.

use rand::{rngs::StdRng, seq::index, SeedableRng};

use crate::{config::DEFAULT_SAMPLE_SEED, dataset::Dataset, models::ContractRecord};

/// Parámetros de muestreo compartidos por todas las peticiones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampling {
    /// Misma semilla + mismo tamaño ⇒ misma muestra.
    pub seed: u64,
    /// Tamaño de la muestra inicial (la que restaura un reinicio). `None` = tabla completa.
    pub initial_size: Option<usize>,
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SAMPLE_SEED,
            initial_size: None,
        }
    }
}

impl Sampling {
    pub fn draw<'a>(&self, dataset: &'a Dataset, size: Option<usize>) -> Vec<&'a ContractRecord> {
        sample(dataset, size, self.seed)
    }

    pub fn initial<'a>(&self, dataset: &'a Dataset) -> Vec<&'a ContractRecord> {
        sample(dataset, self.initial_size, self.seed)
    }
}

/// Extrae `size` filas pseudoaleatorias con la semilla dada, devueltas en el
/// orden original de la tabla. Sin tamaño, o con uno mayor que la tabla,
/// devuelve la tabla completa.
pub fn sample(dataset: &Dataset, size: Option<usize>, seed: u64) -> Vec<&ContractRecord> {
    let records = dataset.records();
    let size = match size {
        Some(size) if size < records.len() => size,
        _ => return records.iter().collect(),
    };

    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = index::sample(&mut rng, records.len(), size).into_vec();
    rows.sort_unstable();
    rows.into_iter().map(|row| &records[row]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::dataset;

    fn rows(records: &[&ContractRecord]) -> Vec<usize> {
        records.iter().map(|r| r.df_index).collect()
    }

    #[test]
    fn same_seed_and_size_give_same_sample() {
        let ds = dataset();
        let a = sample(&ds, Some(3), 7);
        let b = sample(&ds, Some(3), 7);
        assert_eq!(rows(&a), rows(&b));
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn sample_keeps_table_order_without_duplicates() {
        let ds = dataset();
        for seed in 0..20 {
            let picked = rows(&sample(&ds, Some(4), seed));
            let mut sorted = picked.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(picked, sorted);
        }
    }

    #[test]
    fn oversized_or_missing_size_returns_everything() {
        let ds = dataset();
        assert_eq!(sample(&ds, None, 1).len(), 6);
        assert_eq!(sample(&ds, Some(6), 1).len(), 6);
        assert_eq!(sample(&ds, Some(600), 1).len(), 6);
        assert!(sample(&ds, Some(0), 1).is_empty());
    }

    #[test]
    fn initial_sample_uses_configured_size() {
        let ds = dataset();
        let sampling = Sampling {
            seed: 11,
            initial_size: Some(2),
        };
        assert_eq!(rows(&sampling.initial(&ds)), rows(&sample(&ds, Some(2), 11)));
    }
}
