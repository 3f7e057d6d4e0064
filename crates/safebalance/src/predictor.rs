//! Composed per-record and batch prediction.

use crate::batch::{BatchConfig, BatchItem, INTERNAL_ERROR_MESSAGE, UNKNOWN_COMPANY};
use crate::decision::{PredictionResult, decide};
use crate::error::{BatchError, PredictError};
use rayon::prelude::*;
use safebalance_features::{FeatureVector, RawRecord, transform};
use safebalance_model::{Classifier, InferenceEngine, InferenceError, ModelError, XgbClassifier};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Records handed to the classifier in one matrix.
const CHUNK_LEN: usize = 256;

/// Runs records through transform, inference, and decision.
///
/// Cloning is cheap; clones share the classifier.
#[derive(Debug, Clone)]
pub struct DistressPredictor {
    engine: InferenceEngine,
}

impl DistressPredictor {
    /// Predictor over an already checked engine.
    pub const fn new(engine: InferenceEngine) -> Self {
        Self { engine }
    }

    /// Predictor over a classifier, checking its feature schema first.
    pub fn from_classifier(classifier: Arc<dyn Classifier>) -> Result<Self, ModelError> {
        InferenceEngine::new(classifier).map(Self::new)
    }

    /// Load an XGBoost JSON model and build a predictor on it.
    pub fn from_model_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let model = XgbClassifier::from_path(path)?;
        Self::from_classifier(Arc::new(model))
    }

    /// The underlying inference engine.
    pub const fn engine(&self) -> &InferenceEngine {
        &self.engine
    }

    /// Feature vector of a record, without scoring it.
    pub fn features(&self, record: &RawRecord) -> Result<FeatureVector, PredictError> {
        Ok(transform(record)?)
    }

    /// Unrounded probability of failure for one record.
    pub fn probability(&self, record: &RawRecord) -> Result<f64, PredictError> {
        let features = transform(record)?;
        Ok(self.engine.predict(&features)?)
    }

    /// Full outcome for one record.
    pub fn predict(&self, record: &RawRecord) -> Result<PredictionResult, PredictError> {
        self.probability(record).map(decide)
    }

    /// Score one record as a batch item. Never fails: errors become the
    /// item's message.
    pub fn score_item(&self, record: &RawRecord) -> BatchItem {
        batch_item(record, self.predict(record))
    }

    // One classifier call per chunk. If the chunk call fails, every vector is
    // scored on its own so a bad row only fails its own item.
    fn score_chunk(&self, records: &[RawRecord]) -> Vec<BatchItem> {
        let mut vectors = Vec::with_capacity(records.len());
        let slots: Vec<Result<usize, PredictError>> = records
            .iter()
            .map(|record| -> Result<usize, PredictError> {
                let features = transform(record)?;
                vectors.push(features);
                Ok(vectors.len() - 1)
            })
            .collect();

        let probabilities: Vec<Result<f64, InferenceError>> = match self.engine.predict_batch(&vectors) {
            Ok(out) => out.into_iter().map(Ok).collect(),
            Err(e) => {
                debug!(rows = vectors.len(), error = %e, "chunk scoring failed, retrying per row");
                vectors.iter().map(|v| self.engine.predict(v)).collect()
            }
        };

        records
            .iter()
            .zip(slots)
            .map(|(record, slot)| {
                let result = slot
                    .and_then(|i| probabilities[i].clone().map_err(PredictError::from))
                    .map(decide);
                batch_item(record, result)
            })
            .collect()
    }

    /// Score every record sequentially. Output order matches input order.
    pub fn run_batch(&self, records: &[RawRecord]) -> Result<Vec<BatchItem>, BatchError> {
        self.run_batch_with(records, &BatchConfig::default(), || {})
    }

    /// Score every record on the rayon pool. Output is identical to
    /// [`run_batch`](Self::run_batch).
    pub fn run_batch_parallel(&self, records: &[RawRecord]) -> Result<Vec<BatchItem>, BatchError> {
        self.run_batch_with(records, &BatchConfig::parallel(), || {})
    }

    /// Score every record as `config` says, calling `on_item` once per
    /// finished record. Records are scored in chunks of up to 256 rows.
    pub fn run_batch_with<F>(
        &self,
        records: &[RawRecord],
        config: &BatchConfig,
        on_item: F,
    ) -> Result<Vec<BatchItem>, BatchError>
    where
        F: Fn() + Sync,
    {
        if records.is_empty() {
            return Err(BatchError::Empty);
        }

        let parallel = config.runs_parallel(records.len());
        debug!(records = records.len(), parallel, "running batch");

        let score = |chunk: &[RawRecord]| {
            let items = self.score_chunk(chunk);
            items.iter().for_each(|_| on_item());
            items
        };
        let items: Vec<BatchItem> = if parallel {
            records.par_chunks(CHUNK_LEN).flat_map_iter(score).collect()
        } else {
            records.chunks(CHUNK_LEN).flat_map(score).collect()
        };
        Ok(items)
    }
}

fn batch_item(record: &RawRecord, result: Result<PredictionResult, PredictError>) -> BatchItem {
    let company_name = record
        .company_name
        .clone()
        .unwrap_or_else(|| UNKNOWN_COMPANY.to_string());

    match result {
        Ok(result) => BatchItem::scored(company_name, &result),
        Err(e) if e.is_client_error() => {
            warn!(company = %company_name, error = %e, "rejected record");
            BatchItem::failed(company_name, e.to_string())
        }
        Err(e) => {
            warn!(company = %company_name, error = %e, "failed to score record");
            BatchItem::failed(company_name, INTERNAL_ERROR_MESSAGE)
        }
    }
}
