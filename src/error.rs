/// Errors raised while building rows, datasets, weights or configuration.
///
/// The loss engine itself never returns these: once data has been validated
/// through one of the constructors below, a violation inside the engine is a
/// programming error and panics.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("row {row}: category {category} out of range for {n_classes} classes")]
    InvalidCategory {
        row: usize,
        category: usize,
        n_classes: usize,
    },

    #[error("row {row}: feature index {index} out of range for {n_features} features")]
    FeatureOutOfRange {
        row: usize,
        index: usize,
        n_features: usize,
    },

    #[error("row {row}: feature indices must be strictly increasing (saw {index} after {previous})")]
    UnsortedFeatures {
        row: usize,
        previous: usize,
        index: usize,
    },

    #[error("row {row}: {indices} feature indices but {values} feature values")]
    LengthMismatch {
        row: usize,
        indices: usize,
        values: usize,
    },

    #[error("row {row}: feature {index} has non-finite value {value}")]
    NonFiniteFeature { row: usize, index: usize, value: f64 },

    #[error("need at least two classes, got {0}")]
    TooFewClasses(usize),

    #[error("weight matrix is {rows}x{cols}, expected {expected_rows}x{expected_cols}")]
    WeightShape {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    #[error("weight ({class}, {feature}) has non-finite value {value}")]
    NonFiniteWeight { class: usize, feature: usize, value: f64 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
