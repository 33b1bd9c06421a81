pub mod cursor;
pub mod row;
pub mod dataset;

pub use cursor::{DenseCursor, FeatureCursor, SparseCursor};
pub use row::{DenseRow, SparseRow, TrainingRow};
pub use dataset::{Dataset, DatasetBuilder, RowRange, TrainingData};
