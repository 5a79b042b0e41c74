
mod error;
mod config;
mod corpus;
mod vocab;
mod cooccurrence;
mod ppmi;
mod tfidf;
mod reduce;
mod similarity;
mod knn;
mod pipeline;

pub use error::{Result, VsmError};
pub use config::{files_handling, Config, OutputFormat, Params, Task};
pub use corpus::Corpus;
pub use vocab::Vocabulary;
pub use cooccurrence::{ContextCounts, ContextVectors};
pub use ppmi::{ColumnMap, Ppmi, PpmiMatrix};
pub use tfidf::DocTerm;
pub use reduce::{reduce_dimensionality, TruncatedSvd};
pub use similarity::{cosine_distances, Similarity, UNDEFINED_DISTANCE};
pub use knn::{accuracy, Knn, Split};
pub use pipeline::Pipeline;
