mod error;
mod merge;

pub use error::MergeError;
pub use merge::{MergeSummary, PageMap, merge_files, merge_inputs};
