//! Data models for the results API documents.
//!
//! - `RegionListing`, `Region`: the root region and its child regions
//! - `PrecinctDocument`, `ReturnDescriptor`: election-return codes under a region
//! - `ElectionReturn`, `Contest`, `Candidate`: one precinct's canvassed tally
//! - `FlatRecord`: one candidate row in the exported table

pub mod election;
pub mod record;
pub mod region;

pub use election::{Candidate, CandidateList, Contest, ElectionReturn};
pub use record::FlatRecord;
pub use region::{PrecinctDocument, Region, RegionListing, ReturnDescriptor};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{PipelineError, Result};

/// Deserialize a fetched document, naming its source URL on failure.
pub fn decode<T: DeserializeOwned>(url: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| PipelineError::decode(url, e))
}
