use serde::{Deserialize, Serialize};

/// Body of `data/regions/local/{code}.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionListing {
    pub regions: Vec<Region>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub code: String,
    pub name: String,
}

/// Body of `data/regions/precinct/{shard}/{code}.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrecinctDocument {
    #[serde(default)]
    pub regions: Vec<ReturnDescriptor>,
}

/// Only the code is needed; the other descriptor fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnDescriptor {
    pub code: String,
}
