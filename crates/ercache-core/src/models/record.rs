use serde::{Deserialize, Serialize};

/// One candidate's tally in one contest of one election return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord {
    pub precinct: String,
    pub contest: String,
    pub candidate: String,
    pub votes: i64,
    pub percentage: f64,
}
