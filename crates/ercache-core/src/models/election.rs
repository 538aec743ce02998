use serde::{Deserialize, Serialize};

/// Body of `data/er/{shard}/{code}.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElectionReturn {
    #[serde(default)]
    pub national: Vec<Contest>,
    #[serde(default)]
    pub local: Vec<Contest>,
}

impl ElectionReturn {
    /// National contests first, then local, each in document order.
    pub fn contests(&self) -> impl Iterator<Item = &Contest> {
        self.national.iter().chain(self.local.iter())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contest {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    pub candidates: CandidateList,
}

/// The API nests the candidate array one level deeper than you'd expect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateList {
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub votes: i64,
    pub percentage: f64,
}
