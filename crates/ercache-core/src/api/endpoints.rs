//! Remote path layout of the results API.
//!
//! Precinct and election-return documents are sharded by a leading slice of
//! their code; a wrong prefix is a 404, not a redirect.

/// Base URL of the 2025 results mirror
pub const DEFAULT_BASE_URL: &str = "https://2025electionresults.comelec.gov.ph/";

const PRECINCT_SHARD_LEN: usize = 2;
const RETURN_SHARD_LEN: usize = 3;

pub const REGION_PREFIX: &str = "data/regions/local";
pub const PRECINCT_PREFIX: &str = "data/regions/precinct";
pub const RETURN_PREFIX: &str = "data/er";

/// Leading `len` characters of `code`, or the whole code when shorter.
fn shard(code: &str, len: usize) -> &str {
    match code.char_indices().nth(len) {
        Some((idx, _)) => &code[..idx],
        None => code,
    }
}

pub fn precinct_shard(code: &str) -> &str {
    shard(code, PRECINCT_SHARD_LEN)
}

pub fn return_shard(code: &str) -> &str {
    shard(code, RETURN_SHARD_LEN)
}

pub fn region_path(code: &str) -> String {
    format!("{}/{}.json", REGION_PREFIX, code)
}

pub fn precinct_path(code: &str) -> String {
    format!("{}/{}/{}.json", PRECINCT_PREFIX, precinct_shard(code), code)
}

pub fn return_path(code: &str) -> String {
    format!("{}/{}/{}.json", RETURN_PREFIX, return_shard(code), code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shard_prefixes() {
        assert_eq!(precinct_shard("740300100"), "74");
        assert_eq!(return_shard("740300100001"), "740");
        // Short codes fall back to the whole code, like a string slice would
        assert_eq!(precinct_shard("7"), "7");
        assert_eq!(return_shard("74"), "74");
        assert_eq!(return_shard(""), "");
    }

    #[test]
    fn test_paths() {
        assert_eq!(region_path("7403000"), "data/regions/local/7403000.json");
        assert_eq!(
            precinct_path("740300100"),
            "data/regions/precinct/74/740300100.json"
        );
        assert_eq!(return_path("740300100001"), "data/er/740/740300100001.json");
    }

    #[test]
    fn test_paths_use_exact_prefix_for_every_code() {
        for code in ["1300000", "0102800001", "990000000000", "12"] {
            let precinct = precinct_path(code);
            let ret = return_path(code);
            let p_shard: String = code.chars().take(2).collect();
            let r_shard: String = code.chars().take(3).collect();
            assert_eq!(precinct, format!("data/regions/precinct/{p_shard}/{code}.json"));
            assert_eq!(ret, format!("data/er/{r_shard}/{code}.json"));
        }
    }
}
