use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    /// Assigned by the record store on insert; zero until then.
    pub id: i64,
    pub vote_count: i32,
    pub party_id: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
}

/// Decode-side shape of a `POST /suara` body. Fields a client leaves out
/// or sends as `null` stay zero, and anything else in the payload is
/// ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct VoteSubmission {
    #[serde(deserialize_with = "null_to_zero")]
    pub vote_count: i32,
    #[serde(deserialize_with = "null_to_zero")]
    pub party_id: i32,
}

fn null_to_zero<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i32>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Computed per request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateTotal {
    pub name: String,
    pub ballot_number: i32,
    pub total_votes: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    Prabowo,
    Jokowi,
}

impl VoteSubmission {
    pub fn into_record(self, submitted_at: OffsetDateTime) -> VoteRecord {
        VoteRecord {
            id: 0,
            vote_count: self.vote_count,
            party_id: self.party_id,
            submitted_at,
        }
    }
}

impl Candidate {
    pub fn name(self) -> &'static str {
        match self {
            Candidate::Prabowo => "Prabowo",
            Candidate::Jokowi => "Jokowi",
        }
    }

    pub fn ballot_number(self) -> i32 {
        match self {
            Candidate::Prabowo => 1,
            Candidate::Jokowi => 2,
        }
    }

    /// Party identifier carried by vote records for this candidate.
    pub fn party_id(self) -> i32 {
        match self {
            Candidate::Prabowo => 1,
            Candidate::Jokowi => 2,
        }
    }

    /// Sums `vote_count` over the given records into the candidate's total.
    /// Callers are expected to pass records already filtered to this
    /// candidate's party; an empty slice legitimately totals zero.
    pub fn tally(self, records: &[VoteRecord]) -> CandidateTotal {
        CandidateTotal {
            name: self.name().to_owned(),
            ballot_number: self.ballot_number(),
            total_votes: records.iter().map(|r| i64::from(r.vote_count)).sum(),
        }
    }
}
