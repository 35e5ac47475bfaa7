use rocket::request::FromParam;
use rocket::serde::json::Json;
use rocket::{delete, get, head, options, patch, post, put, State};
use time::OffsetDateTime;
use tracing::{debug, instrument};

use crate::error::ApiError;
use crate::models::{Candidate, CandidateTotal, VoteRecord, VoteSubmission};
use crate::store::RecordStore;

pub struct AppState {
    pub store: Box<dyn RecordStore>,
}

impl AppState {
    pub fn new(store: Box<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[instrument(skip(state, body))]
#[post("/suara", data = "<body>")]
pub async fn submit_vote(
    state: &State<AppState>,
    body: &[u8],
) -> Result<Json<VoteRecord>, ApiError> {
    // Decoded from the raw bytes so that any content type is accepted and
    // malformed payloads surface as a decode error rather than a 404.
    let submission: VoteSubmission =
        serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))?;

    let record = state
        .store
        .put(submission.into_record(OffsetDateTime::now_utc()))
        .await?;
    debug!("stored vote record {} for party {}", record.id, record.party_id);

    Ok(Json(record))
}

#[get("/suara")]
pub async fn list_votes(state: &State<AppState>) -> Result<Json<Vec<VoteRecord>>, ApiError> {
    Ok(Json(state.store.query_all().await?))
}

/// Routes `/suara/prabowo` and `/suara/jokowi`; any other selector is not
/// routed and falls through to the redirect.
impl<'r> FromParam<'r> for Candidate {
    type Error = &'r str;

    fn from_param(param: &'r str) -> Result<Self, Self::Error> {
        match param {
            "prabowo" => Ok(Candidate::Prabowo),
            "jokowi" => Ok(Candidate::Jokowi),
            _ => Err(param),
        }
    }
}

// The tally paths answer the same way whatever the request method, so each
// routable method gets a route over the shared candidate parameter.

#[get("/suara/<candidate>")]
pub async fn tally_get(
    state: &State<AppState>,
    candidate: Candidate,
) -> Result<Json<CandidateTotal>, ApiError> {
    tally(state, candidate).await
}

#[post("/suara/<candidate>")]
pub async fn tally_post(
    state: &State<AppState>,
    candidate: Candidate,
) -> Result<Json<CandidateTotal>, ApiError> {
    tally(state, candidate).await
}

#[put("/suara/<candidate>")]
pub async fn tally_put(
    state: &State<AppState>,
    candidate: Candidate,
) -> Result<Json<CandidateTotal>, ApiError> {
    tally(state, candidate).await
}

#[delete("/suara/<candidate>")]
pub async fn tally_delete(
    state: &State<AppState>,
    candidate: Candidate,
) -> Result<Json<CandidateTotal>, ApiError> {
    tally(state, candidate).await
}

#[patch("/suara/<candidate>")]
pub async fn tally_patch(
    state: &State<AppState>,
    candidate: Candidate,
) -> Result<Json<CandidateTotal>, ApiError> {
    tally(state, candidate).await
}

#[options("/suara/<candidate>")]
pub async fn tally_options(
    state: &State<AppState>,
    candidate: Candidate,
) -> Result<Json<CandidateTotal>, ApiError> {
    tally(state, candidate).await
}

async fn tally(
    state: &State<AppState>,
    candidate: Candidate,
) -> Result<Json<CandidateTotal>, ApiError> {
    let records = state.store.query_by_party(candidate.party_id()).await?;
    Ok(Json(candidate.tally(&records)))
}

// '/suara' answers POST and GET only; the remaining routable methods get an
// explicit rejection instead of falling through to the redirect.

#[put("/suara")]
pub fn reject_put() -> ApiError {
    ApiError::UnsupportedMethod
}

// Declared so the GET route's automatic HEAD handling does not apply.
#[head("/suara")]
pub fn reject_head() -> ApiError {
    ApiError::UnsupportedMethod
}

#[delete("/suara")]
pub fn reject_delete() -> ApiError {
    ApiError::UnsupportedMethod
}

#[patch("/suara")]
pub fn reject_patch() -> ApiError {
    ApiError::UnsupportedMethod
}

#[options("/suara")]
pub fn reject_options() -> ApiError {
    ApiError::UnsupportedMethod
}
