//! HTTP backend that records per-candidate vote submissions and reports
//! running totals. Records persist in Postgres when `DATABASE_URL` is set
//! and in memory otherwise.

use rocket::{catchers, routes, Build, Rocket};

pub mod catchers;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

pub use error::ApiError;
pub use models::{Candidate, CandidateTotal, VoteRecord, VoteSubmission};
pub use routes::AppState;
pub use store::{MemoryRecordStore, PgRecordStore, RecordStore, StoreError};

use crate::catchers::{internal_error, redirect_to_repo};
use crate::routes::{
    list_votes, reject_delete, reject_head, reject_options, reject_patch, reject_put,
    submit_vote, tally_delete, tally_get, tally_options, tally_patch, tally_post, tally_put,
};

/// Builds the serving Rocket: the full dispatch table plus the catch-all
/// redirect and error catchers.
pub fn rocket(state: AppState) -> Rocket<Build> {
    rocket::build()
        .manage(state)
        .mount(
            "/",
            routes![
                submit_vote,
                list_votes,
                tally_get,
                tally_post,
                tally_put,
                tally_delete,
                tally_patch,
                tally_options,
                reject_put,
                reject_head,
                reject_delete,
                reject_patch,
                reject_options,
            ],
        )
        .register("/", catchers![redirect_to_repo, internal_error])
}
