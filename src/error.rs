use rocket::http::Status;
use rocket::response::Responder;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid vote record: {0}")]
    Decode(String),
    #[error("datastore error: {0}")]
    Storage(#[from] StoreError),
    #[error("method not implemented")]
    UnsupportedMethod,
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        // Every kind surfaces as a 500 carrying the error text; the request
        // fails alone and the process keeps serving.
        error!("{} {} failed: {}", req.method(), req.uri(), self);

        rocket::Response::build_from(self.to_string().respond_to(req)?)
            .status(Status::InternalServerError)
            .ok()
    }
}
