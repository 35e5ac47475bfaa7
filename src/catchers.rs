use rocket::response::Redirect;
use rocket::serde::json::Json;
use rocket::{catch, Request};
use serde::Serialize;

/// Fixed home for every request the dispatch table does not know.
pub const PROJECT_HOME: &str = "https://github.com/pyk/relawanapps";

#[derive(Serialize)]
pub struct ErrorMessage {
    error: String,
    status: u16,
}

/// Catch-all: a request that matches no route is redirected to the project
/// page, whatever its method or path.
#[catch(404)]
pub fn redirect_to_repo() -> Redirect {
    Redirect::found(PROJECT_HOME)
}

#[catch(500)]
pub fn internal_error(_req: &Request) -> Json<ErrorMessage> {
    Json(ErrorMessage {
        error: "An internal server error occurred.".into(),
        status: 500,
    })
}
