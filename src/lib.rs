//! Donation platform connecting donors with verified NGOs.
//!
//! The router is built here so integration tests can drive it directly;
//! `main.rs` only adds process-level concerns (tracing, schema, listener).

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};

pub mod auth;
pub mod db;
pub mod flash;
pub mod routes;
pub mod verification;
pub mod views;

#[derive(Clone)]
pub struct AppState {
    pub db: db::DbPool,
}

/// Build the full route table. Role policy is declared per route group, so a
/// handler is only ever reached by a session its group admits.
pub fn app(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(routes::pages::index))
        .route("/about", get(routes::pages::about))
        .route("/contact", get(routes::pages::contact))
        .route("/choose_role", get(routes::pages::choose_role))
        .route("/register/{role}", get(routes::pages::register_form))
        .route("/process_register", post(auth::process_register))
        .route("/login", get(routes::pages::login_form))
        .route("/process_login", post(auth::process_login))
        .route("/logout", get(auth::logout))
        .route("/stories", get(routes::pages::stories))
        .route("/urgent_requirements", get(routes::pages::urgent_requirements));

    let receiver = Router::new()
        .route("/ngo_registration", get(routes::ngos::registration_form))
        .route(
            "/process_ngo_registration",
            post(routes::ngos::process_registration),
        )
        .route("/ngo_dashboard", get(routes::ngos::ngo_dashboard))
        .route("/add_story", get(routes::stories::add_story_form))
        .route("/process_story", post(routes::stories::process_story))
        .route(
            "/add_urgent_requirement",
            get(routes::requirements::add_requirement_form),
        )
        .route(
            "/process_urgent_requirement",
            post(routes::requirements::process_requirement),
        )
        .route_layer(from_fn(auth::require_receiver));

    let donor = Router::new()
        .route("/donor_dashboard", get(routes::donations::donor_dashboard))
        .route("/donate/{ngo_id}", get(routes::donations::donate_form))
        .route("/process_donation", post(routes::donations::process_donation))
        .route_layer(from_fn(auth::require_donor));

    // Any logged-in session, either role.
    let authenticated = Router::new()
        .route("/ngo_details/{ngo_id}", get(routes::ngos::ngo_details))
        .route_layer(from_fn(auth::require_session));

    Router::new()
        .merge(public)
        .merge(receiver)
        .merge(donor)
        .merge(authenticated)
        .fallback(routes::pages::not_found)
        .with_state(state)
}
