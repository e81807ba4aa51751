use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use chrono::Utc;
use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::flash::{self, Flash};
use crate::verification::verify_registry_id;
use crate::{db, views, AppState};

#[derive(Deserialize)]
pub struct NgoRegistrationForm {
    pub org_name: String,
    pub location: String,
    pub contact_number: String,
    pub email: String,
    pub website: Option<String>,
    pub bank_name: String,
    pub account_number: String,
    pub upi_id: Option<String>,
    pub registry_id: String,
}

fn blank_to_none(input: Option<String>) -> Option<String> {
    input.filter(|s| !s.trim().is_empty())
}

pub async fn registration_form(_user: AuthenticatedUser, flash: Flash) -> Response {
    flash.page(views::ngo_registration(flash.message()))
}

pub async fn process_registration(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Form(form): Form<NgoRegistrationForm>,
) -> Response {
    // Verification happens once, at insert time; the flag is never revisited.
    let is_verified = verify_registry_id(&form.registry_id, &form.org_name);

    let result = db::create_ngo(
        &state.db,
        user.id,
        &form.org_name,
        &form.location,
        &form.contact_number,
        &form.email,
        &blank_to_none(form.website),
        &form.bank_name,
        &form.account_number,
        &blank_to_none(form.upi_id),
        &form.registry_id,
        is_verified,
        Utc::now(),
    )
    .await;

    match result {
        Ok(_) => {
            let message = if is_verified {
                "NGO registered and verified successfully!"
            } else {
                "NGO registered but verification failed. Please contact support."
            };
            flash::redirect("/ngo_dashboard", message)
        }
        Err(e) => {
            tracing::error!("NGO insert failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn ngo_dashboard(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    flash: Flash,
) -> Response {
    let ngo = match db::find_ngo_by_user(&state.db, user.id).await {
        Ok(Some(ngo)) => ngo,
        // No NGO yet: registration comes first.
        Ok(None) => return Redirect::to("/ngo_registration").into_response(),
        Err(e) => {
            tracing::error!("NGO lookup failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response();
        }
    };

    let donations = match db::list_donations_for_ngo(&state.db, ngo.id).await {
        Ok(donations) => donations,
        Err(e) => {
            tracing::error!("Donation query failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response();
        }
    };
    let stories_count = match db::count_stories_for_ngo(&state.db, ngo.id).await {
        Ok(count) => count,
        Err(e) => {
            tracing::error!("Story count failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response();
        }
    };
    let urgent_count = match db::count_active_requirements_for_ngo(&state.db, ngo.id).await {
        Ok(count) => count,
        Err(e) => {
            tracing::error!("Requirement count failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response();
        }
    };

    flash.page(views::ngo_dashboard(
        flash.message(),
        &ngo,
        &donations,
        stories_count,
        urgent_count,
    ))
}

pub async fn ngo_details(
    Path(ngo_id): Path<i64>,
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    flash: Flash,
) -> Response {
    let ngo = match db::find_verified_ngo(&state.db, ngo_id).await {
        Ok(Some(ngo)) => ngo,
        Ok(None) => return flash::redirect("/donor_dashboard", "NGO not found or not verified!"),
        Err(e) => {
            tracing::error!("NGO lookup failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response();
        }
    };

    match db::list_stories_for_ngo(&state.db, ngo.id).await {
        Ok(stories) => flash.page(views::ngo_details(flash.message(), &ngo, &stories)),
        Err(e) => {
            tracing::error!("Story query failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}
