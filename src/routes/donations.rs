use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::flash::{self, Flash};
use crate::{db, views, AppState};

#[derive(Deserialize)]
pub struct DonationForm {
    pub ngo_id: i64,
    pub amount: f64,
    pub payment_method: String,
}

pub async fn donor_dashboard(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    flash: Flash,
) -> Response {
    match db::list_verified_ngos(&state.db).await {
        Ok(ngos) => flash.page(views::donor_dashboard(flash.message(), &ngos)),
        Err(e) => {
            tracing::error!("NGO query failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn donate_form(
    Path(ngo_id): Path<i64>,
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    flash: Flash,
) -> Response {
    match db::find_verified_ngo(&state.db, ngo_id).await {
        Ok(Some(ngo)) => flash.page(views::donate(flash.message(), &ngo)),
        Ok(None) => flash::redirect("/donor_dashboard", "NGO not found!"),
        Err(e) => {
            tracing::error!("NGO lookup failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn process_donation(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Form(form): Form<DonationForm>,
) -> Response {
    // The target must still exist and be verified at write time; the form
    // page check alone would let a stale submission through.
    match db::find_verified_ngo(&state.db, form.ngo_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return flash::redirect("/donor_dashboard", "NGO not found!"),
        Err(e) => {
            tracing::error!("NGO lookup failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response();
        }
    }

    let transaction_id = Uuid::new_v4().to_string();

    match db::record_donation(
        &state.db,
        &user.email,
        form.ngo_id,
        form.amount,
        &form.payment_method,
        &transaction_id,
        Utc::now(),
    )
    .await
    {
        Ok(_) => flash::redirect(
            "/donor_dashboard",
            &format!(
                "Donation of ₹{} completed successfully! Transaction ID: {}",
                form.amount, transaction_id
            ),
        ),
        Err(e) => {
            tracing::error!("Donation insert failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}
