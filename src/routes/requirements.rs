use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::flash::{self, Flash};
use crate::{db, views, AppState};

#[derive(Deserialize)]
pub struct RequirementForm {
    pub title: String,
    pub description: String,
    pub amount_needed: f64,
    pub deadline: Option<String>,
}

pub async fn add_requirement_form(_user: AuthenticatedUser, flash: Flash) -> Response {
    flash.page(views::add_urgent_requirement(flash.message()))
}

pub async fn process_requirement(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Form(form): Form<RequirementForm>,
) -> Response {
    let ngo = match db::find_ngo_by_user(&state.db, user.id).await {
        Ok(ngo) => ngo,
        Err(e) => {
            tracing::error!("NGO lookup failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response();
        }
    };

    let Some(ngo) = ngo else {
        return flash::redirect(
            "/ngo_dashboard",
            "Please complete your NGO registration first.",
        );
    };

    // An empty or malformed date field means no deadline.
    let deadline = form
        .deadline
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok());

    match db::create_urgent_requirement(
        &state.db,
        ngo.id,
        &form.title,
        &form.description,
        form.amount_needed,
        deadline,
        Utc::now(),
    )
    .await
    {
        Ok(_) => flash::redirect("/ngo_dashboard", "Urgent requirement posted successfully!"),
        Err(e) => {
            tracing::error!("Requirement insert failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}
