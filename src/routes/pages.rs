use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::db::models::Role;
use crate::flash::Flash;
use crate::{db, views, AppState};

pub async fn index(State(state): State<AppState>, flash: Flash) -> Response {
    let stories = match db::list_approved_stories(&state.db, Some(3)).await {
        Ok(stories) => stories,
        Err(e) => {
            tracing::error!("Story query failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response();
        }
    };
    let requirements = match db::list_active_requirements(&state.db, Some(3)).await {
        Ok(requirements) => requirements,
        Err(e) => {
            tracing::error!("Requirement query failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response();
        }
    };

    flash.page(views::index(flash.message(), &stories, &requirements))
}

pub async fn about(flash: Flash) -> Response {
    flash.page(views::about(flash.message()))
}

pub async fn contact(flash: Flash) -> Response {
    flash.page(views::contact(flash.message()))
}

pub async fn choose_role(flash: Flash) -> Response {
    flash.page(views::choose_role(flash.message()))
}

pub async fn register_form(Path(role): Path<String>, flash: Flash) -> Response {
    match Role::parse(&role) {
        Some(role) => flash.page(views::register(flash.message(), role)),
        None => Redirect::to("/").into_response(),
    }
}

pub async fn login_form(flash: Flash) -> Response {
    flash.page(views::login(flash.message()))
}

pub async fn stories(State(state): State<AppState>, flash: Flash) -> Response {
    match db::list_approved_stories(&state.db, None).await {
        Ok(stories) => flash.page(views::stories(flash.message(), &stories)),
        Err(e) => {
            tracing::error!("Story query failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn urgent_requirements(State(state): State<AppState>, flash: Flash) -> Response {
    match db::list_active_requirements(&state.db, None).await {
        Ok(requirements) => flash.page(views::urgent_requirements(flash.message(), &requirements)),
        Err(e) => {
            tracing::error!("Requirement query failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, views::not_found()).into_response()
}
