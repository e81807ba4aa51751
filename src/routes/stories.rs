use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use chrono::Utc;
use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::flash::{self, Flash};
use crate::{db, views, AppState};

#[derive(Deserialize)]
pub struct StoryForm {
    pub title: String,
    pub content: String,
}

pub async fn add_story_form(_user: AuthenticatedUser, flash: Flash) -> Response {
    flash.page(views::add_story(flash.message()))
}

pub async fn process_story(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Form(form): Form<StoryForm>,
) -> Response {
    let ngo = match db::find_ngo_by_user(&state.db, user.id).await {
        Ok(ngo) => ngo,
        Err(e) => {
            tracing::error!("NGO lookup failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response();
        }
    };

    match ngo {
        Some(ngo) => {
            match db::create_story(&state.db, ngo.id, &form.title, &form.content, Utc::now()).await
            {
                Ok(_) => flash::redirect("/ngo_dashboard", "Story submitted successfully!"),
                Err(e) => {
                    tracing::error!("Story insert failed: {}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
                }
            }
        }
        None => flash::redirect(
            "/ngo_dashboard",
            "Please complete your NGO registration first.",
        ),
    }
}
