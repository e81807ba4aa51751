use std::env;
use std::future::Future;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
    Form,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::db::models::Role;
use crate::flash;
use crate::AppState;

const SESSION_COOKIE_NAME: &str = "session";

/// Fallback secret for local development. Production refuses to start
/// without an explicit SESSION_SECRET (checked in main).
const DEV_SESSION_SECRET: &str = "dev-session-secret-change-in-production";

// Claims for the session token
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    role: Role,
    exp: usize,
}

/// Authenticated identity for the current request, decoded from the session
/// cookie. Handlers take this instead of reading ambient session state.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let user = authenticate(&parts.headers);
        async move {
            user.ok_or_else(|| flash::redirect("/login", "Please log in to access this page."))
        }
    }
}

/// Decode and validate the session cookie, if one is present.
fn authenticate(headers: &axum::http::HeaderMap) -> Option<AuthenticatedUser> {
    let token = flash::cookie_value(headers, SESSION_COOKIE_NAME)?;

    let mut validation = Validation::default();
    validation.validate_exp = true;

    let token_data = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(session_secret().as_ref()),
        &validation,
    )
    .ok()?;

    let id = token_data.claims.sub.parse::<i64>().ok()?;
    Some(AuthenticatedUser {
        id,
        email: token_data.claims.email,
        role: token_data.claims.role,
    })
}

pub fn session_secret() -> String {
    env::var("SESSION_SECRET").unwrap_or_else(|_| DEV_SESSION_SECRET.to_string())
}

fn create_session_token(user_id: i64, email: &str, role: Role) -> anyhow::Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(1))
        .ok_or_else(|| anyhow::anyhow!("timestamp overflow"))?
        .timestamp();

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role,
        exp: expiration as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(session_secret().as_ref()),
    )?;
    Ok(token)
}

fn build_session_cookie(token: &str) -> String {
    let secure = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()) == "production";
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age=86400",
        SESSION_COOKIE_NAME, token
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn clear_session_cookie() -> String {
    let secure = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()) == "production";
    let mut cookie = format!(
        "{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0",
        SESSION_COOKIE_NAME
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn set_cookie(mut response: Response, cookie: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(cookie) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}

// ---- route gates ----------------------------------------------------------
//
// Role policy is declared once, at router construction: route groups are
// wrapped in exactly one of these layers. Handlers then only deal with an
// already-authorized AuthenticatedUser.

pub async fn require_session(req: Request<Body>, next: Next) -> Response {
    match authenticate(req.headers()) {
        Some(_) => next.run(req).await,
        None => flash::redirect("/login", "Please log in to access this page."),
    }
}

pub async fn require_donor(req: Request<Body>, next: Next) -> Response {
    gate(req, next, Role::Donor).await
}

pub async fn require_receiver(req: Request<Body>, next: Next) -> Response {
    gate(req, next, Role::Receiver).await
}

async fn gate(req: Request<Body>, next: Next, role: Role) -> Response {
    match authenticate(req.headers()) {
        Some(user) if user.role == role => next.run(req).await,
        Some(_) => flash::redirect("/", "Access denied!"),
        None => flash::redirect("/login", "Please log in to access this page."),
    }
}

// ---- password hashing -----------------------------------------------------

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

// ---- handlers -------------------------------------------------------------

#[derive(Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

fn dashboard_for(role: Role) -> &'static str {
    match role {
        Role::Donor => "/donor_dashboard",
        Role::Receiver => "/ngo_dashboard",
    }
}

pub async fn process_register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let password_hash = match hash_password(&form.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed: {}", e);
            return flash::redirect(
                &format!("/register/{}", form.role.as_str()),
                "Registration failed. Please try again.",
            );
        }
    };

    match crate::db::create_user(&state.db, &form.email, &password_hash, form.role, Utc::now())
        .await
    {
        Ok(user_id) => {
            let destination = match form.role {
                // A fresh receiver goes straight to NGO registration.
                Role::Receiver => "/ngo_registration",
                Role::Donor => dashboard_for(Role::Donor),
            };
            establish_session(user_id, &form.email, form.role, destination, "Registration successful!")
        }
        Err(e) if crate::db::is_unique_violation(&e) => flash::redirect(
            &format!("/register/{}", form.role.as_str()),
            "Email already exists!",
        ),
        Err(e) => {
            tracing::error!("User insert failed: {}", e);
            (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    }
}

pub async fn process_login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Response {
    let user = match crate::db::find_user_by_email(&state.db, &form.email).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("User lookup failed: {}", e);
            return (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "Database Error")
                .into_response();
        }
    };

    // Missing account and bad password get the same answer.
    match user {
        Some(user) if verify_password(&form.password, &user.password_hash) => establish_session(
            user.id,
            &user.email,
            user.role,
            dashboard_for(user.role),
            "Login successful!",
        ),
        _ => flash::redirect("/login", "Invalid email or password!"),
    }
}

pub async fn logout() -> Response {
    let response = flash::redirect("/", "You have been logged out successfully.");
    set_cookie(response, &clear_session_cookie())
}

fn establish_session(
    user_id: i64,
    email: &str,
    role: Role,
    destination: &str,
    message: &str,
) -> Response {
    match create_session_token(user_id, email, role) {
        Ok(token) => {
            let response = flash::redirect(destination, message);
            set_cookie(response, &build_session_cookie(&token))
        }
        Err(e) => {
            tracing::error!("Session token creation failed: {}", e);
            flash::redirect("/login", "Invalid email or password!")
        }
    }
}
