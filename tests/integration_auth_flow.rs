mod support;

use axum::http::StatusCode;
use support::*;

#[tokio::test]
async fn registering_twice_with_one_email_is_rejected() {
    let state = test_state().await;

    let first = send(
        &state,
        post_form(
            "/process_register",
            "email=donor%40example.com&password=password123&role=donor",
            None,
        ),
    )
    .await;
    assert_redirects_to(&first, "/donor_dashboard");
    assert_eq!(
        flash_message(&first).as_deref(),
        Some("Registration successful!")
    );
    assert!(set_cookie(&first, "session").is_some());

    let second = send(
        &state,
        post_form(
            "/process_register",
            "email=donor%40example.com&password=different&role=donor",
            None,
        ),
    )
    .await;
    assert_redirects_to(&second, "/register/donor");
    assert_eq!(
        flash_message(&second).as_deref(),
        Some("Email already exists!")
    );
    assert!(set_cookie(&second, "session").is_none());

    assert_eq!(count(&state, "users").await, 1);
}

#[tokio::test]
async fn receiver_registration_lands_on_ngo_registration() {
    let state = test_state().await;

    let response = send(
        &state,
        post_form(
            "/process_register",
            "email=ngo%40example.com&password=password123&role=receiver",
            None,
        ),
    )
    .await;
    assert_redirects_to(&response, "/ngo_registration");
}

#[tokio::test]
async fn login_succeeds_with_correct_credentials_only() {
    let state = test_state().await;
    register(&state, "donor@example.com", "donor").await;

    let good = send(
        &state,
        post_form(
            "/process_login",
            "email=donor%40example.com&password=password123",
            None,
        ),
    )
    .await;
    assert_redirects_to(&good, "/donor_dashboard");
    assert!(set_cookie(&good, "session").is_some());
    assert_eq!(flash_message(&good).as_deref(), Some("Login successful!"));

    let bad_password = send(
        &state,
        post_form(
            "/process_login",
            "email=donor%40example.com&password=wrong",
            None,
        ),
    )
    .await;
    assert_redirects_to(&bad_password, "/login");
    assert!(set_cookie(&bad_password, "session").is_none());
    assert_eq!(
        flash_message(&bad_password).as_deref(),
        Some("Invalid email or password!")
    );

    // Unknown account gets the same generic answer.
    let unknown = send(
        &state,
        post_form(
            "/process_login",
            "email=nobody%40example.com&password=password123",
            None,
        ),
    )
    .await;
    assert_redirects_to(&unknown, "/login");
    assert_eq!(
        flash_message(&unknown).as_deref(),
        Some("Invalid email or password!")
    );
}

#[tokio::test]
async fn login_session_carries_the_stored_role() {
    let state = test_state().await;
    register(&state, "ngo@example.com", "receiver").await;

    let response = send(
        &state,
        post_form(
            "/process_login",
            "email=ngo%40example.com&password=password123",
            None,
        ),
    )
    .await;
    // A receiver session is routed to the NGO dashboard, not the donor one.
    assert_redirects_to(&response, "/ngo_dashboard");
}

#[tokio::test]
async fn protected_routes_redirect_anonymous_sessions_to_login() {
    let state = test_state().await;

    for uri in ["/donor_dashboard", "/ngo_dashboard", "/ngo_details/1"] {
        let response = send(&state, get(uri, None)).await;
        assert_redirects_to(&response, "/login");
        assert_eq!(
            flash_message(&response).as_deref(),
            Some("Please log in to access this page."),
            "unexpected notice for {uri}"
        );
    }
}

#[tokio::test]
async fn wrong_role_is_turned_away_at_the_gate() {
    let state = test_state().await;
    let receiver = register(&state, "ngo@example.com", "receiver").await;
    let donor = register(&state, "donor@example.com", "donor").await;

    let response = send(&state, get("/donor_dashboard", Some(&receiver))).await;
    assert_redirects_to(&response, "/");
    assert_eq!(flash_message(&response).as_deref(), Some("Access denied!"));

    let response = send(&state, get("/add_story", Some(&donor))).await;
    assert_redirects_to(&response, "/");
    assert_eq!(flash_message(&response).as_deref(), Some("Access denied!"));
}

#[tokio::test]
async fn logout_expires_the_session_cookie() {
    let state = test_state().await;
    let session = register(&state, "donor@example.com", "donor").await;

    let response = send(&state, get("/logout", Some(&session))).await;
    assert_redirects_to(&response, "/");
    assert_eq!(
        flash_message(&response).as_deref(),
        Some("You have been logged out successfully.")
    );
    // The session cookie is reset to empty.
    assert_eq!(set_cookie(&response, "session").as_deref(), Some("session="));
}

#[tokio::test]
async fn flash_notice_shows_once_then_clears() {
    let state = test_state().await;

    let redirect = send(
        &state,
        post_form(
            "/process_login",
            "email=nobody%40example.com&password=x",
            None,
        ),
    )
    .await;
    let flash_cookie = set_cookie(&redirect, "flash").expect("flash cookie");

    let page = send(&state, get("/login", Some(&flash_cookie))).await;
    assert_eq!(page.status(), StatusCode::OK);
    // Rendering the notice also expires the cookie.
    assert_eq!(set_cookie(&page, "flash").as_deref(), Some("flash="));
    let html = body_text(page).await;
    assert!(html.contains("Invalid email or password!"));
}
