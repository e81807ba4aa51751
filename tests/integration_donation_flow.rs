mod support;

use chrono::Utc;
use donate_secure::db::{self, models::Donation};
use support::*;

async fn seed_ngo(state: &donate_secure::AppState, org_name: &str, verified: bool) -> i64 {
    let now = Utc::now();
    let owner = db::create_user(
        &state.db,
        &format!("{}@example.com", org_name.to_lowercase().replace(' ', "-")),
        "unused-hash",
        donate_secure::db::models::Role::Receiver,
        now,
    )
    .await
    .expect("create owner");

    db::create_ngo(
        &state.db,
        owner,
        org_name,
        "Mumbai, Maharashtra",
        "+91-9876543210",
        "contact@example.com",
        &None,
        "State Bank of India",
        "1234567890",
        &None,
        "MH/2020/0123456",
        verified,
        now,
    )
    .await
    .expect("create ngo")
}

#[tokio::test]
async fn donating_to_an_unverified_ngo_leaves_no_row() {
    let state = test_state().await;
    let ngo_id = seed_ngo(&state, "Shadow Org", false).await;
    let donor = register(&state, "donor@example.com", "donor").await;

    let response = send(
        &state,
        post_form(
            "/process_donation",
            &format!("ngo_id={}&amount=500&payment_method=upi", ngo_id),
            Some(&donor),
        ),
    )
    .await;
    assert_redirects_to(&response, "/donor_dashboard");
    assert_eq!(flash_message(&response).as_deref(), Some("NGO not found!"));
    assert_eq!(count(&state, "donations").await, 0);
}

#[tokio::test]
async fn donate_form_rejects_unknown_ngo() {
    let state = test_state().await;
    let donor = register(&state, "donor@example.com", "donor").await;

    let response = send(&state, get("/donate/999", Some(&donor))).await;
    assert_redirects_to(&response, "/donor_dashboard");
    assert_eq!(flash_message(&response).as_deref(), Some("NGO not found!"));
}

#[tokio::test]
async fn resubmitting_a_donation_records_two_distinct_transactions() {
    let state = test_state().await;
    let ngo_id = seed_ngo(&state, "Hope Foundation", true).await;
    let donor = register(&state, "donor@example.com", "donor").await;

    let body = format!("ngo_id={}&amount=750.5&payment_method=card", ngo_id);
    for _ in 0..2 {
        let response = send(&state, post_form("/process_donation", &body, Some(&donor))).await;
        assert_redirects_to(&response, "/donor_dashboard");
        let notice = flash_message(&response).expect("donation notice");
        assert!(notice.starts_with("Donation of ₹750.5 completed successfully!"));
    }

    let donations: Vec<Donation> = sqlx::query_as("SELECT * FROM donations ORDER BY id")
        .fetch_all(&state.db)
        .await
        .expect("list donations");
    assert_eq!(donations.len(), 2);
    assert_ne!(donations[0].transaction_id, donations[1].transaction_id);
    for donation in &donations {
        assert_eq!(donation.donor_email, "donor@example.com");
        assert_eq!(donation.ngo_id, ngo_id);
        assert_eq!(donation.amount, 750.5);
        assert_eq!(donation.status, "completed");
    }
}

#[tokio::test]
async fn donor_dashboard_lists_only_verified_ngos() {
    let state = test_state().await;
    seed_ngo(&state, "Hope Foundation", true).await;
    seed_ngo(&state, "Shadow Org", false).await;
    let donor = register(&state, "donor@example.com", "donor").await;

    let response = send(&state, get("/donor_dashboard", Some(&donor))).await;
    let html = body_text(response).await;
    assert!(html.contains("Hope Foundation"));
    assert!(!html.contains("Shadow Org"));
}

#[tokio::test]
async fn completed_donations_count_toward_the_dashboard_summary() {
    let state = test_state().await;
    let ngo_id = seed_ngo(&state, "Hope Foundation", true).await;
    let donor = register(&state, "donor@example.com", "donor").await;

    let body = format!("ngo_id={}&amount=100&payment_method=upi", ngo_id);
    send(&state, post_form("/process_donation", &body, Some(&donor))).await;

    let response = send(&state, get("/donor_dashboard", Some(&donor))).await;
    let html = body_text(response).await;
    assert!(html.contains("1 donations"));
}
