use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account role. Donors give money, receivers run an NGO.
#[derive(Serialize, Deserialize, sqlx::Type, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Donor,
    Receiver,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Donor => "donor",
            Role::Receiver => "receiver",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "donor" => Some(Role::Donor),
            "receiver" => Some(Role::Receiver),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    /// Argon2id PHC string, never exposed to views.
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone)]
pub struct Ngo {
    pub id: i64,
    pub user_id: i64,
    pub org_name: String,
    pub location: String,
    pub contact_number: String,
    pub email: String,
    pub website: Option<String>,
    pub bank_name: String,
    pub account_number: String,
    pub upi_id: Option<String>,
    pub registry_id: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone)]
pub struct Donation {
    pub id: i64,
    pub donor_email: String,
    pub ngo_id: i64,
    pub amount: f64,
    pub payment_method: String,
    pub transaction_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Verified NGO as shown on the donor dashboard, with its completed-donation
/// count folded in by a subquery.
#[derive(Serialize, FromRow, Debug, Clone)]
pub struct NgoSummary {
    pub id: i64,
    pub org_name: String,
    pub location: String,
    pub website: Option<String>,
    pub donation_count: i64,
}

/// Donation line on the NGO dashboard.
#[derive(Serialize, FromRow, Debug, Clone)]
pub struct DonationSummary {
    pub donor_email: String,
    pub amount: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Approved story joined to the NGO that posted it.
#[derive(Serialize, FromRow, Debug, Clone)]
pub struct StoryWithOrg {
    pub title: String,
    pub content: String,
    pub org_name: String,
    pub created_at: DateTime<Utc>,
}

/// Active urgent requirement joined to the NGO that posted it.
#[derive(Serialize, FromRow, Debug, Clone)]
pub struct RequirementWithOrg {
    pub id: i64,
    pub ngo_id: i64,
    pub title: String,
    pub description: String,
    pub amount_needed: f64,
    pub amount_raised: f64,
    pub deadline: Option<NaiveDate>,
    pub org_name: String,
}
