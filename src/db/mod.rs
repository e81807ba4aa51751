use std::env;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

pub mod models;

use models::{DonationSummary, Ngo, NgoSummary, RequirementWithOrg, Role, StoryWithOrg, User};

pub type DbPool = SqlitePool;

const SCHEMA: &str = include_str!("../../migrations/init.sql");

/// Build the shared connection pool. The store is a single SQLite file;
/// `DATABASE_URL` overrides the default location.
pub async fn init_pool() -> anyhow::Result<DbPool> {
    let url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://donation_platform.db".to_string());

    let options = SqliteConnectOptions::from_str(&url)
        .map_err(|e| anyhow::anyhow!("Invalid DATABASE_URL: {}", e))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(std::time::Duration::from_secs(60))
        .connect_with(options)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create DB pool: {}", e))?;

    Ok(pool)
}

/// Apply the schema. Every statement is CREATE TABLE IF NOT EXISTS, so this
/// is safe to run on every startup.
pub async fn init_schema(pool: &DbPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA.split(';') {
        let sql = statement.trim();
        if sql.is_empty() {
            continue;
        }
        sqlx::query(sql).execute(pool).await?;
    }
    Ok(())
}

/// True when the error is the store rejecting a duplicate key, i.e. the
/// unique constraints on `users.email` and `donations.transaction_id`.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

// ---- users ----------------------------------------------------------------

pub async fn create_user(
    pool: &DbPool,
    email: &str,
    password_hash: &str,
    role: Role,
    now: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO users (email, password_hash, role, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn find_user_by_email(pool: &DbPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, email, password_hash, role, created_at FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn count_users(pool: &DbPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
}

// ---- ngos -----------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
pub async fn create_ngo(
    pool: &DbPool,
    user_id: i64,
    org_name: &str,
    location: &str,
    contact_number: &str,
    email: &str,
    website: &Option<String>,
    bank_name: &str,
    account_number: &str,
    upi_id: &Option<String>,
    registry_id: &str,
    is_verified: bool,
    now: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO ngos (user_id, org_name, location, contact_number, email, website, \
         bank_name, account_number, upi_id, registry_id, is_verified, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(org_name)
    .bind(location)
    .bind(contact_number)
    .bind(email)
    .bind(website)
    .bind(bank_name)
    .bind(account_number)
    .bind(upi_id)
    .bind(registry_id)
    .bind(is_verified)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn find_ngo_by_user(pool: &DbPool, user_id: i64) -> Result<Option<Ngo>, sqlx::Error> {
    sqlx::query_as::<_, Ngo>("SELECT * FROM ngos WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Fetch an NGO only if it has passed verification. Donation paths and the
/// public details page must never see unverified rows.
pub async fn find_verified_ngo(pool: &DbPool, ngo_id: i64) -> Result<Option<Ngo>, sqlx::Error> {
    sqlx::query_as::<_, Ngo>("SELECT * FROM ngos WHERE id = ? AND is_verified = TRUE")
        .bind(ngo_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_verified_ngos(pool: &DbPool) -> Result<Vec<NgoSummary>, sqlx::Error> {
    sqlx::query_as::<_, NgoSummary>(
        "SELECT id, org_name, location, website, \
         (SELECT COUNT(*) FROM donations WHERE ngo_id = ngos.id AND status = 'completed') \
         AS donation_count \
         FROM ngos WHERE is_verified = TRUE",
    )
    .fetch_all(pool)
    .await
}

// ---- donations ------------------------------------------------------------

pub async fn record_donation(
    pool: &DbPool,
    donor_email: &str,
    ngo_id: i64,
    amount: f64,
    payment_method: &str,
    transaction_id: &str,
    now: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO donations (donor_email, ngo_id, amount, payment_method, transaction_id, \
         status, created_at) VALUES (?, ?, ?, ?, ?, 'completed', ?)",
    )
    .bind(donor_email)
    .bind(ngo_id)
    .bind(amount)
    .bind(payment_method)
    .bind(transaction_id)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn list_donations_for_ngo(
    pool: &DbPool,
    ngo_id: i64,
) -> Result<Vec<DonationSummary>, sqlx::Error> {
    sqlx::query_as::<_, DonationSummary>(
        "SELECT donor_email, amount, status, created_at FROM donations \
         WHERE ngo_id = ? ORDER BY created_at DESC",
    )
    .bind(ngo_id)
    .fetch_all(pool)
    .await
}

// ---- stories --------------------------------------------------------------

pub async fn create_story(
    pool: &DbPool,
    ngo_id: i64,
    title: &str,
    content: &str,
    now: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    // Moderation is not built out; stories go live immediately.
    let result = sqlx::query(
        "INSERT INTO stories (ngo_id, title, content, is_approved, created_at) \
         VALUES (?, ?, ?, TRUE, ?)",
    )
    .bind(ngo_id)
    .bind(title)
    .bind(content)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn list_approved_stories(
    pool: &DbPool,
    limit: Option<i64>,
) -> Result<Vec<StoryWithOrg>, sqlx::Error> {
    let base = "SELECT s.title, s.content, n.org_name, s.created_at \
                FROM stories s JOIN ngos n ON s.ngo_id = n.id \
                WHERE s.is_approved = TRUE ORDER BY s.created_at DESC";
    match limit {
        Some(n) => {
            sqlx::query_as::<_, StoryWithOrg>(&format!("{base} LIMIT ?"))
                .bind(n)
                .fetch_all(pool)
                .await
        }
        None => sqlx::query_as::<_, StoryWithOrg>(base).fetch_all(pool).await,
    }
}

pub async fn list_stories_for_ngo(
    pool: &DbPool,
    ngo_id: i64,
) -> Result<Vec<StoryWithOrg>, sqlx::Error> {
    sqlx::query_as::<_, StoryWithOrg>(
        "SELECT s.title, s.content, n.org_name, s.created_at \
         FROM stories s JOIN ngos n ON s.ngo_id = n.id \
         WHERE s.ngo_id = ? AND s.is_approved = TRUE ORDER BY s.created_at DESC",
    )
    .bind(ngo_id)
    .fetch_all(pool)
    .await
}

pub async fn count_stories_for_ngo(pool: &DbPool, ngo_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM stories WHERE ngo_id = ?")
        .bind(ngo_id)
        .fetch_one(pool)
        .await
}

// ---- urgent requirements --------------------------------------------------

pub async fn create_urgent_requirement(
    pool: &DbPool,
    ngo_id: i64,
    title: &str,
    description: &str,
    amount_needed: f64,
    deadline: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO urgent_requirements (ngo_id, title, description, amount_needed, deadline, \
         is_active, created_at) VALUES (?, ?, ?, ?, ?, TRUE, ?)",
    )
    .bind(ngo_id)
    .bind(title)
    .bind(description)
    .bind(amount_needed)
    .bind(deadline)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn list_active_requirements(
    pool: &DbPool,
    limit: Option<i64>,
) -> Result<Vec<RequirementWithOrg>, sqlx::Error> {
    let base = "SELECT ur.id, ur.ngo_id, ur.title, ur.description, ur.amount_needed, \
                ur.amount_raised, ur.deadline, n.org_name \
                FROM urgent_requirements ur JOIN ngos n ON ur.ngo_id = n.id \
                WHERE ur.is_active = TRUE ORDER BY ur.deadline ASC";
    match limit {
        Some(n) => {
            sqlx::query_as::<_, RequirementWithOrg>(&format!("{base} LIMIT ?"))
                .bind(n)
                .fetch_all(pool)
                .await
        }
        None => {
            sqlx::query_as::<_, RequirementWithOrg>(base)
                .fetch_all(pool)
                .await
        }
    }
}

pub async fn count_active_requirements_for_ngo(
    pool: &DbPool,
    ngo_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM urgent_requirements WHERE ngo_id = ? AND is_active = TRUE",
    )
    .bind(ngo_id)
    .fetch_one(pool)
    .await
}

// ---- sample data ----------------------------------------------------------

/// Seed demo accounts and content on an empty store so the site is browsable
/// out of the box. No-op once any user exists.
pub async fn seed_sample_data(pool: &DbPool) -> anyhow::Result<()> {
    if count_users(pool).await? > 0 {
        return Ok(());
    }

    let now = Utc::now();
    let password_hash = crate::auth::hash_password("password123")
        .map_err(|e| anyhow::anyhow!("Failed to hash sample password: {}", e))?;

    create_user(pool, "donor@example.com", &password_hash, Role::Donor, now).await?;
    let receiver_id =
        create_user(pool, "ngo@example.com", &password_hash, Role::Receiver, now).await?;

    let ngo_id = create_ngo(
        pool,
        receiver_id,
        "Hope Foundation",
        "Mumbai, Maharashtra",
        "+91-9876543210",
        "ngo@example.com",
        &Some("https://hopefoundation.org".to_string()),
        "State Bank of India",
        "1234567890",
        &Some("hope@upi".to_string()),
        "MH/2020/0123456",
        true,
        now,
    )
    .await?;

    create_story(
        pool,
        ngo_id,
        "Provided Clean Water to 100 Families",
        "With the generous donations from our supporters, we were able to install 5 new water \
         purification systems in rural villages. This initiative has provided clean drinking \
         water to over 100 families, significantly reducing waterborne diseases in the community.",
        now,
    )
    .await?;

    create_urgent_requirement(
        pool,
        ngo_id,
        "Emergency Food Relief for Flood Victims",
        "Urgent need for food supplies for 200 families affected by recent floods. We need \
         immediate funds to purchase and distribute emergency food packets, clean water, and \
         basic necessities.",
        50000.0,
        NaiveDate::from_ymd_opt(2026, 12, 31),
        now,
    )
    .await?;

    Ok(())
}
