use donate_secure::db;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if it exists
    dotenvy::dotenv().ok();

    println!("Starting database migration...");

    let pool = db::init_pool().await?;

    println!("Applying schema...");
    db::init_schema(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    println!("Seeding sample data (no-op on a populated store)...");
    db::seed_sample_data(&pool).await?;

    println!("Migration complete.");
    Ok(())
}
