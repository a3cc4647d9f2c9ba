use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

/// true  => email already has an account
/// false => email AVAILABLE (usually we store only taken)
pub static EMAIL_CACHE: Lazy<Cache<String, bool>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(500_000) // tune based on memory
        .time_to_live(Duration::from_secs(86400)) // 24h TTL
        .build()
});

/// Mark a single email as registered
pub async fn mark_taken(email: &str) {
    EMAIL_CACHE.insert(email.trim().to_lowercase(), true).await;
}

/// Check if an email is registered
pub async fn is_taken(email: &str) -> bool {
    EMAIL_CACHE
        .get(&email.trim().to_lowercase())
        .await
        .unwrap_or(false)
}

/// Batch mark emails as registered
async fn batch_mark(emails: &[String]) {
    let futures: Vec<_> = emails
        .iter()
        .map(|e| EMAIL_CACHE.insert(e.trim().to_lowercase(), true))
        .collect();

    // Await all insertions concurrently
    futures::future::join_all(futures).await;
}

/// Load only RECENTLY active accounts into the in-memory cache (batched)
pub async fn warmup_email_cache(pool: &MySqlPool, days: u32, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (String,)>(
        r#"
        SELECT email
        FROM users
        WHERE last_login_at >= NOW() - INTERVAL ? DAY
        ORDER BY last_login_at DESC
        "#,
    )
    .bind(days)
    .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total_count = 0usize;

    while let Some(row) = stream.next().await {
        let (email,) = row?;
        batch.push(email);
        total_count += 1;

        if batch.len() >= batch_size {
            batch_mark(&batch).await;
            batch.clear();
        }
    }

    // Insert any remaining emails
    if !batch.is_empty() {
        batch_mark(&batch).await;
    }

    log::info!(
        "Email cache warmup complete: {} recent accounts (last {} days)",
        total_count,
        days
    );

    Ok(())
}
