use sqlx::SqlitePool;

/// (name, category, last_cooked, times_cooked)
pub const SEED_MEALS: [(&str, &str, &str, i64); 10] = [
    ("Kottbullar med potatismos", "meat", "2026-01-02", 15),
    ("Pannbiff med loksas", "meat", "2026-01-19", 8),
    ("Falukorv i ugn", "meat", "2026-01-11", 12),
    ("Raggmunk med flask", "meat", "2025-12-21", 6),
    ("Ugnsbakad lax med potatis", "fish", "2026-01-27", 10),
    ("Fiskgratang", "fish", "2026-02-03", 5),
    ("Artsoppa och pannkakor", "meat", "2026-01-30", 4),
    ("Vegetarisk pytt i panna", "vegetarian", "2026-01-24", 7),
    ("Kikartsgryta med ris", "vegetarian", "2026-01-08", 9),
    ("Rotfruktssoppa med brod", "vegetarian", "2025-12-28", 11),
];

/// Inserts the seed meals when the table is empty. Returns whether anything
/// was written.
pub async fn seed_if_empty(db: &SqlitePool) -> Result<bool, sqlx::Error> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM meals")
        .fetch_one(db)
        .await?;

    if count > 0 {
        return Ok(false);
    }

    let mut tx = db.begin().await?;
    for (name, category, last_cooked, times_cooked) in SEED_MEALS {
        sqlx::query(
            r#"
            INSERT INTO meals (name, category, last_cooked, times_cooked)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(name)
        .bind(category)
        .bind(last_cooked)
        .bind(times_cooked)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    Ok(true)
}
