use shared::models::Product;
use sqlx::PgPool;

/// Catalog, newest first, optionally restricted to one category
pub async fn list(pool: &PgPool, category: Option<&str>) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM products
         WHERE ($1::TEXT IS NULL OR category = $1)
         ORDER BY created_at DESC, id DESC",
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Whether `name` belongs to a product other than `except_id`
pub async fn name_taken(
    pool: &PgPool,
    name: &str,
    except_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM products WHERE name = $1 AND ($2::BIGINT IS NULL OR id <> $2)")
            .bind(name)
            .bind(except_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.is_some())
}

pub async fn create(
    pool: &PgPool,
    name: &str,
    image: Option<&str>,
    category: Option<&str>,
    now: i64,
) -> Result<Product, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO products (name, image, category, created_at)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(name)
    .bind(image)
    .bind(category)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    name: &str,
    image: Option<&str>,
    category: Option<&str>,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE products SET name = $1, image = $2, category = $3
         WHERE id = $4
         RETURNING *",
    )
    .bind(name)
    .bind(image)
    .bind(category)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn has_purchases(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM purchases WHERE product_id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
