use shared::client::ExpiredPurchase;
use shared::models::{MemberRef, ProductRef, Purchase, PurchaseDetail};
use sqlx::PgPool;

const DETAIL_SELECT: &str = "SELECT p.id, p.user_id, p.product_id, p.price, p.purchase_date, p.created_at,
        u.name AS user_name, u.username AS user_username, u.image AS user_image,
        pr.name AS product_name, pr.category AS product_category, pr.image AS product_image
 FROM purchases p
 JOIN users u ON u.id = p.user_id
 JOIN products pr ON pr.id = p.product_id";

#[derive(sqlx::FromRow)]
struct DetailRow {
    id: i64,
    user_id: i64,
    product_id: i64,
    price: Option<f64>,
    purchase_date: i64,
    created_at: i64,
    user_name: String,
    user_username: String,
    user_image: Option<String>,
    product_name: String,
    product_category: Option<String>,
    product_image: Option<String>,
}

impl From<DetailRow> for PurchaseDetail {
    fn from(r: DetailRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            product_id: r.product_id,
            price: r.price,
            purchase_date: r.purchase_date,
            created_at: r.created_at,
            user: MemberRef {
                id: r.user_id,
                name: r.user_name,
                username: r.user_username,
                image: r.user_image,
            },
            product: ProductRef {
                id: r.product_id,
                name: r.product_name,
                category: r.product_category,
                image: r.product_image,
            },
        }
    }
}

/// History with embedded member/product, newest purchase first
pub async fn list(pool: &PgPool, user_id: Option<i64>) -> Result<Vec<PurchaseDetail>, sqlx::Error> {
    let rows: Vec<DetailRow> = sqlx::query_as(&format!(
        "{DETAIL_SELECT}
         WHERE ($1::BIGINT IS NULL OR p.user_id = $1)
         ORDER BY p.purchase_date DESC, p.id DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(PurchaseDetail::from).collect())
}

pub async fn find_detail(pool: &PgPool, id: i64) -> Result<Option<PurchaseDetail>, sqlx::Error> {
    let row: Option<DetailRow> = sqlx::query_as(&format!("{DETAIL_SELECT} WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(PurchaseDetail::from))
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Purchase>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM purchases WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Record a purchase dated `now`
pub async fn create(
    pool: &PgPool,
    user_id: i64,
    product_id: i64,
    price: Option<f64>,
    now: i64,
) -> Result<Purchase, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO purchases (user_id, product_id, price, purchase_date, created_at)
         VALUES ($1, $2, $3, $4, $4)
         RETURNING *",
    )
    .bind(user_id)
    .bind(product_id)
    .bind(price)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM purchases WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[derive(sqlx::FromRow)]
struct ExpiredRow {
    id: i64,
    user_name: String,
    user_username: String,
    product_name: String,
    product_category: Option<String>,
    purchase_date: i64,
    price: Option<f64>,
}

/// Purchases dated strictly before `cutoff`, oldest first
pub async fn list_before(pool: &PgPool, cutoff: i64) -> Result<Vec<ExpiredPurchase>, sqlx::Error> {
    let rows: Vec<ExpiredRow> = sqlx::query_as(
        "SELECT p.id, u.name AS user_name, u.username AS user_username,
                pr.name AS product_name, pr.category AS product_category,
                p.purchase_date, p.price
         FROM purchases p
         JOIN users u ON u.id = p.user_id
         JOIN products pr ON pr.id = p.product_id
         WHERE p.purchase_date < $1
         ORDER BY p.purchase_date, p.id",
    )
    .bind(cutoff)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| ExpiredPurchase {
            id: r.id,
            user: r.user_name,
            username: r.user_username,
            product: r.product_name,
            category: r.product_category,
            purchase_date: r.purchase_date,
            price: r.price,
        })
        .collect())
}

pub async fn delete_before(pool: &PgPool, cutoff: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM purchases WHERE purchase_date < $1")
        .bind(cutoff)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
