use shared::models::Member;
use sqlx::PgPool;

const MEMBER_COLUMNS: &str = "id, name, username, image, role, created_at";

/// Full user row, including the password hash
#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub hashed_password: String,
    pub image: Option<String>,
    pub role: String,
    pub created_at: i64,
}

impl UserRow {
    pub fn into_member(self) -> Member {
        Member {
            id: self.id,
            name: self.name,
            username: self.username,
            image: self.image,
            role: self.role,
            created_at: self.created_at,
        }
    }
}

pub struct NewUser<'a> {
    pub name: &'a str,
    pub username: &'a str,
    pub hashed_password: &'a str,
    pub image: Option<&'a str>,
    pub role: &'a str,
}

pub async fn create(pool: &PgPool, user: &NewUser<'_>, now: i64) -> Result<Member, sqlx::Error> {
    sqlx::query_as(&format!(
        "INSERT INTO users (name, username, hashed_password, image, role, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {MEMBER_COLUMNS}"
    ))
    .bind(user.name)
    .bind(user.username)
    .bind(user.hashed_password)
    .bind(user.image)
    .bind(user.role)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Insert the admin account unless the username is already taken.
/// Returns `true` when a row was created.
pub async fn seed_admin(
    pool: &PgPool,
    username: &str,
    hashed_password: &str,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO users (name, username, hashed_password, role, created_at)
         VALUES ('Admin', $1, $2, 'admin', $3)
         ON CONFLICT (username) DO NOTHING",
    )
    .bind(username)
    .bind(hashed_password)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn find_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_member(pool: &PgPool, id: i64) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {MEMBER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Household roster in registration order
pub async fn list(pool: &PgPool) -> Result<Vec<Member>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {MEMBER_COLUMNS} FROM users ORDER BY id"))
        .fetch_all(pool)
        .await
}

/// Whether `username` belongs to someone other than `except_id`
pub async fn username_taken(
    pool: &PgPool,
    username: &str,
    except_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM users WHERE username = $1 AND ($2::BIGINT IS NULL OR id <> $2)")
            .bind(username)
            .bind(except_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.is_some())
}

/// Write profile fields and, when given, a new password hash in one transaction.
/// Returns `None` (nothing written) when the user does not exist.
pub async fn update(
    pool: &PgPool,
    member: &Member,
    new_hashed_password: Option<&str>,
) -> Result<Option<Member>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    if let Some(hash) = new_hashed_password {
        sqlx::query("UPDATE users SET hashed_password = $1 WHERE id = $2")
            .bind(hash)
            .bind(member.id)
            .execute(&mut *tx)
            .await?;
    }

    let updated: Option<Member> = sqlx::query_as(&format!(
        "UPDATE users SET name = $1, username = $2, image = $3, role = $4
         WHERE id = $5
         RETURNING {MEMBER_COLUMNS}"
    ))
    .bind(&member.name)
    .bind(&member.username)
    .bind(&member.image)
    .bind(&member.role)
    .bind(member.id)
    .fetch_optional(&mut *tx)
    .await?;

    if updated.is_some() {
        tx.commit().await?;
    }
    Ok(updated)
}
