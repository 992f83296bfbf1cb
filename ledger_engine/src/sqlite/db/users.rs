use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewUser, User},
    traits::LedgerError,
};

pub async fn insert_user(user: NewUser, conn: &mut SqliteConnection) -> Result<User, LedgerError> {
    let user: User = sqlx::query_as("INSERT INTO users (name, role, producer_code) VALUES ($1, $2, $3) RETURNING *")
        .bind(user.name)
        .bind(user.role)
        .bind(user.producer_code)
        .fetch_one(conn)
        .await?;
    debug!("👤️ User #{} ({}) created with role {}", user.id, user.name, user.role);
    Ok(user)
}

pub async fn fetch_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, LedgerError> {
    let user = sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(user_id).fetch_optional(conn).await?;
    Ok(user)
}

/// Takes the write lock for the rest of the current atomic unit and returns the user as it stands under that lock.
///
/// Like [`super::wallets::lock_wallet_for_user`], this must be the first statement of the unit.
pub async fn lock_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, LedgerError> {
    let user = sqlx::query_as("UPDATE users SET name = name WHERE id = $1 RETURNING *")
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    Ok(user)
}
