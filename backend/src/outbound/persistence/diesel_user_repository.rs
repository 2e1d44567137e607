//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{SteamId, User, UserId};

use super::models::{NewUserRow, UserProfileChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain user repository errors.
fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to domain user repository errors.
fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => UserPersistenceError::query("database error"),
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        _ => UserPersistenceError::query("database error"),
    }
}

/// Convert a database row to a domain [`User`].
///
/// Rows were validated when written; a failure here means the table holds
/// data the domain can no longer represent.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let id = UserId::new(row.id)
        .map_err(|err| UserPersistenceError::query(format!("corrupt user row: {err}")))?;
    let steam_id = SteamId::new(row.steam_id)
        .map_err(|err| UserPersistenceError::query(format!("corrupt user row: {err}")))?;
    Ok(User::reconstitute(
        id,
        steam_id,
        row.username,
        row.avatar,
        row.created_at,
        row.updated_at,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::id.eq(id.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_by_steam_id(
        &self,
        steam_id: &SteamId,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::steam_id.eq(steam_id.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn create_new(
        &self,
        steam_id: SteamId,
        username: &str,
        avatar: &str,
    ) -> Result<User, UserPersistenceError> {
        let user = User::create(UserId::random(), steam_id, username, avatar)
            .map_err(|err| UserPersistenceError::query(format!("invalid user fields: {err}")))?;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewUserRow {
            id: user.id().as_str(),
            steam_id: user.steam_id().as_str(),
            username: user.username(),
            avatar: user.avatar(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        };
        diesel::insert_into(users::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(user)
    }

    async fn save(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewUserRow {
            id: user.id().as_str(),
            steam_id: user.steam_id().as_str(),
            username: user.username(),
            avatar: user.avatar(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        };
        let changeset = UserProfileChangeset {
            username: user.username(),
            avatar: user.avatar(),
            updated_at: user.updated_at(),
        };
        diesel::insert_into(users::table)
            .values(&new_row)
            .on_conflict(users::id)
            .do_update()
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn exists(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            users::table.filter(users::id.eq(id.as_str())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for error and row mapping; query execution is exercised by
    //! integration environments with a live database.
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let err = map_pool_error(PoolError::checkout("connection refused"));
        assert_eq!(err, UserPersistenceError::connection("connection refused"));
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        let err = map_diesel_error(diesel::result::Error::NotFound);
        assert_eq!(err, UserPersistenceError::query("record not found"));
    }

    #[rstest]
    fn valid_rows_reconstitute() {
        let now = Utc::now();
        let row = UserRow {
            id: "u-1".to_owned(),
            steam_id: "76561198012345678".to_owned(),
            username: "gaben".to_owned(),
            avatar: String::new(),
            created_at: now,
            updated_at: now,
        };
        let user = row_to_user(row).expect("valid row maps");
        assert_eq!(user.id().as_str(), "u-1");
        assert_eq!(user.username(), "gaben");
    }

    #[rstest]
    fn corrupt_rows_surface_query_errors() {
        let now = Utc::now();
        let row = UserRow {
            id: String::new(),
            steam_id: "76561198012345678".to_owned(),
            username: "gaben".to_owned(),
            avatar: String::new(),
            created_at: now,
            updated_at: now,
        };
        let err = row_to_user(row).expect_err("corrupt row must fail");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }
}
