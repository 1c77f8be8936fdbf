//! PostgreSQL-backed `UserRepository` adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{DisplayName, EmailAddress, IdentityId, User, UserId, UserProfile, UserRole};

use super::diesel_error_mapping::{
    constraint_name, is_unique_violation, map_diesel_error, map_pool_error,
};
use super::models::{NewUserRow, UserProfileUpdate, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error, operation: &'static str) -> UserPersistenceError {
    if is_unique_violation(&error) {
        let constraint = constraint_name(&error).unwrap_or_else(|| "users".to_owned());
        return UserPersistenceError::duplicate(constraint);
    }
    map_diesel_error(
        error,
        operation,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

/// Rebuild a domain user, rejecting rows that no longer satisfy the value
/// constructors.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let invalid = |err: crate::domain::UserValidationError| {
        UserPersistenceError::query(format!("stored user {} is invalid: {err}", row.id))
    };
    Ok(User {
        id: UserId::from_uuid(row.id),
        identity_id: IdentityId::new(row.identity_id.as_str()).map_err(invalid)?,
        email: EmailAddress::new(row.email.as_str()).map_err(invalid)?,
        display_name: DisplayName::new(row.display_name.as_str()).map_err(invalid)?,
        role: row.role.parse::<UserRole>().map_err(invalid)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
        deleted_at: row.deleted_at,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_identity_id(
        &self,
        identity_id: &IdentityId,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        let row = users::table
            .filter(users::identity_id.eq(identity_id.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_error(err, "find user"))?;

        row.map(row_to_user).transpose()
    }

    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        let row = NewUserRow {
            id: *user.id.as_uuid(),
            identity_id: user.identity_id.as_ref(),
            email: user.email.as_ref(),
            display_name: user.display_name.as_ref(),
            role: user.role.as_str(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| map_error(err, "insert user"))?;

        Ok(())
    }

    async fn update_profile(
        &self,
        profile: &UserProfile,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        let changes = UserProfileUpdate {
            email: profile.email.as_ref(),
            display_name: profile.display_name.as_ref(),
            role: profile.role.as_str(),
            updated_at,
        };

        let affected = diesel::update(
            users::table.filter(users::identity_id.eq(profile.identity_id.as_ref())),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(|err| map_error(err, "update user"))?;

        Ok(affected > 0)
    }

    async fn soft_delete(
        &self,
        identity_id: &IdentityId,
        deleted_at: DateTime<Utc>,
    ) -> Result<bool, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        let affected = diesel::update(users::table.filter(users::identity_id.eq(identity_id.as_ref())))
            .set((
                users::deleted_at.eq(Some(deleted_at)),
                users::updated_at.eq(deleted_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(|err| map_error(err, "soft delete user"))?;

        Ok(affected > 0)
    }

    async fn hard_delete(&self, identity_id: &IdentityId) -> Result<bool, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        let affected = diesel::delete(users::table.filter(users::identity_id.eq(identity_id.as_ref())))
            .execute(&mut conn)
            .await
            .map_err(|err| map_error(err, "delete user"))?;

        Ok(affected > 0)
    }
}
