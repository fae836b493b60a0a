use color_eyre::eyre::eyre;
use secrecy::{ExposeSecret, Secret};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::domain::{
    Email, Group, Role, User, UserId, UserProfile, UserStore, UserStoreError,
};

pub struct PostgresUserStore {
    pool: PgPool,
    group: Group,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool, group: Group) -> Self {
        Self { pool, group }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    enabled: bool,
    roles: Json<Vec<Role>>,
    profile: Json<UserProfile>,
}

impl TryFrom<UserRow> for User {
    type Error = UserStoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId::new(row.id),
            username: row.username,
            email: Email::parse(Secret::new(row.email))
                .map_err(UserStoreError::UnexpectedError)?,
            enabled: row.enabled,
            roles: row.roles.0,
            profile: row.profile.0,
        })
    }
}

const USER_COLUMNS: &str = "id, username, email, enabled, roles, profile";

#[async_trait::async_trait]
impl UserStore for PostgresUserStore {
    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    async fn add_user(&self, user: User) -> Result<(), UserStoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, group_name, username, email, enabled, roles, profile)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id.as_ref())
        .bind(self.group.as_ref())
        .bind(&user.username)
        .bind(user.email.as_ref().expose_secret())
        .bind(user.enabled)
        .bind(Json(&user.roles))
        .bind(Json(&user.profile))
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                UserStoreError::UserAlreadyExists
            }
            err => UserStoreError::UnexpectedError(eyre!(err)),
        })?;
        Ok(())
    }

    #[tracing::instrument(name = "Retrieving user from PostgreSQL", skip_all)]
    async fn get_user(&self, user_id: &UserId) -> Result<User, UserStoreError> {
        let row: UserRow = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND group_name = $2"
        ))
        .bind(user_id.as_ref())
        .bind(self.group.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                UserStoreError::UserNotFound(*user_id.as_ref())
            }
            err => UserStoreError::UnexpectedError(eyre!(err)),
        })?;

        row.try_into()
    }

    #[tracing::instrument(name = "Retrieving users from PostgreSQL", skip_all)]
    async fn find_users_by_ids(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<User>, UserStoreError> {
        let ids: Vec<Uuid> = user_ids.iter().map(|id| *id.as_ref()).collect();
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE id = ANY($1) AND group_name = $2"
        ))
        .bind(&ids)
        .bind(self.group.as_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?;

        rows.into_iter().map(User::try_from).collect()
    }

    #[tracing::instrument(
        name = "Retrieving user by username or email from PostgreSQL",
        skip_all
    )]
    async fn find_by_username_or_email(
        &self,
        username_or_email: &str,
    ) -> Result<User, UserStoreError> {
        let row: UserRow = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE (username = $1 OR email = $1) AND group_name = $2"
        ))
        .bind(username_or_email)
        .bind(self.group.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => UserStoreError::UserNotFound(Uuid::nil()),
            err => UserStoreError::UnexpectedError(eyre!(err)),
        })?;

        row.try_into()
    }
}
