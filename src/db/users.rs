use crate::db::DbPool;
use crate::models::{NewUser, User};
use crate::schema::users;
use diesel::prelude::*;
use tracing::instrument;

pub struct UserRepository;

impl UserRepository {
    #[instrument(skip(pool, new_user), fields(email = %new_user.email))]
    pub async fn create_user(pool: &DbPool, new_user: NewUser) -> Result<User, anyhow::Error> {
        let mut conn = crate::db::get_connection(pool)?;

        let user = tokio::task::spawn_blocking(move || {
            conn.immediate_transaction::<_, diesel::result::Error, _>(|conn| {
                diesel::insert_into(users::table)
                    .values(&new_user)
                    .returning(User::as_returning())
                    .get_result(conn)
            })
        })
        .await??;

        Ok(user)
    }

    /// Exact match on both columns. Passwords are stored as given.
    #[instrument(skip(pool, password))]
    pub async fn find_by_credentials(
        pool: &DbPool,
        email: String,
        password: String,
    ) -> Result<Option<User>, anyhow::Error> {
        let mut conn = crate::db::get_connection(pool)?;

        let user = tokio::task::spawn_blocking(move || {
            users::table
                .filter(users::email.eq(email))
                .filter(users::password.eq(password))
                .select(User::as_select())
                .first(&mut conn)
                .optional()
        })
        .await??;

        Ok(user)
    }

    #[instrument(skip(pool))]
    pub async fn get_user_by_id(pool: &DbPool, user_id: i32) -> Result<Option<User>, anyhow::Error> {
        let mut conn = crate::db::get_connection(pool)?;

        let user = tokio::task::spawn_blocking(move || {
            users::table
                .find(user_id)
                .select(User::as_select())
                .first(&mut conn)
                .optional()
        })
        .await??;

        Ok(user)
    }
}
