use crate::db::{DbConnection, DbPool, RepositoryError};
use crate::models::common::{CourierStatus, UserRole};
use crate::models::delivery::NewDeliveryPerson;
use crate::models::user::{NewUser, User, UserProfile};
use diesel::prelude::*;
use diesel::result::Error;
use log::{debug, error};

const BCRYPT_COST: u32 = 10;

#[derive(Clone)]
pub struct UserOperations {
    pool: DbPool,
}

impl UserOperations {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Register an account. Couriers also get their capacity-pool row,
    /// created in the same transaction so a courier user can never exist
    /// without one.
    pub fn create_user(
        &self,
        email_addr: &str,
        phone_number: &str,
        password: &str,
        name: &str,
        new_role: UserRole,
    ) -> Result<UserProfile, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("create_user: failed to acquire DB connection: {}", e);
            e
        })?;

        if email_addr.trim().is_empty()
            || phone_number.trim().is_empty()
            || password.is_empty()
            || name.trim().is_empty()
        {
            return Err(RepositoryError::ValidationError(
                "All fields are required".to_string(),
            ));
        }

        let password_hash = bcrypt::hash(password, BCRYPT_COST).map_err(|e| {
            error!("create_user: password hashing failed: {}", e);
            RepositoryError::Internal("password hashing failed".to_string())
        })?;

        conn.connection().transaction(|conn| {
            {
                use crate::db::schema::users::dsl::*;
                let existing = users
                    .filter(email.eq(email_addr).or(phone.eq(phone_number)))
                    .select(user_id)
                    .first::<i32>(conn)
                    .optional()
                    .map_err(RepositoryError::DatabaseError)?;
                if existing.is_some() {
                    return Err(RepositoryError::ValidationError(
                        "User already exists".to_string(),
                    ));
                }
            }

            let created: UserProfile;
            {
                use crate::db::schema::users::dsl::users;
                created = diesel::insert_into(users)
                    .values(&NewUser {
                        email: email_addr.to_string(),
                        phone: phone_number.to_string(),
                        password_hash,
                        full_name: name.to_string(),
                        role: new_role,
                    })
                    .returning(UserProfile::as_returning())
                    .get_result::<UserProfile>(conn)
                    .map_err(RepositoryError::DatabaseError)?;
            }

            if new_role == UserRole::DeliveryPerson {
                use crate::db::schema::delivery_people::dsl::delivery_people;
                diesel::insert_into(delivery_people)
                    .values(&NewDeliveryPerson {
                        user_id: created.user_id,
                        status: CourierStatus::Available,
                    })
                    .execute(conn)
                    .map_err(RepositoryError::DatabaseError)?;
            }

            debug!(
                "create_user: created {} account {} ({})",
                new_role.as_str(),
                created.user_id,
                email_addr
            );

            Ok(created)
        })
    }

    /// Look up by email or phone and check the password.
    pub fn verify_credentials(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<User, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("verify_credentials: failed to acquire DB connection: {}", e);
            e
        })?;

        let user: User;
        {
            use crate::db::schema::users::dsl::*;
            user = users
                .filter(email.eq(identifier).or(phone.eq(identifier)))
                .select(User::as_select())
                .first::<User>(conn.connection())
                .map_err(|e| match e {
                    Error::NotFound => RepositoryError::NotFound("User not found".to_string()),
                    other => RepositoryError::DatabaseError(other),
                })?;
        }

        let matches = bcrypt::verify(password, &user.password_hash).map_err(|e| {
            error!("verify_credentials: password verification failed: {}", e);
            RepositoryError::Internal("password verification failed".to_string())
        })?;

        if !matches {
            return Err(RepositoryError::InvalidCredentials);
        }

        Ok(user)
    }

    pub fn get_profile(&self, search_user_id: i32) -> Result<UserProfile, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "get_profile: failed to acquire DB connection for user {}: {}",
                search_user_id, e
            );
            e
        })?;

        use crate::db::schema::users::dsl::*;
        users
            .filter(user_id.eq(search_user_id))
            .select(UserProfile::as_select())
            .first::<UserProfile>(conn.connection())
            .map_err(|e| match e {
                Error::NotFound => {
                    RepositoryError::NotFound(format!("User {} not found", search_user_id))
                }
                other => RepositoryError::DatabaseError(other),
            })
    }

    pub fn update_profile(
        &self,
        search_user_id: i32,
        new_name: Option<String>,
        new_address: Option<String>,
    ) -> Result<UserProfile, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "update_profile: failed to acquire DB connection for user {}: {}",
                search_user_id, e
            );
            e
        })?;

        if new_name.is_none() && new_address.is_none() {
            return Err(RepositoryError::ValidationError(
                "Nothing to update".to_string(),
            ));
        }

        conn.connection().transaction(|conn| {
            use crate::db::schema::users::dsl::*;

            if let Some(name) = new_name {
                diesel::update(users.filter(user_id.eq(search_user_id)))
                    .set(full_name.eq(name))
                    .execute(conn)
                    .map_err(RepositoryError::DatabaseError)?;
            }
            if let Some(addr) = new_address {
                diesel::update(users.filter(user_id.eq(search_user_id)))
                    .set(address.eq(addr))
                    .execute(conn)
                    .map_err(RepositoryError::DatabaseError)?;
            }

            users
                .filter(user_id.eq(search_user_id))
                .select(UserProfile::as_select())
                .first::<UserProfile>(conn)
                .map_err(|e| match e {
                    Error::NotFound => {
                        RepositoryError::NotFound(format!("User {} not found", search_user_id))
                    }
                    other => RepositoryError::DatabaseError(other),
                })
        })
    }
}
