use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserChanges;
use crate::domain::user::models::UserCredentials;
use crate::domain::user::models::UserDetails;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::user::errors::UserError;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Validate, hash the password, and store a new user.
    ///
    /// # Arguments
    /// * `command` - Registration fields and plaintext password
    ///
    /// # Returns
    /// Stored user (without the password hash)
    ///
    /// # Errors
    /// * `Validation` - A field rule is broken; nothing was written
    /// * `NameAlreadyExists` - Name is already taken
    /// * `DatabaseError` - Database operation failed
    async fn add(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// Look a user up by name. Absence is not an error.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn get_by_name(&self, name: &str) -> Result<Option<User>, UserError>;

    /// Look up a user and its stored password hash by name.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn get_credentials_by_name(
        &self,
        name: &str,
    ) -> Result<Option<UserCredentials>, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get(&self, id: &UserId) -> Result<User, UserError>;

    /// Merge the supplied fields into an existing user.
    ///
    /// An empty command writes nothing and returns the current record.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Validation` - Merged record or new password is invalid
    /// * `DatabaseError` - Database operation failed
    async fn patch(&self, id: &UserId, command: UpdateUserCommand) -> Result<User, UserError>;

    /// Delete a user and its sub-records. Deleting a missing user succeeds.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;

    /// Retrieve a user with its sub-records.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_profile(&self, id: &UserId) -> Result<UserProfile, UserError>;

    /// Validate and store the supplied sub-records, replacing existing ones.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Validation` - A sub-record field rule is broken; nothing was written
    /// * `DatabaseError` - Database operation failed
    async fn update_details(
        &self,
        id: &UserId,
        details: UserDetails,
    ) -> Result<UserProfile, UserError>;
}

/// Persistence operations for the user aggregate.
///
/// Every mutating operation runs in a single transaction.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user with its password hash.
    ///
    /// # Errors
    /// * `NameAlreadyExists` - Unique constraint on name was violated
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User, password_hash: String) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by name.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, UserError>;

    /// Retrieve user and password hash by name.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_credentials_by_name(
        &self,
        name: &str,
    ) -> Result<Option<UserCredentials>, UserError>;

    /// Write the supplied columns of an existing user in one statement.
    ///
    /// Columns left `None` in `changes` keep their stored value, so
    /// concurrent updates of different columns do not undo each other. The
    /// password hash is replaced only when `password_hash` is `Some`.
    ///
    /// # Returns
    /// The row as stored after the update
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update(
        &self,
        id: &UserId,
        changes: UserChanges,
        password_hash: Option<String>,
    ) -> Result<User, UserError>;

    /// Remove a user; sub-records go with it.
    ///
    /// # Returns
    /// Whether a row was removed
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &UserId) -> Result<bool, UserError>;

    /// Retrieve the sub-records of a user.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_details(&self, id: &UserId) -> Result<UserDetails, UserError>;

    /// Insert or replace each supplied sub-record.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn upsert_details(&self, id: &UserId, details: &UserDetails) -> Result<(), UserError>;
}
