use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserCredentials;
use crate::domain::user::models::UserDetails;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Field rules are checked and passwords hashed here, before the repository
/// is touched.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>) -> Self {
        Self::with_password_hasher(repository, auth::PasswordHasher::new())
    }

    pub fn with_password_hasher(repository: Arc<UR>, password_hasher: auth::PasswordHasher) -> Self {
        Self {
            repository,
            password_hasher,
        }
    }

    async fn find_existing(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn add(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let new_user = command.validate()?;
        let password_hash = self.password_hasher.hash(&new_user.password)?;

        let created_user = self.repository.create(new_user.user, password_hash).await?;
        tracing::info!(
            user_id = %created_user.id,
            user_type = %created_user.user_type,
            "User created"
        );

        Ok(created_user)
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<User>, UserError> {
        self.repository.find_by_name(name).await
    }

    async fn get_credentials_by_name(
        &self,
        name: &str,
    ) -> Result<Option<UserCredentials>, UserError> {
        self.repository.find_credentials_by_name(name).await
    }

    async fn get(&self, id: &UserId) -> Result<User, UserError> {
        self.find_existing(id).await
    }

    async fn patch(&self, id: &UserId, command: UpdateUserCommand) -> Result<User, UserError> {
        let user = self.find_existing(id).await?;

        if command.is_empty() {
            return Ok(user);
        }

        let update = command.validate(&user)?;
        let password_hash = update
            .password
            .map(|password| self.password_hasher.hash(&password))
            .transpose()?;

        let updated_user = self
            .repository
            .update(id, update.changes, password_hash)
            .await?;
        tracing::info!(user_id = %updated_user.id, "User updated");

        Ok(updated_user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        if self.repository.delete(id).await? {
            tracing::info!(user_id = %id, "User deleted");
        } else {
            tracing::debug!(user_id = %id, "Delete of missing user ignored");
        }

        Ok(())
    }

    async fn get_profile(&self, id: &UserId) -> Result<UserProfile, UserError> {
        let user = self.find_existing(id).await?;
        let details = self.repository.find_details(id).await?;

        Ok(UserProfile { user, details })
    }

    async fn update_details(
        &self,
        id: &UserId,
        details: UserDetails,
    ) -> Result<UserProfile, UserError> {
        details.validate()?;

        if !details.is_empty() {
            self.repository.upsert_details(id, &details).await?;
            tracing::info!(user_id = %id, "User details updated");
        }

        self.get_profile(id).await
    }
}
