//! Register Use Case
//!
//! Creates a new user account. Self-registration always produces a
//! Student; instructors and admins are created by an admin.

use std::sync::Arc;

use crate::domain::entity::{credentials::Credentials, user::User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    person_name::PersonName,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Role for the new account. Handlers only pass a non-student
    /// role when the caller is an admin.
    pub role: UserRole,
}

/// Register output
pub struct RegisterOutput {
    pub public_id: String,
}

/// Register use case
pub struct RegisterUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let name =
            PersonName::new(input.name).map_err(|e| AuthError::Validation(e.to_string()))?;
        let email = Email::new(input.email).map_err(|e| AuthError::Validation(e.to_string()))?;

        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let raw_password =
            RawPassword::new(input.password).map_err(|e| AuthError::Validation(e.to_string()))?;
        let password_hash =
            UserPassword::from_raw(&raw_password).map_err(|e| AuthError::Internal(e.to_string()))?;

        let user = User::new(name, email, input.role);
        let credentials = Credentials::new(user.user_id, password_hash);

        self.user_repo
            .create_with_credentials(&user, &credentials)
            .await?;

        tracing::info!(
            public_id = %user.public_id,
            role = %user.role,
            "User registered"
        );

        Ok(RegisterOutput {
            public_id: user.public_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::public_id::PublicId;
    use kernel::id::UserId;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryUsers {
        users: Mutex<Vec<User>>,
        credentials: Mutex<Vec<Credentials>>,
    }

    impl UserRepository for InMemoryUsers {
        async fn create_with_credentials(
            &self,
            user: &User,
            credentials: &Credentials,
        ) -> AuthResult<()> {
            self.users.lock().unwrap().push(user.clone());
            self.credentials.lock().unwrap().push(credentials.clone());
            Ok(())
        }

        async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.user_id == *user_id)
                .cloned())
        }

        async fn find_by_public_id(&self, public_id: &PublicId) -> AuthResult<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.public_id == *public_id)
                .cloned())
        }

        async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == *email)
                .cloned())
        }

        async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .any(|u| u.email == *email))
        }

        async fn update(&self, _user: &User) -> AuthResult<()> {
            Ok(())
        }
    }

    fn input(email: &str) -> RegisterInput {
        RegisterInput {
            name: "Test Student".to_string(),
            email: email.to_string(),
            password: "ValidPass123!".to_string(),
            role: UserRole::Student,
        }
    }

    #[tokio::test]
    async fn test_register_persists_user_and_credentials_together() {
        let repo = Arc::new(InMemoryUsers::default());
        let use_case = RegisterUseCase::new(repo.clone());

        let output = use_case.execute(input("student@example.com")).await.unwrap();
        assert!(!output.public_id.is_empty());

        let users = repo.users.lock().unwrap();
        let credentials = repo.credentials.lock().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(credentials.len(), 1);
        assert_eq!(credentials[0].user_id, users[0].user_id);
    }

    #[tokio::test]
    async fn test_register_rejects_taken_email() {
        let repo = Arc::new(InMemoryUsers::default());
        let use_case = RegisterUseCase::new(repo.clone());

        use_case.execute(input("student@example.com")).await.unwrap();
        let err = use_case.execute(input("student@example.com")).await;

        assert!(matches!(err, Err(AuthError::EmailTaken)));
        assert_eq!(repo.credentials.lock().unwrap().len(), 1);
    }
}
