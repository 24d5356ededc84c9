use crate::domain::repository::SignupRepository;
use crate::domain::types::{Role, User};
use crate::error::AuthServiceError;
use crate::usecase::hashing::verify_secret;

pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
}

pub struct LoginUseCase<S: SignupRepository> {
    pub signups: S,
}

impl<S: SignupRepository> LoginUseCase<S> {
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, AuthServiceError> {
        let role = Role::parse(&input.role).ok_or(AuthServiceError::InvalidRole)?;

        let user = self
            .signups
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;

        // Role-scoped lookup: an account under a different role reads the
        // same as no account at all.
        if user.role != role {
            return Err(AuthServiceError::UserNotFound);
        }

        if !user.active || user.banned {
            return Err(AuthServiceError::AccountDisabled);
        }

        if !verify_secret(&input.password, &user.password_hash)? {
            return Err(AuthServiceError::InvalidCredentials);
        }

        Ok(LoginOutput { user })
    }
}
