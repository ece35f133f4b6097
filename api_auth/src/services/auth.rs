use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use common::error::{AppError, Res};
use db::models::user::User;
use sqlx::PgPool;
use thiserror::Error;
use validator::Validate;

use crate::dtos::auth::LoginForm;

/// Why a sign-in attempt did not produce a user.
#[derive(Error, Debug)]
pub enum SignInError {
    /// Malformed form, unknown email or wrong password. Deliberately indistinguishable.
    #[error("Invalid credentials.")]
    CredentialsSignin,

    #[error(transparent)]
    Other(#[from] AppError),
}

#[allow(async_fn_in_trait)]
pub trait UserStore {
    async fn find_by_email(&self, email: &str) -> Res<Option<User>>;
}

impl UserStore for PgPool {
    async fn find_by_email(&self, email: &str) -> Res<Option<User>> {
        db::user::get_user_by_email(self, email).await
    }
}

/// Checks the login form against the stored argon2 hash.
///
/// # Returns
///
/// The signed-in `User`, `SignInError::CredentialsSignin` for anything the
/// user got wrong, or `SignInError::Other` when the check itself failed.
pub async fn authorize<S: UserStore>(store: &S, form: &LoginForm) -> Result<User, SignInError> {
    if form.validate().is_err() {
        return Err(SignInError::CredentialsSignin);
    }

    let Some(user) = store.find_by_email(form.email.trim()).await? else {
        log::info!("Sign-in attempt for unknown email");
        return Err(SignInError::CredentialsSignin);
    };

    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {}", e)))?;
    let is_valid = Argon2::default()
        .verify_password(form.password.as_bytes(), &parsed_hash)
        .is_ok();

    if is_valid {
        Ok(user)
    } else {
        Err(SignInError::CredentialsSignin)
    }
}

/// Hashes a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Res<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    enum FakeStore {
        With(User),
        Empty,
        Broken,
    }

    impl UserStore for FakeStore {
        async fn find_by_email(&self, email: &str) -> Res<Option<User>> {
            match self {
                FakeStore::With(user) if user.email == email => Ok(Some(user.clone())),
                FakeStore::With(_) | FakeStore::Empty => Ok(None),
                FakeStore::Broken => Err(AppError::Database(sqlx::Error::PoolTimedOut)),
            }
        }
    }

    fn user(password_hash: String) -> User {
        User {
            id: Uuid::new_v4(),
            name: "User".to_string(),
            email: "user@nextmail.com".to_string(),
            password: password_hash,
        }
    }

    fn login(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn correct_password_signs_in() {
        let store = FakeStore::With(user(hash_password("123456").unwrap()));
        let signed_in = authorize(&store, &login("user@nextmail.com", "123456"))
            .await
            .unwrap();
        assert_eq!(signed_in.email, "user@nextmail.com");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let store = FakeStore::With(user(hash_password("123456").unwrap()));

        let wrong = authorize(&store, &login("user@nextmail.com", "654321")).await;
        let unknown = authorize(&store, &login("other@nextmail.com", "123456")).await;

        assert!(matches!(wrong, Err(SignInError::CredentialsSignin)));
        assert!(matches!(unknown, Err(SignInError::CredentialsSignin)));
    }

    #[tokio::test]
    async fn malformed_form_never_reaches_the_store() {
        let res = authorize(&FakeStore::Broken, &login("not-an-email", "123456")).await;
        assert!(matches!(res, Err(SignInError::CredentialsSignin)));

        let res = authorize(&FakeStore::Broken, &login("user@nextmail.com", "123")).await;
        assert!(matches!(res, Err(SignInError::CredentialsSignin)));
    }

    #[tokio::test]
    async fn store_failures_are_not_credential_errors() {
        let res = authorize(&FakeStore::Broken, &login("user@nextmail.com", "123456")).await;
        assert!(matches!(res, Err(SignInError::Other(AppError::Database(_)))));

        let corrupt = FakeStore::With(user("not-a-phc-string".to_string()));
        let res = authorize(&corrupt, &login("user@nextmail.com", "123456")).await;
        assert!(matches!(res, Err(SignInError::Other(AppError::Internal(_)))));
    }

    #[tokio::test]
    async fn empty_store_reports_invalid_credentials() {
        let res = authorize(&FakeStore::Empty, &login("user@nextmail.com", "123456")).await;
        let err = res.unwrap_err();
        assert!(matches!(err, SignInError::CredentialsSignin));
        assert_eq!(err.to_string(), "Invalid credentials.");
    }
}
