use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum_helpers::JwtAuth;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{
    ChangePassword, CreateUser, LoginRequest, LoginResponse, UpdateUser, User, UserResponse,
};
use crate::pagination::Page;
use crate::query::UserQuery;
use crate::repository::UserRepository;

/// Service layer for User business logic
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// One page of users: count the matches, then fetch the requested slice.
    ///
    /// Any storage failure aborts the whole request; no partial page is built.
    #[instrument(skip(self))]
    pub async fn list_users(&self, query: &UserQuery) -> UserResult<Page<UserResponse>> {
        let total = self.repository.count(query).await.inspect_err(|e| {
            tracing::error!(error = %e, "Failed to count users");
        })?;

        let users = self.repository.find_page(query).await.inspect_err(|e| {
            tracing::error!(error = %e, "Failed to fetch users page");
        })?;

        Ok(Page::new(query, total, users).map(UserResponse::from))
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<UserResponse> {
        if input.password != input.password_confirm {
            return Err(UserError::Validation(
                "Password confirmation mismatched".to_string(),
            ));
        }

        if self.repository.email_exists(&input.email).await? {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let password_hash = hash_password(&input.password)?;
        let user = User::new(input.name, input.email, password_hash);

        let created = self.repository.create(user).await?;
        Ok(created.into())
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> UserResult<UserResponse> {
        self.find_user(id).await.map(UserResponse::from)
    }

    #[instrument(skip(self, input))]
    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> UserResult<UserResponse> {
        let mut user = self.find_user(id).await?;

        if input.email != user.email && self.repository.email_exists(&input.email).await? {
            return Err(UserError::DuplicateEmail(input.email));
        }

        user.apply_update(input);

        let updated = self.repository.update(user).await?;
        Ok(updated.into())
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: Uuid) -> UserResult<()> {
        if !self.repository.delete(id).await? {
            return Err(UserError::NotFound(id));
        }
        Ok(())
    }

    /// Replace the password after checking the old one
    #[instrument(skip(self, input))]
    pub async fn change_password(&self, id: Uuid, input: ChangePassword) -> UserResult<()> {
        if input.password_new != input.password_confirm {
            return Err(UserError::Validation(
                "Password confirmation mismatched".to_string(),
            ));
        }

        let mut user = self.find_user(id).await?;

        if !verify_password(&input.password_old, &user.password_hash)? {
            return Err(UserError::WrongPassword);
        }

        user.set_password_hash(hash_password(&input.password_new)?);
        self.repository.update(user).await?;

        tracing::info!(user_id = %id, "Password changed");
        Ok(())
    }

    /// Check credentials and issue a token
    #[instrument(skip(self, input, jwt), fields(email = %input.email))]
    pub async fn login(&self, input: LoginRequest, jwt: &JwtAuth) -> UserResult<LoginResponse> {
        let user = self
            .repository
            .get_by_email(&input.email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        let token = jwt
            .create_token(&user.id.to_string(), &user.email, &user.name)
            .map_err(|e| UserError::Token(e.to_string()))?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(LoginResponse {
            user_id: user.id,
            name: user.name,
            email: user.email,
            token,
        })
    }

    async fn find_user(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }
}

fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> UserResult<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use axum_helpers::JwtConfig;
    use mockall::predicate::*;

    fn stored_user(password: &str) -> User {
        User::new(
            "Jane".into(),
            "jane@example.com".into(),
            hash_password(password).unwrap(),
        )
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("secret1").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secret1", &hash).unwrap());
        assert!(!verify_password("secret2", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_list_users_builds_page() {
        let mut repo = MockUserRepository::new();
        repo.expect_count().times(1).returning(|_| Ok(12));
        repo.expect_find_page().times(1).returning(|_| {
            Ok((0..5)
                .map(|i| User::new(format!("u{i}"), format!("u{i}@example.com"), "h".into()))
                .collect())
        });

        let query = UserQuery {
            page_number: 2,
            page_size: 5,
            ..Default::default()
        };
        let page = UserService::new(repo).list_users(&query).await.unwrap();

        assert_eq!(page.count, 5);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_previous_page);
        assert!(page.has_next_page);
    }

    #[tokio::test]
    async fn test_list_users_stops_after_failed_count() {
        let mut repo = MockUserRepository::new();
        repo.expect_count()
            .returning(|_| Err(UserError::Database("connection refused".into())));
        repo.expect_find_page().never();

        let result = UserService::new(repo)
            .list_users(&UserQuery::default())
            .await;
        assert!(matches!(result, Err(UserError::Database(_))));
    }

    #[tokio::test]
    async fn test_create_user_rejects_taken_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_email_exists()
            .with(eq("jane@example.com"))
            .returning(|_| Ok(true));
        repo.expect_create().never();

        let input = CreateUser {
            name: "Jane".into(),
            email: "jane@example.com".into(),
            password: "secret1".into(),
            password_confirm: "secret1".into(),
        };
        let result = UserService::new(repo).create_user(input).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_email_exists().returning(|_| Ok(false));
        repo.expect_create()
            .withf(|user| user.password_hash.starts_with("$argon2") && user.password_hash != "secret1")
            .returning(Ok);

        let input = CreateUser {
            name: "Jane".into(),
            email: "jane@example.com".into(),
            password: "secret1".into(),
            password_confirm: "secret1".into(),
        };
        let created = UserService::new(repo).create_user(input).await.unwrap();
        assert_eq!(created.email, "jane@example.com");
    }

    #[tokio::test]
    async fn test_change_password_with_wrong_old_password() {
        let user = stored_user("secret1");
        let id = user.id;
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_update().never();

        let input = ChangePassword {
            password_old: "nope".into(),
            password_new: "secret2".into(),
            password_confirm: "secret2".into(),
        };
        let result = UserService::new(repo).change_password(id, input).await;
        assert!(matches!(result, Err(UserError::WrongPassword)));
    }

    #[tokio::test]
    async fn test_change_password_stores_new_hash() {
        let user = stored_user("secret1");
        let id = user.id;
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_update()
            .withf(|u| verify_password("secret2", &u.password_hash).unwrap_or(false))
            .returning(Ok);

        let input = ChangePassword {
            password_old: "secret1".into(),
            password_new: "secret2".into(),
            password_confirm: "secret2".into(),
        };
        assert!(UserService::new(repo).change_password(id, input).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete().returning(|_| Ok(false));

        let result = UserService::new(repo).delete_user(Uuid::now_v7()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let user = stored_user("secret1");
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let jwt = JwtAuth::new(&JwtConfig::new("this-is-a-valid-secret-with-32-chars!").unwrap());
        let service = UserService::new(repo);

        let response = service
            .login(
                LoginRequest {
                    email: "jane@example.com".into(),
                    password: "secret1".into(),
                },
                &jwt,
            )
            .await
            .unwrap();
        let claims = jwt.verify_token(&response.token).unwrap();
        assert_eq!(claims.sub, response.user_id.to_string());

        let result = service
            .login(
                LoginRequest {
                    email: "jane@example.com".into(),
                    password: "wrong".into(),
                },
                &jwt,
            )
            .await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }
}
