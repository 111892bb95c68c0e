//! Registration and password login.

use std::sync::Arc;

use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::info;

use glossa_core::defaults::SALT_LENGTH;
use glossa_core::{CreateUserRequest, Error, Result, User, UserRepository};

/// Hash a password with its salt: hex(sha256(salt || password)).
pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn generate_salt() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LENGTH)
        .map(char::from)
        .collect()
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Create a user and return its id.
    pub async fn register(&self, name: &str, password: &str) -> Result<i64> {
        if name.is_empty() || password.is_empty() {
            return Err(Error::InvalidInput(
                "name and password must not be empty".to_string(),
            ));
        }

        let salt = generate_salt();
        let id = self
            .users
            .create(CreateUserRequest {
                name: name.to_string(),
                password_hash: hash_password(&salt, password),
                salt,
            })
            .await?;

        info!(
            subsystem = "auth",
            component = "accounts",
            op = "register",
            user_id = id,
            "User registered"
        );
        Ok(id)
    }

    /// Check credentials. Unknown names and wrong passwords fail alike.
    pub async fn login(&self, name: &str, password: &str) -> Result<User> {
        let user = self
            .users
            .find_by_name(name)
            .await?
            .filter(|u| hash_password(&u.salt, password) == u.password_hash)
            .ok_or_else(|| Error::Forbidden("invalid name or password".to_string()))?;

        info!(
            subsystem = "auth",
            component = "accounts",
            op = "login",
            user_id = user.id,
            "User logged in"
        );
        Ok(user)
    }
}
