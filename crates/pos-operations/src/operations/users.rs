use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use pos_core::{Role, User, Username};
use tracing::{debug, info};

use crate::traits::{Clock, Ledger};
use crate::{OperationError, Result};

pub const MIN_PASSWORD_LEN: usize = 8;

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(OperationError::PasswordHash)
}

fn verify_password(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
        .is_ok()
}

/// Till operators and their credentials.
pub struct UserOperation<L, C> {
    ledger: L,
    clock: C,
}

impl<L, C> UserOperation<L, C>
where
    L: Ledger,
    C: Clock,
{
    pub fn new(ledger: L, clock: C) -> Self {
        Self { ledger, clock }
    }

    /// # Errors
    ///
    /// Returns [`OperationError::PasswordTooShort`] or
    /// [`OperationError::AlreadyExists`].
    pub fn create(&self, username: Username, password: &str, role: Role) -> Result<User> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(OperationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        let user = User {
            username,
            password_hash: hash_password(password)?,
            role,
            active: true,
            created_at: self.clock.now(),
        };

        self.ledger.transaction(|session| {
            if session.find_user(&user.username)?.is_some() {
                return Err(OperationError::AlreadyExists {
                    kind: "user",
                    id: user.username.to_string(),
                });
            }
            session.insert_user(&user)?;
            Ok(())
        })?;

        info!(user = %user.username, role = %user.role, "user created");
        Ok(user)
    }

    /// Whether any user has been created yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the users cannot be counted.
    pub fn has_users(&self) -> Result<bool> {
        self.ledger.read(|session| Ok(session.count_users()? > 0))
    }

    /// Checks a username and password.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidCredentials`] for an unknown user, a
    /// wrong password and an inactive account alike.
    pub fn authenticate(&self, username: &Username, password: &str) -> Result<User> {
        let Some(user) = self.ledger.read(|session| session.find_user(username))? else {
            debug!(user = %username, "authentication failed: unknown user");
            return Err(OperationError::InvalidCredentials);
        };
        if !verify_password(password, &user.password_hash) {
            debug!(user = %username, "authentication failed: wrong password");
            return Err(OperationError::InvalidCredentials);
        }
        if !user.active {
            debug!(user = %username, "authentication failed: inactive account");
            return Err(OperationError::InvalidCredentials);
        }
        info!(user = %username, "user authenticated");
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns an error if the users cannot be read.
    pub fn users(&self) -> Result<Vec<User>> {
        self.ledger.read(|session| session.list_users())
    }

    /// Deactivates an account; deactivating an inactive account is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::UserNotFound`] if no such user exists.
    pub fn deactivate(&self, username: &Username) -> Result<User> {
        let user = self.ledger.transaction(|session| {
            let user = session
                .find_user(username)?
                .ok_or_else(|| OperationError::UserNotFound(username.clone()))?;
            session.deactivate_user(username)?;
            Ok(User {
                active: false,
                ..user
            })
        })?;

        info!(user = %username, "user deactivated");
        Ok(user)
    }
}
