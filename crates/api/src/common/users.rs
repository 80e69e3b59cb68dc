use anyhow::anyhow;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use db::{models::User, Store};
use lazy_static::lazy_static;
use regex::Regex;

pub const USERNAME_RE: &str = r"^[a-z0-9_]+([a-z0-9_.-]+[a-z0-9_]+)?$";

lazy_static! {
    static ref USERNAME: Regex = Regex::new(USERNAME_RE).unwrap();
}

pub fn valid_username(name: &str) -> bool {
    name.len() <= 150 && USERNAME.is_match(name)
}

pub async fn register(
    name: String,
    password: String,
    display_name: Option<String>,
    store: &dyn Store,
) -> anyhow::Result<User> {
    if !valid_username(&name) {
        return Err(anyhow!("invalid user name {name:?}"));
    }
    if store.user_by_name(&name).await?.is_some() {
        return Err(anyhow!("user name {name} is taken"));
    }

    let password_hash = tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);

        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|f| f.to_string())
    })
    .await?;

    let password_hash = match password_hash {
        Ok(hash) => hash,
        Err(_) => return Err(anyhow!("password hashing failed")),
    };

    let user = store
        .create_user(User::new(name, display_name, password_hash))
        .await?;
    log::info!("Registered user {}", user.name);
    Ok(user)
}

/// `None` when the user is unknown, has no password or the password is wrong.
pub async fn authenticate(
    name: &str,
    password: String,
    store: &dyn Store,
) -> anyhow::Result<Option<User>> {
    let user = match store.user_by_name(name).await? {
        Some(user) => user,
        None => return Ok(None),
    };
    let hash = match user.password_encrypted.clone() {
        Some(hash) => hash,
        None => return Ok(None),
    };

    let verified = tokio::task::spawn_blocking(move || match PasswordHash::new(&hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    })
    .await?;

    Ok(verified.then_some(user))
}

/// Removes the account together with everything it authored.
pub async fn delete(name: &str, store: &dyn Store) -> anyhow::Result<bool> {
    match store.user_by_name(name).await? {
        Some(user) => {
            let deleted = store.delete_user(&user.id).await?;
            log::info!("Deleted user {}", user.name);
            Ok(deleted)
        }
        None => Ok(false),
    }
}
