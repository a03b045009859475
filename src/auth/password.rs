use anyhow::Context;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::{error, warn};

lazy_static! {
    /// Stands in for a stored hash when the account does not exist, so an
    /// unknown email costs the same argon2 work as a wrong password.
    static ref DUMMY_HASH: String =
        hash_password("dummy-password-for-unknown-accounts").unwrap_or_default();
}

#[cfg(test)]
pub(crate) static DUMMY_VERIFICATIONS: std::sync::atomic::AtomicUsize =
    std::sync::atomic::AtomicUsize::new(0);

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// False on mismatch and on a hash that does not parse.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "argon2 parse hash error");
            return false;
        }
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

/// Runs [`hash_password`] on the blocking pool.
pub async fn hash_password_blocking(plain: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .context("hash task panicked")?
}

/// Runs [`verify_password`] on the blocking pool.
pub async fn verify_password_blocking(plain: String, hash: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .context("verify task panicked")
}

/// Runs a full verification against [`DUMMY_HASH`] and always reports a mismatch.
pub async fn verify_dummy_blocking(plain: String) -> anyhow::Result<bool> {
    #[cfg(test)]
    DUMMY_VERIFICATIONS.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    let hash = DUMMY_HASH.clone();
    verify_password_blocking(plain, hash).await?;
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password("longpass1").unwrap();
        let b = hash_password("longpass1").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("longpass1", &a));
        assert!(verify_password("longpass1", &b));
    }

    #[test]
    fn malformed_hash_is_a_mismatch() {
        assert!(!verify_password("anything", "not-a-valid-hash"));
        assert!(!verify_password("anything", ""));
    }

    #[tokio::test]
    async fn blocking_helpers_agree() {
        let hash = hash_password_blocking("longpass1".into()).await.unwrap();
        assert!(verify_password_blocking("longpass1".into(), hash.clone()).await.unwrap());
        assert!(!verify_password_blocking("longpass2".into(), hash).await.unwrap());
    }

    #[test]
    fn dummy_hash_is_a_real_argon2_hash() {
        assert!(PasswordHash::new(&DUMMY_HASH).is_ok());
        assert!(verify_password("dummy-password-for-unknown-accounts", &DUMMY_HASH));
    }

    #[tokio::test]
    async fn dummy_verification_never_matches() {
        assert!(!verify_dummy_blocking("dummy-password-for-unknown-accounts".into())
            .await
            .unwrap());
        assert!(!verify_dummy_blocking("longpass1".into()).await.unwrap());
    }
}
