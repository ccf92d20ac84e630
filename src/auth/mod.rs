//! Credential storage (encrypted file)
//!
//! Page-service access tokens are stored encrypted with AES-256-GCM in
//! ~/.config/rnw/credentials.enc, keyed by account short name.
//! The encryption key is derived from machine-specific identifiers.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use anyhow::{Context, Result};
use rand::Rng;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::api::Credential;
use crate::models::Account;
use crate::paths;

const NONCE_SIZE: usize = 12;

/// Get machine ID for key derivation
fn get_machine_id() -> String {
    #[cfg(target_os = "linux")]
    {
        for path in ["/etc/machine-id", "/var/lib/dbus/machine-id"] {
            if let Ok(id) = fs::read_to_string(path) {
                return id.trim().to_string();
            }
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(output) = std::process::Command::new("ioreg")
            .args(["-rd1", "-c", "IOPlatformExpertDevice"])
            .output()
        {
            let stdout = String::from_utf8_lossy(&output.stdout);
            if let Some(uuid) = stdout
                .lines()
                .find(|line| line.contains("IOPlatformUUID"))
                .and_then(|line| line.split('"').nth(3))
            {
                return uuid.to_string();
            }
        }
    }

    dirs::home_dir()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "rnw-fallback-key".to_string())
}

/// Derive encryption key from machine-specific data
fn derive_key() -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(get_machine_id().as_bytes());
    if let Some(home) = dirs::home_dir() {
        hasher.update(home.to_string_lossy().as_bytes());
    }
    hasher.update(b"rnw-microblog-v1");
    hasher.finalize().into()
}

fn cipher() -> Result<Aes256Gcm> {
    Aes256Gcm::new_from_slice(&derive_key()).map_err(|_| anyhow::anyhow!("Invalid key length"))
}

/// Load all tokens from an encrypted file
fn load_tokens(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let encrypted = fs::read(path).context("Failed to read credentials file")?;
    if encrypted.len() < NONCE_SIZE {
        return Ok(HashMap::new());
    }

    let (nonce_bytes, ciphertext) = encrypted.split_at(NONCE_SIZE);
    let plaintext = cipher()?
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| anyhow::anyhow!("Failed to decrypt credentials"))?;

    let json = String::from_utf8(plaintext).context("Invalid UTF-8 in credentials")?;
    serde_json::from_str(&json).context("Failed to parse credentials")
}

/// Save all tokens to an encrypted file
fn save_tokens(path: &Path, tokens: &HashMap<String, String>) -> Result<()> {
    let json = serde_json::to_string(tokens)?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::rng().fill(&mut nonce_bytes);

    let ciphertext = cipher()?
        .encrypt(Nonce::from_slice(&nonce_bytes), json.as_bytes())
        .map_err(|_| anyhow::anyhow!("Failed to encrypt credentials"))?;

    let mut output = nonce_bytes.to_vec();
    output.extend(ciphertext);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create credentials directory")?;
    }
    fs::write(path, output).context("Failed to write credentials file")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
    }

    Ok(())
}

fn store_token_at(path: &Path, short_name: &str, token: &str) -> Result<()> {
    let mut tokens = load_tokens(path).unwrap_or_default();
    tokens.insert(Account::credential_key(short_name), token.to_string());
    save_tokens(path, &tokens)
}

fn get_token_at(path: &Path, short_name: &str) -> Result<Option<Credential>> {
    let tokens = load_tokens(path)?;
    Ok(tokens
        .get(&Account::credential_key(short_name))
        .map(Credential::new))
}

fn delete_token_at(path: &Path, short_name: &str) -> Result<()> {
    let mut tokens = load_tokens(path).unwrap_or_default();
    tokens.remove(&Account::credential_key(short_name));
    save_tokens(path, &tokens)
}

/// Store the access token for an account
pub fn store_token(short_name: &str, token: &str) -> Result<()> {
    store_token_at(&paths::credentials_path()?, short_name, token)
}

/// Get the access token for an account
pub fn get_token(short_name: &str) -> Result<Option<Credential>> {
    get_token_at(&paths::credentials_path()?, short_name)
}

/// Forget the access token for an account
pub fn delete_token(short_name: &str) -> Result<()> {
    delete_token_at(&paths::credentials_path()?, short_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_store_and_get() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.enc");

        store_token_at(&path, "hana", "tok-1").unwrap();
        store_token_at(&path, "ivo", "tok-2").unwrap();

        assert_eq!(get_token_at(&path, "hana").unwrap(), Some(Credential::new("tok-1")));
        assert_eq!(get_token_at(&path, "ivo").unwrap(), Some(Credential::new("tok-2")));
        assert_eq!(get_token_at(&path, "jo").unwrap(), None);
    }

    #[test]
    fn test_file_is_not_plaintext() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.enc");
        store_token_at(&path, "hana", "very-secret-token").unwrap();

        let raw = fs::read(&path).unwrap();
        let needle = b"very-secret-token";
        assert!(!raw.windows(needle.len()).any(|w| w == needle));
    }

    #[test]
    fn test_delete() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.enc");
        store_token_at(&path, "hana", "tok").unwrap();
        delete_token_at(&path, "hana").unwrap();

        assert_eq!(get_token_at(&path, "hana").unwrap(), None);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        assert_eq!(get_token_at(&dir.path().join("none.enc"), "hana").unwrap(), None);
    }
}
