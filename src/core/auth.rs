//! BUX request authentication.
//!
//! A signed request carries the caller identity (xpub or access-key public
//! key), the SHA-256 of the exact body, a random nonce, the time in
//! milliseconds and a Bitcoin signed message over all four. For xpriv
//! callers the signing key is a child of the xpriv derived from the nonce,
//! so every request is signed by a different key.

use crate::utils::error::{BuxError, Result};
use bitcoin::bip32::{ChildNumber, Xpriv, Xpub};
use bitcoin::hashes::Hash;
use bitcoin::secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use bitcoin::sign_message::{signed_msg_hash, MessageSignature};
use sha2::{Digest, Sha256};
use std::str::FromStr;

pub const AUTH_HEADER: &str = "bux-auth-xpub";
pub const AUTH_ACCESS_KEY: &str = "bux-auth-key";
pub const AUTH_HEADER_HASH: &str = "bux-auth-hash";
pub const AUTH_HEADER_NONCE: &str = "bux-auth-nonce";
pub const AUTH_HEADER_TIME: &str = "bux-auth-time";
pub const AUTH_SIGNATURE: &str = "bux-auth-signature";

const MAX_INT32: u64 = 2_147_483_647;
const NONCE_BYTES: usize = 32;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthPayload {
    pub xpub: Option<String>,
    pub access_key: Option<String>,
    pub auth_hash: String,
    pub auth_nonce: String,
    pub auth_time: i64,
    pub signature: String,
}

impl AuthPayload {
    /// Header name/value pairs to attach to the outgoing request.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = Vec::with_capacity(5);
        if let Some(xpub) = &self.xpub {
            headers.push((AUTH_HEADER, xpub.clone()));
        } else if let Some(access_key) = &self.access_key {
            headers.push((AUTH_ACCESS_KEY, access_key.clone()));
        }
        headers.push((AUTH_HEADER_HASH, self.auth_hash.clone()));
        headers.push((AUTH_HEADER_NONCE, self.auth_nonce.clone()));
        headers.push((AUTH_HEADER_TIME, self.auth_time.to_string()));
        headers.push((AUTH_SIGNATURE, self.signature.clone()));
        headers
    }

    /// The string that gets signed: identity, hash, nonce and time concatenated.
    pub fn signing_message(&self) -> String {
        let key = self
            .xpub
            .as_deref()
            .filter(|xpub| !xpub.is_empty())
            .or(self.access_key.as_deref())
            .unwrap_or_default();
        format!(
            "{}{}{}{}",
            key, self.auth_hash, self.auth_nonce, self.auth_time
        )
    }
}

/// 產生 xpriv 簽章
pub fn create_signature(xpriv: &Xpriv, body: &str) -> Result<AuthPayload> {
    let secp = Secp256k1::new();
    let xpub = Xpub::from_priv(&secp, xpriv).to_string();

    let auth_nonce = random_hex(NONCE_BYTES);
    let signing_key = derive_child_key_from_hex(xpriv, &auth_nonce)?;

    let payload = AuthPayload {
        xpub: Some(xpub),
        auth_nonce,
        ..Default::default()
    };
    sign_payload(payload, body, &signing_key.private_key)
}

/// 產生 access key 簽章
pub fn create_signature_access_key(private_key_hex: &str, body: &str) -> Result<AuthPayload> {
    if private_key_hex.is_empty() {
        return Err(BuxError::MissingKeyError);
    }

    let secp = Secp256k1::new();
    let private_key = SecretKey::from_str(private_key_hex)?;
    let public_key = PublicKey::from_secret_key(&secp, &private_key);

    let payload = AuthPayload {
        access_key: Some(hex::encode(public_key.serialize())),
        auth_nonce: random_hex(NONCE_BYTES),
        ..Default::default()
    };
    sign_payload(payload, body, &private_key)
}

/// xpub string for unsigned requests, which only identify the caller.
pub fn xpub_string(xpriv: &Xpriv) -> String {
    let secp = Secp256k1::signing_only();
    Xpub::from_priv(&secp, xpriv).to_string()
}

fn sign_payload(
    mut payload: AuthPayload,
    body: &str,
    private_key: &SecretKey,
) -> Result<AuthPayload> {
    payload.auth_hash = hash_body(body);
    // the server rejects requests older than its allowed window
    payload.auth_time = chrono::Utc::now().timestamp_millis();
    payload.signature = sign_message(private_key, &payload.signing_message());

    tracing::trace!(nonce = %payload.auth_nonce, "request signed");
    Ok(payload)
}

/// Compact, compressed Bitcoin signed message, base64 encoded.
pub fn sign_message(private_key: &SecretKey, message: &str) -> String {
    let secp = Secp256k1::signing_only();
    let msg_hash = signed_msg_hash(message);
    let digest = Message::from_digest(msg_hash.to_byte_array());
    let signature = secp.sign_ecdsa_recoverable(&digest, private_key);
    MessageSignature::new(signature, true).to_base64()
}

/// Lowercase hex SHA-256 of the body.
pub fn hash_body(body: &str) -> String {
    hex::encode(Sha256::digest(body.as_bytes()))
}

/// Splits a hex string into 8-character chunks and reads each as a child index.
pub fn child_numbers_from_hex(hex_hash: &str) -> Result<Vec<u32>> {
    let mut child_nums = Vec::with_capacity(hex_hash.len().div_ceil(8));

    for chunk in hex_hash.as_bytes().chunks(8) {
        let chunk = std::str::from_utf8(chunk).map_err(|e| BuxError::HexError {
            value: hex_hash.to_string(),
            reason: e.to_string(),
        })?;
        let mut num = u64::from_str_radix(chunk, 16).map_err(|e| BuxError::HexError {
            value: hex_hash.to_string(),
            reason: e.to_string(),
        })?;
        if num > MAX_INT32 {
            num -= MAX_INT32;
        }
        child_nums.push(num as u32);
    }

    Ok(child_nums)
}

pub fn derive_child_key_from_hex(xpriv: &Xpriv, hex_hash: &str) -> Result<Xpriv> {
    let secp = Secp256k1::new();
    // 2^31 is the only value left above the normal range; From<u32> treats it as hardened
    let path: Vec<ChildNumber> = child_numbers_from_hex(hex_hash)?
        .into_iter()
        .map(ChildNumber::from)
        .collect();

    Ok(xpriv.derive_priv(&secp, &path)?)
}

fn random_hex(len: usize) -> String {
    use bitcoin::secp256k1::rand::RngCore;

    let mut bytes = vec![0u8; len];
    bitcoin::secp256k1::rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
