// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Key loading and personal-message signing.
//!
//! Login challenges are signed with EIP-191 (`personal_sign`): the message is
//! prefixed with `"\x19Ethereum Signed Message:\n" + len(message)` before
//! hashing, so a signature can never be replayed as a transaction.

use alloy::{
    primitives::{Address, Signature},
    signers::{local::PrivateKeySigner, SignerSync},
};
use k256::SecretKey;

use super::client::ChainError;

/// Parse a private key from PEM format to hex string.
///
/// Accepts SEC1 (`EC PRIVATE KEY`) and PKCS#8 (`PRIVATE KEY`) encodings.
pub fn pem_to_hex(pem_bytes: &[u8]) -> Result<String, ChainError> {
    let pem_str = std::str::from_utf8(pem_bytes)
        .map_err(|e| ChainError::InvalidPrivateKey(format!("Invalid UTF-8: {}", e)))?;

    let pem = pem::parse(pem_str)
        .map_err(|e| ChainError::InvalidPrivateKey(format!("Invalid PEM: {}", e)))?;

    let secret_key = SecretKey::from_sec1_der(pem.contents())
        .or_else(|_| parse_pkcs8_to_secret_key(pem.contents()))
        .map_err(|e| ChainError::InvalidPrivateKey(format!("Invalid key format: {}", e)))?;

    Ok(alloy::hex::encode(secret_key.to_bytes()))
}

fn parse_pkcs8_to_secret_key(der: &[u8]) -> Result<SecretKey, String> {
    use k256::pkcs8::DecodePrivateKey;
    SecretKey::from_pkcs8_der(der).map_err(|e| e.to_string())
}

/// Create a signer from a hex private key (with or without `0x`).
pub fn signer_from_hex(private_key_hex: &str) -> Result<PrivateKeySigner, ChainError> {
    let trimmed = private_key_hex.trim();
    let key_bytes = alloy::hex::decode(trimmed.strip_prefix("0x").unwrap_or(trimmed))
        .map_err(|e| ChainError::InvalidPrivateKey(e.to_string()))?;

    PrivateKeySigner::from_slice(&key_bytes)
        .map_err(|e| ChainError::InvalidPrivateKey(e.to_string()))
}

/// Create a signer from PEM-encoded private key bytes.
pub fn signer_from_pem(pem_bytes: &[u8]) -> Result<PrivateKeySigner, ChainError> {
    let hex_key = pem_to_hex(pem_bytes)?;
    signer_from_hex(&hex_key)
}

/// Sign `message` as an EIP-191 personal message.
///
/// Returns the 65-byte `r || s || v` signature as `0x`-prefixed hex.
pub fn sign_personal_message(
    signer: &PrivateKeySigner,
    message: &str,
) -> Result<String, ChainError> {
    let signature = signer
        .sign_message_sync(message.as_bytes())
        .map_err(|e| ChainError::SigningFailed(e.to_string()))?;
    Ok(alloy::hex::encode_prefixed(signature.as_bytes()))
}

/// Recover the address that produced a personal-message signature.
pub fn recover_signer(message: &str, signature_hex: &str) -> Result<Address, ChainError> {
    let trimmed = signature_hex.trim();
    let bytes = alloy::hex::decode(trimmed.strip_prefix("0x").unwrap_or(trimmed))
        .map_err(|e| ChainError::InvalidSignature(e.to_string()))?;
    let signature = Signature::try_from(bytes.as_slice())
        .map_err(|e| ChainError::InvalidSignature(e.to_string()))?;

    signature
        .recover_address_from_msg(message.as_bytes())
        .map_err(|e| ChainError::InvalidSignature(e.to_string()))
}
