//! Legacy one-way digests
//!
//! The Wolopay server derives nonces with MD5 and signs with SHA-1. Both
//! sit behind [`LegacyDigest`]; the output lengths are part of the wire
//! format and are checked on every use.

use crate::{AuthError, AuthResult};
use sha1::Digest;

/// Output length of the nonce digest (MD5).
pub const NONCE_DIGEST_LEN: usize = 16;

/// Output length of the password and callback digest (SHA-1).
pub const SIGNATURE_DIGEST_LEN: usize = 20;

/// A fixed-output one-way hash.
pub trait LegacyDigest: Send + Sync {
    /// Algorithm name, for diagnostics
    fn name(&self) -> &'static str;

    /// Size of the digest in bytes
    fn output_len(&self) -> usize;

    /// Hash `parts` in order as a single stream.
    fn digest(&self, parts: &[&[u8]]) -> AuthResult<Vec<u8>>;
}

fn hash_parts<D: Digest>(parts: &[&[u8]]) -> Vec<u8> {
    let mut hasher = D::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().to_vec()
}

/// MD5, used for nonce derivation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Digest;

impl LegacyDigest for Md5Digest {
    fn name(&self) -> &'static str {
        "MD5"
    }

    fn output_len(&self) -> usize {
        NONCE_DIGEST_LEN
    }

    fn digest(&self, parts: &[&[u8]]) -> AuthResult<Vec<u8>> {
        Ok(hash_parts::<md5::Md5>(parts))
    }
}

/// SHA-1, used for the password digest and callback signatures.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha1Digest;

impl LegacyDigest for Sha1Digest {
    fn name(&self) -> &'static str {
        "SHA-1"
    }

    fn output_len(&self) -> usize {
        SIGNATURE_DIGEST_LEN
    }

    fn digest(&self, parts: &[&[u8]]) -> AuthResult<Vec<u8>> {
        Ok(hash_parts::<sha1::Sha1>(parts))
    }
}

/// Run `digest` and insist on the output size the wire format needs.
pub(crate) fn checked_digest(
    digest: &dyn LegacyDigest,
    expected_len: usize,
    parts: &[&[u8]],
) -> AuthResult<Vec<u8>> {
    if digest.output_len() != expected_len {
        return Err(AuthError::SigningUnavailable(format!(
            "{} yields {} bytes, {} required",
            digest.name(),
            digest.output_len(),
            expected_len
        )));
    }

    let output = digest.digest(parts)?;
    if output.len() != expected_len {
        return Err(AuthError::SigningUnavailable(format!(
            "{} produced {} bytes, {} required",
            digest.name(),
            output.len(),
            expected_len
        )));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_md5_known_answer() {
        let out = Md5Digest.digest(&[&b"abc"[..]]).unwrap();
        assert_eq!(hex::encode(out), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_sha1_known_answer() {
        let out = Sha1Digest.digest(&[&b"bd"[..], &b"secret"[..]]).unwrap();
        assert_eq!(hex::encode(out), "8128a674a2e7f56f3208515ed8482ccf39320d74");
    }

    #[test]
    fn test_parts_are_one_stream() {
        let split = Sha1Digest.digest(&[&b"12"[..], &b"sec"[..], &b"ret"[..]]).unwrap();
        let whole = Sha1Digest.digest(&[&b"12secret"[..]]).unwrap();
        assert_eq!(split, whole);
    }

    #[test]
    fn test_checked_digest_rejects_wrong_algorithm() {
        let input: &[u8] = b"x";

        let err = checked_digest(&Md5Digest, SIGNATURE_DIGEST_LEN, &[input]).unwrap_err();
        assert!(matches!(err, AuthError::SigningUnavailable(_)));

        assert!(checked_digest(&Sha1Digest, SIGNATURE_DIGEST_LEN, &[input]).is_ok());
    }

    struct Truncated;

    impl LegacyDigest for Truncated {
        fn name(&self) -> &'static str {
            "truncated"
        }

        fn output_len(&self) -> usize {
            NONCE_DIGEST_LEN
        }

        fn digest(&self, _parts: &[&[u8]]) -> AuthResult<Vec<u8>> {
            Ok(vec![0; 4])
        }
    }

    #[test]
    fn test_checked_digest_rejects_short_output() {
        let input: &[u8] = b"x";
        let err = checked_digest(&Truncated, NONCE_DIGEST_LEN, &[input]).unwrap_err();
        assert!(err.to_string().contains("produced 4 bytes"));
    }
}
