//! Integration tests for the signing and verification workflows.
//!
//! Tokens and signatures are recomputed here with the digest crates
//! directly, so these tests pin the wire format independently of the
//! library's own helpers.

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{TimeZone, Utc};
use http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use md5::Md5;
use regex::Regex;
use sha1::{Digest, Sha1};
use std::collections::HashSet;
use std::sync::Arc;
use wolopay::prelude::*;
use wolopay::{EntropySource, generate_token, is_valid};

struct FixedEntropy(u8);

impl EntropySource for FixedEntropy {
    fn fill(&self, dest: &mut [u8]) {
        dest.fill(self.0);
    }
}

fn credentials() -> Arc<Credentials> {
    Arc::new(Credentials::new("clientId", "secret").unwrap())
}

// =============================================================================
// Outbound Signing
// =============================================================================

#[test]
fn test_token_matches_independent_computation() {
    let signer = WsseSigner::new(credentials()).with_entropy(FixedEntropy(7));
    let now = Utc.with_ymd_and_hms(2024, 3, 9, 8, 5, 1).unwrap();
    let token = signer.token_at(now).unwrap();

    let raw_nonce = Md5::digest([7u8; 32]);
    let created = "2024-03-09T08:05:01+0000";

    let mut sha = Sha1::new();
    sha.update(&raw_nonce);
    sha.update(created.as_bytes());
    sha.update(b"secret");
    let expected_digest = STANDARD.encode(sha.finalize());

    assert_eq!(token.nonce, STANDARD.encode(&raw_nonce));
    assert_eq!(token.created, created);
    assert_eq!(token.password_digest, expected_digest);
    assert_eq!(
        token.to_string(),
        format!(
            "UsernameToken Username=\"clientId\", PasswordDigest=\"{}\", Nonce=\"{}\", Created=\"{}\"",
            expected_digest,
            STANDARD.encode(&raw_nonce),
            created
        )
    );
}

#[test]
fn test_generate_token_format() {
    let pattern = Regex::new(
        r#"^UsernameToken Username="clientId", PasswordDigest="[A-Za-z0-9+/]{27}=", Nonce="[A-Za-z0-9+/]{22}==", Created="\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\+0000"$"#,
    )
    .unwrap();

    let token = generate_token("clientId", "secret");
    assert!(pattern.is_match(&token), "unexpected token: {}", token);
}

#[test]
fn test_consecutive_tokens_differ() {
    let first = WsseToken::parse(&generate_token("clientId", "secret")).unwrap();
    let second = WsseToken::parse(&generate_token("clientId", "secret")).unwrap();

    assert_eq!(first.username, second.username);
    assert_ne!(first.nonce, second.nonce);
    assert_ne!(first.password_digest, second.password_digest);
    assert!(first.matches_secret("secret"));
    assert!(second.matches_secret("secret"));
}

#[test]
fn test_generate_token_rejects_bad_identifier() {
    assert_eq!(generate_token("", "secret"), "");
    assert_eq!(generate_token("bad\"id", "secret"), "");
}

#[test]
fn test_concurrent_tokens_never_collide() {
    const THREADS: usize = 10;
    const PER_THREAD: usize = 1_000;

    let nonces: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    (0..PER_THREAD)
                        .map(|_| {
                            let token = generate_token("clientId", "secret");
                            WsseToken::parse(&token).unwrap().nonce
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    let unique: HashSet<_> = nonces.iter().collect();
    assert_eq!(nonces.len(), THREADS * PER_THREAD);
    assert_eq!(unique.len(), nonces.len());
}

// =============================================================================
// Inbound Verification
// =============================================================================

fn signature_header(values: &str, secret: &str) -> String {
    let mut sha = Sha1::new();
    sha.update(values.as_bytes());
    sha.update(secret.as_bytes());
    format!("Signature {}", hex::encode(sha.finalize()))
}

#[test]
fn test_verify_reference_callback() {
    let header = signature_header("bd", "secret");
    assert!(is_valid("a=b&c=d", Some(&header), "secret"));
    assert!(is_valid("a=b&c=d", Some(&header.to_uppercase()), "secret"));
    assert!(!is_valid("a=b&c=d", None, "secret"));
    assert!(!is_valid("a=b&c=d", Some(&header), "not-the-secret"));
}

#[test]
fn test_verify_decoded_callback() {
    let query = "transaction_id=tx%201&gamer_id=J%C3%BCrgen+K&status=200&bare";
    let header = signature_header("tx 1Jürgen K200", "secret");

    let verifier = CallbackVerifier::new(credentials());
    assert!(verifier.is_valid(query, Some(&header)));

    let params = parse_query(query);
    let keys: Vec<_> = params.keys().collect();
    assert_eq!(keys, vec!["transaction_id", "gamer_id", "status", "bare"]);
    assert_eq!(params.get("bare"), Some(""));
}

#[test]
fn test_verify_request_headers() {
    let verifier = CallbackVerifier::new(credentials());
    let query = "transaction_id=42&status=200";

    let mut headers = HeaderMap::new();
    assert!(!verifier.verify_headers(Some(query), &headers));

    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&signature_header("42200", "secret")).unwrap(),
    );
    assert!(verifier.verify_headers(Some(query), &headers));
    assert!(!verifier.verify_headers(Some("transaction_id=42&status=500"), &headers));
}

#[test]
fn test_random_secrets_round_trip() {
    for _ in 0..32 {
        let secret = hex::encode(rand::random::<[u8; 16]>());
        let credentials = Credentials::new("clientId", secret.as_str()).unwrap();
        let verifier = CallbackVerifier::new(Arc::new(credentials));

        let query = "transaction_id=7&amount=9.99";
        let header = verifier.sign(query).unwrap();

        assert_eq!(header, signature_header("79.99", &secret));
        assert!(is_valid(query, Some(&header), &secret));
        assert!(!is_valid(query, Some(&header), "secret"));
    }
}
