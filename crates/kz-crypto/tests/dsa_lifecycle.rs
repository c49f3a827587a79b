//! # DSA Key Lifecycle Tests
//!
//! End-to-end behaviour of DSA keys through the public API: generation,
//! JSON round-trips, activation failures, stream sessions, and concurrent
//! use of one key from several threads.

use std::sync::OnceLock;

use kz_core::{KeyError, KeyParameters, KeyStream, KeyType, KeyczarKey, KeyczarPrivateKey};
use kz_crypto::{DsaPrivateKey, DsaPrivateKeyRecord, DsaPublicKey, KeySource};
use proptest::prelude::*;

/// Parameter generation is slow; every test shares one key.
fn key() -> &'static DsaPrivateKey {
    static KEY: OnceLock<DsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| DsaPrivateKey::generate(KeyParameters::with_size(1024)).expect("keygen"))
}

fn sign_with(stream: &mut KeyStream, chunks: &[&[u8]]) -> Vec<u8> {
    stream.init_sign().expect("init_sign");
    for chunk in chunks {
        stream.update_sign(chunk).expect("update_sign");
    }
    let mut out = Vec::new();
    stream.sign(&mut out).expect("sign");
    out
}

fn verify_with(
    stream: &mut KeyStream,
    chunks: &[&[u8]],
    signature: &[u8],
) -> Result<bool, KeyError> {
    stream.init_verify()?;
    for chunk in chunks {
        stream.update_verify(chunk)?;
    }
    stream.verify(signature)
}

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

#[test]
fn hello_example_round_trip() {
    let original = key();
    assert_eq!(original.size(), 1024);

    let mut stream = original.get_stream().unwrap();
    let signature = sign_with(&mut stream, &[b"hello"]);

    let restored = DsaPrivateKey::read(&original.to_json().unwrap()).unwrap();
    let mut stream = restored.get_stream().unwrap();
    assert!(verify_with(&mut stream, &[b"hello"], &signature).unwrap());
    assert!(!verify_with(&mut stream, &[b"hellp"], &signature).unwrap());
}

#[test]
fn restored_key_signatures_verify_on_original() {
    let original = key();
    let restored = DsaPrivateKey::read(&original.to_json().unwrap()).unwrap();
    let signature = restored.sign(b"cross-verify").unwrap();
    assert!(original.verify(b"cross-verify", &signature).unwrap());
    assert_eq!(restored.hash(), original.hash());
    assert_eq!(restored.public_key(), original.public_key());
}

#[test]
fn json_size_matches_modulus_bits() {
    let value: serde_json::Value = serde_json::from_str(&key().to_json().unwrap()).unwrap();
    assert_eq!(value["size"], 1024);
    assert_eq!(value["publicKey"]["size"], 1024);
    let object = value.as_object().unwrap();
    let fields: Vec<&str> = object.keys().map(String::as_str).collect();
    assert!(fields.contains(&"x") && fields.contains(&"publicKey"));
}

#[test]
fn public_key_round_trip() {
    let public = key().public_key();
    let restored = DsaPublicKey::read(&public.to_json().unwrap()).unwrap();
    assert_eq!(&restored, public);
    assert_eq!(restored.hash(), public.hash());
    assert_eq!(restored.key_type(), KeyType::DsaPub);
    let signature = key().sign(b"public").unwrap();
    assert!(restored.verify(b"public", &signature).unwrap());
}

// ---------------------------------------------------------------------------
// Loading failures
// ---------------------------------------------------------------------------

fn without_field(field: &str) -> String {
    let mut value: serde_json::Value = serde_json::from_str(&key().to_json().unwrap()).unwrap();
    value.as_object_mut().unwrap().remove(field);
    value.to_string()
}

#[test]
fn missing_x_is_malformed() {
    let err = DsaPrivateKey::read(&without_field("x")).unwrap_err();
    assert!(matches!(err, KeyError::MalformedKey(_)), "got {err:?}");
}

#[test]
fn missing_public_key_is_malformed() {
    let err = DsaPrivateKey::read(&without_field("publicKey")).unwrap_err();
    assert!(matches!(err, KeyError::MalformedKey(_)), "got {err:?}");
}

#[test]
fn null_public_key_is_malformed() {
    let mut value: serde_json::Value = serde_json::from_str(&key().to_json().unwrap()).unwrap();
    value["publicKey"] = serde_json::Value::Null;
    let err = DsaPrivateKey::read(&value.to_string()).unwrap_err();
    assert!(matches!(err, KeyError::MalformedKey(_)));
}

#[test]
fn non_integer_size_is_malformed() {
    let mut value: serde_json::Value = serde_json::from_str(&key().to_json().unwrap()).unwrap();
    value["size"] = serde_json::json!("1024");
    let err = DsaPrivateKey::read(&value.to_string()).unwrap_err();
    assert!(matches!(err, KeyError::MalformedKey(_)));
}

#[test]
fn bad_base64_is_malformed() {
    let mut value: serde_json::Value = serde_json::from_str(&key().to_json().unwrap()).unwrap();
    value["publicKey"]["q"] = serde_json::json!("not base64!");
    let err = DsaPrivateKey::read(&value.to_string()).unwrap_err();
    assert!(matches!(err, KeyError::MalformedKey(ref m) if m.contains("`q`")));
}

#[test]
fn rejected_components_are_activation_errors() {
    let mut value: serde_json::Value = serde_json::from_str(&key().to_json().unwrap()).unwrap();
    // y = 2 is not in the order-q subgroup.
    value["publicKey"]["y"] = serde_json::json!("Ag");
    let err = DsaPrivateKey::read(&value.to_string()).unwrap_err();
    assert!(matches!(err, KeyError::Activation { .. }), "got {err:?}");
    assert!(err.is_load_failure());
}

#[test]
fn inert_record_activates_once_into_working_key() {
    let record = DsaPrivateKeyRecord::from_json(&key().to_json().unwrap()).unwrap();
    assert_eq!(record.size, 1024);
    let active = record.activate().unwrap();
    let signature = active.sign(b"activated").unwrap();
    assert!(key().verify(b"activated", &signature).unwrap());
}

#[test]
#[ignore = "2048/3072-bit parameter generation is slow; run with --ignored"]
fn larger_parameter_sets_round_trip() {
    for bits in [2048, 3072] {
        let original = DsaPrivateKey::generate(KeyParameters::with_size(bits)).unwrap();
        assert_eq!(original.size(), bits);

        let json = original.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["size"], bits);

        let mut stream = original.get_stream().unwrap();
        let signature = sign_with(&mut stream, &[b"hello"]);

        let restored = DsaPrivateKey::read(&json).unwrap();
        assert_eq!(restored.size(), bits);
        let mut stream = restored.get_stream().unwrap();
        assert!(verify_with(&mut stream, &[b"hello"], &signature).unwrap());
        assert!(!verify_with(&mut stream, &[b"hellp"], &signature).unwrap());
    }
}

#[test]
fn unsupported_generation_size() {
    let err = DsaPrivateKey::generate(KeyParameters::with_size(768)).unwrap_err();
    assert!(matches!(err, KeyError::KeyGeneration { .. }));
}

// ---------------------------------------------------------------------------
// Stream sessions
// ---------------------------------------------------------------------------

#[test]
fn chunking_does_not_change_the_signed_message() {
    let mut stream = key().get_stream().unwrap();
    let signature = sign_with(&mut stream, &[b"he", b"", b"llo"]);
    assert!(verify_with(&mut stream, &[b"hello"], &signature).unwrap());
    assert!(verify_with(&mut stream, &[b"hel", b"lo"], &signature).unwrap());
    assert!(!verify_with(&mut stream, &[b"lo", b"hel"], &signature).unwrap());
}

#[test]
fn truncated_signature_is_verification_error() {
    let signature = key().sign(b"truncate me").unwrap();
    let truncated = &signature[..signature.len() - 3];
    let mut stream = key().get_stream().unwrap();
    let err = verify_with(&mut stream, &[b"truncate me"], truncated).unwrap_err();
    assert!(matches!(err, KeyError::Verification { .. }), "got {err:?}");
    assert!(!err.is_load_failure());

    // The key survives a failed session.
    let mut stream = key().get_stream().unwrap();
    assert!(verify_with(&mut stream, &[b"truncate me"], &signature).unwrap());
}

#[test]
fn empty_signature_is_verification_error() {
    let mut stream = key().public().get_stream().unwrap();
    let err = verify_with(&mut stream, &[b"x"], &[]).unwrap_err();
    assert!(matches!(err, KeyError::Verification { .. }));
}

#[test]
fn zero_component_signature_is_invalid() {
    // SEQUENCE { INTEGER 0, INTEGER 5 }
    let signature = [0x30u8, 0x06, 0x02, 0x01, 0x00, 0x02, 0x01, 0x05];
    let mut stream = key().get_stream().unwrap();
    assert!(!verify_with(&mut stream, &[b"x"], &signature).unwrap());
    assert_eq!(stream.state(), kz_core::StreamState::Finalized);
}

#[test]
fn oversized_component_signature_is_invalid() {
    // SEQUENCE { INTEGER 1, INTEGER 2^168 - 1 }; s exceeds the 160-bit q.
    let mut signature = vec![0x30u8, 0x1b, 0x02, 0x01, 0x01, 0x02, 0x16, 0x00];
    signature.extend_from_slice(&[0xff; 21]);
    let mut stream = key().get_stream().unwrap();
    assert!(!verify_with(&mut stream, &[b"x"], &signature).unwrap());
}

#[test]
fn flipped_signature_bit_fails() {
    let mut signature = key().sign(b"flip").unwrap();
    let last = signature.len() - 1;
    signature[last] ^= 0x01;
    assert!(!key().verify(b"flip", &signature).unwrap());
}

#[test]
fn public_stream_cannot_sign() {
    let mut stream = key().public().get_stream().unwrap();
    assert!(!stream.can_sign());
    assert!(matches!(stream.init_sign(), Err(KeyError::CryptoInit(_))));
}

#[test]
fn verify_before_init_is_an_error() {
    let mut stream = key().get_stream().unwrap();
    let signature = key().sign(b"x").unwrap();
    assert!(matches!(stream.verify(&signature), Err(KeyError::Verification { .. })));
    assert!(matches!(stream.update_verify(b"x"), Err(KeyError::Verification { .. })));
}

#[test]
fn public_record_file_loads_for_verification() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("public.json");
    std::fs::write(&path, key().public_key().to_json().unwrap()).unwrap();
    let source = KeySource::File(path);

    let public = source.load_public().unwrap();
    assert_eq!(&public, key().public_key());
    let signature = key().sign(b"detached").unwrap();
    assert!(public.verify(b"detached", &signature).unwrap());

    // A public record cannot stand in for a private one.
    assert!(source.load_private().is_err());
}

// ---------------------------------------------------------------------------
// Polymorphism and concurrency
// ---------------------------------------------------------------------------

#[test]
fn keys_are_usable_through_the_uniform_surface() {
    let keys: Vec<Box<dyn KeyczarKey>> = vec![
        Box::new(key().clone()),
        Box::new(key().public_key().clone()),
    ];
    let signature = key().sign(b"uniform").unwrap();
    for k in &keys {
        assert_eq!(k.key_gen_algorithm(), "DSA");
        assert_eq!(k.size(), 1024);
        assert_eq!(k.hash(), key().hash());
        let mut stream = k.get_stream().unwrap();
        assert_eq!(stream.digest_size(), k.key_type().output_size());
        assert!(verify_with(&mut stream, &[b"uniform"], &signature).unwrap());
    }
}

#[test]
fn concurrent_sessions_on_one_key() {
    let k = key();
    let handles: Vec<_> = (0..4u8)
        .map(|i| {
            let k = k.clone();
            std::thread::spawn(move || {
                let message = vec![i; 64 + usize::from(i)];
                let mut stream = k.get_stream().expect("stream");
                let signature = sign_with(&mut stream, &[message.as_slice()]);
                (message, signature)
            })
        })
        .collect();

    for handle in handles {
        let (message, signature) = handle.join().expect("thread");
        assert!(k.verify(&message, &signature).unwrap());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Any message verifies under its own signature and fails with one bit flipped.
    #[test]
    fn sign_verify_and_bit_flip(message in prop::collection::vec(any::<u8>(), 1..256), bit in 0usize..2048) {
        let signature = key().sign(&message).unwrap();
        prop_assert!(key().verify(&message, &signature).unwrap());

        let mut tampered = message.clone();
        let index = (bit / 8) % tampered.len();
        tampered[index] ^= 1 << (bit % 8);
        prop_assert!(!key().verify(&tampered, &signature).unwrap());
    }
}
