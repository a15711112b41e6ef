//! Field encryption round trips and failure modes.

use std::collections::BTreeMap;

use labgrid_cipher::{CipherError, CipherParams, DecryptionFailure, FieldCipher};
use labgrid_model::{Applicant, ApplicantId};
use proptest::prelude::*;

fn cipher() -> FieldCipher {
    FieldCipher::new(CipherParams {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    })
}

fn applicant() -> Applicant {
    Applicant {
        id: ApplicantId::new("a-17").expect("id"),
        pacient_name: "Jana Nováková".to_string(),
        personal_number: "905512/1234".to_string(),
        sample_code: "100017".to_string(),
        sender: "Clinic North".to_string(),
        sample_collection_date: None,
        sample_receive_date: None,
    }
}

#[test]
fn wrong_secret_is_a_decryption_error() {
    let cipher = cipher();
    let text = cipher.encrypt("Jana", "correct horse").expect("encrypt");
    let err = cipher.decrypt(&text, "battery staple").expect_err("wrong secret");
    assert_eq!(
        err,
        CipherError::Decryption(DecryptionFailure::Authentication)
    );
}

#[test]
fn tampered_ciphertext_is_rejected() {
    let cipher = cipher();
    let text = cipher.encrypt("Jana", "secret").expect("encrypt");
    let mut bytes = hex::decode(&text).expect("hex");
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;

    let err = cipher
        .decrypt(&hex::encode(bytes), "secret")
        .expect_err("tampered");
    assert!(err.is_decryption());
}

#[test]
fn malformed_ciphertext_is_rejected() {
    let cipher = cipher();
    assert_eq!(
        cipher.decrypt("not hex", "secret"),
        Err(CipherError::Decryption(DecryptionFailure::Encoding))
    );
    assert_eq!(
        cipher.decrypt("01abcd", "secret"),
        Err(CipherError::Decryption(DecryptionFailure::Truncated(3)))
    );
}

#[test]
fn empty_secret_is_refused() {
    assert_eq!(cipher().encrypt("Jana", ""), Err(CipherError::EmptySecret));
}

#[test]
fn applicant_fields_round_trip() {
    let cipher = cipher();
    let plain = applicant();
    let sealed = cipher.encrypt_applicant(&plain, "secret").expect("encrypt");

    assert_eq!(sealed.id, plain.id);
    assert_ne!(sealed.pacient_name, plain.pacient_name);
    assert_ne!(sealed.sender, plain.sender);

    let opened = cipher.decrypt_applicant(&sealed, "secret").expect("decrypt");
    assert_eq!(opened, plain);
}

#[test]
fn batch_only_touches_named_fields() {
    let cipher = cipher();
    let record = BTreeMap::from([
        ("name".to_string(), "Jana".to_string()),
        ("code".to_string(), "100017".to_string()),
        ("note".to_string(), "left in clear".to_string()),
    ]);

    let sealed = cipher
        .encrypt_fields(&record, &["code", "name"], "secret")
        .expect("encrypt");
    assert_eq!(sealed["note"], "left in clear");
    assert_ne!(sealed["name"], "Jana");

    let opened = cipher
        .decrypt_fields(&sealed, &["name", "code"], "secret")
        .expect("decrypt");
    assert_eq!(opened, record);
}

#[test]
fn batch_reports_the_failing_field() {
    let cipher = cipher();
    let mut sealed = cipher
        .encrypt_applicant(&applicant(), "secret")
        .expect("encrypt");
    sealed.sender = "zz".to_string();

    let err = cipher
        .decrypt_applicant(&sealed, "secret")
        .expect_err("corrupt sender");
    match &err {
        CipherError::Field { field, source } => {
            assert_eq!(field, "sender");
            assert_eq!(
                **source,
                CipherError::Decryption(DecryptionFailure::Encoding)
            );
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.is_decryption());
}

#[test]
fn unknown_field_fails_before_any_work() {
    let err = cipher()
        .encrypt_fields(&applicant(), &["sender", "address"], "secret")
        .expect_err("unknown");
    assert_eq!(err, CipherError::UnknownField("address".to_string()));
}

#[test]
fn wrong_secret_fails_the_whole_batch() {
    let cipher = cipher();
    let sealed = cipher
        .encrypt_applicant(&applicant(), "secret")
        .expect("encrypt");
    let err = cipher
        .decrypt_applicant(&sealed, "placeholder")
        .expect_err("wrong secret");
    assert!(err.is_decryption());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn decrypt_inverts_encrypt(plaintext in ".{0,64}", secret in ".{1,32}") {
        let cipher = cipher();
        let text = cipher.encrypt(&plaintext, &secret).expect("encrypt");
        prop_assert_eq!(cipher.decrypt(&text, &secret), Ok(plaintext));
    }

    #[test]
    fn other_secret_never_decrypts(
        plaintext in ".{0,32}",
        secret in "[a-z]{1,16}",
        other in "[A-Z]{1,16}",
    ) {
        let cipher = cipher();
        let text = cipher.encrypt(&plaintext, &secret).expect("encrypt");
        prop_assert_eq!(
            cipher.decrypt(&text, &other),
            Err(CipherError::Decryption(DecryptionFailure::Authentication))
        );
    }
}
