//! Integration tests that verify generated keystores with Java keytool
//! via testcontainers.
//!
//! Run with: cargo test --test keytool_test -- --ignored
//! Requires Docker.

use std::fs;

use pem2keystore::Session;
use testcontainers::core::{ExecCommand, WaitFor};
use testcontainers::runners::SyncRunner;
use testcontainers::{GenericImage, ImageExt};

fn generate_pem_files(dir: &std::path::Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let key_pair = rcgen::KeyPair::generate().unwrap();
    let params = rcgen::CertificateParams::new(vec!["localhost".to_string()]).unwrap();
    let cert = params.self_signed(&key_pair).unwrap();

    let cert_path = dir.join("cert.pem");
    let key_path = dir.join("key.pem");
    fs::write(&cert_path, cert.pem()).unwrap();
    fs::write(&key_path, key_pair.serialize_pem()).unwrap();
    (cert_path, key_path)
}

/// Verify a keystore using keytool inside an eclipse-temurin container.
/// Returns the entry count reported by keytool.
fn verify_keystore_with_keytool(name: &str, keystore_data: &[u8], password: &str) -> usize {
    let container_path = format!("/tmp/{}", name);

    let container = GenericImage::new("eclipse-temurin", "21-jdk-alpine")
        .with_wait_for(WaitFor::seconds(2))
        .with_copy_to(container_path.clone(), keystore_data.to_vec())
        .with_cmd(vec!["sleep", "infinity"])
        .start()
        .expect("Failed to start Java container");

    let keytool_cmd = format!(
        "keytool -list -keystore {} -storepass {}",
        container_path, password
    );
    let mut result = container
        .exec(ExecCommand::new(vec![
            "sh".to_string(),
            "-c".to_string(),
            keytool_cmd,
        ]))
        .expect("exec failed");

    let stdout = result.stdout_to_vec().expect("read stdout");
    let stdout_str = String::from_utf8_lossy(&stdout);

    let exit_code = result.exit_code().expect("exit code");
    if exit_code != Some(0) {
        let stderr = result.stderr_to_vec().expect("read stderr");
        panic!(
            "keytool failed with exit code {:?}\nstdout: {}\nstderr: {}",
            exit_code,
            stdout_str,
            String::from_utf8_lossy(&stderr)
        );
    }

    let mut entry_count = 0;
    for line in stdout_str.lines() {
        if line.contains("Your keystore contains") {
            let digits: String = line.chars().filter(|c| c.is_ascii_digit()).collect();
            if let Ok(n) = digits.parse::<usize>() {
                entry_count = n;
            }
            break;
        }
    }

    entry_count
}

fn build_keystore(extension: &str) -> Vec<u8> {
    let dir = tempfile::tempdir().unwrap();
    let (cert_path, key_path) = generate_pem_files(dir.path());
    let out_path = dir.path().join(format!("store.{}", extension));

    let mut session = Session::new();
    session.read_certificate(&cert_path).expect("read cert");
    session.read_private_key(&key_path).expect("read key");

    let mut password = b"changeit".to_vec();
    session
        .build_and_write(&out_path, &mut password)
        .expect("build and write");

    fs::read(&out_path).unwrap()
}

#[test]
#[ignore]
fn keytool_accepts_jks_output() {
    let data = build_keystore("jks");
    let count = verify_keystore_with_keytool("store.jks", &data, "changeit");
    assert_eq!(count, 1, "Expected 1 private key entry, got {}", count);
}

#[test]
#[ignore]
fn keytool_accepts_jceks_output() {
    let data = build_keystore("jceks");
    let count = verify_keystore_with_keytool("store.jceks", &data, "changeit");
    assert_eq!(count, 1, "Expected 1 private key entry, got {}", count);
}
