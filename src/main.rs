use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use pem2keystore::{FixedEntropy, Session};

#[derive(Parser)]
#[command(
    name = "pem2keystore",
    about = "Convert a PEM private key and certificate into a Java keystore (JKS/JCEKS)"
)]
struct Cli {
    /// PEM file containing an X.509 certificate
    #[arg(short = 'c', long = "cert", value_name = "FILE")]
    cert: PathBuf,

    /// PEM file containing a PKCS#8 private key
    #[arg(short = 'k', long = "key", value_name = "FILE")]
    key: PathBuf,

    /// Output keystore path (.jks or .jceks)
    #[arg(short = 'o', long = "output", default_value = "keystore.jks")]
    output: PathBuf,

    /// Keystore password
    #[arg(short = 'p', long = "password")]
    password: Option<String>,

    /// File containing the keystore password
    #[arg(long = "password-file")]
    password_file: Option<PathBuf>,

    /// Draw key-protection salt from a fixed constant instead of the
    /// system RNG. Output becomes reproducible but offers weaker
    /// protection; intended for testing only.
    #[arg(long = "fixed-entropy")]
    fixed_entropy: bool,
}

fn resolve_password(cli: &Cli) -> Result<String, String> {
    if let Some(ref pw) = cli.password {
        return Ok(pw.clone());
    }
    if let Some(ref pw_file) = cli.password_file {
        let content = fs::read_to_string(pw_file)
            .map_err(|e| format!("failed to read password file '{}': {}", pw_file.display(), e))?;
        return Ok(content.trim().to_string());
    }
    if let Ok(pw) = std::env::var("KEYSTORE_PASSWORD") {
        return Ok(pw);
    }
    Err(
        "no password provided: use --password, --password-file, or KEYSTORE_PASSWORD env"
            .to_string(),
    )
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let password = match resolve_password(&cli) {
        Ok(pw) => pw,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    let mut session = if cli.fixed_entropy {
        eprintln!("warning: --fixed-entropy produces reproducible but weakly protected output");
        Session::with_entropy(Box::new(FixedEntropy::default()))
    } else {
        Session::new()
    };

    if let Err(e) = session.read_certificate(&cli.cert) {
        eprintln!("error: certificate '{}': {}", cli.cert.display(), e);
        process::exit(1);
    }

    if let Err(e) = session.read_private_key(&cli.key) {
        eprintln!("error: private key '{}': {}", cli.key.display(), e);
        process::exit(1);
    }

    // build_and_write zeroes the buffer on every exit path.
    let mut password_bytes = password.into_bytes();
    let result = session.build_and_write(&cli.output, &mut password_bytes);

    match result {
        Ok(()) => println!("Created keystore: {}", cli.output.display()),
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}
