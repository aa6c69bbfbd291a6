//! Standalone password hash generator.
//!
//! Produces a salted SHA-256 digest in the form `sha256$<salt>$<hex>` for
//! seeding accounts by hand. The login path still compares plaintext and does
//! not consume this output; switching it over is tracked separately.

use clap::Parser;
use rand::RngCore;
use sha2::{Digest, Sha256};

#[derive(Parser)]
#[command(name = "hashgen", about = "Generate a salted password hash")]
struct Cli {
    /// Password to hash
    password: String,

    /// Hex salt to reuse; a random 16-byte salt is generated when omitted
    #[arg(long)]
    salt: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let salt = cli.salt.unwrap_or_else(|| {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    });

    println!("{}", hash_password(&cli.password, &salt));
}

fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("sha256${}${}", salt, hex::encode(hasher.finalize()))
}
