//! Implementations of the vault subcommands.
//!
//! Every command resolves the key explicitly per invocation and hands it to
//! the codec — nothing here caches key material between calls. Command output
//! goes to stdout; logs go to stderr via tracing.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use tokio::fs;
use tracing::info;

use crate::config::Config;
use crate::keysource::{self, KeyBytes};
use crate::store::EmbeddingStore;

/// Output path sentinel: print base64url to stdout instead of writing a file.
pub const STDOUT_SENTINEL: &str = "-";

/// Extension appended to sealed output files by default.
const SEALED_SUFFIX: &str = ".sealed";

/// `vault seal <input> [output]` — seal a payload file into a token file.
pub async fn seal_file(cfg: &Config, input: &str, output: Option<&str>) -> Result<()> {
    let key = resolve_key(cfg).await?;
    let payload = fs::read(input)
        .await
        .with_context(|| format!("failed to read payload file {input}"))?;

    let token = sealed::seal(key.as_slice(), &payload)?;
    info!(input, payload_bytes = payload.len(), "payload sealed");

    let default_output = format!("{input}{SEALED_SUFFIX}");
    emit(output.unwrap_or(&default_output), &token).await
}

/// `vault open <input> [output]` — recover the payload from a token file.
pub async fn open_file(cfg: &Config, input: &str, output: Option<&str>) -> Result<()> {
    let key = resolve_key(cfg).await?;
    let token = fs::read(input)
        .await
        .with_context(|| format!("failed to read token file {input}"))?;

    let payload = sealed::open(key.as_slice(), &token)?;
    info!(input, payload_bytes = payload.len(), "token opened");

    let inferred;
    let out = match output {
        Some(out) => out,
        None => {
            inferred = input
                .strip_suffix(SEALED_SUFFIX)
                .context("cannot infer output path: input does not end in .sealed")?;
            inferred
        }
    };
    emit(out, &payload).await
}

/// `vault store <name> <input>` — seal a payload file into the embedding store.
pub async fn store_record(cfg: &Config, name: &str, input: &str) -> Result<()> {
    let key = resolve_key(cfg).await?;
    let payload = fs::read(input)
        .await
        .with_context(|| format!("failed to read payload file {input}"))?;

    let token = sealed::seal(key.as_slice(), &payload)?;
    let store = EmbeddingStore::open(&cfg.embeddings_dir).await?;
    store.save(name, &token).await?;

    info!(record = name, payload_bytes = payload.len(), "record stored");
    println!(
        "{}",
        store
            .dir()
            .join(format!("{name}.{}", crate::store::TOKEN_EXT))
            .display()
    );
    Ok(())
}

/// `vault fetch <name> <output>` — load a record from the store and open it.
pub async fn fetch_record(cfg: &Config, name: &str, output: &str) -> Result<()> {
    let key = resolve_key(cfg).await?;
    let store = EmbeddingStore::open(&cfg.embeddings_dir).await?;
    let token = store.load(name).await?;

    let payload = sealed::open(key.as_slice(), &token)?;
    info!(record = name, payload_bytes = payload.len(), "record fetched");

    emit(output, &payload).await
}

/// `vault list` — print stored record names as a JSON array.
pub async fn list_records(cfg: &Config) -> Result<()> {
    let store = EmbeddingStore::open(&cfg.embeddings_dir).await?;
    let names = store.list().await?;
    println!("{}", serde_json::to_string(&names)?);
    Ok(())
}

async fn resolve_key(cfg: &Config) -> Result<KeyBytes> {
    keysource::resolve(cfg.key_file.as_deref())
        .await
        .context("failed to resolve sealing key")
}

/// Write `bytes` to `out`, or print them base64url-encoded for `-`.
async fn emit(out: &str, bytes: &[u8]) -> Result<()> {
    if out == STDOUT_SENTINEL {
        println!("{}", URL_SAFE_NO_PAD.encode(bytes));
    } else {
        fs::write(out, bytes)
            .await
            .with_context(|| format!("failed to write {out}"))?;
        println!("{out}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keysource::KEY_ENV_VAR;

    fn test_config(dir: &std::path::Path) -> Config {
        Config {
            embeddings_dir: dir.join("embeddings").to_str().unwrap().to_owned(),
            key_file: None,
            log_level: "info".into(),
        }
    }

    #[tokio::test]
    async fn seal_then_open_round_trips_through_files() {
        std::env::set_var(KEY_ENV_VAR, "01".repeat(32));
        let dir = tempfile::tempdir().unwrap();
        let cfg = test_config(dir.path());

        let input = dir.path().join("vec.bin");
        fs::write(&input, b"face-vector-test").await.unwrap();
        let input = input.to_str().unwrap();

        seal_file(&cfg, input, None).await.unwrap();

        let token = fs::read(format!("{input}.sealed")).await.unwrap();
        assert_eq!(token.len(), 12 + 16 + 16);

        let output = dir.path().join("recovered.bin");
        open_file(&cfg, &format!("{input}.sealed"), output.to_str())
            .await
            .unwrap();
        assert_eq!(fs::read(&output).await.unwrap(), b"face-vector-test");
    }

    #[tokio::test]
    async fn store_then_fetch_round_trips() {
        std::env::set_var(KEY_ENV_VAR, "01".repeat(32));
        let dir = tempfile::tempdir().unwrap();
        let cfg = test_config(dir.path());

        let input = dir.path().join("vec.bin");
        fs::write(&input, b"face-vector-test").await.unwrap();

        store_record(&cfg, "alice", input.to_str().unwrap())
            .await
            .unwrap();

        let output = dir.path().join("out.bin");
        fetch_record(&cfg, "alice", output.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(fs::read(&output).await.unwrap(), b"face-vector-test");
    }
}
