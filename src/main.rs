#![forbid(unsafe_code)]
//! CLI for sealfile: encrypt/decrypt files and compute checksums.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use sealfile::{
    chunk_decrypt_file, chunk_encrypt_file, decrypt_file, encrypt_file, file_md5, file_size,
    inspect_container, CipherAlg, DEFAULT_CHUNK_MIB,
};
use tracing_subscriber::EnvFilter;
use zeroize::Zeroize;

#[derive(Parser, Debug)]
#[command(
    name = "sealfile",
    version,
    about = "Encrypt/decrypt files with AES-256-CBC or ChaCha20-Poly1305"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encrypt a file in one pass (small files; no container header)
    Encrypt(CryptArgs),
    /// Decrypt a whole-file blob
    Decrypt(CryptArgs),
    /// Encrypt a file into the chunked container (large files)
    ChunkEncrypt(ChunkEncArgs),
    /// Decrypt a chunked container
    ChunkDecrypt(CryptArgs),
    /// Show the header of a chunked container
    Info(PathArg),
    /// Compute the MD5 digest of a file
    Md5(PathArg),
    /// Print the byte size of a file
    Size(PathArg),
}

#[derive(Args, Debug)]
struct KeyArgs {
    /// Key as 64 hex chars (32 bytes) on the command line
    #[arg(long = "key-hex", conflicts_with = "key_file")]
    key_hex: Option<String>,

    /// File containing the key as 64 hex chars (trailing newline ignored)
    #[arg(short = 'k', long = "key-file")]
    key_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CryptArgs {
    /// Input file
    #[arg(short = 'i', long = "in")]
    input: PathBuf,

    /// Output file
    #[arg(short = 'o', long = "out")]
    output: PathBuf,

    #[arg(short = 'a', long, value_enum, default_value_t = AlgChoice::Chacha)]
    alg: AlgChoice,

    #[command(flatten)]
    key: KeyArgs,
}

#[derive(Args, Debug)]
struct ChunkEncArgs {
    #[command(flatten)]
    common: CryptArgs,

    /// Chunk size in MiB (>= 1)
    #[arg(long = "chunk-mib", default_value_t = DEFAULT_CHUNK_MIB)]
    chunk_mib: u32,
}

#[derive(Args, Debug)]
struct PathArg {
    /// Target file
    file: PathBuf,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum AlgChoice {
    /// AES-256-CBC with PKCS#7 padding
    #[value(alias = "aes256cbc")]
    Aes,
    /// ChaCha20-Poly1305 AEAD
    #[value(alias = "chacha20poly1305")]
    Chacha,
}

impl From<AlgChoice> for CipherAlg {
    fn from(v: AlgChoice) -> Self {
        match v {
            AlgChoice::Aes => CipherAlg::Aes256Cbc,
            AlgChoice::Chacha => CipherAlg::ChaCha20Poly1305,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Encrypt(a) => cmd_encrypt(a),
        Command::Decrypt(a) => cmd_decrypt(a),
        Command::ChunkEncrypt(a) => cmd_chunk_encrypt(a),
        Command::ChunkDecrypt(a) => cmd_chunk_decrypt(a),
        Command::Info(a) => cmd_info(a),
        Command::Md5(a) => cmd_md5(a),
        Command::Size(a) => cmd_size(a),
    }
}

/// Load the 32-byte key from either flag; the hex buffers are wiped after
/// decoding.
fn read_key(args: &KeyArgs) -> Result<Vec<u8>> {
    let mut hex_str = if let Some(ref h) = args.key_hex {
        h.clone()
    } else if let Some(ref path) = args.key_file {
        let mut s = fs::read_to_string(path)
            .with_context(|| format!("failed to read key file {}", path.display()))?;
        let trimmed = s.trim_end_matches(&['\r', '\n'][..]).to_owned();
        s.zeroize();
        trimmed
    } else {
        bail!("provide a key with --key-hex or --key-file");
    };

    let decoded = hex::decode(&hex_str).context("key is not valid hex");
    hex_str.zeroize();
    let key = decoded?;
    if key.len() != 32 {
        bail!("key must be 32 bytes (64 hex chars), got {}", key.len());
    }
    Ok(key)
}

fn cmd_encrypt(a: CryptArgs) -> Result<()> {
    let mut key = read_key(&a.key)?;
    let result = encrypt_file(a.alg.into(), &key, &a.input, &a.output);
    key.zeroize();
    let report = result.with_context(|| "encryption failed")?;

    eprintln!("Wrote {}", a.output.display());
    println!("file size: {} KB", report.file_size_kb);
    Ok(())
}

fn cmd_decrypt(a: CryptArgs) -> Result<()> {
    let mut key = read_key(&a.key)?;
    let result = decrypt_file(a.alg.into(), &key, &a.input, &a.output);
    key.zeroize();
    let report = result.with_context(|| "decryption failed")?;

    eprintln!("Wrote {}", a.output.display());
    println!("file size:      {} KB", report.file_size_kb);
    println!("encrypted size: {} KB", report.encrypted_size_kb);
    Ok(())
}

fn cmd_chunk_encrypt(a: ChunkEncArgs) -> Result<()> {
    let mut key = read_key(&a.common.key)?;
    let result = chunk_encrypt_file(
        a.common.alg.into(),
        &key,
        &a.common.input,
        &a.common.output,
        a.chunk_mib,
    );
    key.zeroize();
    let report = result.with_context(|| "chunked encryption failed")?;

    eprintln!("Wrote {}", a.common.output.display());
    println!("file size:  {} KB", report.file_size_kb);
    println!("chunk size: {} KB", report.chunk_size_kb);
    println!("chunks:     {}", report.total_chunks);
    Ok(())
}

fn cmd_chunk_decrypt(a: CryptArgs) -> Result<()> {
    let mut key = read_key(&a.key)?;
    let result = chunk_decrypt_file(a.alg.into(), &key, &a.input, &a.output);
    key.zeroize();
    let report = result.with_context(|| "chunked decryption failed")?;

    eprintln!("Wrote {}", a.output.display());
    println!("original size: {} KB", report.original_size_kb);
    println!("chunk size:    {} KB", report.chunk_size_kb);
    println!("chunks:        {}", report.total_chunks);
    Ok(())
}

fn cmd_info(a: PathArg) -> Result<()> {
    let header = inspect_container(&a.file).with_context(|| "failed to read container header")?;
    println!("algorithm:  {}", header.algorithm);
    println!("chunk size: {} bytes", header.chunk_size);
    Ok(())
}

fn cmd_md5(a: PathArg) -> Result<()> {
    let digest = file_md5(&a.file).with_context(|| "failed to hash file")?;
    println!("{digest}");
    Ok(())
}

fn cmd_size(a: PathArg) -> Result<()> {
    let bytes = file_size(&a.file).with_context(|| "failed to stat file")?;
    println!("{bytes}");
    Ok(())
}
