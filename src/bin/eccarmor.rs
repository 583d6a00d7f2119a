//! ECC armoring command line tool
//!
//! Encodes files into the ECC armor block format and decodes (and repairs)
//! them back. The library does the real work against in-memory buffers; this
//! binary is just the file plumbing around it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Arg, Command};

use eccarmor::format::ECC_EXTENSION;
use eccarmor::DecodeError;

fn main() -> Result<()> {
    env_logger::init();

    let matches = Command::new("eccarmor")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Reed-Solomon ECC armoring for files")
        .subcommand_required(true)
        .subcommand(
            Command::new("encode")
                .about("Armor a file with ECC blocks")
                .arg(Arg::new("input").help("Input file").required(true))
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Output file (defaults to INPUT.ecc)"),
                ),
        )
        .subcommand(
            Command::new("decode")
                .about("Decode an armored file, repairing damage if possible")
                .arg(Arg::new("input").help("Input file").required(true))
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Output file (defaults to INPUT without the .ecc suffix)"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("encode", sub)) => {
            let input = Path::new(sub.get_one::<String>("input").expect("input is required"));
            let output = match sub.get_one::<String>("output") {
                Some(path) => PathBuf::from(path),
                None => {
                    let mut name = input.as_os_str().to_owned();
                    name.push(".");
                    name.push(ECC_EXTENSION);
                    PathBuf::from(name)
                }
            };
            encode_file(input, &output)
        }
        Some(("decode", sub)) => {
            let input = Path::new(sub.get_one::<String>("input").expect("input is required"));
            let output = match sub.get_one::<String>("output") {
                Some(path) => PathBuf::from(path),
                None => default_decode_output(input),
            };
            decode_file(input, &output)
        }
        _ => unreachable!("subcommand is required"),
    }
}

/// INPUT.ecc -> INPUT; anything else gets a .out suffix
fn default_decode_output(input: &Path) -> PathBuf {
    if input.extension().is_some_and(|ext| ext == ECC_EXTENSION) {
        input.with_extension("")
    } else {
        let mut name = input.as_os_str().to_owned();
        name.push(".out");
        PathBuf::from(name)
    }
}

fn encode_file(input: &Path, output: &Path) -> Result<()> {
    let payload =
        fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;

    let encoded = eccarmor::encode_to_vec(&payload);
    fs::write(output, &encoded)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "Encoded {} bytes into {} ({} bytes)",
        payload.len(),
        output.display(),
        encoded.len()
    );
    Ok(())
}

fn decode_file(input: &Path, output: &Path) -> Result<()> {
    let encoded =
        fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;

    let mut decoded = vec![0u8; eccarmor::decoded_size(encoded.len())];
    let summary = match eccarmor::decode(&encoded, &mut decoded) {
        Ok(summary) => summary,
        Err(DecodeError::NotEccFormat) => {
            bail!("{} is not an ECC armor file", input.display())
        }
        Err(err) => bail!("failed to decode {}: {}", input.display(), err),
    };
    decoded.truncate(summary.len);

    fs::write(output, &decoded)
        .with_context(|| format!("failed to write {}", output.display()))?;

    if summary.corrected_blocks > 0 {
        println!(
            "Corrected {} damaged block(s) while decoding",
            summary.corrected_blocks
        );
    }
    println!(
        "Decoded {} bytes into {}",
        summary.len,
        output.display()
    );
    Ok(())
}
