//! Command line arguments.

use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::{Args, Parser, Subcommand, ValueEnum};
use common::ToolError;

/// The main CLI parser
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Deterministic authenticated encryption with AES-SIV (RFC 5297)",
    after_help = "The key is read from SIV_KEY (hex) or SIV_KEY_FILE, never from arguments."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encrypt and authenticate input, writing `iv || ciphertext`
    Encrypt(SealArgs),
    /// Authenticate and decrypt `iv || ciphertext`, writing the plaintext
    Decrypt(SealArgs),
}

impl Command {
    /// Arguments shared by every subcommand.
    pub fn args(&self) -> &SealArgs {
        match self {
            Command::Encrypt(args) | Command::Decrypt(args) => args,
        }
    }
}

/// Arguments for both directions
#[derive(Debug, Args)]
pub struct SealArgs {
    /// Associated data element; repeat for more. Order is significant and
    /// must match between encryption and decryption.
    #[arg(long = "ad", value_name = "VALUE")]
    pub associated_data: Vec<String>,

    /// How each --ad value is encoded
    #[arg(long, value_enum, default_value_t = AdEncoding::Utf8)]
    pub ad_encoding: AdEncoding,

    /// Read input from this file instead of stdin
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Write output to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Use the `siv1.<iv>.<ciphertext>` text form for the ciphertext
    #[arg(long)]
    pub armor: bool,

    /// Write results and errors as JSON
    #[arg(long)]
    pub json: bool,
}

impl SealArgs {
    /// Decode the --ad values, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::BadInput`] naming the first element that does not
    /// decode.
    pub fn decode_associated_data(&self) -> Result<Vec<Vec<u8>>, ToolError> {
        self.associated_data
            .iter()
            .enumerate()
            .map(|(i, value)| {
                self.ad_encoding.decode(value).ok_or_else(|| {
                    ToolError::BadInput(format!(
                        "associated data element {i} is not valid {}",
                        self.ad_encoding.name()
                    ))
                })
            })
            .collect()
    }
}

/// Encoding of associated data on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AdEncoding {
    /// Raw UTF-8 text
    Utf8,
    /// Hexadecimal
    Hex,
    /// Standard padded base64
    Base64,
}

impl AdEncoding {
    fn decode(self, value: &str) -> Option<Vec<u8>> {
        match self {
            AdEncoding::Utf8 => Some(value.as_bytes().to_vec()),
            AdEncoding::Hex => hex::decode(value).ok(),
            AdEncoding::Base64 => STANDARD.decode(value).ok(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            AdEncoding::Utf8 => "utf-8",
            AdEncoding::Hex => "hex",
            AdEncoding::Base64 => "base64",
        }
    }
}
