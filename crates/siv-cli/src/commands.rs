//! Encrypt and decrypt commands.
//!
//! [`transform`] is a pure bytes-in, bytes-out step; [`execute`] wraps it
//! with stdin/stdout or file I/O.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::protocol::{DecryptResponse, EncryptResponse};
use common::ToolError;
use siv::{SealedMessage, SivContext, SivError};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::cli::{Command, SealArgs};

/// Run `command` against `ctx`, reading input and writing output as the
/// arguments direct.
///
/// # Errors
///
/// Returns [`ToolError`] for I/O failures, malformed input, or failed
/// authentication.
pub fn execute(command: &Command, ctx: &SivContext) -> Result<(), ToolError> {
    let args = command.args();
    let input = Zeroizing::new(read_input(args.input.as_deref())?);
    let output = Zeroizing::new(transform(command, ctx, &input)?);
    write_output(args.output.as_deref(), &output)
}

/// Encrypt or decrypt `input`, returning the bytes to emit.
///
/// # Errors
///
/// Returns [`ToolError::BadInput`] for undecodable associated data or
/// ciphertext framing, and [`ToolError::AuthenticationFailure`] when the
/// ciphertext does not verify.
pub fn transform(command: &Command, ctx: &SivContext, input: &[u8]) -> Result<Vec<u8>, ToolError> {
    let args = command.args();
    let associated_data = args.decode_associated_data()?;
    let associated_data: Vec<&[u8]> = associated_data.iter().map(Vec::as_slice).collect();

    match command {
        Command::Encrypt(_) => encrypt(args, ctx, input, &associated_data),
        Command::Decrypt(_) => decrypt(args, ctx, input, &associated_data),
    }
}

fn encrypt(
    args: &SealArgs,
    ctx: &SivContext,
    plaintext: &[u8],
    associated_data: &[&[u8]],
) -> Result<Vec<u8>, ToolError> {
    let sealed = ctx
        .encrypt_to_message(plaintext, associated_data)
        .map_err(siv_error)?;
    info!(
        plaintext_len = plaintext.len(),
        associated_data_count = associated_data.len(),
        "encrypted"
    );

    if args.json {
        to_json(&EncryptResponse {
            ciphertext: sealed.to_string(),
            plaintext_len: plaintext.len(),
            associated_data_count: associated_data.len(),
        })
    } else if args.armor {
        Ok(format!("{sealed}\n").into_bytes())
    } else {
        Ok(sealed.to_wire())
    }
}

fn decrypt(
    args: &SealArgs,
    ctx: &SivContext,
    input: &[u8],
    associated_data: &[&[u8]],
) -> Result<Vec<u8>, ToolError> {
    let message = if args.armor {
        let text = std::str::from_utf8(input)
            .map_err(|_| ToolError::BadInput("armored ciphertext is not valid UTF-8".into()))?;
        text.parse::<SealedMessage>()
    } else {
        SealedMessage::from_wire(input)
    }
    .map_err(siv_error)?;
    debug!(ciphertext_len = message.ciphertext.len(), "parsed ciphertext");

    let plaintext = Zeroizing::new(
        ctx.decrypt_message(&message, associated_data)
            .map_err(siv_error)?,
    );
    info!(plaintext_len = plaintext.len(), "decrypted");

    if args.json {
        to_json(&DecryptResponse {
            plaintext: STANDARD.encode(&*plaintext),
            plaintext_len: plaintext.len(),
        })
    } else {
        Ok(plaintext.to_vec())
    }
}

/// Map a core error onto the caller-facing error and its exit code.
pub fn siv_error(e: SivError) -> ToolError {
    match e {
        SivError::AuthenticationFailed => ToolError::AuthenticationFailure(e.to_string()),
        SivError::Key(_)
        | SivError::InputTooShort { .. }
        | SivError::TooManyAssociatedData { .. }
        | SivError::InvalidFormat => ToolError::BadInput(e.to_string()),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, ToolError> {
    let mut out =
        serde_json::to_vec(value).map_err(|e| ToolError::Internal(e.to_string()))?;
    out.push(b'\n');
    Ok(out)
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>, ToolError> {
    match path {
        Some(path) => fs::read(path)
            .map_err(|e| ToolError::Io(format!("failed to read {}: {e}", path.display()))),
        None => {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<(), ToolError> {
    match path {
        Some(path) => fs::write(path, bytes)
            .map_err(|e| ToolError::Io(format!("failed to write {}: {e}", path.display()))),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn ctx() -> SivContext {
        siv::setup(&[0u8; 32]).unwrap()
    }

    fn command(argv: &[&str]) -> Command {
        let mut full = vec!["siv"];
        full.extend_from_slice(argv);
        Cli::try_parse_from(full).unwrap().command
    }

    #[test]
    fn raw_encrypt_matches_library() {
        let out = transform(&command(&["encrypt"]), &ctx(), b"hello").unwrap();
        assert_eq!(hex::encode(out), "5c5ad905296274d0d5416d4a648975ca9b619486ac");
    }

    #[test]
    fn raw_round_trip_with_associated_data() {
        let ctx = ctx();
        let sealed = transform(&command(&["encrypt", "--ad", "a", "--ad", "b"]), &ctx, b"msg").unwrap();
        let opened = transform(&command(&["decrypt", "--ad", "a", "--ad", "b"]), &ctx, &sealed).unwrap();
        assert_eq!(opened, b"msg");
    }

    #[test]
    fn armored_round_trip() {
        let ctx = ctx();
        let sealed = transform(&command(&["encrypt", "--armor"]), &ctx, b"hello").unwrap();
        assert_eq!(sealed, b"siv1.XFrZBSlidNDVQW1KZIl1yg.m2GUhqw\n");
        let opened = transform(&command(&["decrypt", "--armor"]), &ctx, &sealed).unwrap();
        assert_eq!(opened, b"hello");
    }

    #[test]
    fn json_envelopes() {
        let ctx = ctx();
        let out = transform(&command(&["encrypt", "--json", "--ad", "x"]), &ctx, b"hello").unwrap();
        let resp: EncryptResponse = serde_json::from_slice(&out).unwrap();
        assert!(resp.ciphertext.starts_with("siv1."));
        assert_eq!(resp.plaintext_len, 5);
        assert_eq!(resp.associated_data_count, 1);

        let out = transform(
            &command(&["decrypt", "--json", "--armor", "--ad", "x"]),
            &ctx,
            resp.ciphertext.as_bytes(),
        )
        .unwrap();
        let resp: DecryptResponse = serde_json::from_slice(&out).unwrap();
        assert_eq!(resp.plaintext, "aGVsbG8=");
    }

    #[test]
    fn wrong_associated_data_is_an_authentication_failure() {
        let ctx = ctx();
        let sealed = transform(&command(&["encrypt", "--ad", "a"]), &ctx, b"msg").unwrap();
        let err = transform(&command(&["decrypt", "--ad", "b"]), &ctx, &sealed).unwrap_err();
        assert!(matches!(err, ToolError::AuthenticationFailure(_)));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn truncated_ciphertext_is_bad_input() {
        let err = transform(&command(&["decrypt"]), &ctx(), &[0u8; 10]).unwrap_err();
        assert!(matches!(err, ToolError::BadInput(_)));
    }

    #[test]
    fn garbage_armor_is_bad_input() {
        let err = transform(&command(&["decrypt", "--armor"]), &ctx(), b"v1.nope").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        let err = transform(&command(&["decrypt", "--armor"]), &ctx(), &[0xff, 0xfe]).unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn file_io_round_trip() {
        let dir = std::env::temp_dir();
        let plain = dir.join(format!("siv-cli-plain-{}", std::process::id()));
        let sealed = dir.join(format!("siv-cli-sealed-{}", std::process::id()));
        let opened = dir.join(format!("siv-cli-opened-{}", std::process::id()));
        fs::write(&plain, b"file contents").unwrap();

        let ctx = ctx();
        let p = |path: &Path| path.to_string_lossy().into_owned();
        execute(&command(&["encrypt", "-i", &p(&plain), "-o", &p(&sealed)]), &ctx).unwrap();
        execute(&command(&["decrypt", "-i", &p(&sealed), "-o", &p(&opened)]), &ctx).unwrap();
        assert_eq!(fs::read(&opened).unwrap(), b"file contents");
        assert_eq!(fs::read(&sealed).unwrap().len(), 13 + siv::IV_LEN);

        for path in [plain, sealed, opened] {
            fs::remove_file(path).unwrap();
        }
    }

    #[test]
    fn missing_input_file_is_io_error() {
        let err = execute(&command(&["encrypt", "-i", "/nonexistent/siv-input"]), &ctx()).unwrap_err();
        assert_eq!(err.exit_code(), 74);
    }
}
