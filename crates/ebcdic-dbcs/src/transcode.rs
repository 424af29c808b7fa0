//! Conversion between EBCDIC and external character encodings.
//!
//! The external side is any encoding `encoding_rs` knows by a WHATWG label
//! (`utf-8`, `gbk`, `gb18030`, `big5`, `shift_jis`, `utf-16le`, ...). Text
//! passes through a Rust `String` in between.

use ebcdic_dbcs_core::{CodecError, ErrorMode};
pub use encoding_rs::Encoding;

use crate::codec::Codec;

/// Look up an external encoding by label, case-insensitively.
///
/// # Errors
///
/// Returns [`CodecError::Other`] for labels `encoding_rs` does not know.
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding, CodecError> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| CodecError::Other(format!("unknown encoding label '{label}'")))
}

/// Decode bytes in an external encoding.
///
/// A leading byte order mark is not treated specially. In
/// [`ErrorMode::Replace`] malformed sequences become U+FFFD.
pub fn decode_external(
    bytes: &[u8],
    encoding: &'static Encoding,
    mode: ErrorMode,
) -> Result<String, CodecError> {
    if mode == ErrorMode::Replace {
        let (text, _had_errors) = encoding.decode_without_bom_handling(bytes);
        return Ok(text.into_owned());
    }

    let mut decoder = encoding.new_decoder_without_bom_handling();
    let mut out = String::with_capacity(
        decoder
            .max_utf8_buffer_length_without_replacement(bytes.len())
            .unwrap_or(bytes.len()),
    );
    let mut read = 0;
    loop {
        let (result, consumed) =
            decoder.decode_to_string_without_replacement(&bytes[read..], &mut out, true);
        read += consumed;
        match result {
            encoding_rs::DecoderResult::InputEmpty => return Ok(out),
            encoding_rs::DecoderResult::OutputFull => {
                let more = decoder
                    .max_utf8_buffer_length_without_replacement(bytes.len() - read)
                    .unwrap_or(bytes.len() - read)
                    .max(4);
                out.reserve(more);
            }
            encoding_rs::DecoderResult::Malformed(bad, extra) => {
                return Err(CodecError::Malformed {
                    offset: read - usize::from(bad) - usize::from(extra),
                    len: usize::from(bad),
                });
            }
        }
    }
}

/// Encode text in an external encoding.
///
/// UTF-16 labels produce UTF-16 (without BOM). In [`ErrorMode::Replace`]
/// unmappable characters become HTML numeric character references, as
/// `encoding_rs` does for the web.
pub fn encode_external(
    text: &str,
    encoding: &'static Encoding,
    mode: ErrorMode,
) -> Result<Vec<u8>, CodecError> {
    if encoding == encoding_rs::UTF_16LE {
        return Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect());
    }
    if encoding == encoding_rs::UTF_16BE {
        return Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect());
    }

    if mode == ErrorMode::Replace {
        let (bytes, _, _had_errors) = encoding.encode(text);
        return Ok(bytes.into_owned());
    }

    let mut encoder = encoding.new_encoder();
    let mut out = Vec::with_capacity(
        encoder
            .max_buffer_length_from_utf8_without_replacement(text.len())
            .unwrap_or(text.len()),
    );
    let mut read = 0;
    loop {
        let (result, consumed) =
            encoder.encode_from_utf8_to_vec_without_replacement(&text[read..], &mut out, true);
        read += consumed;
        match result {
            encoding_rs::EncoderResult::InputEmpty => return Ok(out),
            encoding_rs::EncoderResult::OutputFull => {
                let more = encoder
                    .max_buffer_length_from_utf8_without_replacement(text.len() - read)
                    .unwrap_or(text.len() - read)
                    .max(8);
                out.reserve(more);
            }
            encoding_rs::EncoderResult::Unmappable(ch) => {
                return Err(CodecError::UnmappableChar {
                    offset: read - ch.len_utf8(),
                    ch,
                });
            }
        }
    }
}

/// Convert external-encoding bytes to EBCDIC.
pub fn to_ebcdic(
    codec: &Codec,
    bytes: &[u8],
    from: &'static Encoding,
    mode: ErrorMode,
) -> Result<Vec<u8>, CodecError> {
    let text = decode_external(bytes, from, mode)?;
    codec.encode(&text, mode)
}

/// Convert EBCDIC bytes to an external encoding.
pub fn from_ebcdic(
    codec: &Codec,
    bytes: &[u8],
    to: &'static Encoding,
    mode: ErrorMode,
) -> Result<Vec<u8>, CodecError> {
    let text = codec.decode(bytes, mode)?;
    encode_external(&text, to, mode)
}
