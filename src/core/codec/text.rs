// Byte-level transforms between JSON text and the URL-safe payload.
use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::core::error::{DecodeStage, Error};

/// Characters `encodeURIComponent` leaves alone; everything else is escaped as UTF-8 bytes.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

// Matches browser `atob`: padding optional, non-zero trailing bits accepted.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

pub(crate) fn percent_encode_component(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

pub(crate) fn percent_decode_component(text: &str) -> Result<String, Error> {
    if let Some(offset) = malformed_escape(text) {
        return Err(Error::decode(
            DecodeStage::Percent,
            format!("malformed percent escape at offset {offset}"),
        ));
    }
    percent_decode_str(text)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|err| {
            Error::decode(DecodeStage::Utf8, "percent-decoded payload is not UTF-8")
                .with_source(err)
        })
}

fn malformed_escape(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'%' {
            let valid = bytes.len() > idx + 2
                && bytes[idx + 1].is_ascii_hexdigit()
                && bytes[idx + 2].is_ascii_hexdigit();
            if !valid {
                return Some(idx);
            }
            idx += 3;
        } else {
            idx += 1;
        }
    }
    None
}

pub(crate) fn base64_encode(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

pub(crate) fn base64_decode(raw: &str) -> Result<Vec<u8>, Error> {
    let compact = raw
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace())
        .collect::<String>();
    LENIENT_STANDARD.decode(compact.as_bytes()).map_err(|err| {
        Error::decode(DecodeStage::Base64, format!("invalid base64: {err}")).with_source(err)
    })
}

/// One char per byte, the way `atob` hands back a binary string.
pub(crate) fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| char::from(byte)).collect()
}

pub(crate) fn utf8_or_latin1(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|err| latin1_to_string(err.as_bytes()))
}
