//! Purpose: Encode a menu into a single URL fragment and decode fragments back into menus.
//! Exports: `encode`, `decode`, `share_url`, `fragment_from_input`, `DecodeOutcome`, `DecodedMenu`.
//! Role: Pure transform between `core::menu` types and the QR wire format; no I/O.
//! Invariants: Encoded fragments always use the current format under `#/view?m=`.
//! Invariants: Every payload shape ever shipped stays decodable; printed QR codes never change.
//! Invariants: Decoding never re-validates names or prices; only shape errors are failures.
//!
//! Wire format (current):
//! `#/view?m=` + base64( percent-encode( JSON `{"i":[{n,p,d,c,v,a}...],"s":..,"w":..}` ) ).
//! The percent-encoding step keeps base64 operating on ASCII so multi-byte text survives.
mod compact;
mod route;
mod text;

use serde_json::Value;
use url::Url;

use crate::core::error::{DecodeStage, Error, ErrorKind};
use crate::core::menu::{MenuItem, StallInfo};
use crate::json::parse;
use compact::{EncodedPayload, SHAPES};
use route::Route;

pub use route::{LEGACY_MARKER, VIEW_MARKER};

/// Byte-mode capacity of a version-40 QR code at error-correction level M.
pub const QR_BYTE_CAPACITY: usize = 2331;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PayloadFormat {
    /// `{i, s, w}` object under `#/view?m=`.
    Current,
    /// Bare `[{n, p}]` array under `#/view?m=`, from before stall metadata existed.
    PreMetadata,
    /// `{v, t, items}` object under `#menu=`, base64 without percent-encoding.
    Legacy,
}

impl PayloadFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            PayloadFormat::Current => "current",
            PayloadFormat::PreMetadata => "pre-metadata",
            PayloadFormat::Legacy => "legacy",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DecodedMenu {
    pub items: Vec<MenuItem>,
    pub stall: Option<StallInfo>,
    pub format: PayloadFormat,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DecodeOutcome {
    Menu(DecodedMenu),
    /// View route matched but carried no payload; render an empty state.
    ViewWithoutData,
    /// Not a view URL at all; render the editor.
    NotViewRoute,
}

/// Encodes `items` (in display order) and optional stall metadata into a view fragment.
///
/// Empty input is encoded like any other list; callers that must not share an empty menu
/// reject it before calling.
pub fn encode(items: &[MenuItem], stall: Option<&StallInfo>) -> Result<String, Error> {
    let payload = EncodedPayload::new(items, stall);
    let json = serde_json::to_string(&payload).map_err(|err| {
        Error::new(ErrorKind::Encoding)
            .with_message("failed to serialize menu payload")
            .with_source(err)
    })?;
    let escaped = text::percent_encode_component(&json);
    let fragment = format!("{VIEW_MARKER}{}", text::base64_encode(&escaped));
    tracing::debug!(
        items = items.len(),
        json_len = json.len(),
        fragment_len = fragment.len(),
        "encoded menu"
    );
    Ok(fragment)
}

/// Decodes a URL fragment (e.g. `location.hash`) into a menu.
pub fn decode(fragment: &str) -> Result<DecodeOutcome, Error> {
    let Some(matched) = route::match_route(fragment) else {
        tracing::debug!("fragment is not a view route");
        return Ok(DecodeOutcome::NotViewRoute);
    };
    let Some(raw) = matched.payload else {
        tracing::debug!(route = ?matched.route, "view route without payload");
        return Ok(DecodeOutcome::ViewWithoutData);
    };

    match decode_payload(matched.route, raw) {
        Ok(menu) => {
            tracing::debug!(
                format = menu.format.as_str(),
                items = menu.items.len(),
                "decoded menu"
            );
            Ok(DecodeOutcome::Menu(menu))
        }
        Err(err) => {
            tracing::warn!(
                stage = err.stage().map(DecodeStage::as_str),
                "menu payload rejected: {}",
                err.message().unwrap_or("decode failed")
            );
            Err(err)
        }
    }
}

fn decode_payload(route: Route, raw: &str) -> Result<DecodedMenu, Error> {
    let bytes = text::base64_decode(raw)?;
    let json = match route {
        Route::View => text::percent_decode_component(&text::latin1_to_string(&bytes))?,
        Route::Legacy => text::utf8_or_latin1(bytes),
    };
    let value: Value = parse::from_str(&json).map_err(|err| {
        Error::decode(DecodeStage::Json, "menu payload is not valid JSON")
            .with_hint(parse::hint_for_error(&err, "menu payload"))
            .with_source(err)
    })?;

    let shape = SHAPES
        .iter()
        .find(|shape| shape.route == route && (shape.detect)(&value))
        .ok_or_else(|| {
            Error::decode(
                DecodeStage::Shape,
                "menu payload has an unrecognized shape",
            )
        })?;
    shape.decode_value(value)
}

/// Joins `base`'s origin and path with `fragment`, dropping any query or existing fragment.
pub fn share_url(base: &Url, fragment: &str) -> String {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(Some(fragment.strip_prefix('#').unwrap_or(fragment)));
    url.into()
}

/// Accepts either a bare `#...` fragment or a full URL and returns the fragment part.
pub fn fragment_from_input(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with('#') {
        return trimmed.to_string();
    }
    match Url::parse(trimmed) {
        Ok(url) => url
            .fragment()
            .map(|fragment| format!("#{fragment}"))
            .unwrap_or_default(),
        Err(_) => trimmed.to_string(),
    }
}
