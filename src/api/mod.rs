//! Purpose: Define the stable public Rust API boundary for quickmenu.
//! Exports: Menu model, codec operations, validation rules, and the local store.
//! Role: Public, additive-only surface used by the CLI and integration tests.
//! Invariants: This module is the only public path to store internals.
//! Invariants: Codec functions stay free functions with no ambient state.

mod client;

pub use crate::core::codec::{
    DecodeOutcome, DecodedMenu, LEGACY_MARKER, PayloadFormat, QR_BYTE_CAPACITY, VIEW_MARKER,
    decode, encode, fragment_from_input, share_url,
};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{DecodeStage, Error, ErrorKind};
pub use crate::core::menu::{
    Category, MenuItem, MenuItemDraft, MenuItemPatch, Price, PriceParseError, StallInfo, WaitTime,
};
pub use crate::core::menu_file::{DEFAULT_STALL_NAME, DEFAULT_WAIT_MINUTES, MenuDocument};
pub use crate::core::validate::{
    ValidationIssue, ValidationReport, format_price, parse_category, parse_price, validate_item,
    validate_stall,
};
pub use crate::menu_paths::default_menu_dir;
pub use client::{ApiResult, InitOutcome, LocalStore};
