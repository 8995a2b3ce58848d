//! Purpose: Library crate behind the `quickmenu` CLI and its tests.
//! Exports: `api` (stable surface), `core` (model, codec, validation, persistence), `notice`.
//! Role: Menu model plus the QR fragment codec; the store is a local stand-in for persistence.
//! Invariants: The codec is pure; only `api::LocalStore` touches the filesystem.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod api;
pub mod core;
pub(crate) mod json;
mod menu_paths;
pub mod notice;
