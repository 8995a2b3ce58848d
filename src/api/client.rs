//! Purpose: File-backed menu store keyed by an opaque vendor identifier.
//! Exports: `LocalStore`, `InitOutcome`, `ApiResult`.
//! Role: Local stand-in for the persistence collaborator (get/set/add/update/remove).
//! Invariants: Every mutation validates first, then holds the vendor lock across read-modify-write.
//! Invariants: The codec never depends on this module; callers pass it plain items.
#![allow(clippy::result_large_err)]

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use getrandom::fill as fill_random;

use crate::core::error::{Error, ErrorKind};
use crate::core::menu::{MenuItem, MenuItemDraft, MenuItemPatch, StallInfo};
use crate::core::menu_file::{MenuDocument, MenuFile, io_error_kind, now_rfc3339};
use crate::core::validate::{
    ValidationIssue, validate_item, validate_stall, validate_stall_name,
};
use crate::menu_paths::{
    VendorResolveError, default_menu_dir, resolve_vendor_path, vendor_from_file_name,
};

pub type ApiResult<T> = Result<T, Error>;

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Clone, Debug, PartialEq)]
pub struct InitOutcome {
    pub created: bool,
    pub path: PathBuf,
    pub document: MenuDocument,
}

#[derive(Clone, Debug)]
pub struct LocalStore {
    menu_dir: PathBuf,
}

impl LocalStore {
    pub fn new() -> Self {
        Self {
            menu_dir: default_menu_dir(),
        }
    }

    pub fn with_menu_dir(mut self, menu_dir: impl Into<PathBuf>) -> Self {
        self.menu_dir = menu_dir.into();
        self
    }

    pub fn menu_dir(&self) -> &Path {
        &self.menu_dir
    }

    pub fn menu_path(&self, vendor: &str) -> ApiResult<PathBuf> {
        resolve_vendor_path(vendor, &self.menu_dir).map_err(map_vendor_resolve_error)
    }

    /// Creates the vendor document with default settings; an existing document is left as is.
    pub fn initialize(&self, vendor: &str) -> ApiResult<InitOutcome> {
        let path = self.menu_path(vendor)?;
        let file = MenuFile::new(&path);
        let _lock = file.lock()?;
        if let Some(document) = file.read()? {
            return Ok(InitOutcome {
                created: false,
                path,
                document,
            });
        }
        let document = MenuDocument::new(now_rfc3339()?);
        file.write(&document)?;
        tracing::info!(vendor, "initialized menu");
        Ok(InitOutcome {
            created: true,
            path,
            document,
        })
    }

    pub fn get(&self, vendor: &str) -> ApiResult<Option<MenuDocument>> {
        let path = self.menu_path(vendor)?;
        let document = MenuFile::new(&path).read()?;
        tracing::debug!(vendor, found = document.is_some(), "loaded menu");
        Ok(document)
    }

    pub fn require(&self, vendor: &str) -> ApiResult<MenuDocument> {
        self.get(vendor)?.ok_or_else(|| missing_menu(vendor))
    }

    /// Merges stall settings into the document, creating it when absent.
    pub fn save_settings(&self, vendor: &str, stall: StallInfo) -> ApiResult<StallInfo> {
        let stall = StallInfo {
            stall_name: stall.stall_name.trim().to_string(),
            wait_time: stall.wait_time,
        };
        validate_stall(&stall).into_result()?;
        self.modify(vendor, true, |document| {
            document.stall_name = stall.stall_name.clone();
            document.wait_time = stall.wait_time.clone();
            Ok(())
        })?;
        tracing::info!(vendor, stall_name = %stall.stall_name, "saved stall settings");
        Ok(stall)
    }

    /// Renames the stall, keeping whatever wait time the document already holds.
    pub fn save_stall_name(&self, vendor: &str, stall_name: &str) -> ApiResult<StallInfo> {
        let stall_name = stall_name.trim().to_string();
        validate_stall_name(&stall_name).map_err(ValidationIssue::into_error)?;
        let stall = self.modify(vendor, true, |document| {
            document.stall_name = stall_name;
            Ok(document.stall())
        })?;
        tracing::info!(vendor, stall_name = %stall.stall_name, "saved stall name");
        Ok(stall)
    }

    pub fn add_item(&self, vendor: &str, draft: MenuItemDraft) -> ApiResult<MenuItem> {
        let item = draft.into_item(generate_item_id()?);
        validate_item(&item).into_result()?;
        self.modify(vendor, false, |document| {
            document.items.push(item.clone());
            Ok(())
        })?;
        tracing::info!(vendor, item_id = %item.id, "added menu item");
        Ok(item)
    }

    pub fn update_item(
        &self,
        vendor: &str,
        item_id: &str,
        patch: MenuItemPatch,
    ) -> ApiResult<MenuItem> {
        if patch.is_empty() {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("update requires at least one field")
                .with_hint("Pass --name, --price, --description, --category, or a flag."));
        }
        let item = self.modify(vendor, false, |document| {
            let slot = document
                .items
                .iter_mut()
                .find(|item| item.id == item_id)
                .ok_or_else(|| missing_item(item_id))?;
            let mut updated = slot.clone();
            patch.apply(&mut updated);
            validate_item(&updated).into_result()?;
            *slot = updated.clone();
            Ok(updated)
        })?;
        tracing::info!(vendor, item_id, "updated menu item");
        Ok(item)
    }

    /// Removes the first item whose id or name equals `key`.
    pub fn remove_item(&self, vendor: &str, key: &str) -> ApiResult<MenuItem> {
        let removed = self.modify(vendor, false, |document| {
            let index = document
                .items
                .iter()
                .position(|item| item.id == key || item.name == key)
                .ok_or_else(|| missing_item(key))?;
            Ok(document.items.remove(index))
        })?;
        tracing::info!(vendor, item_id = %removed.id, "removed menu item");
        Ok(removed)
    }

    pub fn list_vendors(&self) -> ApiResult<Vec<String>> {
        let entries = match std::fs::read_dir(&self.menu_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(Error::new(io_error_kind(&err))
                    .with_message("failed to read menu directory")
                    .with_path(&self.menu_dir)
                    .with_source(err));
            }
        };

        let mut vendors = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to read menu directory entry")
                    .with_path(&self.menu_dir)
                    .with_source(err)
            })?;
            let file_name = entry.file_name();
            if let Some(vendor) = file_name.to_str().and_then(vendor_from_file_name) {
                vendors.push(vendor.to_string());
            }
        }
        vendors.sort();
        Ok(vendors)
    }

    fn modify<T>(
        &self,
        vendor: &str,
        create_missing: bool,
        apply: impl FnOnce(&mut MenuDocument) -> ApiResult<T>,
    ) -> ApiResult<T> {
        let path = self.menu_path(vendor)?;
        let file = MenuFile::new(&path);
        let _lock = file.lock()?;
        let mut document = match file.read()? {
            Some(document) => document,
            None if create_missing => MenuDocument::new(now_rfc3339()?),
            None => return Err(missing_menu(vendor).with_path(&path)),
        };
        let out = apply(&mut document)?;
        document.updated_at = now_rfc3339()?;
        file.write(&document)?;
        Ok(out)
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

/// `item_<unix-millis>_<9 base36 chars>`.
pub(crate) fn generate_item_id() -> ApiResult<String> {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis())
        .unwrap_or_default();
    let mut bytes = [0u8; ID_SUFFIX_LEN];
    fill_random(&mut bytes).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message(format!("failed to generate item id: {err}"))
    })?;
    let suffix = bytes
        .iter()
        .map(|byte| char::from(BASE36[usize::from(*byte) % BASE36.len()]))
        .collect::<String>();
    Ok(format!("item_{millis}_{suffix}"))
}

fn missing_menu(vendor: &str) -> Error {
    Error::new(ErrorKind::NotFound)
        .with_message(format!("no menu found for vendor '{vendor}'"))
        .with_hint("Run `quickmenu init` or save stall settings first.")
}

fn missing_item(key: &str) -> Error {
    Error::new(ErrorKind::NotFound).with_message(format!("menu item not found: {key}"))
}

fn map_vendor_resolve_error(err: VendorResolveError) -> Error {
    let message = match err {
        VendorResolveError::Empty => "vendor id must not be empty",
        VendorResolveError::ContainsPathSeparator => "vendor id must not contain path separators",
        VendorResolveError::Reserved => "vendor id must not be '.' or '..'",
    };
    Error::new(ErrorKind::Usage).with_message(message)
}
