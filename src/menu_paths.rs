//! Purpose: Shared menu-directory and vendor-id path resolution helpers.
//! Exports: `default_menu_dir`, `resolve_vendor_path`, `vendor_from_file_name`.
//! Role: Keep CLI and store path semantics aligned from one source.
//! Invariants: Default menu directory remains `~/.quickmenu/menus`.
//! Invariants: Vendor ids are opaque but must not escape the menu directory.

use std::path::{Path, PathBuf};

pub(crate) const MENU_FILE_SUFFIX: &str = ".menu.json";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum VendorResolveError {
    Empty,
    ContainsPathSeparator,
    Reserved,
}

pub fn default_menu_dir() -> PathBuf {
    let home = std::env::var_os("HOME").unwrap_or_default();
    PathBuf::from(home).join(".quickmenu").join("menus")
}

pub(crate) fn resolve_vendor_path(
    vendor: &str,
    menu_dir: &Path,
) -> Result<PathBuf, VendorResolveError> {
    if vendor.is_empty() {
        return Err(VendorResolveError::Empty);
    }
    if vendor.contains('/') || vendor.contains('\\') {
        return Err(VendorResolveError::ContainsPathSeparator);
    }
    if vendor == "." || vendor == ".." {
        return Err(VendorResolveError::Reserved);
    }
    Ok(menu_dir.join(format!("{vendor}{MENU_FILE_SUFFIX}")))
}

pub(crate) fn vendor_from_file_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(MENU_FILE_SUFFIX)
        .filter(|vendor| !vendor.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{VendorResolveError, resolve_vendor_path, vendor_from_file_name};
    use std::path::Path;

    #[test]
    fn vendor_ids_map_to_menu_files() {
        let dir = Path::new("/tmp/menus");
        assert_eq!(
            resolve_vendor_path("uid-123", dir).expect("path"),
            dir.join("uid-123.menu.json")
        );
        assert_eq!(vendor_from_file_name("uid-123.menu.json"), Some("uid-123"));
        assert_eq!(vendor_from_file_name("uid-123.menu.lock"), None);
        assert_eq!(vendor_from_file_name(".menu.json"), None);
    }

    #[test]
    fn unsafe_vendor_ids_are_rejected() {
        let dir = Path::new("/tmp/menus");
        assert_eq!(resolve_vendor_path("", dir), Err(VendorResolveError::Empty));
        assert_eq!(
            resolve_vendor_path("../etc", dir),
            Err(VendorResolveError::ContainsPathSeparator)
        );
        assert_eq!(resolve_vendor_path("..", dir), Err(VendorResolveError::Reserved));
    }
}
