// Menu document persistence: atomic JSON replace plus a sidecar lock for read-modify-write.
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use libc::{EACCES, EPERM};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::error::{Error, ErrorKind};
use crate::core::menu::{MenuItem, StallInfo, WaitTime};
use crate::json::parse;

pub const DOCUMENT_VERSION: &str = "2.0";
pub const DEFAULT_STALL_NAME: &str = "My Stall";
pub const DEFAULT_WAIT_MINUTES: u64 = 10;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuDocument {
    pub version: String,
    pub stall_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_time: Option<WaitTime>,
    #[serde(default)]
    pub items: Vec<MenuItem>,
    pub created_at: String,
    pub updated_at: String,
}

impl MenuDocument {
    pub fn new(now: String) -> Self {
        Self {
            version: DOCUMENT_VERSION.to_string(),
            stall_name: DEFAULT_STALL_NAME.to_string(),
            wait_time: Some(WaitTime::Minutes(DEFAULT_WAIT_MINUTES)),
            items: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn stall(&self) -> StallInfo {
        StallInfo {
            stall_name: self.stall_name.clone(),
            wait_time: self.wait_time.clone(),
        }
    }
}

pub struct MenuFile {
    path: PathBuf,
    lock_path: PathBuf,
}

impl MenuFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let lock_path = path.with_extension("lock");
        Self { path, lock_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `None` when no document has been written yet.
    pub fn read(&self) -> Result<Option<MenuDocument>, Error> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(Error::new(io_error_kind(&err))
                    .with_message("failed to read menu document")
                    .with_path(&self.path)
                    .with_source(err));
            }
        };
        let document = parse::from_str(&text).map_err(|err| {
            Error::new(ErrorKind::Corrupt)
                .with_message("menu document is not valid")
                .with_hint(parse::hint_for_error(&err, "menu document"))
                .with_path(&self.path)
                .with_source(err)
        })?;
        Ok(Some(document))
    }

    pub fn write(&self, document: &MenuDocument) -> Result<(), Error> {
        self.ensure_parent()?;
        let json = serde_json::to_string_pretty(document).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("failed to serialize menu document")
                .with_source(err)
        })?;
        let tmp_path = self.path.with_extension("json.tmp");
        let mut tmp = File::create(&tmp_path)
            .map_err(|err| Error::new(io_error_kind(&err)).with_path(&tmp_path).with_source(err))?;
        tmp.write_all(json.as_bytes())
            .and_then(|()| tmp.write_all(b"\n"))
            .and_then(|()| tmp.sync_all())
            .map_err(|err| Error::new(ErrorKind::Io).with_path(&tmp_path).with_source(err))?;
        fs::rename(&tmp_path, &self.path)
            .map_err(|err| Error::new(io_error_kind(&err)).with_path(&self.path).with_source(err))
    }

    pub fn lock(&self) -> Result<MenuLock, Error> {
        self.ensure_parent()?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&self.lock_path)
            .map_err(|err| {
                Error::new(io_error_kind(&err))
                    .with_path(&self.lock_path)
                    .with_source(err)
            })?;
        file.lock_exclusive().map_err(|err| {
            Error::new(lock_error_kind(&err))
                .with_message("failed to lock menu document")
                .with_path(&self.lock_path)
                .with_source(err)
        })?;
        Ok(MenuLock { file })
    }

    fn ensure_parent(&self) -> Result<(), Error> {
        let Some(parent) = self.path.parent() else {
            return Ok(());
        };
        fs::create_dir_all(parent).map_err(|err| {
            Error::new(io_error_kind(&err))
                .with_message("failed to create menu directory")
                .with_path(parent)
                .with_source(err)
        })
    }
}

pub struct MenuLock {
    file: File,
}

impl Drop for MenuLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

pub fn now_rfc3339() -> Result<String, Error> {
    OffsetDateTime::now_utc().format(&Rfc3339).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to format timestamp")
            .with_source(err)
    })
}

pub(crate) fn io_error_kind(err: &io::Error) -> ErrorKind {
    match err.kind() {
        io::ErrorKind::NotFound => ErrorKind::NotFound,
        io::ErrorKind::PermissionDenied => ErrorKind::Permission,
        _ => ErrorKind::Io,
    }
}

fn lock_error_kind(err: &io::Error) -> ErrorKind {
    let errno = err.raw_os_error().unwrap_or_default();
    if errno == EACCES || errno == EPERM {
        return ErrorKind::Permission;
    }
    match err.kind() {
        io::ErrorKind::WouldBlock => ErrorKind::Busy,
        io::ErrorKind::PermissionDenied => ErrorKind::Permission,
        _ => ErrorKind::Io,
    }
}
