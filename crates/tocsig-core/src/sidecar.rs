//! Sidecar header persistence
//!
//! The sidecar is provisioned by the packaging step; this module never
//! creates one. Only its first `DIGEST_LEN` bytes are rewritten, so the file
//! length and any trailing content are preserved.

use crate::config::SidecarCase;
use crate::digest::{Md5Digest, DIGEST_LEN};
use crate::errors::{Result, TocSigError};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Derive the sidecar path for a root manifest.
///
/// `FullPath` upper-cases the whole path string before appending `suffix`
/// (`AddOns/Foo/Foo.toc` becomes `ADDONS/FOO/FOO.TOC.SIG`); `FileName`
/// only transforms the last component.
pub fn sidecar_path(root: &Path, case: SidecarCase, suffix: &str) -> Result<PathBuf> {
    match case {
        SidecarCase::FullPath => {
            let full = root
                .to_str()
                .ok_or_else(|| TocSigError::malformed(root, "path is not valid UTF-8"))?;
            Ok(PathBuf::from(format!("{}{}", full.to_uppercase(), suffix)))
        }
        SidecarCase::FileName => {
            let name = root
                .file_name()
                .ok_or_else(|| TocSigError::malformed(root, "path has no file name"))?
                .to_str()
                .ok_or_else(|| TocSigError::malformed(root, "file name is not valid UTF-8"))?;
            Ok(root.with_file_name(format!("{}{}", name.to_uppercase(), suffix)))
        }
    }
}

/// Overwrite the header of an existing sidecar with `digest`.
///
/// # Errors
/// `SidecarUnavailable` if the file cannot be opened read-write or is
/// shorter than the header; `PermissionDenied`/`Io` if the write fails.
pub fn write_header(sidecar: &Path, digest: &Md5Digest) -> Result<()> {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(sidecar)
        .map_err(|e| TocSigError::sidecar(sidecar, open_reason(&e)))?;
    ensure_header_fits(sidecar, &file)?;

    file.seek(SeekFrom::Start(0))
        .and_then(|_| file.write_all(digest.as_bytes()))
        .and_then(|_| file.flush())
        .map_err(|e| TocSigError::from_io_hard("write_sidecar", sidecar, e))?;

    tracing::info!(
        sidecar = %sidecar.display(),
        digest = %digest,
        "digest header written"
    );
    Ok(())
}

/// Read the digest currently stored in a sidecar header.
pub fn read_header(sidecar: &Path) -> Result<Md5Digest> {
    let mut file = File::open(sidecar).map_err(|e| TocSigError::sidecar(sidecar, open_reason(&e)))?;
    ensure_header_fits(sidecar, &file)?;

    let mut header = [0u8; DIGEST_LEN];
    file.read_exact(&mut header)
        .map_err(|e| TocSigError::from_io_hard("read_sidecar", sidecar, e))?;
    Ok(Md5Digest::from_bytes(header))
}

fn ensure_header_fits(sidecar: &Path, file: &File) -> Result<()> {
    let len = file
        .metadata()
        .map_err(|e| TocSigError::from_io_hard("stat_sidecar", sidecar, e))?
        .len();
    if len < DIGEST_LEN as u64 {
        return Err(TocSigError::sidecar(
            sidecar,
            format!("file is {} bytes, header needs {}", len, DIGEST_LEN),
        ));
    }
    Ok(())
}

fn open_reason(err: &std::io::Error) -> String {
    match err.kind() {
        std::io::ErrorKind::NotFound => "file does not exist".to_string(),
        std::io::ErrorKind::PermissionDenied => "permission denied".to_string(),
        _ => err.to_string(),
    }
}
