use md5::{Digest, Md5};
use std::fs;
use std::path::{Path, PathBuf};
use tocsig_core::{SidecarCase, Signer, SignerConfig, DIGEST_LEN};

/// Signer whose sidecar is `<DIR>/<NAME UPPERCASED>.SIG`, usable under a temp dir
#[allow(dead_code)]
pub fn file_name_signer() -> Signer {
    Signer::new(SignerConfig {
        sidecar_case: SidecarCase::FileName,
        ..SignerConfig::default()
    })
    .unwrap()
}

/// Write `content` at `dir/rel`, creating parent directories
#[allow(dead_code)]
pub fn write(dir: &Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Provision a sidecar next to `root` with a zeroed header and a trailer
#[allow(dead_code)]
pub fn provision_sidecar(root: &Path, trailer: &[u8]) -> PathBuf {
    let name = root.file_name().unwrap().to_str().unwrap().to_uppercase();
    let sidecar = root.with_file_name(format!("{}.SIG", name));
    let mut content = vec![0u8; DIGEST_LEN];
    content.extend_from_slice(trailer);
    fs::write(&sidecar, content).unwrap();
    sidecar
}

/// Reference digest of the given byte chunks fed in order
#[allow(dead_code)]
pub fn md5_of(chunks: &[&[u8]]) -> [u8; 16] {
    let mut hasher = Md5::new();
    for chunk in chunks {
        hasher.update(chunk);
    }
    hasher.finalize().into()
}
