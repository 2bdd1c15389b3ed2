use log::info;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Sibling path holding the last known-good original: the file name
/// with `.orig` appended.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".orig");
    path.with_file_name(name)
}

/// Writes the patched declaration, creating the backup first unless
/// the caller found one already on disk. The precondition is explicit
/// so the at-most-once policy is decided in exactly one place; a
/// backup, once created, is never overwritten again.
pub fn write_with_backup(
    path: &Path,
    backup: &Path,
    content: &str,
    backup_exists: bool,
) -> io::Result<()> {
    if !backup_exists {
        fs::copy(path, backup)?;
        info!("Backed up original to {}", backup.display());
    } else {
        info!("Backup already present at {}", backup.display());
    }
    fs::write(path, content)?;
    info!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
