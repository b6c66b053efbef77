use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::info;

use crate::emit::{Document, Emitted};

/// Writes both documents of `emitted` into `dir`.
///
/// Each document goes to a temporary file in `dir` first; the final names are only
/// replaced once every document has been written, so a failed run leaves the
/// previous outputs untouched and a shorter rerun leaves no stale tail.
pub fn write_emitted(dir: &Path, emitted: &Emitted) -> io::Result<Vec<PathBuf>> {
    let staged = [&emitted.interface, &emitted.implementation]
        .into_iter()
        .map(|document| stage(dir, document))
        .collect::<io::Result<Vec<_>>>()?;

    let mut written = Vec::with_capacity(staged.len());
    for (temp, path, len) in staged {
        temp.persist(&path).map_err(|err| err.error)?;
        info!(path = %path.display(), bytes = len, "wrote");
        written.push(path);
    }

    Ok(written)
}

fn stage(dir: &Path, document: &Document) -> io::Result<(NamedTempFile, PathBuf, usize)> {
    let path = dir.join(&document.file_name);
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(document.contents.as_bytes())?;
    temp.flush()?;
    // temp files are created 0600; outputs are ordinary source files
    #[cfg(unix)]
    temp.as_file().set_permissions(output_permissions(&path))?;
    Ok((temp, path, document.contents.len()))
}

// keep the mode of the file being replaced, otherwise rw-r--r--
#[cfg(unix)]
fn output_permissions(path: &Path) -> std::fs::Permissions {
    use std::{fs, os::unix::fs::PermissionsExt};

    match fs::metadata(path) {
        Ok(metadata) => metadata.permissions(),
        Err(_) => fs::Permissions::from_mode(0o644),
    }
}
