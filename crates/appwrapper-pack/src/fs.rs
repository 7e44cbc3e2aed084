use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Writes `content` next to `path` and renames it into place.
pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    let (tmp_path, mut file) = create_tmp_file(path)?;
    if let Err(err) = file.write_all(content).and_then(|_| file.sync_all()) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }
    drop(file);

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }

    Ok(())
}

/// Creates a fresh sibling temp file, never reusing one that already exists.
fn create_tmp_file(path: &Path) -> io::Result<(PathBuf, File)> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "aw.yaml".to_string());

    let mut counter = 0u32;
    loop {
        let candidate = if counter == 0 {
            path.with_file_name(format!(".{file_name}.tmp"))
        } else {
            path.with_file_name(format!(".{file_name}.tmp{counter}"))
        };

        match File::options().write(true).create_new(true).open(&candidate) {
            Ok(file) => return Ok((candidate, file)),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => counter += 1,
            Err(err) => return Err(err),
        }
    }
}
