use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Move a file, falling back to copy + remove when `rename` is refused
/// (typically because source and destination are on different devices).
///
/// An existing entry at `to` is never replaced; the move fails with
/// [`io::ErrorKind::AlreadyExists`] instead.
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if exists_no_follow(to) {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", to.display()),
        ));
    }

    let rename_err = match fs::rename(from, to) {
        Ok(()) => return Ok(()),
        Err(err) => err,
    };

    if !fs::symlink_metadata(from).map(|m| m.is_file()).unwrap_or(false) {
        return Err(rename_err);
    }

    if let Err(copy_err) = fs::copy(from, to) {
        let _ = fs::remove_file(to);
        return Err(copy_err);
    }
    fs::remove_file(from)
}

/// Move `from` into `dir`, keeping its file name. Returns the new path.
pub fn move_into(from: &Path, dir: &Path) -> io::Result<PathBuf> {
    let name = from.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no file name", from.display()),
        )
    })?;
    let to = dir.join(name);
    move_file(from, &to)?;
    Ok(to)
}

pub fn exists_no_follow(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// True when something is at `path` other than an empty directory.
pub fn is_occupied(path: &Path) -> bool {
    match fs::read_dir(path) {
        Ok(mut entries) => entries.next().is_some(),
        Err(_) => exists_no_follow(path),
    }
}
