use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use eyre::Result;

/// Write contents to a file on the disc, creating parent directories as
/// needed.
///
/// ```no_run
/// use mimir_common::utils::io::file::write_file;
///
/// let result = write_file("/tmp/test.txt", "Hello, World!");
/// ```
pub fn write_file(path_str: &str, contents: &str) -> Result<()> {
    let path = Path::new(path_str);

    std::fs::create_dir_all(
        path.parent().ok_or_else(|| eyre::eyre!("unable to create directory"))?,
    )?;

    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())?;

    Ok(())
}

/// Read contents from a file on the disc.
///
/// ```no_run
/// use mimir_common::utils::io::file::read_file;
///
/// let contents = read_file("/tmp/test.txt");
/// ```
pub fn read_file(path: &str) -> Result<String> {
    let path = Path::new(path);
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Delete a file or directory from the disc. Missing paths count as deleted.
pub fn delete_path(path: &str) -> bool {
    let path = Path::new(path);
    if !path.exists() {
        return true;
    }

    if path.is_dir() {
        std::fs::remove_dir_all(path).is_ok()
    } else {
        std::fs::remove_file(path).is_ok()
    }
}
