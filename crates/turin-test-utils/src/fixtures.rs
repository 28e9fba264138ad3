use std::fs::File;
use std::io::Write;
use std::path::Path;

use zip::write::FileOptions;
use zip::ZipWriter;

/// Write a jar at `path` containing `(entry name, bytes)` pairs.
pub fn write_jar(path: &Path, entries: &[(&str, Vec<u8>)]) -> zip::result::ZipResult<()> {
    let file = File::create(path)?;
    let mut zip = ZipWriter::new(file);
    for (name, bytes) in entries {
        zip.start_file(*name, FileOptions::default())?;
        zip.write_all(bytes)?;
    }
    zip.finish()?;
    Ok(())
}

/// Write `(internal name, class bytes)` pairs as `<root>/<internal name>.class`.
pub fn write_class_dir(root: &Path, classes: &[(&str, Vec<u8>)]) -> std::io::Result<()> {
    for (internal_name, bytes) in classes {
        let path = root.join(format!("{internal_name}.class"));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes)?;
    }
    Ok(())
}
