use std::path::{Path, PathBuf};

/// Resolves a path of the configuration against the directory of the configuration file.
pub fn resolve_path(root: &Path, file_path: &str) -> String {
    let p: PathBuf = root.join(file_path);
    p.as_path().display().to_string()
}

/// The file name without its extension, used as the default name of a source.
pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}
