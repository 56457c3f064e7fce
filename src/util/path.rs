use std::ffi::OsStr;
use std::path::Path;

pub trait PathExt {
    fn is_json_file(&self) -> bool;
    fn file_name_lossy(&self) -> String;
}

impl PathExt for Path {
    fn is_json_file(&self) -> bool {
        self.extension() == Some(OsStr::new("json"))
    }

    fn file_name_lossy(&self) -> String {
        self.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Expand environment variables in a path string.
///
/// Supports:
/// - `$VAR` syntax
/// - `${VAR}` syntax
/// - `~` for home directory
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
