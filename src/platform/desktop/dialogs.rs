use std::path::{Path, PathBuf};

/// Splits a comma-separated accept list ("png, .jpg") into bare extensions.
pub fn accept_extensions(accept: &str) -> Vec<String> {
    accept
        .split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

#[cfg(feature = "desktop")]
pub fn pick_file(label: &str, accept: &str) -> Option<PathBuf> {
    let extensions = accept_extensions(accept);
    let mut dialog = rfd::FileDialog::new();
    if !extensions.is_empty() {
        dialog = dialog.add_filter(label, &extensions);
    }
    dialog.pick_file()
}

#[cfg(not(feature = "desktop"))]
pub fn pick_file(_label: &str, _accept: &str) -> Option<PathBuf> {
    None
}

pub fn pick_import_file() -> Option<PathBuf> {
    pick_file("CSV", "csv")
}

/// Asks where to save an export; headless builds write into `default_dir`.
#[cfg(feature = "desktop")]
pub fn pick_export_file(default_dir: &Path, file_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("CSV", &["csv"])
        .set_directory(default_dir)
        .set_file_name(file_name)
        .save_file()
}

#[cfg(not(feature = "desktop"))]
pub fn pick_export_file(default_dir: &Path, file_name: &str) -> Option<PathBuf> {
    Some(default_dir.join(file_name))
}
