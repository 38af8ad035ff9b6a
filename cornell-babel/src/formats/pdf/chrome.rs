//! Headless Chrome printing.

use crate::error::FormatError;
use std::env;
use std::ffi::OsString;
use std::fs;
#[cfg(target_os = "macos")]
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;
use url::Url;
use which::which;

/// Environment variable naming the Chrome binary to use, checked before any other lookup.
pub const CHROME_ENV: &str = "CORNELL_CHROME_BIN";

pub(super) fn render_html_to_pdf(html: &str) -> Result<Vec<u8>, FormatError> {
    let chrome = resolve_chrome_binary()?;
    let temp_dir =
        tempdir().map_err(|e| FormatError::SerializationError(format!("Temp dir error: {e}")))?;
    let html_path = temp_dir.path().join("cornell-print.html");
    fs::write(&html_path, html).map_err(|e| FormatError::io(&html_path, e))?;

    let pdf_path = temp_dir.path().join("cornell-print.pdf");
    let file_url = Url::from_file_path(&html_path).map_err(|_| {
        FormatError::SerializationError(
            "Failed to construct file:// URL for the print layout".to_string(),
        )
    })?;

    tracing::debug!(chrome = %chrome.display(), "printing layout to pdf");
    let status = Command::new(&chrome)
        .arg("--headless")
        .arg("--disable-gpu")
        .arg("--no-sandbox")
        .arg("--disable-dev-shm-usage")
        .arg("--no-pdf-header-footer")
        .arg("--print-to-pdf-no-header")
        .arg(format!("--print-to-pdf={}", pdf_path.display()))
        .arg(file_url.as_str())
        .status()
        .map_err(|e| {
            FormatError::SerializationError(format!(
                "Failed to launch Chrome ({}): {}",
                chrome.display(),
                e
            ))
        })?;

    if !status.success() {
        return Err(FormatError::SerializationError(format!(
            "Chrome exited with status {status}"
        )));
    }

    fs::read(&pdf_path).map_err(|e| {
        FormatError::SerializationError(format!("Chrome produced no PDF output: {e}"))
    })
}

/// Variables naming a Chrome binary, in lookup order.
const BINARY_VARS: [&str; 3] = [CHROME_ENV, "GOOGLE_CHROME_BIN", "CHROME_BIN"];

/// Executable names searched on `PATH`.
const PATH_NAMES: [&str; 4] = [
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
];

#[cfg(target_os = "macos")]
const MACOS_APP: &str = "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome";

fn resolve_chrome_binary() -> Result<PathBuf, FormatError> {
    if let Some(path) = binary_from_vars(|var| env::var_os(var)) {
        return Ok(path);
    }

    if let Some(path) = PATH_NAMES.iter().find_map(|name| which(name).ok()) {
        return Ok(path);
    }

    #[cfg(target_os = "macos")]
    if Path::new(MACOS_APP).exists() {
        return Ok(PathBuf::from(MACOS_APP));
    }

    Err(FormatError::SerializationError(format!(
        "No Chrome or Chromium binary found on PATH. Set {CHROME_ENV} to the browser to print with."
    )))
}

/// The first non-empty binary variable, as returned by `lookup`.
fn binary_from_vars(lookup: impl Fn(&str) -> Option<OsString>) -> Option<PathBuf> {
    BINARY_VARS
        .iter()
        .filter_map(|var| lookup(*var))
        .find(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(set: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let set: Vec<(String, String)> = set
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| {
            set.iter()
                .find(|(k, _)| k == var)
                .map(|(_, v)| OsString::from(v))
        }
    }

    #[test]
    fn cornell_variable_wins() {
        let lookup = vars(&[
            ("CHROME_BIN", "/usr/bin/chromium"),
            (CHROME_ENV, "/opt/chrome/chrome"),
        ]);
        assert_eq!(
            binary_from_vars(lookup),
            Some(PathBuf::from("/opt/chrome/chrome"))
        );
    }

    #[test]
    fn empty_variables_are_skipped() {
        let lookup = vars(&[(CHROME_ENV, ""), ("GOOGLE_CHROME_BIN", "/bin/gc")]);
        assert_eq!(binary_from_vars(lookup), Some(PathBuf::from("/bin/gc")));
    }

    #[test]
    fn no_variables_means_no_binary() {
        assert_eq!(binary_from_vars(vars(&[])), None);
    }
}
