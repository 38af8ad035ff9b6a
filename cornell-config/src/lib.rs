//! Shared configuration loader for the cornell notes converter.
//!
//! `defaults/cornell.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`CornellConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use cornell_babel::{HtmlOptions, OutputTarget, PageSize, PdfOptions};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/cornell.default.toml");

/// File picked up from the working directory when present.
pub const LOCAL_CONFIG_FILE: &str = "cornell.toml";

/// Top-level configuration consumed by cornell applications.
#[derive(Debug, Clone, Deserialize)]
pub struct CornellConfig {
    pub convert: ConvertConfig,
}

/// Conversion knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub default_format: TargetFormat,
    pub title: String,
    #[serde(default)]
    pub html: HtmlConfig,
    pub pdf: PdfConfig,
}

/// Output formats selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    Html,
    Pdf,
}

impl TargetFormat {
    pub fn name(&self) -> &'static str {
        match self {
            TargetFormat::Html => "html",
            TargetFormat::Pdf => "pdf",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HtmlConfig {
    #[serde(default)]
    pub custom_css: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PdfConfig {
    pub page_size: PageSize,
}

impl ConvertConfig {
    /// HTML options, with the custom stylesheet (if configured) read from disk.
    pub fn html_options(&self) -> io::Result<HtmlOptions> {
        let mut options = HtmlOptions::default().with_default_title(self.title.clone());
        if let Some(path) = &self.html.custom_css {
            options = options.with_custom_css(fs::read_to_string(path)?);
        }
        Ok(options)
    }

    pub fn pdf_options(&self) -> PdfOptions {
        PdfOptions {
            page_size: self.pdf.page_size,
            default_title: self.title.clone(),
        }
    }

    /// The output target for `format`, with options taken from this configuration.
    pub fn target(&self, format: TargetFormat) -> io::Result<OutputTarget> {
        Ok(match format {
            TargetFormat::Html => OutputTarget::Html(self.html_options()?),
            TargetFormat::Pdf => OutputTarget::Pdf(self.pdf_options()),
        })
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<CornellConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<CornellConfig, ConfigError> {
    Loader::new().build()
}
