//! Where a document is read from, and how its bytes become UTF-8 text.

use crate::error::{Error, Result};
use crate::io::compression::auto_detect_reader;
use crate::io::decode::decode_reader;
use encoding_rs::Encoding;
use std::env;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable listing extra resource directories, separated like `PATH`.
pub const RESOURCE_PATH_VAR: &str = "ROWCAST_RESOURCE_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Filesystem path, absolute or relative to the working directory.
    File(PathBuf),
    /// Name looked up in the resource roots.
    Resource(String),
    /// `file://` URL.
    Url(String),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "file {}", path.display()),
            Self::Resource(name) => write!(f, "resource {name}"),
            Self::Url(url) => write!(f, "url {url}"),
        }
    }
}

/// The declared source of a reader: location plus character encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceConfig {
    location: Option<Location>,
    encoding: &'static Encoding,
    resource_roots: Vec<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: None,
            encoding: encoding_rs::UTF_8,
            resource_roots: Vec::new(),
        }
    }
}

impl SourceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.location = Some(Location::File(path.into()));
        self
    }

    pub fn resource(&mut self, name: impl Into<String>) -> &mut Self {
        self.location = Some(Location::Resource(name.into()));
        self
    }

    pub fn url(&mut self, url: impl Into<String>) -> &mut Self {
        self.location = Some(Location::Url(url.into()));
        self
    }

    /// Sets the encoding from a WHATWG label such as `"utf-8"` or `"latin1"`.
    pub fn encoding(&mut self, label: &str) -> Result<&mut Self> {
        self.encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| Error::specification(format!("Unknown encoding {label}")))?;
        Ok(self)
    }

    /// Adds a directory searched for resources, before the default roots.
    pub fn resource_root(&mut self, root: impl Into<PathBuf>) -> &mut Self {
        self.resource_roots.push(root.into());
        self
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    pub fn has_location(&self) -> bool {
        self.location.is_some()
    }

    /// Fails when no location was declared.
    pub fn require_location(&self) -> Result<&Location> {
        self.location
            .as_ref()
            .ok_or_else(|| Error::resource("<none>", "no source specified"))
    }

    /// Opens the source as a decompressed UTF-8 byte stream.
    pub fn open(&self) -> Result<Box<dyn Read>> {
        let location = self.require_location()?;
        let path = match location {
            Location::File(path) => path.clone(),
            Location::Resource(name) => self.resolve_resource(name)?,
            Location::Url(url) => url_to_path(url)?,
        };
        let file = File::open(&path).map_err(|e| Error::resource(location, e))?;
        let reader = auto_detect_reader(file, &path)
            .map_err(|e| Error::resource(location, format!("{e:#}")))?;
        debug!(%location, encoding = self.encoding.name(), "source opened");
        Ok(decode_reader(reader, self.encoding))
    }

    fn resolve_resource(&self, name: &str) -> Result<PathBuf> {
        let relative = name.trim_start_matches('/');
        self.resource_search_path()
            .into_iter()
            .map(|root| root.join(relative))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| {
                Error::resource(format!("resource {name}"), "not found in the resource roots")
            })
    }

    fn resource_search_path(&self) -> Vec<PathBuf> {
        let mut roots = self.resource_roots.clone();
        if let Some(paths) = env::var_os(RESOURCE_PATH_VAR) {
            roots.extend(env::split_paths(&paths));
        }
        if let Ok(cwd) = env::current_dir() {
            roots.push(cwd);
        }
        roots
    }

    /// Short description used in logs.
    pub fn describe(&self) -> String {
        self.location
            .as_ref()
            .map_or_else(|| "<no source>".to_owned(), ToString::to_string)
    }
}

fn url_to_path(url: &str) -> Result<PathBuf> {
    match url.strip_prefix("file://") {
        // "file://localhost/tmp/x" and "file:///tmp/x" both name /tmp/x.
        Some(rest) => {
            let rest = rest.strip_prefix("localhost").unwrap_or(rest);
            Ok(Path::new(rest).to_path_buf())
        }
        None => Err(Error::resource(
            format!("url {url}"),
            "only file:// URLs are supported",
        )),
    }
}
