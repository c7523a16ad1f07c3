//! Provider backed by a local YAML, JSON, or TOML document

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use driftenv_core::{EnvEntry, Error, KeyPath, Provider, Result};
use fs2::FileExt;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

use crate::decrypt::Decryptor;
use crate::document::{self, Document};

pub const FILE_KIND: &str = "file";

/// On-disk encoding of a secrets document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
    Toml,
}

impl DocumentFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.clone(),
            }),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Yaml => "YAML",
            Self::Json => "JSON",
            Self::Toml => "TOML",
        }
    }

    fn parse(self, path: &Path, content: &str) -> Result<Document> {
        let parsed: std::result::Result<Document, String> = match self {
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| Error::ConfigParse {
            path: path.to_path_buf(),
            format: self.label().into(),
            message,
        })
    }

    fn render(self, doc: &Document) -> std::result::Result<String, String> {
        match self {
            Self::Yaml => serde_yaml::to_string(doc).map_err(|e| e.to_string()),
            Self::Json => serde_json::to_string_pretty(doc).map_err(|e| e.to_string()),
            Self::Toml => toml::to_string_pretty(doc).map_err(|e| e.to_string()),
        }
    }
}

/// Provider reading and writing a single document file
///
/// The file is read on every call, so external edits are picked up. A
/// missing file is treated as an empty document. Writes replace the file
/// atomically.
pub struct FileProvider {
    name: String,
    path: PathBuf,
    format: DocumentFormat,
    decryptor: Option<Arc<dyn Decryptor>>,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for FileProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileProvider")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl FileProvider {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = DocumentFormat::from_path(&path)?;
        Ok(Self {
            name: name.into(),
            path,
            format,
            decryptor: None,
            write_lock: Mutex::new(()),
        })
    }

    pub fn with_decryptor(mut self, decryptor: Arc<dyn Decryptor>) -> Self {
        self.decryptor = Some(decryptor);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the backing file
    pub async fn load(&self) -> Result<Document> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => self.format.parse(&self.path, &content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Document::new()),
            Err(e) => Err(Error::io(&self.path, e)),
        }
    }

    async fn load_for(&self, key_path: &KeyPath) -> Result<Document> {
        self.load()
            .await
            .map_err(|e| Error::resolution(&self.name, &key_path.path, e.to_string()))
    }
}

#[async_trait]
impl Provider for FileProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        FILE_KIND
    }

    async fn get_mapping(&self, key_path: &KeyPath) -> Result<Vec<EnvEntry>> {
        let doc = self.load_for(key_path).await?;
        document::get_mapping_entries(self, &doc, key_path, self.decryptor.as_deref())
    }

    async fn get(&self, key_path: &KeyPath) -> Result<Option<EnvEntry>> {
        let doc = self.load_for(key_path).await?;
        document::get_entry(self, &doc, key_path, self.decryptor.as_deref())
    }

    async fn put(&self, key_path: &KeyPath, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let rejected = |message: String| Error::write(&self.name, &key_path.path, message);

        let mut doc = self.load().await.map_err(|e| rejected(e.to_string()))?;
        document::put_value(&self.name, &mut doc, key_path, value)?;
        let content = self.format.render(&doc).map_err(rejected)?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, content.as_bytes()))
            .await?
            .map_err(|e| rejected(e.to_string()))?;

        tracing::debug!(
            provider = %self.name,
            file = %self.path.display(),
            path = %key_path.path,
            "wrote value"
        );
        Ok(())
    }
}

/// Write `content` to a uniquely named sibling temp file under an exclusive
/// lock, then rename it over `path`
fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            parent
        }
        None => Path::new("."),
    };

    let mut temp_file = NamedTempFile::new_in(parent).map_err(|e| Error::io(parent, e))?;
    let temp_path = temp_file.path().to_path_buf();

    temp_file
        .as_file()
        .lock_exclusive()
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file
        .as_file()
        .unlock()
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}
