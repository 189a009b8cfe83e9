use crate::document::Document;
use crate::edit::{self, Operation};
use crate::encoding;
use crate::error::{Error, Result};
use crate::parser;
use crate::tags::TagIndex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One successfully parsed input file.
///
/// `encoding` is exactly the label the file was decoded with at load time,
/// and the label it will be re-encoded with at write time. It never changes
/// between read and write.
#[derive(Debug)]
pub struct LoadedDocument {
    pub path: PathBuf,
    pub encoding: String,
    pub document: Document,
}

/// A file that failed to load, with the reason.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: Error,
}

/// Result of a batch load: how many files made it into the active set,
/// and which didn't.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub loaded: usize,
    pub failures: Vec<FileFailure>,
}

/// Per-file result of a mutate-and-save pass.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<()>,
}

/// The active document set and its tag-suggestion index.
///
/// This is the whole mutable state of the program, passed explicitly into
/// every operation so the core is callable without any UI present. All
/// operations are blocking and serial; a batch runs to completion over all
/// loaded documents, and one file's failure never halts iteration over the
/// rest.
#[derive(Debug, Default)]
pub struct Session {
    documents: Vec<LoadedDocument>,
    tags: TagIndex,
}

impl Session {
    pub fn new() -> Session {
        Session::default()
    }

    pub fn documents(&self) -> &[LoadedDocument] {
        &self.documents
    }

    /// Tag names for autocompletion, derived from the first successfully
    /// loaded file of the current batch.
    pub fn tags(&self) -> &TagIndex {
        &self.tags
    }

    /// Load a batch of XML files, replacing the active set wholesale.
    ///
    /// Each path is processed independently: its encoding is detected from
    /// the file's leading bytes, the whole file decoded with it, character
    /// entities textually decoded, and the result parsed. A file that fails
    /// any step is recorded in the outcome and skipped; the rest of the
    /// batch continues.
    ///
    /// An empty `paths` returns an empty outcome and leaves the current set
    /// alone (a cancelled file picker is not a new batch).
    ///
    /// # Errors
    ///
    /// - [`Error::NoValidDocuments`]: not a single file loaded.
    pub fn load<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<LoadOutcome> {
        if paths.is_empty() {
            return Ok(LoadOutcome::default());
        }
        self.documents.clear();
        self.tags = TagIndex::default();
        let mut failures = Vec::new();
        for path in paths {
            let path = path.as_ref();
            match load_document(path) {
                Ok((document, encoding, content)) => {
                    if self.tags.is_empty() {
                        self.tags = TagIndex::from_content(&content);
                    }
                    debug!(path = %path.display(), encoding = %encoding, "loaded document");
                    self.documents.push(LoadedDocument {
                        path: path.to_path_buf(),
                        encoding,
                        document,
                    });
                }
                Err(error) => {
                    warn!(path = %path.display(), %error, "failed to load document");
                    failures.push(FileFailure {
                        path: path.to_path_buf(),
                        error,
                    });
                }
            }
        }
        if self.documents.is_empty() {
            return Err(Error::NoValidDocuments);
        }
        Ok(LoadOutcome {
            loaded: self.documents.len(),
            failures,
        })
    }

    /// Apply `op` to every loaded document and write each mutated document
    /// straight back to the path it came from, in its recorded encoding.
    ///
    /// Documents without a matching element get a [`Error::NoMatch`] outcome
    /// and are not written; a write failure is reported for that file only.
    /// Either way the batch continues.
    ///
    /// # Errors
    ///
    /// - [`Error::NoValidDocuments`]: the session is empty.
    /// - [`Error::InvalidInput`]: empty tag name, or empty replacement value.
    pub fn apply(&mut self, tag: &str, op: &Operation) -> Result<Vec<FileOutcome>> {
        if self.documents.is_empty() {
            return Err(Error::NoValidDocuments);
        }
        if tag.is_empty() {
            return Err(Error::InvalidInput("tag name is empty".to_string()));
        }
        if let Operation::Replace(value) = op {
            if value.is_empty() {
                return Err(Error::InvalidInput(
                    "replacement value is empty".to_string(),
                ));
            }
        }
        let mut outcomes = Vec::with_capacity(self.documents.len());
        for loaded in &mut self.documents {
            let result = match edit::apply(&mut loaded.document, tag, op) {
                Ok(count) => {
                    debug!(path = %loaded.path.display(), count, "mutated elements");
                    write_document(loaded)
                }
                Err(err) => Err(err),
            };
            if let Err(error) = &result {
                warn!(path = %loaded.path.display(), %error, "operation failed");
            }
            outcomes.push(FileOutcome {
                path: loaded.path.clone(),
                result,
            });
        }
        Ok(outcomes)
    }

    /// Increment matched element text by `delta` in every loaded document.
    pub fn increment(&mut self, tag: &str, delta: i64) -> Result<Vec<FileOutcome>> {
        self.apply(tag, &Operation::Increment(delta))
    }

    /// Replace matched element text with `value` in every loaded document.
    pub fn replace(&mut self, tag: &str, value: &str) -> Result<Vec<FileOutcome>> {
        self.apply(tag, &Operation::Replace(value.to_string()))
    }

    /// Write every loaded document back to disk unchanged.
    pub fn save_all(&self) -> Vec<FileOutcome> {
        let mut outcomes = Vec::with_capacity(self.documents.len());
        for loaded in &self.documents {
            let result = write_document(loaded);
            if let Err(error) = &result {
                warn!(path = %loaded.path.display(), %error, "failed to save document");
            }
            outcomes.push(FileOutcome {
                path: loaded.path.clone(),
                result,
            });
        }
        outcomes
    }
}

fn load_document(path: &Path) -> Result<(Document, String, String)> {
    let bytes = fs::read(path)?;
    let label = encoding::detect(&bytes);
    let enc = encoding::resolve(&label)?;
    let (text, had_errors) = enc.decode_with_bom_removal(&bytes);
    if had_errors {
        return Err(Error::CannotDecode);
    }
    let content = parser::decode_entities(&text);
    let document = Document::parse_str(&content)?;
    Ok((document, label, content))
}

// Overwrites in place; there is no temp-file or backup step, so a crash
// mid-write can leave a truncated file.
fn write_document(loaded: &LoadedDocument) -> Result<()> {
    let file = fs::File::create(&loaded.path)?;
    let mut writer = std::io::BufWriter::new(file);
    loaded
        .document
        .write_with_encoding(&mut writer, &loaded.encoding)?;
    writer.flush()?;
    Ok(())
}
