//! Dictionary files
//!
//! Delimited text, one entry per row, a header line first:
//!
//! ```text
//! GRAPH,TAG,LEM,NORM
//! chats,NOUN,chat
//! Paris,PROPNgeo
//! etoit,,,était
//! parce que,SCONJ
//! ```
//!
//! `GRAPH` is required and a leading `#` comments the row out. `TAG` goes
//! through [`Tag::from_label`] and is required unless `NORM` is given; a row
//! with `NORM` only feeds the normalization table. Fields may be quoted with
//! `"`. Files ending in `.gz` are decompressed, `.tsv` files are split on tabs.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use bstr::ByteSlice;
use flate2::read::MultiGzDecoder;
use memchr::memchr;

use super::trie::{LocutionEntry, segments};
use super::{DuplicatePolicy, Lexicon, LexiconError};
use crate::tag::Tag;

/// How rows are read and merged
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Field separator, guessed from the file name when `None`
    pub delimiter: Option<u8>,
    pub policy: DuplicatePolicy,
    /// Later rows override earlier ones, `0form` rows delete `form`
    pub replace: bool,
    /// First line is a header
    pub header: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            policy: DuplicatePolicy::Ignore,
            replace: false,
            header: true,
        }
    }
}

impl LoadOptions {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }
}

/// Row counts of a load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub deleted: usize,
    pub skipped: usize,
}

impl std::ops::AddAssign for LoadReport {
    fn add_assign(&mut self, other: Self) {
        self.loaded += other.loaded;
        self.deleted += other.deleted;
        self.skipped += other.skipped;
    }
}

fn guess_delimiter(path: &Path) -> u8 {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    if name.ends_with(".tsv") || name.ends_with(".tab") {
        b'\t'
    } else {
        b','
    }
}

/// Split one row into trimmed fields
fn split_row(line: &[u8], delimiter: u8) -> Vec<String> {
    let mut fields = Vec::new();
    let mut rest = line;
    loop {
        if rest.first() == Some(&b'"') {
            let mut field = Vec::new();
            let mut body = &rest[1..];
            loop {
                match memchr(b'"', body) {
                    Some(q) if body.get(q + 1) == Some(&b'"') => {
                        field.extend_from_slice(&body[..=q]);
                        body = &body[q + 2..];
                    }
                    Some(q) => {
                        field.extend_from_slice(&body[..q]);
                        body = &body[q + 1..];
                        break;
                    }
                    None => {
                        field.extend_from_slice(body);
                        body = &[];
                        break;
                    }
                }
            }
            fields.push(field.to_str_lossy().trim().to_string());
            match memchr(delimiter, body) {
                Some(d) => rest = &body[d + 1..],
                None => break,
            }
        } else {
            match memchr(delimiter, rest) {
                Some(d) => {
                    fields.push(rest[..d].to_str_lossy().trim().to_string());
                    rest = &rest[d + 1..];
                }
                None => {
                    fields.push(rest.to_str_lossy().trim().to_string());
                    break;
                }
            }
        }
    }
    fields
}

impl Lexicon {
    /// Lexicon from one dictionary file with default options
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let mut lexicon = Self::new();
        lexicon.load_file(path, &LoadOptions::default())?;
        Ok(lexicon)
    }

    /// Load rows from a string
    pub fn load_str(&mut self, text: &str, options: &LoadOptions) -> Result<LoadReport, LexiconError> {
        self.load_bytes(text.as_bytes(), "<string>", b',', options)
    }

    /// Load rows from any reader; `source` names it in log messages
    pub fn load_reader<R: Read>(
        &mut self,
        mut reader: R,
        source: &str,
        options: &LoadOptions,
    ) -> Result<LoadReport, LexiconError> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|source_err| LexiconError::Io {
                path: PathBuf::from(source),
                source: source_err,
            })?;
        self.load_bytes(&bytes, source, b',', options)
    }

    /// Load a dictionary file, gzip-compressed when it ends in `.gz`
    pub fn load_file(
        &mut self,
        path: impl AsRef<Path>,
        options: &LoadOptions,
    ) -> Result<LoadReport, LexiconError> {
        let path = path.as_ref();
        let io_err = |source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_err)?;
        let mut bytes = Vec::new();
        if path.extension().is_some_and(|e| e == "gz") {
            MultiGzDecoder::new(BufReader::new(file))
                .read_to_end(&mut bytes)
                .map_err(io_err)?;
        } else {
            BufReader::new(file).read_to_end(&mut bytes).map_err(io_err)?;
        }
        let source = path.display().to_string();
        self.load_bytes(&bytes, &source, guess_delimiter(path), options)
    }

    /// Load every file matching `pattern`, in path order.
    ///
    /// Unreadable files are skipped with a warning; conflicts under
    /// [`DuplicatePolicy::Error`] still abort.
    pub fn load_glob(&mut self, pattern: &str, options: &LoadOptions) -> Result<LoadReport, LexiconError> {
        let mut paths: Vec<PathBuf> = glob::glob(pattern)?.filter_map(Result::ok).collect();
        paths.sort();
        let mut report = LoadReport::default();
        for path in paths {
            match self.load_file(&path, options) {
                Ok(r) => report += r,
                Err(LexiconError::Io { path, source }) => {
                    tracing::warn!(path = %path.display(), error = %source, "dictionary skipped");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(report)
    }

    fn load_bytes(
        &mut self,
        bytes: &[u8],
        source: &str,
        default_delimiter: u8,
        options: &LoadOptions,
    ) -> Result<LoadReport, LexiconError> {
        let delimiter = options.delimiter.unwrap_or(default_delimiter);
        let policy = if options.replace {
            DuplicatePolicy::Replace
        } else {
            options.policy
        };
        let mut report = LoadReport::default();
        let skip = usize::from(options.header);
        for (i, line) in bytes.lines().enumerate().skip(skip) {
            let line_num = i + 1;
            if line.trim().is_empty() {
                continue;
            }
            let fields = split_row(line, delimiter);
            let form: String = fields[0]
                .chars()
                .map(|c| if c == '’' { '\'' } else { c })
                .collect();
            if form.is_empty() || form.starts_with('#') {
                continue;
            }
            if options.replace {
                if let Some(deleted) = form.strip_prefix('0').filter(|f| !f.is_empty()) {
                    self.remove(deleted);
                    report.deleted += 1;
                    continue;
                }
            }
            let label = fields.get(1).map(String::as_str).unwrap_or("");
            let lemma = fields.get(2).map(String::as_str).filter(|l| !l.is_empty());
            let norm = fields.get(3).map(String::as_str).filter(|n| !n.is_empty());

            if let Some(norm) = norm {
                if segments(&form).len() > 1 {
                    let tag = Tag::from_label(label).unwrap_or(Tag::Loc);
                    self.add_locution(
                        &form,
                        LocutionEntry {
                            tag,
                            lemma: lemma.map(str::to_string),
                            norm: Some(norm.to_string()),
                        },
                    );
                } else {
                    self.put_norm(&form, norm);
                }
                report.loaded += 1;
                continue;
            }

            if label.is_empty() {
                tracing::warn!(source, line = line_num, form = %form, "row without category skipped");
                report.skipped += 1;
                continue;
            }
            let Some(tag) = Tag::from_label(label) else {
                tracing::warn!(source, line = line_num, label, "unknown category, row skipped");
                report.skipped += 1;
                continue;
            };

            if form.ends_with('.') && !form.contains(' ') {
                self.add_abbreviation(&form);
            }
            if segments(&form).len() > 1 {
                self.add_locution(
                    &form,
                    LocutionEntry {
                        tag,
                        lemma: lemma.map(str::to_string),
                        norm: None,
                    },
                );
            }
            self.put_entry(&form, tag, lemma, policy)?;
            report.loaded += 1;
        }
        tracing::info!(
            source,
            loaded = report.loaded,
            deleted = report.deleted,
            skipped = report.skipped,
            "dictionary loaded"
        );
        Ok(report)
    }
}
