//! Python bindings for lexika
//!
//! A loaded `Lexicon` is shared read-only; `analyze` runs the whole pipeline
//! and returns `Token` records.

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use std::sync::Arc;

use crate::analyzer::{AnalyzeError, Analyzer, AnalyzerConfig};
use crate::lexicon::{LexiconError, LoadOptions, Lexicon as RustLexicon};
use crate::token::Token as RustToken;

impl From<LexiconError> for PyErr {
    fn from(err: LexiconError) -> PyErr {
        match err {
            LexiconError::Io { .. } => PyIOError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

impl From<AnalyzeError> for PyErr {
    fn from(err: AnalyzeError) -> PyErr {
        PyIOError::new_err(err.to_string())
    }
}

/// Dictionaries for analysis, immutable once loaded.
#[pyclass(name = "Lexicon", frozen)]
#[derive(Clone)]
pub struct PyLexicon {
    inner: Arc<RustLexicon>,
}

#[pymethods]
impl PyLexicon {
    /// Load one dictionary file (tab or comma delimited, optionally gzipped).
    #[classmethod]
    fn from_file(_cls: &Bound<'_, pyo3::types::PyType>, path: &str) -> PyResult<Self> {
        Ok(PyLexicon {
            inner: Arc::new(RustLexicon::from_file(path)?),
        })
    }

    /// Load every dictionary matching a glob pattern, in sorted order.
    ///
    /// Unreadable files are skipped with a warning.
    #[classmethod]
    fn from_glob(_cls: &Bound<'_, pyo3::types::PyType>, pattern: &str) -> PyResult<Self> {
        let mut lexicon = RustLexicon::new();
        lexicon.load_glob(pattern, &LoadOptions::default())?;
        Ok(PyLexicon {
            inner: Arc::new(lexicon),
        })
    }

    /// Load dictionary rows from a string (header line first).
    #[classmethod]
    fn from_string(_cls: &Bound<'_, pyo3::types::PyType>, text: &str) -> PyResult<Self> {
        let mut lexicon = RustLexicon::new();
        lexicon.load_str(text, &LoadOptions::default())?;
        Ok(PyLexicon {
            inner: Arc::new(lexicon),
        })
    }

    fn lemma(&self, form: &str, tag: &str) -> PyResult<Option<String>> {
        let tag = crate::tag::Tag::from_label(tag)
            .ok_or_else(|| PyValueError::new_err(format!("unknown tag: {}", tag)))?;
        Ok(self.inner.lemma(form, tag).map(str::to_string))
    }

    fn stats(&self) -> std::collections::HashMap<&'static str, usize> {
        let stats = self.inner.stats();
        [
            ("forms", stats.forms),
            ("entries", stats.entries),
            ("words", stats.words),
            ("names", stats.names),
            ("norms", stats.norms),
            ("abbreviations", stats.abbreviations),
            ("locutions", stats.locutions),
            ("max_form_len", stats.max_form_len),
        ]
        .into_iter()
        .collect()
    }

    fn __repr__(&self) -> String {
        let stats = self.inner.stats();
        format!(
            "<Lexicon forms={} locutions={}>",
            stats.forms, stats.locutions
        )
    }
}

#[pyclass(name = "Token", frozen)]
pub struct PyToken {
    inner: RustToken,
}

#[pymethods]
impl PyToken {
    #[getter]
    fn term(&self) -> &str {
        &self.inner.term
    }

    #[getter]
    fn orth(&self) -> &str {
        self.inner.orth_or_term()
    }

    #[getter]
    fn lemma(&self) -> Option<&str> {
        if self.inner.lemma.is_empty() {
            None
        } else {
            Some(&self.inner.lemma)
        }
    }

    #[getter]
    fn tag(&self) -> &'static str {
        self.inner.tag.name()
    }

    #[getter]
    fn start(&self) -> usize {
        self.inner.start
    }

    #[getter]
    fn end(&self) -> usize {
        self.inner.end
    }

    #[getter]
    fn pos_len(&self) -> u32 {
        self.inner.pos_len
    }

    fn __repr__(&self) -> String {
        format!(
            "<Token '{}' {} lemma='{}' [{}:{}]>",
            self.inner.term,
            self.inner.tag,
            self.inner.lemma,
            self.inner.start,
            self.inner.end
        )
    }
}

fn config(split: bool, lemmatize: bool, locutions: bool, infer_names: bool) -> AnalyzerConfig {
    AnalyzerConfig::default()
        .with_split_clitics(split)
        .with_lemmatize(lemmatize)
        .with_locutions(locutions)
        .with_infer_names(infer_names)
}

/// Analyze a text into tokens.
///
/// Args:
///     lexicon: Loaded Lexicon
///     text: Text, may contain markup
///     split: Split elided and postposed clitics
///     lemmatize: Tag and lemmatize from the dictionaries
///     locutions: Merge multi-word expressions (needs lemmatize)
///     infer_names: Tag unknown capitalized words inside a sentence as names
///
/// Returns:
///     List of Token
#[pyfunction]
#[pyo3(signature = (lexicon, text, split=true, lemmatize=true, locutions=true, infer_names=false))]
fn analyze(
    lexicon: &PyLexicon,
    text: &str,
    split: bool,
    lemmatize: bool,
    locutions: bool,
    infer_names: bool,
) -> Vec<PyToken> {
    let config = config(split, lemmatize, locutions, infer_names);
    let tokens = Analyzer::with_config(&lexicon.inner, config).analyze(text);
    tokens.into_iter().map(|inner| PyToken { inner }).collect()
}

/// Analyze a text file, gzipped when named `.gz`.
#[pyfunction]
#[pyo3(signature = (lexicon, path, split=true, lemmatize=true, locutions=true, infer_names=false))]
fn analyze_file(
    lexicon: &PyLexicon,
    path: &str,
    split: bool,
    lemmatize: bool,
    locutions: bool,
    infer_names: bool,
) -> PyResult<Vec<PyToken>> {
    let config = config(split, lemmatize, locutions, infer_names);
    let tokens = Analyzer::with_config(&lexicon.inner, config).analyze_file(path)?;
    Ok(tokens.into_iter().map(|inner| PyToken { inner }).collect())
}

#[pyfunction]
fn __version__() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[pymodule]
fn lexika(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyLexicon>()?;
    m.add_class::<PyToken>()?;

    m.add_function(wrap_pyfunction!(analyze, m)?)?;
    m.add_function(wrap_pyfunction!(analyze_file, m)?)?;
    m.add_function(wrap_pyfunction!(__version__, m)?)?;

    Ok(())
}
