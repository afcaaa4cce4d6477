//! Dictionaries for one analysis setup
//!
//! A [`Lexicon`] is built once (usually from dictionary files, see
//! [`loader`]) and then only read. It holds:
//! - the lemma table, forms interned once and mapped per category;
//! - the word and name tables, first category and lemma of a form;
//! - the spelling normalization table;
//! - known abbreviations whose final dot belongs to the word;
//! - the locution trie.

pub mod lemma;
pub mod loader;
pub mod trie;

use std::path::PathBuf;

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::forms::FormId;
use crate::tag::Tag;

pub use lemma::{DEFAULT_POS, DuplicatePolicy, LemmaLexicon};
pub use loader::{LoadOptions, LoadReport};
pub use trie::{LocutionEntry, LocutionTrie, NAME_KEY, NUMBER_KEY, NodeId};

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("Cannot read dictionary {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Conflicting entry for {form:?} ({pos}): {previous:?} then {new:?}")]
    Conflict {
        form: String,
        pos: Tag,
        previous: String,
        new: String,
    },
    #[error("Unknown form id {0:?}")]
    UnknownId(FormId),
    #[error("Invalid dictionary pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Category and lemma of a form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordEntry {
    pub tag: Tag,
    pub lemma: Option<FormId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LexiconStats {
    pub forms: usize,
    pub entries: usize,
    pub words: usize,
    pub names: usize,
    pub norms: usize,
    pub abbreviations: usize,
    pub locutions: usize,
    pub max_form_len: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    lemmas: LemmaLexicon,
    words: FxHashMap<FormId, WordEntry>,
    names: FxHashMap<FormId, WordEntry>,
    norms: FxHashMap<FormId, FormId>,
    abbreviations: FxHashSet<String>,
    locutions: LocutionTrie,
}

#[inline]
fn starts_uppercase(form: &str) -> bool {
    form.chars().next().is_some_and(char::is_uppercase)
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn lemmas(&self) -> &LemmaLexicon {
        &self.lemmas
    }

    #[inline]
    pub fn lemmas_mut(&mut self) -> &mut LemmaLexicon {
        &mut self.lemmas
    }

    #[inline]
    pub fn locutions(&self) -> &LocutionTrie {
        &self.locutions
    }

    /// Abbreviations with their final dot ("etc.")
    #[inline]
    pub fn abbreviations(&self) -> &FxHashSet<String> {
        &self.abbreviations
    }

    #[inline]
    pub fn resolve(&self, id: FormId) -> Option<&str> {
        self.lemmas.form(id)
    }

    /// Add a form with its category and lemma.
    ///
    /// Forms with an uppercase initial go to the name table. The first entry
    /// of a form is its default reading, later ones only add a
    /// category-specific lemma, unless the policy replaces.
    pub fn put_entry(
        &mut self,
        form: &str,
        tag: Tag,
        lemma: Option<&str>,
        policy: DuplicatePolicy,
    ) -> Result<(), LexiconError> {
        let form_id = self.lemmas.intern_form(form);
        let lemma_id = match lemma {
            Some(lemma) if !lemma.is_empty() => {
                let lemma_id = self.lemmas.intern_form(lemma);
                self.lemmas
                    .put_entry(form_id, tag.code(), lemma_id, policy)?;
                Some(lemma_id)
            }
            _ => None,
        };
        let entry = WordEntry {
            tag,
            lemma: lemma_id,
        };
        let table = if starts_uppercase(form) {
            &mut self.names
        } else {
            &mut self.words
        };
        match policy {
            DuplicatePolicy::Replace => {
                table.insert(form_id, entry);
            }
            _ => {
                table.entry(form_id).or_insert(entry);
            }
        }
        Ok(())
    }

    /// Lemma for every category of `form`
    pub fn put_default_lemma(
        &mut self,
        form: &str,
        lemma: &str,
        policy: DuplicatePolicy,
    ) -> Result<(), LexiconError> {
        self.lemmas.put(form, Tag::Word, lemma, policy).map(|_| ())
    }

    /// Preferred spelling for `form`
    pub fn put_norm(&mut self, form: &str, norm: &str) {
        let form = self.lemmas.intern_form(form);
        let norm = self.lemmas.intern_form(norm);
        self.norms.insert(form, norm);
    }

    /// Register an abbreviation ending with a dot, and each dotted prefix of
    /// it ("n.b." also adds "n.")
    pub fn add_abbreviation(&mut self, form: &str) {
        for (i, c) in form.char_indices() {
            if c == '.' {
                self.abbreviations.insert(form[..=i].to_string());
            }
        }
    }

    /// Add a multi-word expression
    pub fn add_locution(&mut self, expression: &str, entry: LocutionEntry) -> usize {
        self.locutions.insert(expression, entry)
    }

    /// Forget everything known about `form`
    pub fn remove(&mut self, form: &str) {
        if let Some(id) = self.lemmas.find_form_id(form) {
            self.lemmas.remove_form(id);
            self.words.remove(&id);
            self.names.remove(&id);
            self.norms.remove(&id);
        }
        self.abbreviations.remove(form);
        self.locutions.remove(form);
    }

    /// Entry of a common word
    pub fn word(&self, form: &str) -> Option<&WordEntry> {
        let id = self.lemmas.find_form_id(form)?;
        self.words.get(&id)
    }

    /// Entry of a proper name, capitalization significant
    pub fn name(&self, form: &str) -> Option<&WordEntry> {
        let id = self.lemmas.find_form_id(form)?;
        self.names.get(&id)
    }

    /// Preferred spelling of `form`
    pub fn norm(&self, form: &str) -> Option<&str> {
        let id = self.lemmas.find_form_id(form)?;
        let norm = self.norms.get(&id)?;
        self.lemmas.form(*norm)
    }

    /// Lemma of `form` read as `tag`, with the default-category fallback
    pub fn lemma(&self, form: &str, tag: Tag) -> Option<&str> {
        self.lemmas.find_lemma(form, tag)
    }

    /// Lemma text of an entry
    pub fn entry_lemma(&self, entry: &WordEntry) -> Option<&str> {
        entry.lemma.and_then(|id| self.lemmas.form(id))
    }

    pub fn stats(&self) -> LexiconStats {
        LexiconStats {
            forms: self.lemmas.form_count(),
            entries: self.lemmas.entry_count(),
            words: self.words.len(),
            names: self.names.len(),
            norms: self.norms.len(),
            abbreviations: self.abbreviations.len(),
            locutions: self.locutions.len(),
            max_form_len: self.lemmas.max_form_len(),
        }
    }
}
