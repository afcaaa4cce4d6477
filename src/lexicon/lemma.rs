//! Form -> lemma mapping, optionally qualified by part of speech

use rustc_hash::FxHashMap;

use super::LexiconError;
use crate::forms::{FormId, FormTable};
use crate::tag::Tag;

/// Part-of-speech id meaning "any category"
pub const DEFAULT_POS: u8 = Tag::Word as u8;

/// What `put_entry` does when `(form, pos)` already has a lemma
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Keep the first mapping
    #[default]
    Ignore,
    /// Keep the last mapping
    Replace,
    /// Fail on a mapping to a different lemma
    Error,
}

/// Interned forms and their lemmas.
///
/// Lemmas are forms too, so a lemma id resolves through the same table.
#[derive(Debug, Clone, Default)]
pub struct LemmaLexicon {
    forms: FormTable,
    lemma_by_form_pos: FxHashMap<(FormId, u8), FormId>,
}

impl LemmaLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(expected_forms: usize) -> Self {
        Self {
            forms: FormTable::with_capacity(expected_forms.max(8)),
            lemma_by_form_pos: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn forms(&self) -> &FormTable {
        &self.forms
    }

    pub fn intern_form(&mut self, form: &str) -> FormId {
        self.forms.intern(form)
    }

    pub fn find_form_id(&self, form: &str) -> Option<FormId> {
        self.forms.find(form)
    }

    pub fn contains_form(&self, form: &str) -> bool {
        self.forms.find(form).is_some()
    }

    #[inline]
    pub fn form(&self, id: FormId) -> Option<&str> {
        self.forms.resolve(id)
    }

    /// Number of `(form, pos)` mappings
    pub fn entry_count(&self) -> usize {
        self.lemma_by_form_pos.len()
    }

    pub fn form_count(&self) -> usize {
        self.forms.len()
    }

    pub fn max_form_len(&self) -> usize {
        self.forms.max_form_len()
    }

    /// Map `(form, pos)` to `lemma`; returns whether the table changed
    pub fn put_entry(
        &mut self,
        form: FormId,
        pos: u8,
        lemma: FormId,
        policy: DuplicatePolicy,
    ) -> Result<bool, LexiconError> {
        for id in [form, lemma] {
            if self.forms.resolve(id).is_none() {
                return Err(LexiconError::UnknownId(id));
            }
        }
        match self.lemma_by_form_pos.get_mut(&(form, pos)) {
            None => {
                self.lemma_by_form_pos.insert((form, pos), lemma);
                Ok(true)
            }
            Some(previous) if *previous == lemma => Ok(false),
            Some(previous) => match policy {
                DuplicatePolicy::Ignore => Ok(false),
                DuplicatePolicy::Replace => {
                    *previous = lemma;
                    Ok(true)
                }
                DuplicatePolicy::Error => {
                    let text = |id| self.forms.resolve(id).unwrap_or_default().to_string();
                    Err(LexiconError::Conflict {
                        form: text(form),
                        pos: Tag::from_code(pos).unwrap_or_default(),
                        previous: text(*previous),
                        new: text(lemma),
                    })
                }
            },
        }
    }

    /// Intern both strings and map them
    pub fn put(
        &mut self,
        form: &str,
        pos: Tag,
        lemma: &str,
        policy: DuplicatePolicy,
    ) -> Result<bool, LexiconError> {
        let form = self.intern_form(form);
        let lemma = self.intern_form(lemma);
        self.put_entry(form, pos.code(), lemma, policy)
    }

    pub fn find_lemma_id(&self, form: FormId, pos: u8) -> Option<FormId> {
        self.lemma_by_form_pos.get(&(form, pos)).copied()
    }

    /// Lemma for `pos`, else the lemma registered for any category
    pub fn find_lemma_id_or_default_pos(&self, form: FormId, pos: u8) -> Option<FormId> {
        match self.find_lemma_id(form, pos) {
            Some(lemma) => Some(lemma),
            None if pos == DEFAULT_POS => None,
            None => self.find_lemma_id(form, DEFAULT_POS),
        }
    }

    /// One-shot lookup from text, with the default-category fallback
    pub fn find_lemma(&self, form: &str, pos: Tag) -> Option<&str> {
        let form = self.forms.find(form)?;
        let lemma = self.find_lemma_id_or_default_pos(form, pos.code())?;
        self.forms.resolve(lemma)
    }

    /// Drop every mapping of `form`; the form itself stays interned
    pub fn remove_form(&mut self, form: FormId) -> usize {
        let before = self.lemma_by_form_pos.len();
        self.lemma_by_form_pos.retain(|(f, _), _| *f != form);
        before - self.lemma_by_form_pos.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn homographs() -> LemmaLexicon {
        let mut lex = LemmaLexicon::new();
        lex.put("saw", Tag::Verb, "see", DuplicatePolicy::Error).unwrap();
        lex.put("saw", Tag::Noun, "saw", DuplicatePolicy::Error).unwrap();
        lex.put("children", Tag::Word, "child", DuplicatePolicy::Error)
            .unwrap();
        lex
    }

    #[test]
    fn test_intern_idempotent() {
        let mut lex = LemmaLexicon::new();
        let a = lex.intern_form("mot");
        let b = lex.intern_form("mot");
        assert_eq!(a, b);
        assert_eq!(lex.form(a), Some("mot"));
        assert_eq!(lex.form_count(), 1);
    }

    #[test]
    fn test_pos_specific_lemmas() {
        let lex = homographs();
        assert_eq!(lex.find_lemma("saw", Tag::Verb), Some("see"));
        assert_eq!(lex.find_lemma("saw", Tag::Noun), Some("saw"));
        assert_eq!(lex.find_lemma("saw", Tag::Adj), None);
        assert_eq!(lex.find_lemma("unknown", Tag::Verb), None);
    }

    #[test]
    fn test_default_pos_fallback() {
        let lex = homographs();
        let children = lex.find_form_id("children").unwrap();
        let child = lex.find_form_id("child").unwrap();
        for pos in [Tag::Noun, Tag::Verb, Tag::Adj, Tag::Word] {
            assert_eq!(
                lex.find_lemma_id_or_default_pos(children, pos.code()),
                Some(child)
            );
        }
        assert_eq!(lex.find_lemma_id(children, Tag::Noun.code()), None);
    }

    #[test]
    fn test_duplicate_policies() {
        let mut lex = LemmaLexicon::new();
        assert!(lex.put("était", Tag::Aux, "être", DuplicatePolicy::Ignore).unwrap());
        assert!(!lex.put("était", Tag::Aux, "étayer", DuplicatePolicy::Ignore).unwrap());
        assert_eq!(lex.find_lemma("était", Tag::Aux), Some("être"));

        assert!(lex.put("était", Tag::Aux, "étayer", DuplicatePolicy::Replace).unwrap());
        assert_eq!(lex.find_lemma("était", Tag::Aux), Some("étayer"));
        assert_eq!(lex.entry_count(), 1);
    }

    #[test]
    fn test_error_policy_only_on_conflict() {
        let mut lex = LemmaLexicon::new();
        lex.put("fut", Tag::Aux, "être", DuplicatePolicy::Error).unwrap();
        // same mapping again is fine
        assert!(!lex.put("fut", Tag::Aux, "être", DuplicatePolicy::Error).unwrap());
        match lex.put("fut", Tag::Aux, "futer", DuplicatePolicy::Error) {
            Err(LexiconError::Conflict {
                form,
                pos,
                previous,
                new,
            }) => {
                assert_eq!(form, "fut");
                assert_eq!(pos, Tag::Aux);
                assert_eq!(previous, "être");
                assert_eq!(new, "futer");
            }
            other => panic!("expected conflict, got {other:?}"),
        }
        assert_eq!(lex.find_lemma("fut", Tag::Aux), Some("être"));
    }

    #[test]
    fn test_foreign_id_rejected() {
        let mut other = LemmaLexicon::new();
        other.intern_form("a");
        let foreign = other.intern_form("b");
        let mut lex = LemmaLexicon::new();
        let a = lex.intern_form("a");
        assert!(matches!(
            lex.put_entry(a, DEFAULT_POS, foreign, DuplicatePolicy::Ignore),
            Err(LexiconError::UnknownId(_))
        ));
    }

    #[test]
    fn test_remove_form() {
        let mut lex = homographs();
        let saw = lex.find_form_id("saw").unwrap();
        assert_eq!(lex.remove_form(saw), 2);
        assert_eq!(lex.find_lemma("saw", Tag::Verb), None);
        assert_eq!(lex.find_lemma("children", Tag::Noun), Some("child"));
    }
}
