//! Multi-word expressions
//!
//! Greedy longest match of the locution trie over a lookahead window. Each
//! token is looked up under the key its category calls for: the lemma for a
//! verb ("eut lieu" finds "avoir lieu"), a placeholder for names and numbers,
//! the lowercase form at sentence start, the surface form otherwise.
//! A match merges its tokens into one.

use crate::lexicon::{LocutionEntry, LocutionTrie, NAME_KEY, NUMBER_KEY, NodeId};
use crate::queue::{OverflowPolicy, TokenQueue};
use crate::tag::Tag;
use crate::token::{Token, TokenStream};

/// Ceiling of the lookahead window
pub const MAX_WINDOW: usize = 64;

#[inline]
fn is_boundary(token: &Token) -> bool {
    token.tag.is_punct() || token.tag == Tag::Markup || token.term.is_empty()
}

/// Trie child of `node` for `token`, trying its keys in order
fn step(trie: &LocutionTrie, node: NodeId, token: &Token, initial: bool) -> Option<NodeId> {
    if token.tag.is_verb() && !token.lemma.is_empty() {
        if let Some(next) = trie.step(node, &token.lemma) {
            return Some(next);
        }
    }
    if token.tag.is_name() {
        if let Some(next) = trie.step(node, NAME_KEY) {
            return Some(next);
        }
    }
    if token.tag == Tag::Digit || token.tag.family() == Tag::Num.family() {
        if let Some(next) = trie.step(node, NUMBER_KEY) {
            return Some(next);
        }
    }
    let surface = token.orth_or_term();
    if initial {
        if let Some(next) = trie.step(node, &surface.to_lowercase()) {
            return Some(next);
        }
    }
    trie.step(node, surface).or_else(|| {
        if surface != token.term {
            trie.step(node, &token.term)
        } else {
            None
        }
    })
}

/// Append `next` to `buf`, with a space unless joined by an apostrophe or a hyphen
fn join(buf: &mut String, next: &str) {
    if !buf.is_empty() && !buf.ends_with('\'') && !next.starts_with('-') {
        buf.push(' ');
    }
    buf.push_str(next);
}

/// Locution stage over a lemmatized token stream
pub struct LocutionResolver<'l, S> {
    input: S,
    trie: &'l LocutionTrie,
    window: TokenQueue,
    exhausted: bool,
    sentence_start: bool,
    /// Pulled from upstream while the window was full
    pending: Option<Token>,
    scratch: Token,
    orth: String,
    lemma: String,
}

impl<'l, S: TokenStream> LocutionResolver<'l, S> {
    pub fn new(input: S, trie: &'l LocutionTrie) -> Self {
        let capacity = trie.max_depth().clamp(2, MAX_WINDOW);
        Self {
            input,
            trie,
            window: TokenQueue::with_max_capacity(capacity, OverflowPolicy::Grow, MAX_WINDOW),
            exhausted: false,
            sentence_start: true,
            pending: None,
            scratch: Token::default(),
            orth: String::new(),
            lemma: String::new(),
        }
    }

    /// Make sure the window holds token `i`
    fn fill(&mut self, i: usize) -> bool {
        while self.window.len() <= i {
            if let Some(held) = self.pending.take() {
                if let Err(e) = self.window.push_back(&held) {
                    self.pending = Some(held);
                    tracing::debug!(error = %e, "locution lookahead cut");
                    return false;
                }
                continue;
            }
            if self.exhausted {
                return false;
            }
            if !self.input.increment(&mut self.scratch) {
                self.exhausted = true;
                return false;
            }
            if let Err(e) = self.window.push_back(&self.scratch) {
                // window at its ceiling; the token waits for the next fill
                self.pending = Some(std::mem::take(&mut self.scratch));
                tracing::debug!(error = %e, "locution lookahead cut");
                return false;
            }
        }
        true
    }

    /// Longest match from the window front: index of its last token and entry
    fn longest_match(&mut self) -> Option<(usize, &'l LocutionEntry)> {
        let trie = self.trie;
        let initial = self.sentence_start;
        let mut node = LocutionTrie::ROOT;
        let mut best = None;
        let mut i = 0;
        while self.fill(i) {
            let Some(token) = self.window.get(i) else {
                break;
            };
            if is_boundary(token) {
                break;
            }
            match step(trie, node, token, initial && i == 0) {
                Some(next) => node = next,
                None => break,
            }
            if let Some(entry) = trie.entry(node) {
                best = Some((i, entry));
            }
            if !trie.has_children(node) {
                break;
            }
            i += 1;
        }
        best
    }

    /// Pop `count` window tokens into `token` as one compound
    fn merge(&mut self, token: &mut Token, count: usize, entry: &LocutionEntry) {
        let initial = self.sentence_start;
        if self.window.pop_front(token).is_err() {
            return;
        }
        self.orth.clear();
        self.orth.push_str(token.orth_or_term());
        self.lemma.clear();
        if initial && token.lemma.is_empty() {
            self.lemma.push_str(&token.orth_or_term().to_lowercase());
        } else {
            self.lemma.push_str(token.lemma_or_orth());
        }
        for _ in 1..count {
            if self.window.pop_front(&mut self.scratch).is_err() {
                break;
            }
            join(&mut token.term, &self.scratch.term);
            join(&mut self.orth, self.scratch.orth_or_term());
            join(&mut self.lemma, self.scratch.lemma_or_orth());
            token.end = self.scratch.end;
        }
        token.pos_len = count as u32;
        token.tag = if entry.tag == Tag::Word {
            Tag::Loc
        } else {
            entry.tag
        };
        token.orth.clear();
        let orth = entry.norm.as_deref().unwrap_or(&self.orth);
        if orth != token.term {
            token.orth.push_str(orth);
        }
        token.lemma.clear();
        token
            .lemma
            .push_str(entry.lemma.as_deref().unwrap_or(&self.lemma));
    }
}

impl<S: TokenStream> TokenStream for LocutionResolver<'_, S> {
    fn increment(&mut self, token: &mut Token) -> bool {
        if !self.fill(0) {
            return false;
        }
        match self.longest_match() {
            Some((last, entry)) if last > 0 => self.merge(token, last + 1, entry),
            _ => {
                if self.window.pop_front(token).is_err() {
                    return false;
                }
            }
        }
        if token.tag.is_sentence_break() {
            self.sentence_start = true;
        } else if token.tag != Tag::Markup {
            self.sentence_start = false;
        }
        true
    }

    fn reset(&mut self) {
        self.window.clear();
        self.pending = None;
        self.exhausted = false;
        self.sentence_start = true;
        self.input.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clitic::CliticSplitter;
    use crate::lemmatizer::Lemmatizer;
    use crate::lexicon::{DuplicatePolicy, Lexicon};
    use crate::tokenizer::Tokenizer;
    use pretty_assertions::assert_eq;

    fn lexicon() -> Lexicon {
        let mut lex = Lexicon::new();
        for (form, tag, lemma) in [
            ("eut", Tag::Verb, "avoir"),
            ("prend", Tag::Verb, "prendre"),
            ("lieu", Tag::Noun, "lieu"),
            ("air", Tag::Noun, "air"),
            ("pomme", Tag::Noun, "pomme"),
            ("de", Tag::Adp, "de"),
        ] {
            lex.put_entry(form, tag, Some(lemma), DuplicatePolicy::Ignore)
                .unwrap();
        }
        lex.put_entry("Dupont", Tag::PropnPrs, None, DuplicatePolicy::Ignore)
            .unwrap();
        let locutions = [
            ("parce que", Tag::Sconj, None),
            ("pomme de terre", Tag::Noun, None),
            ("pomme de terre cuite", Tag::Noun, None),
            ("avoir lieu", Tag::Verb, Some("avoir lieu")),
            ("prendre l'air", Tag::Verb, Some("prendre l'air")),
            ("NAME et fils", Tag::PropnOrg, None),
            ("# heures", Tag::Word, None),
        ];
        for (expr, tag, lemma) in locutions {
            lex.add_locution(
                expr,
                LocutionEntry {
                    tag,
                    lemma: lemma.map(str::to_string),
                    norm: None,
                },
            );
        }
        lex
    }

    fn run(lex: &Lexicon, text: &str) -> Vec<Token> {
        let stream = Lemmatizer::new(CliticSplitter::new(Tokenizer::new(text)), lex);
        LocutionResolver::new(stream, lex.locutions()).tokens().collect()
    }

    fn terms(lex: &Lexicon, text: &str) -> Vec<String> {
        run(lex, text).into_iter().map(|t| t.term).collect()
    }

    #[test]
    fn test_simple_locution() {
        let lex = lexicon();
        let toks = run(&lex, "Il part parce que tu");
        let found: Vec<&str> = toks.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(found, vec!["Il", "part", "parce que", "tu"]);
        let loc = &toks[2];
        assert_eq!(loc.tag, Tag::Sconj);
        assert_eq!((loc.start, loc.end), (8, 17));
        assert_eq!(loc.pos_len, 2);
        assert_eq!(loc.lemma, "parce que");
    }

    #[test]
    fn test_longest_match() {
        let lex = lexicon();
        assert_eq!(
            terms(&lex, "une pomme de terre crue"),
            vec!["une", "pomme de terre", "crue"]
        );
        assert_eq!(
            terms(&lex, "une pomme de terre cuite"),
            vec!["une", "pomme de terre cuite"]
        );
    }

    #[test]
    fn test_dead_branch_emits_first_token() {
        let lex = lexicon();
        assert_eq!(
            terms(&lex, "pomme de table"),
            vec!["pomme", "de", "table"]
        );
        assert_eq!(terms(&lex, "une pomme de"), vec!["une", "pomme", "de"]);
    }

    #[test]
    fn test_verb_matched_by_lemma() {
        let lex = lexicon();
        let toks = run(&lex, "la fête eut lieu");
        assert_eq!(toks.len(), 3);
        assert_eq!(toks[2].term, "eut lieu");
        assert_eq!(toks[2].tag, Tag::Verb);
        assert_eq!(toks[2].lemma, "avoir lieu");
    }

    #[test]
    fn test_apostrophe_join() {
        let lex = lexicon();
        let toks = run(&lex, "il prend l'air");
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[1].term, "prend l'air");
        assert_eq!((toks[1].start, toks[1].end), (3, 14));
        assert_eq!(toks[1].pos_len, 3);
    }

    #[test]
    fn test_name_placeholder() {
        let lex = lexicon();
        let toks = run(&lex, "chez Dupont et fils");
        assert_eq!(toks[1].term, "Dupont et fils");
        assert_eq!(toks[1].tag, Tag::PropnOrg);
    }

    #[test]
    fn test_number_placeholder_defaults_to_loc() {
        let lex = lexicon();
        let toks = run(&lex, "à 10 heures");
        assert_eq!(toks[1].term, "10 heures");
        assert_eq!(toks[1].tag, Tag::Loc);
    }

    #[test]
    fn test_sentence_initial_lowercase() {
        let lex = lexicon();
        let toks = run(&lex, "Parce que. Parce que");
        let found: Vec<&str> = toks.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(found, vec!["Parce que", ".", "Parce que"]);
        assert_eq!(toks[0].lemma, "parce que");
    }

    #[test]
    fn test_capital_inside_sentence_not_lowered() {
        let lex = lexicon();
        assert_eq!(terms(&lex, "et Parce que"), vec!["et", "Parce", "que"]);
    }

    #[test]
    fn test_punctuation_stops_walk() {
        let lex = lexicon();
        assert_eq!(terms(&lex, "parce, que"), vec!["parce", ",", "que"]);
        assert_eq!(terms(&lex, "parce <b>que"), vec!["parce", "<b>", "que"]);
    }

    #[test]
    fn test_empty_trie_passes_through() {
        let lex = Lexicon::new();
        assert_eq!(terms(&lex, "parce que"), vec!["parce", "que"]);
    }

    // ===== Window Tests =====

    #[test]
    fn test_expression_deeper_than_window_drops_nothing() {
        let mut lex = Lexicon::new();
        lex.add_locution(
            &vec!["a"; 70].join(" "),
            LocutionEntry {
                tag: Tag::Loc,
                lemma: None,
                norm: None,
            },
        );
        let text = format!("{} b", vec!["a"; 66].join(" "));
        let toks: Vec<Token> = LocutionResolver::new(Tokenizer::new(&text), lex.locutions())
            .tokens()
            .collect();
        assert_eq!(toks.len(), 67);
        assert!(toks[..66].iter().all(|t| t.term == "a" && t.pos_len == 1));
        assert_eq!(toks[66].term, "b");
        for (i, t) in toks.iter().enumerate() {
            assert_eq!(t.start, 2 * i);
        }
    }
}
