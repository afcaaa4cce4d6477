//! Markup-aware tokenizer
//!
//! A single pass over the characters of a document. Markup tags are kept as
//! tokens of their own, entities are decoded inside words, numbers and
//! punctuation runs get their coarse category. Offsets are char positions in
//! the source text and always describe what was consumed, even when the
//! emitted term differs (decoded entities, dropped soft hyphens, truncated
//! tags).

use rustc_hash::FxHashSet;

use crate::tag::Tag;
use crate::token::{Token, TokenStream};

pub const TOKEN_MAX_LEN: usize = 256;
pub const TAG_MAX_LEN: usize = 256;
const ENTITY_MAX_LEN: usize = 10;
const SOFT_HYPHEN: char = '\u{AD}';

/// Tokenizer settings
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    /// Chars in a word before it is emitted anyway
    pub max_token_len: usize,
    /// Chars kept from a markup tag
    pub max_tag_len: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            max_token_len: TOKEN_MAX_LEN,
            max_tag_len: TAG_MAX_LEN,
        }
    }
}

impl TokenizerConfig {
    pub fn with_max_token_len(mut self, len: usize) -> Self {
        self.max_token_len = len.max(1);
        self
    }

    pub fn with_max_tag_len(mut self, len: usize) -> Self {
        self.max_tag_len = len.max(1);
        self
    }
}

/// Clause punctuation, always a one-char token
#[inline]
pub fn is_clause_punct(c: char) -> bool {
    matches!(
        c,
        ',' | ';'
            | ':'
            | '('
            | ')'
            | '['
            | ']'
            | '—'
            | '–'
            | '"'
            | '«'
            | '»'
            | '“'
            | '”'
            | '‹'
            | '›'
    )
}

/// Sentence punctuation, consecutive chars make one run
#[inline]
pub fn is_sentence_punct(c: char) -> bool {
    matches!(c, '.' | '…' | '?' | '!')
}

#[inline]
fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '’' | '\u{2BC}')
}

#[inline]
fn is_hyphen(c: char) -> bool {
    matches!(c, '-' | '\u{2010}' | '\u{2011}')
}

/// Named entity to its char
fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "lt" => '<',
        "gt" => '>',
        "amp" => '&',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{A0}',
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or(name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse::<u32>().ok()?
            };
            return char::from_u32(code);
        }
    };
    Some(c)
}

/// Tokenizer over one document
pub struct Tokenizer<'a> {
    chars: Vec<char>,
    pos: usize,
    max_token_len: usize,
    max_tag_len: usize,
    abbreviations: Option<&'a FxHashSet<String>>,
    scratch: String,
}

/// Outcome of an entity at the cursor
enum Entity {
    Decoded(char, usize),
    Verbatim(usize),
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &str) -> Self {
        Self::with_config(text, &TokenizerConfig::default())
    }

    pub fn with_config(text: &str, config: &TokenizerConfig) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            max_token_len: config.max_token_len.max(1),
            max_tag_len: config.max_tag_len.max(1),
            abbreviations: None,
            scratch: String::new(),
        }
    }

    /// Known abbreviations, dot included ("etc.", "Dr."); their trailing dot
    /// stays in the word
    pub fn with_abbreviations(mut self, abbreviations: &'a FxHashSet<String>) -> Self {
        self.abbreviations = Some(abbreviations);
        self
    }

    /// Length of the source in chars
    pub fn char_len(&self) -> usize {
        self.chars.len()
    }

    #[inline]
    fn at(&self, i: usize) -> Option<char> {
        self.chars.get(i).copied()
    }

    /// Entity starting at `i` (on the `&`), with its length in chars
    fn entity_at(&self, i: usize) -> Option<Entity> {
        let mut name = String::new();
        for (k, &c) in self.chars.iter().enumerate().skip(i + 1).take(ENTITY_MAX_LEN) {
            if c == ';' {
                if name.is_empty() {
                    return None;
                }
                let len = k + 1 - i;
                return Some(match named_entity(&name) {
                    Some(decoded) => Entity::Decoded(decoded, len),
                    None => Entity::Verbatim(len),
                });
            }
            if !(c.is_ascii_alphanumeric() || c == '#') {
                return None;
            }
            name.push(c);
        }
        None
    }

    fn scan_tag(&mut self, token: &mut Token) {
        let start = self.pos;
        let mut kept = 0;
        while let Some(c) = self.at(self.pos) {
            self.pos += 1;
            if kept < self.max_tag_len {
                token.term.push(c);
                kept += 1;
            }
            if c == '>' {
                break;
            }
        }
        if self.pos - start > kept {
            tracing::trace!(start, end = self.pos, "markup tag truncated");
        }
        token.start = start;
        token.end = self.pos;
        token.tag = Tag::Markup;
    }

    fn scan_number(&mut self, token: &mut Token) {
        let start = self.pos;
        if self.at(self.pos) == Some('-') {
            token.term.push('-');
            self.pos += 1;
        }
        let mut len = token.term.len();
        while let Some(c) = self.at(self.pos) {
            if len >= self.max_token_len {
                break;
            }
            if c.is_ascii_digit() {
                token.term.push(c);
            } else if (c == '.' || c == ',')
                && self.at(self.pos + 1).is_some_and(|n| n.is_ascii_digit())
            {
                token.term.push(c);
            } else {
                break;
            }
            self.pos += 1;
            len += 1;
        }
        token.start = start;
        token.end = self.pos;
        token.tag = Tag::Digit;
    }

    fn scan_sentence_punct(&mut self, token: &mut Token) {
        let start = self.pos;
        while let Some(c) = self.at(self.pos) {
            if !is_sentence_punct(c) || token.term.len() >= self.max_token_len {
                break;
            }
            token.term.push(c);
            self.pos += 1;
        }
        token.start = start;
        token.end = self.pos;
        token.tag = Tag::PunctSent;
    }

    /// Keep the dot ending the word in `token.term`
    fn keeps_trailing_dot(&mut self, term: &str) -> bool {
        // "M." "p." or the last letter of "U.S.A."
        let last_segment = term.rsplit('.').next().unwrap_or(term);
        if last_segment.chars().count() == 1 {
            return true;
        }
        match self.abbreviations {
            Some(set) => {
                self.scratch.clear();
                self.scratch.push_str(term);
                self.scratch.push('.');
                set.contains(&self.scratch)
            }
            None => false,
        }
    }

    fn scan_word(&mut self, token: &mut Token) {
        let start = self.pos;
        let mut len = 0;
        let mut last = '\0';
        while let Some(c) = self.at(self.pos) {
            if len >= self.max_token_len {
                break;
            }
            if c == SOFT_HYPHEN {
                self.pos += 1;
                continue;
            }
            let next = self.at(self.pos + 1);
            let push = if c.is_alphanumeric() || c == '_' || c == '*' {
                c
            } else if is_hyphen(c) {
                // internal only
                if !next.is_some_and(char::is_alphanumeric) {
                    break;
                }
                c
            } else if is_apostrophe(c) {
                '\''
            } else if c == '&' {
                match self.entity_at(self.pos) {
                    Some(Entity::Decoded(decoded, n)) => {
                        token.term.push(decoded);
                        self.pos += n;
                        len += 1;
                        last = decoded;
                        continue;
                    }
                    Some(Entity::Verbatim(n)) => {
                        for k in self.pos..self.pos + n {
                            token.term.push(self.chars[k]);
                        }
                        self.pos += n;
                        len += n;
                        last = ';';
                        continue;
                    }
                    None => break,
                }
            } else if c == '.' && last.is_alphabetic() {
                if next.is_some_and(|n| n.is_alphabetic()) {
                    // U.S.A
                    '.'
                } else if self.keeps_trailing_dot(&token.term) {
                    token.term.push('.');
                    self.pos += 1;
                    break;
                } else {
                    break;
                }
            } else {
                break;
            };
            token.term.push(push);
            self.pos += 1;
            len += 1;
            last = push;
        }
        token.start = start;
        token.end = self.pos;
        token.tag = if token.term.chars().any(char::is_alphanumeric) {
            Tag::Word
        } else {
            Tag::Punct
        };
    }
}

impl TokenStream for Tokenizer<'_> {
    fn increment(&mut self, token: &mut Token) -> bool {
        token.clear();
        while let Some(c) = self.at(self.pos) {
            let next = self.at(self.pos + 1);
            if c == '<' {
                self.scan_tag(token);
            } else if c.is_ascii_digit() || (c == '-' && next.is_some_and(|n| n.is_ascii_digit())) {
                self.scan_number(token);
            } else if c.is_alphabetic()
                || c == '_'
                || (is_hyphen(c) && next.is_some_and(char::is_alphabetic))
            {
                self.scan_word(token);
            } else if c == '&' && self.entity_at(self.pos).is_some() {
                self.scan_word(token);
            } else if is_sentence_punct(c) {
                self.scan_sentence_punct(token);
            } else if is_clause_punct(c) || is_hyphen(c) {
                token.term.push(c);
                token.start = self.pos;
                self.pos += 1;
                token.end = self.pos;
                token.tag = Tag::PunctClause;
            } else {
                self.pos += 1;
                continue;
            }
            return true;
        }
        false
    }

    fn reset(&mut self) {
        self.pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn terms(text: &str) -> Vec<String> {
        Tokenizer::new(text).tokens().map(|t| t.term).collect()
    }

    fn triples(text: &str) -> Vec<(String, usize, usize, Tag)> {
        Tokenizer::new(text)
            .tokens()
            .map(|t| (t.term, t.start, t.end, t.tag))
            .collect()
    }

    // ===== Word and Punctuation Tests =====

    #[test]
    fn test_simple_sentence() {
        assert_eq!(
            triples("Le chat dort."),
            vec![
                ("Le".to_string(), 0, 2, Tag::Word),
                ("chat".to_string(), 3, 7, Tag::Word),
                ("dort".to_string(), 8, 12, Tag::Word),
                (".".to_string(), 12, 13, Tag::PunctSent),
            ]
        );
    }

    #[test]
    fn test_end_dot_is_punctuation() {
        assert_eq!(terms("end."), vec!["end", "."]);
    }

    #[test]
    fn test_acronym_with_dots() {
        assert_eq!(terms("U.S.A."), vec!["U.S.A."]);
        assert_eq!(terms("les U.S.A. sont"), vec!["les", "U.S.A.", "sont"]);
        assert_eq!(terms("U.S.A"), vec!["U.S.A"]);
    }

    #[test]
    fn test_single_letter_abbreviation() {
        assert_eq!(terms("M. Dupont"), vec!["M.", "Dupont"]);
    }

    #[test]
    fn test_known_abbreviations() {
        let mut set = FxHashSet::default();
        set.insert("etc.".to_string());
        let found: Vec<String> = Tokenizer::new("des chats, etc. Puis")
            .with_abbreviations(&set)
            .tokens()
            .map(|t| t.term)
            .collect();
        assert_eq!(found, vec!["des", "chats", ",", "etc.", "Puis"]);
        // without the set, the dot is a sentence break
        assert_eq!(terms("etc. Puis"), vec!["etc", ".", "Puis"]);
    }

    #[test]
    fn test_sentence_punct_runs() {
        assert_eq!(
            triples("Quoi?! Non…"),
            vec![
                ("Quoi".to_string(), 0, 4, Tag::Word),
                ("?!".to_string(), 4, 6, Tag::PunctSent),
                ("Non".to_string(), 7, 10, Tag::Word),
                ("…".to_string(), 10, 11, Tag::PunctSent),
            ]
        );
    }

    #[test]
    fn test_clause_punct_is_single_char() {
        assert_eq!(
            terms("oui,, « non » (peut-être) ; bon - fin"),
            vec![
                "oui", ",", ",", "«", "non", "»", "(", "peut-être", ")", ";", "bon", "-", "fin"
            ]
        );
    }

    #[test]
    fn test_dangling_hyphen_ends_word() {
        assert_eq!(terms("peut- être"), vec!["peut", "-", "être"]);
        assert_eq!(terms("anti-"), vec!["anti", "-"]);
        assert_eq!(terms("covid-19 peut-être"), vec!["covid-19", "peut-être"]);
    }

    #[test]
    fn test_apostrophe_normalized() {
        assert_eq!(terms("l’homme aujourd'hui"), vec!["l'homme", "aujourd'hui"]);
    }

    #[test]
    fn test_soft_hyphen_dropped() {
        let toks = triples("ana\u{AD}lyse");
        assert_eq!(toks, vec![("analyse".to_string(), 0, 8, Tag::Word)]);
    }

    #[test]
    fn test_joker_inside_word() {
        assert_eq!(terms("chat* *x"), vec!["chat*", "x"]);
    }

    // ===== Number Tests =====

    #[test]
    fn test_numbers() {
        assert_eq!(
            triples("3,14 et 1.000."),
            vec![
                ("3,14".to_string(), 0, 4, Tag::Digit),
                ("et".to_string(), 5, 7, Tag::Word),
                ("1.000".to_string(), 8, 13, Tag::Digit),
                (".".to_string(), 13, 14, Tag::PunctSent),
            ]
        );
    }

    #[test]
    fn test_number_then_comma() {
        assert_eq!(terms("1, 2"), vec!["1", ",", "2"]);
    }

    #[test]
    fn test_negative_number() {
        assert_eq!(
            triples("de -12 à -3"),
            vec![
                ("de".to_string(), 0, 2, Tag::Word),
                ("-12".to_string(), 3, 6, Tag::Digit),
                ("à".to_string(), 7, 8, Tag::Word),
                ("-3".to_string(), 9, 11, Tag::Digit),
            ]
        );
    }

    // ===== Markup and Entity Tests =====

    #[test]
    fn test_markup_tags() {
        assert_eq!(
            triples("<p>Il <i>dort</i></p>"),
            vec![
                ("<p>".to_string(), 0, 3, Tag::Markup),
                ("Il".to_string(), 3, 5, Tag::Word),
                ("<i>".to_string(), 6, 9, Tag::Markup),
                ("dort".to_string(), 9, 13, Tag::Word),
                ("</i>".to_string(), 13, 17, Tag::Markup),
                ("</p>".to_string(), 17, 21, Tag::Markup),
            ]
        );
    }

    #[test]
    fn test_long_tag_truncated_offsets_exact() {
        let text = format!("<p {}>mot", "a".repeat(20));
        let config = TokenizerConfig::default().with_max_tag_len(5);
        let toks: Vec<Token> = Tokenizer::with_config(&text, &config).tokens().collect();
        assert_eq!(toks[0].term, "<p aa");
        assert_eq!((toks[0].start, toks[0].end), (0, 24));
        assert_eq!((toks[1].term.as_str(), toks[1].start), ("mot", 24));
    }

    #[test]
    fn test_entities_decoded_in_words() {
        assert_eq!(
            triples("A&amp;B l&apos;eau"),
            vec![
                ("A&B".to_string(), 0, 7, Tag::Word),
                ("l'eau".to_string(), 8, 18, Tag::Word),
            ]
        );
    }

    #[test]
    fn test_standalone_entity() {
        assert_eq!(
            triples("a &lt; b"),
            vec![
                ("a".to_string(), 0, 1, Tag::Word),
                ("<".to_string(), 2, 6, Tag::Punct),
                ("b".to_string(), 7, 8, Tag::Word),
            ]
        );
    }

    #[test]
    fn test_unknown_entity_verbatim() {
        assert_eq!(terms("x&foo;y"), vec!["x&foo;y"]);
        assert_eq!(terms("x & y"), vec!["x", "y"]);
    }

    #[test]
    fn test_numeric_entity() {
        assert_eq!(terms("caf&#233;"), vec!["café"]);
    }

    // ===== Limits =====

    #[test]
    fn test_length_cap_forces_emission() {
        let config = TokenizerConfig::default().with_max_token_len(4);
        let toks: Vec<Token> = Tokenizer::with_config("abcdefghij", &config).tokens().collect();
        let found: Vec<&str> = toks.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(found, vec!["abcd", "efgh", "ij"]);
        assert_eq!((toks[1].start, toks[1].end), (4, 8));
    }

    #[test]
    fn test_zero_limits_clamped() {
        let config = TokenizerConfig {
            max_token_len: 0,
            max_tag_len: 0,
        };
        let toks: Vec<Token> = Tokenizer::with_config("abc <p>", &config)
            .tokens()
            .take(16)
            .collect();
        let found: Vec<&str> = toks.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(found, vec!["a", "b", "c", "<"]);
        assert_eq!((toks[3].start, toks[3].end), (4, 7));
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(terms("").is_empty());
        assert!(terms("  \n\t ").is_empty());
    }

    #[test]
    fn test_reset_restarts() {
        let mut tokenizer = Tokenizer::new("un deux");
        let mut token = Token::default();
        assert!(tokenizer.increment(&mut token));
        assert!(tokenizer.increment(&mut token));
        assert!(!tokenizer.increment(&mut token));
        tokenizer.reset();
        assert!(tokenizer.increment(&mut token));
        assert_eq!(token.term, "un");
    }

    proptest! {
        #[test]
        fn prop_offsets_within_input_and_ordered(text in "[a-zA-Zé'’ .,;!?<>&;0-9\\-]{0,60}") {
            let len = text.chars().count();
            let mut prev_end = 0;
            for token in Tokenizer::new(&text).tokens() {
                prop_assert!(token.start < token.end);
                prop_assert!(token.end <= len);
                prop_assert!(token.start >= prev_end);
                prop_assert!(!token.term.is_empty());
                prev_end = token.end;
            }
        }
    }
}
