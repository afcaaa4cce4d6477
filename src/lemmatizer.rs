//! Dictionary lemmatizer
//!
//! Gives each word token a category, a lemma and a normalized spelling from
//! a [`Lexicon`]. No disambiguation: a token already carrying a part of
//! speech gets the lemma registered for that category, any other token gets
//! the first reading of its form.

use crate::lexicon::Lexicon;
use crate::tag::Tag;
use crate::token::{Token, TokenStream};

/// Value of a roman numeral written in canonical uppercase form
pub fn roman_value(s: &str) -> Option<u32> {
    let mut total = 0u32;
    let mut max_seen = 0u32;
    for c in s.chars().rev() {
        let v = match c {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            'D' => 500,
            'M' => 1000,
            _ => return None,
        };
        if v < max_seen {
            total = total.checked_sub(v)?;
        } else {
            total += v;
            max_seen = v;
        }
        if total > 4999 {
            return None;
        }
    }
    // "IIII", "VX" and friends
    (total > 0 && to_roman(total) == s).then_some(total)
}

fn to_roman(mut n: u32) -> String {
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for (value, digits) in TABLE {
        while n >= value {
            out.push_str(digits);
            n -= value;
        }
    }
    out
}

/// "PARIS" -> "Paris"
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Lemmatizer stage over an upstream token stream
pub struct Lemmatizer<'l, S> {
    input: S,
    lexicon: &'l Lexicon,
    infer_names: bool,
    sentence_start: bool,
    orth: String,
}

impl<'l, S: TokenStream> Lemmatizer<'l, S> {
    pub fn new(input: S, lexicon: &'l Lexicon) -> Self {
        Self {
            input,
            lexicon,
            infer_names: false,
            sentence_start: true,
            orth: String::new(),
        }
    }

    /// Tag unknown capitalized words inside a sentence as proper names
    pub fn with_infer_names(mut self, infer: bool) -> Self {
        self.infer_names = infer;
        self
    }

    fn set_orth(token: &mut Token, orth: &str) {
        token.orth.clear();
        if orth != token.term {
            token.orth.push_str(orth);
        }
    }

    fn set_lemma(token: &mut Token, lemma: Option<&str>) {
        token.lemma.clear();
        if let Some(lemma) = lemma {
            token.lemma.push_str(lemma);
        }
    }

    /// Token with a category already set upstream
    fn lemmatize_tagged(&mut self, token: &mut Token) {
        let lex = self.lexicon;
        let lemma = lex.lemma(&self.orth, token.tag).or_else(|| {
            let lower = self.orth.to_lowercase();
            lex.lemma(&lower, token.tag).map(|l| {
                self.orth = lower;
                l
            })
        });
        Self::set_lemma(token, lemma);
        Self::set_orth(token, &self.orth);
    }

    fn lemmatize_capitalized(&mut self, token: &mut Token, start: bool) {
        let lex = self.lexicon;
        let bare = self.orth.strip_suffix('.').unwrap_or(&self.orth);
        if bare.chars().nth(1).is_some() {
            if let Some(n) = roman_value(bare) {
                token.tag = Tag::Digit;
                token.lemma.clear();
                token.lemma.push_str(&n.to_string());
                return;
            }
        }
        let name = lex.name(&self.orth).or_else(|| {
            let capitalized = capitalize(&self.orth);
            lex.name(&capitalized).inspect(|_| self.orth = capitalized)
        });
        if let Some(entry) = name {
            token.tag = entry.tag;
            let lemma = lex.entry_lemma(entry);
            Self::set_lemma(token, lemma);
            Self::set_orth(token, &self.orth);
            return;
        }
        // Jean-Baptiste, Charles-François
        if let Some((first, _)) = self.orth.split_once('-') {
            if let Some(entry) = lex.name(first) {
                token.tag = entry.tag;
                token.lemma.clear();
                Self::set_orth(token, &self.orth);
                return;
            }
        }
        let mut lower = self.orth.to_lowercase();
        if let Some(norm) = lex.norm(&lower) {
            lower = norm.to_string();
        }
        if let Some(entry) = lex.word(&lower) {
            token.tag = entry.tag;
            let lemma = lex.entry_lemma(entry);
            Self::set_lemma(token, lemma);
            // État stays État inside a sentence
            if start {
                Self::set_orth(token, &lower);
            } else {
                Self::set_orth(token, &self.orth);
            }
            return;
        }
        token.tag = if self.infer_names && !start {
            Tag::Propn
        } else {
            Tag::Unknown
        };
        token.lemma.clear();
        Self::set_orth(token, &self.orth);
    }

    fn lemmatize_lowercase(&mut self, token: &mut Token) {
        let lex = self.lexicon;
        match lex.word(&self.orth) {
            Some(entry) => {
                token.tag = entry.tag;
                let lemma = lex.entry_lemma(entry);
                Self::set_lemma(token, lemma);
            }
            None => {
                token.tag = Tag::Unknown;
                token.lemma.clear();
            }
        }
        Self::set_orth(token, &self.orth);
    }
}

impl<S: TokenStream> TokenStream for Lemmatizer<'_, S> {
    fn increment(&mut self, token: &mut Token) -> bool {
        if !self.input.increment(token) {
            return false;
        }
        match token.tag {
            Tag::Markup => return true,
            tag if tag.is_punct() => {
                if tag.is_sentence_break() {
                    self.sentence_start = true;
                }
                return true;
            }
            _ => {}
        }
        let start = std::mem::replace(&mut self.sentence_start, false);
        if token.keyword || token.tag == Tag::Digit || token.term.is_empty() {
            return true;
        }
        if !token.term.chars().next().is_some_and(char::is_alphanumeric) {
            return true;
        }

        self.orth.clear();
        let source = if token.orth.is_empty() {
            &token.term
        } else {
            &token.orth
        };
        match self.lexicon.norm(source) {
            Some(norm) => self.orth.push_str(norm),
            None => self.orth.push_str(source),
        }

        if token.tag.is_pos() {
            self.lemmatize_tagged(token);
        } else if self.orth.chars().next().is_some_and(char::is_uppercase) {
            self.lemmatize_capitalized(token, start);
        } else {
            self.lemmatize_lowercase(token);
        }
        true
    }

    fn reset(&mut self) {
        self.sentence_start = true;
        self.input.reset();
    }
}
