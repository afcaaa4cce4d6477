//! Token record and the pull protocol shared by every analysis stage

use crate::tag::Tag;

/// One token with the attributes accumulated along the pipeline.
///
/// Offsets are char positions in the source text, `end` exclusive. A stage
/// that splits a token slices its span so that fragments cover it exactly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Token {
    pub term: String,
    pub start: usize,
    pub end: usize,
    pub tag: Tag,
    /// Distance in positions from the previous token
    pub pos_inc: u32,
    /// Number of positions covered (>1 for a merged locution)
    pub pos_len: u32,
    /// Normalized spelling, empty when equal to `term`
    pub orth: String,
    /// Empty when unknown
    pub lemma: String,
    /// Protected from lemmatization
    pub keyword: bool,
}

impl Token {
    pub fn new(term: &str, start: usize, end: usize, tag: Tag) -> Self {
        Self {
            term: term.to_string(),
            start,
            end,
            tag,
            pos_inc: 1,
            pos_len: 1,
            ..Default::default()
        }
    }

    /// Reset every attribute, keeping buffer allocations
    pub fn clear(&mut self) {
        self.term.clear();
        self.start = 0;
        self.end = 0;
        self.tag = Tag::Word;
        self.pos_inc = 1;
        self.pos_len = 1;
        self.orth.clear();
        self.lemma.clear();
        self.keyword = false;
    }

    /// Orthographic form, falling back to the term
    #[inline]
    pub fn orth_or_term(&self) -> &str {
        if self.orth.is_empty() {
            &self.term
        } else {
            &self.orth
        }
    }

    /// Lemma, falling back to the orthographic form
    #[inline]
    pub fn lemma_or_orth(&self) -> &str {
        if self.lemma.is_empty() {
            self.orth_or_term()
        } else {
            &self.lemma
        }
    }

    /// Lemma, falling back to the raw term
    #[inline]
    pub fn lemma_or_term(&self) -> &str {
        if self.lemma.is_empty() {
            &self.term
        } else {
            &self.lemma
        }
    }

    #[inline]
    pub fn char_len(&self) -> usize {
        self.end - self.start
    }
}

/// A pull stream of tokens.
///
/// `increment` fills the caller's token with the next one and returns `false`
/// at end of stream. Stages wrap one another, each owning its upstream.
pub trait TokenStream {
    fn increment(&mut self, token: &mut Token) -> bool;

    /// Drop any buffered state
    fn reset(&mut self) {}

    /// Iterator over owned tokens
    fn tokens(self) -> Tokens<Self>
    where
        Self: Sized,
    {
        Tokens { stream: self }
    }
}

impl<S: TokenStream + ?Sized> TokenStream for Box<S> {
    fn increment(&mut self, token: &mut Token) -> bool {
        (**self).increment(token)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Iterator adapter over a [`TokenStream`]
pub struct Tokens<S> {
    stream: S,
}

impl<S> Tokens<S> {
    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: TokenStream> Iterator for Tokens<S> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let mut token = Token::default();
        if self.stream.increment(&mut token) {
            Some(token)
        } else {
            None
        }
    }
}

/// Stream over a prepared list of tokens, mostly to feed a single stage
#[derive(Debug, Clone, Default)]
pub struct VecStream {
    tokens: std::collections::VecDeque<Token>,
}

impl VecStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into(),
        }
    }
}

impl TokenStream for VecStream {
    fn increment(&mut self, token: &mut Token) -> bool {
        match self.tokens.pop_front() {
            Some(next) => {
                *token = next;
                true
            }
            None => false,
        }
    }
}
