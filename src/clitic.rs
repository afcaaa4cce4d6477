//! French clitic and hyphen splitter
//!
//! Turns one token into several: elided prefixes ("j'aime" -> "je" "aime"),
//! postposed pronouns ("dit-il" -> "dit" "il"), euphonic `-t-`
//! ("habite-t-il" -> "habite" "il"). Fragments wait in a bounded queue and are
//! emitted on the following calls. Their offsets slice the span of the source
//! token with no gap or overlap.

use crate::queue::{OverflowPolicy, QueueError, TokenQueue};
use crate::tag::Tag;
use crate::token::{Token, TokenStream, VecStream};

pub const MAX_STEPS: usize = 16;
pub const QUEUE_CAPACITY: usize = 16;

/// Lexicalized forms never split.
///
/// `form` must be folded first: lowercase, straight apostrophe, no
/// diacritics (see [`fold_char`]).
pub fn is_lexicalized(form: &str) -> bool {
    matches!(
        form,
        "c'est"
            | "d'abord"
            | "d'accord"
            | "d'ailleurs"
            | "d'autant"
            | "d'autre"
            | "d'autres"
            | "d'emblee"
            | "d'apres"
            | "d'avec"
            | "d'entre"
            | "d'ici"
            | "l'un"
            | "l'une"
            | "l'autre"
            | "n'est"
            | "n'est-ce"
            | "n'importe"
            | "n'empeche"
            | "qu'est-ce"
    )
}

/// Full word for an elided prefix, apostrophe included, lowercase
pub fn elision_expansion(prefix: &str) -> Option<&'static str> {
    let expansion = match prefix {
        "d'" => "de",
        "j'" => "je",
        "jusqu'" => "jusque",
        // le or la
        "l'" => "l'",
        "lorsqu'" => "lorsque",
        "m'" => "me",
        "n'" => "ne",
        "puisqu'" => "puisque",
        "qu'" => "que",
        "quoiqu'" => "quoique",
        "s'" => "se",
        "t'" => "te",
        _ => return None,
    };
    Some(expansion)
}

/// Postposed clitic, hyphen included.
///
/// `Some(None)` for a known suffix that is dropped without a token of its
/// own (`-ci`, `-là`, euphonic `-t`).
pub fn postposed_clitic(suffix: &str) -> Option<Option<&'static str>> {
    let expansion = match suffix {
        "-ce" => Some("ce"),
        "-ci" => None,
        "-elle" => Some("elle"),
        "-elles" => Some("elles"),
        "-en" => Some("en"),
        "-eux" => Some("eux"),
        "-il" => Some("il"),
        "-ils" => Some("ils"),
        "-je" => Some("je"),
        "-la" => Some("la"),
        "-là" => None,
        "-le" => Some("le"),
        "-les" => Some("les"),
        "-leur" => Some("leur"),
        "-lui" => Some("lui"),
        "-me" => Some("me"),
        "-moi" => Some("moi"),
        "-nous" => Some("nous"),
        "-on" => Some("on"),
        "-t" => None,
        "-te" => Some("te"),
        "-toi" => Some("toi"),
        "-tu" => Some("tu"),
        "-vous" => Some("vous"),
        "-y" => Some("y"),
        _ => return None,
    };
    Some(expansion)
}

/// Apostrophe and hyphen variants to their ASCII form
#[inline]
pub fn normalize_mark(c: char) -> char {
    match c {
        '’' | '\u{2BC}' => '\'',
        '\u{2010}' | '\u{2011}' | '\u{AD}' => '-',
        c => c,
    }
}

/// Base letter of a lowercase French accented letter
#[inline]
pub fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'â' | 'ä' => 'a',
        'ç' => 'c',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'î' | 'ï' => 'i',
        'ô' | 'ö' => 'o',
        'ù' | 'û' | 'ü' => 'u',
        'ÿ' => 'y',
        c => c,
    }
}

/// Push `c` folded for exception matching: marks, case, diacritics
pub fn fold_char(c: char, out: &mut String) {
    out.extend(normalize_mark(c).to_lowercase().map(fold_diacritic));
}

/// Terms the splitter emits for one word, in order.
///
/// Runs [`CliticSplitter`] with its default settings, so a dictionary
/// expression is cut exactly like running text.
pub fn split_word(word: &str) -> Vec<String> {
    let source = Token::new(word, 0, word.chars().count(), Tag::Word);
    CliticSplitter::new(VecStream::new(vec![source]))
        .tokens()
        .map(|t| t.term)
        .collect()
}

fn normalize_marks(term: &mut String) {
    if term.chars().any(|c| normalize_mark(c) != c) {
        let norm: String = term.chars().map(normalize_mark).collect();
        *term = norm;
    }
}

/// Splitter settings
#[derive(Debug, Clone)]
pub struct SplitterConfig {
    pub queue_capacity: usize,
    /// Ceiling for [`OverflowPolicy::Grow`]
    pub max_capacity: usize,
    pub policy: OverflowPolicy,
    /// Split iterations allowed on one token
    pub max_steps: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            queue_capacity: QUEUE_CAPACITY,
            max_capacity: QUEUE_CAPACITY,
            policy: OverflowPolicy::Throw,
            max_steps: MAX_STEPS,
        }
    }
}

impl SplitterConfig {
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self.max_capacity = self.max_capacity.max(capacity);
        self
    }

    pub fn with_max_capacity(mut self, max: usize) -> Self {
        self.max_capacity = max;
        self
    }

    pub fn with_policy(mut self, policy: OverflowPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_steps(mut self, steps: usize) -> Self {
        self.max_steps = steps;
        self
    }
}

/// Splitter stage over an upstream token stream
pub struct CliticSplitter<S> {
    input: S,
    queue: TokenQueue,
    max_steps: usize,
    original: Token,
    scratch: Token,
    norm: String,
}

impl<S: TokenStream> CliticSplitter<S> {
    pub fn new(input: S) -> Self {
        Self::with_config(input, &SplitterConfig::default())
    }

    pub fn with_config(input: S, config: &SplitterConfig) -> Self {
        Self {
            input,
            queue: TokenQueue::with_max_capacity(
                config.queue_capacity,
                config.policy,
                config.max_capacity,
            ),
            max_steps: config.max_steps,
            original: Token::default(),
            scratch: Token::default(),
            norm: String::new(),
        }
    }

    pub fn into_inner(self) -> S {
        self.input
    }

    fn keep_as_is(&mut self, term: &str) -> bool {
        self.norm.clear();
        for c in term.chars() {
            fold_char(c, &mut self.norm);
        }
        is_lexicalized(&self.norm)
    }

    /// Queue a fragment of `token` ahead of anything already buffered
    fn queue_fragment(
        &mut self,
        token: &Token,
        term: &str,
        start: usize,
        added: &mut usize,
    ) -> Result<(), QueueError> {
        self.scratch.clone_from(token);
        self.scratch.term.clear();
        self.scratch.term.push_str(term);
        self.scratch.start = start;
        self.scratch.pos_inc = 1;
        self.scratch.pos_len = 1;
        self.queue.push_front(&self.scratch)?;
        *added += 1;
        Ok(())
    }

    /// Split `token` in place; `Ok(false)` when the step guard is exceeded
    fn split(&mut self, token: &mut Token, added: &mut usize) -> Result<bool, QueueError> {
        for _ in 0..self.max_steps {
            if token.term.chars().nth(1).is_none() {
                return Ok(true);
            }
            normalize_marks(&mut token.term);
            let len = token.term.len();
            let apos = token.term.find('\'');
            let hyphen = token.term.rfind('-');
            match (apos, hyphen) {
                (None, None) => return Ok(true),
                // maths A', D'
                (Some(a), _) if a == len - 1 => return Ok(true),
                (_, Some(h)) if h == 0 || h == len - 1 => return Ok(true),
                _ => {}
            }

            if let Some(a) = apos.filter(|a| *a > 0) {
                let prefix = token.term[..=a].to_lowercase();
                if let Some(expansion) = elision_expansion(&prefix) {
                    let cut = (token.start + token.term[..=a].chars().count()).min(token.end);
                    let rest = token.term[a + 1..].to_string();
                    self.queue_fragment(token, &rest, cut, added)?;
                    token.term.clear();
                    token.term.push_str(expansion);
                    token.end = cut;
                    return Ok(true);
                }
            }

            if let Some(h) = hyphen.filter(|h| *h > 0) {
                if let Some(expansion) = postposed_clitic(&token.term[h..]) {
                    let cut = (token.start + token.term[..h].chars().count()).min(token.end);
                    match expansion {
                        Some(word) => {
                            self.queue_fragment(token, word, cut, added)?;
                            token.end = cut;
                        }
                        None => {
                            // the dropped suffix goes to the fragment after it
                            if *added > 0 {
                                if let Some(next) = self.queue.peek_front_mut() {
                                    next.start = cut;
                                }
                                token.end = cut;
                            }
                        }
                    }
                    token.term.truncate(h);
                    continue;
                }
            }
            return Ok(true);
        }
        Ok(false)
    }
}

impl<S: TokenStream> TokenStream for CliticSplitter<S> {
    fn increment(&mut self, token: &mut Token) -> bool {
        if self.queue.pop_front(token).is_err() && !self.input.increment(token) {
            return false;
        }
        if token.tag == Tag::Markup || token.tag.is_punct() || token.keyword {
            return true;
        }
        if self.keep_as_is(&token.term) {
            return true;
        }
        self.original.clone_from(token);
        let mut added = 0;
        let failure = match self.split(token, &mut added) {
            Ok(true) => return true,
            Ok(false) => format!("more than {} split steps", self.max_steps),
            Err(e) => e.to_string(),
        };
        for _ in 0..added {
            let _ = self.queue.pop_front(&mut self.scratch);
        }
        token.clone_from(&self.original);
        tracing::debug!(term = %token.term, %failure, "clitic split rolled back");
        true
    }

    fn reset(&mut self) {
        self.queue.clear();
        self.input.reset();
    }
}
