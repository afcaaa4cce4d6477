//! Lexika: lexical analysis of French running text
//!
//! A pipeline of token streams, each pulling from the one before:
//! a markup-aware tokenizer, a clitic splitter, a dictionary lemmatizer
//! and a locution resolver. Core implementation in Rust with Python bindings.

pub mod analyzer; // Pipeline assembly and document reading
pub mod clitic; // Elided and postposed clitic splitting
pub mod forms; // Form interning
pub mod lemmatizer;
pub mod lexicon; // Dictionaries, lemma table and locution trie
pub mod locution; // Multi-word expression merging
pub mod queue; // Bounded token queue
pub mod tag; // Category codes
pub mod token; // Token record and pull protocol
pub mod tokenizer;

// Python bindings
#[cfg(feature = "pyo3")]
pub mod python;

// Re-exports for convenience
pub use analyzer::{AnalyzeError, Analyzer, AnalyzerConfig};
pub use clitic::{CliticSplitter, SplitterConfig};
pub use forms::{FormId, FormTable};
pub use lemmatizer::Lemmatizer;
pub use lexicon::{
    DuplicatePolicy, LemmaLexicon, Lexicon, LexiconError, LexiconStats, LoadOptions, LoadReport,
    LocutionEntry, LocutionTrie,
};
pub use locution::LocutionResolver;
pub use queue::{OverflowPolicy, QueueError, TokenQueue};
pub use tag::Tag;
pub use token::{Token, TokenStream, Tokens, VecStream};
pub use tokenizer::{Tokenizer, TokenizerConfig};
