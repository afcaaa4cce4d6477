//! Whole pipeline over a document
//!
//! tokenizer -> clitic splitter -> lemmatizer -> locution resolver, each
//! stage optional after the tokenizer.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use thiserror::Error;

use crate::clitic::{CliticSplitter, SplitterConfig};
use crate::lemmatizer::Lemmatizer;
use crate::lexicon::Lexicon;
use crate::locution::LocutionResolver;
use crate::token::{Token, TokenStream, Tokens};
use crate::tokenizer::{Tokenizer, TokenizerConfig};

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("Cannot read document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub split_clitics: bool,
    pub lemmatize: bool,
    /// Needs `lemmatize`: verbs, names and numbers are keyed by category
    pub locutions: bool,
    pub infer_names: bool,
    pub tokenizer: TokenizerConfig,
    pub splitter: SplitterConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            split_clitics: true,
            lemmatize: true,
            locutions: true,
            infer_names: false,
            tokenizer: TokenizerConfig::default(),
            splitter: SplitterConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    pub fn with_split_clitics(mut self, on: bool) -> Self {
        self.split_clitics = on;
        self
    }

    pub fn with_lemmatize(mut self, on: bool) -> Self {
        self.lemmatize = on;
        self
    }

    pub fn with_locutions(mut self, on: bool) -> Self {
        self.locutions = on;
        self
    }

    pub fn with_infer_names(mut self, on: bool) -> Self {
        self.infer_names = on;
        self
    }

    pub fn with_tokenizer(mut self, config: TokenizerConfig) -> Self {
        self.tokenizer = config;
        self
    }

    pub fn with_splitter(mut self, config: SplitterConfig) -> Self {
        self.splitter = config;
        self
    }
}

/// Builds pipelines over one shared lexicon
#[derive(Debug, Clone)]
pub struct Analyzer<'l> {
    lexicon: &'l Lexicon,
    config: AnalyzerConfig,
}

impl<'l> Analyzer<'l> {
    pub fn new(lexicon: &'l Lexicon) -> Self {
        Self::with_config(lexicon, AnalyzerConfig::default())
    }

    pub fn with_config(lexicon: &'l Lexicon, config: AnalyzerConfig) -> Self {
        Self { lexicon, config }
    }

    #[inline]
    pub fn lexicon(&self) -> &'l Lexicon {
        self.lexicon
    }

    #[inline]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Token stream over `text`
    pub fn stream(&self, text: &str) -> Box<dyn TokenStream + 'l> {
        let lex = self.lexicon;
        let config = &self.config;
        let mut stream: Box<dyn TokenStream + 'l> = Box::new(
            Tokenizer::with_config(text, &config.tokenizer)
                .with_abbreviations(lex.abbreviations()),
        );
        if config.split_clitics {
            stream = Box::new(CliticSplitter::with_config(stream, &config.splitter));
        }
        if config.lemmatize {
            stream = Box::new(Lemmatizer::new(stream, lex).with_infer_names(config.infer_names));
            if config.locutions && !lex.locutions().is_empty() {
                stream = Box::new(LocutionResolver::new(stream, lex.locutions()));
            }
        }
        stream
    }

    /// Iterator over the tokens of `text`
    pub fn tokens(&self, text: &str) -> Tokens<Box<dyn TokenStream + 'l>> {
        self.stream(text).tokens()
    }

    pub fn analyze(&self, text: &str) -> Vec<Token> {
        self.tokens(text).collect()
    }

    /// Analyze a text file, gunzipped when named `.gz`
    pub fn analyze_file(&self, path: impl AsRef<Path>) -> Result<Vec<Token>, AnalyzeError> {
        let text = read_document(path.as_ref())?;
        Ok(self.analyze(&text))
    }
}

/// Whole content of a UTF-8 document, invalid sequences replaced
pub fn read_document(path: &Path) -> Result<String, AnalyzeError> {
    let io_err = |source| AnalyzeError::Io {
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
        BufReader::new(file)
            .read_to_end(&mut bytes)
            .map_err(io_err)?;
    }
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), "document is not valid UTF-8");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{DuplicatePolicy, LoadOptions, LocutionEntry};
    use crate::tag::Tag;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn lexicon() -> Lexicon {
        let mut lex = Lexicon::new();
        for (form, tag, lemma) in [
            ("vienne", Tag::Verb, "venir"),
            ("il", Tag::Pron, "il"),
            ("que", Tag::Sconj, "que"),
            ("heure", Tag::Noun, "heure"),
            ("est", Tag::Verb, "être"),
        ] {
            lex.put_entry(form, tag, Some(lemma), DuplicatePolicy::Ignore)
                .unwrap();
        }
        lex.add_abbreviation("etc.");
        lex.add_locution(
            "parce que",
            LocutionEntry {
                tag: Tag::Sconj,
                lemma: None,
                norm: None,
            },
        );
        lex
    }

    fn terms(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.term.as_str()).collect()
    }

    const TEXT: &str = "Qu'il vienne, parce que c'est l'heure etc.";

    #[test]
    fn test_full_pipeline() {
        let lex = lexicon();
        let tokens = Analyzer::new(&lex).analyze(TEXT);
        assert_eq!(
            terms(&tokens),
            vec!["que", "il", "vienne", ",", "parce que", "c'est", "l'", "heure", "etc."]
        );
        assert_eq!(tokens[2].lemma, "venir");
        assert_eq!(tokens[3].tag, Tag::PunctClause);
        assert_eq!(tokens[4].tag, Tag::Sconj);
        assert_eq!((tokens[4].start, tokens[4].end), (14, 23));
        assert_eq!(tokens[7].lemma, "heure");
    }

    #[test]
    fn test_locution_with_postposed_clitic() {
        let mut lex = lexicon();
        lex.load_str("G,T,L\nest-ce que,ADVint,est-ce que\n", &LoadOptions::default())
            .unwrap();
        let tokens = Analyzer::new(&lex).analyze("mais est-ce que tu viens");
        assert_eq!(terms(&tokens), vec!["mais", "est ce que", "tu", "viens"]);
        let loc = &tokens[1];
        assert_eq!(loc.tag, Tag::AdvInt);
        assert_eq!(loc.lemma, "est-ce que");
        assert_eq!((loc.start, loc.end), (5, 15));
        assert_eq!(loc.pos_len, 3);
    }

    #[test]
    fn test_stage_toggles() {
        let lex = lexicon();
        let bare = AnalyzerConfig::default()
            .with_split_clitics(false)
            .with_lemmatize(false);
        let tokens = Analyzer::with_config(&lex, bare).analyze(TEXT);
        assert_eq!(
            terms(&tokens),
            vec!["Qu'il", "vienne", ",", "parce", "que", "c'est", "l'heure", "etc."]
        );
        assert!(tokens.iter().all(|t| t.lemma.is_empty()));

        let no_locutions = AnalyzerConfig::default().with_locutions(false);
        let tokens = Analyzer::with_config(&lex, no_locutions).analyze(TEXT);
        assert!(terms(&tokens).contains(&"parce"));
    }

    #[test]
    fn test_token_spans_follow_text_order() {
        let lex = lexicon();
        let tokens = Analyzer::new(&lex).analyze(TEXT);
        let chars = TEXT.chars().count();
        for pair in tokens.windows(2) {
            assert!(pair[0].start <= pair[1].start);
        }
        assert!(tokens.iter().all(|t| t.start < t.end && t.end <= chars));
    }

    #[test]
    fn test_shared_lexicon_across_threads() {
        let lex = lexicon();
        let texts = ["parce que tu vienne", "Qu'il vienne"];
        let results: Vec<Vec<Token>> = std::thread::scope(|s| {
            let handles: Vec<_> = texts
                .iter()
                .map(|text| {
                    let lex = &lex;
                    s.spawn(move || Analyzer::new(lex).analyze(text))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(terms(&results[0])[0], "parce que");
        assert_eq!(terms(&results[1]), vec!["que", "il", "vienne"]);
    }

    #[test]
    fn test_empty_text() {
        let lex = lexicon();
        assert!(Analyzer::new(&lex).analyze("").is_empty());
        assert!(Analyzer::new(&lex).analyze(" \n\t ").is_empty());
    }

    #[test]
    fn test_analyze_plain_and_gzip_files() {
        let lex = lexicon();
        let dir = tempfile::tempdir().unwrap();

        let plain = dir.path().join("doc.txt");
        std::fs::write(&plain, "parce que").unwrap();
        let gz = dir.path().join("doc.txt.gz");
        let mut encoder = flate2::write::GzEncoder::new(
            File::create(&gz).unwrap(),
            flate2::Compression::default(),
        );
        encoder.write_all("parce que".as_bytes()).unwrap();
        encoder.finish().unwrap();

        let analyzer = Analyzer::new(&lex);
        for path in [&plain, &gz] {
            let tokens = analyzer.analyze_file(path).unwrap();
            assert_eq!(terms(&tokens), vec!["parce que"]);
        }

        let missing = analyzer.analyze_file(dir.path().join("none.txt"));
        assert!(matches!(missing, Err(AnalyzeError::Io { .. })));
    }
}
