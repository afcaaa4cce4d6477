use divan::{Bencher, black_box};
use lexika::{Analyzer, DuplicatePolicy, Lexicon, LocutionEntry, Tag, TokenStream, Tokenizer};

fn main() {
    divan::main();
}

const SENTENCE: &str = "Qu'il vienne demain, parce qu'à vrai dire l'homme n'a-t-il pas \
    mangé la pomme de terre ? Jean-Baptiste dit : &laquo;c'est l'heure&raquo;, etc. ";

fn text() -> String {
    format!("<p>{}</p>\n", SENTENCE).repeat(200)
}

fn lexicon() -> Lexicon {
    let mut lex = Lexicon::new();
    for (form, tag, lemma) in [
        ("vienne", Tag::Verb, "venir"),
        ("a", Tag::Aux, "avoir"),
        ("mangé", Tag::Verb, "manger"),
        ("homme", Tag::Noun, "homme"),
        ("pomme", Tag::Noun, "pomme"),
        ("terre", Tag::Noun, "terre"),
        ("heure", Tag::Noun, "heure"),
        ("dit", Tag::Verb, "dire"),
        ("il", Tag::Pron, "il"),
        ("la", Tag::Det, "le"),
    ] {
        let _ = lex.put_entry(form, tag, Some(lemma), DuplicatePolicy::Ignore);
    }
    let _ = lex.put_entry("Jean", Tag::PropnPrs, None, DuplicatePolicy::Ignore);
    lex.add_abbreviation("etc.");
    for expr in ["parce que", "à vrai dire", "pomme de terre", "c'est-à-dire"] {
        lex.add_locution(
            expr,
            LocutionEntry {
                tag: Tag::Loc,
                lemma: None,
                norm: None,
            },
        );
    }
    lex
}

/// Tokenizer alone
#[divan::bench]
fn tokenize(bencher: Bencher) {
    let text = text();
    bencher.bench_local(|| {
        for token in Tokenizer::new(black_box(&text)).tokens() {
            black_box(token);
        }
    });
}

/// Whole pipeline, reusing one token record
#[divan::bench]
fn analyze(bencher: Bencher) {
    let text = text();
    let lex = lexicon();
    let analyzer = Analyzer::new(&lex);
    bencher.bench_local(|| {
        let mut stream = analyzer.stream(black_box(&text));
        let mut token = lexika::Token::default();
        while stream.increment(&mut token) {
            black_box(&token);
        }
    });
}
