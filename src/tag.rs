//! Token categories
//!
//! A compact tag set derived from Universal Dependencies, extended with the
//! coarse categories produced by the tokenizer (markup, digits, punctuation
//! runs) and with finer French sub-categories. Each tag has a one-byte code;
//! the high nibble groups tags in families (all verbs are `0x1_`, all proper
//! names are `0x4_`...), so that a filter can ask "is this some kind of verb"
//! without listing every sub-category.
//!
//! Name and code tables are plain `match` expressions, checked at compile time.

use std::fmt;

/// Category code carried by every token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum Tag {
    // 0x, tokenizer categories and flags
    /// Word-like token, no information yet
    #[default]
    Word = 0x00,
    /// Known as unknown from dictionaries
    Unknown = 0x01,
    /// Markup tag
    Markup = 0x03,
    /// Locution without a more specific category
    Loc = 0x06,
    /// Number written with digits
    Digit = 0x07,
    Punct = 0x08,
    /// Section break inferred from markup
    PunctSection = 0x09,
    /// Paragraph break inferred from markup
    PunctPara = 0x0A,
    /// `.` `?` `!` `…` runs
    PunctSent = 0x0B,
    /// `,` `;` `:` parentheses, dashes, quotes
    PunctClause = 0x0C,

    // 1x, verbs
    Verb = 0x10,
    Aux = 0x11,
    VerbInf = 0x12,
    VerbPartPast = 0x13,
    VerbPartPres = 0x14,

    // 2x, 3x
    Noun = 0x20,
    Adj = 0x30,

    // 4x, proper names
    Propn = 0x40,
    PropnPrs = 0x41,
    PropnGivMasc = 0x42,
    PropnGivFem = 0x43,
    PropnGeo = 0x44,
    PropnOrg = 0x45,
    PropnEvent = 0x47,
    PropnAuthor = 0x48,
    PropnFict = 0x49,
    PropnTitle = 0x4A,
    PropnPeople = 0x4E,
    PropnGod = 0x4F,

    // 5x, adverbs
    Adv = 0x50,
    AdvInt = 0x51,
    AdvNeg = 0x52,
    Part = 0x53,
    AdvSit = 0x58,
    AdvAsp = 0x59,
    AdvDeg = 0x5A,

    // 6x, determiners
    Det = 0x60,
    DetArt = 0x61,
    DetDem = 0x62,
    DetInd = 0x63,
    DetInt = 0x64,
    DetNeg = 0x65,
    DetPrs = 0x66,
    /// Prepositional determiner, fr: du, aux
    AdpDet = 0x67,

    // 7x, pronouns
    Pron = 0x70,
    PronDem = 0x71,
    PronInd = 0x72,
    PronInt = 0x73,
    PronNeg = 0x74,
    PronPrs = 0x75,
    PronRel = 0x76,

    // 8x, connectors
    Adp = 0x80,
    Cconj = 0x81,
    Sconj = 0x82,
    /// fr: duquel, auquel
    AdpPron = 0x89,

    // Ax, numerals
    Num = 0xA0,
    NumOrd = 0xA1,
    Ref = 0xA2,
    Math = 0xA3,
    Unit = 0xA4,
    Sym = 0xA8,

    // Fx, misc
    X = 0xF0,
    Intj = 0xF1,
    Abbr = 0xF8,
}

impl Tag {
    /// One-byte code of the tag
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Family code (high nibble) of the tag
    #[inline]
    pub fn family(self) -> u8 {
        self.code() & 0xF0
    }

    /// Both tags belong to the same family.
    ///
    /// The `0x0_` family mixes unrelated tokenizer flags, so inside it only
    /// punctuation tags are considered related.
    #[inline]
    pub fn same_family(self, other: Tag) -> bool {
        if self.family() == 0 || other.family() == 0 {
            return self == other || (self.is_punct() && other.is_punct());
        }
        self.family() == other.family()
    }

    pub fn is_punct(self) -> bool {
        matches!(
            self,
            Tag::Punct | Tag::PunctSection | Tag::PunctPara | Tag::PunctSent | Tag::PunctClause
        )
    }

    /// Punctuation closing a sentence (or a larger unit)
    pub fn is_sentence_break(self) -> bool {
        matches!(self, Tag::PunctSent | Tag::PunctPara | Tag::PunctSection)
    }

    pub fn is_verb(self) -> bool {
        self.family() == 0x10
    }

    pub fn is_name(self) -> bool {
        self.family() == 0x40
    }

    /// A real part of speech, usable as a lexicon key
    pub fn is_pos(self) -> bool {
        self.family() != 0
    }

    /// Short name, stable across versions
    pub fn name(self) -> &'static str {
        match self {
            Tag::Word => "WORD",
            Tag::Unknown => "UNKNOWN",
            Tag::Markup => "XML",
            Tag::Loc => "LOC",
            Tag::Digit => "DIGIT",
            Tag::Punct => "PUNCT",
            Tag::PunctSection => "PUNCTsection",
            Tag::PunctPara => "PUNCTpara",
            Tag::PunctSent => "PUNCTsent",
            Tag::PunctClause => "PUNCTclause",
            Tag::Verb => "VERB",
            Tag::Aux => "AUX",
            Tag::VerbInf => "VERBinf",
            Tag::VerbPartPast => "VERBpartpast",
            Tag::VerbPartPres => "VERBpartpres",
            Tag::Noun => "NOUN",
            Tag::Adj => "ADJ",
            Tag::Propn => "PROPN",
            Tag::PropnPrs => "PROPNprs",
            Tag::PropnGivMasc => "PROPNgivmasc",
            Tag::PropnGivFem => "PROPNgivfem",
            Tag::PropnGeo => "PROPNgeo",
            Tag::PropnOrg => "PROPNorg",
            Tag::PropnEvent => "PROPNevent",
            Tag::PropnAuthor => "PROPNauthor",
            Tag::PropnFict => "PROPNfict",
            Tag::PropnTitle => "PROPNtitle",
            Tag::PropnPeople => "PROPNpeople",
            Tag::PropnGod => "PROPNgod",
            Tag::Adv => "ADV",
            Tag::AdvInt => "ADVint",
            Tag::AdvNeg => "ADVneg",
            Tag::Part => "PART",
            Tag::AdvSit => "ADVsit",
            Tag::AdvAsp => "ADVasp",
            Tag::AdvDeg => "ADVdeg",
            Tag::Det => "DET",
            Tag::DetArt => "DETart",
            Tag::DetDem => "DETdem",
            Tag::DetInd => "DETind",
            Tag::DetInt => "DETint",
            Tag::DetNeg => "DETneg",
            Tag::DetPrs => "DETprs",
            Tag::AdpDet => "ADP_DET",
            Tag::Pron => "PRON",
            Tag::PronDem => "PRONdem",
            Tag::PronInd => "PRONind",
            Tag::PronInt => "PRONint",
            Tag::PronNeg => "PRONneg",
            Tag::PronPrs => "PRONprs",
            Tag::PronRel => "PRONrel",
            Tag::Adp => "ADP",
            Tag::Cconj => "CCONJ",
            Tag::Sconj => "SCONJ",
            Tag::AdpPron => "ADP_PRON",
            Tag::Num => "NUM",
            Tag::NumOrd => "NUMord",
            Tag::Ref => "REF",
            Tag::Math => "MATH",
            Tag::Unit => "UNIT",
            Tag::Sym => "SYM",
            Tag::X => "X",
            Tag::Intj => "INTJ",
            Tag::Abbr => "ABBR",
        }
    }

    /// Tag for a one-byte code
    pub fn from_code(code: u8) -> Option<Tag> {
        let tag = match code {
            0x00 => Tag::Word,
            0x01 => Tag::Unknown,
            0x03 => Tag::Markup,
            0x06 => Tag::Loc,
            0x07 => Tag::Digit,
            0x08 => Tag::Punct,
            0x09 => Tag::PunctSection,
            0x0A => Tag::PunctPara,
            0x0B => Tag::PunctSent,
            0x0C => Tag::PunctClause,
            0x10 => Tag::Verb,
            0x11 => Tag::Aux,
            0x12 => Tag::VerbInf,
            0x13 => Tag::VerbPartPast,
            0x14 => Tag::VerbPartPres,
            0x20 => Tag::Noun,
            0x30 => Tag::Adj,
            0x40 => Tag::Propn,
            0x41 => Tag::PropnPrs,
            0x42 => Tag::PropnGivMasc,
            0x43 => Tag::PropnGivFem,
            0x44 => Tag::PropnGeo,
            0x45 => Tag::PropnOrg,
            0x47 => Tag::PropnEvent,
            0x48 => Tag::PropnAuthor,
            0x49 => Tag::PropnFict,
            0x4A => Tag::PropnTitle,
            0x4E => Tag::PropnPeople,
            0x4F => Tag::PropnGod,
            0x50 => Tag::Adv,
            0x51 => Tag::AdvInt,
            0x52 => Tag::AdvNeg,
            0x53 => Tag::Part,
            0x58 => Tag::AdvSit,
            0x59 => Tag::AdvAsp,
            0x5A => Tag::AdvDeg,
            0x60 => Tag::Det,
            0x61 => Tag::DetArt,
            0x62 => Tag::DetDem,
            0x63 => Tag::DetInd,
            0x64 => Tag::DetInt,
            0x65 => Tag::DetNeg,
            0x66 => Tag::DetPrs,
            0x67 => Tag::AdpDet,
            0x70 => Tag::Pron,
            0x71 => Tag::PronDem,
            0x72 => Tag::PronInd,
            0x73 => Tag::PronInt,
            0x74 => Tag::PronNeg,
            0x75 => Tag::PronPrs,
            0x76 => Tag::PronRel,
            0x80 => Tag::Adp,
            0x81 => Tag::Cconj,
            0x82 => Tag::Sconj,
            0x89 => Tag::AdpPron,
            0xA0 => Tag::Num,
            0xA1 => Tag::NumOrd,
            0xA2 => Tag::Ref,
            0xA3 => Tag::Math,
            0xA4 => Tag::Unit,
            0xA8 => Tag::Sym,
            0xF0 => Tag::X,
            0xF1 => Tag::Intj,
            0xF8 => Tag::Abbr,
            _ => return None,
        };
        Some(tag)
    }

    /// Canonical tag for a label found in a dictionary file.
    ///
    /// Accepts the tag names above, plain UD labels, and the labels of the
    /// legacy French resources (`SUB`, `VERBaux`, `NAMEpers`, `PROpers`...).
    /// Returns `None` for an unknown label.
    pub fn from_label(label: &str) -> Option<Tag> {
        let tag = match label.trim() {
            "WORD" | "TOKEN" => Tag::Word,
            "UNKNOWN" => Tag::Unknown,
            "XML" => Tag::Markup,
            "LOC" => Tag::Loc,
            "DIGIT" => Tag::Digit,
            "PUNCT" | "PUN" => Tag::Punct,
            "PUNCTsection" | "PUNsection" => Tag::PunctSection,
            "PUNCTpara" | "PUNpara" => Tag::PunctPara,
            "PUNCTsent" | "PUNsent" => Tag::PunctSent,
            "PUNCTclause" | "PUNclause" => Tag::PunctClause,

            "VERB" | "VERBexpr" | "VERBmod" | "VERBaux2" => Tag::Verb,
            "AUX" | "VERBaux" => Tag::Aux,
            "VERBinf" => Tag::VerbInf,
            "VERBpartpast" | "VERBppas" | "VERBpp" => Tag::VerbPartPast,
            "VERBpartpres" | "VERBger" => Tag::VerbPartPres,

            "NOUN" | "SUB" | "SUBpers" | "SUBplace" => Tag::Noun,
            "ADJ" => Tag::Adj,

            "PROPN" | "NAME" => Tag::Propn,
            "PROPNprs" | "NAMEpers" => Tag::PropnPrs,
            "PROPNgivmasc" | "NAMEpersm" => Tag::PropnGivMasc,
            "PROPNgivfem" | "NAMEpersf" => Tag::PropnGivFem,
            "PROPNgeo" | "NAMEplace" => Tag::PropnGeo,
            "PROPNorg" | "NAMEorg" => Tag::PropnOrg,
            "PROPNevent" | "NAMEevent" => Tag::PropnEvent,
            "PROPNauthor" | "NAMEauthor" => Tag::PropnAuthor,
            "PROPNfict" | "NAMEfict" => Tag::PropnFict,
            "PROPNtitle" | "NAMEtitle" => Tag::PropnTitle,
            "PROPNpeople" | "NAMEpeople" => Tag::PropnPeople,
            "PROPNgod" | "NAMEgod" => Tag::PropnGod,

            "ADV" | "ADVmod" | "ADVconj" => Tag::Adv,
            "ADVint" | "ADVinter" | "ADVquest" => Tag::AdvInt,
            "ADVneg" => Tag::AdvNeg,
            "PART" => Tag::Part,
            "ADVsit" | "ADVscen" => Tag::AdvSit,
            "ADVasp" => Tag::AdvAsp,
            "ADVdeg" => Tag::AdvDeg,

            "DET" => Tag::Det,
            "DETart" => Tag::DetArt,
            "DETdem" => Tag::DetDem,
            "DETind" | "DETindef" => Tag::DetInd,
            "DETint" | "DETinter" => Tag::DetInt,
            "DETneg" => Tag::DetNeg,
            "DETprs" | "DETposs" => Tag::DetPrs,
            "ADP_DET" | "ADP+DET" | "DETprep" => Tag::AdpDet,
            "DETnum" => Tag::Num,

            "PRON" | "PRO" | "PROposs" => Tag::Pron,
            "PRONdem" | "PROdem" => Tag::PronDem,
            "PRONind" | "PROindef" => Tag::PronInd,
            "PRONint" => Tag::PronInt,
            "PRONneg" => Tag::PronNeg,
            "PRONprs" | "PROpers" => Tag::PronPrs,
            "PRONrel" => Tag::PronRel,

            "ADP" | "PREP" => Tag::Adp,
            "CCONJ" | "CONJcoord" => Tag::Cconj,
            "SCONJ" | "CONJsub" => Tag::Sconj,
            "ADP_PRON" | "ADP+PRON" | "PREPpro" => Tag::AdpPron,
            "CONN" => Tag::Cconj,

            "NUM" => Tag::Num,
            "NUMord" | "NUMno" => Tag::NumOrd,
            "REF" => Tag::Ref,
            "MATH" => Tag::Math,
            "UNIT" | "NUMunit" => Tag::Unit,
            "SYM" => Tag::Sym,

            "X" | "MISC" => Tag::X,
            "INTJ" | "EXCL" => Tag::Intj,
            "ABBR" => Tag::Abbr,
            _ => return None,
        };
        Some(tag)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
