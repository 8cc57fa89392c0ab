//! A small rule-based tokenizer and part-of-speech tagger.
//!
//! Tags are an approximation of the Penn Treebank tag set built from
//! closed-class word lists and suffix rules. They are only as precise as
//! the complexity estimator needs: verbs, subordinators, wh-words and
//! sentence-final punctuation matter, everything else is roughly right.

use perusal_core::error::AppError;
use perusal_core::models::{TaggedDocument, Token};
use perusal_core::traits::Tagger;
use regex::Regex;

/// Abbreviations keep their period; numbers keep decimal points.
const TOKEN_PATTERN: &str = r"(?xi)
      \b(?:e\.g|i\.e|mr|mrs|ms|dr|prof|st|vs|etc|fig|eq|al|cf)\.
    | \p{N}+(?:[.,]\p{N}+)+
    | [\p{L}\p{N}]+(?:['’-][\p{L}\p{N}]+)*
    | [.!?]+
    | [^\s\p{L}\p{N}]
";

/// Tokenizer + tagger using word lists and suffix heuristics.
#[derive(Debug, Clone)]
pub struct RuleTagger {
    tokens: Regex,
}

impl RuleTagger {
    pub fn new() -> Result<Self, AppError> {
        let tokens = Regex::new(TOKEN_PATTERN)
            .map_err(|e| AppError::ConfigError(format!("Invalid token pattern: {e}")))?;
        Ok(Self { tokens })
    }

    /// Split text into raw token strings.
    pub fn tokenize<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.tokens.find_iter(text).map(|m| m.as_str()).collect()
    }
}

impl Tagger for RuleTagger {
    fn tag(&self, text: &str) -> Result<TaggedDocument, AppError> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut sentence_count = 0;
        let mut open_sentence = false;

        for raw in self.tokenize(text) {
            let previous = tokens.last().map(|t| t.tag.as_str());
            let tag = tag_token(raw, previous);

            if is_terminal(tag) {
                if open_sentence {
                    sentence_count += 1;
                }
                open_sentence = false;
            } else if !is_punctuation(tag) {
                open_sentence = true;
            }

            tokens.push(Token::new(raw, tag));
        }

        if open_sentence {
            sentence_count += 1;
        }

        Ok(TaggedDocument {
            tokens,
            sentence_count,
        })
    }
}

fn is_terminal(tag: &str) -> bool {
    tag == "."
}

fn is_punctuation(tag: &str) -> bool {
    matches!(tag, "." | "," | ":" | "(" | ")" | "SYM")
}

fn tag_token(raw: &str, previous: Option<&str>) -> &'static str {
    let first = raw.chars().next().unwrap_or(' ');

    if !first.is_alphanumeric() {
        return punctuation_tag(raw);
    }
    if first.is_numeric() {
        return "CD";
    }

    let lower = raw.to_lowercase();
    if let Some(tag) = closed_class_tag(&lower) {
        return tag;
    }

    match previous {
        Some("TO" | "MD") => return "VB",
        Some("PRP") if lower.ends_with('s') && !lower.ends_with("ss") => return "VBZ",
        Some("PRP") => return "VBP",
        _ => {}
    }

    let sentence_start = previous.is_none_or(is_terminal);
    suffix_tag(&lower, first.is_uppercase() && !sentence_start)
}

fn punctuation_tag(raw: &str) -> &'static str {
    if raw.starts_with(['.', '!', '?']) {
        return ".";
    }
    match raw {
        "," => ",",
        ";" | ":" | "-" | "–" | "—" => ":",
        "(" | "[" | "{" => "(",
        ")" | "]" | "}" => ")",
        _ => "SYM",
    }
}

fn closed_class_tag(word: &str) -> Option<&'static str> {
    let tag = match word {
        "the" | "a" | "an" | "this" | "these" | "those" | "every" | "each" | "some" | "any"
        | "no" | "all" | "another" | "both" | "either" | "neither" => "DT",

        "which" | "whichever" | "whatever" => "WDT",
        "who" | "whom" | "what" | "whoever" => "WP",
        "whose" => "WP$",
        "when" | "where" | "why" | "how" | "whenever" | "wherever" | "whereby" => "WRB",

        "of" | "in" | "on" | "at" | "by" | "for" | "with" | "from" | "into" | "onto" | "upon"
        | "about" | "above" | "below" | "under" | "over" | "after" | "before" | "since"
        | "until" | "because" | "although" | "though" | "while" | "whereas" | "if"
        | "unless" | "whether" | "that" | "than" | "as" | "like" | "through" | "during"
        | "without" | "within" | "between" | "among" | "against" | "toward" | "towards"
        | "across" | "along" | "around" | "beyond" | "despite" | "per" | "via" => "IN",

        "to" => "TO",
        "and" | "or" | "but" | "nor" | "yet" | "so" => "CC",
        "there" => "EX",

        "i" | "you" | "he" | "she" | "it" | "we" | "they" | "me" | "him" | "her" | "us"
        | "them" => "PRP",
        "my" | "your" | "his" | "its" | "our" | "their" => "PRP$",

        "can" | "could" | "may" | "might" | "must" | "shall" | "should" | "will" | "would" => {
            "MD"
        }

        "be" | "do" => "VB",
        "is" | "has" | "does" | "seems" | "says" => "VBZ",
        "are" | "am" | "have" => "VBP",
        "was" | "were" | "had" | "did" | "said" | "made" | "went" | "took" | "came" | "saw"
        | "knew" | "thought" | "found" | "gave" | "told" | "became" | "began" | "got" | "led"
        | "felt" | "left" | "kept" | "brought" | "wrote" | "ran" => "VBD",
        "been" | "done" | "gone" | "taken" | "seen" | "known" | "given" | "shown" | "written" => {
            "VBN"
        }
        "being" => "VBG",

        "not" | "n't" | "very" | "also" | "often" | "never" | "always" | "too" | "just"
        | "only" | "even" | "still" | "already" | "here" | "then" | "now" | "however" => "RB",

        _ => return None,
    };
    Some(tag)
}

fn suffix_tag(word: &str, proper: bool) -> &'static str {
    let len = word.chars().count();

    if proper {
        "NNP"
    } else if len > 4 && word.ends_with("ing") {
        "VBG"
    } else if len > 3 && word.ends_with("ed") {
        "VBD"
    } else if len > 3 && word.ends_with("ly") {
        "RB"
    } else if len > 4
        && ["ous", "ful", "able", "ible", "ive", "ical", "less", "ary"]
            .iter()
            .any(|s| word.ends_with(s))
    {
        "JJ"
    } else if len > 3 && word.ends_with('s') && !word.ends_with("ss") {
        "NNS"
    } else {
        "NN"
    }
}
