use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

use crate::record::SearchRecord;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)\p{L}+").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Tokenize text into index terms: NFKC normalization, lowercase, alphabetic
/// tokens only, length > 1, stopwords removed. Terms keep their surface form;
/// the index is never stemmed (see [`stem`]).
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    let mut tokens = Vec::new();
    for mat in RE.find_iter(&normalized) {
        let token = mat.as_str();
        if token.chars().count() < 2 || is_stopword(token) {
            continue;
        }
        tokens.push(token.to_string());
    }
    tokens
}

/// Term sequence of one search record: title tokens followed by snippet
/// tokens, in order. An absent field is silently skipped, so a record with
/// neither field degrades to an empty sequence.
pub fn record_terms(record: &SearchRecord) -> Vec<String> {
    let mut terms = Vec::new();
    for field in [record.title.as_deref(), record.snippet.as_deref()] {
        if let Some(text) = field {
            terms.extend(tokenize(text));
        }
    }
    terms
}

/// English stem of a term. Used only to normalize comparisons against terms
/// already in the query during selection.
pub fn stem(term: &str) -> String {
    STEMMER.stem(term).to_string()
}
