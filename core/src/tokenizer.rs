use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Maps a raw token to a vocabulary term, or `None` to discard it.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, token: &str) -> Option<String>;
}

lazy_static! {
    // Everything outside alef-madda .. farsi yeh.
    static ref NON_PERSIAN: Regex = Regex::new(r"[^\x{0622}-\x{06CC}]").expect("valid regex");
    static ref AUXILIARIES: HashSet<&'static str> = {
        let words: &[&str] = &[
            "خواهم","خواهی","خواهد","خواهیم","خواهید","خواهند",
            "بودم","بودی","بود","بودیم","بودید","بودند",
            "باشم","باشی","باشد","باشیم","باشید","باشند",
        ];
        words.iter().copied().collect()
    };
}

const ARABIC_YEH: char = '\u{064A}';
const FARSI_YEH: char = '\u{06CC}';
const PLURAL: &str = "ها";
const PLURAL_EZAFE: &str = "های";
const COMPARATIVE: &str = "تر";

fn is_auxiliary(term: &str) -> bool { AUXILIARIES.contains(term) }

/// Affix-stripping normalizer for Persian text.
///
/// NFKC, unify yeh, keep Persian letters only, drop auxiliary verb forms, then strip
/// the plural suffixes and (for words longer than four letters) the comparative suffix.
#[derive(Debug, Default, Clone, Copy)]
pub struct PersianNormalizer;

impl Normalizer for PersianNormalizer {
    fn normalize(&self, token: &str) -> Option<String> {
        let unified: String = token
            .nfkc()
            .map(|c| if c == ARABIC_YEH { FARSI_YEH } else { c })
            .collect();
        let letters = NON_PERSIAN.replace_all(&unified, "");
        if is_auxiliary(&letters) {
            return None;
        }

        let mut term: &str = &letters;
        term = term.strip_suffix(PLURAL).unwrap_or(term);
        term = term.strip_suffix(PLURAL_EZAFE).unwrap_or(term);
        if term.chars().count() > 4 {
            term = term.strip_suffix(COMPARATIVE).unwrap_or(term);
        }

        if term.is_empty() { None } else { Some(term.to_string()) }
    }
}

/// Pass-through for corpora whose tokens are already normalized terms.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceNormalizer;

impl Normalizer for WhitespaceNormalizer {
    fn normalize(&self, token: &str) -> Option<String> {
        let t = token.trim();
        if t.is_empty() { None } else { Some(t.to_string()) }
    }
}

/// Split text on whitespace and normalize each token, skipping discarded ones.
pub fn tokenize(text: &str, normalizer: &dyn Normalizer) -> Vec<String> {
    text.split_whitespace().filter_map(|tok| normalizer.normalize(tok)).collect()
}
