//! Word tokenizer for the hashing embedder
//!
//! Splits on anything that is not a letter or digit, lowercases, and drops
//! function words that would otherwise dominate every vector.

/// Italian and English function words ignored during embedding
const STOPWORDS: &[&str] = &[
    // Italian
    "a", "ad", "agli", "ai", "al", "alla", "alle", "allo", "anche", "che", "chi", "ci", "col",
    "come", "con", "da", "dai", "dal", "dalla", "dalle", "dallo", "degli", "dei", "del", "della",
    "delle", "dello", "di", "e", "è", "ed", "gli", "ha", "hanno", "i", "il", "in", "io", "la", "le",
    "lo", "ma", "mi", "ne", "negli", "nei", "nel", "nella", "nelle", "noi", "non", "o", "per",
    "perché", "più", "se", "si", "sono", "su", "sua", "sue", "sui", "sul", "sulla", "suo", "suoi",
    "ti", "tra", "tu", "un", "una", "uno", "vi", "voi",
    // English
    "an", "and", "are", "as", "at", "be", "by", "for", "from", "he", "his", "is", "it", "of", "on",
    "or", "that", "the", "to", "was", "we", "with", "you",
];

/// Minimum word length (in chars) that contributes trigram features
const TRIGRAM_MIN_CHARS: usize = 4;

#[derive(Debug, Default, Clone)]
pub struct Tokenizer;

impl Tokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Lowercased content words of `text`, in order of appearance.
    pub fn words(&self, text: &str) -> Vec<String> {
        let mut words = Vec::new();
        let mut current = String::new();

        for c in text.chars() {
            if c.is_alphanumeric() {
                current.extend(c.to_lowercase());
            } else if !current.is_empty() {
                Self::push_word(&mut words, std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            Self::push_word(&mut words, current);
        }

        words
    }

    /// Character trigrams of a word padded with boundary markers.
    ///
    /// Short words yield nothing: their trigrams are mostly boundary noise.
    pub fn trigrams(&self, word: &str) -> Vec<String> {
        let chars: Vec<char> = word.chars().collect();
        if chars.len() < TRIGRAM_MIN_CHARS {
            return Vec::new();
        }

        let mut padded = Vec::with_capacity(chars.len() + 2);
        padded.push('^');
        padded.extend(chars);
        padded.push('$');

        padded.windows(3).map(|w| w.iter().collect()).collect()
    }

    fn push_word(words: &mut Vec<String>, word: String) {
        if !STOPWORDS.contains(&word.as_str()) {
            words.push(word);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_split_and_lowercase() {
        let tok = Tokenizer::new();
        assert_eq!(
            tok.words("Il Signore è il mio pastore: non manco di nulla."),
            vec!["signore", "mio", "pastore", "manco", "nulla"]
        );
    }

    #[test]
    fn test_words_handle_apostrophes_and_accents() {
        let tok = Tokenizer::new();
        assert_eq!(tok.words("Dall'aurora, Gesù!"), vec!["dall", "aurora", "gesù"]);
    }

    #[test]
    fn test_empty_text() {
        let tok = Tokenizer::new();
        assert!(tok.words("").is_empty());
        assert!(tok.words(" ,;: ").is_empty());
    }

    #[test]
    fn test_trigrams() {
        let tok = Tokenizer::new();
        assert_eq!(tok.trigrams("pace"), vec!["^pa", "pac", "ace", "ce$"]);
        assert!(tok.trigrams("dio").is_empty());
    }
}
