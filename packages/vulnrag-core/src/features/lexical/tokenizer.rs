//! Identifier tokenizer for TF-IDF
//!
//! # Tokenization Strategy
//!
//! 1. **IdentifierTokenizer**: runs of word characters (letters, digits, `_`)
//!    at least two characters long; `copy_from_user` stays one token
//! 2. **Lowercase Filter**: case-insensitive matching
//!
//! Single-character runs (`a`, `i`, `0`) carry no signal and are dropped.

use tantivy::tokenizer::{LowerCaser, TextAnalyzer, Token, TokenStream, Tokenizer};

const MIN_TOKEN_CHARS: usize = 2;

/// Splits text into word-character runs of at least two characters.
///
/// - `strcpy(dst, src)` → `["strcpy", "dst", "src"]`
/// - `p->buf[i]` → `["buf"]`
#[derive(Clone, Default)]
pub struct IdentifierTokenizer;

impl Tokenizer for IdentifierTokenizer {
    type TokenStream<'a> = IdentifierTokenStream;

    fn token_stream<'a>(&'a mut self, text: &'a str) -> Self::TokenStream<'a> {
        IdentifierTokenStream {
            tokens: split_words(text),
            current_index: 0,
        }
    }
}

pub struct IdentifierTokenStream {
    tokens: Vec<Token>,
    current_index: usize,
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn split_words(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    let emit = |from: usize, to: usize, tokens: &mut Vec<Token>| {
        let word = &text[from..to];
        if word.chars().count() >= MIN_TOKEN_CHARS {
            tokens.push(Token {
                offset_from: from,
                offset_to: to,
                position: tokens.len(),
                text: word.to_string(),
                position_length: 1,
            });
        }
    };

    for (i, ch) in text.char_indices() {
        match (is_word_char(ch), start) {
            (true, None) => start = Some(i),
            (false, Some(from)) => {
                emit(from, i, &mut tokens);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(from) = start {
        emit(from, text.len(), &mut tokens);
    }
    tokens
}

impl TokenStream for IdentifierTokenStream {
    fn advance(&mut self) -> bool {
        if self.current_index < self.tokens.len() {
            self.current_index += 1;
            true
        } else {
            false
        }
    }

    fn token(&self) -> &Token {
        &self.tokens[self.current_index - 1]
    }

    fn token_mut(&mut self) -> &mut Token {
        &mut self.tokens[self.current_index - 1]
    }
}

/// Build the TF-IDF analyzer.
///
/// Pipeline:
/// 1. IdentifierTokenizer - word-character runs
/// 2. LowerCaser - normalize case
pub fn build_identifier_analyzer() -> TextAnalyzer {
    TextAnalyzer::builder(IdentifierTokenizer)
        .filter(LowerCaser)
        .build()
}

/// Analyzed terms of `text`, in order, duplicates kept
pub fn tokenize(text: &str) -> Vec<String> {
    let mut analyzer = build_identifier_analyzer();
    let mut stream = analyzer.token_stream(text);
    let mut terms = Vec::new();
    while stream.advance() {
        terms.push(stream.token().text.clone());
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_tokens(text: &str) -> Vec<String> {
        let mut tokenizer = IdentifierTokenizer;
        let mut stream = tokenizer.token_stream(text);

        let mut tokens = Vec::new();
        while stream.advance() {
            tokens.push(stream.token().text.clone());
        }
        tokens
    }

    #[test]
    fn test_identifier_tokenizer() {
        assert_eq!(raw_tokens("strcpy(dst, src);"), vec!["strcpy", "dst", "src"]);
    }

    #[test]
    fn test_snake_case_kept_whole() {
        assert_eq!(raw_tokens("copy_from_user(to, from, n)"), vec!["copy_from_user", "to", "from"]);
    }

    #[test]
    fn test_single_chars_dropped() {
        assert_eq!(raw_tokens("p->buf[i] = 0;"), vec!["buf"]);
        assert!(raw_tokens("a b c").is_empty());
    }

    #[test]
    fn test_analyzer_lowercases() {
        assert_eq!(tokenize("MemCpy KMALLOC"), vec!["memcpy", "kmalloc"]);
    }
}
