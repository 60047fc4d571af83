//! This lexer tokenizes PL/0 source text.
//!
//! Scanning never fails outright: anything it cannot classify becomes a
//! lexical-error token and the parser rejects the program.
use once_cell::sync::Lazy;
use regex::Regex;

use super::error::{Error, Fault};
use super::token::{Kind, Token, MAX_IDENT_LEN, MAX_NUMBER_DIGITS};

// Alternatives are tried left to right, so comments must come before `/`
// and the two-character symbols before their one-character prefixes.
const PATTERN: &str = r"(?s)(?P<space>\s+)|(?P<comment>/\*.*?\*/)|(?P<open>/\*)|(?P<word>[A-Za-z][A-Za-z0-9]*)|(?P<number>[0-9]+)|(?P<symbol>:=|<>|<=|>=|[-+*/=<>(),;.])|(?P<stray>.)";

static SCANNER: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| Regex::new(PATTERN));

pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    let pattern = SCANNER.as_ref()
        .map_err(|e| Fault::ScannerPattern(e.to_string()))?;
    let mut tokens: Vec<Token> = Vec::with_capacity(256);
    let mut line: usize = 1;

    for caps in pattern.captures_iter(source) {
        let text = caps.get(0).map_or("", |m| m.as_str());

        if caps.name("open").is_some() {
            warn!("Unterminated comment on line {}, ignoring the rest of the input.", line);
            break;
        }

        if let Some(word) = caps.name("word") {
            tokens.push(classify_word(word.as_str(), line));
        } else if let Some(number) = caps.name("number") {
            tokens.push(classify_number(number.as_str(), line));
        } else if let Some(symbol) = caps.name("symbol") {
            // The pattern only admits spellings `Kind::symbol` knows.
            tokens.push(Token::Bare(Kind::symbol(symbol.as_str()).unwrap_or(Kind::Skip)));
        } else if let Some(stray) = caps.name("stray") {
            warn!("Invalid character `{}` on line {}", stray.as_str(), line);
            tokens.push(Token::Bare(Kind::Skip));
        }

        line += text.matches('\n').count();
    }

    debug!("Scanned {} token(s) over {} line(s).", tokens.len(), line);
    Ok(tokens)
}

fn classify_word(word: &str, line: usize) -> Token {
    if let Some(kind) = Kind::reserved(word) {
        return Token::Bare(kind);
    }

    if word.len() > MAX_IDENT_LEN {
        warn!("Identifier `{}` on line {} is longer than {} characters", word, line, MAX_IDENT_LEN);
        Token::Bare(Kind::IdentError)
    } else {
        Token::Ident(word.to_owned())
    }
}

fn classify_number(digits: &str, line: usize) -> Token {
    if digits.len() > MAX_NUMBER_DIGITS {
        warn!("Number `{}` on line {} has more than {} digits", digits, line, MAX_NUMBER_DIGITS);
        return Token::Bare(Kind::NumberError);
    }

    match digits.parse::<i32>() {
        Ok(val) => Token::Number(val),
        Err(_) => Token::Bare(Kind::NumberError),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Token {
        Token::Ident(name.to_owned())
    }

    fn scan(source: &str) -> Vec<Token> {
        tokenize(source).unwrap()
    }

    #[test]
    fn test_scanner_pattern_compiles() {
        assert!(SCANNER.is_ok());
    }

    #[test]
    fn test_classify_word() {
        assert_eq!(classify_word("while", 0), Token::Bare(Kind::While));
        assert_eq!(classify_word("even", 0), Token::Bare(Kind::Even));
        assert_eq!(classify_word("x1", 0), ident("x1"));
        assert_eq!(classify_word("abcdefghijk", 0), ident("abcdefghijk"));
        assert_eq!(classify_word("abcdefghijkl", 0), Token::Bare(Kind::IdentError));
        // Reserved words win over the length check.
        assert_eq!(classify_word("procedure", 0), Token::Bare(Kind::Procedure));
    }

    #[test]
    fn test_classify_number() {
        assert_eq!(classify_number("0", 0), Token::Number(0));
        assert_eq!(classify_number("99999", 0), Token::Number(99999));
        assert_eq!(classify_number("100000", 0), Token::Bare(Kind::NumberError));
    }

    #[test]
    fn test_tokenize_symbols() {
        assert_eq!(scan(":= <> <= >= < > = + - * / ( ) , ; ."), vec![
            Token::Bare(Kind::Becomes),
            Token::Bare(Kind::Neq),
            Token::Bare(Kind::Leq),
            Token::Bare(Kind::Geq),
            Token::Bare(Kind::Lss),
            Token::Bare(Kind::Gtr),
            Token::Bare(Kind::Eq),
            Token::Bare(Kind::Plus),
            Token::Bare(Kind::Minus),
            Token::Bare(Kind::Mult),
            Token::Bare(Kind::Slash),
            Token::Bare(Kind::LParen),
            Token::Bare(Kind::RParen),
            Token::Bare(Kind::Comma),
            Token::Bare(Kind::Semicolon),
            Token::Bare(Kind::Period),
        ]);
    }

    #[test]
    fn test_tokenize_without_spaces() {
        assert_eq!(scan("x:=x+12;"), vec![
            ident("x"),
            Token::Bare(Kind::Becomes),
            ident("x"),
            Token::Bare(Kind::Plus),
            Token::Number(12),
            Token::Bare(Kind::Semicolon),
        ]);
        assert_eq!(scan("12ab"), vec![Token::Number(12), ident("ab")]);
    }

    #[test]
    fn test_tokenize_comments() {
        let source = "
        var a; /* a comment
                  across lines */
        begin /**/ read a /* one *//* two */ end.
        ";
        assert_eq!(scan(source), vec![
            Token::Bare(Kind::Var),
            ident("a"),
            Token::Bare(Kind::Semicolon),
            Token::Bare(Kind::Begin),
            Token::Bare(Kind::Read),
            ident("a"),
            Token::Bare(Kind::End),
            Token::Bare(Kind::Period),
        ]);

        assert_eq!(scan("write 1 /* never closed . "), vec![
            Token::Bare(Kind::Write),
            Token::Number(1),
        ]);
    }

    #[test]
    fn test_tokenize_errors() {
        assert_eq!(scan("a ! b : c"), vec![
            ident("a"),
            Token::Bare(Kind::Skip),
            ident("b"),
            Token::Bare(Kind::Skip),
            ident("c"),
        ]);
        assert_eq!(scan("write 123456."), vec![
            Token::Bare(Kind::Write),
            Token::Bare(Kind::NumberError),
            Token::Bare(Kind::Period),
        ]);
    }
}
