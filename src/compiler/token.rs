//! Tokens handed from the scanner to the parser, and the textual
//! token list format used to persist them between the two.
use std::fmt;
use std::convert::TryFrom;

use super::error::{Error, Fault};

/// Identifiers longer than this are a lexical error.
pub const MAX_IDENT_LEN: usize = 11;
/// Numbers with more digits than this are a lexical error.
pub const MAX_NUMBER_DIGITS: usize = 5;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Kind {
    NumberError = -3,
    IdentError  = -2,
    EndOfFile   = -1,
    Skip        = 1,
    Ident       = 2,
    Number      = 3,
    Plus        = 4,
    Minus       = 5,
    Mult        = 6,
    Slash       = 7,
    Eq          = 8,
    Neq         = 9,
    Lss         = 10,
    Leq         = 11,
    Gtr         = 12,
    Geq         = 13,
    LParen      = 14,
    RParen      = 15,
    Comma       = 16,
    Semicolon   = 17,
    Period      = 18,
    Becomes     = 19,
    Begin       = 20,
    End         = 21,
    If          = 22,
    Fi          = 23,
    Then        = 24,
    While       = 25,
    Do          = 26,
    Call        = 27,
    Const       = 28,
    Var         = 29,
    Procedure   = 30,
    Write       = 31,
    Read        = 32,
    Else        = 33,
    Even        = 34,
}

impl Kind {
    /// Kinds the scanner produces when it could not classify its input.
    pub fn is_lexical_error(&self) -> bool {
        matches!(self, Kind::Skip | Kind::IdentError | Kind::NumberError)
    }

    /// Maps a word to its reserved kind, if it is one.
    pub fn reserved(word: &str) -> Option<Kind> {
        use Kind::*;
        match word {
            "begin"     => Some(Begin),
            "end"       => Some(End),
            "if"        => Some(If),
            "fi"        => Some(Fi),
            "then"      => Some(Then),
            "while"     => Some(While),
            "do"        => Some(Do),
            "call"      => Some(Call),
            "const"     => Some(Const),
            "var"       => Some(Var),
            "procedure" => Some(Procedure),
            "write"     => Some(Write),
            "read"      => Some(Read),
            "else"      => Some(Else),
            "even"      => Some(Even),
            _ => None,
        }
    }

    /// Maps punctuation and operators to their kind.
    pub fn symbol(text: &str) -> Option<Kind> {
        use Kind::*;
        match text {
            "+"  => Some(Plus),
            "-"  => Some(Minus),
            "*"  => Some(Mult),
            "/"  => Some(Slash),
            "="  => Some(Eq),
            "<>" => Some(Neq),
            "<"  => Some(Lss),
            "<=" => Some(Leq),
            ">"  => Some(Gtr),
            ">=" => Some(Geq),
            "("  => Some(LParen),
            ")"  => Some(RParen),
            ","  => Some(Comma),
            ";"  => Some(Semicolon),
            "."  => Some(Period),
            ":=" => Some(Becomes),
            _ => None,
        }
    }

    pub fn code(&self) -> i32 {
        *self as i32
    }
}

impl TryFrom<i32> for Kind {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        use Kind::*;
        match value {
            -3 => Ok(NumberError),
            -2 => Ok(IdentError),
            -1 => Ok(EndOfFile),
            1  => Ok(Skip),
            2  => Ok(Ident),
            3  => Ok(Number),
            4  => Ok(Plus),
            5  => Ok(Minus),
            6  => Ok(Mult),
            7  => Ok(Slash),
            8  => Ok(Eq),
            9  => Ok(Neq),
            10 => Ok(Lss),
            11 => Ok(Leq),
            12 => Ok(Gtr),
            13 => Ok(Geq),
            14 => Ok(LParen),
            15 => Ok(RParen),
            16 => Ok(Comma),
            17 => Ok(Semicolon),
            18 => Ok(Period),
            19 => Ok(Becomes),
            20 => Ok(Begin),
            21 => Ok(End),
            22 => Ok(If),
            23 => Ok(Fi),
            24 => Ok(Then),
            25 => Ok(While),
            26 => Ok(Do),
            27 => Ok(Call),
            28 => Ok(Const),
            29 => Ok(Var),
            30 => Ok(Procedure),
            31 => Ok(Write),
            32 => Ok(Read),
            33 => Ok(Else),
            34 => Ok(Even),
            _  => Err(format!("unknown token kind {}", value)),
        }
    }
}

/// A scanned token. Only identifiers and numbers carry a payload.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Token {
    Ident(String),
    Number(i32),
    Bare(Kind),
}

impl Token {
    pub fn kind(&self) -> Kind {
        match self {
            Token::Ident(_)  => Kind::Ident,
            Token::Number(_) => Kind::Number,
            Token::Bare(k)   => *k,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "{} {}", Kind::Ident.code(), name),
            Token::Number(val) => write!(f, "{} {}", Kind::Number.code(), val),
            // The list format has a single code for every scanning error.
            Token::Bare(k) if k.is_lexical_error() => write!(f, "{}", Kind::Skip.code()),
            Token::Bare(k)     => write!(f, "{}", k.code()),
        }
    }
}

/// Reads a token list: whitespace separated kind codes, where an identifier
/// code is followed by its name and a number code by its value.
pub fn read_token_list(text: &str) -> Result<Vec<Token>, Error> {
    let mut tokens = Vec::new();
    let mut words = text.split_whitespace();

    while let Some(word) = words.next() {
        let code = word.parse::<i32>()
            .map_err(|_| malformed(format!("expected a token code, found `{}`", word)))?;
        let kind = Kind::try_from(code).map_err(malformed)?;

        let token = match kind {
            Kind::Ident => match words.next() {
                Some(name) if name.chars().count() > MAX_IDENT_LEN => Token::Bare(Kind::IdentError),
                Some(name) => Token::Ident(name.to_owned()),
                None => return Err(malformed("identifier code without a name".to_owned())),
            },
            Kind::Number => match words.next() {
                Some(digits) => match digits.parse::<i32>() {
                    Ok(val) if val < 0 || digits.len() > MAX_NUMBER_DIGITS => Token::Bare(Kind::NumberError),
                    Ok(val) => Token::Number(val),
                    // Too many digits to even hold is still a scanning error.
                    Err(_) if digits.chars().all(|c| c.is_ascii_digit()) => Token::Bare(Kind::NumberError),
                    Err(e) => return Err(malformed(format!("bad number payload `{}`: {}", digits, e))),
                },
                None => return Err(malformed("number code without a value".to_owned())),
            },
            other => Token::Bare(other),
        };
        trace!("read token {:?}", token);
        tokens.push(token);
    }

    Ok(tokens)
}

/// Writes tokens in the format `read_token_list` accepts.
pub fn write_token_list(tokens: &[Token]) -> String {
    tokens.iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn malformed(reason: String) -> Error {
    Error::Fault(Fault::MalformedTokenList(reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes() {
        for code in -3..=34 {
            match Kind::try_from(code) {
                Ok(kind) => assert_eq!(kind.code(), code),
                Err(_) => assert_eq!(code, 0),
            }
        }
        assert!(Kind::try_from(35).is_err());
        assert!(Kind::try_from(-4).is_err());
    }

    #[test]
    fn test_reserved() {
        assert_eq!(Kind::reserved("procedure"), Some(Kind::Procedure));
        assert_eq!(Kind::reserved("fi"), Some(Kind::Fi));
        assert_eq!(Kind::reserved("Begin"), None);
        assert_eq!(Kind::reserved("x"), None);
    }

    #[test]
    fn test_read_token_list() {
        let tokens = read_token_list("29 2 x 17 2 x 19 3 42 18").unwrap();
        assert_eq!(tokens, vec![
            Token::Bare(Kind::Var),
            Token::Ident("x".to_owned()),
            Token::Bare(Kind::Semicolon),
            Token::Ident("x".to_owned()),
            Token::Bare(Kind::Becomes),
            Token::Number(42),
            Token::Bare(Kind::Period),
        ]);
    }

    #[test]
    fn test_read_token_list_long_name() {
        let tokens = read_token_list("2 abcdefghijkl").unwrap();
        assert_eq!(tokens, vec![Token::Bare(Kind::IdentError)]);
    }

    #[test]
    fn test_read_token_list_number_limits() {
        assert_eq!(read_token_list("3 99999").unwrap(), vec![Token::Number(99999)]);
        assert_eq!(read_token_list("3 123456").unwrap(), vec![Token::Bare(Kind::NumberError)]);
        assert_eq!(read_token_list("3 -5").unwrap(), vec![Token::Bare(Kind::NumberError)]);
        assert_eq!(read_token_list("3 99999999999999").unwrap(), vec![Token::Bare(Kind::NumberError)]);
    }

    #[test]
    fn test_read_token_list_malformed() {
        assert!(matches!(read_token_list("2"), Err(Error::Fault(Fault::MalformedTokenList(_)))));
        assert!(matches!(read_token_list("3 abc"), Err(Error::Fault(Fault::MalformedTokenList(_)))));
        assert!(matches!(read_token_list("0"), Err(Error::Fault(Fault::MalformedTokenList(_)))));
        assert!(matches!(read_token_list("begin"), Err(Error::Fault(Fault::MalformedTokenList(_)))));
    }

    #[test]
    fn test_write_token_list() {
        let tokens = vec![
            Token::Bare(Kind::Write),
            Token::Number(7),
            Token::Bare(Kind::IdentError),
            Token::Ident("y".to_owned()),
            Token::Bare(Kind::Period),
        ];
        assert_eq!(write_token_list(&tokens), "31 3 7 1 2 y 18");
    }
}
