//! Tokeniser für das blockbasierte Info-Datei-Format.
//!
//! Trennzeichen sind Whitespace; `{ } ( )` sind eigene Tokens. Strings in
//! Anführungszeichen bilden ein Token (Escapes `\n`, `\t`, `\"`).
//! Kommentare `// ...` und `/* ... */` werden übersprungen.

use std::iter::Peekable;
use std::str::{Chars, FromStr};
use thiserror::Error;

/// Fehler beim Lesen einer Info-Datei
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unerwartetes Dateiende")]
    UnexpectedEof,
    #[error("Zeile {line}: '{expected}' erwartet, '{found}' gefunden")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
    },
    #[error("Zeile {line}: ungültige Zahl '{token}'")]
    InvalidNumber { token: String, line: usize },
    #[error("Kein Info-Datei-Header gefunden")]
    MissingHeader,
    #[error("Nicht unterstützte Info-Datei-Version {0}")]
    UnsupportedVersion(u32),
}

const KEPT_DELIMITERS: [char; 4] = ['{', '}', '(', ')'];

/// Zerlegt einen Text in Tokens.
#[derive(Debug, Clone)]
pub struct DefTokeniser<'a> {
    chars: Peekable<Chars<'a>>,
    lookahead: Option<String>,
    line: usize,
}

impl<'a> DefTokeniser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            lookahead: None,
            line: 1,
        }
    }

    /// Aktuelle Zeile (1-basiert) für Fehlermeldungen
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn has_more_tokens(&mut self) -> bool {
        self.fill();
        self.lookahead.is_some()
    }

    /// Nächstes Token ohne es zu verbrauchen
    pub fn peek(&mut self) -> Option<&str> {
        self.fill();
        self.lookahead.as_deref()
    }

    pub fn next_token(&mut self) -> Result<String, ParseError> {
        self.fill();
        self.lookahead.take().ok_or(ParseError::UnexpectedEof)
    }

    /// Verbraucht ein Token und prüft, dass es `expected` entspricht.
    pub fn assert_next_token(&mut self, expected: &str) -> Result<(), ParseError> {
        let found = self.next_token()?;
        if found != expected {
            return Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found,
                line: self.line,
            });
        }
        Ok(())
    }

    /// Liest das nächste Token als Zahl.
    pub fn next_number<T: FromStr>(&mut self) -> Result<T, ParseError> {
        let token = self.next_token()?;
        self.parse_number(token)
    }

    /// Wandelt ein bereits gelesenes Token in eine Zahl um.
    pub fn parse_number<T: FromStr>(&self, token: String) -> Result<T, ParseError> {
        token.parse().map_err(|_| ParseError::InvalidNumber {
            token,
            line: self.line,
        })
    }

    fn fill(&mut self) {
        if self.lookahead.is_none() {
            self.lookahead = self.scan();
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    /// Prüft ob an der aktuellen Position ein Kommentar beginnt.
    fn at_comment_start(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        if ahead.next() != Some('/') {
            return None;
        }
        match ahead.next() {
            Some(c @ ('/' | '*')) => Some(c),
            _ => None,
        }
    }

    fn skip_comment(&mut self, kind: char) {
        self.bump();
        self.bump();
        if kind == '/' {
            while let Some(c) = self.bump() {
                if c == '\n' {
                    break;
                }
            }
        } else {
            let mut previous = '\0';
            while let Some(c) = self.bump() {
                if previous == '*' && c == '/' {
                    break;
                }
                previous = c;
            }
        }
    }

    fn scan(&mut self) -> Option<String> {
        loop {
            let c = *self.chars.peek()?;
            if c.is_whitespace() {
                self.bump();
                continue;
            }
            if let Some(kind) = self.at_comment_start() {
                self.skip_comment(kind);
                continue;
            }
            if KEPT_DELIMITERS.contains(&c) {
                self.bump();
                return Some(c.to_string());
            }
            if c == '"' {
                self.bump();
                return Some(self.scan_quoted());
            }
            return Some(self.scan_plain());
        }
    }

    fn scan_plain(&mut self) -> String {
        let mut token = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace()
                || c == '"'
                || KEPT_DELIMITERS.contains(&c)
                || self.at_comment_start().is_some()
            {
                break;
            }
            token.push(c);
            self.bump();
        }
        token
    }

    fn scan_quoted(&mut self) -> String {
        let mut token = String::new();
        while let Some(c) = self.bump() {
            match c {
                '"' => return token,
                '\\' => match self.bump() {
                    Some('n') => token.push('\n'),
                    Some('t') => token.push('\t'),
                    Some('"') => token.push('"'),
                    Some(other) => {
                        token.push('\\');
                        token.push(other);
                    }
                    None => token.push('\\'),
                },
                other => token.push(other),
            }
        }
        log::warn!("Nicht abgeschlossener String bis Dateiende");
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<String> {
        let mut tok = DefTokeniser::new(input);
        let mut result = Vec::new();
        while tok.has_more_tokens() {
            result.push(tok.next_token().expect("Token vorhanden"));
        }
        result
    }

    #[test]
    fn splits_on_whitespace_and_keeps_braces() {
        assert_eq!(
            tokens("Node { ( 0 1 ) ( 3 4 ) }"),
            vec!["Node", "{", "(", "0", "1", ")", "(", "3", "4", ")", "}"]
        );
        assert_eq!(tokens("a{b}"), vec!["a", "{", "b", "}"]);
    }

    #[test]
    fn quoted_strings_are_single_tokens() {
        assert_eq!(
            tokens(r#"SelectionGroup 2 { "Linke Säulen" }"#),
            vec!["SelectionGroup", "2", "{", "Linke Säulen", "}"]
        );
        assert_eq!(tokens(r#""a\"b" "tab\there""#), vec!["a\"b", "tab\there"]);
        assert_eq!(tokens(r#""""#), vec![""]);
    }

    #[test]
    fn comments_are_skipped() {
        let input = "Node { ( 1 ) } // Entity 1 > Brush 2\n/* Block\n Kommentar */ Ende";
        assert_eq!(tokens(input), vec!["Node", "{", "(", "1", ")", "}", "Ende"]);
    }

    #[test]
    fn assert_and_number_errors() {
        let mut tok = DefTokeniser::new("{ abc");
        assert_eq!(tok.assert_next_token("{"), Ok(()));
        assert!(matches!(
            tok.next_number::<u64>(),
            Err(ParseError::InvalidNumber { token, .. }) if token == "abc"
        ));
        assert_eq!(tok.next_token(), Err(ParseError::UnexpectedEof));
    }

    #[test]
    fn unexpected_token_reports_line() {
        let mut tok = DefTokeniser::new("\n\nfoo");
        assert_eq!(
            tok.assert_next_token("{"),
            Err(ParseError::UnexpectedToken {
                expected: "{".into(),
                found: "foo".into(),
                line: 3,
            })
        );
    }
}
