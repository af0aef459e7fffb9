//! Hand-written lexer. No grammar crate: the token grammar here is small
//! enough that a character-at-a-time scanner reads more directly than a
//! generated one, and it keeps position tracking exact.
use crate::diagnostic::{Diagnostic, Position};
use crate::token::{keyword, Token, TokenKind};

pub struct Lexer {
    source: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.current_char()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn position(&self) -> Position {
        (self.line, self.column)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current_char(), Some(' ') | Some('\t') | Some('\r')) {
            self.advance();
        }
    }

    fn skip_comment(&mut self) {
        if self.current_char() == Some('/') && self.peek(1) == Some('/') {
            while self.current_char().is_some() && self.current_char() != Some('\n') {
                self.advance();
            }
        } else if self.current_char() == Some('/') && self.peek(1) == Some('*') {
            self.advance();
            self.advance();
            while self.current_char().is_some()
                && !(self.current_char() == Some('*') && self.peek(1) == Some('/'))
            {
                self.advance();
            }
            self.advance();
            self.advance();
        }
    }

    fn read_string(&mut self) -> Result<Token, Diagnostic> {
        let start = self.position();
        let quote = self.advance().unwrap();
        let mut value = String::new();
        loop {
            match self.current_char() {
                None => return Err(Diagnostic::lex("unterminated string literal", start)),
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.current_char() {
                        Some('n') => {
                            value.push('\n');
                            self.advance();
                        }
                        Some('t') => {
                            value.push('\t');
                            self.advance();
                        }
                        Some('r') => {
                            value.push('\r');
                            self.advance();
                        }
                        Some('\\') => {
                            value.push('\\');
                            self.advance();
                        }
                        Some('"') => {
                            value.push('"');
                            self.advance();
                        }
                        Some('\'') => {
                            value.push('\'');
                            self.advance();
                        }
                        Some(other) => {
                            value.push('\\');
                            value.push(other);
                            self.advance();
                        }
                        None => return Err(Diagnostic::lex("unterminated string literal", start)),
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }
        Ok(Token::new(TokenKind::Str(value), start))
    }

    fn read_number(&mut self) -> Token {
        let start = self.position();
        let mut text = String::new();
        let mut is_float = false;
        while matches!(self.current_char(), Some(c) if c.is_ascii_digit()) {
            text.push(self.advance().unwrap());
        }
        if self.current_char() == Some('.') && matches!(self.peek(1), Some(c) if c.is_ascii_digit())
        {
            is_float = true;
            text.push(self.advance().unwrap());
            while matches!(self.current_char(), Some(c) if c.is_ascii_digit()) {
                text.push(self.advance().unwrap());
            }
        }
        if is_float {
            Token::new(TokenKind::Float(text.parse().unwrap_or(0.0)), start)
        } else {
            Token::new(TokenKind::Integer(text.parse().unwrap_or(0)), start)
        }
    }

    fn read_identifier(&mut self) -> Token {
        let start = self.position();
        let mut text = String::new();
        while matches!(self.current_char(), Some(c) if c.is_alphanumeric() || c == '_') {
            text.push(self.advance().unwrap());
        }
        match keyword(&text) {
            Some(kind) => Token::new(kind, start),
            None => Token::new(TokenKind::Identifier(text), start),
        }
    }

    fn read_operator_or_delimiter(&mut self) -> Result<Token, Diagnostic> {
        let start = self.position();
        let two: Option<String> = match (self.current_char(), self.peek(1)) {
            (Some(a), Some(b)) => Some(format!("{a}{b}")),
            _ => None,
        };
        if let Some(pair) = two.as_deref() {
            let kind = match pair {
                "==" => Some(TokenKind::EqEq),
                "!=" => Some(TokenKind::NotEq),
                "<=" => Some(TokenKind::LessEq),
                ">=" => Some(TokenKind::GreaterEq),
                "+=" => Some(TokenKind::PlusAssign),
                "-=" => Some(TokenKind::MinusAssign),
                "*=" => Some(TokenKind::StarAssign),
                "/=" => Some(TokenKind::SlashAssign),
                "**" => Some(TokenKind::Power),
                "->" => Some(TokenKind::Arrow),
                "=>" => Some(TokenKind::FatArrow),
                "<<" => Some(TokenKind::Shl),
                ">>" => Some(TokenKind::Shr),
                _ => None,
            };
            if let Some(kind) = kind {
                self.advance();
                self.advance();
                return Ok(Token::new(kind, start));
            }
        }
        let c = self.current_char().ok_or_else(|| {
            Diagnostic::lex("unexpected end of input", start)
        })?;
        let kind = match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '<' => TokenKind::Less,
            '>' => TokenKind::Greater,
            '=' => TokenKind::Assign,
            '&' => TokenKind::BitAnd,
            '|' => TokenKind::BitOr,
            '^' => TokenKind::BitXor,
            '~' => TokenKind::BitNot,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '\\' => TokenKind::Backslash,
            other => return Err(Diagnostic::lex(format!("unexpected character '{other}'"), start)),
        };
        self.advance();
        Ok(Token::new(kind, start))
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, Diagnostic> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            match self.current_char() {
                None => {
                    tokens.push(Token::new(TokenKind::Eof, self.position()));
                    break;
                }
                Some('\n') => {
                    let start = self.position();
                    self.advance();
                    tokens.push(Token::new(TokenKind::Newline, start));
                }
                Some('/') if self.peek(1) == Some('/') || self.peek(1) == Some('*') => {
                    self.skip_comment();
                }
                Some(c) if c == '"' || c == '\'' => {
                    tokens.push(self.read_string()?);
                }
                Some(c) if c.is_ascii_digit() => {
                    tokens.push(self.read_number());
                }
                Some(c) if c.is_alphabetic() || c == '_' => {
                    tokens.push(self.read_identifier());
                }
                Some(_) => {
                    tokens.push(self.read_operator_or_delimiter()?);
                }
            }
        }
        Ok(tokens)
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, Diagnostic> {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_integer_and_float() {
        let tokens = tokenize("42 3.5").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Integer(42));
        assert_eq!(tokens[1].kind, TokenKind::Float(3.5));
    }

    #[test]
    fn lex_keywords_vs_identifiers() {
        let tokens = tokenize("let x = foo").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Let);
        assert_eq!(tokens[1].kind, TokenKind::Identifier("x".into()));
        assert_eq!(tokens[2].kind, TokenKind::Assign);
        assert_eq!(tokens[3].kind, TokenKind::Identifier("foo".into()));
    }

    #[test]
    fn lex_two_char_before_one_char() {
        let tokens = tokenize("a <= b").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::LessEq);
    }

    #[test]
    fn lex_string_escapes() {
        let tokens = tokenize("\"a\\nb\"").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Str("a\nb".into()));
    }

    #[test]
    fn lex_unterminated_string_errors() {
        let err = tokenize("\"abc").unwrap_err();
        assert!(matches!(err, Diagnostic::Lex { .. }));
    }

    #[test]
    fn lex_comments_are_skipped() {
        let tokens = tokenize("1 // comment\n2 /* block */ 3").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Integer(1),
                TokenKind::Newline,
                TokenKind::Integer(2),
                TokenKind::Integer(3),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lex_backslash_and_fat_arrow_for_lambdas() {
        let tokens = tokenize("\\(x) => x").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Backslash);
        assert!(tokens.iter().any(|t| t.kind == TokenKind::FatArrow));
    }
}
