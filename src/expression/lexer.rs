use crate::foundation::error::EvaluationError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    /// Byte offset of the first character.
    pub(crate) offset: usize,
}

/// Token set is wider than the grammar: constructs outside the allow-list must still lex so the
/// parser can name them when rejecting.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Number(f64),
    Imaginary,
    Ident(String),
    Str,

    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Dot,
    Colon,
    Semicolon,

    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    SlashSlash,
    Percent,
    At,

    Amp,
    Pipe,
    Caret,
    Tilde,
    Shl,
    Shr,

    EqEq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    Assign,
    AugAssign,
    Walrus,

    Eof,
}

impl TokenKind {
    /// Short description for diagnostics. Never includes identifier or string contents.
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Imaginary => "complex number",
            Self::Ident(_) => "identifier",
            Self::Str => "string",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::Comma => "','",
            Self::Dot => "'.'",
            Self::Colon => "':'",
            Self::Semicolon => "';'",
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Star => "'*'",
            Self::StarStar => "'**'",
            Self::Slash => "'/'",
            Self::SlashSlash => "'//'",
            Self::Percent => "'%'",
            Self::At => "'@'",
            Self::Amp => "'&'",
            Self::Pipe => "'|'",
            Self::Caret => "'^'",
            Self::Tilde => "'~'",
            Self::Shl => "'<<'",
            Self::Shr => "'>>'",
            Self::EqEq => "'=='",
            Self::Ne => "'!='",
            Self::Lt => "'<'",
            Self::Le => "'<='",
            Self::Gt => "'>'",
            Self::Ge => "'>='",
            Self::Assign => "'='",
            Self::AugAssign => "augmented assignment",
            Self::Walrus => "':='",
            Self::Eof => "end of expression",
        }
    }
}

pub(crate) fn lex(input: &str) -> Result<Vec<Token>, EvaluationError> {
    let mut lx = Lexer { src: input, pos: 0 };
    let mut out = Vec::new();

    while let Some(c) = lx.peek() {
        if c.is_whitespace() {
            lx.pos += c.len_utf8();
            continue;
        }

        let start = lx.pos;
        let kind = if c.is_ascii_digit()
            || (c == '.' && lx.peek_at(1).is_some_and(|d| d.is_ascii_digit()))
        {
            lx.number()?
        } else if c == '_' || c.is_alphabetic() {
            lx.ident()
        } else if c == '\'' || c == '"' {
            lx.string()?
        } else {
            lx.punct()?
        };

        out.push(Token {
            kind,
            offset: start,
        });
    }

    out.push(Token {
        kind: TokenKind::Eof,
        offset: input.len(),
    });

    Ok(out)
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl Lexer<'_> {
    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    // Number: [0-9_]+(.[0-9_]*)?([eE][+-]?[0-9_]+)?[jJ]? or .[0-9_]+(...) or 0[xob][0-9a-f_]+
    fn number(&mut self) -> Result<TokenKind, EvaluationError> {
        let start = self.pos;
        if self.peek() == Some('0') && matches!(self.peek_at(1), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B'))
        {
            return self.radix_integer(start);
        }

        let mut text = String::new();
        let int_digits = self.digits(10, &mut text)?;
        let mut is_float = false;

        // fractional part
        if self.peek() == Some('.') {
            self.pos += 1;
            text.push('.');
            is_float = true;
            self.digits(10, &mut text)?;
        }

        // exponent
        if matches!(self.peek(), Some('e' | 'E')) {
            let e_pos = self.pos;
            self.pos += 1;
            text.push('e');
            if let Some(sign @ ('+' | '-')) = self.peek() {
                self.pos += 1;
                text.push(sign);
            }
            if self.digits(10, &mut text)? == 0 {
                return Err(EvaluationError::parse(
                    e_pos,
                    "invalid number exponent (expected digits)",
                ));
            }
            is_float = true;
        }

        if matches!(self.peek(), Some('j' | 'J')) {
            self.pos += 1;
            self.reject_trailing_ident(start)?;
            return Ok(TokenKind::Imaginary);
        }
        self.reject_trailing_ident(start)?;

        if !is_float && int_digits > 1 && text.starts_with('0') && text.bytes().any(|b| b != b'0')
        {
            return Err(EvaluationError::parse(
                start,
                "leading zeros in decimal integer literals are not permitted",
            ));
        }

        let v: f64 = text
            .parse()
            .map_err(|_| EvaluationError::parse(start, "invalid number"))?;
        Ok(TokenKind::Number(v))
    }

    fn radix_integer(&mut self, start: usize) -> Result<TokenKind, EvaluationError> {
        self.pos += 1;
        let radix = match self.peek() {
            Some('x' | 'X') => 16,
            Some('o' | 'O') => 8,
            _ => 2,
        };
        self.pos += 1;
        if self.peek() == Some('_') {
            self.pos += 1;
        }

        let mut text = String::new();
        if self.digits(radix, &mut text)? == 0 {
            return Err(EvaluationError::parse(
                start,
                "missing digits after integer base prefix",
            ));
        }
        self.reject_trailing_ident(start)?;

        let v = text
            .chars()
            .try_fold(0.0f64, |acc, c| {
                c.to_digit(radix)
                    .map(|d| acc * f64::from(radix) + f64::from(d))
            })
            .ok_or_else(|| EvaluationError::parse(start, "invalid digit in integer literal"))?;
        Ok(TokenKind::Number(v))
    }

    /// Consume digits of `radix` with single `_` separators between them. Returns the digit count.
    fn digits(&mut self, radix: u32, text: &mut String) -> Result<usize, EvaluationError> {
        let mut n = 0usize;
        loop {
            match self.peek() {
                Some(c) if c.is_digit(radix) => {
                    text.push(c);
                    self.pos += 1;
                    n += 1;
                }
                Some('_') if n > 0 => {
                    if !self.peek_at(1).is_some_and(|d| d.is_digit(radix)) {
                        return Err(EvaluationError::parse(self.pos, "invalid digit separator"));
                    }
                    self.pos += 1;
                }
                _ => return Ok(n),
            }
        }
    }

    fn reject_trailing_ident(&self, start: usize) -> Result<(), EvaluationError> {
        match self.peek() {
            Some(c) if c.is_alphanumeric() || c == '_' => {
                Err(EvaluationError::parse(start, "invalid numeric literal"))
            }
            _ => Ok(()),
        }
    }

    fn ident(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        TokenKind::Ident(self.src[start..self.pos].to_owned())
    }

    fn string(&mut self) -> Result<TokenKind, EvaluationError> {
        let start = self.pos;
        let Some(quote) = self.peek() else {
            return Err(EvaluationError::parse(start, "unterminated string literal"));
        };
        self.pos += quote.len_utf8();

        loop {
            let Some(c) = self.peek() else {
                return Err(EvaluationError::parse(start, "unterminated string literal"));
            };
            self.pos += c.len_utf8();
            if c == quote {
                return Ok(TokenKind::Str);
            }
            if c == '\\'
                && let Some(escaped) = self.peek()
            {
                self.pos += escaped.len_utf8();
            }
        }
    }

    fn punct(&mut self) -> Result<TokenKind, EvaluationError> {
        let start = self.pos;
        let rest = self.rest();

        // Three-char operators
        if let Some(three) = rest.get(..3)
            && matches!(three, "**=" | "//=" | "<<=" | ">>=")
        {
            self.pos += 3;
            return Ok(TokenKind::AugAssign);
        }

        // Two-char operators
        if let Some(two) = rest.get(..2) {
            let kind = match two {
                "**" => Some(TokenKind::StarStar),
                "//" => Some(TokenKind::SlashSlash),
                "<<" => Some(TokenKind::Shl),
                ">>" => Some(TokenKind::Shr),
                "==" => Some(TokenKind::EqEq),
                "!=" => Some(TokenKind::Ne),
                "<=" => Some(TokenKind::Le),
                ">=" => Some(TokenKind::Ge),
                ":=" => Some(TokenKind::Walrus),
                "+=" | "-=" | "*=" | "/=" | "%=" | "@=" | "&=" | "|=" | "^=" => {
                    Some(TokenKind::AugAssign)
                }
                _ => None,
            };
            if let Some(kind) = kind {
                self.pos += 2;
                return Ok(kind);
            }
        }

        // Single-char tokens
        let Some(c) = self.peek() else {
            return Err(EvaluationError::parse(start, "unexpected end of input"));
        };
        let kind = match c {
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
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '@' => TokenKind::At,
            '&' => TokenKind::Amp,
            '|' => TokenKind::Pipe,
            '^' => TokenKind::Caret,
            '~' => TokenKind::Tilde,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            '=' => TokenKind::Assign,
            _ => {
                return Err(EvaluationError::parse(
                    start,
                    format!("unexpected character {c:?}"),
                ));
            }
        };
        self.pos += c.len_utf8();
        Ok(kind)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/lexer.rs"]
mod tests;
