/// Represents the different kinds of tokens found in a protobuf text-format
/// module mappings file.
#[derive(Debug, PartialEq, Clone)]
pub enum TokenType {
    // == Special Tokens ==
    /// Represents the end of the input file.
    Eof,
    /// A run of one or more whitespace characters.
    Whitespace,
    /// A comment, starting with `#` and continuing to the end of the line.
    /// The associated `String` contains the trimmed comment text.
    Comment(String),
    /// A character the lexer does not recognize.
    Unknown,
    /// A string literal with no closing quote on the same line.
    UnterminatedString,
    /// A string literal whose escapes decode to bytes that are not UTF-8.
    InvalidUtf8,

    // == Literals ==
    /// A field name such as `mapping` or `module_name`.
    Identifier(String),
    /// A quoted string literal with escapes already decoded.
    String(String),

    // == Punctuation ==
    /// Left Brace: `{`
    LBrace,
    /// Right Brace: `}`
    RBrace,
    /// Left Bracket: `[`
    LBracket,
    /// Right Bracket: `]`
    RBracket,
    /// Left Angle: `<` (alternative message delimiter)
    LAngle,
    /// Right Angle: `>`
    RAngle,
    /// Colon: `:`
    Colon,
    /// Comma: `,`
    Comma,
    /// Semicolon: `;`
    Semicolon,
}

/// A token with its type and byte position
#[derive(Debug, Clone)]
pub struct Token {
    pub ttype: TokenType,
    pub pos_start: usize,
    pub pos_end: usize,
}

impl Token {
    pub fn new(ttype: TokenType, pos_start: usize, pos_end: usize) -> Token {
        Token {
            ttype,
            pos_start,
            pos_end,
        }
    }
}

pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    pub fn lex(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            if token.ttype == TokenType::Eof {
                tokens.push(token);
                break;
            }
            tokens.push(token);
        }
        tokens
    }

    pub fn next_token(&mut self) -> Token {
        let start_pos = self.position;

        let ttype = if let Some(char) = self.advance() {
            match char {
                '{' => TokenType::LBrace,
                '}' => TokenType::RBrace,
                '[' => TokenType::LBracket,
                ']' => TokenType::RBracket,
                '<' => TokenType::LAngle,
                '>' => TokenType::RAngle,
                ':' => TokenType::Colon,
                ',' => TokenType::Comma,
                ';' => TokenType::Semicolon,
                '#' => self.read_comment(),
                '"' | '\'' => self.read_string(char),
                c if c.is_whitespace() => self.read_whitespace(),
                c if c.is_ascii_alphabetic() || c == '_' => self.read_identifier(c),
                _ => TokenType::Unknown,
            }
        } else {
            TokenType::Eof
        };

        Token::new(ttype, start_pos, self.position)
    }

    fn advance(&mut self) -> Option<char> {
        let char = self.chars.next();
        if let Some(c) = char {
            self.position += c.len_utf8();
        }
        char
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    fn advance_if(&mut self, pred: impl Fn(char) -> bool) -> Option<char> {
        match self.peek() {
            Some(&c) if pred(c) => self.advance(),
            _ => None,
        }
    }

    fn read_whitespace(&mut self) -> TokenType {
        while self.advance_if(char::is_whitespace).is_some() {}
        TokenType::Whitespace
    }

    fn read_comment(&mut self) -> TokenType {
        let mut comment_text = String::new();
        while let Some(c) = self.advance_if(|c| c != '\n') {
            comment_text.push(c);
        }
        TokenType::Comment(comment_text.trim().to_string())
    }

    /// Reads a quoted string. Octal and hex escapes produce raw bytes, so the
    /// value is assembled as bytes and decoded once at the end; bytes that do
    /// not form UTF-8 yield `InvalidUtf8`.
    fn read_string(&mut self, quote: char) -> TokenType {
        let mut bytes: Vec<u8> = Vec::new();
        let mut buf = [0u8; 4];
        while let Some(c) = self.advance() {
            if c == quote {
                return match String::from_utf8(bytes) {
                    Ok(value) => TokenType::String(value),
                    Err(_) => TokenType::InvalidUtf8,
                };
            }
            match c {
                '\n' => return TokenType::UnterminatedString,
                '\\' => {
                    let Some(escaped) = self.advance() else {
                        return TokenType::UnterminatedString;
                    };
                    match escaped {
                        'n' => bytes.push(b'\n'),
                        'r' => bytes.push(b'\r'),
                        't' => bytes.push(b'\t'),
                        'a' => bytes.push(0x07),
                        'b' => bytes.push(0x08),
                        'f' => bytes.push(0x0c),
                        'v' => bytes.push(0x0b),
                        '\\' | '"' | '\'' | '?' => bytes.push(escaped as u8),
                        '0'..='7' => {
                            let mut value = escaped.to_digit(8).unwrap_or(0);
                            for _ in 0..2 {
                                match self.advance_if(|c| c.is_digit(8)) {
                                    Some(d) => value = value * 8 + d.to_digit(8).unwrap_or(0),
                                    None => break,
                                }
                            }
                            bytes.push((value & 0xff) as u8);
                        }
                        'x' | 'X' => {
                            let mut value = 0u32;
                            let mut digits = 0;
                            while digits < 2 {
                                match self.advance_if(|c| c.is_ascii_hexdigit()) {
                                    Some(d) => value = value * 16 + d.to_digit(16).unwrap_or(0),
                                    None => break,
                                }
                                digits += 1;
                            }
                            if digits == 0 {
                                bytes.extend_from_slice(b"\\x");
                            } else {
                                bytes.push(value as u8);
                            }
                        }
                        other => {
                            bytes.push(b'\\');
                            bytes.extend_from_slice(other.encode_utf8(&mut buf).as_bytes());
                        }
                    }
                }
                _ => bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes()),
            }
        }
        TokenType::UnterminatedString
    }

    fn read_identifier(&mut self, first_char: char) -> TokenType {
        let mut ident = String::new();
        ident.push(first_char);
        while let Some(c) = self.advance_if(|c| c.is_ascii_alphanumeric() || c == '_') {
            ident.push(c);
        }
        TokenType::Identifier(ident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_tokens(input: &str, expected: Vec<TokenType>) {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.lex();
        let token_types: Vec<TokenType> = tokens.into_iter().map(|t| t.ttype).collect();

        // Filter out whitespace and comments for most tests
        let filtered_tokens: Vec<TokenType> = token_types
            .into_iter()
            .filter(|t| !matches!(t, TokenType::Whitespace | TokenType::Comment(_)))
            .collect();

        assert_eq!(filtered_tokens, expected);
    }

    #[test]
    fn test_eof() {
        assert_tokens("", vec![TokenType::Eof]);
    }

    #[test]
    fn test_punctuation() {
        let input = "{}[]<>:,;";
        let expected = vec![
            TokenType::LBrace,
            TokenType::RBrace,
            TokenType::LBracket,
            TokenType::RBracket,
            TokenType::LAngle,
            TokenType::RAngle,
            TokenType::Colon,
            TokenType::Comma,
            TokenType::Semicolon,
            TokenType::Eof,
        ];
        assert_tokens(input, expected);
    }

    #[test]
    fn test_identifiers() {
        let input = "mapping module_name proto_file_path _x1";
        let expected = vec![
            TokenType::Identifier("mapping".to_string()),
            TokenType::Identifier("module_name".to_string()),
            TokenType::Identifier("proto_file_path".to_string()),
            TokenType::Identifier("_x1".to_string()),
            TokenType::Eof,
        ];
        assert_tokens(input, expected);
    }

    #[test]
    fn test_strings_both_quotes() {
        let input = r#""foo/bar.proto" 'baz.proto' """#;
        let expected = vec![
            TokenType::String("foo/bar.proto".to_string()),
            TokenType::String("baz.proto".to_string()),
            TokenType::String(String::new()),
            TokenType::Eof,
        ];
        assert_tokens(input, expected);
    }

    #[test]
    fn test_string_escapes() {
        let input = r#""a\"b\'c\\d\n\t\101\x42""#;
        let expected = vec![
            TokenType::String("a\"b'c\\d\n\tAB".to_string()),
            TokenType::Eof,
        ];
        assert_tokens(input, expected);
    }

    #[test]
    fn test_escapes_must_form_utf8() {
        assert_tokens(
            r#""a\377.proto" "\303\251" "\xc3\xa9""#,
            vec![
                TokenType::InvalidUtf8,
                TokenType::String("é".to_string()),
                TokenType::String("é".to_string()),
                TokenType::Eof,
            ],
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert_tokens(
            "\"abc",
            vec![TokenType::UnterminatedString, TokenType::Eof],
        );
        assert_tokens(
            "\"abc\n\"",
            vec![TokenType::UnterminatedString, TokenType::UnterminatedString, TokenType::Eof],
        );
    }

    #[test]
    fn test_comments_and_whitespace() {
        let input = "# leading comment\nmapping { } # trailing";
        let mut lexer = Lexer::new(input);
        let token_types: Vec<TokenType> = lexer.lex().into_iter().map(|t| t.ttype).collect();

        let expected = vec![
            TokenType::Comment("leading comment".to_string()),
            TokenType::Whitespace,
            TokenType::Identifier("mapping".to_string()),
            TokenType::Whitespace,
            TokenType::LBrace,
            TokenType::Whitespace,
            TokenType::RBrace,
            TokenType::Whitespace,
            TokenType::Comment("trailing".to_string()),
            TokenType::Eof,
        ];
        assert_eq!(token_types, expected);
    }

    #[test]
    fn test_positions_are_byte_offsets() {
        let mut lexer = Lexer::new("é \"x\"");
        let tokens = lexer.lex();
        assert_eq!(tokens[0].ttype, TokenType::Unknown);
        assert_eq!((tokens[0].pos_start, tokens[0].pos_end), (0, 2));
        assert_eq!((tokens[2].pos_start, tokens[2].pos_end), (3, 6));
    }
}
