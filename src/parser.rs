use crate::ast::{MappingEntry, MappingFile};
use crate::error::ParseError;
use crate::lexer::{Lexer, Token, TokenType};
use crate::utils::get_line_and_column;
use miette::NamedSource;
use std::sync::Arc;

const FILE_FIELDS: &[&str] = &["mapping"];
const ENTRY_FIELDS: &[&str] = &["module_name", "proto_file_path"];

/// A recursive descent parser for the text-format module mappings file.
///
/// Only the subset of protobuf text format needed by the `ModuleMappings`
/// message is understood; any other field name is rejected.
#[derive(Debug)]
pub struct Parser<'a> {
    source: Arc<NamedSource<String>>,
    tokens: Vec<Token>,
    position: usize,
    source_text: &'a str,
}

impl<'a> Parser<'a> {
    pub fn new(source_text: &'a str) -> Self {
        Self::new_with_name(source_text, "module_mappings.asciipb".to_string())
    }

    pub fn new_with_name(source_text: &'a str, name: String) -> Self {
        let source = Arc::new(NamedSource::new(name, source_text.to_string()));
        let mut lexer = Lexer::new(source_text);
        let tokens: Vec<Token> = lexer
            .lex()
            .into_iter()
            .filter(|t| !matches!(t.ttype, TokenType::Whitespace | TokenType::Comment(_)))
            .collect();

        Self {
            source,
            tokens,
            position: 0,
            source_text,
        }
    }

    // === Main Parsing Methods ===

    /// File ::= { "mapping" [ ":" ] ( Message | MessageList ) [ Separator ] } EOF
    pub fn parse_file(&mut self) -> Result<MappingFile, ParseError> {
        let mut file = MappingFile::default();
        while !self.check(TokenType::Eof) {
            let name = self.parse_field_name()?;
            match name.as_str() {
                "mapping" => {
                    self.match_token(TokenType::Colon);
                    if self.match_token(TokenType::LBracket) {
                        file.mappings.extend(self.parse_mapping_list()?);
                    } else {
                        file.mappings.push(self.parse_mapping_entry()?);
                    }
                }
                _ => return self.err_unknown_field(&name, "ModuleMappings", FILE_FIELDS),
            }
            self.skip_separator();
        }
        Ok(file)
    }

    /// Message ::= ( "{" EntryFields "}" ) | ( "<" EntryFields ">" )
    fn parse_mapping_entry(&mut self) -> Result<MappingEntry, ParseError> {
        let start_token = self.current_token()?.clone();
        let close = match start_token.ttype {
            TokenType::LBrace => TokenType::RBrace,
            TokenType::LAngle => TokenType::RAngle,
            _ => return self.err_unexpected("'{' or '<'"),
        };
        self.advance();

        let mut entry = MappingEntry {
            pos_start: start_token.pos_start,
            ..MappingEntry::default()
        };
        while !self.check(close.clone()) {
            let name = self.parse_field_name()?;
            match name.as_str() {
                "module_name" => {
                    self.expect(TokenType::Colon)?;
                    entry.module_name = self.parse_string()?;
                }
                "proto_file_path" => {
                    self.expect(TokenType::Colon)?;
                    if self.match_token(TokenType::LBracket) {
                        entry.proto_file_paths.extend(self.parse_string_list()?);
                    } else {
                        entry.proto_file_paths.push(self.parse_string()?);
                    }
                }
                _ => return self.err_unknown_field(&name, "mapping", ENTRY_FIELDS),
            }
            self.skip_separator();
        }
        entry.pos_end = self.current_token()?.pos_end;
        self.expect(close)?;
        Ok(entry)
    }

    /// MessageList ::= "[" [ Message { "," Message } ] "]"   (opening bracket already consumed)
    fn parse_mapping_list(&mut self) -> Result<Vec<MappingEntry>, ParseError> {
        let mut entries = Vec::new();
        if self.match_token(TokenType::RBracket) {
            return Ok(entries);
        }
        loop {
            entries.push(self.parse_mapping_entry()?);
            if !self.match_token(TokenType::Comma) {
                break;
            }
        }
        self.expect(TokenType::RBracket)?;
        Ok(entries)
    }

    /// List ::= "[" [ String { "," String } ] "]"   (opening bracket already consumed)
    fn parse_string_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut values = Vec::new();
        if self.match_token(TokenType::RBracket) {
            return Ok(values);
        }
        loop {
            values.push(self.parse_string()?);
            if !self.match_token(TokenType::Comma) {
                break;
            }
        }
        self.expect(TokenType::RBracket)?;
        Ok(values)
    }

    /// String ::= StringLiteral { StringLiteral }
    ///
    /// Adjacent literals are concatenated, as in C.
    fn parse_string(&mut self) -> Result<String, ParseError> {
        let mut value = match &self.current_token()?.ttype {
            TokenType::String(s) => s.clone(),
            TokenType::UnterminatedString => return self.err_unterminated(),
            TokenType::InvalidUtf8 => return self.err_invalid_utf8(),
            _ => return self.err_unexpected("a string"),
        };
        self.advance();
        loop {
            match &self.current_token()?.ttype {
                TokenType::String(s) => {
                    value.push_str(s);
                    self.advance();
                }
                TokenType::UnterminatedString => return self.err_unterminated(),
                TokenType::InvalidUtf8 => return self.err_invalid_utf8(),
                _ => break,
            }
        }
        Ok(value)
    }

    fn parse_field_name(&mut self) -> Result<String, ParseError> {
        match &self.current_token()?.ttype {
            TokenType::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            TokenType::Eof => self.err_eof(),
            TokenType::UnterminatedString => self.err_unterminated(),
            _ => self.err_unexpected("a field name"),
        }
    }

    fn skip_separator(&mut self) {
        if !self.match_token(TokenType::Comma) {
            self.match_token(TokenType::Semicolon);
        }
    }

    // === Tokenizer Helper Methods ===

    fn current_token(&self) -> Result<&Token, ParseError> {
        self.tokens.get(self.position).ok_or_else(|| ParseError::UnexpectedEof {
            src: (*self.source).clone(),
            span: (self.source_text.len(), 0).into(),
        })
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn expect(&mut self, expected: TokenType) -> Result<(), ParseError> {
        if self.check(expected.clone()) {
            self.advance();
            return Ok(());
        }
        match self.current_token()?.ttype {
            TokenType::Eof => self.err_eof(),
            TokenType::UnterminatedString => self.err_unterminated(),
            _ => self.err_unexpected(&describe(&expected)),
        }
    }

    fn match_token(&mut self, ttype: TokenType) -> bool {
        if self.check(ttype) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn check(&self, ttype: TokenType) -> bool {
        if let Ok(token) = self.current_token() {
            std::mem::discriminant(&token.ttype) == std::mem::discriminant(&ttype)
        } else {
            false
        }
    }

    fn err_unexpected<T>(&self, expected: &str) -> Result<T, ParseError> {
        let token = self.current_token()?;
        if token.ttype == TokenType::Eof {
            return self.err_eof();
        }
        let (line, column) = get_line_and_column(self.source_text, token.pos_start);
        Err(ParseError::UnexpectedToken {
            src: (*self.source).clone(),
            span: (token.pos_start, token.pos_end - token.pos_start).into(),
            expected: expected.to_string(),
            line,
            column,
        })
    }

    fn err_eof<T>(&self) -> Result<T, ParseError> {
        Err(ParseError::UnexpectedEof {
            src: (*self.source).clone(),
            span: (self.source_text.len(), 0).into(),
        })
    }

    fn err_unterminated<T>(&self) -> Result<T, ParseError> {
        let token = self.current_token()?;
        let (line, column) = get_line_and_column(self.source_text, token.pos_start);
        Err(ParseError::UnterminatedString {
            src: (*self.source).clone(),
            span: (token.pos_start, token.pos_end - token.pos_start).into(),
            line,
            column,
        })
    }

    fn err_invalid_utf8<T>(&self) -> Result<T, ParseError> {
        let token = self.current_token()?;
        let (line, column) = get_line_and_column(self.source_text, token.pos_start);
        Err(ParseError::InvalidUtf8 {
            src: (*self.source).clone(),
            span: (token.pos_start, token.pos_end - token.pos_start).into(),
            line,
            column,
        })
    }

    /// Reports a field name that was just consumed.
    fn err_unknown_field<T>(
        &self,
        name: &str,
        context: &str,
        allowed: &[&str],
    ) -> Result<T, ParseError> {
        let token = &self.tokens[self.position.saturating_sub(1)];
        let (line, column) = get_line_and_column(self.source_text, token.pos_start);
        Err(ParseError::UnknownField {
            src: (*self.source).clone(),
            span: (token.pos_start, token.pos_end - token.pos_start).into(),
            name: name.to_string(),
            context: context.to_string(),
            allowed: allowed
                .iter()
                .map(|f| format!("`{f}`"))
                .collect::<Vec<_>>()
                .join(", "),
            line,
            column,
        })
    }
}

fn describe(ttype: &TokenType) -> String {
    match ttype {
        TokenType::LBrace => "'{'".to_string(),
        TokenType::RBrace => "'}'".to_string(),
        TokenType::LBracket => "'['".to_string(),
        TokenType::RBracket => "']'".to_string(),
        TokenType::LAngle => "'<'".to_string(),
        TokenType::RAngle => "'>'".to_string(),
        TokenType::Colon => "':'".to_string(),
        TokenType::Comma => "','".to_string(),
        TokenType::Semicolon => "';'".to_string(),
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Report;

    fn parse_ok(source: &str) -> MappingFile {
        let mut parser = Parser::new_with_name(source, "test.asciipb".to_string());
        match parser.parse_file() {
            Ok(file) => file,
            Err(err) => {
                let report = Report::from(err);
                panic!("{:#}", report);
            }
        }
    }

    fn parse_err(source: &str) -> ParseError {
        let mut parser = Parser::new(source);
        match parser.parse_file() {
            Ok(file) => panic!("Expected a ParseError, but got {file:?}"),
            Err(err) => err,
        }
    }

    #[test]
    fn test_empty_file() {
        assert!(parse_ok("").mappings.is_empty());
        assert!(parse_ok("  # nothing here\n").mappings.is_empty());
    }

    #[test]
    fn test_single_mapping() {
        let file = parse_ok(
            r#"
            mapping {
              module_name: "Foo"
              proto_file_path: "foo/a.proto"
              proto_file_path: "foo/b.proto"
            }
            "#,
        );
        assert_eq!(file.mappings.len(), 1);
        assert_eq!(file.mappings[0].module_name, "Foo");
        assert_eq!(
            file.mappings[0].proto_file_paths,
            vec!["foo/a.proto".to_string(), "foo/b.proto".to_string()]
        );
    }

    #[test]
    fn test_alternate_syntax() {
        let file = parse_ok(
            r#"mapping: < module_name: 'Bar'; proto_file_path: ["x.proto", "y" ".proto"] >,
               mapping { module_name: "Baz", proto_file_path: [] }"#,
        );
        assert_eq!(file.mappings.len(), 2);
        assert_eq!(file.mappings[0].module_name, "Bar");
        assert_eq!(
            file.mappings[0].proto_file_paths,
            vec!["x.proto".to_string(), "y.proto".to_string()]
        );
        assert_eq!(file.mappings[1].module_name, "Baz");
        assert!(file.mappings[1].proto_file_paths.is_empty());
    }

    #[test]
    fn test_mapping_list_syntax() {
        let file = parse_ok(
            r#"mapping: [
                 { module_name: "A" proto_file_path: "a.proto" },
                 < module_name: "B" proto_file_path: "b.proto" >
               ]
               mapping [ ]
               mapping { module_name: "C" proto_file_path: "c.proto" }"#,
        );
        let names: Vec<&str> = file
            .mappings
            .iter()
            .map(|entry| entry.module_name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_mapping_list_needs_closing_bracket() {
        assert!(matches!(
            parse_err(r#"mapping: [ { module_name: "A" } { module_name: "B" } ]"#),
            ParseError::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn test_entry_span_covers_block() {
        let source = "mapping { module_name: \"A\" }";
        let file = parse_ok(source);
        assert_eq!(file.mappings[0].pos_start, 8);
        assert_eq!(file.mappings[0].pos_end, source.len());
    }

    #[test]
    fn test_module_name_last_wins() {
        let file = parse_ok(r#"mapping { module_name: "A" module_name: "B" }"#);
        assert_eq!(file.mappings[0].module_name, "B");
    }

    #[test]
    fn test_unknown_top_level_field() {
        match parse_err(r#"mappings { }"#) {
            ParseError::UnknownField { name, context, .. } => {
                assert_eq!(name, "mappings");
                assert_eq!(context, "ModuleMappings");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_entry_field() {
        match parse_err("mapping {\n  module: \"A\"\n}") {
            ParseError::UnknownField {
                name, line, column, ..
            } => {
                assert_eq!(name, "module");
                assert_eq!((line, column), (2, 3));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_colon_for_scalar() {
        assert!(matches!(
            parse_err(r#"mapping { module_name "A" }"#),
            ParseError::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn test_missing_closing_brace() {
        assert!(matches!(
            parse_err(r#"mapping { module_name: "A""#),
            ParseError::UnexpectedEof { .. }
        ));
    }

    #[test]
    fn test_unterminated_string() {
        assert!(matches!(
            parse_err("mapping { module_name: \"A }"),
            ParseError::UnterminatedString { .. }
        ));
    }

    #[test]
    fn test_invalid_utf8_string() {
        let source = "mapping {\n  module_name: \"M\"\n  proto_file_path: \"a\\377.proto\"\n}";
        match parse_err(source) {
            ParseError::InvalidUtf8 { span, line, column, .. } => {
                assert_eq!((line, column), (3, 20));
                assert_eq!(span.len(), "\"a\\377.proto\"".len());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_in_concatenation() {
        assert!(matches!(
            parse_err(r#"mapping { module_name: "M" "\xff" }"#),
            ParseError::InvalidUtf8 { .. }
        ));
    }

    #[test]
    fn test_non_string_value() {
        match parse_err("mapping { proto_file_path: foo }") {
            ParseError::UnexpectedToken { expected, .. } => assert_eq!(expected, "a string"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
