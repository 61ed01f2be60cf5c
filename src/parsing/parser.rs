use std::iter::Peekable;
use std::str::Chars;

use crate::command::arguments::NamedArgs;
use crate::core::error::ParseError;
use crate::core::value::Value;

const MALFORMED: &str = "malformed command";

/// One input line split into the command name, its positional options and
/// its named arguments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedLine {
    /// First entry is the command name, the rest are positional options
    pub tokens: Vec<String>,
    pub named: NamedArgs,
}

impl ParsedLine {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.named.is_empty()
    }

    /// Command name, positional options and named arguments, if the line has
    /// a command
    pub fn into_command(self) -> Option<(String, Vec<String>, NamedArgs)> {
        let mut tokens = self.tokens.into_iter();
        let name = tokens.next()?;
        Some((name, tokens.collect(), self.named))
    }
}

/// Parse one raw line.
///
/// Tokens are separated by whitespace. `"..."` and `'...'` group text, and
/// inside double quotes `\"`, `\\`, `\n` and `\t` are escapes. Any other
/// backslash is kept as typed. A token of the form `name=value` (with an
/// unquoted `name`) is a named argument whose value is typed: quoted text is
/// a string, `true`/`false` a bool, then integer, then decimal, else string.
pub fn parse_command(line: &str) -> Result<ParsedLine, ParseError> {
    let mut scanner = Scanner::new(line);
    let raw_tokens = scanner.scan();
    let mut errors = scanner.errors;

    let mut parsed = ParsedLine::default();
    for raw in raw_tokens {
        match raw.split {
            Some(split) if !raw.quote_before_split => {
                let (key, rest) = raw.text.split_at(split);
                let value = &rest[1..];

                if !is_identifier(key) {
                    errors.push(format!("invalid argument name: '{}'", key));
                    continue;
                }
                if value.is_empty() && !raw.value_quoted {
                    errors.push(format!("missing value for argument: {}", key));
                    continue;
                }
                if parsed.named.contains_key(key) {
                    errors.push(format!("duplicate argument: {}", key));
                    continue;
                }
                parsed
                    .named
                    .insert(key.to_string(), typed_value(value, raw.value_quoted));
            }
            _ => parsed.tokens.push(raw.text),
        }
    }

    if parsed.tokens.is_empty() && !parsed.named.is_empty() {
        errors.push("missing command name".to_string());
    }

    if errors.is_empty() {
        Ok(parsed)
    } else {
        Err(ParseError {
            message: MALFORMED.to_string(),
            errors,
        })
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn typed_value(raw: &str, quoted: bool) -> Value {
    if quoted {
        return Value::Str(raw.to_string());
    }
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Int(i);
    }
    let looks_decimal = raw.chars().any(|c| c.is_ascii_digit())
        && raw.chars().all(|c| c.is_ascii_digit() || "+-.eE".contains(c));
    if looks_decimal {
        if let Ok(f) = raw.parse::<f64>() {
            return Value::Float(f);
        }
    }
    Value::Str(raw.to_string())
}

#[derive(Debug, Default)]
struct RawToken {
    text: String,
    /// Byte offset of the first unquoted `=` in `text`
    split: Option<usize>,
    quote_before_split: bool,
    value_quoted: bool,
}

struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
    errors: Vec<String>,
}

impl<'a> Scanner<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            chars: line.chars().peekable(),
            errors: Vec::new(),
        }
    }

    fn scan(&mut self) -> Vec<RawToken> {
        let mut tokens = Vec::new();
        loop {
            while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
            if self.chars.peek().is_none() {
                break;
            }
            tokens.push(self.token());
        }
        tokens
    }

    fn token(&mut self) -> RawToken {
        let mut token = RawToken::default();

        while let Some(c) = self.chars.next_if(|c| !c.is_whitespace()) {
            match c {
                '"' | '\'' => {
                    if token.split.is_none() {
                        token.quote_before_split = true;
                    } else {
                        token.value_quoted = true;
                    }
                    self.quoted(c, &mut token.text);
                }
                '=' if token.split.is_none() && !token.quote_before_split => {
                    token.split = Some(token.text.len());
                    token.text.push(c);
                }
                _ => token.text.push(c),
            }
        }

        token
    }

    /// Consume up to the closing `quote`, appending the contents to `out`.
    fn quoted(&mut self, quote: char, out: &mut String) {
        let start_len = out.len();
        while let Some(c) = self.chars.next() {
            if c == quote {
                return;
            }
            if c == '\\' && quote == '"' {
                match self.chars.next() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(escaped @ ('"' | '\\')) => out.push(escaped),
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => break,
                }
                continue;
            }
            out.push(c);
        }
        self.errors.push(format!(
            "unterminated quote: {}{}",
            quote,
            &out[start_len..]
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> Vec<String> {
        parse_command(line).unwrap().tokens
    }

    #[test]
    fn test_blank_line_is_empty() {
        assert!(parse_command("").unwrap().is_empty());
        assert!(parse_command("   \t ").unwrap().is_empty());
    }

    #[test]
    fn test_whitespace_splits_tokens() {
        assert_eq!(tokens("  login  jan   secret "), ["login", "jan", "secret"]);
    }

    #[test]
    fn test_quotes_group_words() {
        assert_eq!(
            tokens(r#"rmes "two words" 'single quoted'"#),
            ["rmes", "two words", "single quoted"]
        );
    }

    #[test]
    fn test_escapes_inside_double_quotes() {
        assert_eq!(tokens(r#"say "a \"b\"\tc""#), ["say", "a \"b\"\tc"]);
    }

    #[test]
    fn test_named_values_are_typed() {
        let parsed = parse_command(r#"gmes limit=5 unread=true ratio=0.5 who=ala note="12""#).unwrap();
        assert_eq!(parsed.tokens, ["gmes"]);
        assert_eq!(parsed.named["limit"], Value::Int(5));
        assert_eq!(parsed.named["unread"], Value::Bool(true));
        assert_eq!(parsed.named["ratio"], Value::Float(0.5));
        assert_eq!(parsed.named["who"], Value::Str("ala".into()));
        assert_eq!(parsed.named["note"], Value::Str("12".into()));
    }

    #[test]
    fn test_named_order_preserved() {
        let parsed = parse_command("x b=1 a=2").unwrap();
        let keys: Vec<_> = parsed.named.keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn test_quoted_equals_stays_positional() {
        assert_eq!(tokens(r#"rmes "a=b""#), ["rmes", "a=b"]);
    }

    #[test]
    fn test_empty_quoted_value_allowed() {
        let parsed = parse_command(r#"grades subject="""#).unwrap();
        assert_eq!(parsed.named["subject"], Value::Str(String::new()));
    }

    #[test]
    fn test_collects_all_errors() {
        let err = parse_command("gmes 1x=2 limit= limit=1 limit=2 \"open").unwrap_err();
        assert_eq!(err.message, MALFORMED);
        assert_eq!(
            err.errors,
            [
                "unterminated quote: \"open",
                "invalid argument name: '1x'",
                "missing value for argument: limit",
                "duplicate argument: limit",
            ]
        );
    }

    #[test]
    fn test_named_only_line_needs_command() {
        let err = parse_command("limit=3").unwrap_err();
        assert_eq!(err.errors, ["missing command name"]);
    }

    #[test]
    fn test_into_command() {
        let parsed = parse_command("login jan secret remember=true").unwrap();
        let (name, options, named) = parsed.into_command().unwrap();
        assert_eq!(name, "login");
        assert_eq!(options, ["jan", "secret"]);
        assert_eq!(named["remember"], Value::Bool(true));
        assert!(ParsedLine::default().into_command().is_none());
    }

    #[test]
    fn test_backslash_outside_quotes_is_literal() {
        assert_eq!(tokens(r"login jan pa\ss"), ["login", "jan", r"pa\ss"]);
        assert_eq!(tokens(r"open C:\temp\"), ["open", r"C:\temp\"]);
        assert_eq!(tokens(r"say 'a\b'"), ["say", r"a\b"]);
    }

    #[test]
    fn test_unknown_escape_keeps_backslash() {
        assert_eq!(tokens(r#"say "a\xb" "c\\d""#), ["say", r"a\xb", r"c\d"]);
    }
}
