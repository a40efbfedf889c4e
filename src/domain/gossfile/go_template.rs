//! Go `text/template` actions lowered onto minijinja.
//!
//! Each `{{ ... }}` action is rewritten into a minijinja tag written with
//! control-character delimiters. Text outside actions is copied verbatim, so
//! `{%`, `{#` and other Jinja markers in a gossfile are plain text.

use std::collections::BTreeMap;

use minijinja::syntax::SyntaxConfig;
use minijinja::value::{Rest, ValueKind};
use minijinja::{Environment, Error, ErrorKind, Value};

const BLOCK: (&str, &str) = ("\u{1}%", "%\u{1}");
const VARIABLE: (&str, &str) = ("\u{1}{", "}\u{1}");
const COMMENT: (&str, &str) = ("\u{1}#", "#\u{1}");

/// The root dot: everything a gossfile template can see.
const ROOT: &str = "{\"Vars\": Vars, \"Env\": Env}";

/// Go template functions and the minijinja globals implementing them.
const FUNCTIONS: &[(&str, &str)] = &[
    ("and", "go_and"),
    ("or", "go_or"),
    ("not", "go_not"),
    ("eq", "go_eq"),
    ("ne", "go_ne"),
    ("lt", "go_lt"),
    ("le", "go_le"),
    ("gt", "go_gt"),
    ("ge", "go_ge"),
    ("len", "go_len"),
    ("index", "go_index"),
    ("print", "go_print"),
    ("printf", "go_printf"),
    ("println", "go_println"),
    ("getEnv", "go_getenv"),
    ("toUpper", "go_upper"),
    ("toLower", "go_lower"),
    ("mkSlice", "go_slice"),
];

pub(crate) fn syntax() -> Result<SyntaxConfig, Error> {
    SyntaxConfig::builder()
        .block_delimiters(BLOCK.0, BLOCK.1)
        .variable_delimiters(VARIABLE.0, VARIABLE.1)
        .comment_delimiters(COMMENT.0, COMMENT.1)
        .build()
}

/// Install the Go builtins plus the goss helpers. `getEnv` reads `env`.
pub(crate) fn register_functions(target: &mut Environment<'_>, env: BTreeMap<String, String>) {
    target.add_function("go_and", and);
    target.add_function("go_or", or);
    target.add_function("go_not", |value: Value| !value.is_true());
    target.add_function("go_eq", |a: Value, rest: Rest<Value>| rest.iter().any(|b| *b == a));
    target.add_function("go_ne", |a: Value, b: Value| a != b);
    target.add_function("go_lt", |a: Value, b: Value| a < b);
    target.add_function("go_le", |a: Value, b: Value| a <= b);
    target.add_function("go_gt", |a: Value, b: Value| a > b);
    target.add_function("go_ge", |a: Value, b: Value| a >= b);
    target.add_function("go_len", len);
    target.add_function("go_index", index);
    target.add_function("go_print", print);
    target.add_function("go_printf", printf);
    target.add_function("go_println", println);
    target.add_function("go_getenv", move |name: String, default: Option<String>| {
        env.get(&name).cloned().or(default).unwrap_or_default()
    });
    target.add_function("go_upper", |text: String| text.to_uppercase());
    target.add_function("go_lower", |text: String| text.to_lowercase());
    target.add_function("go_slice", |items: Rest<Value>| items.0.into_iter().collect::<Value>());
    target.add_function("go_values", range_values);
    target.add_function("go_pairs", range_pairs);
}

fn and(args: Rest<Value>) -> Value {
    args.iter().find(|v| !v.is_true()).or(args.last()).cloned().unwrap_or_default()
}

fn or(args: Rest<Value>) -> Value {
    args.iter().find(|v| v.is_true()).or(args.last()).cloned().unwrap_or_default()
}

fn len(value: Value) -> Result<usize, Error> {
    value.len().ok_or_else(|| {
        Error::new(ErrorKind::InvalidOperation, format!("len of {} value", value.kind()))
    })
}

fn index(value: Value, keys: Rest<Value>) -> Result<Value, Error> {
    keys.iter().try_fold(value, |item, key| item.get_item(key))
}

/// `fmt.Sprint`: a space goes between operands when neither is a string.
fn print(args: Rest<Value>) -> String {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 && args[i - 1].kind() != ValueKind::String && arg.kind() != ValueKind::String {
            out.push(' ');
        }
        out.push_str(&arg.to_string());
    }
    out
}

fn println(args: Rest<Value>) -> String {
    let mut out = args.iter().map(|arg| arg.to_string()).collect::<Vec<_>>().join(" ");
    out.push('\n');
    out
}

/// `fmt.Sprintf` for the `%s`, `%v`, `%d`, `%q` and `%%` verbs.
fn printf(format: String, args: Rest<Value>) -> String {
    let mut out = String::with_capacity(format.len());
    let mut args = args.0.into_iter();
    let mut chars = format.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some(verb) => match args.next() {
                Some(arg) => out.push_str(&format_verb(verb, &arg)),
                None => out.push_str(&format!("%!{}(MISSING)", verb)),
            },
            None => out.push_str("%!(NOVERB)"),
        }
    }
    out
}

fn format_verb(verb: char, arg: &Value) -> String {
    match verb {
        'd' => match arg.as_i64() {
            Some(n) => n.to_string(),
            None => format!("%!d({})", arg),
        },
        'q' => format!("{:?}", arg.to_string()),
        _ => arg.to_string(),
    }
}

/// Key/element pairs in Go `range` order: sorted keys for maps, indices for lists.
fn entries(value: &Value) -> Result<Vec<(Value, Value)>, Error> {
    if value.kind() == ValueKind::Map {
        let mut keys: Vec<Value> = value.try_iter()?.collect();
        keys.sort();
        keys.into_iter()
            .map(|key| {
                let item = value.get_item(&key)?;
                Ok::<_, Error>((key, item))
            })
            .collect()
    } else {
        Ok(value.try_iter()?.enumerate().map(|(i, item)| (Value::from(i), item)).collect())
    }
}

fn range_values(value: Value) -> Result<Value, Error> {
    Ok(entries(&value)?.into_iter().map(|(_, item)| item).collect())
}

fn range_pairs(value: Value) -> Result<Value, Error> {
    let pairs = entries(&value)?
        .into_iter()
        .map(|(key, item)| [key, item].into_iter().collect::<Value>());
    Ok(pairs.collect())
}

/// Rewrite Go template source into minijinja source using [`syntax`].
pub(crate) fn translate(source: &str) -> Result<String, String> {
    if source.contains('\u{1}') {
        return Err("template contains a U+0001 control character".into());
    }

    let mut translator = Translator::default();
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let mut body = &rest[start + 2..];

        if let Some(after) = body.strip_prefix('-').filter(|s| s.starts_with(is_space)) {
            out.truncate(out.trim_end_matches(is_space).len());
            body = after;
        }

        let end = action_end(body)?;
        let mut action = &body[..end];
        rest = &body[end + 2..];

        if let Some(before) = action.strip_suffix('-').filter(|s| s.ends_with(is_space)) {
            action = before;
            rest = rest.trim_start_matches(is_space);
        }

        out.push_str(&translator.action(action.trim())?);
    }

    out.push_str(rest);
    translator.finish()?;
    Ok(out)
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Byte offset of the `}}` closing the action that starts `body`.
fn action_end(body: &str) -> Result<usize, String> {
    let trimmed = body.trim_start();
    if trimmed.starts_with("/*") {
        let offset = body.len() - trimmed.len();
        let close = trimmed.find("*/").ok_or("unclosed comment")?;
        let tail = offset + close + 2;
        return body[tail..].find("}}").map(|i| tail + i).ok_or_else(|| "unclosed action".into());
    }

    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        match quote {
            Some(_) if escaped => escaped = false,
            Some(q) if c == '\\' && q != '`' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if matches!(c, '"' | '`' | '\'') => quote = Some(c),
            None if body[i..].starts_with("}}") => return Ok(i),
            None => {}
        }
    }
    Err("unclosed action".into())
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FrameKind {
    If,
    Range,
    With,
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    binds_dot: bool,
}

#[derive(Debug, Default)]
struct Translator {
    frames: Vec<Frame>,
    /// Expressions `.` refers to inside `range` and `with`; empty at the root.
    dots: Vec<String>,
    fresh: usize,
}

impl Translator {
    fn action(&mut self, body: &str) -> Result<String, String> {
        if body.starts_with("/*") {
            return Ok(String::new());
        }

        let tokens = tokenize(body)?;
        let keyword = match tokens.first() {
            Some(Token::Ident(word)) => word.as_str(),
            _ => "",
        };
        let rest = tokens.get(1..).unwrap_or_default();

        match keyword {
            "if" => {
                let condition = self.expression(rest)?;
                self.frames.push(Frame { kind: FrameKind::If, binds_dot: false });
                Ok(block(&format!("if {}", condition)))
            }
            "else" => self.otherwise(rest),
            "end" => self.end(rest),
            "range" => self.range(rest),
            "with" => self.with(rest),
            "define" | "template" | "block" | "break" | "continue" => {
                Err(format!("{{{{{}}}}} is not supported", keyword))
            }
            _ => self.statement(&tokens),
        }
    }

    fn finish(&self) -> Result<(), String> {
        match self.frames.is_empty() {
            true => Ok(()),
            false => Err("unexpected EOF: missing {{end}}".into()),
        }
    }

    fn dot(&self) -> Option<&str> {
        self.dots.last().map(String::as_str)
    }

    fn expression(&self, tokens: &[Token]) -> Result<String, String> {
        Parser { tokens, pos: 0, dot: self.dot() }.parse()
    }

    fn statement(&mut self, tokens: &[Token]) -> Result<String, String> {
        if let [Token::Var(name, fields), Token::Declare | Token::Assign, value @ ..] = tokens {
            if !fields.is_empty() {
                return Err(format!("cannot assign to a field of ${}", name));
            }
            let value = self.expression(value)?;
            return Ok(block(&format!("set {} = {}", var_name(name)?, value)));
        }
        Ok(format!("{} {} {}", VARIABLE.0, self.expression(tokens)?, VARIABLE.1))
    }

    fn otherwise(&mut self, rest: &[Token]) -> Result<String, String> {
        let frame = self.frames.last_mut().ok_or("unexpected {{else}}")?;

        if matches!(rest.first(), Some(Token::Ident(word)) if word == "if") {
            if frame.kind != FrameKind::If {
                return Err("{{else if}} is only supported after {{if}}".into());
            }
            let condition = self.expression(&rest[1..])?;
            return Ok(block(&format!("elif {}", condition)));
        }
        if !rest.is_empty() {
            return Err("unexpected tokens after {{else}}".into());
        }

        if frame.binds_dot {
            frame.binds_dot = false;
            self.dots.pop();
        }
        Ok(block("else"))
    }

    fn end(&mut self, rest: &[Token]) -> Result<String, String> {
        if !rest.is_empty() {
            return Err("unexpected tokens after {{end}}".into());
        }
        let frame = self.frames.pop().ok_or("unexpected {{end}}")?;
        if frame.binds_dot {
            self.dots.pop();
        }
        Ok(match frame.kind {
            FrameKind::If => block("endif"),
            FrameKind::Range => block("endfor"),
            FrameKind::With => format!("{}{}", block("endif"), block("endwith")),
        })
    }

    fn range(&mut self, rest: &[Token]) -> Result<String, String> {
        let (header, dot) = match rest {
            [Token::Var(key, kf), Token::Comma, Token::Var(item, vf), Token::Declare, value @ ..]
                if kf.is_empty() && vf.is_empty() =>
            {
                let (key, item) = (var_name(key)?, var_name(item)?);
                let value = self.expression(value)?;
                (format!("for {}, {} in go_pairs({})", key, item, value), item)
            }
            [Token::Var(item, fields), Token::Declare, value @ ..] if fields.is_empty() => {
                let item = var_name(item)?;
                (format!("for {} in go_values({})", item, self.expression(value)?), item)
            }
            _ => {
                let item = self.fresh_dot();
                (format!("for {} in go_values({})", item, self.expression(rest)?), item)
            }
        };

        self.dots.push(dot);
        self.frames.push(Frame { kind: FrameKind::Range, binds_dot: true });
        Ok(block(&header))
    }

    fn with(&mut self, rest: &[Token]) -> Result<String, String> {
        let (name, value) = match rest {
            [Token::Var(name, fields), Token::Declare, value @ ..] if fields.is_empty() => {
                (var_name(name)?, self.expression(value)?)
            }
            _ => (self.fresh_dot(), self.expression(rest)?),
        };

        let opening =
            format!("{}{}", block(&format!("with {} = {}", name, value)), block(&format!("if {}", name)));
        self.dots.push(name);
        self.frames.push(Frame { kind: FrameKind::With, binds_dot: true });
        Ok(opening)
    }

    fn fresh_dot(&mut self) -> String {
        self.fresh += 1;
        format!("_dot{}", self.fresh)
    }
}

fn block(body: &str) -> String {
    format!("{} {} {}", BLOCK.0, body, BLOCK.1)
}

/// `$name` as a minijinja identifier. `$` alone is the root and cannot be bound.
fn var_name(name: &str) -> Result<String, String> {
    match name {
        "" => Err("cannot assign to $".into()),
        _ => Ok(format!("var_{}", name)),
    }
}

fn chain(base: String, fields: &[String]) -> String {
    fields.iter().fold(base, |expr, field| format!("{}.{}", expr, field))
}

fn root_chain(fields: &[String]) -> String {
    match fields {
        [] => ROOT.to_string(),
        _ => fields.join("."),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    /// A string or number, already in minijinja syntax.
    Literal(String),
    Ident(String),
    /// `.A.B`; empty for a bare `.`.
    Field(Vec<String>),
    /// Field access directly following `)`.
    Chain(Vec<String>),
    /// `$name.A.B`; empty name for `$`.
    Var(String, Vec<String>),
    Pipe,
    LParen,
    RParen,
    Declare,
    Assign,
    Comma,
}

fn tokenize(body: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = body.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match c {
            c if c.is_whitespace() => i += 1,
            '|' => {
                tokens.push(Token::Pipe);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            ':' if next == Some('=') => {
                tokens.push(Token::Declare);
                i += 2;
            }
            '=' => {
                tokens.push(Token::Assign);
                i += 1;
            }
            '"' => {
                let end = closing_quote(&chars, i)?;
                tokens.push(Token::Literal(chars[i..=end].iter().collect()));
                i = end + 1;
            }
            '`' => {
                let end = closing_quote(&chars, i)?;
                let raw: String = chars[i + 1..end].iter().collect();
                tokens.push(Token::Literal(string_literal(&raw)));
                i = end + 1;
            }
            '\'' => return Err("character constants are not supported".into()),
            '.' if next.is_some_and(|n| n.is_ascii_digit()) => {
                let (number, end) = take_number(&chars, i);
                tokens.push(Token::Literal(number));
                i = end;
            }
            '.' => {
                let (fields, end) = take_fields(&chars, i);
                let follows_paren = i > 0 && chars[i - 1] == ')';
                tokens.push(if follows_paren { Token::Chain(fields) } else { Token::Field(fields) });
                i = end;
            }
            '$' => {
                let (name, end) = take_ident(&chars, i + 1);
                let (fields, end) = take_fields(&chars, end);
                tokens.push(Token::Var(name, fields));
                i = end;
            }
            c if c.is_ascii_digit()
                || (matches!(c, '-' | '+') && next.is_some_and(|n| n.is_ascii_digit())) =>
            {
                let (number, end) = take_number(&chars, i);
                tokens.push(Token::Literal(number));
                i = end;
            }
            c if c.is_alphabetic() || c == '_' => {
                let (ident, end) = take_ident(&chars, i);
                tokens.push(Token::Ident(ident));
                i = end;
            }
            other => return Err(format!("unexpected {:?} in action", other)),
        }
    }

    Ok(tokens)
}

fn closing_quote(chars: &[char], start: usize) -> Result<usize, String> {
    let quote = chars[start];
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' if quote != '`' => i += 2,
            c if c == quote => return Ok(i),
            _ => i += 1,
        }
    }
    Err("unterminated quoted string".into())
}

fn take_ident(chars: &[char], start: usize) -> (String, usize) {
    let mut end = start;
    while end < chars.len() && (chars[end].is_alphanumeric() || chars[end] == '_') {
        end += 1;
    }
    (chars[start..end].iter().collect(), end)
}

/// Consume `.A.B` starting at a `.`. A lone `.` yields no fields.
fn take_fields(chars: &[char], start: usize) -> (Vec<String>, usize) {
    let mut fields = Vec::new();
    let mut i = start;
    while i < chars.len() && chars[i] == '.' {
        let (name, end) = take_ident(chars, i + 1);
        if name.is_empty() {
            if fields.is_empty() && i == start {
                i += 1;
            }
            break;
        }
        fields.push(name);
        i = end;
    }
    (fields, i)
}

fn take_number(chars: &[char], start: usize) -> (String, usize) {
    let mut end = start + 1;
    while end < chars.len() && (chars[end].is_ascii_alphanumeric() || matches!(chars[end], '.' | '_')) {
        end += 1;
    }
    (chars[start..end].iter().collect(), end)
}

fn string_literal(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Pipelines: `cmd | fn args` passes the left value as the last argument.
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    dot: Option<&'a str>,
}

impl<'a> Parser<'a> {
    fn parse(mut self) -> Result<String, String> {
        let expr = self.pipeline()?;
        match self.peek() {
            None => Ok(expr),
            Some(token) => Err(format!("unexpected {:?} in action", token)),
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, token: &Token) -> bool {
        let found = self.peek() == Some(token);
        if found {
            self.pos += 1;
        }
        found
    }

    fn at_command_end(&self) -> bool {
        matches!(self.peek(), None | Some(Token::Pipe) | Some(Token::RParen))
    }

    fn pipeline(&mut self) -> Result<String, String> {
        let mut value = self.command(None)?;
        while self.eat(&Token::Pipe) {
            value = self.command(Some(value))?;
        }
        Ok(value)
    }

    fn command(&mut self, piped: Option<String>) -> Result<String, String> {
        if let Some(Token::Ident(name)) = self.peek() {
            if is_constant(name) {
                return self.operand_command(piped);
            }
            let function = function_name(name)?;
            self.pos += 1;
            let mut args = Vec::new();
            while !self.at_command_end() {
                args.push(self.operand()?);
            }
            args.extend(piped);
            return Ok(format!("{}({})", function, args.join(", ")));
        }

        self.operand_command(piped)
    }

    /// A command that is a single operand rather than a function call.
    fn operand_command(&mut self, piped: Option<String>) -> Result<String, String> {
        if self.at_command_end() {
            return Err("missing value for command".into());
        }
        let value = self.operand()?;
        if piped.is_some() || !self.at_command_end() {
            return Err(format!("can't give argument to non-function {}", value));
        }
        Ok(value)
    }

    fn operand(&mut self) -> Result<String, String> {
        let token = self.peek().ok_or("missing operand")?;
        self.pos += 1;

        let mut value = match token {
            Token::Literal(text) => text.clone(),
            Token::Ident(name) => match name.as_str() {
                "true" | "false" => name.clone(),
                "nil" => "none".to_string(),
                _ => format!("{}()", function_name(name)?),
            },
            Token::Field(fields) => match self.dot {
                None => root_chain(fields),
                Some(dot) => chain(dot.to_string(), fields),
            },
            Token::Var(name, fields) if name.is_empty() => root_chain(fields),
            Token::Var(name, fields) => chain(var_name(name)?, fields),
            Token::LParen => {
                let inner = self.pipeline()?;
                if !self.eat(&Token::RParen) {
                    return Err("unclosed left paren".into());
                }
                format!("({})", inner)
            }
            other => return Err(format!("unexpected {:?} in operand", other)),
        };

        while let Some(Token::Chain(fields)) = self.peek() {
            value = chain(value, fields);
            self.pos += 1;
        }
        Ok(value)
    }
}

fn is_constant(name: &str) -> bool {
    matches!(name, "true" | "false" | "nil")
}

fn function_name(name: &str) -> Result<&'static str, String> {
    FUNCTIONS
        .iter()
        .find(|(go, _)| *go == name)
        .map(|(_, registered)| *registered)
        .ok_or_else(|| format!("function \"{}\" not defined", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(expr: &str) -> String {
        format!("\u{1}{{ {} }}\u{1}", expr)
    }

    #[test]
    fn text_outside_actions_is_copied_verbatim() {
        let source = "command:\n  echo '{#' '{%' '#}':\n    exit-status: 0\n";
        assert_eq!(translate(source).unwrap(), source);
    }

    #[test]
    fn field_access_follows_the_dot() {
        assert_eq!(translate("{{ .Vars.name }}").unwrap(), var("Vars.name"));
        assert_eq!(translate("{{$.Env.HOME}}").unwrap(), var("Env.HOME"));
        assert_eq!(translate("{{ . }}").unwrap(), var(ROOT));
    }

    #[test]
    fn functions_take_prefix_arguments_and_piped_values_last() {
        assert_eq!(
            translate("{{ eq .Env.ROLE \"web\" }}").unwrap(),
            var("go_eq(Env.ROLE, \"web\")")
        );
        assert_eq!(
            translate("{{ .Vars.x | printf \"%s-%d\" 3 }}").unwrap(),
            var("go_printf(\"%s-%d\", 3, Vars.x)")
        );
        assert_eq!(
            translate("{{ (index .Vars `a b`).c }}").unwrap(),
            var("(go_index(Vars, \"a b\")).c")
        );
    }

    #[test]
    fn trim_markers_remove_adjacent_whitespace() {
        assert_eq!(translate("a \n {{- 1 -}} \n b").unwrap(), format!("a{}b", var("1")));
        assert_eq!(translate("{{-3}}").unwrap(), var("-3"));
    }

    #[test]
    fn comments_and_declarations_produce_no_output_tag() {
        assert_eq!(translate("x{{/* }} note */}}y").unwrap(), "xy");
        assert_eq!(translate("{{ $s := .Vars.a }}").unwrap(), block("set var_s = Vars.a"));
    }

    #[test]
    fn range_rebinds_the_dot_until_else() {
        let translated = translate("{{ range .Vars.xs }}{{ .name }}{{ else }}{{ .Vars.y }}{{ end }}");
        assert_eq!(
            translated.unwrap(),
            format!(
                "{}{}{}{}{}",
                block("for _dot1 in go_values(Vars.xs)"),
                var("_dot1.name"),
                block("else"),
                var("Vars.y"),
                block("endfor")
            )
        );
    }

    #[test]
    fn unbalanced_control_flow_is_rejected() {
        assert!(translate("{{ if true }}x").unwrap_err().contains("missing {{end}}"));
        assert!(translate("{{ end }}").unwrap_err().contains("unexpected {{end}}"));
        assert!(translate("{{ .Vars.x").unwrap_err().contains("unclosed action"));
        assert!(translate("{{ template \"x\" }}").is_err());
        assert!(translate("{{ nosuch 1 }}").unwrap_err().contains("not defined"));
        assert!(translate("{{ .Vars.x 1 }}").unwrap_err().contains("non-function"));
    }

    #[test]
    fn printf_supports_common_verbs() {
        let args = Rest(vec![Value::from("web"), Value::from(8), Value::from("a")]);
        assert_eq!(printf("%s:%d %q 100%%".into(), args), "web:8 \"a\" 100%");
        assert_eq!(printf("%s".into(), Rest(vec![])), "%!s(MISSING)");
    }

    #[test]
    fn print_spaces_only_between_non_strings() {
        let args = Rest(vec![Value::from(1), Value::from(2), Value::from("x"), Value::from(3)]);
        assert_eq!(print(args), "1 2x3");
    }
}
