//! Restricted evaluation of builder-expression text.
//!
//! A hand-written scanner and recursive-descent reader for the expression
//! format emitted by [`crate::expr`]. The namespace is closed: known tag
//! constructors plus the `True`/`False` literals; any other name is
//! refused. Tree conversion never routes through here; this exists for
//! callers holding expression text as their source of truth.

use tagforge_dom::{AttrValue, Child, Element, ForgeError, tags};

use crate::parse::ParsedMarkup;

/// Evaluate builder-expression text into a tree.
///
/// Accepts the full emitted format: `#` comment lines, single- or
/// double-quoted strings with backslash escapes, numbers, named and
/// spread attributes, the curried `Tag(attrs)(children)` form and
/// multi-root `(A, B)` tuples. `()` and blank input evaluate to nothing.
pub fn eval_expr(src: &str) -> Result<ParsedMarkup, ForgeError> {
    let mut parser = ExprParser::new(src);
    parser.skip_trivia();
    if parser.is_eof() {
        return Ok(ParsedMarkup::Empty);
    }
    let roots = if parser.current() == Some('(') {
        parser.tuple()?
    } else {
        vec![parser.expression()?]
    };
    parser.skip_trivia();
    if !parser.is_eof() {
        return Err(parser.error("trailing input after expression"));
    }
    Ok(ParsedMarkup::from_roots(roots))
}

struct ExprParser<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> ExprParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0, line: 1, column: 1 }
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn current(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.current() {
            self.pos += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Whitespace and `#` comment lines.
    fn skip_trivia(&mut self) {
        loop {
            self.skip_whitespace();
            if self.current() == Some('#') {
                while let Some(c) = self.current() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn consume_ident(&mut self) -> String {
        let mut result = String::new();
        while let Some(c) = self.current() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                result.push(c);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn consume_string(&mut self) -> Result<String, ForgeError> {
        let quote = match self.current() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("expected a quoted string")),
        };
        self.advance(); // opening quote

        let mut result = String::new();
        while let Some(c) = self.current() {
            if c == quote {
                self.advance();
                return Ok(result);
            }
            if c == '\\' {
                self.advance();
                match self.current() {
                    Some('n') => result.push('\n'),
                    Some('t') => result.push('\t'),
                    Some('r') => result.push('\r'),
                    Some(other) => result.push(other),
                    None => break,
                }
                self.advance();
                continue;
            }
            result.push(c);
            self.advance();
        }
        Err(self.error("unterminated string literal"))
    }

    /// Numbers keep their lexeme; they become text in the tree.
    fn consume_number(&mut self) -> Result<String, ForgeError> {
        let mut result = String::new();
        if self.current() == Some('-') {
            result.push('-');
            self.advance();
        }
        let mut saw_digit = false;
        while let Some(c) = self.current() {
            if c.is_ascii_digit() || c == '.' {
                saw_digit |= c.is_ascii_digit();
                result.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if !saw_digit {
            return Err(self.error("expected a number"));
        }
        Ok(result)
    }

    fn error(&self, message: &str) -> ForgeError {
        ForgeError::parse(
            format!(
                "Expression invalid at line {}, column {}: {}.",
                self.line, self.column, message
            ),
            "1. Check the expression syntax (quotes, commas, parentheses).\n2. Use only known tag constructors.\n3. Regenerate the expression from markup instead of editing it by hand.",
        )
    }

    fn tuple(&mut self) -> Result<Vec<Child>, ForgeError> {
        self.advance(); // (
        let mut roots = Vec::new();
        loop {
            self.skip_trivia();
            match self.current() {
                Some(')') => {
                    self.advance();
                    return Ok(roots);
                }
                None => return Err(self.error("unclosed tuple")),
                _ => {}
            }
            roots.push(self.expression()?);
            self.skip_trivia();
            match self.current() {
                Some(',') => self.advance(),
                Some(')') => {}
                _ => return Err(self.error("expected ',' or ')' in tuple")),
            }
        }
    }

    fn expression(&mut self) -> Result<Child, ForgeError> {
        self.skip_trivia();
        match self.current() {
            Some('\'' | '"') => Ok(Child::Text(self.consume_string()?)),
            Some(c) if c.is_ascii_digit() || c == '-' => {
                Ok(Child::Text(self.consume_number()?))
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                let name = self.consume_ident();
                self.finish_call(&name)
            }
            Some(_) => Err(self.error("expected a tag call, string or number")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    /// Parse the argument groups after a constructor name. A second group
    /// is the curried attrs-first form and applies like a decoration call.
    fn finish_call(&mut self, name: &str) -> Result<Child, ForgeError> {
        let mut el = self.constructor(name)?;
        self.skip_trivia();
        if self.current() != Some('(') {
            return Err(self.error("expected '(' after constructor name"));
        }
        let (children, attrs) = self.arguments()?;
        el.apply(children, attrs);
        self.skip_trivia();
        if self.current() == Some('(') {
            let (children, attrs) = self.arguments()?;
            el.apply(children, attrs);
        }
        Ok(Child::Element(el))
    }

    fn constructor(&self, name: &str) -> Result<Element, ForgeError> {
        let tag = name.to_ascii_lowercase();
        if !tags::is_known(&tag) {
            return Err(ForgeError::unsupported_input(
                format!("Unknown name '{name}' in expression."),
                "1. Use only known tag constructors in expressions.\n2. Check the spelling against the HTML tag set.",
            ));
        }
        Ok(Element::new(&tag))
    }

    fn arguments(&mut self) -> Result<(Vec<Child>, Vec<(String, AttrValue)>), ForgeError> {
        self.advance(); // (
        let mut children = Vec::new();
        let mut attrs: Vec<(String, AttrValue)> = Vec::new();
        loop {
            self.skip_trivia();
            match self.current() {
                Some(')') => {
                    self.advance();
                    return Ok((children, attrs));
                }
                None => return Err(self.error("unclosed argument list")),
                _ => {}
            }
            self.argument(&mut children, &mut attrs)?;
            self.skip_trivia();
            match self.current() {
                Some(',') => self.advance(),
                Some(')') => {}
                _ => return Err(self.error("expected ',' or ')' in argument list")),
            }
        }
    }

    fn argument(
        &mut self,
        children: &mut Vec<Child>,
        attrs: &mut Vec<(String, AttrValue)>,
    ) -> Result<(), ForgeError> {
        if self.starts_with("**") {
            self.advance();
            self.advance();
            return self.spread(attrs);
        }
        match self.current() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                let ident = self.consume_ident();
                self.skip_trivia();
                if self.current() == Some('=') {
                    self.advance(); // =
                    attrs.push((ident, self.value()?));
                } else if self.current() == Some('(') {
                    children.push(self.finish_call(&ident)?);
                } else {
                    return Err(self.error("expected '=' or '(' after identifier"));
                }
                Ok(())
            }
            _ => {
                children.push(self.expression()?);
                Ok(())
            }
        }
    }

    fn value(&mut self) -> Result<AttrValue, ForgeError> {
        self.skip_trivia();
        match self.current() {
            Some('\'' | '"') => Ok(AttrValue::Text(self.consume_string()?)),
            Some(c) if c.is_ascii_digit() || c == '-' => {
                Ok(AttrValue::Text(self.consume_number()?))
            }
            Some(c) if c.is_ascii_alphabetic() => {
                let ident = self.consume_ident();
                match ident.as_str() {
                    "True" => Ok(AttrValue::Bool(true)),
                    "False" => Ok(AttrValue::Bool(false)),
                    _ => Err(self.error("expected a string, number, True or False")),
                }
            }
            _ => Err(self.error("expected an attribute value")),
        }
    }

    fn spread(&mut self, attrs: &mut Vec<(String, AttrValue)>) -> Result<(), ForgeError> {
        self.skip_trivia();
        if self.current() != Some('{') {
            return Err(self.error("expected '{' after '**'"));
        }
        self.advance(); // {
        loop {
            self.skip_trivia();
            match self.current() {
                Some('}') => {
                    self.advance();
                    return Ok(());
                }
                None => return Err(self.error("unclosed '**{' spread")),
                _ => {}
            }
            let key = self.consume_string()?;
            self.skip_trivia();
            if self.current() != Some(':') {
                return Err(self.error("expected ':' in spread entry"));
            }
            self.advance(); // :
            attrs.push((key, self.value()?));
            self.skip_trivia();
            match self.current() {
                Some(',') => self.advance(),
                Some('}') => {}
                _ => return Err(self.error("expected ',' or '}' in spread")),
            }
        }
    }
}
