use alloc::string::String;
use alloc::vec::Vec;

use crate::entities;
use crate::events::Event;
use crate::{Error, Result};

/// A `name="value"` pair of a start tag. The value is entity-decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Tokenizes tag content into a [`Event::StartTag`].
///
/// Attribute order is preserved and duplicates are kept.
/// ```
/// # use pull_xml::{parse_tag, Event};
/// let tag = parse_tag(br#"item foo="bar" baz = 'a &amp; b' qux=plain "#).unwrap();
/// let Event::StartTag { name, attrs } = &tag else { unreachable!() };
/// assert_eq!(name, "item");
/// assert_eq!(attrs.len(), 3);
/// assert_eq!(tag.attr("foo"), Some("bar"));
/// assert_eq!(tag.attr("baz"), Some("a & b"));
/// assert_eq!(tag.attr("qux"), Some("plain"));
/// ```
pub fn parse_tag(block: &[u8]) -> Result<Event> {
    let mut lexer = Lexer::new(block);
    lexer.skip_whitespace();
    let name = lexer.take_while(|b| !b.is_ascii_whitespace());
    if name.is_empty() {
        return Err(Error::Attribute("missing tag name"));
    }
    let name = String::from_utf8(name.to_vec())?;

    let mut attrs = Vec::new();
    loop {
        lexer.skip_whitespace();
        match lexer.peek() {
            None => break,
            Some(b'=') => return Err(Error::Attribute("unexpected '='")),
            Some(b'"' | b'\'') => return Err(Error::Attribute("unexpected quoted value")),
            Some(_) => {}
        }

        let attr_name = lexer.take_while(|b| !b.is_ascii_whitespace() && b != b'=');
        let attr_name = String::from_utf8(attr_name.to_vec())?;
        lexer.skip_whitespace();
        if lexer.peek() != Some(b'=') {
            return Err(Error::AttributeNoValue(attr_name));
        }
        lexer.bump();
        lexer.skip_whitespace();
        let value = match lexer.peek() {
            None => return Err(Error::AttributeNoValue(attr_name)),
            Some(quote @ (b'"' | b'\'')) => lexer.quoted(quote)?,
            Some(_) => lexer.take_while(|b| !b.is_ascii_whitespace()),
        };
        let value = String::from_utf8(entities::decode(value))?;
        attrs.push(Attribute {
            name: attr_name,
            value,
        });
    }

    Ok(Event::StartTag { name, attrs })
}

/// Splits a block into whitespace separated words. Quoted strings form a
/// single word with the quotes removed. Used for markup that is not
/// `name="value"` shaped, like the DOCTYPE declaration.
pub(crate) fn words(block: &[u8]) -> Result<Vec<String>> {
    let mut lexer = Lexer::new(block);
    let mut words = Vec::new();
    loop {
        lexer.skip_whitespace();
        let word = match lexer.peek() {
            None => break,
            Some(quote @ (b'"' | b'\'')) => lexer.quoted(quote)?,
            Some(_) => lexer.take_while(|b| !b.is_ascii_whitespace() && b != b'"' && b != b'\''),
        };
        words.push(String::from_utf8(word.to_vec())?);
    }
    Ok(words)
}

struct Lexer<'a> {
    block: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(block: &'a [u8]) -> Self {
        Lexer { block, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.block.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn skip_whitespace(&mut self) {
        self.take_while(|b| b.is_ascii_whitespace());
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a [u8] {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        &self.block[start..self.pos]
    }

    /// Consumes `quote`, the value and the closing quote. Returns the value.
    fn quoted(&mut self, quote: u8) -> Result<&'a [u8]> {
        self.bump();
        let rest = &self.block[self.pos..];
        let Some(len) = memchr::memchr(quote, rest) else {
            return Err(Error::Attribute("unterminated attribute value"));
        };
        self.pos += len + 1;
        Ok(&rest[..len])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn tag(block: &str) -> (String, Vec<Attribute>) {
        match parse_tag(block.as_bytes()) {
            Ok(Event::StartTag { name, attrs }) => (name, attrs),
            other => panic!("expected start tag, got {other:?}"),
        }
    }

    #[test]
    fn name_only() {
        assert_eq!(tag("root "), ("root".into(), vec![]));
        assert_eq!(tag("  ns:root\t"), ("ns:root".into(), vec![]));
    }

    #[test]
    fn quoting_rules() {
        let (name, attrs) = tag(r#"a x="1 > 2" y='say "hi"' z = "/" "#);
        assert_eq!(name, "a");
        assert_eq!(
            attrs,
            vec![
                Attribute::new("x", "1 > 2"),
                Attribute::new("y", "say \"hi\""),
                Attribute::new("z", "/"),
            ]
        );
    }

    #[test]
    fn duplicates_are_kept_in_order() {
        let event = parse_tag(br#"a k="first" k="second" "#).unwrap();
        let Event::StartTag { attrs, .. } = &event else {
            panic!("expected start tag");
        };
        assert_eq!(attrs.len(), 2);
        assert_eq!(event.attr("k"), Some("first"));
    }

    #[test]
    fn values_are_decoded() {
        let (_, attrs) = tag(r#"a href="?a=1&amp;b=2" t='&lt;&#x41;&gt;' "#);
        assert_eq!(attrs[0].value, "?a=1&b=2");
        assert_eq!(attrs[1].value, "<A>");
    }

    #[test]
    fn errors() {
        assert_eq!(parse_tag(b"   "), Err(Error::Attribute("missing tag name")));
        assert_eq!(
            parse_tag(b"a checked "),
            Err(Error::AttributeNoValue("checked".into()))
        );
        assert_eq!(
            parse_tag(b"a x= "),
            Err(Error::AttributeNoValue("x".into()))
        );
        assert_eq!(parse_tag(b"a =\"1\" "), Err(Error::Attribute("unexpected '='")));
        assert_eq!(
            parse_tag(b"a x=\"1 "),
            Err(Error::Attribute("unterminated attribute value"))
        );
        assert!(matches!(parse_tag(b"a x=\"\xff\" "), Err(Error::Utf8Error(_))));
    }

    #[test]
    fn doctype_words() {
        let split = words(br#"DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" 'x.dtd' "#).unwrap();
        assert_eq!(
            split,
            vec!["DOCTYPE", "html", "PUBLIC", "-//W3C//DTD XHTML 1.0 Strict//EN", "x.dtd"]
        );
        assert!(words(br#"DOCTYPE a SYSTEM "open "#).is_err());
    }
}
