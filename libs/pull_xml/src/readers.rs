//! The lexical states of the tokenizer.
//!
//! Every reader sees the input one byte at a time and decides on that byte and
//! its own buffer alone, there is no lookahead. When a reader has seen the end
//! of its unit it asks the parser to switch to the next reader, which then
//! builds the event from the outgoing reader.

use alloc::string::String;
use alloc::vec::Vec;

use crate::attributes::{self, parse_tag};
use crate::entities;
use crate::events::{Event, Standalone};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReaderKind {
    LeftBracket,
    Sign,
    Declaration,
    StartTag,
    EndTag,
    CharData,
    Comment,
    DocType,
}

impl ReaderKind {
    pub(crate) const COUNT: usize = 8;
}

/// What the parser has to do after a reader consumed a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    Stay,
    /// The unit is complete, continue with a reader of this kind.
    To(ReaderKind),
    /// Like `To`, and the byte just read belongs to the new reader.
    Replay(ReaderKind),
    /// A start tag ended with `/`. Its name is fed to an end tag reader,
    /// which takes over.
    SelfClose,
}

pub(crate) enum Reader {
    LeftBracket(LeftBracketReader),
    Sign,
    Declaration(DeclarationReader),
    StartTag(StartTagReader),
    EndTag(EndTagReader),
    CharData(CharDataReader),
    Comment(CommentReader),
    DocType(DocTypeReader),
}

impl Reader {
    pub(crate) fn new(kind: ReaderKind) -> Self {
        match kind {
            ReaderKind::LeftBracket => Reader::LeftBracket(LeftBracketReader::default()),
            ReaderKind::Sign => Reader::Sign,
            ReaderKind::Declaration => Reader::Declaration(DeclarationReader::default()),
            ReaderKind::StartTag => Reader::StartTag(StartTagReader::default()),
            ReaderKind::EndTag => Reader::EndTag(EndTagReader::default()),
            ReaderKind::CharData => Reader::CharData(CharDataReader::default()),
            ReaderKind::Comment => Reader::Comment(CommentReader::default()),
            ReaderKind::DocType => Reader::DocType(DocTypeReader::default()),
        }
    }

    pub(crate) fn kind(&self) -> ReaderKind {
        match self {
            Reader::LeftBracket(_) => ReaderKind::LeftBracket,
            Reader::Sign => ReaderKind::Sign,
            Reader::Declaration(_) => ReaderKind::Declaration,
            Reader::StartTag(_) => ReaderKind::StartTag,
            Reader::EndTag(_) => ReaderKind::EndTag,
            Reader::CharData(_) => ReaderKind::CharData,
            Reader::Comment(_) => ReaderKind::Comment,
            Reader::DocType(_) => ReaderKind::DocType,
        }
    }

    pub(crate) fn read(&mut self, byte: u8) -> Result<Transition> {
        match self {
            Reader::LeftBracket(r) => r.read(byte),
            Reader::Sign => read_sign(byte),
            Reader::Declaration(r) => Ok(r.read(byte)),
            Reader::StartTag(r) => Ok(r.read(byte)),
            Reader::EndTag(r) => Ok(r.read(byte)),
            Reader::CharData(r) => Ok(r.read(byte)),
            Reader::Comment(r) => r.read(byte),
            Reader::DocType(r) => Ok(r.read(byte)),
        }
    }

    /// The event for the unit this reader has lexed, if it produces one.
    pub(crate) fn event(&self) -> Result<Option<Event>> {
        match self {
            Reader::LeftBracket(_) | Reader::Sign => Ok(None),
            Reader::Declaration(r) => r.event(),
            Reader::StartTag(r) => parse_tag(&r.buffer).map(Some),
            Reader::EndTag(r) => r.event().map(Some),
            Reader::CharData(r) => r.event(),
            Reader::Comment(r) => r.event().map(Some),
            Reader::DocType(r) => r.event(),
        }
    }

    /// Name of the start tag being lexed, empty for every other reader.
    pub(crate) fn tag_name(&self) -> &[u8] {
        match self {
            Reader::StartTag(r) => r.name(),
            _ => &[],
        }
    }

    pub(crate) fn reset(&mut self) {
        match self {
            Reader::LeftBracket(r) => r.armed = false,
            Reader::Sign => {}
            Reader::Declaration(r) => r.buffer.clear(),
            Reader::StartTag(r) => {
                r.buffer.clear();
                r.quote = None;
            }
            Reader::EndTag(r) => r.buffer.clear(),
            Reader::CharData(r) => r.buffer.clear(),
            Reader::Comment(r) => {
                r.buffer.clear();
                r.opened = false;
            }
            Reader::DocType(r) => {
                r.buffer.clear();
                r.quote = None;
                r.subset = false;
                r.markup.clear();
            }
        }
    }
}

/// ASCII whitespace including vertical tab.
fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

fn is_name_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_' || byte == b':' || byte >= 0x80
}

/// Skips everything up to the next `<`, then picks the markup reader.
#[derive(Default)]
pub(crate) struct LeftBracketReader {
    armed: bool,
}

impl LeftBracketReader {
    fn read(&mut self, byte: u8) -> Result<Transition> {
        if !self.armed {
            if byte == b'<' {
                self.armed = true;
            }
            return Ok(Transition::Stay);
        }
        match byte {
            b'?' => Ok(Transition::To(ReaderKind::Declaration)),
            b'/' => Ok(Transition::To(ReaderKind::EndTag)),
            b'!' => Ok(Transition::To(ReaderKind::Sign)),
            b if is_name_start(b) => Ok(Transition::Replay(ReaderKind::StartTag)),
            _ => Err(Error::NotWellFormed),
        }
    }
}

/// `<!` has been seen.
fn read_sign(byte: u8) -> Result<Transition> {
    match byte {
        b'[' => Ok(Transition::To(ReaderKind::CharData)),
        b'-' => Ok(Transition::To(ReaderKind::Comment)),
        b'A'..=b'Z' => Ok(Transition::Replay(ReaderKind::DocType)),
        _ => Err(Error::NotWellFormed),
    }
}

/// `<?target ...?>`
#[derive(Default)]
pub(crate) struct DeclarationReader {
    buffer: Vec<u8>,
}

impl DeclarationReader {
    fn read(&mut self, byte: u8) -> Transition {
        if byte == b'>' {
            return Transition::To(ReaderKind::CharData);
        }
        self.buffer.push(byte);
        Transition::Stay
    }

    fn event(&self) -> Result<Option<Event>> {
        let block = self.buffer.strip_suffix(b"?").unwrap_or(&self.buffer[..]);
        let target = block.split(|b| b.is_ascii_whitespace()).next().unwrap_or(&[]);
        if !target.eq_ignore_ascii_case(b"xml") {
            trace!("Skipping processing instruction <?{}?>", target.escape_ascii());
            return Ok(None);
        }
        let tag = parse_tag(block)?;
        Ok(Some(Event::Declaration {
            version: String::from(tag.attr("version").unwrap_or("")),
            encoding: String::from(tag.attr("encoding").unwrap_or("")),
            standalone: Standalone::from_value(tag.attr("standalone")),
        }))
    }
}

/// `<name attr="value" ...>` and `<name .../>`
#[derive(Default)]
pub(crate) struct StartTagReader {
    buffer: Vec<u8>,
    /// The quote an attribute value was opened with.
    quote: Option<u8>,
}

impl StartTagReader {
    fn read(&mut self, byte: u8) -> Transition {
        match (byte, self.quote) {
            (b'>', None) => return Transition::To(ReaderKind::CharData),
            (b'/', None) => return Transition::SelfClose,
            (b'"' | b'\'', None) => self.quote = Some(byte),
            (b, Some(q)) if b == q => self.quote = None,
            _ => {}
        }
        self.buffer.push(byte);
        Transition::Stay
    }

    fn name(&self) -> &[u8] {
        self.buffer
            .split(|b| b.is_ascii_whitespace())
            .find(|word| !word.is_empty())
            .unwrap_or(&[])
    }
}

/// `</name>`
#[derive(Default)]
pub(crate) struct EndTagReader {
    buffer: Vec<u8>,
}

impl EndTagReader {
    fn read(&mut self, byte: u8) -> Transition {
        if byte == b'>' {
            return Transition::To(ReaderKind::CharData);
        }
        self.buffer.push(byte);
        Transition::Stay
    }

    fn event(&self) -> Result<Event> {
        let name = String::from_utf8(self.buffer.trim_ascii_end().to_vec())?;
        Ok(Event::EndTag { name })
    }
}

/// Text between markup.
#[derive(Default)]
pub(crate) struct CharDataReader {
    buffer: Vec<u8>,
}

impl CharDataReader {
    fn read(&mut self, byte: u8) -> Transition {
        if byte == b'<' {
            return Transition::Replay(ReaderKind::LeftBracket);
        }
        self.buffer.push(byte);
        Transition::Stay
    }

    fn event(&self) -> Result<Option<Event>> {
        if self.buffer.iter().all(|&b| is_space(b)) {
            return Ok(None);
        }
        let content = String::from_utf8(entities::decode(&self.buffer))?;
        Ok(Some(Event::Text { content }))
    }
}

/// `<!-- ... -->`, entered after `<!-`.
#[derive(Default)]
pub(crate) struct CommentReader {
    buffer: Vec<u8>,
    /// The second dash of `<!--` has been seen.
    opened: bool,
}

impl CommentReader {
    fn read(&mut self, byte: u8) -> Result<Transition> {
        if !self.opened {
            if byte != b'-' {
                return Err(Error::NotWellFormed);
            }
            self.opened = true;
            return Ok(Transition::Stay);
        }
        if byte == b'>' && self.buffer.ends_with(b"--") {
            return Ok(Transition::To(ReaderKind::CharData));
        }
        self.buffer.push(byte);
        Ok(Transition::Stay)
    }

    fn event(&self) -> Result<Event> {
        let end = self.buffer.len().saturating_sub(2);
        let content = String::from_utf8(self.buffer[..end].to_vec())?;
        Ok(Event::Comment { content })
    }
}

/// `<!DOCTYPE name PUBLIC "id" "uri" [ ... ]>`, entered on the `D`.
#[derive(Default)]
pub(crate) struct DocTypeReader {
    buffer: Vec<u8>,
    quote: Option<u8>,
    /// Inside the `[ ... ]` internal subset, which is skipped.
    subset: bool,
    /// The markup declaration, comment or PI currently open in the subset.
    markup: Vec<u8>,
}

impl DocTypeReader {
    fn read(&mut self, byte: u8) -> Transition {
        if self.subset {
            self.read_subset(byte);
            return Transition::Stay;
        }
        match (byte, self.quote) {
            (b, Some(q)) if b == q => self.quote = None,
            (_, Some(_)) => {}
            (b'"' | b'\'', None) => self.quote = Some(byte),
            (b'[', None) => {
                self.subset = true;
                return Transition::Stay;
            }
            (b'>', None) => return Transition::To(ReaderKind::CharData),
            _ => {}
        }
        self.buffer.push(byte);
        Transition::Stay
    }

    /// Quotes only count inside `<!...>` declarations, comments and PIs are
    /// opaque until their own terminator.
    fn read_subset(&mut self, byte: u8) {
        if self.markup.is_empty() {
            match byte {
                b'<' => self.markup.push(byte),
                b']' => self.subset = false,
                _ => {}
            }
            return;
        }

        self.markup.push(byte);
        if self.markup.starts_with(b"<!--") {
            if self.markup.len() >= 7 && self.markup.ends_with(b"-->") {
                self.markup.clear();
            }
            return;
        }
        if self.markup.starts_with(b"<?") {
            if byte == b'>' && self.markup.ends_with(b"?>") {
                self.markup.clear();
            }
            return;
        }
        match (byte, self.quote) {
            (b, Some(q)) if b == q => self.quote = None,
            (_, Some(_)) => {}
            (b'"' | b'\'', None) => self.quote = Some(byte),
            (b'>', None) => self.markup.clear(),
            _ => {}
        }
    }

    fn event(&self) -> Result<Option<Event>> {
        let words = attributes::words(&self.buffer)?;
        let Some((keyword, rest)) = words.split_first() else {
            return Ok(None);
        };
        if keyword != "DOCTYPE" {
            trace!("Skipping markup declaration <!{keyword}>");
            return Ok(None);
        }

        let dtd = rest.iter().rev().find(|word| word.contains(".dtd")).cloned();
        let mut name = String::new();
        let mut public_id = String::new();
        let mut system_id = String::new();
        let mut rest = rest.iter().cloned();
        while let Some(word) = rest.next() {
            match word.as_str() {
                "PUBLIC" => {
                    public_id = rest.next().unwrap_or_default();
                    if let Some(uri) = rest.next() {
                        system_id = uri;
                    }
                }
                "SYSTEM" => system_id = rest.next().unwrap_or_default(),
                _ if name.is_empty() => name = word,
                _ => {}
            }
        }

        Ok(Some(Event::DocType {
            name,
            public_id,
            system_id,
            dtd,
        }))
    }
}

/// One lazily built reader per kind, so switching readers does not allocate
/// once every kind has been used.
pub(crate) struct ReaderPool {
    readers: [Option<Reader>; ReaderKind::COUNT],
}

impl ReaderPool {
    pub(crate) fn new() -> Self {
        ReaderPool {
            readers: Default::default(),
        }
    }

    pub(crate) fn borrow(&mut self, kind: ReaderKind) -> Reader {
        self.readers[kind as usize].take().unwrap_or_else(|| {
            trace!("Creating {kind:?} reader");
            Reader::new(kind)
        })
    }

    pub(crate) fn save(&mut self, mut reader: Reader) {
        reader.reset();
        let slot = reader.kind() as usize;
        self.readers[slot] = Some(reader);
    }
}
