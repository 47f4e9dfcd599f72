use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use embedded_io::Error as _;

use crate::config::Config;
use crate::context::{ErrorContext, ParseError};
use crate::events::Event;
use crate::readers::{Reader, ReaderKind, ReaderPool, Transition};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootState {
    NotStarted,
    Started,
    Ended,
}

/// An incremental pull XML tokenizer.
///
/// Bytes go in through [`Parser::append`], events come out of
/// [`Parser::next_event`]. The first event is always [`Event::StartDocument`],
/// [`Event::EndDocument`] follows the end tag of the root element.
///
/// A malformed document latches an error: the rest of the input is ignored,
/// the events produced before it stay available.
pub struct Parser {
    reader: Reader,
    pool: ReaderPool,
    queue: VecDeque<Event>,
    tags: Vec<String>,
    root: RootState,
    level: usize,
    context: ErrorContext,
    error: Option<ParseError>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let mut pool = ReaderPool::new();
        let reader = pool.borrow(ReaderKind::LeftBracket);
        let mut queue = VecDeque::new();
        queue.push_back(Event::StartDocument);
        Parser {
            reader,
            pool,
            queue,
            tags: Vec::new(),
            root: RootState::NotStarted,
            level: 0,
            context: ErrorContext::new(config.error_context),
            error: None,
        }
    }

    /// Feeds a chunk of input. Does nothing once an error is latched.
    ///
    /// Errors are not returned, check [`Parser::error`] afterwards.
    /// ```
    /// # use pull_xml::Parser;
    /// let mut parser = Parser::new();
    /// parser.append(b"<a><b></a>");
    /// let err = parser.error().unwrap();
    /// assert!(err.message().starts_with("mismatched tag, start-tag <b>, end-tag <a>"));
    /// ```
    pub fn append(&mut self, bytes: &[u8]) {
        if self.error.is_some() {
            return;
        }
        for &byte in bytes {
            self.context.record(byte);
            if let Err(cause) = self.dispatch(byte) {
                self.latch(cause);
                return;
            }
            self.context.advance(byte);
        }
    }

    /// Reads one chunk from `reader` into `chunk` and appends it.
    /// Returns the number of bytes read, 0 at the end of the input.
    ///
    /// I/O errors are returned and leave the parser untouched.
    /// ```
    /// # use pull_xml::{Event, Parser};
    /// # fn main() -> Result<(), pull_xml::Error> {
    /// let mut input = "<root>text</root>".as_bytes();
    /// let mut chunk = [0u8; 4];
    /// let mut parser = Parser::new();
    /// while parser.read_from(&mut input, &mut chunk)? > 0 {}
    /// let events: Vec<_> = parser.collect();
    /// assert_eq!(events.last(), Some(&Event::EndDocument));
    /// # Ok(())
    /// # }
    /// ```
    pub fn read_from<R: embedded_io::Read>(
        &mut self,
        reader: &mut R,
        chunk: &mut [u8],
    ) -> Result<usize> {
        let read = reader
            .read(chunk)
            .map_err(|e| Error::IoError(e.kind()))?;
        self.append(&chunk[..read]);
        Ok(read)
    }

    /// The next pending event, `None` if more input is needed.
    pub fn next_event(&mut self) -> Option<Event> {
        let event = self.queue.pop_front()?;
        match event {
            Event::StartTag { .. } => self.level += 1,
            Event::EndTag { .. } => self.level = self.level.saturating_sub(1),
            _ => {}
        }
        Some(event)
    }

    /// Depth of the open tags, counted over the events handed out so far.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// The root element has been closed.
    pub fn is_finished(&self) -> bool {
        self.root == RootState::Ended
    }

    fn dispatch(&mut self, byte: u8) -> Result<()> {
        match self.reader.read(byte)? {
            Transition::Stay => Ok(()),
            Transition::To(kind) => {
                let next = self.pool.borrow(kind);
                self.change_reader(next)
            }
            Transition::Replay(kind) => {
                let next = self.pool.borrow(kind);
                self.change_reader(next)?;
                self.dispatch(byte)
            }
            Transition::SelfClose => {
                let mut next = self.pool.borrow(ReaderKind::EndTag);
                for &b in self.reader.tag_name() {
                    // Only a name with quotes in it could end the end tag early.
                    if next.read(b)? != Transition::Stay {
                        return Err(Error::NotWellFormed);
                    }
                }
                self.change_reader(next)
            }
        }
    }

    /// Swaps in `next`, then turns the unit finished by the outgoing reader
    /// into events.
    fn change_reader(&mut self, next: Reader) -> Result<()> {
        let outgoing = core::mem::replace(&mut self.reader, next);
        trace!("Reader {:?} -> {:?}", outgoing.kind(), self.reader.kind());
        let event = outgoing.event();
        self.pool.save(outgoing);

        let Some(event) = event? else {
            return Ok(());
        };
        match &event {
            Event::StartTag { name, .. } => {
                if self.root == RootState::NotStarted {
                    self.root = RootState::Started;
                }
                self.tags.push(name.clone());
            }
            Event::EndTag { name } => match self.tags.pop() {
                Some(start) if start == *name => {}
                start => {
                    return Err(Error::MismatchedTag {
                        start,
                        end: name.clone(),
                    });
                }
            },
            _ => {}
        }

        self.queue.push_back(event);
        if self.tags.is_empty() && self.root == RootState::Started {
            self.root = RootState::Ended;
            self.queue.push_back(Event::EndDocument);
        }
        Ok(())
    }

    fn latch(&mut self, cause: Error) {
        let error = self.context.report(cause);
        warn!("XML error: {error}");
        self.error = Some(error);
    }
}

impl Iterator for Parser {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        self.next_event()
    }
}
