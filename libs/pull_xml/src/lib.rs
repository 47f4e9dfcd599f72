/*!
A no_std incremental pull XML tokenizer.

Bytes are pushed in with [`Parser::append`] in chunks of any size, events are
pulled out with [`Parser::next_event`]. Chunk boundaries never change the
resulting event sequence.

## Features
- no_std (requires alloc)
- streaming, byte-at-a-time state machine
- tag nesting validation
- error reports with position and a snippet of the offending input

## Usage
```
# use pull_xml as xml;
let mut parser = xml::Parser::new();
for chunk in ["<?xml version=\"1.0\"?><ro", "ot a=\"1\">te", "xt</root>"] {
    parser.append(chunk.as_bytes());
    if let Some(err) = parser.error() {
        panic!("{err}");
    }
    while let Some(event) = parser.next_event() {
        match event {
            xml::Event::StartTag { name, attrs } => {
                println!("Start tag: {name} with attributes: {attrs:?}");
            }
            xml::Event::EndTag { name } => println!("End tag: {name}"),
            xml::Event::Text { content } => println!("Text: {content}"),
            _ => {}
        }
    }
}
assert_eq!(parser.level(), 0);
```

## Limitations & non-goals
- not validating, the DOCTYPE is captured but never enforced
- no DOM
- no transcoding, payload text has to be UTF-8
- `<![CDATA[` sections are treated as plain character data
*/

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        log::trace!($($arg)*);
        #[cfg(test)]
        std::eprintln!($($arg)*);
    };
}

macro_rules! warn {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        log::warn!($($arg)*);
        #[cfg(test)]
        std::eprintln!($($arg)*);
    };
}

mod attributes;
mod config;
mod context;
mod entities;
mod events;
mod parser;
mod readers;


pub use attributes::{Attribute, parse_tag};
pub use config::Config;
pub use context::ParseError;
pub use entities::decode as decode_entities;
pub use events::{Event, Standalone};
pub use parser::Parser;

use alloc::string::String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A byte with no valid transition in the current context.
    NotWellFormed,
    /// An end tag that does not close the innermost open tag.
    /// `start` is `None` when no tag was open.
    MismatchedTag { start: Option<String>, end: String },
    Attribute(&'static str),
    AttributeNoValue(String),
    Utf8Error(core::str::Utf8Error),
    IoError(embedded_io::ErrorKind),
}

type Result<T> = core::result::Result<T, Error>;

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::NotWellFormed => f.write_str("not well-formed"),
            Error::MismatchedTag { start, end } => write!(
                f,
                "mismatched tag, start-tag <{}>, end-tag <{end}>",
                start.as_deref().unwrap_or("NULL")
            ),
            Error::Attribute(msg) => f.write_str(msg),
            Error::AttributeNoValue(name) => write!(f, "attribute <{name}> has no value"),
            Error::Utf8Error(err) => write!(f, "invalid utf-8: {err}"),
            Error::IoError(kind) => write!(f, "i/o error: {kind:?}"),
        }
    }
}

impl core::error::Error for Error {}

impl From<core::str::Utf8Error> for Error {
    fn from(err: core::str::Utf8Error) -> Self {
        Error::Utf8Error(err)
    }
}

impl From<alloc::string::FromUtf8Error> for Error {
    fn from(err: alloc::string::FromUtf8Error) -> Self {
        Error::Utf8Error(err.utf8_error())
    }
}

impl embedded_io::Error for Error {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            Error::IoError(kind) => *kind,
            _ => embedded_io::ErrorKind::InvalidData,
        }
    }
}
