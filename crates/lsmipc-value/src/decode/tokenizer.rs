use std::collections::VecDeque;

use crate::decode::MAX_DEPTH;
use crate::error::CodecError;
use crate::number::scan_number;

/// One syntactic token, in depth-first document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParseEvent {
    Null,
    Boolean(bool),
    String(String),
    Number(String),
    BeginMap,
    EndMap,
    MapKey(String),
    BeginArray,
    EndArray,
}

impl ParseEvent {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            ParseEvent::Null => "null",
            ParseEvent::Boolean(_) => "boolean",
            ParseEvent::String(_) => "string",
            ParseEvent::Number(_) => "number",
            ParseEvent::BeginMap => "begin-map",
            ParseEvent::EndMap => "end-map",
            ParseEvent::MapKey(_) => "map-key",
            ParseEvent::BeginArray => "begin-array",
            ParseEvent::EndArray => "end-array",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Array,
    Map,
}

/// What the grammar allows at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Value,
    FirstElement,
    FirstKey,
    Key,
    Colon,
    AfterValue,
}

/// Flatten JSON text into a queue of parse events.
///
/// Nesting is tracked on an explicit stack, so arbitrarily deep input cannot
/// exhaust the call stack; depth beyond [`MAX_DEPTH`] is rejected instead.
/// Empty or all-whitespace input yields an empty queue.
pub(crate) fn tokenize(text: &str) -> Result<VecDeque<ParseEvent>, CodecError> {
    let mut tokenizer = Tokenizer {
        text,
        bytes: text.as_bytes(),
        pos: 0,
        stack: Vec::new(),
        events: VecDeque::new(),
    };
    tokenizer.run()?;
    Ok(tokenizer.events)
}

struct Tokenizer<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    stack: Vec<Container>,
    events: VecDeque<ParseEvent>,
}

impl Tokenizer<'_> {
    fn run(&mut self) -> Result<(), CodecError> {
        self.skip_whitespace();
        if self.pos == self.bytes.len() {
            return Ok(());
        }

        let mut expect = Expect::Value;
        loop {
            self.skip_whitespace();
            expect = match expect {
                Expect::Value | Expect::FirstElement => {
                    let byte = self
                        .peek()
                        .ok_or_else(|| self.syntax("unexpected end of input, expected a value"))?;
                    if expect == Expect::FirstElement && byte == b']' {
                        self.pos += 1;
                        self.close();
                        Expect::AfterValue
                    } else {
                        self.value(byte)?
                    }
                }
                Expect::FirstKey | Expect::Key => match self.peek() {
                    Some(b'"') => {
                        let key = self.string()?;
                        self.events.push_back(ParseEvent::MapKey(key));
                        Expect::Colon
                    }
                    Some(b'}') if expect == Expect::FirstKey => {
                        self.pos += 1;
                        self.close();
                        Expect::AfterValue
                    }
                    _ => return Err(self.syntax("expected object key")),
                },
                Expect::Colon => match self.peek() {
                    Some(b':') => {
                        self.pos += 1;
                        Expect::Value
                    }
                    _ => return Err(self.syntax("expected ':' after object key")),
                },
                Expect::AfterValue => match (self.stack.last().copied(), self.peek()) {
                    (None, None) => return Ok(()),
                    (None, Some(_)) => return Err(self.syntax("trailing characters after value")),
                    (Some(Container::Array), Some(b',')) => {
                        self.pos += 1;
                        Expect::Value
                    }
                    (Some(Container::Array), Some(b']')) | (Some(Container::Map), Some(b'}')) => {
                        self.pos += 1;
                        self.close();
                        Expect::AfterValue
                    }
                    (Some(Container::Map), Some(b',')) => {
                        self.pos += 1;
                        Expect::Key
                    }
                    (Some(Container::Array), _) => {
                        return Err(self.syntax("expected ',' or ']' in array"))
                    }
                    (Some(Container::Map), _) => {
                        return Err(self.syntax("expected ',' or '}' in object"))
                    }
                },
            };
        }
    }

    /// Consume one value starting with `byte` and say what may follow it.
    fn value(&mut self, byte: u8) -> Result<Expect, CodecError> {
        match byte {
            b'{' => {
                self.open(Container::Map)?;
                self.pos += 1;
                self.events.push_back(ParseEvent::BeginMap);
                Ok(Expect::FirstKey)
            }
            b'[' => {
                self.open(Container::Array)?;
                self.pos += 1;
                self.events.push_back(ParseEvent::BeginArray);
                Ok(Expect::FirstElement)
            }
            b'"' => {
                let text = self.string()?;
                self.events.push_back(ParseEvent::String(text));
                Ok(Expect::AfterValue)
            }
            b't' => self.literal("true", ParseEvent::Boolean(true)),
            b'f' => self.literal("false", ParseEvent::Boolean(false)),
            b'n' => self.literal("null", ParseEvent::Null),
            b'-' | b'0'..=b'9' => {
                let end = scan_number(self.bytes, self.pos)
                    .ok_or_else(|| self.syntax("invalid number"))?;
                let text = self.text[self.pos..end].to_owned();
                self.events.push_back(ParseEvent::Number(text));
                self.pos = end;
                Ok(Expect::AfterValue)
            }
            _ => Err(self.syntax("unexpected character")),
        }
    }

    fn literal(&mut self, word: &str, event: ParseEvent) -> Result<Expect, CodecError> {
        if !self.bytes[self.pos..].starts_with(word.as_bytes()) {
            return Err(self.syntax(format!("invalid literal, expected {word}")));
        }
        self.pos += word.len();
        self.events.push_back(event);
        Ok(Expect::AfterValue)
    }

    /// Consume a quoted string, `self.pos` at the opening quote.
    fn string(&mut self) -> Result<String, CodecError> {
        let open = self.pos;
        let mut i = open + 1;
        let mut escaped = false;
        loop {
            match self.bytes.get(i) {
                None => {
                    self.pos = open;
                    return Err(self.syntax("unterminated string"));
                }
                Some(b'"') => break,
                Some(b'\\') => {
                    escaped = true;
                    i += 2;
                }
                Some(byte) if *byte < 0x20 => {
                    self.pos = i;
                    return Err(self.syntax("control character in string"));
                }
                Some(_) => i += 1,
            }
        }

        let text = if escaped {
            serde_json::from_str::<String>(&self.text[open..=i]).map_err(|err| {
                CodecError::Syntax {
                    offset: open,
                    reason: format!("invalid string escape: {err}"),
                }
            })?
        } else {
            self.text[open + 1..i].to_owned()
        };
        self.pos = i + 1;
        Ok(text)
    }

    fn open(&mut self, container: Container) -> Result<(), CodecError> {
        if self.stack.len() >= MAX_DEPTH {
            return Err(CodecError::DepthLimit(MAX_DEPTH));
        }
        self.stack.push(container);
        Ok(())
    }

    fn close(&mut self) {
        match self.stack.pop() {
            Some(Container::Array) => self.events.push_back(ParseEvent::EndArray),
            Some(Container::Map) => self.events.push_back(ParseEvent::EndMap),
            None => {}
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn syntax(&self, reason: impl Into<String>) -> CodecError {
        CodecError::Syntax {
            offset: self.pos,
            reason: reason.into(),
        }
    }
}
