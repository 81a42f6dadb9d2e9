use unicode_width::UnicodeWidthStr;

use super::classify::classify;
use super::token::{Action, EndReason, EscapeKey, InputError, Scan, Token};
use crate::history::HistoryCache;
use crate::menu::{command_name, MenuRouter, ENTER_COMMAND, RETURN_COMMAND};
use crate::{log_debug, log_debug_content};

const ERASE_CELL: &[u8] = b"\x08 \x08";

/// What a submitted line asks the front-end to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Quit,
    /// Menu navigation the router owns; typed by the user it is dropped.
    Reserved,
    Help,
    Command,
}

pub fn classify_line(line: &str) -> LineKind {
    match command_name(line) {
        Some("quit") | Some("exit") => LineKind::Quit,
        Some(name) if name == ENTER_COMMAND || name == RETURN_COMMAND => LineKind::Reserved,
        Some("help") => LineKind::Help,
        _ => LineKind::Command,
    }
}

/// Turns raw keyboard bytes into display echo, controller input and session
/// control, one token at a time.
pub struct InputInterpreter {
    router: MenuRouter,
    history: HistoryCache,
    /// Raw bytes not yet classified (an escape sequence split across reads).
    buffer: Vec<u8>,
    /// Pending command line.
    line: Vec<u8>,
    skip_lf: bool,
    finished: bool,
}

impl InputInterpreter {
    pub fn new(router: MenuRouter, history: HistoryCache) -> Self {
        Self {
            router,
            history,
            buffer: Vec::new(),
            line: Vec::new(),
            skip_lf: false,
            finished: false,
        }
    }

    pub fn router(&self) -> &MenuRouter {
        &self.router
    }

    pub fn history(&self) -> &HistoryCache {
        &self.history
    }

    pub fn pending_line(&self) -> String {
        String::from_utf8_lossy(&self.line).into_owned()
    }

    /// True once an `End` action was emitted or a fault was reported.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Consume a chunk of raw input, appending the resulting actions to `out`.
    ///
    /// Bytes of an incomplete escape sequence stay buffered for the next call.
    pub fn feed(&mut self, chunk: &[u8], out: &mut Vec<Action>) -> Result<(), InputError> {
        if self.finished {
            return Ok(());
        }
        self.buffer.extend_from_slice(chunk);
        let mut consumed = 0;
        while consumed < self.buffer.len() && !self.finished {
            match classify(&self.buffer[consumed..]) {
                Ok(Scan::NeedMore) => break,
                Ok(Scan::Token { token, len }) => {
                    consumed += len;
                    self.apply(token, out);
                }
                Err(err) => {
                    log_debug(&format!("input fault: {err}"));
                    self.finished = true;
                    self.buffer.clear();
                    return Err(err);
                }
            }
        }
        if self.finished {
            self.buffer.clear();
        } else {
            self.buffer.drain(..consumed);
        }
        Ok(())
    }

    fn apply(&mut self, token: Token, out: &mut Vec<Action>) {
        if self.skip_lf {
            self.skip_lf = false;
            if token == Token::LineEnd(b'\n') {
                return;
            }
        }
        match token {
            Token::Char(byte) => {
                self.line.push(byte);
                push_display(out, &[byte]);
            }
            Token::LineEnd(byte) => {
                self.skip_lf = byte == b'\r';
                push_display(out, b"\r\n");
                self.submit(out);
            }
            Token::Control(key) if key.ends_session() => self.end(EndReason::EndOfInput, out),
            Token::Control(key) => push_forward(out, &[key.byte()]),
            Token::Escape(key) if key.is_recall() => self.recall(key, out),
            Token::Escape(key) => push_forward(out, key.bytes()),
        }
    }

    fn submit(&mut self, out: &mut Vec<Action>) {
        let raw = std::mem::take(&mut self.line);
        let line = String::from_utf8_lossy(&raw).into_owned();
        log_debug_content(&format!("submitted line: {line:?}"));
        self.history.insert(&line);
        match classify_line(&line) {
            LineKind::Quit => self.end(EndReason::Quit, out),
            LineKind::Reserved => push_forward(out, b"\n"),
            LineKind::Help => {
                out.push(Action::Help);
                push_forward(out, b"\n");
            }
            LineKind::Command => {
                let mut bytes = self.router.route(&line).to_bytes();
                bytes.extend_from_slice(&raw);
                bytes.push(b'\n');
                push_forward(out, &bytes);
            }
        }
    }

    /// Replace the pending line with a history entry and redraw it in place.
    fn recall(&mut self, key: EscapeKey, out: &mut Vec<Action>) {
        if self.history.is_empty() {
            return;
        }
        let entry = match key {
            EscapeKey::Up => self.history.recall_previous(),
            _ => self.history.recall_next(),
        };
        let width = UnicodeWidthStr::width(self.pending_line().as_str());
        let mut redraw = ERASE_CELL.repeat(width);
        redraw.extend_from_slice(entry.as_bytes());
        push_display(out, &redraw);
        self.line = entry.into_bytes();
    }

    fn end(&mut self, reason: EndReason, out: &mut Vec<Action>) {
        log_debug(&format!("session end requested: {reason:?}"));
        self.finished = true;
        out.push(Action::End(reason));
    }
}

fn push_display(out: &mut Vec<Action>, bytes: &[u8]) {
    if let Some(Action::Display(existing)) = out.last_mut() {
        existing.extend_from_slice(bytes);
    } else {
        out.push(Action::Display(bytes.to_vec()));
    }
}

fn push_forward(out: &mut Vec<Action>, bytes: &[u8]) {
    if let Some(Action::Forward(existing)) = out.last_mut() {
        existing.extend_from_slice(bytes);
    } else {
        out.push(Action::Forward(bytes.to_vec()));
    }
}
