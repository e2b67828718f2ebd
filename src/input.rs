//! Acquiring one logical command line.
//!
//! A physical line that ends in a continuation marker (a pipe, a backslash or one of the
//! logical operators) is joined with the following line(s). The markers are only continuation
//! triggers here; nothing downstream treats `&&`/`||` as control flow.

use reedline::{
    Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus, Reedline, Signal,
};
use std::borrow::Cow;
use std::io::{self, BufRead};

use crate::config::ShellConfig;

/// Tokens that ask for another line when they end a multi-token line
pub const CONTINUATION_MARKERS: [&str; 6] = ["|", "\\", "||", "&&", "\\\\&&", "\\\\||"];

/// Which prompt to show for the next physical line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Primary,
    Continuation,
}

/// One physical read from a line source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Line(String),
    /// The user hit Ctrl-C at the editor
    Interrupted,
    EndOfInput,
}

/// Something that hands out physical lines
pub trait LineSource {
    fn read_line(&mut self, prompt: PromptKind) -> io::Result<InputEvent>;
}

/// A complete logical line, or the end of the input stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogicalLine {
    /// Tokens joined with single spaces, backslash tokens removed
    Line(String),
    EndOfInput,
}

/// Read one logical line, prompting for continuation lines as needed
///
/// End of input in the middle of a continuation ends the whole input. An interrupt throws away
/// whatever was typed so far and yields an empty line.
pub fn read_logical_line(source: &mut dyn LineSource) -> io::Result<LogicalLine> {
    let mut tokens: Vec<String> = Vec::new();
    let mut prompt = PromptKind::Primary;

    loop {
        match source.read_line(prompt)? {
            InputEvent::Line(line) => tokens.extend(line.split_whitespace().map(String::from)),
            InputEvent::Interrupted => return Ok(LogicalLine::Line(String::new())),
            InputEvent::EndOfInput => return Ok(LogicalLine::EndOfInput),
        }

        if !needs_continuation(&tokens) {
            break;
        }
        prompt = PromptKind::Continuation;
    }

    let words: Vec<&str> = tokens
        .iter()
        .map(String::as_str)
        .filter(|token| *token != "\\")
        .collect();
    Ok(LogicalLine::Line(words.join(" ")))
}

fn needs_continuation(tokens: &[String]) -> bool {
    tokens.len() > 1
        && tokens
            .last()
            .is_some_and(|last| CONTINUATION_MARKERS.contains(&last.as_str()))
}

/// Non-interactive source: plain lines from any reader, no prompts
pub struct BufReadSource<R> {
    reader: R,
}

impl<R: BufRead> BufReadSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for BufReadSource<R> {
    fn read_line(&mut self, _prompt: PromptKind) -> io::Result<InputEvent> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(InputEvent::EndOfInput);
        }
        Ok(InputEvent::Line(line))
    }
}

/// Prompt rendering for the line editor
struct ShellPrompt {
    primary: String,
    continuation: String,
    is_continuation: bool,
}

impl Prompt for ShellPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        if self.is_continuation {
            Cow::Borrowed(self.continuation.as_str())
        } else {
            Cow::Borrowed(self.primary.as_str())
        }
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!("({}reverse search) ", prefix))
    }
}

/// Interactive source backed by reedline
pub struct EditorSource {
    editor: Reedline,
    prompt: ShellPrompt,
}

impl EditorSource {
    pub fn new(config: &ShellConfig) -> Self {
        Self {
            editor: Reedline::create(),
            prompt: ShellPrompt {
                primary: config.primary_prompt.clone(),
                continuation: config.continuation_prompt.clone(),
                is_continuation: false,
            },
        }
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: PromptKind) -> io::Result<InputEvent> {
        self.prompt.is_continuation = prompt == PromptKind::Continuation;
        let event = match self.editor.read_line(&self.prompt)? {
            Signal::Success(line) => InputEvent::Line(line),
            Signal::CtrlC => InputEvent::Interrupted,
            Signal::CtrlD => InputEvent::EndOfInput,
        };
        Ok(event)
    }
}
