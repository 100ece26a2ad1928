//! "Ask until valid" console prompts.
//!
//! Every answer is lowercased and trimmed. A comma-separated answer is split
//! into tokens when the caller allows several values; it is accepted only if
//! every token is allowed. Typing [`ESCAPE`] at any prompt, or closing the
//! input stream, yields [`Answer::Cancelled`].

use std::io::{self, BufRead, Write};

/// Typed at any prompt to leave the program.
pub const ESCAPE: &str = "end";

const RETRY: &str = "\nThat is not a valid option. Please check your formatting and try again:\n>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Non-empty, validated tokens in the order they were typed.
    Value(Vec<String>),
    Cancelled,
}

/// Validate one line of input. `None` means the line must be asked again.
pub fn parse_selection<S: AsRef<str>>(line: &str, allowed: &[S], multi: bool) -> Option<Vec<String>> {
    let line = line.trim().to_lowercase();
    let is_allowed = |t: &str| allowed.iter().any(|a| a.as_ref() == t);
    if line.contains(',') {
        if !multi {
            return None;
        }
        let tokens: Vec<String> = line.split(',').map(|t| t.trim().to_string()).collect();
        tokens.iter().all(|t| is_allowed(t.as_str())).then_some(tokens)
    } else {
        is_allowed(line.as_str()).then(|| vec![line])
    }
}

/// Line-based prompter over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Where prompts and reports are written.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Ask `prompt` until the answer is valid against `allowed`.
    pub fn ask<S: AsRef<str>>(
        &mut self,
        prompt: &str,
        allowed: &[S],
        multi: bool,
    ) -> io::Result<Answer> {
        let mut text = prompt;
        loop {
            write!(self.output, "{text}")?;
            self.output.flush()?;

            // bytes, not `read_line`: a non-UTF-8 line is just another invalid answer
            let mut buf = Vec::new();
            if self.input.read_until(b'\n', &mut buf)? == 0 {
                return Ok(Answer::Cancelled);
            }
            let line = String::from_utf8_lossy(&buf);
            if line.trim().eq_ignore_ascii_case(ESCAPE) {
                return Ok(Answer::Cancelled);
            }
            if let Some(tokens) = parse_selection(&line, allowed, multi) {
                return Ok(Answer::Value(tokens));
            }
            text = RETRY;
        }
    }

    /// Single-valued ask; `None` when cancelled.
    pub fn ask_one<S: AsRef<str>>(&mut self, prompt: &str, allowed: &[S]) -> io::Result<Option<String>> {
        Ok(match self.ask(prompt, allowed, false)? {
            Answer::Value(mut v) => v.pop(),
            Answer::Cancelled => None,
        })
    }

    /// `y`/`n` question; `None` when cancelled.
    pub fn confirm(&mut self, prompt: &str) -> io::Result<Option<bool>> {
        let text = format!("{prompt}\n\n [y] Yes\n [n] No\n\n>");
        Ok(self.ask_one(&text, &["y", "n"])?.map(|a| a == "y"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CITIES: [&str; 3] = ["chicago", "new york city", "washington"];

    fn prompter(input: &str) -> Prompter<&[u8], Vec<u8>> {
        Prompter::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn multi_select_keeps_order_and_duplicates() {
        assert_eq!(
            parse_selection(" Washington , chicago,chicago", &CITIES, true),
            Some(vec!["washington".into(), "chicago".into(), "chicago".into()])
        );
        assert_eq!(
            parse_selection("NEW YORK CITY", &CITIES, true),
            Some(vec!["new york city".into()])
        );
    }

    #[test]
    fn rejects_any_invalid_token() {
        assert_eq!(parse_selection("chicago,boston", &CITIES, true), None);
        assert_eq!(parse_selection("chicago,", &CITIES, true), None);
        assert_eq!(parse_selection("chicago,washington", &CITIES, false), None);
        assert_eq!(parse_selection("", &CITIES, true), None);
    }

    #[test]
    fn empty_answer_allowed_when_listed() {
        assert_eq!(parse_selection("  ", &["st", ""], false), Some(vec![String::new()]));
    }

    #[test]
    fn reprompts_until_valid() {
        let mut p = prompter("boston\nchicago, washington\n");
        let got = p.ask("city?\n>", &CITIES, true).unwrap();
        assert_eq!(
            got,
            Answer::Value(vec!["chicago".into(), "washington".into()])
        );
        let out = String::from_utf8(p.into_output()).unwrap();
        assert!(out.starts_with("city?\n>"));
        assert!(out.contains("not a valid option"));
    }

    #[test]
    fn invalid_utf8_is_asked_again() {
        let input: &[u8] = b"\xff\xfe\nchicago\n";
        let mut p = Prompter::new(input, Vec::new());
        let got = p.ask("city?\n>", &CITIES, true).unwrap();
        assert_eq!(got, Answer::Value(vec!["chicago".into()]));
        let out = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(out.matches("not a valid option").count(), 1);
    }

    #[test]
    fn escape_and_eof_cancel() {
        let mut p = prompter("End\n");
        assert_eq!(p.ask("?", &CITIES, true).unwrap(), Answer::Cancelled);
        let mut p = prompter("");
        assert_eq!(p.confirm("ok?").unwrap(), None);
    }

    #[test]
    fn confirm_maps_yes_no() {
        let mut p = prompter("maybe\nY\nn\n");
        assert_eq!(p.confirm("ok?").unwrap(), Some(true));
        assert_eq!(p.confirm("ok?").unwrap(), Some(false));
    }
}
