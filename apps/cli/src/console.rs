//! Terminal prompts.
//!
//! Commands talk to the user through a [`Console`] so they can be driven
//! from in-memory buffers in tests.

use std::io::{self, BufRead, Stdout, Write};

/// Line-based input and output for interactive commands.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writer for regular command output.
    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Prints `prompt` and reads one trimmed line. `None` on end of input.
    pub fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    /// Asks until a non-empty answer is given. `None` on end of input.
    pub fn ask_required(&mut self, prompt: &str) -> io::Result<Option<String>> {
        loop {
            match self.ask(prompt)? {
                Some(answer) if answer.is_empty() => continue,
                other => return Ok(other),
            }
        }
    }

    /// Yes/no question defaulting to no.
    pub fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        let answer = self.ask(&format!("{prompt} (y/N): "))?;
        Ok(answer.is_some_and(|a| matches!(a.to_ascii_lowercase().as_str(), "y" | "yes")))
    }

    /// Numbered menu. Returns the zero-based index of the chosen item, or
    /// `None` when the user enters nothing or input ends.
    pub fn choose<T: AsRef<str>>(
        &mut self,
        title: &str,
        items: &[T],
    ) -> io::Result<Option<usize>> {
        if items.is_empty() {
            return Ok(None);
        }

        writeln!(self.output, "{title}")?;
        for (i, item) in items.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, item.as_ref())?;
        }

        let prompt = format!("Select (1-{}): ", items.len());
        loop {
            let Some(answer) = self.ask(&prompt)? else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(None);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=items.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => writeln!(self.output, "Invalid selection: {answer}")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(c: Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(c.into_output()).unwrap()
    }

    #[test]
    fn ask_trims_and_handles_eof() {
        let mut c = console("  hello \n");
        assert_eq!(c.ask("Name: ").unwrap().as_deref(), Some("hello"));
        assert_eq!(c.ask("Name: ").unwrap(), None);
        assert!(output(c).starts_with("Name: "));
    }

    #[test]
    fn ask_required_skips_blank_lines() {
        let mut c = console("\n\nGame\n");
        assert_eq!(c.ask_required("Name: ").unwrap().as_deref(), Some("Game"));
    }

    #[test]
    fn confirm_defaults_to_no() {
        assert!(console("y\n").confirm("Go?").unwrap());
        assert!(console("YES\n").confirm("Go?").unwrap());
        assert!(!console("\n").confirm("Go?").unwrap());
        assert!(!console("nope\n").confirm("Go?").unwrap());
        assert!(!console("").confirm("Go?").unwrap());
    }

    #[test]
    fn choose_reprompts_on_invalid_input() {
        let mut c = console("0\nabc\n2\n");
        let picked = c.choose("Pick one:", &["first", "second"]).unwrap();
        assert_eq!(picked, Some(1));
        let out = output(c);
        assert!(out.contains("  1. first"));
        assert!(out.contains("  2. second"));
        assert!(out.contains("Invalid selection: 0"));
        assert!(out.contains("Invalid selection: abc"));
    }

    #[test]
    fn choose_blank_cancels() {
        let mut c = console("\n");
        assert_eq!(c.choose("Pick:", &["a"]).unwrap(), None);
        let mut c = console("");
        assert_eq!(c.choose("Pick:", &["a"]).unwrap(), None);
    }

    #[test]
    fn choose_empty_list() {
        let mut c = console("1\n");
        let empty: [&str; 0] = [];
        assert_eq!(c.choose("Pick:", &empty).unwrap(), None);
    }
}
