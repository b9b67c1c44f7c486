//! Interactive prompts for the guided mode.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use colored::Colorize;
use unblank::detect::has_docx_extension;
use unblank::detector::DEFAULT_MIN_BLANK_RUN;
use unblank::Selection;

/// What to do with the empty pages and blank runs found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Remove every empty page and blank run
    All,
    /// Pick pages by number
    Select,
    /// Leave the document alone
    Cancel,
}

/// Line-based prompter over any input and output.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `question` and read one trimmed line.
    ///
    /// End of input is an error so a closed stdin never loops forever.
    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no more input"));
        }
        Ok(line.trim().to_string())
    }

    fn note(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message)
    }

    /// Ask for an existing `.docx` file. Surrounding quotes from
    /// drag-and-drop are removed.
    pub fn filename(&mut self) -> io::Result<PathBuf> {
        loop {
            let answer = self.ask("\nEnter path to DOCX file: ")?;
            let path = strip_quotes(&answer);

            if path.is_empty() {
                self.note(&"No file specified.".yellow().to_string())?;
            } else if !has_docx_extension(path) {
                self.note(&format!("{} Not a DOCX file: {}", "!".yellow(), path))?;
            } else if !Path::new(path).is_file() {
                self.note(&format!("{} File not found: {}", "!".yellow(), path))?;
            } else {
                return Ok(PathBuf::from(path));
            }
        }
    }

    /// Ask how many consecutive empty paragraphs make a blank run.
    pub fn min_blank_run(&mut self) -> io::Result<usize> {
        self.note("\nHow many consecutive empty paragraphs should count as an empty page?")?;
        self.note("(A typical page has ~25-30 lines, so 15-20 is a good minimum)")?;

        loop {
            let answer = self.ask(&format!(
                "Minimum empty paragraphs [default: {}]: ",
                DEFAULT_MIN_BLANK_RUN
            ))?;
            if answer.is_empty() {
                return Ok(DEFAULT_MIN_BLANK_RUN);
            }
            match answer.parse::<usize>() {
                Ok(n) if n >= 1 => return Ok(n),
                _ => self.note("Enter a whole number of at least 1.")?,
            }
        }
    }

    /// Ask a yes/no question.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        loop {
            match self.ask(&format!("{} (y/n): ", question))?.to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.note("Type y or n.")?,
            }
        }
    }

    /// Ask whether to remove all, select, or cancel.
    pub fn mode(&mut self) -> io::Result<Mode> {
        self.note("\nOptions:")?;
        self.note("  [a] Delete ALL empty pages and blank runs")?;
        self.note("  [s] Select what to delete")?;
        self.note("  [n] Cancel - don't delete anything")?;

        loop {
            match self.ask("\nYour choice (a/s/n): ")?.to_lowercase().as_str() {
                "a" | "all" => return Ok(Mode::All),
                "s" | "select" => return Ok(Mode::Select),
                "n" | "no" | "cancel" => return Ok(Mode::Cancel),
                other => self.note(&format!("Unknown choice '{}', type a, s or n.", other))?,
            }
        }
    }

    /// Require the literal answer `yes` before deleting everything.
    pub fn confirm_all(&mut self) -> io::Result<bool> {
        let answer = self.ask("\nDelete everything listed above? Type 'yes' to confirm: ")?;
        Ok(answer.eq_ignore_ascii_case("yes"))
    }

    /// Ask for page numbers such as `2,4-5` among `count` pages.
    pub fn selection(&mut self, count: usize) -> io::Result<Selection> {
        loop {
            let answer = self.ask(&format!("\nPages to delete (1-{}, e.g. 2,4-5): ", count))?;
            match Selection::parse(&answer) {
                Ok(Selection::Indices(indices)) if indices.iter().all(|&i| i < count) => {
                    return Ok(Selection::Indices(indices));
                }
                Ok(Selection::Indices(_)) => {
                    self.note(&format!("Page numbers must be between 1 and {}.", count))?;
                }
                Ok(Selection::All) => return Ok(Selection::All),
                Err(e) => self.note(&e.to_string())?,
            }
        }
    }
}

/// Remove whitespace and one pair of surrounding quotes.
pub fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(quote).and_then(|r| r.strip_suffix(quote)) {
            return inner.trim();
        }
    }
    s
}
