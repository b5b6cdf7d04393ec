use std::fmt::Display;
use std::io::{self, Write};

/// Writes labelled result sets: a label line, one line per row, then a blank line.
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Section header naming the flavor whose results follow.
    ///
    /// # Errors
    /// Returns any error from the underlying writer.
    pub fn header(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out, "== {title} ==")?;
        writeln!(self.out)
    }

    /// # Errors
    /// Returns any error from the underlying writer.
    pub fn report<T: Display>(&mut self, label: &str, rows: &[T]) -> io::Result<()> {
        writeln!(self.out, "{label}")?;
        for row in rows {
            writeln!(self.out, "{row}")?;
        }
        writeln!(self.out)
    }

    /// # Errors
    /// Returns any error from the underlying writer.
    pub fn report_one<T: Display>(&mut self, label: &str, row: &T) -> io::Result<()> {
        self.report(label, std::slice::from_ref(row))
    }

    /// # Errors
    /// Returns any error from the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
