use std::io::{self, BufRead, Write};

/// Line-oriented terminal over any reader/writer pair.
#[derive(Debug)]
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, line: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{}", line.as_ref())
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.output)
    }

    /// Prints `label` and reads one trimmed line. `None` means input is closed.
    pub fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_trims_input_and_reports_end_of_input() {
        let mut output = Vec::new();
        let mut console = Console::new("  Seattle \n".as_bytes(), &mut output);
        assert_eq!(console.prompt("City: ").unwrap().as_deref(), Some("Seattle"));
        assert_eq!(console.prompt("State: ").unwrap(), None);
        drop(console);
        assert_eq!(String::from_utf8(output).unwrap(), "City: State: ");
    }
}
