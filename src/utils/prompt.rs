use std::io::{self, BufRead, Write};

/// Ask a yes/no question on stdin; anything but `y`/`yes` is a no.
pub fn confirm(question: &str) -> io::Result<bool> {
    print!("{} [y/N]: ", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(parse_yes(&input))
}

/// Read a trimmed line after showing `label`, asking again while the answer
/// is empty. End of input fails with `UnexpectedEof`.
pub fn prompt_required(label: &str) -> io::Result<String> {
    read_required(&mut io::stdin().lock(), &mut io::stdout(), label)
}

fn read_required<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> io::Result<String> {
    loop {
        write!(output, "{}: ", label)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no input given for '{}'", label),
            ));
        }
        let answer = line.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
    }
}

fn parse_yes(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
