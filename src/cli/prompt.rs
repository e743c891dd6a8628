//! Interactive prompts for the console workflow

use crate::core::FormatChoice;
use std::io::{self, Write};

/// Print a prompt and read one trimmed line from stdin
pub fn read_line(prompt: &str) -> io::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Ask for a URL until a non-empty one is entered
pub fn prompt_url() -> io::Result<String> {
    loop {
        let url = read_line("Enter the video URL: ")?;
        if !url.is_empty() {
            return Ok(url);
        }
        println!("A URL is required.");
    }
}

/// Parse a menu answer into a choice number
pub fn parse_choice(input: &str) -> Option<u8> {
    match input.trim() {
        "1" => Some(1),
        "2" => Some(2),
        "3" => Some(3),
        _ => None,
    }
}

/// Present the download menu and return the selected option
pub fn prompt_choice() -> io::Result<u8> {
    println!("Choose download option:");
    println!("1. Video and Audio (Highest Quality)");
    println!("2. Audio only (Highest Quality)");
    println!("3. Custom format choice");

    loop {
        let answer = read_line("Enter your choice (1/2/3): ")?;
        if let Some(choice) = parse_choice(&answer) {
            return Ok(choice);
        }
        println!("Please enter 1, 2 or 3.");
    }
}

/// Ask for a format code until a non-empty one is entered
pub fn prompt_format_code() -> io::Result<FormatChoice> {
    loop {
        let code = read_line("Enter the format code(s) for download (e.g. '137+140'): ")?;
        if !code.is_empty() {
            return Ok(FormatChoice::Custom(code));
        }
        println!("A format code is required for the custom choice.");
    }
}

/// Ask for the output directory; blank means the default location
pub fn prompt_output_dir() -> io::Result<String> {
    read_line("Enter download folder path (leave blank for current folder): ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("1"), Some(1));
        assert_eq!(parse_choice(" 2 "), Some(2));
        assert_eq!(parse_choice("3"), Some(3));
        assert_eq!(parse_choice("4"), None);
        assert_eq!(parse_choice(""), None);
        assert_eq!(parse_choice("audio"), None);
    }
}
