//! String utility functions for rendering commands and script content.

/// Quote a word for POSIX `sh` when it contains anything but safe characters
///
/// # Examples
/// ```ignore
/// assert_eq!(shell_quote("plain-word"), "plain-word");
/// assert_eq!(shell_quote("two words"), "'two words'");
/// ```
pub fn shell_quote(word: &str) -> String {
    if word.is_empty() {
        return "''".to_string();
    }
    let safe = word
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Join a program and its arguments into one shell-like line
pub fn shell_join<I, S>(words: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| shell_quote(w.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format permission bits the way chmod accepts them
pub fn octal_mode(mode: u32) -> String {
    format!("{mode:04o}")
}
