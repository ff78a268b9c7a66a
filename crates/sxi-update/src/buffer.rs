//! Edit buffer text
//!
//! A buffer handed to the editor has up to three parts:
//! 1. the YAML blocks being changed
//! 2. the commit message, as `# ` comment lines, followed by `#> ` guidance
//! 3. on retries, an error block of `## ` lines
//!
//! The error block is always last and is stripped from whatever the editor
//! returns.

/// First line of the error block
pub const ERROR_HEADER: &str = "## -- ERROR -----------------------";

/// Prefix every line of `message`, trimming each line
#[must_use]
pub fn comment_lines(message: &str, prefix: &str) -> String {
    message
        .lines()
        .map(|line| {
            let mut commented = format!("{prefix}{}", line.trim());
            commented.truncate(commented.trim_end().len());
            commented.push('\n');
            commented
        })
        .collect()
}

/// Append an error block (no-op for an empty error)
#[must_use]
pub fn with_error_block(content: &str, error: Option<&str>) -> String {
    let Some(error) = error.filter(|e| !e.is_empty()) else {
        return content.to_string();
    };
    format!(
        "{content}\n{ERROR_HEADER}\n{}",
        comment_lines(error, "## ")
    )
}

/// Drop the error block and everything after it
#[must_use]
pub fn strip_error_block(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    for line in content.lines() {
        if line.starts_with("##") {
            if result.ends_with("\n\n") {
                result.pop();
            }
            break;
        }
        result.push_str(line);
        result.push('\n');
    }
    result
}

/// Commit message: the first run of `#` lines, without the `#`
#[must_use]
pub fn extract_commit_message(content: &str) -> String {
    content
        .lines()
        .skip_while(|line| !line.starts_with('#'))
        .take_while(|line| line.starts_with('#'))
        .map(|line| format!("{}\n", line[1..].trim()))
        .collect()
}

/// Whether the human emptied the buffer
#[inline]
#[must_use]
pub fn is_blank(content: &str) -> bool {
    content.trim().is_empty()
}
