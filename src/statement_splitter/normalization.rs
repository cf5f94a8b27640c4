// WHY: single-line, length-bounded rendering of statements for log lines and error messages
// Never used for execution; split output is executed verbatim

/// Collapse every whitespace run (newlines included) to one space and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    collapse_whitespace_into(text, &mut result);
    result
}

/// Collapse whitespace into supplied buffer to avoid allocation
pub fn collapse_whitespace_into(text: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len());

    for word in text.split_whitespace() {
        if !buffer.is_empty() {
            buffer.push(' ');
        }
        buffer.push_str(word);
    }
}

/// Render a statement on one line, truncated to `max_len` characters.
///
/// Output longer than `max_len` keeps its first `max_len - 3` characters and
/// ends in `...`, so its length is exactly `max_len`. Lengths count chars, not
/// bytes. Callers must pass `max_len >= 4`.
pub fn normalize_statement(statement: &str, max_len: usize) -> String {
    let mut result = String::with_capacity(statement.len());
    normalize_statement_into(statement, max_len, &mut result);
    result
}

/// Normalize statement into supplied buffer
/// WHY: the loader renders a preview per executed statement; one buffer serves them all
pub fn normalize_statement_into(statement: &str, max_len: usize, buffer: &mut String) {
    collapse_whitespace_into(statement, buffer);

    if buffer.chars().count() <= max_len {
        return;
    }

    // Byte offset of the first char past the kept prefix
    let cut = buffer
        .char_indices()
        .nth(max_len.saturating_sub(3))
        .map_or(buffer.len(), |(byte, _)| byte);
    buffer.truncate(cut);
    buffer.push_str("...");
}
