fn sanitize_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_sep = false;
    for ch in value.chars() {
        if ch.is_whitespace() {
            if !out.is_empty() && !prev_sep {
                out.push('_');
                prev_sep = true;
            }
        } else if !ch.is_control() {
            out.push(ch);
            prev_sep = false;
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "na".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Emit a recoverable-event warning as a single `key=value` line on stderr.
/// Used for skipped workbook rows, failed backup copies, and failed section
/// file copies; none of those abort the surrounding operation.
pub fn emit(code: &str, subject: &str, reason: &str) {
    eprintln!(
        "NOTEARKIV_WARN code={} subject={} reason={}",
        sanitize_value(code),
        sanitize_value(subject),
        sanitize_value(reason),
    );
}
