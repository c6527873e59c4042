//! Field extraction from received IRC text.
//!
//! The extractors work on the whole accumulated receive buffer and look only
//! at the first occurrence of each delimiter. Malformed input never errors;
//! it yields an empty or best-effort slice.

const ACTION: &str = "ACTION";
const CTCP_DELIM: char = '\x01';

/// The nick between the first `:` and the first `!`.
///
/// Empty when either delimiter is missing or `!` comes first.
pub fn extract_nick(line: &str) -> &str {
    match (line.find(':'), line.find('!')) {
        (Some(start), Some(end)) if start < end => &line[start + 1..end],
        _ => "",
    }
}

/// The human-readable part of a message.
///
/// Normally the text between the payload colon (the first `:` after the
/// leading one) and the first carriage return. When `ACTION` occurs anywhere
/// in the line the payload instead starts right after `ACTION` and stops one
/// character short of the next carriage return, dropping the closing CTCP
/// delimiter.
pub fn extract_payload(line: &str) -> &str {
    if let Some(pos) = line.find(ACTION) {
        return action_payload(line, pos + ACTION.len());
    }

    let Some(colon) = payload_colon(line) else {
        return "";
    };
    let start = colon + 1;
    match line.find('\r') {
        Some(end) if end >= start => &line[start..end],
        Some(_) => "",
        None => line[start..].trim_end_matches('\n'),
    }
}

fn action_payload(line: &str, start: usize) -> &str {
    let body = match line[start..].find('\r') {
        Some(cr) => &line[start..start + cr],
        // Unterminated: drop a trailing delimiter if one is there.
        None => return line[start..].trim_end_matches(['\n', CTCP_DELIM]),
    };
    let mut chars = body.chars();
    chars.next_back();
    chars.as_str()
}

/// Whether the line is rendered as a `/me` action.
///
/// True when `ACTION` begins exactly two characters after the payload colon,
/// i.e. `:\x01ACTION`. This is checked separately from the `ACTION` match in
/// [`extract_payload`]; crafted lines can satisfy one and not the other.
pub fn is_action_framed(line: &str) -> bool {
    match (line.find(ACTION), payload_colon(line)) {
        (Some(action), Some(colon)) => action == colon + 2,
        _ => false,
    }
}

/// The channel named by a JOIN line.
///
/// Servers send either `JOIN :#chan` or `JOIN #chan`; the first form goes
/// through [`extract_payload`], the second falls back to the parameter after
/// the command.
pub fn extract_join_channel(line: &str) -> &str {
    if payload_colon(line).is_some() {
        let payload = extract_payload(line);
        if !payload.is_empty() {
            return payload;
        }
    }
    join_parameter(line)
}

fn join_parameter(line: &str) -> &str {
    let Some(pos) = line.find("JOIN") else {
        return "";
    };
    line[pos + "JOIN".len()..]
        .split_whitespace()
        .next()
        .map(|param| param.trim_start_matches(':'))
        .unwrap_or("")
}

/// Byte offset of the first `:` after the leading one.
fn payload_colon(line: &str) -> Option<usize> {
    let first = line.find(':')?;
    line[first + 1..].find(':').map(|i| first + 1 + i)
}
