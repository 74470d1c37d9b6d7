//! Description heuristics for command definition files.
//!
//! Only the leading lines of a file are inspected; the first comment line
//! found becomes the command description. Kept free of file I/O so the
//! heuristic is testable against literal fixtures.

/// Number of leading lines inspected for a description comment.
pub const DESCRIPTION_SCAN_LINES: usize = 10;

/// Description used when a command file cannot be read at all.
pub const UNREADABLE_DESCRIPTION: &str = "カスタムコマンド";

/// Extract a description from the leading comment of a command file.
///
/// Recognizes `# ` (shell), `// ` and `/* ` (C-style) comment lines; the
/// first match within [`DESCRIPTION_SCAN_LINES`] wins. Returns `None` when
/// no comment line is found.
pub fn extract_description(content: &str) -> Option<String> {
    for line in content.lines().take(DESCRIPTION_SCAN_LINES) {
        let trimmed = line.trim();

        // A shebang never matches: there is no space after the '#'.
        if let Some(rest) = trimmed.strip_prefix("# ") {
            return Some(rest.trim().to_string());
        }

        if let Some(rest) = trimmed.strip_prefix("// ") {
            return Some(rest.trim_end_matches("*/").trim().to_string());
        }
        if let Some(rest) = trimmed.strip_prefix("/* ") {
            return Some(rest.trim_end_matches("*/").trim().to_string());
        }
    }

    None
}

/// Description used when a file carries no recognizable comment.
pub fn placeholder_description(command_name: &str) -> String {
    format!("{} コマンドを実行", command_name)
}
