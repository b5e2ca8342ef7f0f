//! Reading a game's moves from text.

/// Extract SAN moves from movetext.
///
/// Accepts a bare list (`e4 e5 Nf3`) as well as numbered movetext
/// (`1. e4 e5 2. Nf3`). Move numbers, results, `{...}` comments and PGN tag
/// lines are skipped.
pub fn parse_moves(text: &str) -> Vec<String> {
    let mut moves = Vec::new();
    let mut in_comment = false;

    for line in text.lines() {
        if line.trim_start().starts_with('[') {
            continue;
        }
        for token in line.split_whitespace() {
            if in_comment {
                in_comment = !token.ends_with('}');
                continue;
            }
            if token.starts_with('{') {
                in_comment = !token.ends_with('}');
                continue;
            }
            if is_result(token) {
                continue;
            }
            let san = token.trim_start_matches(|c: char| c.is_ascii_digit() || c == '.');
            if !san.is_empty() {
                moves.push(san.to_string());
            }
        }
    }
    moves
}

fn is_result(token: &str) -> bool {
    matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*")
}
