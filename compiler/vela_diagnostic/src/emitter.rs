//! Diagnostic rendering.
//!
//! Human-readable annotated snippets: header line, source excerpt with a
//! line-number gutter, carets under the labeled region, and an explanatory
//! label. Secondary labels render as further excerpts beneath the primary.

use std::fmt::Write as _;

use crate::{Diagnostic, DiagnosticQueue, Label, LabelStyle, SourceFile};

/// Render a single diagnostic as an annotated snippet.
pub fn render(diag: &Diagnostic, file: &SourceFile) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{}[{}]: {}",
        diag.severity,
        diag.code.as_str(),
        diag.message
    );

    // Primary first, then secondaries, regardless of attachment order.
    let mut ordered: Vec<&Label> = diag
        .labels
        .iter()
        .filter(|l| l.style == LabelStyle::Primary)
        .collect();
    ordered.extend(diag.labels.iter().filter(|l| l.style == LabelStyle::Secondary));

    for label in ordered {
        render_label(&mut out, label, file);
    }

    for help in &diag.help {
        let _ = writeln!(out, "  help: {help}");
    }

    out
}

fn render_label(out: &mut String, label: &Label, file: &SourceFile) {
    let pos = file.line_col(label.span.start);
    let line_text = file.line_text(pos.line);
    let gutter = pos.line.to_string();
    let pad = " ".repeat(gutter.len());

    let _ = writeln!(out, "{pad}--> {}:{}:{}", file.path(), pos.line, pos.col);
    let _ = writeln!(out, "{pad} |");
    let _ = writeln!(out, "{gutter} | {line_text}");

    // Caret width: the labeled region clipped to its first line, at least 1.
    let line_remaining = line_text.len() as u32 - (pos.col - 1).min(line_text.len() as u32);
    let width = label.span.len().clamp(1, line_remaining.max(1)) as usize;
    let marker = match label.style {
        LabelStyle::Primary => "^",
        LabelStyle::Secondary => "-",
    }
    .repeat(width);
    let indent = " ".repeat(pos.col as usize - 1);
    let _ = writeln!(out, "{pad} | {indent}{marker} {}", label.message);
}

/// Render every stored diagnostic plus the overflow note, if any.
pub fn render_all(queue: &DiagnosticQueue, file: &SourceFile) -> String {
    let mut out = String::new();
    for diag in queue {
        out.push_str(&render(diag, file));
        out.push('\n');
    }
    if queue.suppressed() > 0 {
        let _ = writeln!(
            out,
            "note: {} additional diagnostic{} not shown",
            queue.suppressed(),
            if queue.suppressed() == 1 { "" } else { "s" }
        );
    }
    out
}

/// Escape a string for inclusion in hand-written JSON output.
pub fn escape_json(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use vela_ir::Span;

    #[test]
    fn render_snippet_with_caret() {
        let file = SourceFile::new("main.vela", "fun main(): unit { if true then break; }");
        let diag = Diagnostic::error(ErrorCode::E4001, "`break` outside of a loop")
            .with_label(Span::new(32, 37), "not inside any loop");

        let rendered = render(&diag, &file);
        assert!(rendered.contains("error[E4001]: `break` outside of a loop"));
        assert!(rendered.contains("--> main.vela:1:33"));
        assert!(rendered.contains("^^^^^ not inside any loop"));
    }

    #[test]
    fn render_secondary_label() {
        let file = SourceFile::new("main.vela", "fun f(): unit {}\nfun f(): unit {}");
        let diag = Diagnostic::error(ErrorCode::E2001, "symbol `f` is already declared")
            .with_label(Span::new(21, 22), "redeclared here")
            .with_secondary(Span::new(4, 5), "first declared here");

        let rendered = render(&diag, &file);
        assert!(rendered.contains("main.vela:2:5"));
        assert!(rendered.contains("main.vela:1:5"));
        assert!(rendered.contains("^ redeclared here"));
        assert!(rendered.contains("- first declared here"));
    }

    #[test]
    fn escape_json_specials() {
        assert_eq!(escape_json("a\"b"), "a\\\"b");
        assert_eq!(escape_json("a\\b"), "a\\\\b");
        assert_eq!(escape_json("a\nb"), "a\\nb");
        assert_eq!(escape_json("\u{1}"), "\\u0001");
    }
}
