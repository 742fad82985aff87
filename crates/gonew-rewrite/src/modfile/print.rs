//! Canonical go.mod printer

use super::ast::{Comments, FileSyntax, Line, LineBlock, Stmt};

/// Print a syntax tree in canonical layout
///
/// Statements are separated by one blank line, block lines are indented
/// with a tab, and tokens on a line are joined by single spaces.
pub fn format(file: &FileSyntax) -> String {
    let mut out = String::new();

    for (i, stmt) in file.stmts.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        match stmt {
            Stmt::Comments(comments) => print_comments(&mut out, comments, ""),
            Stmt::Line(line) => print_line(&mut out, line, ""),
            Stmt::Block(block) => print_block(&mut out, block),
        }
    }

    out
}

fn print_comments(out: &mut String, comments: &[String], indent: &str) {
    for comment in comments {
        if !comment.is_empty() {
            out.push_str(indent);
            out.push_str(comment.trim());
        }
        out.push('\n');
    }
}

fn print_suffix(out: &mut String, comments: &Comments) {
    if let Some(suffix) = &comments.suffix {
        out.push(' ');
        out.push_str(suffix.trim());
    }
    out.push('\n');
}

fn print_line(out: &mut String, line: &Line, indent: &str) {
    print_comments(out, &line.comments.before, indent);
    out.push_str(indent);
    out.push_str(&line.tokens.join(" "));
    print_suffix(out, &line.comments);
}

fn print_block(out: &mut String, block: &LineBlock) {
    print_comments(out, &block.comments.before, "");
    out.push_str(&block.verb.join(" "));

    if block.lines.is_empty() && block.close.before.is_empty() && block.comments.suffix.is_none() {
        out.push_str(" ()");
        print_suffix(out, &block.close);
        return;
    }

    out.push_str(" (");
    print_suffix(out, &block.comments);
    for line in &block.lines {
        print_line(out, line, "\t");
    }
    print_comments(out, &block.close.before, "\t");
    out.push(')');
    print_suffix(out, &block.close);
}

#[cfg(test)]
mod tests {
    use super::super::parser::ModParser;
    use super::*;

    fn reformat(input: &str) -> String {
        format(&ModParser::new(input).unwrap().parse().unwrap())
    }

    #[test]
    fn test_canonical_spacing() {
        assert_eq!(
            reformat("module   m\ngo    1.21\n\n\n\nrequire a v1.0.0"),
            "module m\n\ngo 1.21\n\nrequire a v1.0.0\n"
        );
    }

    #[test]
    fn test_block_indentation_and_comments() {
        let input = "// Top.\nrequire ( // deps\n    a v1 // indirect\n  // keep\n    b v2\n  // tail\n) // end\n";
        assert_eq!(
            reformat(input),
            "// Top.\nrequire ( // deps\n\ta v1 // indirect\n\t// keep\n\tb v2\n\t// tail\n) // end\n"
        );
    }

    #[test]
    fn test_comment_block_kept_separate() {
        assert_eq!(
            reformat("// License.\n\nmodule m\n"),
            "// License.\n\nmodule m\n"
        );
    }

    #[test]
    fn test_blank_line_inside_block() {
        assert_eq!(
            reformat("require (\n\ta v1\n\n\tb v2\n)\n"),
            "require (\n\ta v1\n\n\tb v2\n)\n"
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(reformat(""), "");
        assert_eq!(reformat("exclude ()\n"), "exclude ()\n");
    }
}
