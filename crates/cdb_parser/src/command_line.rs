//! Shell-style splitting of a record's `command` string.

/// Splits a command line into arguments.
///
/// Whitespace separates arguments. Single quotes group text literally. Double
/// quotes group text, and inside them `\"` and `\\` are escapes. Outside
/// quotes a backslash escapes a following quote, space or backslash; any other
/// backslash is kept, so Windows paths such as `C:\src\a.cpp` survive intact.
/// Adjacent quoted and unquoted segments join into one argument, so
/// `-DNAME="a b"` yields `-DNAME=a b`.
pub fn split_command_line(command: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    // Distinguishes `""` (an empty argument) from no argument at all.
    let mut in_arg = false;
    let mut chars = command.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            '\'' => {
                in_arg = true;
                for q in chars.by_ref() {
                    if q == '\'' {
                        break;
                    }
                    current.push(q);
                }
            }
            '"' => {
                in_arg = true;
                while let Some(q) = chars.next() {
                    match q {
                        '"' => break,
                        '\\' if matches!(chars.peek(), Some('"' | '\\')) => {
                            if let Some(escaped) = chars.next() {
                                current.push(escaped);
                            }
                        }
                        other => current.push(other),
                    }
                }
            }
            '\\' => {
                in_arg = true;
                match chars.peek() {
                    Some(&next) if next == '"' || next == '\'' || next == '\\' || next == ' ' => {
                        current.push(next);
                        chars.next();
                    }
                    _ => current.push('\\'),
                }
            }
            other => {
                in_arg = true;
                current.push(other);
            }
        }
    }
    if in_arg {
        args.push(current);
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(
            split_command_line("  /usr/bin/cc -c\t-o a.o   a.c "),
            vec!["/usr/bin/cc", "-c", "-o", "a.o", "a.c"]
        );
    }

    #[test]
    fn empty_command() {
        assert!(split_command_line("").is_empty());
        assert!(split_command_line("   ").is_empty());
    }

    #[test]
    fn double_quotes_group_and_join() {
        assert_eq!(
            split_command_line(r#"cc "-DMSG=hello world" -DNAME="a b" x"#),
            vec!["cc", "-DMSG=hello world", "-DNAME=a b", "x"]
        );
    }

    #[test]
    fn escaped_quote_inside_double_quotes() {
        assert_eq!(
            split_command_line(r#"cc "-DSTR=\"x\"""#),
            vec!["cc", r#"-DSTR="x""#]
        );
    }

    #[test]
    fn single_quotes_are_literal() {
        assert_eq!(
            split_command_line(r#"cc '-DA=\"b\"' c"#),
            vec!["cc", r#"-DA=\"b\""#, "c"]
        );
    }

    #[test]
    fn empty_quotes_make_an_empty_argument() {
        assert_eq!(split_command_line(r#"cc "" x"#), vec!["cc", "", "x"]);
    }

    #[test]
    fn windows_paths_keep_backslashes() {
        assert_eq!(
            split_command_line(r"C:\LLVM\bin\clang-cl.exe /c C:\src\a.cpp"),
            vec![r"C:\LLVM\bin\clang-cl.exe", "/c", r"C:\src\a.cpp"]
        );
    }

    #[test]
    fn escaped_space_outside_quotes() {
        assert_eq!(
            split_command_line(r"cc -I/my\ dir a.c"),
            vec!["cc", "-I/my dir", "a.c"]
        );
    }
}
