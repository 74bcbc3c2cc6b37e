//! Usage-text rendering: word wrapping, padding, per-command help

use crate::registry::{Command, Registry};

const LINE_MAX: usize = 78;

const CFG_ARG_SUMMARY: &str = "[-c <CFG>]";

const CFG_ARG_DETAILS: &str = "Path to file containing the program configuration. \
     If not specified, modwatch searches for a configuration file named \
     'modwatch.json' in the current working directory, and then \
     'modwatch.json' in the directory containing the program, and then \
     '.modwatch' in the current user's home directory.";

/// Wraps `text` to the usage line width, placing `preface` at the head of
/// the first line and aligning continuation lines under the text column.
/// Hard newlines in `text` are respected.
pub fn wrap(text: &str, preface: &str, indent: usize) -> String {
    let field = LINE_MAX.saturating_sub(preface.len() + indent).max(1);
    let mut output = String::new();
    let mut first_line = true;
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut emitted = false;
        for word in paragraph.split_whitespace() {
            if !line.is_empty() && line.len() + 1 + word.len() > field {
                push_line(&mut output, &line, preface, indent, &mut first_line);
                emitted = true;
                line.clear();
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        if !line.is_empty() || !emitted {
            push_line(&mut output, &line, preface, indent, &mut first_line);
        }
    }
    output
}

fn push_line(output: &mut String, line: &str, preface: &str, indent: usize, first_line: &mut bool) {
    output.push_str(&" ".repeat(indent));
    if *first_line {
        output.push_str(preface);
        *first_line = false;
    } else {
        output.push_str(&" ".repeat(preface.len()));
    }
    output.push_str(line);
    output.push('\n');
}

/// Pads `text` with trailing spaces out to `field` columns.
pub fn pad(text: &str, field: usize) -> String {
    let mut padded = text.to_string();
    while padded.len() < field {
        padded.push(' ');
    }
    padded
}

fn print_usage(arg_summary: &str, details: &str, arg_details: &[(String, String)]) {
    println!();
    println!("Usage: modwatch {}", arg_summary);
    println!();
    print!("{}", wrap(details, "", 0));
    println!();
    let longest = arg_details
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);
    for (name, details) in arg_details {
        println!("{}", wrap(details, &pad(name, longest + 2), 4));
    }
}

/// Prints the overall usage summary listing every registered command.
pub fn print_overall(registry: &Registry) {
    let mut summaries = String::from("Name of command to execute:\n");
    let longest = registry
        .iter()
        .map(|command| command.name.len())
        .max()
        .unwrap_or(0);
    for command in registry.iter() {
        summaries.push_str(&pad(command.name, longest + 2));
        summaries.push_str(command.summary);
        summaries.push('\n');
    }
    print_usage(
        &format!("{} <CMD> [ARG]..", CFG_ARG_SUMMARY),
        "Execute the given command.",
        &[
            ("CFG".to_string(), CFG_ARG_DETAILS.to_string()),
            ("CMD".to_string(), summaries),
        ],
    );
    print_usage(
        "help <CMD>",
        "Print usage information about a specific command and exit.",
        &[(
            "CMD".to_string(),
            "Name of command for which to get more information".to_string(),
        )],
    );
}

/// Prints detailed usage for one command.
pub fn print_command(command: &Command) {
    let mut arg_details: Vec<(String, String)> = command
        .arg_details
        .iter()
        .map(|(name, details)| (name.to_string(), details.to_string()))
        .collect();
    arg_details.push(("CFG".to_string(), CFG_ARG_DETAILS.to_string()));
    arg_details.sort();
    print_usage(
        &format!(
            "{} {} {}",
            CFG_ARG_SUMMARY, command.name, command.arg_summary
        ),
        command.details,
        &arg_details,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_extends_short_text() {
        assert_eq!(pad("abc", 6), "abc   ");
    }

    #[test]
    fn pad_leaves_long_text_alone() {
        assert_eq!(pad("abcdef", 3), "abcdef");
    }

    #[test]
    fn wrap_keeps_short_text_on_one_line() {
        assert_eq!(wrap("hello world", "", 0), "hello world\n");
    }

    #[test]
    fn wrap_honors_the_line_width() {
        let text = "word ".repeat(40);
        let wrapped = wrap(&text, "", 0);
        assert!(wrapped.lines().count() > 1);
        for line in wrapped.lines() {
            assert!(line.len() <= 78, "line too long: '{}'", line);
        }
    }

    #[test]
    fn wrap_places_the_preface_on_the_first_line_only() {
        let text = "alpha ".repeat(30);
        let wrapped = wrap(&text, "NAME  ", 4);
        let lines: Vec<&str> = wrapped.lines().collect();
        assert!(lines[0].starts_with("    NAME  alpha"));
        assert!(lines[1].starts_with("          alpha"));
    }

    #[test]
    fn wrap_respects_hard_newlines() {
        let wrapped = wrap("one\ntwo", "", 0);
        assert_eq!(wrapped, "one\ntwo\n");
    }
}
