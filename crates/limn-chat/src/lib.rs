//! Keyword-matched study helper. Canned and templated responses referencing
//! the current buffer; no memory across turns beyond the visible
//! transcript, no learning.

use regex::Regex;
use std::sync::LazyLock;

static LINE_QUESTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"line\s*(\d+)").expect("regex: line question"));

static PRINTED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"print\((\w+)\)").expect("regex: printed name"));

const USAGE_HINT: &str = "I'm here to help you learn!\n\nAsk me:\n\
- 'what was error in line X' - to check a specific line\n\
- 'help' - to analyze your entire code\n\
- About Python concepts (print, variables, loops, etc.)";

fn asked_line(question: &str) -> Option<usize> {
    if let Some(captures) = LINE_QUESTION.captures(question) {
        return captures[1].parse().ok();
    }
    if question.contains("first line") {
        return Some(1);
    }
    if question.contains("second line") {
        return Some(2);
    }
    if question.contains("third line") {
        return Some(3);
    }
    None
}

fn opens_block(line: &str) -> bool {
    ["if ", "elif ", "for ", "while ", "def ", "class "]
        .iter()
        .any(|k| line.starts_with(k))
        || line == "else"
}

fn count(line: &str, target: char) -> usize {
    line.chars().filter(|c| *c == target).count()
}

fn analyze_line(raw: &str, number: usize) -> String {
    let line = raw.trim();
    let mut response = format!("Line {number}: \"{raw}\"\n\n");

    if line.is_empty() {
        response.push_str("This line is empty. No error here!");
    } else if line.starts_with('#') {
        response.push_str("This is a comment line. Comments don't cause errors!");
    } else if opens_block(line) && !line.ends_with(':') {
        response.push_str(
            "Error Found: Missing colon (:)\n\n\
             In Python, you need a colon at the end of:\n\
             - if/elif/else statements\n- for/while loops\n\
             - function definitions (def)\n- class definitions\n\n\
             Fix: Add : at the end of this line",
        );
    } else if line.contains(" = ") && line.starts_with("if ") && !line.contains("==") {
        response.push_str(
            "Error Found: Using = instead of ==\n\n\
             Explanation:\n- = is for assignment (x = 5)\n\
             - == is for comparison (if x == 5:)\n\nFix: Change = to ==",
        );
    } else if count(line, '(') != count(line, ')') {
        response.push_str(
            "Error Found: Unmatched parentheses\n\n\
             Every opening ( needs a closing )\n\nFix: Check your parentheses match",
        );
    } else if count(line, '"') % 2 != 0 || count(line, '\'') % 2 != 0 {
        response.push_str(
            "Error Found: Unmatched quotes\n\n\
             Every opening quote needs a closing quote\n\nFix: Make sure quotes are in pairs",
        );
    } else {
        response.push_str(
            "This line looks syntactically correct!\n\n\
             If you're still seeing errors:\n- Check indentation (use 4 spaces)\n\
             - Make sure variables are defined before use\n\
             - Run the code to see the actual error message",
        );
    }

    response
}

fn analyze_buffer(buffer: &str) -> String {
    if buffer.trim().is_empty() {
        return "Your editor is empty! Write some code first, then I can help you debug it."
            .to_string();
    }

    let lines: Vec<&str> = buffer.lines().collect();
    let mut report = String::from("Let me analyze your code...\n\n");
    let mut found_issues = false;

    for (index, raw) in lines.iter().enumerate() {
        let number = index + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if (opens_block(line) || line.starts_with("else")) && !line.ends_with(':') {
            report.push_str(&format!(
                "Line {number}: Missing colon (:)\n   \"{line}\"\n\n\
                 Explanation: In Python, you need a colon (:) at the end of control statements.\n\n\
                 Hint: Add : at the end of this line\n\n"
            ));
            found_issues = true;
        }

        if line.contains("print(") && !line.contains('"') && !line.contains('\'') {
            if let Some(captures) = PRINTED_NAME.captures(line) {
                let name = &captures[1];
                let earlier = lines[..index].join("\n");
                let defined =
                    earlier.contains(&format!("{name} =")) || earlier.contains(&format!("{name}="));
                if !defined && !["input", "int", "str", "float"].contains(&name) {
                    report.push_str(&format!(
                        "Line {number}: Variable '{name}' might not be defined\n   \"{line}\"\n\n\
                         Explanation: You're trying to print a variable that doesn't exist yet.\n\n\
                         Hint: Define the variable before using it. Example: {name} = some_value\n\n"
                    ));
                    found_issues = true;
                }
            }
        }

        if line.contains("if ") && line.contains(" = ") && !line.contains("==") {
            report.push_str(&format!(
                "Line {number}: Using = instead of ==\n   \"{line}\"\n\n\
                 Explanation: = is for assignment, == is for comparison.\n\n\
                 Hint: Change = to == for comparison\n\n"
            ));
            found_issues = true;
        }

        let previous = if index > 0 { lines[index - 1].trim() } else { "" };
        if previous.ends_with(':')
            && !raw.is_empty()
            && !raw.starts_with(' ')
            && !raw.starts_with('\t')
        {
            report.push_str(&format!(
                "Line {number}: Missing indentation\n   \"{line}\"\n\n\
                 Explanation: Code after : must be indented (4 spaces or 1 tab).\n\n\
                 Hint: Add 4 spaces at the start of this line\n\n"
            ));
            found_issues = true;
        }
    }

    if found_issues {
        report.push_str(
            "\nTry fixing these issues first!\n\
             If you're still stuck, ask me about the specific line.",
        );
    } else {
        report.push_str(
            "No obvious syntax errors found!\n\n\
             If your code isn't working:\n1. Run the code to see the actual error\n\
             2. Check the red line numbers\n3. Tell me which line has the error",
        );
    }

    report
}

/// Answer a question about the current buffer.
pub fn respond(question: &str, buffer: &str) -> String {
    let lowered = question.to_lowercase();
    let lines: Vec<&str> = buffer.lines().collect();

    if let Some(number) = asked_line(&lowered)
        && number >= 1
        && number <= lines.len()
    {
        return analyze_line(lines[number - 1], number);
    }

    if ["help", "error", "wrong", "not working"]
        .iter()
        .any(|k| lowered.contains(k))
    {
        return analyze_buffer(buffer);
    }

    if ["solution", "fix it", "correct code"]
        .iter()
        .any(|k| lowered.contains(k))
    {
        return format!(
            "Let me help you understand first!\n\n\
             Instead of giving you the answer, let me guide you:\n\n{}",
            analyze_buffer(buffer)
        );
    }

    if lowered.contains("print") {
        return "The print() function displays output.\n\nSyntax: print(value)\nExample: print('Hello')"
            .to_string();
    }
    if lowered.contains("variable") {
        return "Variables store data.\n\nSyntax: variable_name = value\nExample: age = 25"
            .to_string();
    }
    if lowered.contains("input") {
        return "The input() function gets user input.\n\n\
                Syntax: variable = input('prompt')\nExample: name = input('Enter name: ')"
            .to_string();
    }
    if lowered.contains("function") || lowered.contains("def") {
        return "Functions are reusable code blocks.\n\n\
                Syntax:\ndef function_name(parameters):\n    # code\n    return result"
            .to_string();
    }
    if lowered.contains("loop") || lowered.contains("for") {
        return "Loops repeat code.\n\nFor loop:\nfor i in range(5):\n    print(i)".to_string();
    }
    if lowered.contains("if") {
        return "If statements check conditions.\n\nSyntax:\nif condition:\n    # code".to_string();
    }

    USAGE_HINT.to_string()
}
