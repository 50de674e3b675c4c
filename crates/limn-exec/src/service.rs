//! Wire contract of the external compile/execute collaborator. Consumed,
//! never implemented, by this layer.

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use limn_lang::Language;
use limn_lint::FlaggedLines;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecuteRequest {
    pub code: String,
    pub language: Language,
    pub inputs: Vec<String>,
}

/// A compile-stage finding. `line` is often absent; the message text then
/// carries a `line N` reference instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceFinding {
    #[serde(default)]
    pub line: Option<usize>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub suggestion: Option<String>,
    #[serde(default)]
    pub code_line: Option<String>,
}

/// Warnings and suggestions arrive either as bare strings or as structured
/// findings, depending on the service's analysis stage.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ServiceNote {
    Text(String),
    Detailed {
        #[serde(default)]
        line: Option<usize>,
        message: String,
    },
}

impl ServiceNote {
    pub fn message(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Detailed { message, .. } => message,
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Text(_) => None,
            Self::Detailed { line, .. } => *line,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExecutionReport {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IrReport {
    #[serde(default)]
    pub instructions: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServiceResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Vec<ServiceFinding>,
    #[serde(default)]
    pub warnings: Vec<ServiceNote>,
    #[serde(default)]
    pub suggestions: Vec<ServiceNote>,
    #[serde(default)]
    pub execution: Option<ExecutionReport>,
    #[serde(default)]
    pub tokens: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub ir: Option<IrReport>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// The external collaborator, behind a trait so tests can stub it and the
/// HTTP client stays in its own crate.
pub trait CompileService {
    fn execute(&self, req: &ExecuteRequest) -> Result<ServiceResponse>;
}

static LINE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)line\s+(\d+)").expect("regex: line reference"));

fn line_from_message(message: &str) -> Option<usize> {
    LINE_REFERENCE
        .captures(message)
        .and_then(|c| c[1].parse().ok())
}

/// Collect every line number the response points at: explicit `line`
/// fields, `line N` references inside messages, warnings, and execution
/// errors alike.
pub fn error_lines(response: &ServiceResponse) -> FlaggedLines {
    let mut lines = FlaggedLines::new();

    for finding in &response.errors {
        if let Some(line) = finding.line.or_else(|| line_from_message(&finding.message)) {
            lines.insert(line);
        }
    }
    for warning in &response.warnings {
        if let Some(line) = warning.line().or_else(|| line_from_message(warning.message())) {
            lines.insert(line);
        }
    }
    if let Some(execution) = &response.execution {
        for error in &execution.errors {
            if let Some(line) = line_from_message(error) {
                lines.insert(line);
            }
        }
    }

    lines
}

/// Format a service response the way the output panel presents it.
pub fn render_panel(response: &ServiceResponse) -> String {
    if !response.success {
        let detail = response.error.as_deref().unwrap_or("Unknown error");
        return format!("Compilation Error:\n{detail}");
    }

    let mut out = String::new();

    if !response.errors.is_empty() {
        out.push_str("ERRORS FOUND:\n");
        for (index, finding) in response.errors.iter().enumerate() {
            let line = finding
                .line
                .map_or_else(|| "?".to_string(), |l| l.to_string());
            out.push_str(&format!(
                "\n{}. Line {}: {}\n",
                index + 1,
                line,
                finding.message
            ));
            if let Some(suggestion) = &finding.suggestion {
                out.push_str(&format!("   Suggestion: {suggestion}\n"));
            }
            if let Some(code_line) = &finding.code_line {
                out.push_str(&format!("   Code: {code_line}\n"));
            }
        }
        out.push('\n');
    }

    if !response.suggestions.is_empty() {
        out.push_str("AI SUGGESTIONS:\n");
        for (index, note) in response.suggestions.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", index + 1, note.message()));
        }
        out.push('\n');
    }

    if !response.warnings.is_empty() {
        out.push_str("WARNINGS:\n");
        for (index, note) in response.warnings.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", index + 1, note.message()));
        }
        out.push('\n');
    }

    if let Some(tokens) = &response.tokens {
        out.push_str(&format!("Tokenization: {} tokens\n", tokens.len()));
    }
    if let Some(ir) = &response.ir {
        out.push_str(&format!(
            "IR Generation: {} instructions\n",
            ir.instructions.len()
        ));
    }

    if let Some(execution) = &response.execution {
        out.push_str(&format!("Execution: {}\n\n", execution.status));
        if !execution.output.is_empty() {
            out.push_str("=== Output ===\n");
            out.push_str(&execution.output);
            out.push('\n');
        }
        if !execution.errors.is_empty() {
            out.push_str("\n=== Execution Errors ===\n");
            out.push_str(&execution.errors.join("\n"));
        }
    }

    if let Some(explanation) = &response.explanation {
        out.push_str("\n=== Compilation Info ===\n");
        out.push_str(explanation);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{
        ExecutionReport, ServiceFinding, ServiceNote, ServiceResponse, error_lines, render_panel,
    };

    fn response_with_errors() -> ServiceResponse {
        ServiceResponse {
            success: true,
            errors: vec![
                ServiceFinding {
                    line: Some(3),
                    message: "missing colon".to_string(),
                    suggestion: Some("add a ':'".to_string()),
                    ..ServiceFinding::default()
                },
                ServiceFinding {
                    line: None,
                    message: "SyntaxError at line 7".to_string(),
                    ..ServiceFinding::default()
                },
            ],
            warnings: vec![
                ServiceNote::Detailed {
                    line: Some(2),
                    message: "unused import".to_string(),
                },
                ServiceNote::Text("NameError on line 5".to_string()),
            ],
            execution: Some(ExecutionReport {
                status: "failed".to_string(),
                output: String::new(),
                errors: vec!["Traceback: error at line 9".to_string()],
            }),
            ..ServiceResponse::default()
        }
    }

    #[test]
    fn merges_line_numbers_from_every_section() {
        let lines: Vec<usize> = error_lines(&response_with_errors()).into_iter().collect();
        assert_eq!(lines, vec![2, 3, 5, 7, 9]);
    }

    #[test]
    fn response_without_line_references_flags_nothing() {
        let response = ServiceResponse {
            success: true,
            ..ServiceResponse::default()
        };
        assert!(error_lines(&response).is_empty());
    }

    #[test]
    fn decodes_the_full_wire_shape() {
        let raw = r#"{
            "success": true,
            "errors": [{"line": 4, "message": "bad token", "suggestion": "remove it"}],
            "warnings": ["unused variable x"],
            "suggestions": [{"message": "prefer f-strings"}],
            "execution": {"status": "success", "output": "hi\n", "errors": []},
            "tokens": [{"kind": "ident"}, {"kind": "number"}],
            "ir": {"instructions": [{"op": "load"}]},
            "explanation": "compiled in two passes"
        }"#;
        let response: ServiceResponse =
            serde_json::from_str(raw).expect("wire shape should decode");
        assert_eq!(response.errors[0].line, Some(4));
        assert_eq!(response.warnings[0].message(), "unused variable x");
        assert_eq!(response.tokens.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn unsuccessful_response_renders_the_top_level_error() {
        let response = ServiceResponse {
            success: false,
            error: Some("unsupported language".to_string()),
            ..ServiceResponse::default()
        };
        assert_eq!(
            render_panel(&response),
            "Compilation Error:\nunsupported language"
        );
    }

    #[test]
    fn snapshot_full_panel() {
        insta::assert_snapshot!(render_panel(&response_with_errors()), @r"
        ERRORS FOUND:

        1. Line 3: missing colon
           Suggestion: add a ':'

        2. Line ?: SyntaxError at line 7

        WARNINGS:
        1. unused import
        2. NameError on line 5

        Execution: failed


        === Execution Errors ===
        Traceback: error at line 9
        ");
    }
}
