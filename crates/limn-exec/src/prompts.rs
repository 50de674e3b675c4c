//! Interactive-input detection: build the prompt queue by scanning source
//! for the active language's input-call patterns, then resolve it strictly
//! sequentially. One cancelled prompt aborts the entire queue.

use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;

use limn_lang::Language;

use crate::DispatchError;

/// One pending interactive-input request. Nothing but the label survives
/// scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub label: String,
}

/// Resolves prompts one at a time. `Ok(None)` means the user cancelled.
pub trait PromptSource {
    fn capture(&mut self, label: &str) -> Result<Option<String>>;
}

static PY_INPUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"input\(\s*["']([^"']*)["']\s*\)|input\(\s*\)"#).expect("regex: python input")
});

static PY_RANGE_LOOP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*for\s+\w+\s+in\s+range\s*\(\s*([A-Za-z_]\w*)\s*\)\s*:")
        .expect("regex: python range loop")
});

static JAVA_SCANNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"sc\w*\.(?:nextInt|nextLine|nextDouble|nextFloat|nextBoolean|nextLong|next)\s*\(\s*\)")
        .expect("regex: java scanner")
});

static JAVA_PRINT_TRAILING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"System\.out\.print(?:ln)?\s*\(\s*["']([^"']*)["']\s*\)\s*;?\s*$"#)
        .expect("regex: java print")
});

static JAVA_PRINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"System\.out\.print(?:ln)?\s*\(\s*["']([^"']*)["']\s*\)"#)
        .expect("regex: java print anywhere")
});

static JAVA_COUNTED_LOOP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"for\s*\(\s*int\s+\w+\s*=\s*\d+\s*;\s*\w+\s*<\s*([A-Za-z_]\w*)\s*;")
        .expect("regex: java counted loop")
});

static JAVA_LOOP_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)for\s*\([^)]+\)\s*\{(.*?)\}").expect("regex: java loop body")
});

static C_SCANF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"scanf\s*\(\s*["']([^"']*)["']"#).expect("regex: scanf"));

static C_FORMAT_SPEC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%[diuoxXfFeEgGaAcspn]").expect("regex: format spec"));

static C_PRINTF_TRAILING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"printf\s*\(\s*["']([^"']*)["']\s*\)\s*;?\s*$"#).expect("regex: printf")
});

static CPP_CIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"cin\s*>>\s*(\w+)").expect("regex: cin"));

static CPP_GETLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"getline\s*\(\s*cin\s*,\s*(\w+)\s*\)").expect("regex: getline")
});

static CPP_COUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"cout\s*<<\s*["']([^"']*)["']"#).expect("regex: cout"));

static JS_PROMPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"prompt\(\s*["']([^"']*)["']\s*\)|prompt\(\s*\)"#).expect("regex: js prompt")
});

static GO_SCAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"fmt\.Scan(?:f|ln)?\s*\(([^)]*)\)").expect("regex: go scan")
});

static GO_PRINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"fmt\.Print(?:f|ln)?\s*\(\s*["']([^"']*)["']"#).expect("regex: go print")
});

static PHP_INPUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"fgets\s*\(\s*STDIN\s*\)|readline\s*\(\s*\)").expect("regex: php input")
});

static PHP_ECHO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"echo\s+["']([^"']*)["']"#).expect("regex: php echo"));

static TS_QUESTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"readlineSync\.question(?:Int|Float)?\s*\(\s*["']([^"']*)["']\s*\)|readlineSync\.question\s*\(\s*\)"#,
    )
    .expect("regex: ts question")
});

fn request(label: impl Into<String>) -> PromptRequest {
    PromptRequest {
        label: label.into(),
    }
}

fn trailing_label(pattern: &Regex, before: &str) -> Option<String> {
    pattern
        .captures(before)
        .map(|c| c.get(1).map_or(String::new(), |m| m.as_str().to_string()))
}

fn last_label(pattern: &Regex, before: &str) -> Option<String> {
    pattern
        .captures_iter(before)
        .last()
        .map(|c| c.get(1).map_or(String::new(), |m| m.as_str().to_string()))
}

/// Derive the prompt queue for `code` in the given language. Languages
/// without interactive input (sql, r) yield an empty queue.
pub fn scan_prompts(code: &str, lang: Language) -> Vec<PromptRequest> {
    let mut prompts = Vec::new();

    match lang {
        Language::Python => {
            for captures in PY_INPUT.captures_iter(code) {
                let label = captures.get(1).map_or("", |m| m.as_str());
                prompts.push(request(label));
            }
        }
        Language::Java => {
            for found in JAVA_SCANNER.find_iter(code) {
                let label = trailing_label(&JAVA_PRINT_TRAILING, &code[..found.start()])
                    .unwrap_or_default();
                prompts.push(request(label));
            }
        }
        Language::C | Language::Cpp => {
            for captures in C_SCANF.captures_iter(code) {
                let format = captures.get(1).map_or("", |m| m.as_str());
                let start = captures.get(0).map_or(0, |m| m.start());
                let specifiers = C_FORMAT_SPEC.find_iter(format).count();
                for index in 0..specifiers {
                    let fallback = format!("Enter value {}: ", prompts.len() + 1);
                    let label = if index == 0 {
                        trailing_label(&C_PRINTF_TRAILING, &code[..start])
                    } else {
                        None
                    };
                    prompts.push(request(label.unwrap_or(fallback)));
                }
            }
            for captures in CPP_CIN.captures_iter(code) {
                let start = captures.get(0).map_or(0, |m| m.start());
                let fallback = format!("Enter value {}: ", prompts.len() + 1);
                let label = last_label(&CPP_COUT, &code[..start]).unwrap_or(fallback);
                prompts.push(request(label));
            }
            for captures in CPP_GETLINE.captures_iter(code) {
                let start = captures.get(0).map_or(0, |m| m.start());
                let fallback = format!("Enter text {}: ", prompts.len() + 1);
                let label = last_label(&CPP_COUT, &code[..start]).unwrap_or(fallback);
                prompts.push(request(label));
            }
        }
        Language::JavaScript => {
            for captures in JS_PROMPT.captures_iter(code) {
                let label = captures
                    .get(1)
                    .map_or("Enter value: ", |m| m.as_str());
                prompts.push(request(label));
            }
        }
        Language::Go => {
            for captures in GO_SCAN.captures_iter(code) {
                let args = captures.get(1).map_or("", |m| m.as_str());
                let start = captures.get(0).map_or(0, |m| m.start());
                let count = args
                    .split(',')
                    .filter(|arg| arg.trim().starts_with('&'))
                    .count();
                let print = last_label(&GO_PRINT, &code[..start]);
                for index in 0..count {
                    let fallback = format!("Enter value {}: ", prompts.len() + 1);
                    let label = if index == 0 { print.clone() } else { None };
                    prompts.push(request(label.unwrap_or(fallback)));
                }
            }
        }
        Language::Php => {
            for found in PHP_INPUT.find_iter(code) {
                let fallback = format!("Enter value {}: ", prompts.len() + 1);
                let label = last_label(&PHP_ECHO, &code[..found.start()]).unwrap_or(fallback);
                prompts.push(request(label));
            }
        }
        Language::TypeScript => {
            for captures in TS_QUESTION.captures_iter(code) {
                let fallback = format!("Enter value {}: ", prompts.len() + 1);
                let label = captures.get(1).map(|m| m.as_str().to_string());
                prompts.push(request(label.unwrap_or(fallback)));
            }
        }
        Language::Sql | Language::R => {}
    }

    prompts
}

/// Prompt labels inside a counted loop whose bound is read as the first
/// input. The first captured value then determines how many extra prompts
/// the queue needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopPlan {
    pub prompts: Vec<String>,
}

pub fn loop_plan(code: &str, lang: Language) -> Option<LoopPlan> {
    match lang {
        Language::Python => python_loop_plan(code),
        Language::Java => java_loop_plan(code),
        _ => None,
    }
}

fn python_loop_plan(code: &str) -> Option<LoopPlan> {
    let lines: Vec<&str> = code.lines().collect();
    let header = lines
        .iter()
        .position(|line| PY_RANGE_LOOP.is_match(line))?;

    // The loop body runs until the first non-indented, non-empty line.
    let mut body = String::new();
    for line in &lines[header + 1..] {
        if !line.is_empty() && !line.starts_with(' ') && !line.starts_with('\t') {
            break;
        }
        body.push_str(line);
        body.push('\n');
    }

    let prompts: Vec<String> = PY_INPUT
        .captures_iter(&body)
        .map(|c| {
            let label = c.get(1).map_or("", |m| m.as_str());
            if label.is_empty() {
                "Enter value: ".to_string()
            } else {
                label.to_string()
            }
        })
        .collect();
    if prompts.is_empty() {
        return None;
    }
    Some(LoopPlan { prompts })
}

fn java_loop_plan(code: &str) -> Option<LoopPlan> {
    JAVA_COUNTED_LOOP.is_match(code).then_some(())?;
    let body = JAVA_LOOP_BODY
        .captures(code)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())?;

    let lines: Vec<&str> = body.lines().collect();
    let mut prompts = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        if !JAVA_SCANNER.is_match(line) {
            continue;
        }
        // Nearest print above the read supplies the label.
        let label = lines[..index]
            .iter()
            .rev()
            .find_map(|prev| {
                JAVA_PRINT
                    .captures(prev)
                    .map(|c| c.get(1).map_or(String::new(), |m| m.as_str().to_string()))
            })
            .unwrap_or_else(|| format!("Enter value {}: ", prompts.len() + 1));
        prompts.push(label);
    }
    if prompts.is_empty() {
        return None;
    }
    Some(LoopPlan { prompts })
}

/// Resolve the queue sequentially through `source`. The first captured
/// value may expand the queue via `loop_plan`; cancelling any prompt aborts
/// the rest and nothing is dispatched.
pub fn collect_inputs<P>(code: &str, lang: Language, source: &mut P) -> Result<Vec<String>>
where
    P: PromptSource + ?Sized,
{
    let queue = scan_prompts(code, lang);
    let plan = loop_plan(code, lang);
    let mut inputs = Vec::with_capacity(queue.len());

    for (index, prompt) in queue.iter().enumerate() {
        // Unlabeled reads still show where in the queue they sit.
        let label = if prompt.label.is_empty() {
            format!("Enter value {}/{}: ", index + 1, queue.len())
        } else {
            prompt.label.clone()
        };
        let Some(value) = source.capture(&label)? else {
            return Err(DispatchError::Cancelled.into());
        };
        inputs.push(value);

        if index == 0
            && let Some(plan) = &plan
            && let Ok(iterations) = inputs[0].trim().parse::<usize>()
            && iterations > 0
        {
            let extra = iterations * plan.prompts.len();
            for turn in 0..extra {
                let label = &plan.prompts[turn % plan.prompts.len()];
                let Some(value) = source.capture(label)? else {
                    return Err(DispatchError::Cancelled.into());
                };
                inputs.push(value);
            }
            // The scanned queue already counted the in-loop reads once;
            // the expansion replaces them.
            break;
        }
    }

    Ok(inputs)
}
