//! The run flow: detect a better language tag, collect interactive inputs,
//! then either evaluate JavaScript in-process or hand the source to the
//! external compile/execute service.

use anyhow::Result;
use thiserror::Error;

use limn_engine::JsEngine;
use limn_lang::Language;
use limn_lint::FlaggedLines;

mod prompts;
mod service;

pub use prompts::{LoopPlan, PromptRequest, PromptSource, collect_inputs, loop_plan, scan_prompts};
pub use service::{
    CompileService, ExecuteRequest, ExecutionReport, IrReport, ServiceFinding, ServiceNote,
    ServiceResponse, error_lines, render_panel,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    Silent,
    Minimal,
    Verbose,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    /// The user aborted an interactive prompt; nothing was dispatched.
    #[error("execution cancelled by user")]
    Cancelled,
    #[error("no code to run")]
    EmptyBuffer,
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Re-fingerprint the source and override the active language tag when
    /// a better fit is found.
    pub auto_detect: bool,
    pub progress_mode: ProgressMode,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            auto_detect: true,
            progress_mode: ProgressMode::Minimal,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// The language the run actually used.
    pub language: Language,
    /// Set when auto-detection overrode the caller's tag.
    pub detected: Option<Language>,
    /// Output panel text.
    pub panel: String,
    /// Whether the run is considered successful.
    pub success: bool,
    /// Line numbers to merge into the flagged set.
    pub error_lines: FlaggedLines,
}

/// Run `code`. JavaScript evaluates in-process; everything else goes to the
/// external service with the collected inputs passed positionally.
///
/// Evaluation and service failures come back inside the outcome's panel —
/// they are display material. Only cancellation and transport-level
/// breakage surface as errors.
pub fn dispatch<E, S, P>(
    engine: &mut E,
    service: &S,
    prompt_source: &mut P,
    code: &str,
    language: Language,
    options: &RunOptions,
) -> Result<RunOutcome>
where
    E: JsEngine + ?Sized,
    S: CompileService,
    P: PromptSource + ?Sized,
{
    let code = code.trim();
    if code.is_empty() {
        return Err(DispatchError::EmptyBuffer.into());
    }

    let mut active = language;
    let mut detected = None;
    if options.auto_detect
        && let Some(better) = limn_lang::detect(code)
        && better != active
    {
        if matches!(options.progress_mode, ProgressMode::Minimal | ProgressMode::Verbose) {
            eprintln!("[limn] auto-detected language: {better}");
        }
        active = better;
        detected = Some(better);
    }

    let inputs = collect_inputs(code, active, prompt_source)?;
    if matches!(options.progress_mode, ProgressMode::Verbose) {
        eprintln!("[limn] dispatching {active} run with {} input(s)", inputs.len());
    }

    if active == Language::JavaScript {
        return Ok(eval_in_process(engine, code, &inputs, active, detected));
    }

    let response = service.execute(&ExecuteRequest {
        code: code.to_string(),
        language: active,
        inputs,
    })?;

    Ok(RunOutcome {
        language: active,
        detected,
        panel: render_panel(&response),
        success: response.success
            && response
                .execution
                .as_ref()
                .is_none_or(|e| e.errors.is_empty()),
        error_lines: error_lines(&response),
    })
}

fn eval_in_process<E>(
    engine: &mut E,
    code: &str,
    inputs: &[String],
    language: Language,
    detected: Option<Language>,
) -> RunOutcome
where
    E: JsEngine + ?Sized,
{
    match engine.eval_script(code, "<playground>", inputs) {
        Ok(output) => {
            let mut lines = output.console;
            if let Some(value) = output.value {
                lines.push(value);
            }
            let panel = if lines.is_empty() {
                "Code executed successfully (no output)".to_string()
            } else {
                lines.join("\n")
            };
            RunOutcome {
                language,
                detected,
                panel,
                success: true,
                error_lines: FlaggedLines::new(),
            }
        }
        // Shown verbatim, never fatal to the session.
        Err(err) => RunOutcome {
            language,
            detected,
            panel: format!("Error: {err:#}"),
            success: false,
            error_lines: FlaggedLines::new(),
        },
    }
}

/// Best-effort remote pass behind the scan debounce: ask the service for
/// its findings and keep only the line numbers. Any failure degrades to
/// `None`; the caller keeps its local heuristics.
pub fn remote_scan<S: CompileService>(
    service: &S,
    code: &str,
    language: Language,
    progress_mode: ProgressMode,
) -> Option<FlaggedLines> {
    let request = ExecuteRequest {
        code: code.to_string(),
        language,
        inputs: Vec::new(),
    };
    match service.execute(&request) {
        Ok(response) => Some(error_lines(&response)),
        Err(err) => {
            if matches!(progress_mode, ProgressMode::Verbose) {
                eprintln!("[limn] remote scan unavailable: {err:#}");
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CompileService, DispatchError, ExecuteRequest, ProgressMode, PromptSource, RunOptions,
        ServiceFinding, ServiceResponse, dispatch, remote_scan,
    };
    use anyhow::{Result, anyhow};
    use limn_engine::BoaEngine;
    use limn_lang::Language;
    use std::cell::RefCell;

    struct StubService {
        fail: bool,
        response: ServiceResponse,
        requests: RefCell<Vec<ExecuteRequest>>,
    }

    impl StubService {
        fn ok(response: ServiceResponse) -> Self {
            Self {
                fail: false,
                response,
                requests: RefCell::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                response: ServiceResponse::default(),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl CompileService for StubService {
        fn execute(&self, req: &ExecuteRequest) -> Result<ServiceResponse> {
            self.requests.borrow_mut().push(req.clone());
            if self.fail {
                return Err(anyhow!("service unreachable"));
            }
            Ok(self.response.clone())
        }
    }

    struct NoPrompts;

    impl PromptSource for NoPrompts {
        fn capture(&mut self, _label: &str) -> Result<Option<String>> {
            Ok(Some(String::new()))
        }
    }

    struct CancelAll {
        shown: usize,
    }

    impl PromptSource for CancelAll {
        fn capture(&mut self, _label: &str) -> Result<Option<String>> {
            self.shown += 1;
            Ok(None)
        }
    }

    fn silent() -> RunOptions {
        RunOptions {
            auto_detect: true,
            progress_mode: ProgressMode::Silent,
        }
    }

    #[test]
    fn javascript_runs_in_process() {
        let mut engine = BoaEngine::new();
        let service = StubService::failing();
        let outcome = dispatch(
            &mut engine,
            &service,
            &mut NoPrompts,
            "console.log('hi'); 40 + 2",
            Language::JavaScript,
            &silent(),
        )
        .expect("dispatch should pass");

        assert_eq!(outcome.panel, "hi\n42");
        assert!(outcome.success);
        assert!(service.requests.borrow().is_empty());
    }

    #[test]
    fn javascript_prompt_values_are_fed_positionally() {
        struct OneValue;
        impl PromptSource for OneValue {
            fn capture(&mut self, _label: &str) -> Result<Option<String>> {
                Ok(Some("World".to_string()))
            }
        }

        let mut engine = BoaEngine::new();
        let service = StubService::failing();
        let outcome = dispatch(
            &mut engine,
            &service,
            &mut OneValue,
            "const name = prompt('who'); 'Hello ' + name",
            Language::JavaScript,
            &silent(),
        )
        .expect("dispatch should pass");
        assert_eq!(outcome.panel, "Hello World");
    }

    #[test]
    fn javascript_errors_are_displayed_not_propagated() {
        let mut engine = BoaEngine::new();
        let service = StubService::failing();
        let outcome = dispatch(
            &mut engine,
            &service,
            &mut NoPrompts,
            "throw new Error('boom')",
            Language::JavaScript,
            &silent(),
        )
        .expect("dispatch should pass");
        assert!(!outcome.success);
        assert!(outcome.panel.contains("boom"));
    }

    #[test]
    fn other_languages_go_to_the_service_with_inputs() {
        let mut engine = BoaEngine::new();
        let service = StubService::ok(ServiceResponse {
            success: true,
            ..ServiceResponse::default()
        });

        struct Scripted(Vec<String>);
        impl PromptSource for Scripted {
            fn capture(&mut self, _label: &str) -> Result<Option<String>> {
                Ok(Some(self.0.remove(0)))
            }
        }

        let code = "name = input(\"who: \")\nprint(name)";
        let mut prompts = Scripted(vec!["Ada".to_string()]);
        let outcome = dispatch(
            &mut engine,
            &service,
            &mut prompts,
            code,
            Language::Python,
            &silent(),
        )
        .expect("dispatch should pass");

        assert!(outcome.success);
        let requests = service.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].language, Language::Python);
        assert_eq!(requests[0].inputs, vec!["Ada"]);
    }

    #[test]
    fn detection_overrides_a_mismatched_tag() {
        let mut engine = BoaEngine::new();
        let service = StubService::ok(ServiceResponse {
            success: true,
            ..ServiceResponse::default()
        });
        let code = "public class Main {\n    public static void main(String[] args) {}\n}";
        let outcome = dispatch(
            &mut engine,
            &service,
            &mut NoPrompts,
            code,
            Language::Python,
            &silent(),
        )
        .expect("dispatch should pass");
        assert_eq!(outcome.language, Language::Java);
        assert_eq!(outcome.detected, Some(Language::Java));
    }

    #[test]
    fn cancellation_aborts_before_any_dispatch() {
        let mut engine = BoaEngine::new();
        let service = StubService::ok(ServiceResponse::default());
        let mut prompts = CancelAll { shown: 0 };
        let code = "a = input(\"one: \")\nb = input(\"two: \")\nc = input(\"three: \")";
        let err = dispatch(
            &mut engine,
            &service,
            &mut prompts,
            code,
            Language::Python,
            &silent(),
        )
        .expect_err("dispatch should abort");

        assert!(matches!(
            err.downcast_ref::<DispatchError>(),
            Some(DispatchError::Cancelled)
        ));
        assert_eq!(prompts.shown, 1);
        assert!(service.requests.borrow().is_empty());
    }

    #[test]
    fn empty_buffer_is_rejected() {
        let mut engine = BoaEngine::new();
        let service = StubService::failing();
        let err = dispatch(
            &mut engine,
            &service,
            &mut NoPrompts,
            "   \n ",
            Language::Python,
            &silent(),
        )
        .expect_err("dispatch should fail");
        assert!(matches!(
            err.downcast_ref::<DispatchError>(),
            Some(DispatchError::EmptyBuffer)
        ));
    }

    #[test]
    fn service_error_lines_reach_the_outcome() {
        let mut engine = BoaEngine::new();
        let service = StubService::ok(ServiceResponse {
            success: true,
            errors: vec![ServiceFinding {
                line: Some(2),
                message: "bad".to_string(),
                ..ServiceFinding::default()
            }],
            ..ServiceResponse::default()
        });
        let outcome = dispatch(
            &mut engine,
            &service,
            &mut NoPrompts,
            "x = 1\ny = z",
            Language::Python,
            &silent(),
        )
        .expect("dispatch should pass");
        assert_eq!(
            outcome.error_lines.iter().copied().collect::<Vec<_>>(),
            [2]
        );
    }

    #[test]
    fn remote_scan_degrades_to_none_on_failure() {
        let service = StubService::failing();
        assert!(remote_scan(&service, "x = 1", Language::Python, ProgressMode::Silent).is_none());
    }

    #[test]
    fn remote_scan_extracts_line_numbers() {
        let service = StubService::ok(ServiceResponse {
            success: true,
            errors: vec![ServiceFinding {
                line: Some(4),
                message: "oops".to_string(),
                ..ServiceFinding::default()
            }],
            ..ServiceResponse::default()
        });
        let lines = remote_scan(&service, "x = 1", Language::Python, ProgressMode::Silent)
            .expect("scan should pass");
        assert_eq!(lines.into_iter().collect::<Vec<_>>(), vec![4]);
    }
}
