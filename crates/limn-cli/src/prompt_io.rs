use anyhow::{Context, Result};
use limn_exec::PromptSource;
use std::collections::VecDeque;
use std::io::{self, Write};

/// Interactive prompts on stdin. End-of-input counts as cancellation.
pub(crate) struct StdinPromptSource;

impl PromptSource for StdinPromptSource {
    fn capture(&mut self, label: &str) -> Result<Option<String>> {
        print!("{label}");
        io::stdout().flush().context("failed flushing stdout")?;

        let mut line = String::new();
        let bytes = io::stdin()
            .read_line(&mut line)
            .context("failed reading prompt input")?;
        if bytes == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

/// Pre-supplied `--input` values, consumed positionally. Running out of
/// values cancels the run rather than inventing data.
pub(crate) struct ScriptedPromptSource {
    values: VecDeque<String>,
}

impl ScriptedPromptSource {
    pub(crate) fn new(values: Vec<String>) -> Self {
        Self {
            values: values.into(),
        }
    }
}

impl PromptSource for ScriptedPromptSource {
    fn capture(&mut self, _label: &str) -> Result<Option<String>> {
        Ok(self.values.pop_front())
    }
}
