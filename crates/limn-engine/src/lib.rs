//! In-process JavaScript evaluation for the one language the playground
//! can run without the external service.

use anyhow::{Context as _, Result, anyhow};
use boa_engine::{Context, Source};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalOutput {
    /// Completion value of the script, unless it evaluated to `undefined`.
    pub value: Option<String>,
    /// Captured `console.log` / `console.error` lines, in emission order.
    pub console: Vec<String>,
}

pub trait JsEngine {
    /// Evaluate `source`, feeding `inputs` positionally to `prompt()`.
    /// Evaluation errors come back as errors; they are display material for
    /// the output panel, never fatal to the session.
    fn eval_script(&mut self, source: &str, source_name: &str, inputs: &[String])
    -> Result<EvalOutput>;
}

pub struct BoaEngine {
    ctx: Context,
}

impl BoaEngine {
    pub fn new() -> Self {
        let mut engine = Self {
            ctx: Context::default(),
        };
        engine.install_shims();
        engine
    }

    fn install_shims(&mut self) {
        // console capture and a positional prompt(). The playground owns
        // presentation, so nothing prints from inside the engine.
        let _ = self.ctx.eval(Source::from_bytes(
            r#"
globalThis.__limn_console = [];
globalThis.console = globalThis.console || {};
globalThis.console.log = (...args) => {
  globalThis.__limn_console.push(args.map((v) => String(v)).join(" "));
};
globalThis.console.error = (...args) => {
  globalThis.__limn_console.push(args.map((v) => String(v)).join(" "));
};
globalThis.__limn_flush_console = () => {
  const out = globalThis.__limn_console.join("\n");
  globalThis.__limn_console = [];
  return out;
};
globalThis.__limn_inputs = [];
globalThis.__limn_input_index = 0;
globalThis.prompt = (message) => {
  if (globalThis.__limn_input_index < globalThis.__limn_inputs.length) {
    return globalThis.__limn_inputs[globalThis.__limn_input_index++];
  }
  return "";
};
"#,
        ));
    }

    fn seed_inputs(&mut self, inputs: &[String]) -> Result<()> {
        let encoded =
            serde_json::to_string(inputs).context("failed encoding prompt inputs")?;
        let script = format!(
            "globalThis.__limn_inputs = {encoded}; globalThis.__limn_input_index = 0;"
        );
        self.ctx
            .eval(Source::from_bytes(&script))
            .map_err(|err| anyhow!("failed seeding prompt inputs: {err}"))?;
        Ok(())
    }

    fn flush_console(&mut self) -> Vec<String> {
        let flushed = self
            .ctx
            .eval(Source::from_bytes("globalThis.__limn_flush_console?.() ?? ''"));
        let Ok(value) = flushed else {
            return Vec::new();
        };
        let Ok(text) = value.to_string(&mut self.ctx) else {
            return Vec::new();
        };
        let rendered = text.to_std_string_escaped();
        if rendered.is_empty() {
            Vec::new()
        } else {
            rendered.lines().map(str::to_string).collect()
        }
    }
}

impl Default for BoaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl JsEngine for BoaEngine {
    fn eval_script(
        &mut self,
        source: &str,
        source_name: &str,
        inputs: &[String],
    ) -> Result<EvalOutput> {
        self.seed_inputs(inputs)?;

        let result = self
            .ctx
            .eval(Source::from_bytes(source))
            .map_err(|err| anyhow!("failed evaluating {source_name}: {err}"))?;

        let console = self.flush_console();

        if result.is_undefined() {
            return Ok(EvalOutput {
                value: None,
                console,
            });
        }

        let rendered = result
            .to_string(&mut self.ctx)
            .map_err(|err| anyhow!("failed converting JS value to string: {err}"))?
            .to_std_string_escaped();

        Ok(EvalOutput {
            value: Some(rendered),
            console,
        })
    }
}
