use anyhow::{Context, Result};
use limn_config::RunDefaults;
use limn_editor::EditorSession;
use limn_engine::BoaEngine;
use limn_exec::DispatchError;
use limn_lang::KeywordCategory;
use std::io::{self, Write};

use crate::prompt_io::StdinPromptSource;
use crate::runtime_context::{build_run_options, build_service, parse_language};

const HELP: &str = "Commands:\n\
  .lang <name>   switch language (loads that language's template)\n\
  .show          print the buffer with line numbers and error flags\n\
  .run           run the buffer\n\
  .lint          re-run the heuristics (plus the service, best-effort)\n\
  .chat <text>   ask the study helper about the buffer\n\
  .complete <w>  list autocomplete suggestions for a word\n\
  .clear         clear error flags\n\
  .exit          quit\n\
Anything else is appended to the buffer as a new line.";

fn print_buffer(session: &EditorSession) {
    let lines: Vec<&str> = session.buffer().split('\n').collect();
    for display in session.gutter() {
        let marker = if display.flagged { '!' } else { ' ' };
        let content = lines.get(display.number - 1).copied().unwrap_or_default();
        println!("{:>4}{} {}", display.number, marker, content);
    }
}

fn print_flagged(session: &EditorSession) {
    if session.flagged().is_empty() {
        println!("no flagged lines");
    } else {
        let flagged: Vec<String> = session.flagged().iter().map(ToString::to_string).collect();
        println!("flagged lines: {}", flagged.join(", "));
    }
}

/// Interactive playground session. Each appended line re-runs the local
/// heuristics, standing in for the editor's 600ms scan debounce.
pub(crate) fn repl(defaults: &RunDefaults) -> Result<()> {
    let configured = defaults.lang.as_deref().unwrap_or("python");
    let mut session = EditorSession::new(parse_language(configured)?);
    let mut engine = BoaEngine::new();
    let service = build_service(defaults);
    let options = build_run_options(defaults);

    println!(
        "limn playground REPL ({}). Type .help for commands, .exit to quit.",
        session.language()
    );

    let mut line = String::new();
    loop {
        line.clear();
        print!("limn> ");
        io::stdout().flush().context("failed flushing stdout")?;

        let bytes = io::stdin()
            .read_line(&mut line)
            .context("failed reading REPL input")?;
        if bytes == 0 {
            break;
        }

        let trimmed = line.trim_end_matches(['\n', '\r']);
        match trimmed {
            ".exit" => break,
            ".help" => println!("{HELP}"),
            ".show" => print_buffer(&session),
            ".clear" => {
                session.clear_flags();
                println!("flags cleared");
            }
            ".run" => {
                let mut prompts = StdinPromptSource;
                let code = session.buffer().to_string();
                match limn_exec::dispatch(
                    &mut engine,
                    &service,
                    &mut prompts,
                    &code,
                    session.language(),
                    &options,
                ) {
                    Ok(outcome) => {
                        if let Some(lang) = outcome.detected {
                            session.override_language(lang);
                        }
                        println!("{}", outcome.panel);
                        let mut flags = session.flagged().clone();
                        flags.extend(outcome.error_lines);
                        session.set_flags(flags);
                        print_flagged(&session);
                    }
                    Err(err) => match err.downcast_ref::<DispatchError>() {
                        Some(DispatchError::Cancelled) => {
                            println!("Execution cancelled by user.");
                        }
                        _ => eprintln!("error: {err:#}"),
                    },
                }
            }
            ".lint" => {
                let generation = session.arm_scan();
                session.apply_local_scan(generation);
                if let Some(remote) = limn_exec::remote_scan(
                    &service,
                    session.buffer(),
                    session.language(),
                    options.progress_mode,
                ) {
                    session.merge_remote_flags(generation, remote);
                }
                print_flagged(&session);
            }
            other if other == ".lang" || other.starts_with(".lang ") => {
                let hint = other.strip_prefix(".lang").unwrap_or_default().trim();
                if hint.is_empty() {
                    println!("current language: {}", session.language());
                    continue;
                }
                match parse_language(hint) {
                    Ok(lang) => {
                        session.set_language(lang);
                        println!("switched to {lang}; template loaded, flags cleared");
                    }
                    Err(err) => eprintln!("error: {err:#}"),
                }
            }
            other if other == ".complete" || other.starts_with(".complete ") => {
                let word = other.strip_prefix(".complete").unwrap_or_default().trim();
                match limn_complete::suggest(word, word.len(), session.language()) {
                    Some(list) => {
                        for entry in list.entries() {
                            let badge = match entry.category {
                                KeywordCategory::Keyword => "abc",
                                KeywordCategory::Function => "f()",
                            };
                            println!("{} {}", badge, entry.name);
                        }
                    }
                    None => println!("no suggestions"),
                }
            }
            other if other == ".chat" || other.starts_with(".chat ") => {
                let question = other.strip_prefix(".chat").unwrap_or_default().trim();
                println!("{}", limn_chat::respond(question, session.buffer()));
            }
            "" => {}
            _ => {
                if !session.buffer().is_empty() && !session.buffer().ends_with('\n') {
                    session.insert("\n");
                }
                session.insert(trimmed);
                // Stand-in for the debounce timer firing after the burst.
                let generation = session.arm_scan();
                session.apply_local_scan(generation);
            }
        }
    }

    Ok(())
}
