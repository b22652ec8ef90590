//! Interactive session loop, the only CLI surface.

use clap::{Parser, ValueEnum};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::analysis::{
    DatabaseAnalyzer, GeminiConfig, InteractionAnalyzer, StructuredAnalyzer,
};
use crate::entities::{DrugEntry, drug};
use crate::render;
use crate::session::{SEARCH_DEBOUNCE, SearchDebouncer, Session};
use crate::sources::openfda::OpenFdaClient;
use crate::sources::rxnav::RxNavClient;

#[derive(Debug, Parser)]
#[command(
    name = "medcheck",
    version,
    about = "Check a medication list for potential drug interactions"
)]
pub struct Cli {
    /// Analysis back end.
    #[arg(long, value_enum, default_value = "ai")]
    pub backend: Backend,

    /// Generative model identifier (ai back end only).
    #[arg(long)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Schema-constrained generative analysis (requires GEMINI_API_KEY).
    Ai,
    /// NLM RxNav pairwise interaction database.
    Database,
}

const HELP: &str = "\
Commands:
  search <text>   look up candidate medications by partial trade name
  add <n|name>    add suggestion number n, or a free-text drug name
  remove <n>      remove medication number n from the list
  list            show the current medication list
  analyze         run the interaction analysis
  clear           empty the list and discard any report
  help            show this message
  quit            exit
";

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let catalog = OpenFdaClient::new()?;
    let rxnav = RxNavClient::new()?;

    let analyzer: Box<dyn InteractionAnalyzer> = match cli.backend {
        Backend::Database => Box::new(DatabaseAnalyzer::new()?),
        Backend::Ai => {
            let mut config = GeminiConfig::from_env()?;
            if let Some(model) = cli.model {
                config.model = model;
            }
            Box::new(StructuredAnalyzer::new(config)?)
        }
    };

    let mut session = Session::new();
    let mut debouncer = SearchDebouncer::new();
    let mut suggestions: Vec<DrugEntry> = Vec::new();
    let mut manual_counter: u64 = 0;

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout.write_all(HELP.as_bytes()).await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        let output = match command {
            "help" => HELP.to_string(),
            "quit" | "exit" => break,
            "list" => render::roster_to_markdown(session.drugs()),
            "clear" => {
                session.clear();
                suggestions.clear();
                "Cleared.\n".to_string()
            }
            "search" => {
                let ticket = debouncer.begin(rest);
                tokio::time::sleep(SEARCH_DEBOUNCE).await;
                if !debouncer.is_current(&ticket) {
                    continue;
                }

                let found = drug::search_catalog(&catalog, &ticket.query).await;
                let available: Vec<DrugEntry> = found
                    .into_iter()
                    .filter(|c| !session.contains_same_drug(c))
                    .collect();

                match debouncer.accept(&ticket, available) {
                    Some(accepted) => {
                        suggestions = accepted;
                        if suggestions.is_empty() {
                            "No suggestions. You can still `add <name>` as free text.\n"
                                .to_string()
                        } else {
                            let mut out = String::new();
                            for (idx, candidate) in suggestions.iter().enumerate() {
                                out.push_str(&format!("{}. {}", idx + 1, candidate.name));
                                if let Some(generic) = &candidate.generic_name {
                                    out.push_str(&format!(" ({generic})"));
                                }
                                out.push('\n');
                            }
                            out
                        }
                    }
                    None => continue,
                }
            }
            "add" => {
                if rest.is_empty() {
                    "Usage: add <n|name>\n".to_string()
                } else {
                    let mut entry = match rest.parse::<usize>() {
                        Ok(n) if n >= 1 && n <= suggestions.len() => suggestions[n - 1].clone(),
                        _ => {
                            manual_counter += 1;
                            DrugEntry::free_text(format!("manual-{manual_counter}"), rest)
                        }
                    };

                    if cli.backend == Backend::Database {
                        drug::resolve_identifier(&rxnav, &mut entry).await;
                    }

                    let name = entry.name.clone();
                    if session.add(entry) {
                        format!("Added {name}.\n")
                    } else {
                        format!("{name} is already in the list.\n")
                    }
                }
            }
            "remove" => match rest.parse::<usize>() {
                Ok(n) if n >= 1 && n <= session.drugs().len() => {
                    let id = session.drugs()[n - 1].id.clone();
                    let name = session.drugs()[n - 1].name.clone();
                    session.remove(&id);
                    format!("Removed {name}.\n")
                }
                _ => "Usage: remove <n> (see `list`)\n".to_string(),
            },
            "analyze" => match analyzer.analyze(session.drugs()).await {
                Ok(result) => {
                    let rendered = render::report_to_markdown(&result);
                    session.set_result(result);
                    rendered
                }
                Err(err) => {
                    let message = err.to_string();
                    session.set_error(message.clone());
                    format!("Analysis failed: {message}\n")
                }
            },
            _ => format!("Unknown command: {command}. Type `help` for commands.\n"),
        };

        stdout.write_all(output.as_bytes()).await?;
    }

    Ok(())
}
