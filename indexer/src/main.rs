use anyhow::Result;
use boolsearch_core::source::DEFAULT_EXTENSION;
use boolsearch_core::{DirectorySource, LoadOutcome, Operator, SearchOutcome, SearchSession};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use std::io::{self, BufRead, Write};

#[derive(Parser)]
#[command(name = "boolsearch")]
#[command(about = "Index a folder of text files and run AND/OR/NOT queries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a directory and print the inverted index
    Index {
        /// Directory holding the documents (not searched recursively)
        #[arg(long)]
        dir: String,
        /// File extension to pick up
        #[arg(long, default_value = DEFAULT_EXTENSION)]
        extension: String,
        /// Print the index as JSON instead of one line per term
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Load a directory and run a single query
    Search {
        #[arg(long)]
        dir: String,
        #[arg(long)]
        query: String,
        /// AND, OR or NOT
        #[arg(long, default_value = "AND")]
        op: String,
        #[arg(long, default_value = DEFAULT_EXTENSION)]
        extension: String,
    },
    /// Interactive session reading queries from stdin
    Repl {
        /// Directory to load before the first prompt
        #[arg(long)]
        dir: Option<String>,
        #[arg(long, default_value = DEFAULT_EXTENSION)]
        extension: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Index { dir, extension, json } => {
            let mut session = SearchSession::new();
            load(&mut session, &dir, &extension)?;
            let mut out = io::stdout().lock();
            if json {
                serde_json::to_writer_pretty(&mut out, session.index())?;
                writeln!(out)?;
            } else {
                print_index(&mut out, &session)?;
            }
            Ok(())
        }
        Commands::Search { dir, query, op, extension } => {
            let op: Operator = op.parse()?;
            let mut session = SearchSession::new();
            load(&mut session, &dir, &extension)?;
            print_results(&mut io::stdout().lock(), &session, session.search(&query, op))
        }
        Commands::Repl { dir, extension } => {
            let mut session = SearchSession::new();
            if let Some(dir) = dir {
                if let Err(e) = load(&mut session, &dir, &extension) {
                    eprintln!("error: {e}");
                }
            }
            repl(&mut session, &extension, io::stdin().lock(), &mut io::stdout().lock())
        }
    }
}

fn load(session: &mut SearchSession, dir: &str, extension: &str) -> Result<()> {
    tracing::info!(dir, extension, "loading documents");
    let source = DirectorySource::new(dir).with_extension(extension);
    match session.load(&source)? {
        LoadOutcome::Loaded(n) => eprintln!("Documents loaded successfully! Total Documents Loaded: {n}"),
        LoadOutcome::EmptyCollection => eprintln!("No documents found in the selected folder."),
    }
    Ok(())
}

fn print_index(out: &mut impl Write, session: &SearchSession) -> Result<()> {
    writeln!(out, "Total Documents Loaded: {}", session.len())?;
    let mut terms: Vec<_> = session.index().iter().collect();
    terms.sort_by(|a, b| a.0.cmp(b.0));
    for (term, docs) in terms {
        let mut docs: Vec<&str> = docs.iter().map(String::as_str).collect();
        docs.sort_unstable();
        writeln!(out, "{term}: {{{}}}", docs.join(", "))?;
    }
    Ok(())
}

fn print_results(out: &mut impl Write, session: &SearchSession, outcome: SearchOutcome) -> Result<()> {
    let hits = match outcome {
        SearchOutcome::EmptyQuery => {
            writeln!(out, "Query has no searchable terms.")?;
            return Ok(());
        }
        SearchOutcome::NoMatch => {
            writeln!(out, "No documents found matching the query.")?;
            return Ok(());
        }
        SearchOutcome::Matches(hits) => hits,
    };
    let mut hits: Vec<String> = hits.into_iter().collect();
    hits.sort_unstable();
    for doc_id in hits {
        writeln!(out, "Document: {doc_id}")?;
        writeln!(out, "{}\n", session.document(&doc_id).unwrap_or_default())?;
    }
    Ok(())
}

fn repl(session: &mut SearchSession, extension: &str, input: impl BufRead, out: &mut impl Write) -> Result<()> {
    write!(out, "> ")?;
    out.flush()?;
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        match line.split_once(char::is_whitespace).unwrap_or((line, "")) {
            ("", _) => {}
            (":quit" | ":q", _) => break,
            (":reset", _) => {
                session.reset();
                writeln!(out, "Total Documents Loaded: 0")?;
            }
            (":count", _) => writeln!(out, "Total Documents Loaded: {}", session.len())?,
            (":index", _) => print_index(out, session)?,
            (":load", dir) => {
                // a failed load leaves the current collection in place
                if let Err(e) = load(session, dir.trim(), extension) {
                    writeln!(out, "error: {e}")?;
                }
            }
            (head, rest) => {
                let (op, query) = match head.parse::<Operator>() {
                    Ok(op) => (op, rest),
                    Err(_) => (Operator::default(), line),
                };
                if session.is_empty() {
                    writeln!(out, "Please load documents first.")?;
                } else {
                    print_results(out, session, session.search(query, op))?;
                }
            }
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use boolsearch_core::MemorySource;

    fn session() -> SearchSession {
        let mut s = SearchSession::new();
        s.load(&MemorySource::new([("d1", "the cat sat"), ("d2", "the dog sat"), ("d3", "cat and dog")]))
            .unwrap();
        s
    }

    fn run(session: &mut SearchSession, script: &str) -> String {
        let mut out = Vec::new();
        repl(session, "txt", script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn index_listing_is_sorted() {
        let mut out = Vec::new();
        print_index(&mut out, &session()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "Total Documents Loaded: 3\ncat: {d1, d3}\ndog: {d2, d3}\nsat: {d1, d2}\n");
    }

    #[test]
    fn repl_runs_each_operator() {
        let mut s = session();
        let out = run(&mut s, "NOT cat\nor cat dog\ncat sat\n");
        assert!(out.contains("Document: d2\nthe dog sat\n"));
        assert_eq!(out.matches("Document: d1").count(), 2);
        assert_eq!(out.matches("Document: d3").count(), 1);
    }

    #[test]
    fn repl_reports_empty_and_missing() {
        let mut s = session();
        let out = run(&mut s, "AND the\nAND zebra\n");
        assert!(out.contains("Query has no searchable terms."));
        assert!(out.contains("No documents found matching the query."));
    }

    #[test]
    fn repl_failed_load_keeps_collection() {
        let mut s = session();
        let out = run(&mut s, ":load /definitely/not/here\n:count\n");
        assert!(out.contains("error: document source"));
        assert!(out.contains("Total Documents Loaded: 3"));
    }

    #[test]
    fn repl_reset_then_query_asks_for_documents() {
        let mut s = session();
        let out = run(&mut s, ":reset\ncat\n:quit\ncat\n");
        assert!(out.contains("Please load documents first."));
        assert_eq!(out.matches("Please load documents first.").count(), 1);
        assert!(s.is_empty());
    }
}
