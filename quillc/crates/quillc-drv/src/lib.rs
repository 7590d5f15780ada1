//! quillc-drv - the command-line driver.
//!
//! Orchestrates the front-end pipeline: read the file, decode it into a
//! source buffer, lex, parse, render diagnostics, and exit with the
//! diagnostic count. The core stages never perform I/O themselves; all
//! of it lives here.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser as CliParser;
use log::{debug, info};

use quillc_lex::lex;
use quillc_par::{dump_ast, parse};
use quillc_util::{Diagnostic, Handler, SourceBuffer};

// ANSI fragments for diagnostic rendering, disabled by --nocolor.
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Command-line interface of `quillc`.
#[derive(CliParser, Debug)]
#[command(name = "quillc", version, about = "Compiler front end for the Quill language")]
pub struct Cli {
    /// Source file to compile.
    #[arg(required_unless_present = "test")]
    pub file: Option<PathBuf>,

    /// Dump the token stream.
    #[arg(long)]
    pub tokens: bool,

    /// Dump the parsed AST.
    #[arg(long)]
    pub ast: bool,

    /// Print per-phase timings.
    #[arg(long)]
    pub timer: bool,

    /// Suppress non-diagnostic output.
    #[arg(long)]
    pub silent: bool,

    /// Disable colored output.
    #[arg(long)]
    pub nocolor: bool,

    /// Raise log verbosity; repeat for more.
    #[arg(short, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Run the built-in smoke suite instead of compiling.
    #[arg(long)]
    pub test: bool,
}

/// Runs the driver and returns the process exit code: zero on success,
/// otherwise the diagnostic count.
pub fn run(cli: &Cli) -> Result<i32> {
    init_logging(cli);

    if cli.test {
        return Ok(run_smoke_suite(cli));
    }

    let path = cli.file.as_ref().context("no input file given")?;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read `{}`", path.display()))?;
    let source = SourceBuffer::new(path.display().to_string(), &text);

    let session = Session::compile(&source, cli);

    for diagnostic in &session.diagnostics {
        eprintln!("{}", render_diagnostic(&source, diagnostic, !cli.nocolor));
    }

    if cli.timer && !cli.silent {
        println!(
            "lexing: {:?}\nparsing: {:?}",
            session.lex_time, session.parse_time
        );
    }

    Ok(exit_code(session.diagnostics.len()))
}

/// One front-end run over a source buffer.
pub struct Session {
    pub diagnostics: Vec<Diagnostic>,
    pub lex_time: Duration,
    pub parse_time: Duration,
}

impl Session {
    /// Lexes and parses a source buffer, honoring the dump flags.
    pub fn compile(source: &SourceBuffer, cli: &Cli) -> Session {
        let handler = Handler::new();

        let lex_start = Instant::now();
        let tokens = lex(source, &handler);
        let lex_time = lex_start.elapsed();
        debug!("lexed {} tokens from `{}`", tokens.len(), source.name());

        if cli.tokens && !cli.silent {
            for token in &tokens {
                println!("{token}");
            }
        }

        let parse_start = Instant::now();
        let ast = parse(&tokens, &handler);
        let parse_time = parse_start.elapsed();
        debug!("parsed {} top-level statements", ast.len());

        if cli.ast && !cli.silent {
            print!("{}", dump_ast(&ast));
        }

        info!(
            "`{}`: {} diagnostics",
            source.name(),
            handler.count()
        );

        Session {
            diagnostics: handler.diagnostics(),
            lex_time,
            parse_time,
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.silent {
        log::LevelFilter::Off
    } else {
        match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    };
    // Ignore double-init in tests.
    let _ = simple_logger::SimpleLogger::new()
        .with_level(level)
        .with_colors(!cli.nocolor)
        .init();
}

/// Renders one diagnostic with its source line and caret span.
fn render_diagnostic(source: &SourceBuffer, diagnostic: &Diagnostic, color: bool) -> String {
    let location = source.location(diagnostic.span.begin);
    let (level_color, bold, reset) = if color {
        let level_color = match diagnostic.level {
            quillc_util::Level::Error => RED,
            quillc_util::Level::Warning => YELLOW,
        };
        (level_color, BOLD, RESET)
    } else {
        ("", "", "")
    };

    let mut rendered = format!(
        "{bold}{}:{}:{}:{reset} {level_color}{} {}:{reset} {}",
        source.name(),
        location.line,
        location.column,
        diagnostic.stage,
        diagnostic.level,
        diagnostic.message,
    );

    if let Ok(line_text) = source.line_text(location.line) {
        let width = diagnostic
            .span
            .len()
            .max(1)
            .min(line_text.chars().count().max(1));
        let padding = " ".repeat(location.column.saturating_sub(1) as usize);
        let carets = "^".repeat(width);
        rendered.push_str(&format!(
            "\n    {line_text}\n    {padding}{level_color}{carets}{reset}"
        ));
    }

    rendered
}

fn exit_code(diagnostic_count: usize) -> i32 {
    diagnostic_count.min(u8::MAX as usize) as i32
}

// =============================================================================
// BUILT-IN SMOKE SUITE (--test)
// =============================================================================

/// Programs the front end must accept without diagnostics, plus one it
/// must reject. Returns the number of failed cases.
fn run_smoke_suite(cli: &Cli) -> i32 {
    let accepted = [
        (
            "hello",
            "import std\ndef main() { float number = 6.9\nstd.print(\"Hello, world!\") }",
        ),
        (
            "numerals",
            "ns = [0, 1, 2, 8, 9, 00, 10, 29u, 0.1, 0.2, 11.1, .123, 0xFFF, 0x1, 0o77, 0o11, 0b111, 0b01, 4i, 2i, 5.6i]",
        ),
        (
            "declarations",
            "class Node!(T) inherits Box!(T) {\n value: T\n}\nenum Color { red, green, blue }\nalias Bytes = List!(byte)",
        ),
        (
            "control_flow",
            "def f(n: int) -> int {\n if n < 0 { return -n } elif n == 0 { return 1 }\n do { n -= 1 } while n > 10\n for i, j in pairs { use(i, j) }\n return n\n}",
        ),
        (
            "expressions",
            "r = a or b xor c and not d < e <= f | g ~ h & i << j + k * l ^ -m\ns = x if c else y\nt = def(ref A, B) -> ref C",
        ),
    ];
    let rejected = [("unterminated_string", "x = \"open\n")];

    let mut failures = 0;
    for (name, source) in accepted {
        let handler = Handler::new();
        let buffer = SourceBuffer::new(format!("<{name}>"), source);
        let tokens = lex(&buffer, &handler);
        let _ = parse(&tokens, &handler);
        if handler.count() == 0 {
            if !cli.silent {
                println!("ok      {name}");
            }
        } else {
            failures += 1;
            eprintln!("FAILED  {name}: {} unexpected diagnostics", handler.count());
        }
    }
    for (name, source) in rejected {
        let handler = Handler::new();
        let buffer = SourceBuffer::new(format!("<{name}>"), source);
        let tokens = lex(&buffer, &handler);
        let _ = parse(&tokens, &handler);
        if handler.has_errors() {
            if !cli.silent {
                println!("ok      {name}");
            }
        } else {
            failures += 1;
            eprintln!("FAILED  {name}: expected diagnostics, got none");
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use quillc_util::{Span, Stage};

    fn cli_with_defaults() -> Cli {
        Cli {
            file: None,
            tokens: false,
            ast: false,
            timer: false,
            silent: true,
            nocolor: true,
            verbose: 0,
            test: false,
        }
    }

    #[test]
    fn test_session_clean_program() {
        let source = SourceBuffer::new("clean.qll", "def main() { return 0 }");
        let session = Session::compile(&source, &cli_with_defaults());
        assert!(session.diagnostics.is_empty());
    }

    #[test]
    fn test_session_collects_both_stages() {
        // One lexer error (unknown scalar) and one parser error (stray
        // closing paren).
        let source = SourceBuffer::new("bad.qll", "x = `\n)");
        let session = Session::compile(&source, &cli_with_defaults());
        let stages: Vec<Stage> = session.diagnostics.iter().map(|d| d.stage).collect();
        assert!(stages.contains(&Stage::Lexer));
        assert!(stages.contains(&Stage::Parser));
    }

    #[test]
    fn test_render_diagnostic_plain() {
        let source = SourceBuffer::new("demo.qll", "x = \"open\nnext");
        let diagnostic = Diagnostic::error(
            Stage::Lexer,
            "unterminated string literal",
            Span::new(4, 9),
        );
        let rendered = render_diagnostic(&source, &diagnostic, false);
        assert!(rendered.contains("demo.qll:1:5"));
        assert!(rendered.contains("lexer error: unterminated string literal"));
        assert!(rendered.contains("x = \"open"));
        assert!(rendered.contains("^^^^^"));
        assert!(!rendered.contains("\x1b["));
    }

    #[test]
    fn test_render_diagnostic_colored() {
        let source = SourceBuffer::new("demo.qll", "y");
        let diagnostic = Diagnostic::error(Stage::Parser, "boom", Span::new(0, 1));
        let rendered = render_diagnostic(&source, &diagnostic, true);
        assert!(rendered.contains(RED));
        assert!(rendered.contains(RESET));
    }

    #[test]
    fn test_exit_code_caps_at_255() {
        assert_eq!(exit_code(0), 0);
        assert_eq!(exit_code(7), 7);
        assert_eq!(exit_code(9000), 255);
    }

    #[test]
    fn test_smoke_suite_passes() {
        assert_eq!(run_smoke_suite(&cli_with_defaults()), 0);
    }
}
