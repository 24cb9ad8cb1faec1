use bs_core::format::{FormatConfig, format_tree, strip_comments};
use bs_core::lint::{LintDiagnostic, LintSeverity, lint_style};
use bs_core::parser::parse_style;
use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    match Cli::parse().run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    }
}

/// Format, check or inspect blade style expressions.
///
/// Each input holds one style, e.g. `StylePtr<Layers<Red, BlastL<White>>>()`.
/// Formatted output is written to standard output unless `--write` is given.
#[derive(Debug, clap::Parser)]
#[command(name = "bs-fmt", version, about, long_about, max_term_width(100))]
struct Cli {
    /// Style files to process. Standard input is read when none are given.
    paths: Vec<PathBuf>,

    /// Exit with status 1 if any input is not already formatted. Nothing is written.
    #[arg(long, conflicts_with_all = ["write", "json", "lint"])]
    check: bool,

    /// Rewrite files in place instead of printing them.
    #[arg(short, long)]
    write: bool,

    /// Drop every comment from the output.
    #[arg(long)]
    strip_comments: bool,

    /// Write each style on a single line.
    #[arg(long)]
    compact: bool,

    /// Emit styles even when lint reports errors (emitting still fails on empty slots).
    #[arg(long)]
    allow_incomplete: bool,

    /// Print the parsed tree as JSON instead of formatting it.
    #[arg(long, conflicts_with_all = ["write", "lint"])]
    json: bool,

    /// Print lint diagnostics instead of formatting. Exits with status 1 on errors.
    #[arg(long, conflicts_with = "write")]
    lint: bool,
}

/// Result of processing one input.
#[derive(Debug, PartialEq)]
enum Processed {
    Formatted(String),
    Json(String),
    Lint(Vec<LintDiagnostic>),
}

impl Cli {
    fn run(self) -> Result<bool, String> {
        if self.paths.is_empty() {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|err| format!("Failed to read standard input: {err}"))?;
            return self.handle("<stdin>", None, &text);
        }

        let mut ok = true;
        for path in &self.paths {
            let text = std::fs::read_to_string(path)
                .map_err(|err| format!("Failed to read `{}`: {err}", path.display()))?;
            let name = path.display().to_string();
            ok &= self.handle(&name, Some(path), &text)?;
        }
        Ok(ok)
    }

    fn config(&self) -> FormatConfig {
        FormatConfig {
            keep_comments: !self.strip_comments,
            require_complete: !self.allow_incomplete,
            multiline: !self.compact,
        }
    }

    fn process(&self, name: &str, text: &str) -> Result<Processed, String> {
        let mut style = parse_style(text).map_err(|err| format!("{name}: {err}"))?;
        if self.strip_comments {
            strip_comments(&mut style);
        }
        if self.json {
            let json = serde_json::to_string_pretty(&style).map_err(|err| format!("{name}: {err}"))?;
            return Ok(Processed::Json(json));
        }
        if self.lint {
            return Ok(Processed::Lint(lint_style(&style)));
        }
        let formatted = format_tree(&style, &self.config()).map_err(|err| format!("{name}: {err}"))?;
        Ok(Processed::Formatted(formatted + "\n"))
    }

    /// Process one input and report it. Returns false when the input fails
    /// `--check` or `--lint`.
    fn handle(&self, name: &str, path: Option<&Path>, text: &str) -> Result<bool, String> {
        log::debug!("processing {name}");
        match self.process(name, text)? {
            Processed::Json(json) => println!("{json}"),
            Processed::Lint(diags) => {
                for diag in &diags {
                    println!("{}", describe(name, diag));
                }
                return Ok(diags.iter().all(|d| d.severity != LintSeverity::Error));
            }
            Processed::Formatted(formatted) if self.check => {
                if formatted != text {
                    eprintln!("would reformat {name}");
                    return Ok(false);
                }
            }
            Processed::Formatted(formatted) => match path {
                Some(path) if self.write => {
                    if formatted != text {
                        std::fs::write(path, formatted)
                            .map_err(|err| format!("Failed to write file `{}`: {err}", path.display()))?;
                        log::info!("reformatted {name}");
                    }
                }
                _ => print!("{formatted}"),
            },
        }
        Ok(true)
    }
}

fn describe(name: &str, diag: &LintDiagnostic) -> String {
    let severity = match diag.severity {
        LintSeverity::Error => "error",
        LintSeverity::Warning => "warning",
    };
    let path: String = diag.path.iter().map(|i| format!("/{i}")).collect();
    let path = if path.is_empty() { "/".to_string() } else { path };
    format!("{name}:{path}: {severity}[{}]: {}", diag.rule, diag.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("bs-fmt").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn formats_to_canonical_text() {
        let out = cli(&[]).process("t", "StylePtr<Layers<Red,BlastL<White>>>()").unwrap();
        assert_eq!(
            out,
            Processed::Formatted("StylePtr<\n\tLayers<\n\t\tRed,\n\t\tBlastL<White>\n\t>\n>()\n".into())
        );
    }

    #[test]
    fn compact_and_stripped() {
        let out = cli(&["--compact", "--strip-comments"])
            .process("t", "// x\nStylePtr<Layers<Red, BlastL<White>>>()")
            .unwrap();
        assert_eq!(
            out,
            Processed::Formatted("StylePtr<Layers<Red, BlastL<White>>>()\n".into())
        );
    }

    #[test]
    fn check_passes_on_formatted_input() {
        let cli = cli(&["--check"]);
        assert!(cli.handle("t", None, "BlastL<White>\n").unwrap());
        assert!(!cli.handle("t", None, "BlastL< White >").unwrap());
    }

    #[test]
    fn parse_errors_name_the_input() {
        let err = cli(&[]).process("blade.txt", "StylePtr<Red").unwrap_err();
        assert_eq!(err, "blade.txt: mismatched <> in style StylePtr");
    }

    #[test]
    fn json_dump() {
        let Processed::Json(json) = cli(&["--json"]).process("t", "TrFade<300>").unwrap() else {
            panic!("expected json");
        };
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["os_name"], "TrFade");
    }

    #[test]
    fn lint_output_line() {
        let diag = LintDiagnostic {
            path: vec![0, 2],
            style: "BlastL",
            message: "Parameter `Color` of `BlastL` is empty.".into(),
            severity: LintSeverity::Error,
            rule: "empty-parameter",
        };
        assert_eq!(
            describe("blade.txt", &diag),
            "blade.txt:/0/2: error[empty-parameter]: Parameter `Color` of `BlastL` is empty."
        );
    }

    #[test]
    fn conflicting_flags_are_rejected() {
        assert!(Cli::try_parse_from(["bs-fmt", "--check", "--write"]).is_err());
        assert!(Cli::try_parse_from(["bs-fmt", "--json", "--lint"]).is_err());
    }
}
