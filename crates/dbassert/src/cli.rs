use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use dbassert_core::{AssertError, Catalog, DbmsAssert, NameErrorKind, Quoter};

/// Check and quote SQL names the way `DBMS_ASSERT` does.
#[derive(Debug, Parser)]
#[command(name = "dbassert", version)]
pub struct Cli {
    /// Configuration file (defaults to `dbassert.toml` when present)
    #[arg(long, env = "DBASSERT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// PostgreSQL URL used by `schema` and `object`; overrides the configuration
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Print one JSON report per input instead of plain text
    #[arg(long, global = true)]
    pub json: bool,

    /// What to do with the inputs
    #[command(subcommand)]
    pub command: Command,
}

/// One subcommand per `DBMS_ASSERT` function.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Verify that each input is a qualified SQL name
    Qualified {
        /// Candidate names
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Verify that each input is a simple SQL name
    Simple {
        /// Candidate names
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Verify that each input names an existing, usable schema
    Schema {
        /// Candidate schema names
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Verify that each input names an existing relation
    Object {
        /// Candidate relation names
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Quote each input as an identifier
    EnquoteName {
        /// Raw names
        #[arg(required = true)]
        names: Vec<String>,
        /// Keep the case of the quoted result
        #[arg(long)]
        preserve_case: bool,
    },
    /// Quote each input as a string literal
    EnquoteLiteral {
        /// Raw values
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Echo each input unchanged
    Noop {
        /// Raw values
        #[arg(required = true)]
        values: Vec<String>,
    },
}

impl Command {
    /// Whether the command resolves names against a catalog.
    pub fn needs_catalog(&self) -> bool {
        matches!(self, Command::Schema { .. } | Command::Object { .. })
    }
}

/// Outcome for a single input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// The input as given
    pub input: String,
    /// Whether the check passed
    pub ok: bool,
    /// Checked or quoted value on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// SQLSTATE of the failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sqlstate: Option<&'static str>,
    /// Failure message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Grammar rule that rejected the input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<NameErrorKind>,
    /// Byte offset the grammar rejected the input at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

impl Report {
    fn passed(input: &str, output: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            ok: true,
            output: Some(output.into()),
            sqlstate: None,
            error: None,
            reason: None,
            position: None,
        }
    }

    fn failed(input: &str, err: &AssertError) -> Self {
        Self {
            input: input.to_string(),
            ok: false,
            output: None,
            sqlstate: Some(err.sqlstate()),
            error: Some(err.to_string()),
            reason: err.reason().map(|r| r.kind()),
            position: err.reason().map(|r| r.position()),
        }
    }

    fn from_result(input: &str, result: Result<&str, AssertError>) -> Self {
        match result {
            Ok(value) => Self::passed(input, value),
            Err(err) => Self::failed(input, &err),
        }
    }

    /// Plain text rendering used without `--json`.
    pub fn to_text(&self) -> String {
        match (&self.output, &self.error) {
            (Some(output), _) if self.ok => output.clone(),
            (_, Some(error)) => {
                let mut line = format!("{:?}: {}", self.input, error);
                if let Some(code) = self.sqlstate {
                    line.push_str(&format!(" (SQLSTATE {code})"));
                }
                if let (Some(reason), Some(position)) = (self.reason, self.position) {
                    line.push_str(&format!(": {reason:?} at byte {position}"));
                }
                line
            }
            _ => String::new(),
        }
    }
}

/// Run `command` against `package`, one report per input, in input order.
pub async fn run<C: Catalog, Q: Quoter>(
    command: &Command,
    package: &DbmsAssert<C, Q>,
) -> Vec<Report> {
    let mut reports = Vec::new();
    match command {
        Command::Qualified { names } => {
            for name in names {
                let result = package.qualified_sql_name(Some(name.as_str()));
                reports.push(Report::from_result(name, result));
            }
        }
        Command::Simple { names } => {
            for name in names {
                let result = package.simple_sql_name(Some(name.as_str()));
                reports.push(Report::from_result(name, result));
            }
        }
        Command::Schema { names } => {
            for name in names {
                let result = package.schema_name(Some(name.as_str())).await;
                reports.push(Report::from_result(name, result));
            }
        }
        Command::Object { names } => {
            for name in names {
                let result = package.object_name(Some(name.as_str())).await;
                reports.push(Report::from_result(name, result));
            }
        }
        Command::EnquoteName {
            names,
            preserve_case,
        } => {
            let lowercase = if *preserve_case { Some(false) } else { None };
            for name in names {
                reports.push(Report::passed(name, package.enquote_name(name, lowercase)));
            }
        }
        Command::EnquoteLiteral { values } => {
            for value in values {
                reports.push(Report::passed(value, package.enquote_literal(value)));
            }
        }
        Command::Noop { values } => {
            for value in values {
                reports.push(Report::passed(value, package.noop(value)));
            }
        }
    }
    reports
}

/// Process exit status: success only when every report passed.
pub fn exit_code(reports: &[Report]) -> ExitCode {
    if reports.iter().all(|r| r.ok) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbassert_core::MemoryCatalog;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("dbassert").chain(args.iter().copied())).unwrap()
    }

    fn package() -> DbmsAssert<MemoryCatalog> {
        DbmsAssert::new(MemoryCatalog::new("app").with_relation("public", "users"))
    }

    #[test]
    fn parses_subcommands_and_flags() {
        let cli = parse(&["--json", "qualified", "a.b", "\"c\""]);
        assert!(cli.json);
        assert!(matches!(&cli.command, Command::Qualified { names } if names.len() == 2));
        assert!(!cli.command.needs_catalog());

        let cli = parse(&["--database-url", "postgres://db/app", "object", "t"]);
        assert_eq!(cli.database_url.as_deref(), Some("postgres://db/app"));
        assert!(cli.command.needs_catalog());

        let cli = parse(&["enquote-name", "--preserve-case", "Foo"]);
        assert!(matches!(cli.command, Command::EnquoteName { preserve_case: true, .. }));
    }

    #[test]
    fn connection_flags_are_accepted_after_the_subcommand() {
        let cli = parse(&["object", "--database-url", "postgres://db/app", "t"]);
        assert_eq!(cli.database_url.as_deref(), Some("postgres://db/app"));

        let cli = parse(&["schema", "--config", "x.toml", "s", "--json"]);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert!(cli.json);
        assert!(matches!(&cli.command, Command::Schema { names } if names == &["s"]));
    }

    #[test]
    fn requires_at_least_one_input() {
        assert!(Cli::try_parse_from(["dbassert", "simple"]).is_err());
    }

    #[tokio::test]
    async fn reports_grammar_failures() {
        let command = Command::Qualified {
            names: vec!["a.b".into(), "a..b".into()],
        };
        let reports = run(&command, &package()).await;

        assert!(reports[0].ok);
        assert_eq!(reports[0].output.as_deref(), Some("a.b"));

        assert!(!reports[1].ok);
        assert_eq!(reports[1].sqlstate, Some("44004"));
        assert_eq!(reports[1].reason, Some(NameErrorKind::EmptySegment));
        assert_eq!(reports[1].position, Some(2));
        assert_eq!(
            reports[1].to_text(),
            "\"a..b\": string is not qualified SQL name (SQLSTATE 44004): EmptySegment at byte 2"
        );
    }

    #[tokio::test]
    async fn reports_catalog_checks() {
        let command = Command::Object {
            names: vec!["public.users".into(), "missing".into()],
        };
        let reports = run(&command, &package()).await;
        assert!(reports[0].ok);
        assert_eq!(reports[1].sqlstate, Some("44002"));
        assert_eq!(reports[1].reason, None);
        assert_eq!(reports[1].to_text(), "\"missing\": invalid object name (SQLSTATE 44002)");
    }

    #[tokio::test]
    async fn enquote_name_respects_case_flags() {
        let command = Command::EnquoteName {
            names: vec!["MyTable".into()],
            preserve_case: false,
        };
        assert_eq!(run(&command, &package()).await[0].to_text(), "\"mytable\"");
        let keep_case = package().lowercase_enquoted(false);
        assert_eq!(run(&command, &keep_case).await[0].to_text(), "\"MyTable\"");

        let command = Command::EnquoteName {
            names: vec!["MyTable".into()],
            preserve_case: true,
        };
        assert_eq!(run(&command, &package()).await[0].to_text(), "\"MyTable\"");
    }

    fn same_code(left: ExitCode, right: ExitCode) -> bool {
        format!("{left:?}") == format!("{right:?}")
    }

    #[tokio::test]
    async fn exit_code_fails_on_any_rejected_input() {
        let passing = vec![Report::passed("a", "a"), Report::passed("b", "b")];
        assert!(same_code(exit_code(&passing), ExitCode::SUCCESS));

        let failing = vec![Report::failed("x", &AssertError::InvalidObjectName)];
        assert!(same_code(exit_code(&failing), ExitCode::FAILURE));

        let command = Command::Qualified {
            names: vec!["a.b".into(), "a..b".into()],
        };
        let mixed = run(&command, &package()).await;
        assert!(same_code(exit_code(&mixed), ExitCode::FAILURE));
    }

    #[test]
    fn json_report_skips_empty_fields() {
        let report = Report::passed("x", "x");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json, serde_json::json!({ "input": "x", "ok": true, "output": "x" }));

        let report = Report::failed(
            "\"",
            &AssertError::NotSimpleSqlName {
                reason: Some(dbassert_core::NameError::MismatchedQuotes { position: 0 }),
            },
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["reason"], "mismatched_quotes");
        assert_eq!(json["sqlstate"], "44003");
    }
}
