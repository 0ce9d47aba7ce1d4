//! Tenant Snippets CLI
//!
//! Usage:
//!   snippets [OPTIONS] <COMMAND>
//!
//! Commands:
//!   list     List all snippet definitions
//!   show     Show a snippet as seen by one tenant
//!   update   Set or clear a tenant's override
//!   render   Render a snippet for a tenant
//!
//! Options:
//!   -c, --config <FILE>     Snippet definitions (TOML) [default: snippets.toml]
//!   -o, --overrides <FILE>  Tenant overrides (TOML) [default: overrides.toml]
//!   -v, --verbose           Debug logging (RUST_LOG takes precedence)

use std::collections::HashMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tenant_snippets::engine::placeholders;
use tenant_snippets::{
    CatalogLoader, FileOverrideStore, SnippetDefinition, SnippetError, SnippetResolver,
};

#[derive(Parser)]
#[command(name = "snippets")]
#[command(about = "Manage and render tenant-overridable text snippets")]
struct Cli {
    /// Snippet definitions (TOML format)
    #[arg(short, long, default_value = "snippets.toml")]
    config: PathBuf,

    /// Tenant overrides (TOML format, created on first update)
    #[arg(short, long, default_value = "overrides.toml")]
    overrides: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all snippet definitions
    List,

    /// Show a snippet as seen by one tenant
    Show {
        /// The snippet id
        snippet: String,
        /// The tenant id
        tenant: String,
    },

    /// Set a tenant's override; an empty source reverts to the default
    Update {
        /// The snippet id
        snippet: String,
        /// The tenant id
        tenant: String,
        /// The new source text
        new_source: String,
    },

    /// Render a snippet for a tenant
    Render {
        /// The snippet id
        snippet: String,
        /// The tenant id
        tenant: String,
        /// Variable value as name=value (repeatable)
        #[arg(long = "var", value_parser = parse_key_val)]
        vars: Vec<(String, String)>,
    },
}

type Resolver = SnippetResolver<FileOverrideStore>;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let catalog = match CatalogLoader::new().load_file(&cli.config) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Error loading snippets '{}': {}", cli.config.display(), e);
            std::process::exit(1);
        }
    };

    let store = match FileOverrideStore::open(&cli.overrides) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error opening overrides '{}': {}", cli.overrides.display(), e);
            std::process::exit(1);
        }
    };

    let mut resolver = SnippetResolver::new(catalog, store);

    let result = match cli.command {
        Command::List => {
            list(&resolver);
            Ok(())
        }
        Command::Show { snippet, tenant } => show(&resolver, &snippet, &tenant),
        Command::Update {
            snippet,
            tenant,
            new_source,
        } => resolver
            .update_source(&snippet, &tenant, &new_source)
            .map(|_| println!("{}", update_message(&snippet, &tenant))),
        Command::Render {
            snippet,
            tenant,
            vars,
        } => {
            let vars: HashMap<String, String> = vars.into_iter().collect();
            resolver
                .render(&snippet, &tenant, &vars)
                .map(|text| println!("{}", text))
                .map_err(|e| {
                    report_template_error(&resolver, &tenant, &e);
                    e
                })
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn list(resolver: &Resolver) {
    let rows: Vec<Vec<String>> = resolver.definitions().map(|def| list_row(def)).collect();
    print_table(&["Id", "Title", "# Variables"], &rows);
}

fn list_row(def: &SnippetDefinition) -> Vec<String> {
    vec![
        def.id().to_string(),
        short_title(def.title()),
        def.variable_count().to_string(),
    ]
}

/// First ten characters of the title, always followed by `...`
fn short_title(title: &str) -> String {
    format!("{}...", title.chars().take(10).collect::<String>())
}

fn update_message(snippet: &str, tenant: &str) -> String {
    format!("Updated snippet \"{}\" for tenant \"{}\".", snippet, tenant)
}

fn show(resolver: &Resolver, snippet_id: &str, tenant: &str) -> Result<(), SnippetError> {
    let snippet = resolver.snippet(snippet_id, tenant)?;
    let definition = snippet.definition();

    let variables = definition
        .variables()
        .map(|v| {
            let mut line = format!("{}: {}", v.name(), v.var_type().tag());
            if v.is_required() {
                line.push_str(", required");
            }
            if let Some(default) = v.default_value() {
                line.push_str(&format!(", default \"{}\"", default));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("; ");

    let origin = if snippet.is_overridden() {
        format!("override for tenant \"{}\"", tenant)
    } else {
        "default".to_string()
    };

    let rows = vec![
        vec!["Title".to_string(), snippet.title().to_string()],
        vec!["Variables".to_string(), variables],
        vec![
            "Placeholders".to_string(),
            placeholders(snippet.source()).join(", "),
        ],
        vec!["Source".to_string(), origin],
    ];
    print_table(&["Id", snippet.id()], &rows);
    println!("{}", snippet.source());
    Ok(())
}

/// Print the ariadne report for template syntax errors before the plain message
fn report_template_error(resolver: &Resolver, tenant: &str, err: &SnippetError) {
    if let SnippetError::Template { snippet, source } = err {
        if let Ok(text) = resolver.resolve_source(snippet, tenant) {
            if source.span().is_some() {
                eprint!("{}", source.format(&text, snippet));
            }
        }
    }
}

fn print_table(header: &[&str], rows: &[Vec<String>]) {
    let columns = header.len();
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(columns) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    println!("{}", line(header.to_vec()));
    println!(
        "{}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-")
    );
    for row in rows {
        println!("{}", line(row.iter().map(String::as_str).collect()));
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("invalid variable '{}': expected name=value", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_short_title() {
        assert_eq!(short_title("Order confirmation"), "Order conf...");
        assert_eq!(short_title("Hi"), "Hi...");
        assert_eq!(short_title("Grüße aus Köln"), "Grüße aus ...");
    }

    #[test]
    fn test_list_row() {
        let def = SnippetDefinition::new("emails.footer", "Footer of all emails", "Regards");
        assert_eq!(list_row(&def), vec!["emails.footer", "Footer of ...", "0"]);
    }

    #[test]
    fn test_update_message() {
        assert_eq!(
            update_message("welcome", "acme"),
            "Updated snippet \"welcome\" for tenant \"acme\"."
        );
    }

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("name=Ada").unwrap(),
            ("name".to_string(), "Ada".to_string())
        );
        assert_eq!(
            parse_key_val("query=a=b").unwrap(),
            ("query".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_key_val("note=").unwrap(),
            ("note".to_string(), String::new())
        );
        assert!(parse_key_val("name").is_err());
    }

    #[test]
    fn test_render_vars_from_arguments() {
        let cli = Cli::try_parse_from([
            "snippets", "render", "order", "acme", "--var", "number=7", "--var", "note=a=b",
        ])
        .unwrap();
        match cli.command {
            Command::Render { snippet, tenant, vars } => {
                assert_eq!(snippet, "order");
                assert_eq!(tenant, "acme");
                assert_eq!(
                    vars,
                    vec![
                        ("number".to_string(), "7".to_string()),
                        ("note".to_string(), "a=b".to_string()),
                    ]
                );
            }
            _ => panic!("expected render"),
        }
        assert_eq!(cli.config, PathBuf::from("snippets.toml"));

        assert!(Cli::try_parse_from(["snippets", "render", "order", "acme", "--var", "bad"]).is_err());
    }
}
