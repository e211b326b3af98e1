//! oapi-tsgen CLI
//!
//! Command-line interface for generating typed TypeScript clients from
//! OpenAPI 3 documents.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use oapi_tsgen_common::{GenerateOptions, MediaTypePolicy, ParsedApi};
use oapi_tsgen_generator::{ClientGenerator, OperationNames};
use oapi_tsgen_parser::OpenApiParser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "OAPI_TSGEN_LOG";

#[derive(Parser)]
#[command(name = "oapi-tsgen")]
#[command(version, about = "Generate typed TypeScript clients from OpenAPI documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse documents and display the extracted operations and types
    #[command(after_help = "EXAMPLES:\n  \
        # Summarize a document\n  \
        oapi-tsgen parse --spec petstore.yaml\n\n  \
        # Merge two documents and dump the descriptors as JSON\n  \
        oapi-tsgen parse --spec api.yaml --spec extra.yaml --json\n\n  \
        # Accept several media types per status, as generate would\n  \
        oapi-tsgen parse --spec api.yaml --media-type-policy prefer")]
    Parse {
        /// Path to an OpenAPI document (repeat to merge several)
        #[arg(short, long, required = true)]
        spec: Vec<PathBuf>,

        /// Print operations and named types as JSON
        #[arg(long)]
        json: bool,

        /// YAML options file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// How to handle several media types under one status code
        #[arg(long)]
        media_type_policy: Option<PolicyArg>,
    },

    /// Generate a TypeScript client
    #[command(after_help = "EXAMPLES:\n  \
        # Write the client to a file\n  \
        oapi-tsgen generate --spec petstore.yaml --output src/client.ts\n\n  \
        # Types only, to stdout\n  \
        oapi-tsgen generate --spec petstore.yaml --no-request --no-operations\n\n  \
        # Options from a file, overridden on the command line\n  \
        oapi-tsgen generate \\\n    \
        --spec petstore.yaml \\\n    \
        --config oapi-tsgen.yaml \\\n    \
        --media-type-policy prefer \\\n    \
        --output src/client.ts")]
    Generate {
        /// Path to an OpenAPI document (repeat to merge several)
        #[arg(short, long, required = true)]
        spec: Vec<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// YAML options file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Skip named type declarations
        #[arg(long)]
        no_types: bool,

        /// Skip the runtime request helper
        #[arg(long)]
        no_request: bool,

        /// Skip per-operation declarations and bindings
        #[arg(long)]
        no_operations: bool,

        /// Skip doc comments
        #[arg(long)]
        no_doc: bool,

        /// How to handle several media types under one status code
        #[arg(long)]
        media_type_policy: Option<PolicyArg>,

        /// Emit every component schema, referenced or not
        #[arg(long)]
        all_components: bool,

        /// URL prefix for every request (defaults to the document's first server)
        #[arg(long)]
        server: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Fail on several media types
    Strict,
    /// Prefer JSON, then text, then the first declared
    Prefer,
}

impl From<PolicyArg> for MediaTypePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Strict => MediaTypePolicy::Strict,
            PolicyArg::Prefer => MediaTypePolicy::Prefer,
        }
    }
}

/// Command-line overrides applied on top of the options file
#[derive(Default)]
struct Overrides {
    no_types: bool,
    no_request: bool,
    no_operations: bool,
    no_doc: bool,
    media_type_policy: Option<PolicyArg>,
    all_components: bool,
    server: Option<String>,
}

impl Overrides {
    fn apply(self, mut options: GenerateOptions) -> GenerateOptions {
        if self.no_types {
            options.types = false;
        }
        if self.no_request {
            options.request = false;
        }
        if self.no_operations {
            options.operations = false;
        }
        if self.no_doc {
            options.with_doc = false;
        }
        if let Some(policy) = self.media_type_policy {
            options.media_type_policy = policy.into();
        }
        if self.all_components {
            options.all_components = true;
        }
        if self.server.is_some() {
            options.server = self.server;
        }
        options
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Parse {
            spec,
            json,
            config,
            media_type_policy,
        } => {
            let options = load_options(config.as_deref())?;
            let options = Overrides {
                media_type_policy,
                ..Overrides::default()
            }
            .apply(options);
            parse_command(&spec, json, &options, cli.verbose)?;
        }
        Commands::Generate {
            spec,
            output,
            config,
            no_types,
            no_request,
            no_operations,
            no_doc,
            media_type_policy,
            all_components,
            server,
        } => {
            let overrides = Overrides {
                no_types,
                no_request,
                no_operations,
                no_doc,
                media_type_policy,
                all_components,
                server,
            };
            let options = overrides.apply(load_options(config.as_deref())?);
            generate_command(&spec, output.as_deref(), &options)?;
        }
    }

    Ok(())
}

/// Log to stderr; `OAPI_TSGEN_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_parser(specs: &[PathBuf]) -> Result<OpenApiParser> {
    OpenApiParser::from_files(specs).context("Failed to load OpenAPI documents")
}

/// Options from the `--config` file, or the defaults
fn load_options(config: Option<&Path>) -> Result<GenerateOptions> {
    match config {
        Some(path) => GenerateOptions::load(path)
            .with_context(|| format!("Failed to load options from {}", path.display())),
        None => Ok(GenerateOptions::default()),
    }
}

fn parse_command(
    specs: &[PathBuf],
    json: bool,
    options: &GenerateOptions,
    verbose: bool,
) -> Result<()> {
    if !json {
        for spec in specs {
            println!("{} Parsing document: {}", "→".cyan(), spec.display());
        }
    }

    let parser = load_parser(specs)?;
    let api = parser
        .parse(options)
        .context("Failed to parse OpenAPI document")?;

    if json {
        let value = api_to_json(&api).context("Failed to serialize operations")?;
        println!(
            "{}",
            serde_json::to_string_pretty(&value).context("Failed to serialize operations")?
        );
        return Ok(());
    }

    println!("\n{}", "✓ Parse successful!".green().bold());
    if let Some(info) = &parser.document().info {
        println!("  Title: {}", info.title.yellow());
        println!("  Version: {}", info.version.yellow());
    }
    println!("  Server: {}", display_server(&api.server));
    println!("  Operations: {}", api.operations.len());
    println!("  Named types: {}", api.types.len());

    println!("\n{}", "Operations:".bold());
    for operation in &api.operations {
        let names = OperationNames::for_operation(operation);
        println!(
            "  • {} {} → {}",
            operation.method.wire_name().cyan(),
            operation.path,
            names.function.yellow()
        );
        if verbose {
            let statuses: Vec<String> = operation
                .responses
                .iter()
                .map(|r| r.status.key())
                .collect();
            println!(
                "    Params: {} path, {} query, {} header{}",
                operation.positional_params.len(),
                operation.query_params.len(),
                operation.header_params.len(),
                if operation.body_param.is_some() {
                    ", body"
                } else {
                    ""
                }
            );
            println!("    Responses: {}", statuses.join(", "));
        }
    }

    if !api.types.is_empty() {
        println!("\n{}", "Named types:".bold());
        for (name, _) in api.types.iter() {
            println!("  • {}", name.cyan());
        }
    }

    Ok(())
}

fn generate_command(
    specs: &[PathBuf],
    output: Option<&Path>,
    options: &GenerateOptions,
) -> Result<()> {
    // Status lines would corrupt the module when it goes to stdout
    let report = output.is_some();

    tracing::debug!(
        types = options.types,
        request = options.request,
        operations = options.operations,
        with_doc = options.with_doc,
        media_type_policy = ?options.media_type_policy,
        all_components = options.all_components,
        server = ?options.server,
        "effective options"
    );

    if report {
        for spec in specs {
            println!("{} Generating client from: {}", "→".cyan(), spec.display());
        }
        println!("{} Parsing documents...", "→".cyan());
    }

    let parser = load_parser(specs)?;
    let api = parser
        .parse(options)
        .context("Failed to parse OpenAPI document")?;

    if report {
        println!(
            "{} Parsed {} operations and {} named types",
            "✓".green(),
            api.operations.len(),
            api.types.len()
        );
        println!("{} Rendering client...", "→".cyan());
    }

    let generator =
        ClientGenerator::new(api, options.clone()).context("Failed to create generator")?;

    match output {
        Some(path) => {
            generator
                .generate_to_file(path)
                .context("Failed to generate client")?;
            println!("\n{}", "✓ Generation complete!".green().bold());
            println!("  📄 {}", path.display());
        }
        None => {
            let rendered = generator.render().context("Failed to generate client")?;
            print!("{}", rendered);
        }
    }

    Ok(())
}

fn display_server(server: &str) -> ColoredString {
    if server.is_empty() {
        "(relative)".dimmed()
    } else {
        server.yellow()
    }
}

/// Descriptors plus named types in registry order
fn api_to_json(api: &ParsedApi) -> Result<serde_json::Value> {
    let types: Vec<serde_json::Value> = api
        .types
        .iter()
        .map(|(name, named)| {
            serde_json::json!({
                "name": name,
                "description": named.description,
                "type": named.ty.render(),
            })
        })
        .collect();

    Ok(serde_json::json!({
        "server": api.server,
        "operations": serde_json::to_value(&api.operations)?,
        "types": types,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_flags() {
        let cli = Cli::try_parse_from([
            "oapi-tsgen",
            "generate",
            "--spec",
            "a.yaml",
            "--spec",
            "b.json",
            "--no-doc",
            "--media-type-policy",
            "prefer",
            "--server",
            "/api",
        ])
        .unwrap();

        let Commands::Generate {
            spec,
            no_doc,
            media_type_policy,
            server,
            output,
            ..
        } = cli.command
        else {
            panic!("expected the generate command");
        };
        assert_eq!(spec.len(), 2);
        assert!(no_doc);
        assert!(matches!(media_type_policy, Some(PolicyArg::Prefer)));
        assert_eq!(server.as_deref(), Some("/api"));
        assert!(output.is_none());
    }

    #[test]
    fn test_parse_accepts_policy_and_config() {
        let cli = Cli::try_parse_from([
            "oapi-tsgen",
            "parse",
            "--spec",
            "a.yaml",
            "--config",
            "oapi-tsgen.yaml",
            "--media-type-policy",
            "prefer",
        ])
        .unwrap();

        let Commands::Parse {
            config,
            media_type_policy,
            json,
            ..
        } = cli.command
        else {
            panic!("expected the parse command");
        };
        assert_eq!(config, Some(PathBuf::from("oapi-tsgen.yaml")));
        assert!(!json);

        let options = Overrides {
            media_type_policy,
            ..Overrides::default()
        }
        .apply(GenerateOptions::default());
        assert_eq!(options.media_type_policy, MediaTypePolicy::Prefer);
        assert!(options.types && options.request && options.operations);
    }

    #[test]
    fn test_spec_is_required() {
        assert!(Cli::try_parse_from(["oapi-tsgen", "parse"]).is_err());
    }

    #[test]
    fn test_overrides_apply_on_top_of_file_options() {
        let base = GenerateOptions {
            with_doc: true,
            server: Some("https://from-file".to_string()),
            media_type_policy: MediaTypePolicy::Prefer,
            ..GenerateOptions::default()
        };
        let overrides = Overrides {
            no_types: false,
            no_request: true,
            no_operations: false,
            no_doc: true,
            media_type_policy: None,
            all_components: true,
            server: None,
        };

        let options = overrides.apply(base);
        assert!(options.types);
        assert!(!options.request);
        assert!(!options.with_doc);
        assert!(options.all_components);
        assert_eq!(options.media_type_policy, MediaTypePolicy::Prefer);
        assert_eq!(options.server.as_deref(), Some("https://from-file"));
    }

    #[test]
    fn test_api_to_json() {
        let parser = OpenApiParser::from_yaml(
            "openapi: 3.0.0\npaths:\n  /pets:\n    get:\n      responses:\n        200:\n          content:\n            application/json:\n              schema:\n                $ref: '#/components/schemas/Pet'\ncomponents:\n  schemas:\n    Pet:\n      type: string\n",
        )
        .unwrap();
        let api = parser.parse(&GenerateOptions::default()).unwrap();

        let value = api_to_json(&api).unwrap();
        assert_eq!(value["operations"][0]["path"], "/pets");
        assert_eq!(value["operations"][0]["method"], "get");
        assert_eq!(value["types"][0]["name"], "Pet");
        assert_eq!(value["types"][0]["type"], "string");
    }
}
