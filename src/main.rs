//! Prompt Hub CLI
//!
//! Usage:
//!   prompt-hub [OPTIONS] <COMMAND>
//!
//! Template commands (`vars`, `render`, `lint`) work offline on a file or
//! stdin. The remaining commands talk to the prompt hub backend.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use prompt_hub::catalog::{all_tags, format_timestamp, history, version_choices};
use prompt_hub::template::lint;
use prompt_hub::{
    extract_placeholders, render_with, ApiClient, Console, ConsoleConfig, ConsoleError,
    MissingValue, NoticeLog, Playground, Prompt, PromptApi, PromptFilter,
    PromptForm, VariableSet,
};

#[derive(Parser)]
#[command(name = "prompt-hub")]
#[command(about = "Manage and test prompt templates")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (TOML format)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides config and environment
    #[arg(long, value_name = "URL", global = true)]
    api_url: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List the placeholders a template uses
    Vars {
        /// Template file (reads from stdin if not provided)
        input: Option<PathBuf>,
    },
    /// Substitute values into a template
    Render {
        /// Template file (reads from stdin if not provided)
        input: Option<PathBuf>,
        /// Placeholder value, repeatable
        #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        vars: Vec<(String, String)>,
        /// Leave placeholders without a value in the output
        #[arg(long)]
        verbatim: bool,
    },
    /// Report double-brace text that is not a valid placeholder
    Lint {
        /// Template file (reads from stdin if not provided)
        input: Option<PathBuf>,
    },
    /// List prompts
    List {
        /// Only prompts whose name, description or text contains this
        #[arg(short, long)]
        search: Option<String>,
        /// Only prompts with this tag
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Show one prompt
    Show { id: i64 },
    /// Show the version history of a prompt
    History { id: i64 },
    /// Create a prompt
    Create(PromptArgs),
    /// Update a prompt
    Update {
        id: i64,
        #[command(flatten)]
        fields: PromptArgs,
        /// Tag to remove, repeatable
        #[arg(long = "remove-tag", value_name = "TAG")]
        remove_tags: Vec<String>,
        /// Metadata key to remove, repeatable
        #[arg(long = "remove-meta", value_name = "KEY")]
        remove_meta: Vec<String>,
    },
    /// Delete a prompt
    Delete { id: i64 },
    /// Fill the backend with sample prompts
    Seed,
    /// List available models
    Models,
    /// Run a prompt against one or two models
    Test {
        id: i64,
        /// Version to run (current if omitted)
        #[arg(long)]
        version: Option<u32>,
        /// Left panel model
        #[arg(long)]
        left: Option<String>,
        /// Right panel model
        #[arg(long)]
        right: Option<String>,
        /// Query both models instead of mirroring the left one
        #[arg(long)]
        no_sync: bool,
        /// Placeholder value, repeatable
        #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        vars: Vec<(String, String)>,
    },
}

#[derive(Args)]
struct PromptArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Prompt text
    #[arg(long, conflicts_with = "text_file")]
    text: Option<String>,
    /// Read prompt text from a file
    #[arg(long, value_name = "FILE")]
    text_file: Option<PathBuf>,
    /// Tag, repeatable
    #[arg(long = "tag", value_name = "TAG")]
    tags: Vec<String>,
    /// Metadata entry, repeatable
    #[arg(long = "meta", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    meta: Vec<(String, String)>,
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", s)),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("prompt_hub={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<ConsoleConfig, ConsoleError> {
    let config = match &cli.config {
        Some(path) => ConsoleConfig::from_file(path)?,
        None => ConsoleConfig::default(),
    }
    .with_env_overrides();

    Ok(match &cli.api_url {
        Some(url) => config.with_base_url(url.clone()),
        None => config,
    })
}

fn run(cli: Cli) -> Result<(), ConsoleError> {
    let config = load_config(&cli)?;

    match cli.command {
        Command::Vars { input } => {
            let (source, _) = read_source(input.as_deref())?;
            for name in extract_placeholders(&source) {
                println!("{}", name);
            }
            Ok(())
        }
        Command::Render {
            input,
            vars,
            verbatim,
        } => {
            let (source, _) = read_source(input.as_deref())?;
            let values: VariableSet = vars.into_iter().collect();
            let missing = if verbatim {
                MissingValue::Verbatim
            } else {
                config.missing
            };
            print!("{}", render_with(&source, &values, missing));
            Ok(())
        }
        Command::Lint { input } => {
            let (source, filename) = read_source(input.as_deref())?;
            let warnings = lint::check(&source);
            if warnings.is_empty() {
                return Ok(());
            }
            eprint!("{}", lint::format_warnings(
                &source,
                &filename,
                &warnings,
                io::stderr().is_terminal(),
            ));
            Err(ConsoleError::Lint {
                count: warnings.len(),
            })
        }
        command => {
            let client = ApiClient::new(&config.api)?;
            let mut console = Console::new(client, NoticeLog::default());
            let result = run_remote(command, &config, &mut console);
            for notice in &console.sink().notices {
                eprintln!("{}", notice);
            }
            result?;
            if console.sink().has_errors() {
                process::exit(1);
            }
            Ok(())
        }
    }
}

fn run_remote(
    command: Command,
    config: &ConsoleConfig,
    console: &mut Console<ApiClient, NoticeLog>,
) -> Result<(), ConsoleError> {
    match command {
        Command::List { search, tag } => {
            let mut filter = PromptFilter::new();
            if let Some(search) = search {
                filter = filter.with_search(search);
            }
            if let Some(tag) = tag {
                filter = filter.with_tag(tag);
            }
            let prompts = console.load_prompts(&filter);
            print_list(&prompts);
        }
        Command::Show { id } => {
            let prompt = console.api().get_prompt(id)?;
            print_prompt(&prompt);
        }
        Command::History { id } => {
            let prompt = console.api().get_prompt(id)?;
            print_history(&prompt);
        }
        Command::Create(args) => {
            let mut form = PromptForm::new();
            apply_args(&mut form, args)?;
            if let Some(prompt) = console.save(&form, None) {
                println!("{}", prompt.id);
            }
        }
        Command::Update {
            id,
            fields,
            remove_tags,
            remove_meta,
        } => {
            let existing = console.api().get_prompt(id)?;
            let mut form = PromptForm::from_prompt(&existing);
            for tag in &remove_tags {
                form.remove_tag(tag);
            }
            for key in &remove_meta {
                form.remove_meta(key);
            }
            apply_args(&mut form, fields)?;
            console.save(&form, Some(id));
        }
        Command::Delete { id } => {
            console.delete(id);
        }
        Command::Seed => {
            console.seed();
        }
        Command::Models => {
            let catalog = console.models();
            for model in catalog.iter() {
                println!("{}  ({})", model.label(), model.id);
                if !model.description.is_empty() {
                    println!("    {}", model.description);
                }
                if !model.context_window.is_empty() {
                    println!(
                        "    context: {}  input: {}  output: {}",
                        model.context_window, model.input_price, model.output_price
                    );
                }
            }
        }
        Command::Test {
            id,
            version,
            left,
            right,
            no_sync,
            vars,
        } => {
            let prompt = console.api().get_prompt(id)?;
            let mut playground =
                Playground::new(&config.playground).with_missing(config.missing);
            if let Some(left) = left {
                playground.left_model = left;
            }
            if let Some(right) = right {
                playground.right_model = right;
            }
            if no_sync {
                playground.sync = false;
            }
            playground.select_prompt(prompt);
            if let Some(version) = version {
                playground.select_version(version)?;
            }
            for (name, value) in &vars {
                if !playground.set_variable(name, value.as_str()) {
                    tracing::warn!(name = %name, "prompt has no such placeholder, ignoring");
                }
            }

            if let Some(panels) = console.run_playground(&playground) {
                let models = console.known_models();
                print_panel(&models.label(&playground.left_model), panels.left.as_deref());
                print_panel(&models.label(&playground.right_model), panels.right.as_deref());
            }
        }
        Command::Vars { .. } | Command::Render { .. } | Command::Lint { .. } => {}
    }
    Ok(())
}

fn apply_args(form: &mut PromptForm, args: PromptArgs) -> Result<(), ConsoleError> {
    if let Some(name) = args.name {
        form.name = name;
    }
    if let Some(description) = args.description {
        form.description = description;
    }
    if let Some(text) = args.text {
        form.text = text;
    }
    if let Some(path) = args.text_file {
        form.text = fs::read_to_string(path)?;
    }
    for tag in &args.tags {
        form.add_tag(tag);
    }
    for (key, value) in &args.meta {
        if form.meta.contains_key(key) && !value.is_empty() {
            form.meta.insert(key.as_str(), value.as_str());
        } else {
            form.add_meta(key, value);
        }
    }
    Ok(())
}

/// Read a template from a file, or stdin when no path is given
fn read_source(input: Option<&Path>) -> Result<(String, String), ConsoleError> {
    match input {
        Some(path) => Ok((fs::read_to_string(path)?, path.display().to_string())),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok((buffer, "<stdin>".to_string()))
        }
    }
}

fn print_list(prompts: &[Prompt]) {
    if prompts.is_empty() {
        println!("No prompts found");
        return;
    }
    let tags = all_tags(prompts);
    if !tags.is_empty() {
        println!("Tags: {}", tags.join(", "));
        println!();
    }
    for prompt in prompts {
        println!("#{} {} (v{})", prompt.id, prompt.name, prompt.version);
        println!(
            "    {}",
            prompt.description.as_deref().unwrap_or("No description")
        );
        let tag_names: Vec<_> = prompt.tag_names().collect();
        if !tag_names.is_empty() {
            println!("    tags: {}", tag_names.join(", "));
        }
    }
}

fn print_prompt(prompt: &Prompt) {
    println!("#{} {} (v{})", prompt.id, prompt.name, prompt.version);
    if let Some(description) = &prompt.description {
        println!("{}", description);
    }
    println!();
    println!("{}", prompt.text);
    println!();

    let placeholders = extract_placeholders(&prompt.text);
    if !placeholders.is_empty() {
        println!("Variables: {}", placeholders.join(", "));
    }
    let tag_names: Vec<_> = prompt.tag_names().collect();
    if !tag_names.is_empty() {
        println!("Tags: {}", tag_names.join(", "));
    }
    if let Some(meta) = prompt.meta.as_ref().filter(|m| !m.is_empty()) {
        println!("Metadata:");
        for (key, value) in meta.iter() {
            println!("    {}: {}", key, value);
        }
    }
    let choices: Vec<_> = version_choices(prompt).into_iter().map(|c| c.label).collect();
    println!("Versions: {}", choices.join(", "));
}

fn print_history(prompt: &Prompt) {
    println!("Version History: {}", prompt.name);
    let versions = history(prompt);
    if versions.is_empty() {
        println!("No version history available");
        return;
    }
    for version in versions {
        println!();
        println!(
            "Version {}  {}",
            version.version,
            format_timestamp(&version.created_at)
        );
        println!("{}", version.text);
        if let Some(meta) = version.meta.as_ref().filter(|m| !m.is_empty()) {
            println!("Metadata:");
            for (key, value) in meta.iter() {
                println!("    {}: {}", key, value);
            }
        }
    }
}

fn print_panel(label: &str, response: Option<&str>) {
    println!("=== {} ===", label);
    println!("{}", response.unwrap_or("(no response)"));
    println!();
}
