//! Non-interactive subcommands

use anyhow::{bail, Context, Result};
use browser_core::{format, Config, Paths};
use infisical::Credentials;
use secret_tree::{visible_rows, ExpansionState, Query, Row, TreeNode};
use std::io::{self, BufRead, Write};

use crate::data;

/// Print the (optionally filtered) tree without the TUI
pub fn cmd_list(credentials: &Credentials, config: &Config, query: Option<&str>, show_values: bool, json: bool) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let snapshot = runtime.block_on(data::fetch(credentials, config))?;

    let query = Query::new(query.unwrap_or_default());
    let mut expansion = ExpansionState::new();
    expansion.expand_all(&snapshot.tree);
    let rows = visible_rows(&snapshot.tree, &query, &expansion);

    if json {
        let secrets: Vec<serde_json::Value> = rows
            .iter()
            .filter(|row| !row.node.is_folder())
            .map(|row| secret_json(row.node, show_values))
            .collect();
        println!("{}", serde_json::to_string_pretty(&secrets)?);
        return Ok(());
    }

    println!(
        "Loaded {} from {} environment ({})",
        format::plural(snapshot.secret_count, "secret"),
        credentials.environment,
        snapshot.region
    );
    println!();

    if rows.is_empty() {
        if query.is_empty() {
            println!("No secrets found");
        } else {
            println!("No secrets match: {}", query.as_str());
        }
        return Ok(());
    }

    for row in &rows {
        println!("{}", list_line(row, show_values));
    }

    Ok(())
}

fn list_line(row: &Row, show_values: bool) -> String {
    let indent = "  ".repeat(row.depth + 1);
    match row.node {
        TreeNode::Folder { name, .. } => format!("{}{}/ ({})", indent, name, row.visible_children),
        TreeNode::Secret { name, value, .. } => {
            let shown = if show_values { value.as_str() } else { format::mask(value) };
            format!("{}{} = {}", indent, name, shown)
        }
    }
}

fn secret_json(node: &TreeNode, show_values: bool) -> serde_json::Value {
    let mut entry = serde_json::json!({
        "key": node.name(),
        "path": data::folder_of(node),
    });
    if show_values {
        entry["value"] = serde_json::Value::from(node.value().unwrap_or_default());
    }
    entry
}

/// Prompt for credentials and write them to the config `.env`
pub fn cmd_init(paths: &Paths, defaults: &Credentials, force: bool) -> Result<()> {
    let env_file = paths.env_file();
    if env_file.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            env_file.display()
        );
    }

    println!("Infisical universal-auth setup");
    println!("Values are written to {}", env_file.display());
    println!();

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let client_id = prompt(&mut input, "Client ID", &defaults.client_id)?;
    let client_secret = rpassword::prompt_password("Client secret: ")
        .context("Failed to read client secret")?;
    if client_secret.trim().is_empty() {
        bail!("Empty client secret not allowed");
    }
    let project_id = prompt(&mut input, "Project ID", &defaults.project_id)?;
    let environment = prompt(&mut input, "Environment slug", &defaults.environment)?;

    let credentials = Credentials {
        client_id,
        client_secret: client_secret.trim().to_string(),
        project_id,
        environment,
    };
    credentials.validate()?;

    credentials
        .write_env_file(&env_file)
        .with_context(|| format!("Failed to write {}", env_file.display()))?;
    tracing::info!(path = %env_file.display(), "Wrote credentials");

    // Leave an editable config next to the credentials
    let config_file = paths.config_file();
    if !config_file.exists() {
        Config::default()
            .save(&config_file)
            .with_context(|| format!("Failed to write {}", config_file.display()))?;
    }

    println!();
    println!("success: Credentials saved");
    println!("Browse them with: browse");

    Ok(())
}

/// Read one line, falling back to `default` when left blank
fn prompt(input: &mut impl BufRead, label: &str, default: &str) -> Result<String> {
    if default.is_empty() {
        print!("{}: ", label);
    } else {
        print!("{} [{}]: ", label, default);
    }
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let value = line.trim();

    Ok(if value.is_empty() { default.to_string() } else { value.to_string() })
}

/// Report which credentials are set and which regions will be tried
pub fn cmd_check(paths: &Paths, credentials: &Credentials, config: &Config) -> Result<()> {
    println!("Credentials");
    for (name, mark) in credentials.presence() {
        println!("  {} {}", mark, name);
    }
    println!();

    println!("Regions (tried in order)");
    for region in &config.regions {
        println!("  {:<8} {}", region.name, region.base_url);
    }
    println!();

    println!("Config: {}", paths.config_file().display());
    println!("Env:    {}", paths.env_file().display());
    println!("Log:    {}", paths.log_file().display());
    println!();

    credentials.validate().context("Credentials incomplete")?;
    println!("success: All credentials present");

    Ok(())
}

/// Open a folder of the environment in the Infisical web app
pub fn cmd_open(credentials: &Credentials, config: &Config, path: Option<&str>) -> Result<()> {
    if credentials.project_id.is_empty() || credentials.environment.is_empty() {
        bail!("Project and environment are required (set them in .env or pass --project/--env)");
    }

    let folder = normalize_folder(path.unwrap_or("/"));
    let url = data::web_url(config, credentials, &folder);

    open::that(&url).with_context(|| format!("Failed to open {}", url))?;
    println!("Opened {}", url);

    Ok(())
}

/// "prod/db/" -> "/prod/db"
fn normalize_folder(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    format!("/{}", trimmed)
}
