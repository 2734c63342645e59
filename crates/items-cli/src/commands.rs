use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use items_server::{ItemsServer, ServerConfig};
use items_store::{Item, ItemStore, JsonFileStore};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let data = cli.data;
    let format = cli.format;
    match cli.command {
        Command::Serve(args) => cmd_serve(args, data).await,
        Command::Init => cmd_init(data_path(data), format).await,
        Command::List => cmd_list(data_path(data), format).await,
        Command::Add(args) => cmd_add(args, data_path(data), format).await,
        Command::Update(args) => cmd_update(args, data_path(data), format).await,
        Command::Remove(args) => cmd_remove(args, data_path(data), format).await,
    }
}

fn data_path(data: Option<PathBuf>) -> PathBuf {
    data.unwrap_or_else(|| ServerConfig::default().data_path)
}

fn open_store(path: &Path) -> ItemStore {
    ItemStore::new(Arc::new(JsonFileStore::new(path)))
}

async fn cmd_serve(args: ServeArgs, data: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid bind address {bind:?}"))?;
    }
    if let Some(data) = data {
        config.data_path = data;
    }
    if args.serialize_writes {
        config.serialize_writes = true;
    }

    println!(
        "{} Serving {} on {}",
        "✓".green().bold(),
        config.data_path.display().to_string().bold(),
        format!("http://{}", config.bind_addr).cyan()
    );
    ItemsServer::new(config).serve().await?;
    Ok(())
}

async fn cmd_init(path: PathBuf, format: OutputFormat) -> anyhow::Result<()> {
    let created = JsonFileStore::new(&path).init().await?;
    println!("{}", init_report(&path, created, format)?);
    Ok(())
}

fn init_report(path: &Path, created: bool, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
            "path": path.display().to_string(),
            "created": created,
        }))?,
        OutputFormat::Text if created => format!(
            "{} Initialized empty collection in {}",
            "✓".green().bold(),
            path.display().to_string().bold()
        ),
        OutputFormat::Text => format!("Collection already exists at {}", path.display().to_string().bold()),
    })
}

async fn cmd_list(path: PathBuf, format: OutputFormat) -> anyhow::Result<()> {
    let items = open_store(&path)
        .list()
        .await
        .with_context(|| format!("run `items init --data {}` to create it", path.display()))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&items)?),
        OutputFormat::Text if items.is_empty() => println!("No items."),
        OutputFormat::Text => {
            for item in &items {
                println!("{}", item_line(item));
            }
            println!("{} item(s)", items.len().to_string().bold());
        }
    }
    Ok(())
}

async fn cmd_add(args: AddArgs, path: PathBuf, format: OutputFormat) -> anyhow::Result<()> {
    let payload = build_payload(Some(args.name), args.fields);
    let item = open_store(&path).create(payload).await?;
    print_item("Created", &item, format)
}

async fn cmd_update(args: UpdateArgs, path: PathBuf, format: OutputFormat) -> anyhow::Result<()> {
    let payload = build_payload(args.name, args.fields);
    let item = open_store(&path).update(&args.id, payload).await?;
    print_item("Updated", &item, format)
}

async fn cmd_remove(args: RemoveArgs, path: PathBuf, format: OutputFormat) -> anyhow::Result<()> {
    open_store(&path).remove(&args.id).await?;
    println!("{}", remove_report(&args.id, format)?);
    Ok(())
}

fn remove_report(id: &str, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({ "removed": id }))?,
        OutputFormat::Text => format!("{} Removed item {}", "✓".green().bold(), id.yellow()),
    })
}

fn print_item(verb: &str, item: &Item, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(item)?),
        OutputFormat::Text => println!("{} {verb} {}", "✓".green().bold(), item_line(item)),
    }
    Ok(())
}

fn item_line(item: &Item) -> String {
    let extras: Vec<String> = item
        .fields()
        .iter()
        .filter(|(k, _)| k.as_str() != items_store::ID_FIELD && k.as_str() != items_store::NAME_FIELD)
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    format!(
        "{}  {}  {}",
        item.id().unwrap_or("-").yellow(),
        item.name().unwrap_or("-").bold(),
        extras.join(" ").dimmed()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use items_store::CollectionStore;

    fn cli(data: &Path, args: &[&str]) -> Cli {
        let mut argv = vec!["items", "--data", data.to_str().unwrap()];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[tokio::test]
    async fn init_add_update_remove() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("items.json");
        let file = JsonFileStore::new(&data);

        run_command(cli(&data, &["init"])).await.unwrap();
        assert!(file.load().await.unwrap().is_empty());

        run_command(cli(&data, &["add", "-n", "Lamp", "-f", "qty=2"])).await.unwrap();
        let items = file.load().await.unwrap();
        assert_eq!(items.len(), 1);
        let id = items[0].id().unwrap().to_string();
        assert_eq!(items[0].get("qty"), Some(&serde_json::json!(2)));

        run_command(cli(&data, &["update", id.as_str(), "-n", "Desk lamp"])).await.unwrap();
        let items = file.load().await.unwrap();
        assert_eq!(items[0].name(), Some("Desk lamp"));
        assert_eq!(items[0].get("qty"), Some(&serde_json::json!(2)));

        run_command(cli(&data, &["--format", "json", "list"])).await.unwrap();

        run_command(cli(&data, &["remove", id.as_str()])).await.unwrap();
        assert!(file.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_without_name_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("items.json");
        run_command(cli(&data, &["init"])).await.unwrap();
        run_command(cli(&data, &["add", "-n", "A"])).await.unwrap();
        let id = JsonFileStore::new(&data).load().await.unwrap()[0]
            .id()
            .unwrap()
            .to_string();

        let err = run_command(cli(&data, &["update", id.as_str(), "-f", "qty=1"])).await.unwrap_err();
        assert!(err.to_string().contains("`name`"));
    }

    #[tokio::test]
    async fn list_without_data_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("absent.json");
        let err = run_command(cli(&data, &["list"])).await.unwrap_err();
        assert!(err.to_string().contains("items init"));
    }

    #[tokio::test]
    async fn remove_unknown_id_fails() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("items.json");
        run_command(cli(&data, &["init"])).await.unwrap();
        let err = run_command(cli(&data, &["remove", "nope"])).await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn json_format_applies_to_init_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("items.json");
        run_command(cli(&data, &["--format", "json", "init"])).await.unwrap();
        run_command(cli(&data, &["add", "-n", "A"])).await.unwrap();
        let id = JsonFileStore::new(&data).load().await.unwrap()[0]
            .id()
            .unwrap()
            .to_string();
        run_command(cli(&data, &["--format", "json", "remove", id.as_str()])).await.unwrap();
        assert!(JsonFileStore::new(&data).load().await.unwrap().is_empty());
    }

    #[test]
    fn init_report_json() {
        let path = Path::new("data/items.json");
        let report: serde_json::Value =
            serde_json::from_str(&init_report(path, true, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(report, serde_json::json!({"path": "data/items.json", "created": true}));

        let report: serde_json::Value =
            serde_json::from_str(&init_report(path, false, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(report["created"], false);
    }

    #[test]
    fn remove_report_formats() {
        colored::control::set_override(false);
        let report: serde_json::Value =
            serde_json::from_str(&remove_report("42", OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(report, serde_json::json!({"removed": "42"}));
        assert_eq!(remove_report("42", OutputFormat::Text).unwrap(), "✓ Removed item 42");
    }

    #[test]
    fn item_line_lists_extra_fields() {
        colored::control::set_override(false);
        let item: Item =
            serde_json::from_value(serde_json::json!({"id": "1", "name": "A", "qty": 2})).unwrap();
        assert_eq!(item_line(&item), "1  A  qty=2");
    }
}
