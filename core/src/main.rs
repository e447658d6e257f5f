//! Winelist CLI - check a menu file and preview the classified menu
//!
//! # Commands
//!
//! ```bash
//! winelist check                        # Load the configured menu and report counts
//! winelist menu --query "tab=red"       # Print the menu for a view state
//! winelist menu --hash "#white" --json  # Same, as JSON, hash-style state
//! winelist varietals --tab red          # Varietal filter values
//! winelist show "0-Barolo-12"           # One item, detail view
//! winelist classify "Shiraz" "Cava"     # Canonical label and category
//! winelist parse -s menu.csv            # Raw parsed records as JSON
//! ```
//!
//! The menu file is `--source`, else `WINELIST_SOURCE`, else the default
//! file of `WINELIST_MENU`.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::error::Error;
use winelist::logs::LOG_BROADCASTER;
use winelist::models::view::SectionBody;
use winelist::{
    canonical_varietal, classify, fetch_bytes, load_source, parse_bytes, Config, MenuItem,
    MenuSnapshot, MenuSource, MenuView, PipelineError, Price, Tab, ViewState,
};

#[derive(Parser)]
#[command(name = "winelist")]
#[command(about = "Load, check and preview a restaurant wine menu", long_about = None)]
struct Cli {
    /// Menu file path or http(s) URL
    #[arg(short, long, global = true)]
    source: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the menu CSV and output raw records as JSON
    Parse,

    /// Load the menu and report what was found
    Check,

    /// Print the menu for a view state
    Menu {
        /// Query-string state, e.g. "tab=red&varietal=merlot"
        #[arg(short, long, conflicts_with = "hash")]
        query: Option<String>,

        /// Hash-style state, e.g. "#white"
        #[arg(long)]
        hash: Option<String>,

        /// Output the view as JSON
        #[arg(long)]
        json: bool,
    },

    /// List canonical varietals
    Varietals {
        /// Restrict to one tab (red, white, sparkling)
        #[arg(short, long)]
        tab: Option<String>,
    },

    /// Show one item by id
    Show {
        /// Item id
        id: String,

        /// Output the item as JSON
        #[arg(long)]
        json: bool,
    },

    /// Canonicalize and classify varietal names
    Classify {
        /// Varietal names
        #[arg(required = true)]
        varietals: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    let json_out = matches!(
        cli.command,
        Commands::Parse | Commands::Menu { json: true, .. } | Commands::Show { json: true, .. }
    );
    if config.quiet || json_out {
        LOG_BROADCASTER.set_echo(false);
    }

    let source = config.resolve_source(cli.source.as_deref());

    let result = match cli.command {
        Commands::Parse => cmd_parse(&source).await,
        Commands::Check => cmd_check(&source).await,
        Commands::Menu { query, hash, json } => {
            cmd_menu(&source, query.as_deref(), hash.as_deref(), json).await
        }
        Commands::Varietals { tab } => cmd_varietals(&source, tab.as_deref()).await,
        Commands::Show { id, json } => cmd_show(&source, &id, json).await,
        Commands::Classify { varietals } => cmd_classify(&varietals),
    };

    if let Err(e) = result {
        match e.downcast_ref::<PipelineError>() {
            Some(pe) => eprintln!("❌ {}", pe.status_message()),
            None => eprintln!("❌ Error: {}", e),
        }
        std::process::exit(1);
    }
}

async fn cmd_parse(source: &MenuSource) -> Result<(), Box<dyn Error>> {
    eprintln!("📄 Parsing: {}", source);

    let bytes = fetch_bytes(source).await?;
    let result = parse_bytes(&bytes);

    eprintln!("   Encoding: {}", result.encoding);
    eprintln!("   Columns: {}", result.parsed.headers.join(", "));
    eprintln!("✅ Parsed {} records", result.parsed.records.len());

    print_json(&result.parsed.records)
}

async fn cmd_check(source: &MenuSource) -> Result<(), Box<dyn Error>> {
    let snapshot = load_source(source).await?;

    println!("Source:   {}", snapshot.source);
    println!("Format:   {:?}", snapshot.format);
    println!("Loaded:   {}", snapshot.loaded_at.to_rfc3339());
    println!("Items:    {}", snapshot.len());
    if snapshot.hidden_count > 0 {
        println!("Hidden:   {}", snapshot.hidden_count);
    }
    for category in winelist::TopCategory::ALL {
        println!(
            "  {:<10} {:>4} items, {} varietals",
            category.label(),
            snapshot.items().iter().filter(|i| i.top_category == category).count(),
            snapshot.varietals_for(category).len()
        );
    }
    for special in winelist::Special::ALL {
        let n = snapshot.items().iter().filter(|i| i.has_special(special)).count();
        if n > 0 {
            println!("  {:<10} {:>4} items", special.label(), n);
        }
    }

    Ok(())
}

async fn cmd_menu(
    source: &MenuSource,
    query: Option<&str>,
    hash: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let state = match (query, hash) {
        (_, Some(h)) => ViewState::from_hash(h),
        (Some(q), None) => ViewState::from_query(q),
        (None, None) => ViewState::default(),
    };

    let snapshot = load_source(source).await?;
    let view = snapshot.view(&state);

    if json {
        return print_json(&view);
    }

    print_view(&view);
    Ok(())
}

async fn cmd_varietals(source: &MenuSource, tab: Option<&str>) -> Result<(), Box<dyn Error>> {
    let snapshot = load_source(source).await?;

    let category = match tab {
        None => None,
        Some(key) => match Tab::from_key(key).and_then(|t| t.category()) {
            Some(c) => Some(c),
            None => return Err(format!("Unknown tab: {}", key).into()),
        },
    };

    let varietals = match category {
        Some(c) => snapshot.varietals_for(c),
        None => snapshot.varietals(),
    };
    for v in varietals {
        println!("{}", v);
    }
    Ok(())
}

async fn cmd_show(source: &MenuSource, id: &str, json: bool) -> Result<(), Box<dyn Error>> {
    let snapshot: MenuSnapshot = load_source(source).await?;
    let item = snapshot
        .item(id)
        .ok_or_else(|| format!("No item with id \"{}\"", id))?;

    if json {
        return print_json(item);
    }

    println!("{}", heading(item));
    let rows = [
        ("Varietal", item.varietal.clone()),
        ("Category", item.top_category.label().to_string()),
        ("World", item.world_bucket.label().to_string()),
        ("Location", item.location()),
        ("Bin", item.bin.clone()),
        ("Glass", item.glass_price.with_symbol("$")),
        ("Bottle", item.bottle_price.with_symbol("$")),
    ];
    for (label, value) in rows {
        if !value.is_empty() {
            println!("  {:<9} {}", label, value);
        }
    }
    if item.staff_pick {
        println!("  ★ Staff pick");
    }
    if !item.description.is_empty() {
        println!();
        println!("  {}", item.description);
    }
    Ok(())
}

fn cmd_classify(varietals: &[String]) -> Result<(), Box<dyn Error>> {
    for raw in varietals {
        let canonical = canonical_varietal(raw);
        println!("{:<24} → {:<24} {}", raw, canonical, classify(&canonical).label());
    }
    Ok(())
}

// =============================================================================
// Output helpers
// =============================================================================

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn heading(item: &MenuItem) -> String {
    if item.vintage.is_empty() {
        item.name.clone()
    } else {
        format!("{} {}", item.name, item.vintage)
    }
}

fn prices(item: &MenuItem) -> String {
    let shown: Vec<String> = [&item.glass_price, &item.bottle_price]
        .into_iter()
        .filter(|p| !p.is_empty())
        .map(|p: &Price| p.with_symbol("$"))
        .collect();
    shown.join(" / ")
}

fn print_row(item: &MenuItem, indent: usize) {
    let pad = " ".repeat(indent);
    println!("{}{:>5}  {:<40} {}", pad, item.bin, item.name, prices(item));
    let sub = item.subtitle();
    if !sub.is_empty() {
        println!("{}       {}", pad, sub);
    }
}

fn print_view(view: &MenuView) {
    if view.is_empty() {
        println!("(no wines for this view)");
        return;
    }

    for section in &view.sections {
        match &section.subtitle {
            Some(sub) => println!("\n== {} ({}) ==", section.label, sub),
            None => println!("\n== {} ==", section.label),
        }
        match &section.body {
            SectionBody::Flat { items } => items.iter().for_each(|i| print_row(i, 2)),
            SectionBody::ByWorld { blocks } => {
                for block in blocks {
                    println!("  -- {} --", block.label);
                    block.items.iter().for_each(|i| print_row(i, 4));
                }
            }
        }
    }
}
