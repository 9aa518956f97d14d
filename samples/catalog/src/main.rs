//! Catalog sample application entry point.
//!
//! A console menu over the `arbors` tree maps: the product catalog is
//! indexed by name or by id, into the unbalanced or the balanced variant,
//! and the menu reports each tree's own instrumentation next to the
//! caller's wall-clock measurement so the variants can be compared live.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use arbors::map::{AvlTreeMap, BinarySearchTreeMap, OrderedMap};
use catalog::{AppConfig, Product, index_products, load_products};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// The indexes built so far during the session.
#[derive(Default)]
struct Indexes {
    by_name: Option<BinarySearchTreeMap<String, Product>>,
    unbalanced_by_id: Option<BinarySearchTreeMap<u32, Product>>,
    balanced_by_id: Option<AvlTreeMap<u32, Product>>,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    tracing::info!(path = %config.data_path.display(), "catalog sample starting");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut indexes = Indexes::default();

    loop {
        print_menu();
        let Some(choice) = read_line(&mut input) else {
            break;
        };
        match choice.trim() {
            "1" => load_by_name(&config, &mut indexes),
            "2" => load_and_compare_by_id(&config, &mut indexes),
            "3" => search_by_name(&mut input, &indexes),
            "4" => compare_search_by_id(&mut input, &indexes),
            "5" => remove_by_name(&mut input, &mut indexes),
            "6" => remove_by_id(&mut input, &mut indexes),
            "7" => range_by_name(&mut input, &indexes),
            "8" => range_by_id(&mut input, &indexes),
            "9" => rebuild_id_indexes(&mut indexes),
            "0" => break,
            other => println!("Unknown option: {other}"),
        }
        println!();
    }

    tracing::info!("catalog sample exiting");
}

fn print_menu() {
    println!("CATALOG: tree comparison playground");
    println!("===================================");
    println!("1 - Load catalog indexed by name (unbalanced)");
    println!("2 - Load and compare construction by id (unbalanced vs AVL)");
    println!("3 - Search product by name");
    println!("4 - Search and compare by id (unbalanced vs AVL)");
    println!("5 - Remove product by name");
    println!("6 - Remove product by id");
    println!("7 - Range filter by name");
    println!("8 - Range filter by id");
    println!("9 - Rebuild id indexes from the name index");
    println!("0 - Quit");
    print!("Your option: ");
    let _ = io::stdout().flush();
}

/// Reads one line from the console; `None` means end of input.
fn read_line(input: &mut impl BufRead) -> Option<String> {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line),
    }
}

fn prompt(input: &mut impl BufRead, label: &str) -> Option<String> {
    print!("{label}: ");
    let _ = io::stdout().flush();
    read_line(input).map(|line| line.trim().to_string())
}

fn prompt_id(input: &mut impl BufRead, label: &str) -> Option<u32> {
    let text = prompt(input, label)?;
    match text.parse() {
        Ok(id) => Some(id),
        Err(_) => {
            println!("Not a numeric id: {text}");
            None
        }
    }
}

// =============================================================================
// Loading
// =============================================================================

fn load_by_name(config: &AppConfig, indexes: &mut Indexes) {
    match load_products(&config.data_path) {
        Ok(products) => {
            let started = Instant::now();
            let map: BinarySearchTreeMap<String, Product> =
                index_products(&products, |product| product.name.clone());
            println!(
                "Indexed {} products by name in {:?} (tree height {}).",
                map.len(),
                started.elapsed(),
                map.height()
            );
            indexes.by_name = Some(map);
        }
        Err(error) => tracing::error!(%error, "could not load the catalog"),
    }
}

fn load_and_compare_by_id(config: &AppConfig, indexes: &mut Indexes) {
    let products = match load_products(&config.data_path) {
        Ok(products) => products,
        Err(error) => {
            tracing::error!(%error, "could not load the catalog");
            return;
        }
    };
    println!("Catalog read; building both id indexes from the same buffer.");

    let started = Instant::now();
    let unbalanced: BinarySearchTreeMap<u32, Product> =
        index_products(&products, |product| product.id);
    let unbalanced_time = started.elapsed();

    let started = Instant::now();
    let balanced: AvlTreeMap<u32, Product> = index_products(&products, |product| product.id);
    let balanced_time = started.elapsed();

    println!(
        "Unbalanced: {unbalanced_time:?} (height {})",
        unbalanced.height()
    );
    println!("AVL:        {balanced_time:?} (height {})", balanced.height());
    if balanced_time > unbalanced_time {
        println!("The AVL build took longer: every insertion may rotate.");
    } else {
        println!("The AVL build was faster here; sorted ids degenerate the unbalanced tree.");
    }

    indexes.unbalanced_by_id = Some(unbalanced);
    indexes.balanced_by_id = Some(balanced);
}

// =============================================================================
// Searching
// =============================================================================

fn search_by_name(input: &mut impl BufRead, indexes: &Indexes) {
    let Some(map) = &indexes.by_name else {
        println!("Load the catalog by name first (option 1).");
        return;
    };
    let Some(name) = prompt(input, "Product name") else {
        return;
    };

    let started = Instant::now();
    let result = map.search(&name);
    let wall = started.elapsed();

    match result {
        Ok(product) => println!("Found: {product}"),
        Err(_) => println!("No product named {name:?}."),
    }
    println!(
        "{} comparisons, {:?} in-tree, {wall:?} wall-clock.",
        map.last_comparisons(),
        map.last_elapsed()
    );
}

fn compare_search_by_id(input: &mut impl BufRead, indexes: &Indexes) {
    let (Some(unbalanced), Some(balanced)) =
        (&indexes.unbalanced_by_id, &indexes.balanced_by_id)
    else {
        println!("Load the id indexes first (option 2 or 9).");
        return;
    };
    let Some(id) = prompt_id(input, "Product id") else {
        return;
    };

    let unbalanced_result = unbalanced.search(&id).cloned();
    println!(
        "Unbalanced: {} comparisons, {:?}",
        unbalanced.last_comparisons(),
        unbalanced.last_elapsed()
    );

    let balanced_result = balanced.search(&id).cloned();
    println!(
        "AVL:        {} comparisons, {:?}",
        balanced.last_comparisons(),
        balanced.last_elapsed()
    );

    match (unbalanced_result, balanced_result) {
        (Ok(product), Ok(_)) => println!("Found: {product}"),
        _ => println!("Product id {id} not found."),
    }
}

// =============================================================================
// Removal
// =============================================================================

fn remove_by_name(input: &mut impl BufRead, indexes: &mut Indexes) {
    let Some(map) = &mut indexes.by_name else {
        println!("Load the catalog by name first (option 1).");
        return;
    };
    let Some(name) = prompt(input, "Product name to remove") else {
        return;
    };

    match map.remove(&name) {
        Ok(product) => println!(
            "Removed {product} ({} comparisons).",
            map.last_comparisons()
        ),
        Err(_) => println!("No product named {name:?}."),
    }
}

fn remove_by_id(input: &mut impl BufRead, indexes: &mut Indexes) {
    if indexes.unbalanced_by_id.is_none() && indexes.balanced_by_id.is_none() {
        println!("Load the id indexes first (option 2 or 9).");
        return;
    }
    let Some(id) = prompt_id(input, "Product id to remove") else {
        return;
    };

    // Remove from both id indexes so later comparisons stay meaningful.
    let mut removed = None;
    if let Some(map) = &mut indexes.unbalanced_by_id {
        removed = map.remove(&id).ok().or(removed);
    }
    if let Some(map) = &mut indexes.balanced_by_id {
        removed = map.remove(&id).ok().or(removed);
    }

    match removed {
        Some(product) => println!("Removed {product}."),
        None => println!("Product id {id} not found."),
    }
}

// =============================================================================
// Range Filters
// =============================================================================

fn range_by_name(input: &mut impl BufRead, indexes: &Indexes) {
    let Some(map) = &indexes.by_name else {
        println!("Load the catalog by name first (option 1).");
        return;
    };
    let Some(low) = prompt(input, "First name of the interval") else {
        return;
    };
    let Some(high) = prompt(input, "Last name of the interval") else {
        return;
    };

    let started = Instant::now();
    let matches: Vec<String> = map
        .range(&low, &high)
        .map(|(_, product)| product.to_string())
        .collect();
    let wall = started.elapsed();

    println!("Filter [{low} ... {high}] matched {} products:", matches.len());
    for line in matches {
        println!("  {line}");
    }
    println!("{wall:?} wall-clock.");
}

fn range_by_id(input: &mut impl BufRead, indexes: &Indexes) {
    let Some(map) = &indexes.balanced_by_id else {
        println!("Load the id indexes first (option 2 or 9).");
        return;
    };
    let Some(low) = prompt_id(input, "First id of the interval") else {
        return;
    };
    let Some(high) = prompt_id(input, "Last id of the interval") else {
        return;
    };

    let started = Instant::now();
    let matches: Vec<String> = map
        .range(&low, &high)
        .map(|(_, product)| product.to_string())
        .collect();
    let wall = started.elapsed();

    println!("Filter [{low} ... {high}] matched {} products:", matches.len());
    for line in matches {
        println!("  {line}");
    }
    println!("{wall:?} wall-clock.");
}

// =============================================================================
// Re-keying
// =============================================================================

fn rebuild_id_indexes(indexes: &mut Indexes) {
    let Some(by_name) = &indexes.by_name else {
        println!("Load the catalog by name first (option 1).");
        return;
    };

    // Rebuild through the re-keying constructor: the name index is walked
    // in ascending order and every product re-inserted under its id.
    indexes.unbalanced_by_id = Some(BinarySearchTreeMap::rekeyed_from(by_name, |product| {
        product.id
    }));
    indexes.balanced_by_id = Some(AvlTreeMap::rekeyed_from(by_name, |product| product.id));
    println!(
        "Rebuilt both id indexes from the name index ({} products).",
        by_name.len()
    );
}
