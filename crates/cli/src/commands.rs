use anyhow::{Context, Result};
use clap::ArgMatches;
use ebookshelf_config::AppConfig;
use ebookshelf_core::BookDetails;
use ebookshelf_library::FileLibrary;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Opens the library and serves it over HTTP until the process exits.
pub async fn serve(config: &AppConfig) -> Result<()> {
    let library = FileLibrary::open(&config.library_path).context("Failed to open library")?;
    let shared = Arc::new(Mutex::new(library));
    ebookshelf_web::serve(&config.network_addr, shared)
        .await
        .context("Web service failed")?;
    Ok(())
}

/// Prints every book in the library, sorted by id.
pub fn list_books(config: &AppConfig) -> Result<()> {
    let library = FileLibrary::open(&config.library_path).context("Failed to open library")?;

    let mut books = library.get_all();
    books.sort_by_key(|book| book.id);

    if books.is_empty() {
        println!("Library is empty");
        return Ok(());
    }

    for book in books {
        println!(
            "{:>4}  {} ({}) [{}]",
            book.id,
            book.details.title,
            book.details.year,
            book.details.authors.join(", ")
        );
        let mut names: Vec<&String> = book.files.keys().collect();
        names.sort();
        for name in names {
            println!("      - {}", name);
        }
    }
    Ok(())
}

/// Adds a book from command-line metadata, attaching any `--file` paths.
pub fn add_book(config: &AppConfig, matches: &ArgMatches) -> Result<()> {
    let title = matches
        .get_one::<String>("title")
        .context("--title is required")?;
    let year: i32 = matches
        .get_one::<String>("year")
        .context("--year is required")?
        .parse()
        .context("--year must be an integer")?;
    let authors = collect_values(matches, "author");
    let tags = collect_values(matches, "tag");

    let mut files = HashMap::new();
    if let Some(paths) = matches.get_many::<String>("file") {
        for raw in paths {
            let path = PathBuf::from(raw);
            let data = fs::read(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
                .with_context(|| format!("{} has no usable file name", path.display()))?;
            files.insert(name, data);
        }
    }

    let mut library = FileLibrary::open(&config.library_path).context("Failed to open library")?;
    let details = BookDetails::new(title.clone(), authors, year, tags);
    let book = library.add(details, &files).context("Failed to add book")?;

    println!(
        "Added \"{}\" with id {} ({} file(s))",
        book.details.title,
        book.id,
        book.files.len()
    );
    Ok(())
}

fn collect_values(matches: &ArgMatches, name: &str) -> Vec<String> {
    matches
        .get_many::<String>(name)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}
