use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use outlay_rs::{PasswordHash, initialize_db};

/// A utility for creating a test database for the outlay_rs web server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let connection = Connection::open(output_path)?;

    initialize_db(&connection)?;

    println!("Creating test user 'demo' with password 'test'...");

    let password_hash = PasswordHash::new("test", PasswordHash::DEFAULT_COST)?;

    connection.execute(
        "INSERT INTO user (username, password_hash) VALUES (?1, ?2)",
        ("demo", password_hash.as_ref()),
    )?;
    let user_id = connection.last_insert_rowid();

    println!("Creating test expenses...");

    for (name, amount, category) in [
        ("Coffee", 3.5, "Food"),
        ("Groceries", 87.2, "Food"),
        ("Train ticket", 12.0, "Travel"),
        ("Electricity", 140.55, "Utilities"),
    ] {
        connection.execute(
            "INSERT INTO expense (name, amount, category, user_id) VALUES (?1, ?2, ?3, ?4)",
            (name, amount, category, user_id),
        )?;
    }

    println!("Success!");

    Ok(())
}
