use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use log::debug;

/// Pretty-print a utcode document without knowing its record types.
#[derive(Parser, Debug)]
#[command(name = "utcode2text")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Document to read; standard input when omitted or `-`
    file: Option<PathBuf>,

    /// Print the whole document on a single line
    #[arg(short, long)]
    compact: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let data = match cli.file.as_deref() {
        None => read_stdin()?,
        Some(path) if path.as_os_str() == "-" => read_stdin()?,
        Some(path) => fs::read(path)?,
    };
    debug!("read {} bytes", data.len());

    let text = if cli.compact {
        utcode_text::utcode2text_compact(&data)?
    } else {
        utcode_text::utcode2text(&data)?
    };
    println!("{text}");
    Ok(())
}

fn read_stdin() -> io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    io::stdin().read_to_end(&mut buffer)?;
    Ok(buffer)
}
