use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use emitag::Evaluation;

#[derive(Parser, Debug)]
#[command(about = "A program to evaluate the accuracy of Emitag.")]
struct Args {
    /// The gold-standard file with one `token tag` pair per line
    #[arg(long)]
    gold: PathBuf,

    /// The file written by `predict`
    #[arg(long)]
    predicted: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    eprintln!("Loading {:?} and {:?} ...", args.gold, args.predicted);
    let gold = BufReader::new(File::open(&args.gold)?);
    let predicted = BufReader::new(File::open(&args.predicted)?);
    let eval = Evaluation::from_readers(gold, predicted)?;

    println!("{eval}");

    Ok(())
}
