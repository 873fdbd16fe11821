use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use emitag::{Estimator, TrainingSet, DEFAULT_SMOOTHING};

#[derive(Parser, Debug)]
#[command(about = "A program to train emission models of Emitag.")]
struct Args {
    /// The dataset directory. The corpus defaults to `<DATASET>/train` and the model to
    /// `<DATASET>/params.bin`
    #[arg(long)]
    dataset: PathBuf,

    /// A tagged training corpus with one `word tag` pair per line
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// The file to write the trained model to
    #[arg(long)]
    model: Option<PathBuf>,

    /// The smoothing constant reserving probability mass for unknown words
    #[arg(long, default_value_t = DEFAULT_SMOOTHING)]
    smoothing: f64,

    /// The compression level of zstd
    #[arg(long, default_value = "19")]
    zstd_level: i32,

    /// The number of workers for zstd (0 means multithreaded will be disabled)
    #[arg(long, default_value = "0")]
    zstd_workers: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let corpus = args.corpus.unwrap_or_else(|| args.dataset.join("train"));
    let model_path = args.model.unwrap_or_else(|| args.dataset.join("params.bin"));

    eprintln!("Loading {corpus:?} ...");
    let ts = TrainingSet::load(&corpus)?;
    eprintln!("# of sentences: {}", ts.n_sentences());
    eprintln!("# of observations: {}", ts.len());

    eprintln!("Training parameters...");
    let estimator = Estimator::new(&ts)?.smoothing(args.smoothing)?;
    eprintln!("# of words: {}", estimator.words().len());
    eprintln!("# of tags: {}", estimator.tags().len());
    let model = estimator.into_model();
    eprintln!("Finish training.");

    let mut f = zstd::Encoder::new(File::create(&model_path)?, args.zstd_level)?;
    f.multithread(args.zstd_workers)?;
    model.write(&mut f)?;
    f.finish()?;
    eprintln!("Parameters are saved to {model_path:?}");

    Ok(())
}
