use std::fs::File;
use std::io::{prelude::*, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use emitag::{Model, TaggedLine};

#[derive(Parser, Debug)]
#[command(about = "A program to tag tokens with a trained Emitag model.")]
struct Args {
    /// The dataset directory. Paths below default to files in this directory
    #[arg(long)]
    dataset: PathBuf,

    /// The model file to use when tagging (default: `<DATASET>/params.bin`)
    #[arg(long)]
    model: Option<PathBuf>,

    /// The input file with one token per line (default: `<DATASET>/dev.in`)
    #[arg(long)]
    input: Option<PathBuf>,

    /// The output file (default: `<DATASET>/dev.p2.out`)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn read_model<R>(rdr: R) -> Result<Model, Box<dyn std::error::Error>>
where
    R: Read,
{
    let f = zstd::Decoder::new(rdr)?;
    Ok(Model::read(f)?)
}

fn open_model(path: &Path) -> Result<Model, Box<dyn std::error::Error>> {
    read_model(File::open(path)?)
}

/// Loads a zstd-compressed model. Returns `None` after telling the user to run `train` if the
/// file is missing or can't be decoded.
fn load_model(path: &Path) -> Option<Model> {
    match open_model(path) {
        Ok(model) => Some(model),
        Err(e) => {
            log::debug!("failed to load {path:?}: {e}");
            eprintln!("Parameters file {path:?} can't be loaded, make sure to run train first");
            None
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let model_path = args.model.unwrap_or_else(|| args.dataset.join("params.bin"));
    let input = args.input.unwrap_or_else(|| args.dataset.join("dev.in"));
    let output = args.output.unwrap_or_else(|| args.dataset.join("dev.p2.out"));

    eprintln!("Loading model file...");
    let Some(model) = load_model(&model_path) else {
        return Ok(());
    };
    let tagger = model.tagger()?;

    eprintln!("Generating tags");
    let lines = BufReader::new(File::open(&input)?)
        .lines()
        .collect::<Result<Vec<_>, _>>()?;
    let mut out = BufWriter::new(File::create(&output)?);
    let mut n_tokens = 0;
    let start = Instant::now();
    for line in tagger.tag_lines(&lines) {
        let line = line?;
        if matches!(line, TaggedLine::Token { .. }) {
            n_tokens += 1;
        }
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    let duration = start.elapsed();
    eprintln!("Elapsed: {} [sec]", duration.as_secs_f64());
    eprintln!("# of tokens: {n_tokens}");
    eprintln!("Tags are saved to {output:?}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use emitag::{Estimator, TrainingSet};

    fn dog_model() -> Model {
        let corpus = "the DT\nthe DT\ndog NN\nbarks VB\n";
        let ts = TrainingSet::from_reader(corpus.as_bytes()).unwrap();
        Estimator::new(&ts).unwrap().into_model()
    }

    fn compress(model: &Model) -> Vec<u8> {
        let mut f = zstd::Encoder::new(vec![], 19).unwrap();
        model.write(&mut f).unwrap();
        f.finish().unwrap()
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("emitag-predict-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_read_model_zstd() {
        let model = dog_model();
        let buf = compress(&model);
        let loaded = read_model(buf.as_slice()).unwrap();
        assert_eq!(model, loaded);
        let tagger = loaded.tagger().unwrap();
        assert_eq!("DT", tagger.tag_token("the").unwrap());
        assert_eq!("NN", tagger.tag_token("cat").unwrap());
    }

    #[test]
    fn test_load_model_from_file() {
        let model = dog_model();
        let path = temp_path("params.bin");
        std::fs::write(&path, compress(&model)).unwrap();
        let loaded = load_model(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(Some(model), loaded);
    }

    #[test]
    fn test_load_model_missing() {
        let path = temp_path("missing.bin");
        assert!(!path.exists());
        assert_eq!(None, load_model(&path));
    }

    #[test]
    fn test_load_model_truncated() {
        let mut buf = compress(&dog_model());
        buf.truncate(buf.len() / 2);
        assert!(read_model(buf.as_slice()).is_err());

        let path = temp_path("truncated.bin");
        std::fs::write(&path, &buf).unwrap();
        let loaded = load_model(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(None, loaded);
    }

    #[test]
    fn test_load_model_uncompressed() {
        let mut buf = vec![];
        dog_model().write(&mut buf).unwrap();
        assert!(read_model(buf.as_slice()).is_err());
    }
}
