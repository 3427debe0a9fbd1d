use std::fs::{self, File};
use std::io::{prelude::*, stdin, stdout, BufReader, BufWriter};
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zhseg::{Model, Predictor, Sentence, Vocab};

#[derive(Parser, Debug)]
#[command(
    name = "predict",
    about = "A program to perform word segmentation. Without --input, lines are read from stdin."
)]
struct Args {
    /// The model file to use when analyzing text
    #[arg(long)]
    model: PathBuf,

    /// The vocabulary file the model was trained with
    #[arg(long, default_value = "result/vocab.txt")]
    vocab: PathBuf,

    /// A tokenized test corpus. Its spacing is removed before prediction
    #[arg(long)]
    input: Option<PathBuf>,

    /// The file to write the segmentation of --input to
    #[arg(long, default_value = "result/test.output.txt")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    info!("Loading vocabulary file...");
    let vocab = Vocab::read(BufReader::new(File::open(&args.vocab)?))?;

    info!("Loading model file...");
    let mut f = zstd::Decoder::new(File::open(&args.model)?)?;
    let model = Model::read(&mut f)?;
    let predictor = Predictor::new(model, vocab)?;

    if let Some(input) = args.input {
        info!("Start tokenization");
        if let Some(dir) = args.output.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let mut out = BufWriter::new(File::create(&args.output)?);
        let mut n_sentences = 0;
        for line in BufReader::new(File::open(input)?).lines() {
            let s = predictor.predict(Sentence::from_tokenized(line?));
            writeln!(out, "{}", s.to_segmented_string())?;
            n_sentences += 1;
        }
        out.flush()?;
        info!("{} sentences saved at {:?}", n_sentences, args.output);
    } else {
        info!("Ready for input");
        let mut out = stdout().lock();
        for line in stdin().lock().lines() {
            let s = predictor.predict(Sentence::from_raw(line?));
            writeln!(out, "{}", s.to_segmented_string())?;
            out.flush()?;
        }
    }

    Ok(())
}
