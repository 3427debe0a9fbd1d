use std::fs::{self, File};
use std::io::{prelude::*, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zhseg::{Dataset, ModelVariant, Sentence, Trainer, Vocab, DEFAULT_EPOCHS};

#[derive(Parser, Debug)]
#[command(about = "A program to train models of zhseg.")]
struct Args {
    /// A tokenized training corpus
    #[arg(long)]
    corpus: PathBuf,

    /// The vocabulary file. If it exists, it is used as is; otherwise it is built from the
    /// corpus and written to this path
    #[arg(long, default_value = "result/vocab.txt")]
    vocab: PathBuf,

    /// The file to write the trained model to [default: <MODEL_DIR>/<variant specific name>]
    #[arg(long)]
    model: Option<PathBuf>,

    /// The directory to write the trained model to when --model is not given
    #[arg(long, default_value = "saved_model")]
    model_dir: PathBuf,

    /// Train a structured perceptron decoded with the Viterbi algorithm
    #[arg(long)]
    structured: bool,

    /// Save averaged weights
    #[arg(long)]
    average: bool,

    /// The number of passes over the corpus
    #[arg(long, default_value_t = DEFAULT_EPOCHS)]
    epochs: usize,

    /// Sort a newly built vocabulary so that feature ids do not depend on the corpus order
    #[arg(long)]
    sort_vocab: bool,

    /// The compression level for zstd
    #[arg(long, default_value = "19")]
    zstd_level: i32,

    /// The number of workers for zstd (0 means multithreaded will be disabled)
    #[arg(long, default_value = "0")]
    zstd_workers: u32,
}

fn create_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
        _ => Ok(()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let variant = ModelVariant::new(args.structured, args.average);

    info!("Loading dataset {:?} ...", args.corpus);
    let f = BufReader::new(File::open(&args.corpus)?);
    let dataset = if args.vocab.exists() {
        info!("Loading vocabulary {:?} ...", args.vocab);
        let vocab = Vocab::read(BufReader::new(File::open(&args.vocab)?))?;
        let mut dataset = Dataset::with_vocab(vocab);
        dataset.read_corpus(f)?;
        dataset
    } else {
        let dataset = if args.sort_vocab {
            let sentences = f
                .lines()
                .map(|line| line.map(Sentence::from_tokenized))
                .collect::<Result<Vec<_>, _>>()?;
            Dataset::with_sorted_vocab(sentences)
        } else {
            let mut dataset = Dataset::new();
            dataset.read_corpus(f)?;
            dataset
        };
        create_parent_dir(&args.vocab)?;
        let mut wtr = BufWriter::new(File::create(&args.vocab)?);
        dataset.vocab().write(&mut wtr)?;
        wtr.flush()?;
        info!("Vocabulary saved at {:?}", args.vocab);
        dataset
    };
    info!(
        "# of sentences: {}, # of features: {}",
        dataset.len(),
        dataset.vocab().len()
    );

    let model = Trainer::new(variant).epochs(args.epochs).train(&dataset);

    let path = args
        .model
        .unwrap_or_else(|| args.model_dir.join(variant.default_file_name()));
    create_parent_dir(&path)?;
    let mut f = zstd::Encoder::new(File::create(&path)?, args.zstd_level)?;
    f.multithread(args.zstd_workers)?;
    model.write(&mut f)?;
    f.finish()?;
    info!("Model saved at {:?}", path);

    Ok(())
}
