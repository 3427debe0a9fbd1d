use std::fs::File;
use std::io::{prelude::*, stdin, BufReader};
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zhseg::{BoundaryType, Model, Predictor, Sentence, Vocab};

#[derive(Clone, Copy, Debug)]
enum EvaluationMetric {
    CharBoundaryAccuracy,
    WordAccuracy,
}

impl FromStr for EvaluationMetric {
    type Err = &'static str;
    fn from_str(metric: &str) -> Result<Self, Self::Err> {
        match metric {
            "char" => Ok(Self::CharBoundaryAccuracy),
            "word" => Ok(Self::WordAccuracy),
            _ => Err("Could not parse a metric value"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "evaluate",
    about = "A program to evaluate the accuracy of zhseg. A tokenized corpus is read from stdin."
)]
struct Args {
    /// The model file to use when analyzing text
    #[arg(long)]
    model: PathBuf,

    /// The vocabulary file the model was trained with
    #[arg(long, default_value = "result/vocab.txt")]
    vocab: PathBuf,

    /// Evaluation metric: {char, word}.
    /// char: evaluates the label of each character.
    /// word: evaluates each word using Nagata's method.
    #[arg(long, default_value = "char")]
    metric: EvaluationMetric,
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

    info!("Start tokenization");

    let mut results = vec![];
    for line in stdin().lock().lines() {
        let s = Sentence::from_tokenized(line?);
        if s.is_empty() {
            continue;
        }
        let reference = s.boundaries().to_vec();
        let s = predictor.predict(s);
        results.push((reference, s.boundaries().to_vec()));
    }

    match args.metric {
        EvaluationMetric::CharBoundaryAccuracy => {
            let mut n_tp = 0;
            let mut n_tn = 0;
            let mut n_fp = 0;
            let mut n_fn = 0;
            for (rs, hs) in results {
                for (r, h) in rs.into_iter().zip(hs) {
                    if r == h {
                        if h == BoundaryType::WordBoundary {
                            n_tp += 1;
                        } else {
                            n_tn += 1;
                        }
                    } else if h == BoundaryType::WordBoundary {
                        n_fp += 1;
                    } else {
                        n_fn += 1;
                    }
                }
            }
            let precision = n_tp as f64 / (n_tp + n_fp) as f64;
            let recall = n_tp as f64 / (n_tp + n_fn) as f64;
            let f1 = 2. * precision * recall / (precision + recall);
            println!("Precision: {}", precision);
            println!("Recall: {}", recall);
            println!("F1: {}", f1);
            println!("TP: {}, TN: {}, FP: {}, FN: {}", n_tp, n_tn, n_fp, n_fn);
        }
        EvaluationMetric::WordAccuracy => {
            // Reference:
            // Masaaki Nagata. 1994. A stochastic Japanese morphological analyzer using a forward-DP
            // backward-A* n-best search algorithm. In COLING 1994 Volume 1: The 15th International
            // Conference on Computational Linguistics.
            //
            // Only the labels between characters matter; the end of the sentence always closes a
            // word.
            let mut n_sys = 0;
            let mut n_ref = 0;
            let mut n_cor = 0;
            for (rs, hs) in results {
                let n_inner = rs.len() - 1;
                let mut matched = true;
                for (&r, &h) in rs[..n_inner].iter().zip(&hs[..n_inner]) {
                    if r == h {
                        if h == BoundaryType::WordBoundary {
                            if matched {
                                n_cor += 1;
                            }
                            matched = true;
                            n_ref += 1;
                            n_sys += 1;
                        }
                    } else {
                        if h == BoundaryType::WordBoundary {
                            n_sys += 1;
                        } else {
                            n_ref += 1;
                        }
                        matched = false;
                    }
                }
                if matched {
                    n_cor += 1;
                }
                n_sys += 1;
                n_ref += 1;
            }
            let precision = n_cor as f64 / n_sys as f64;
            let recall = n_cor as f64 / n_ref as f64;
            let f1 = 2. * precision * recall / (precision + recall);
            println!("Precision: {}", precision);
            println!("Recall: {}", recall);
            println!("F1: {}", f1);
        }
    }

    Ok(())
}
