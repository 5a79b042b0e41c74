
// imports
use crate::config::files_handling::{self, PredictionRecord};
use crate::config::{Config, OutputFormat, Params, Task};
use crate::cooccurrence::ContextCounts;
use crate::corpus::Corpus;
use crate::error::Result;
use crate::knn::{accuracy, Knn, Split};
use crate::ppmi::Ppmi;
use crate::reduce::reduce_dimensionality;
use crate::tfidf::DocTerm;
use crate::vocab::Vocabulary;

use ndarray::{Array1, Array2};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

pub struct Pipeline {}

impl Pipeline {

    // runs one task of the configuration:
    // -> context: context vectors, PPMI and rank reduction
    // -> docterm: TF-IDF document vectors and rank reduction
    // -> knn: classification of the test rows of a point matrix
    // -> split: random train/test indicator for a labelled point matrix

    pub fn run(args: &[String]) -> Result<()> {

        info!("entering program...");
        info!("building parameters...");
        let params = Config::new(args)?.get_params();
        info!("{}", params);

        Pipeline::run_task(&params)
    }

    pub fn run_task(params: &Params) -> Result<()> {

        let timer = Instant::now();
        match params.task {
            Task::Context => Pipeline::run_context(params)?,
            Task::DocTerm => Pipeline::run_docterm(params)?,
            Task::Knn => Pipeline::run_knn(params)?,
            Task::Split => Pipeline::run_split(params)?,
        }
        info!("finished {} task, took {} seconds ...", params.task, timer.elapsed().as_secs_f64());
        Ok(())
    }

    fn with_suffix(root: &str, suffix: &str) -> PathBuf {
        PathBuf::from(format!("{}{}", root, suffix))
    }

    fn corpus_path(root: &str) -> PathBuf {
        let plain = Pipeline::with_suffix(root, ".txt");
        let compressed = Pipeline::with_suffix(root, ".txt.gz");
        if !plain.exists() && compressed.exists() {
            compressed
        } else {
            plain
        }
    }

    fn matrix_path(base: &str, format: OutputFormat) -> PathBuf {
        match format {
            OutputFormat::Txt => Pipeline::with_suffix(base, ".vecs"),
            OutputFormat::Npy => Pipeline::with_suffix(base, ".vecs.npy"),
        }
    }

    fn output_base(base: String, debug: bool) -> String {
        if debug { base + ".todebug" } else { base }
    }

    fn save_vectors(base: &str, names_suffix: &str, names: &Vec<String>, points: &Array2<f64>, format: OutputFormat) -> Result<()> {
        let names_path = Pipeline::with_suffix(base, names_suffix);
        let points_path = Pipeline::matrix_path(base, format);
        files_handling::save_output(&names_path, names)?;
        files_handling::save_output(&points_path, points)?;
        info!("saved to {} and {}", names_path.display(), points_path.display());
        Ok(())
    }

    fn load_corpus(params: &Params) -> Result<(Corpus, Vocabulary)> {
        let corpus = Corpus::load(&Pipeline::corpus_path(&params.input_root), params.lowercase)?;
        let vocab = Vocabulary::build(&corpus.token2count, params.threshold);
        Ok((corpus, vocab))
    }

    pub fn run_context(params: &Params) -> Result<()> {

        let (corpus, vocab) = Pipeline::load_corpus(params)?;
        let vectors = ContextCounts::run(&corpus.sequences, params.window, &vocab, params.num_threads)?;

        // with debug the raw counts are written, without PPMI and reduction
        let points = if params.debug {
            vectors.counts
        } else {
            let ppmi = Ppmi::transform(&vectors.counts);
            reduce_dimensionality(&ppmi.values, params.ndims, params.seed)
        };

        let base = Pipeline::output_base(format!("{}.window{}.thresh{}", params.input_root, params.window, params.threshold), params.debug);
        Pipeline::save_vectors(&base, ".labels", &vectors.words, &points, params.output_format)
    }

    pub fn run_docterm(params: &Params) -> Result<()> {

        let (corpus, vocab) = Pipeline::load_corpus(params)?;
        let tfidf = DocTerm::tfidf(&corpus.sequences, &vocab);
        info!("estimated document-term TF-IDF vectors");

        let points = if params.debug {
            tfidf
        } else {
            reduce_dimensionality(&tfidf, params.ndims, params.seed)
        };

        let base = Pipeline::output_base(format!("{}.tfidf.thresh{}", params.input_root, params.threshold), params.debug);
        Pipeline::save_vectors(&base, ".dims", &vocab.words().to_vec(), &points, params.output_format)
    }

    pub fn run_knn(params: &Params) -> Result<()> {

        let root = &params.input_root;
        let points: Array2<f64> = files_handling::read_input(&Pipeline::matrix_path(root, params.output_format))?;
        let cats: Array1<usize> = files_handling::read_input(&Pipeline::with_suffix(root, ".cats"))?;
        let mask: Array1<usize> = files_handling::read_input(&Pipeline::with_suffix(root, ".ttsplit"))?;

        // use the split indicator to separate out train and test data
        let split = Split::from_mask(&points, &cats, &mask)?;
        let knn = Knn::new(params.k)?;
        let predictions = knn.classify(&split.train_points, &split.train_labels, &split.test_points, params.num_threads)?;

        // the report carries the text of each test row when the corpus is available
        let text_path = Pipeline::with_suffix(root, ".txt");
        let text = if text_path.exists() {
            fs::read_to_string(&text_path)?
        } else {
            warn!("{} not found, predictions are written without text", text_path.display());
            String::new()
        };
        let lines: Vec<&str> = text.lines().collect();

        let records: Vec<PredictionRecord> = split.test_rows.iter().enumerate().map(|(i, row)| {
            PredictionRecord {
                actual: split.test_labels[i],
                predicted: predictions[i],
                text: lines.get(*row).copied().unwrap_or(""),
            }
        }).collect();

        let out = Pipeline::with_suffix(root, ".predictions");
        files_handling::save_predictions(&out, &records)?;
        info!("stored predictions in {} for {} test points", out.display(), records.len());
        info!("accuracy: {:.2}%", accuracy(&split.test_labels, &predictions));
        Ok(())
    }

    pub fn run_split(params: &Params) -> Result<()> {

        let root = &params.input_root;
        let cats: Array1<usize> = files_handling::read_input(&Pipeline::with_suffix(root, ".cats"))?;
        let mask = Split::random_mask(cats.len(), params.test_fraction, params.seed);

        let out = Pipeline::with_suffix(root, ".ttsplit");
        files_handling::save_output(&out, &mask)?;
        info!("marked {} of {} rows as test in {}", mask.sum(), mask.len(), out.display());
        Ok(())
    }

}
