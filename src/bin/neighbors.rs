use ndarray::Array2;
use std::{env, error::Error, fs::File, io::{self, BufRead}, path::Path};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
extern crate vsm_text;
use vsm_text::{files_handling, Similarity};


// inspects vectors written by the context or docterm tasks: for each query word,
// print the k rows most similar to it by cosine similarity.
// treated as binary executable so it can be ran independently from main

fn main() -> Result<(), Box<dyn Error>> {

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing::subscriber::set_global_default(FmtSubscriber::builder().with_env_filter(filter).finish())?;

    // arguments to this executable should be:
    // path to vectors (.vecs or .vecs.npy)
    // path to the row names (.labels or .dims)
    // path to a file with one query word per line
    // optionally k, 10 by default
    // example: ... data/corpus.window2.thresh5.vecs data/corpus.window2.thresh5.labels queries.txt 5
    let args: Vec<String> = env::args().collect();
    if args.len() != 4 && args.len() != 5 {
        return Err("usage: neighbors <vecs> <labels> <queries> [k]".into());
    }
    let k = match args.get(4) {
        Some(k) => k.parse::<usize>()?,
        None => 10
    };

    // read in vectors and their names
    let w: Array2<f64> = files_handling::read_input(Path::new(&args[1]))?;
    let words: Vec<String> = files_handling::read_input(Path::new(&args[2]))?;
    let sim_obj = Similarity::new(w, words)?;

    // one token per line
    let lines = io::BufReader::new(File::open(&args[3])?).lines();
    let inputs = lines.collect::<Result<Vec<String>, io::Error>>()?;

    run_similarity(&inputs, k, &sim_obj);
    Ok(())
}

fn run_similarity(inputs: &[String], k: usize, similarity_object: &Similarity) {

    for token in inputs.iter().map(|line| line.trim()).filter(|token| !token.is_empty()) {

        let vec = match similarity_object.extract_vec_from_word(token) {
            Ok(vec) => vec,
            Err(e) => {
                warn!("skipping: {}", e);
                continue
            }
        };

        info!("searching {} most similar words to {}", k, token);
        for (i, (similar_token, score)) in similarity_object.find_k_most_similar(&vec, k).iter().enumerate() {
            println!("{} : {} ? {} = {:.4}", i, token, similar_token, score);
        }
        println!();
    }
}
