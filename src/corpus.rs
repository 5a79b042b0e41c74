
// imports
use crate::error::Result;

use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};


/// A tokenized corpus: one token sequence per line, plus the raw frequency of every token.
#[derive(Debug, Default)]
pub struct Corpus {
    pub sequences: Vec<Vec<String>>,
    pub token2count: HashMap<String, usize>,
}

impl Corpus {

    fn read_file(file_path: &Path) -> Result<Box<dyn BufRead>> {

        let f = File::open(file_path)?;
        if file_path.extension().map_or(false, |ext| ext == "gz") {
            Ok(Box::new(BufReader::new(GzDecoder::new(f))))
        } else {
            Ok(Box::new(BufReader::new(f)))
        }
    }

    fn parse_line(line: &str, lowercase: bool) -> String {
        // line is trimmed for leading and trailing spaces, optionally lower cased
        if lowercase {
            line.trim().to_lowercase()
        } else {
            line.trim().to_owned()
        }
    }

    fn accumulate(&mut self, line: &str, lowercase: bool) {

        let sequence = Corpus::parse_line(line, lowercase);
        let split_sequence = Corpus::tokenize(&sequence);

        // accumulate occurrences of words - how many times each token appears in the corpus
        for tok in &split_sequence {
            let val = self.token2count.entry(tok.to_owned()).or_insert(0);
            *val += 1;
        }

        self.sequences.push(split_sequence);
    }

    /// Reads a corpus with one sentence (or document) per line; `.gz` files are decompressed.
    pub fn load(file_path: &Path, lowercase: bool) -> Result<Corpus> {

        let mut corpus = Corpus::default();
        let lines = Corpus::read_file(file_path)?.lines();
        for (li, line) in lines.enumerate() {
            corpus.accumulate(&line?, lowercase);
            if (li + 1) % 2000 == 0 {
                debug!("read {} lines", li + 1);
            }
        }

        info!("read {} lines, {} distinct tokens from {}", corpus.sequences.len(), corpus.token2count.len(), file_path.display());
        Ok(corpus)
    }

    pub fn from_lines<S: AsRef<str>>(lines: &[S], lowercase: bool) -> Corpus {
        let mut corpus = Corpus::default();
        for line in lines {
            corpus.accumulate(line.as_ref(), lowercase);
        }
        corpus
    }

}


// defines the behavior needed for tokenizing a corpus
trait Tokenizer {
    fn tokenize(sequence: &str) -> Vec<String>;
}

impl Tokenizer for Corpus {
    // simple tokenizer by whitespace
    fn tokenize(sequence: &str) -> Vec<String> {
        sequence.split_whitespace().map(|x| x.to_string()).collect()
    }
}
