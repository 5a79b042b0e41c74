
pub mod files_handling;

use crate::error::{Result, VsmError};
use serde_json::Value;
use std::{fmt::Display, fs::File, io::BufReader, str::FromStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    Context,
    DocTerm,
    Knn,
    Split,
}

impl FromStr for Task {
    type Err = VsmError;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "context" => Ok(Task::Context),
            "docterm" => Ok(Task::DocTerm),
            "knn" => Ok(Task::Knn),
            "split" => Ok(Task::Split),
            _ => Err(VsmError::Configuration(format!("unrecognized task {}", s))),
        }
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Task::Context => "context",
            Task::DocTerm => "docterm",
            Task::Knn => "knn",
            Task::Split => "split",
        };
        write!(f, "{}", name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Txt,
    Npy,
}

impl FromStr for OutputFormat {
    type Err = VsmError;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "txt" => Ok(OutputFormat::Txt),
            "npy" => Ok(OutputFormat::Npy),
            _ => Err(VsmError::Configuration(format!("unrecognized output_format {}", s))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Params {
    pub task: Task,
    pub input_root: String,
    pub window: usize,
    pub threshold: usize,
    pub ndims: usize,
    pub debug: bool,
    pub lowercase: bool,
    pub num_threads: usize,
    pub output_format: OutputFormat,
    pub k: usize,
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            task: Task::Context,
            input_root: String::new(),
            window: 2,
            threshold: 1,
            ndims: 100,
            debug: false,
            lowercase: false,
            num_threads: 1,
            output_format: OutputFormat::Txt,
            k: 1,
            test_fraction: 0.2,
            seed: 0,
        }
    }
}

impl Display for Params {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "using params:
        task: {}
        input_root: {}
        window: {}
        threshold: {}
        ndims: {}
        debug: {}
        lowercase: {}
        num_threads: {}
        output_format: {:?}
        k: {}
        test_fraction: {}
        seed: {}",
        self.task, self.input_root, self.window, self.threshold, self.ndims, self.debug,
        self.lowercase, self.num_threads, self.output_format, self.k, self.test_fraction, self.seed)
    }
}

pub struct Config {
    params: Params
}

impl Config {

    pub fn get_params(&self) -> Params {
        self.params.clone()
    }

    pub fn new(args: &[String]) -> Result<Config> {

        if args.len() != 2 {
            return Err(VsmError::Configuration("input should be a path to json file only".to_owned()));
        }

        let f = BufReader::new(File::open(&args[1])?);
        let json: Value = serde_json::from_reader(f)?;
        Config::from_json(&json)
    }

    pub fn from_json(json: &Value) -> Result<Config> {

        let defaults = Params::default();

        // required fields
        let task: Task = required_str(json, "task")?.parse()?;
        let input_root = required_str(json, "input_root")?.to_owned();

        // handle default vs input parameters, negative numbers are rejected here
        let window = optional_count(json, "window", defaults.window, 0)?;
        let threshold = optional_count(json, "threshold", defaults.threshold, 0)?;
        let ndims = optional_count(json, "ndims", defaults.ndims, 1)?;
        let num_threads = optional_count(json, "num_threads", defaults.num_threads, 1)?;
        let k = optional_count(json, "k", defaults.k, 1)?;
        let seed = optional_count(json, "seed", defaults.seed as usize, 0)? as u64;
        let debug = optional_bool(json, "debug", defaults.debug)?;
        let lowercase = optional_bool(json, "lowercase", defaults.lowercase)?;

        let output_format = match json.get("output_format") {
            Some(value) => value
                .as_str()
                .ok_or_else(|| not_a("output_format", "string"))?
                .parse()?,
            None => defaults.output_format,
        };

        let test_fraction = match json.get("test_fraction") {
            Some(value) => value.as_f64().ok_or_else(|| not_a("test_fraction", "number"))?,
            None => defaults.test_fraction,
        };
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(VsmError::Configuration(format!(
                "test_fraction must lie strictly between 0 and 1, got {}",
                test_fraction
            )));
        }

        let params = Params {
            task,
            input_root,
            window,
            threshold,
            ndims,
            debug,
            lowercase,
            num_threads,
            output_format,
            k,
            test_fraction,
            seed,
        };

        Ok(Self { params })
    }

}

fn not_a(field: &str, kind: &str) -> VsmError {
    VsmError::Configuration(format!("given {} is not a {}", field, kind))
}

fn required_str<'a>(json: &'a Value, field: &str) -> Result<&'a str> {
    json.get(field)
        .ok_or_else(|| VsmError::Configuration(format!("{} was not supplied through json", field)))?
        .as_str()
        .ok_or_else(|| not_a(field, "string"))
}

fn optional_count(json: &Value, field: &str, default: usize, min: i64) -> Result<usize> {
    let value = match json.get(field) {
        Some(value) => value.as_i64().ok_or_else(|| not_a(field, "integer"))?,
        None => return Ok(default),
    };
    if value < min {
        return Err(VsmError::Configuration(format!(
            "{} must be at least {}, got {}",
            field, min, value
        )));
    }
    Ok(value as usize)
}

fn optional_bool(json: &Value, field: &str, default: bool) -> Result<bool> {
    match json.get(field) {
        Some(value) => value.as_bool().ok_or_else(|| not_a(field, "boolean")),
        None => Ok(default),
    }
}


#[cfg(test)]
mod tests {

    use super::{Config, OutputFormat, Task};
    use crate::error::VsmError;
    use serde_json::json;

    #[test]
    fn defaults_test() {
        let json = json!({"task": "context", "input_root": "data/corpus"});
        let params = Config::from_json(&json).unwrap().get_params();
        assert_eq!(params.task, Task::Context);
        assert_eq!(params.input_root, "data/corpus");
        assert_eq!(params.window, 2);
        assert_eq!(params.threshold, 1);
        assert_eq!(params.ndims, 100);
        assert_eq!(params.output_format, OutputFormat::Txt);
        assert!(!params.debug);
    }

    #[test]
    fn overrides_test() {
        let json = json!({
            "task": "knn", "input_root": "x", "k": 5, "num_threads": 4,
            "output_format": "npy", "debug": true, "test_fraction": 0.5, "seed": 7
        });
        let params = Config::from_json(&json).unwrap().get_params();
        assert_eq!(params.task, Task::Knn);
        assert_eq!(params.k, 5);
        assert_eq!(params.num_threads, 4);
        assert_eq!(params.output_format, OutputFormat::Npy);
        assert!(params.debug);
        assert_eq!(params.seed, 7);
    }

    #[test]
    fn rejects_invalid_values_test() {
        let invalid = [
            json!({"task": "context", "input_root": "x", "threshold": -1}),
            json!({"task": "context", "input_root": "x", "window": -2}),
            json!({"task": "knn", "input_root": "x", "k": 0}),
            json!({"task": "knn", "input_root": "x", "k": "three"}),
            json!({"task": "unknown", "input_root": "x"}),
            json!({"task": "split", "input_root": "x", "test_fraction": 1.0}),
            json!({"input_root": "x"}),
        ];
        for json in invalid {
            match Config::from_json(&json) {
                Err(VsmError::Configuration(_)) => (),
                Err(e) => panic!("unexpected error {} for {}", e, json),
                Ok(_) => panic!("accepted invalid configuration {}", json),
            }
        }
    }

    #[test]
    fn wrong_number_of_arguments_test() {
        let args = vec!["prog".to_string()];
        assert!(matches!(Config::new(&args), Err(VsmError::Configuration(_))));
    }
}
