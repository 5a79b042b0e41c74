
use crate::error::{Result, VsmError};
use ndarray::{Array1, Array2};
use ndarray_npy::{read_npy, write_npy};
use std::fs::{self, File};
use std::io::{prelude::*, BufReader, BufWriter};
use std::path::Path;


pub fn read_input<R: ReadFile>(file_path: &Path) -> Result<R> {
    R::read_file(file_path)
}

pub fn save_output<S: SaveFile>(file_path: &Path, item: &S) -> Result<()> {

    // create output folder
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    item.save_file(file_path)
}

pub trait ReadFile: Sized {
    fn read_file(file_path: &Path) -> Result<Self>;
}

pub trait SaveFile {
    fn save_file(&self, file_path: &Path) -> Result<()>;
}

fn is_npy(file_path: &Path) -> bool {
    file_path.extension().map_or(false, |ext| ext == "npy")
}

fn parse_error(file_path: &Path, line: usize, message: String) -> VsmError {
    VsmError::Parse { path: file_path.display().to_string(), line, message }
}

/// Formats a float the way numpy's `%.4e` does, e.g. `1.2346e+00`.
pub fn format_scientific(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_owned();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf".to_owned() } else { "-inf".to_owned() };
    }
    let formatted = format!("{:.4e}", x);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        },
        None => formatted,
    }
}

// word lists: one entry per line
impl SaveFile for Vec<String> {
    fn save_file(&self, file_path: &Path) -> Result<()> {
        let mut f = BufWriter::new(File::create(file_path)?);
        writeln!(f, "{}", self.join("\n"))?;
        f.flush()?;
        Ok(())
    }
}

impl ReadFile for Vec<String> {
    fn read_file(file_path: &Path) -> Result<Self> {
        let f = BufReader::new(File::open(file_path)?);
        let mut items = Vec::new();
        for line in f.lines() {
            let line = line?;
            let item = line.trim();
            if !item.is_empty() {
                items.push(item.to_owned());
            }
        }
        Ok(items)
    }
}

// dense matrices: whitespace-delimited text or npy, decided by extension
impl SaveFile for Array2<f64> {
    fn save_file(&self, file_path: &Path) -> Result<()> {

        if is_npy(file_path) {
            write_npy(file_path, self)?;
            return Ok(())
        }

        let mut f = BufWriter::new(File::create(file_path)?);
        for row in self.rows() {
            let line = row.iter().map(|x| format_scientific(*x)).collect::<Vec<String>>().join(" ");
            writeln!(f, "{}", line)?;
        }
        f.flush()?;
        Ok(())
    }
}

impl ReadFile for Array2<f64> {
    fn read_file(file_path: &Path) -> Result<Self> {

        if is_npy(file_path) {
            return Ok(read_npy(file_path)?)
        }

        let f = BufReader::new(File::open(file_path)?);
        let mut values: Vec<f64> = Vec::new();
        let mut n_rows = 0;
        let mut n_cols: Option<usize> = None;

        // every line is a row, a blank line is a row of width zero
        for (line_i, line) in f.lines().enumerate() {
            let line = line?;
            let mut width = 0;
            for field in line.split_whitespace() {
                let value: f64 = field
                    .parse()
                    .map_err(|_| parse_error(file_path, line_i + 1, format!("'{}' is not a number", field)))?;
                values.push(value);
                width += 1;
            }
            match n_cols {
                Some(expected) if expected != width => {
                    return Err(VsmError::shape(
                        &format!("row {} of {}", line_i + 1, file_path.display()),
                        format!("{} columns", expected),
                        format!("{} columns", width),
                    ))
                },
                Some(_) => (),
                None => n_cols = Some(width),
            }
            n_rows += 1;
        }

        let n_cols = n_cols.unwrap_or(0);
        Array2::from_shape_vec((n_rows, n_cols), values)
            .map_err(|e| VsmError::shape(&file_path.display().to_string(), format!("{}x{}", n_rows, n_cols), e))
    }
}

// integer arrays (categories, train/test indicators): one value per line
impl SaveFile for Array1<usize> {
    fn save_file(&self, file_path: &Path) -> Result<()> {
        let mut f = BufWriter::new(File::create(file_path)?);
        for value in self {
            writeln!(f, "{}", value)?;
        }
        f.flush()?;
        Ok(())
    }
}

impl ReadFile for Array1<usize> {
    fn read_file(file_path: &Path) -> Result<Self> {
        let f = BufReader::new(File::open(file_path)?);
        let mut values = Vec::new();
        for (line_i, line) in f.lines().enumerate() {
            let line = line?;
            let field = line.trim();
            if field.is_empty() {
                continue;
            }
            // accept numpy's float rendering of integers as well, e.g. `1.0000e+00`
            let value = match field.parse::<usize>() {
                Ok(value) => value,
                Err(_) => match field.parse::<f64>() {
                    Ok(x) if x >= 0.0 && x.fract() == 0.0 && x < usize::MAX as f64 => x as usize,
                    _ => return Err(parse_error(file_path, line_i + 1, format!("'{}' is not a nonnegative integer", field))),
                },
            };
            values.push(value);
        }
        Ok(Array1::from_vec(values))
    }
}

/// One line of the predictions report.
pub struct PredictionRecord<'a> {
    pub actual: usize,
    pub predicted: usize,
    pub text: &'a str,
}

pub fn save_predictions(file_path: &Path, records: &[PredictionRecord]) -> Result<()> {

    let mut wrt = csv::WriterBuilder::new().from_path(file_path)?;
    wrt.write_record(["ACTUAL", "PREDICTED", "CORRECT?", "TEXT"])?;

    for record in records {
        let correct = if record.actual == record.predicted { "CORRECT" } else { "WRONG" };
        wrt.write_record([
            record.actual.to_string().as_str(),
            record.predicted.to_string().as_str(),
            correct,
            record.text,
        ])?;
    }
    wrt.flush()?;
    Ok(())
}
