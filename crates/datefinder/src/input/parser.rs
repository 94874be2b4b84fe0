//! CSV/TSV sampler with delimiter detection.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use log::debug;

use super::source::SampleTable;
use crate::error::{DateFinderError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Sampler configuration.
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum data rows to read.
    pub max_rows: usize,
    /// Quote character.
    pub quote: u8,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: 100,
            quote: b'"',
        }
    }
}

/// Reads the head of a delimited file into a [`SampleTable`].
pub struct Sampler {
    config: SamplerConfig,
}

impl Sampler {
    /// Create a sampler with default configuration.
    pub fn new() -> Self {
        Self {
            config: SamplerConfig::default(),
        }
    }

    /// Create a sampler with custom configuration.
    pub fn with_config(config: SamplerConfig) -> Self {
        Self { config }
    }

    /// Sample the first rows of a file.
    pub fn sample_file(&self, path: impl AsRef<Path>) -> Result<SampleTable> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| DateFinderError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| DateFinderError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        self.sample_bytes(&contents)
    }

    /// Sample rows from in-memory bytes.
    pub fn sample_bytes(&self, bytes: &[u8]) -> Result<SampleTable> {
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes)?,
        };
        debug!("Sampling with delimiter {:?}", delimiter as char);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers = if self.config.has_header {
            let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
            if headers.is_empty() {
                return Err(DateFinderError::EmptyData("No columns found".to_string()));
            }
            Some(headers)
        } else {
            None
        };

        // Rows keep their own length; the detector treats missing cells as blank.
        let mut rows = Vec::new();
        for result in reader.records().take(self.config.max_rows) {
            let record = result?;
            rows.push(record.iter().map(|s| s.to_string()).collect::<Vec<_>>());
        }

        if rows.is_empty() {
            return Err(DateFinderError::EmptyData("No data rows found".to_string()));
        }

        Ok(SampleTable { headers, rows })
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(DateFinderError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        // Consistent counts across lines beat a higher but erratic count.
        // Tabs get a small bonus since they rarely occur inside values.
        let consistent = counts.iter().all(|&c| c == first_count);
        let score = if consistent {
            first_count * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_quoted_commas_do_not_count() {
        assert_eq!(count_delimiter_in_line("\"a,b\",c", b','), 1);
    }

    #[test]
    fn test_sample_respects_max_rows() {
        let sampler = Sampler::with_config(SamplerConfig {
            max_rows: 2,
            ..SamplerConfig::default()
        });
        let data = b"when,what\n2024-01-01,a\n2024-01-02,b\n2024-01-03,c";
        let table = sampler.sample_bytes(data).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.header(0), Some("when"));
        assert_eq!(table.cell(1, 0), Some("2024-01-02"));
    }

    #[test]
    fn test_sample_without_header() {
        let sampler = Sampler::with_config(SamplerConfig {
            has_header: false,
            ..SamplerConfig::default()
        });
        let table = sampler.sample_bytes(b"08:00;x\n09:00;y").unwrap();

        assert!(table.headers.is_none());
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, 0), Some("08:00"));
    }

    #[test]
    fn test_short_rows_are_kept_ragged() {
        let table = Sampler::new().sample_bytes(b"a,b,c\n1,2\n3,4,5").unwrap();

        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(table.cell(0, 2), None);
    }

    #[test]
    fn test_header_only_is_empty_data() {
        let err = Sampler::new().sample_bytes(b"a,b\n").unwrap_err();
        assert!(matches!(err, DateFinderError::EmptyData(_)));
    }
}
