use anyhow::{anyhow, bail, Result};
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    pub name: String,
    pub seq: Vec<u8>,
    /// Empty for two-line (Simple-FASTQ) records
    pub qual: Vec<u8>,
}

/// FASTQ reader accepting both four-line records and two-line Simple-FASTQ
/// records (`@name` + sequence, no `+`/quality lines). Sequences are kept as given.
/// Wrapped sequence lines are not supported.
pub struct FastqReader<R: BufRead> {
    reader: R,
    line: String,
    pending_header: Option<String>,
    record_no: usize,
}

impl<R: BufRead> FastqReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line: String::new(), pending_header: None, record_no: 0 }
    }

    fn read_line(&mut self) -> Result<Option<&str>> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }
        Ok(Some(self.line.trim_end_matches(['\n', '\r'])))
    }

    fn expect_line(&mut self, what: &str) -> Result<String> {
        let no = self.record_no;
        self.read_line()?
            .map(str::to_string)
            .ok_or_else(|| anyhow!("FASTQ record {}: unexpected EOF before {}", no, what))
    }

    pub fn next_record(&mut self) -> Result<Option<FastqRecord>> {
        let header = match self.pending_header.take() {
            Some(h) => h,
            // skip blank lines between records
            None => loop {
                match self.read_line()? {
                    None => return Ok(None),
                    Some(l) if l.trim().is_empty() => continue,
                    Some(h) => break h.to_string(),
                }
            },
        };
        self.record_no += 1;
        let Some(header) = header.strip_prefix('@') else {
            bail!("FASTQ record {}: header not starting with '@'", self.record_no);
        };
        let name = header.split_whitespace().next().unwrap_or("").to_string();
        let seq = self.expect_line("sequence")?.trim().as_bytes().to_vec();

        // the '+' separator is optional: a header or EOF ends a two-line record
        let plus = loop {
            match self.read_line()? {
                None => return Ok(Some(FastqRecord { name, seq, qual: Vec::new() })),
                Some(l) if l.trim().is_empty() => continue,
                Some(l) if l.starts_with('@') => {
                    self.pending_header = Some(l.to_string());
                    return Ok(Some(FastqRecord { name, seq, qual: Vec::new() }));
                }
                Some(l) => break l.starts_with('+'),
            }
        };
        if !plus {
            bail!("FASTQ record {}: expected '+' line or next '@' header", self.record_no);
        }
        let qual = self.expect_line("quality line")?.trim().as_bytes().to_vec();
        if qual.len() != seq.len() {
            bail!(
                "FASTQ record {} ({}): sequence length {} != quality length {}",
                self.record_no,
                name,
                seq.len(),
                qual.len()
            );
        }
        Ok(Some(FastqRecord { name, seq, qual }))
    }
}

impl<R: BufRead> Iterator for FastqReader<R> {
    type Item = Result<FastqRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parse_two_records() {
        let data = b"@r1 extra\nacgt\n+\nIIII\n\n@r2\nTT\n+r2\n##\n";
        let records: Vec<FastqRecord> = FastqReader::new(Cursor::new(&data[..]))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "r1");
        assert_eq!(records[0].seq, b"acgt");
        assert_eq!(records[1].qual, b"##");
    }

    #[test]
    fn parse_two_line_records() {
        let data = b"@read1\niss\n@read2\n\n@read3\nmis\n";
        let records: Vec<FastqRecord> = FastqReader::new(Cursor::new(&data[..]))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "read1");
        assert_eq!(records[0].seq, b"iss");
        assert!(records[0].qual.is_empty());
        assert!(records[1].seq.is_empty());
        assert_eq!(records[2].seq, b"mis");
    }

    #[test]
    fn rejects_garbage_after_sequence() {
        let data = b"@r1\nACGT\nACGT\n";
        let mut r = FastqReader::new(Cursor::new(&data[..]));
        assert!(r.next_record().is_err());
    }

    #[test]
    fn rejects_bad_header() {
        let data = b">r1\nACGT\n+\nIIII\n";
        let mut r = FastqReader::new(Cursor::new(&data[..]));
        assert!(r.next_record().is_err());
    }

    #[test]
    fn rejects_length_mismatch() {
        let data = b"@r1\nACGT\n+\nIII\n";
        let mut r = FastqReader::new(Cursor::new(&data[..]));
        let err = r.next_record().unwrap_err();
        assert!(err.to_string().contains("quality length"));
    }

    #[test]
    fn rejects_missing_quality_line() {
        let data = b"@r1\nACGT\n+\n";
        let mut r = FastqReader::new(Cursor::new(&data[..]));
        assert!(r.next_record().is_err());
    }
}
