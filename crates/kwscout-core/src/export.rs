//! Saving analyses as JSON or CSV.
//!
//! JSON carries the whole [`AnalysisResult`] including auxiliary signals.
//! CSV has one row per candidate with the columns
//! `keyword,type,count,intent,source`.

use std::io::Write;

use camino::Utf8Path;
use serde::Serialize;

use crate::error::{ExportError, ExportResult};
use crate::model::{AnalysisResult, CandidateKind, Count, Source};

#[derive(Serialize)]
struct CsvRow<'a> {
    keyword: &'a str,
    #[serde(rename = "type")]
    kind: CandidateKind,
    count: Count,
    intent: Option<bool>,
    source: Source,
}

/// Pretty-printed JSON. Non-ASCII text is written as-is.
pub fn to_json_string(result: &AnalysisResult) -> ExportResult<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Write pretty-printed JSON to `path`, replacing any existing file.
#[tracing::instrument(skip(result), fields(keyword = %result.keyword))]
pub fn write_json(result: &AnalysisResult, path: &Utf8Path) -> ExportResult<()> {
    let mut json = to_json_string(result)?;
    json.push('\n');
    std::fs::write(path.as_std_path(), json).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(%path, "analysis saved as JSON");
    Ok(())
}

/// Write candidates as CSV rows, header first.
pub fn write_csv<W: Write>(result: &AnalysisResult, writer: W) -> ExportResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for candidate in &result.candidates {
        csv.serialize(CsvRow {
            keyword: &candidate.text,
            kind: candidate.kind,
            count: candidate.count,
            intent: candidate.intent,
            source: candidate.source,
        })?;
    }
    if result.candidates.is_empty() {
        csv.write_record(["keyword", "type", "count", "intent", "source"])?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write candidates as CSV to `path`, replacing any existing file.
#[tracing::instrument(skip(result), fields(keyword = %result.keyword))]
pub fn write_csv_file(result: &AnalysisResult, path: &Utf8Path) -> ExportResult<()> {
    let file = std::fs::File::create(path.as_std_path()).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(result, std::io::BufWriter::new(file))?;
    tracing::info!(%path, rows = result.candidates.len(), "analysis saved as CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CandidateKeyword;
    use crate::ngram::NgramSize;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn sample() -> AnalysisResult {
        let mut result = AnalysisResult::new("çiçek");
        let mut first = CandidateKeyword::extracted("ucuz çiçek", NgramSize::Bigram, 4);
        first.intent = Some(true);
        result.candidates = vec![first, CandidateKeyword::synonym("buket, gül")];
        result
            .auxiliary
            .insert("competition".into(), serde_json::json!("high"));
        result
    }

    #[test]
    fn csv_has_one_row_per_candidate() {
        let mut out = Vec::new();
        write_csv(&sample(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "keyword,type,count,intent,source\n\
             ucuz çiçek,bigram,4,true,extracted\n\
             \"buket, gül\",synonym,synonym,,synonym\n"
        );
    }

    #[test]
    fn empty_csv_still_has_a_header() {
        let mut out = Vec::new();
        write_csv(&AnalysisResult::new("x"), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "keyword,type,count,intent,source\n");
    }

    #[test]
    fn json_keeps_non_ascii_text() {
        let json = to_json_string(&sample()).unwrap();
        assert!(json.contains("\"keyword\": \"çiçek\""));
        assert!(json.contains("\"count\": \"synonym\""));
        assert!(json.contains("\"competition\": \"high\""));
    }

    #[test]
    fn files_round_trip() {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();

        let json_path = root.join("out.json");
        write_json(&sample(), &json_path).unwrap();
        let loaded: AnalysisResult =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(loaded, sample());

        let csv_path = root.join("out.csv");
        write_csv_file(&sample(), &csv_path).unwrap();
        let text = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        let err = write_json(&sample(), &root.join("nope/out.json")).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
