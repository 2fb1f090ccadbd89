//! CSV emission: sorted standings → delimited file.
//!
//! The position column does not exist on [`ParticipantRecord`]; it is the
//! 1-based rank in the sorted sequence, materialised only here. Output files
//! are written atomically (temp file + rename) so a failed run never leaves
//! a half-written CSV behind.

use crate::config::ColumnSchema;
use crate::error::Pdf2RaceError;
use crate::output::ParticipantRecord;
use std::io;
use std::path::Path;
use tracing::info;

/// Write the header and one row per record to `writer`.
pub fn write_records<W: io::Write>(
    writer: W,
    records: &[ParticipantRecord],
    schema: ColumnSchema,
) -> csv::Result<()> {
    let mut w = csv::WriterBuilder::new().from_writer(writer);
    w.write_record(schema.header_row())?;
    for (idx, rec) in records.iter().enumerate() {
        w.write_record(row(idx + 1, rec, schema))?;
    }
    w.flush()?;
    Ok(())
}

/// Write the standings CSV to `path` atomically.
pub fn write_csv_file(
    path: &Path,
    records: &[ParticipantRecord],
    schema: ColumnSchema,
) -> Result<(), Pdf2RaceError> {
    let wrap = |source: io::Error| Pdf2RaceError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(wrap)?;
        }
    }

    let tmp_path = path.with_extension("csv.tmp");
    let file = std::fs::File::create(&tmp_path).map_err(wrap)?;
    write_records(io::BufWriter::new(file), records, schema).map_err(|e| match e.into_kind() {
        csv::ErrorKind::Io(source) => wrap(source),
        other => Pdf2RaceError::Internal(format!("CSV serialisation failed: {other:?}")),
    })?;
    std::fs::rename(&tmp_path, path).map_err(wrap)?;

    info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

/// One CSV row: `[position] + record fields in declared order`, minus the sex
/// column for the legacy schema.
fn row(position: usize, rec: &ParticipantRecord, schema: ColumnSchema) -> Vec<String> {
    let mut cells = Vec::with_capacity(schema.header_row().len());
    cells.push(position.to_string());
    for (i, field) in rec.fields().iter().enumerate() {
        // fields()[3] is sex, absent from the legacy column set.
        if schema == ColumnSchema::Legacy && i == 3 {
            continue;
        }
        cells.push((*field).to_string());
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<ParticipantRecord> {
        vec![
            ParticipantRecord {
                bib_number: "101".into(),
                athlete_name: "Smith".into(),
                birth_year: "1990".into(),
                sex: "M".into(),
                team: "TeamX".into(),
                nationality: "USA".into(),
                finish_time: "00:45:12".into(),
            },
            ParticipantRecord {
                bib_number: "102".into(),
                athlete_name: "Jones, Jr.".into(),
                birth_year: "null".into(),
                sex: "".into(),
                team: "".into(),
                nationality: "GBR".into(),
                finish_time: "00:50:00".into(),
            },
        ]
    }

    #[test]
    fn round_trip_preserves_records_and_positions() {
        let records = sample_records();
        let mut buf = Vec::new();
        write_records(&mut buf, &records, ColumnSchema::Modern).unwrap();

        let mut reader = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        assert_eq!(
            reader.headers().unwrap(),
            &csv::StringRecord::from(ColumnSchema::Modern.header_row().to_vec())
        );

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(&row[0], (i + 1).to_string().as_str(), "pos is 1-based rank");
            assert_eq!(row.len(), 8);
            let rec = &records[i];
            assert_eq!(&row[1], rec.bib_number.as_str());
            assert_eq!(&row[2], rec.athlete_name.as_str());
            assert_eq!(&row[3], rec.birth_year.as_str());
            assert_eq!(&row[4], rec.sex.as_str());
            assert_eq!(&row[5], rec.team.as_str());
            assert_eq!(&row[6], rec.nationality.as_str());
            assert_eq!(&row[7], rec.finish_time.as_str());
        }
    }

    #[test]
    fn comma_in_name_survives_quoting() {
        let records = sample_records();
        let mut buf = Vec::new();
        write_records(&mut buf, &records, ColumnSchema::Modern).unwrap();
        let mut reader = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let rows: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(&rows[1][2], "Jones, Jr.");
    }

    #[test]
    fn legacy_schema_drops_sex_column() {
        let records = sample_records();
        let mut buf = Vec::new();
        write_records(&mut buf, &records, ColumnSchema::Legacy).unwrap();

        let mut reader = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        assert_eq!(reader.headers().unwrap().len(), 7);
        let first = reader.records().next().unwrap().unwrap();
        assert_eq!(first.len(), 7);
        // bib, athlete, year, then team directly — no "M".
        assert_eq!(&first[1], "101");
        assert_eq!(&first[3], "1990");
        assert_eq!(&first[4], "TeamX");
    }

    #[test]
    fn file_write_is_atomic_and_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("results_sorted.csv");
        write_csv_file(&path, &sample_records(), ColumnSchema::Modern).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("csv.tmp").exists());
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("pos,pett,athlete,year,sex,team,nat,time\n"));
    }
}
