use std::fs::File;
use std::path::Path;
use tempfile::tempdir;
use zip::ZipArchive;

use super::*;
use crate::analysis::AnalysisPipeline;
use crate::error::ExportError;
use crate::extraction::{FileKind, MIME_DOCX};
use crate::test_support::{TestResult, jpeg_with_exif, sample_docx};

fn sample_reports() -> TestResult<Vec<FileReport>> {
    let pipeline = AnalysisPipeline::default();
    Ok(vec![
        FileReport::analyze(Path::new("informe.docx"), &sample_docx()?, &pipeline, None),
        FileReport::analyze(
            Path::new("fotos/playa.jpg"),
            &jpeg_with_exif()?,
            &pipeline,
            Some("instagram"),
        ),
        FileReport::analyze(Path::new("nota.txt"), b"solo texto", &pipeline, None),
    ])
}

#[test]
fn file_report_describes_the_analyzed_file() -> TestResult {
    let reports = sample_reports()?;

    let docx = &reports[0];
    assert_eq!(docx.file.name, "informe.docx");
    assert_eq!(docx.file.mime, MIME_DOCX);
    assert_eq!(docx.file.kind, FileKind::Office);
    assert!(docx.analysis.has_author_info);

    let photo = &reports[1];
    assert_eq!(photo.file.name, "playa.jpg");
    assert_eq!(photo.path, Path::new("fotos/playa.jpg"));
    assert!(photo.analysis.platform_risk.is_some());

    let note = &reports[2];
    assert_eq!(note.file.kind, FileKind::Unsupported);
    assert!(note.analysis.entries.is_empty());
    Ok(())
}

#[test]
fn json_export_contains_every_report() -> TestResult {
    let reports = sample_reports()?;
    let dir = tempdir()?;
    let path = dir.path().join("reporte.json");

    export_reports(&reports, ExportFormat::Json, &path)?;

    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    let items = value.as_array().ok_or("se esperaba un arreglo")?;
    assert_eq!(items.len(), 3);
    assert_eq!(
        items[1]["analysis"]["assessment"]["score"],
        u64::from(reports[1].analysis.score())
    );
    assert_eq!(items[0]["file"]["kind"], "office");
    Ok(())
}

#[test]
fn csv_export_has_one_row_per_entry() -> TestResult {
    let reports = sample_reports()?;
    let dir = tempdir()?;
    let path = dir.path().join("reporte.csv");

    export_reports(&reports, ExportFormat::Csv, &path)?;

    let mut reader = csv::Reader::from_path(&path)?;
    assert_eq!(reader.headers()?.get(0), Some("archivo"));
    assert_eq!(reader.headers()?.len(), 8);

    let records = reader.records().collect::<Result<Vec<_>, _>>()?;
    let expected = reports[0].analysis.entries.len() + reports[1].analysis.entries.len() + 1;
    assert_eq!(records.len(), expected);

    let last = records.last().ok_or("sin filas")?;
    assert_eq!(last.get(0), Some("nota.txt"));
    assert_eq!(last.get(3), Some("none"));
    assert_eq!(last.get(4), Some(""));

    let gps = records
        .iter()
        .find(|record| record.get(4) == Some("GPSPosition"))
        .ok_or("falta la posición GPS")?;
    assert_eq!(gps.get(6), Some("location"));
    assert_eq!(gps.get(7), Some("critical"));
    Ok(())
}

#[test]
fn txt_export_lists_entries_and_empty_files() -> TestResult {
    let reports = sample_reports()?;
    let dir = tempdir()?;
    let path = dir.path().join("reporte.txt");

    export_reports(&reports, ExportFormat::Txt, &path)?;

    let contents = std::fs::read_to_string(&path)?;
    assert!(contents.starts_with("Reporte de riesgo de metadata"));
    assert!(contents.contains("informe.docx\n------------"));
    assert!(contents.contains("- dc:creator: Autor Prueba [Autoría · Alto]"));
    assert!(contents.contains("Riesgo para instagram:"));
    assert!(contents.contains("(Sin metadata)"));
    Ok(())
}

#[test]
fn xlsx_export_writes_summary_and_detail_sheets() -> TestResult {
    let reports = sample_reports()?;
    let dir = tempdir()?;
    let path = dir.path().join("reporte.xlsx");

    export_reports(&reports, ExportFormat::Xlsx, &path)?;

    let archive = ZipArchive::new(File::open(&path)?)?;
    let names: Vec<&str> = archive.file_names().collect();
    assert!(names.contains(&"xl/worksheets/sheet1.xml"));
    assert!(names.contains(&"xl/worksheets/sheet2.xml"));
    Ok(())
}

#[test]
fn export_formats_are_parsed_case_insensitively() -> TestResult {
    assert_eq!(parse_export_format("JSON")?, ExportFormat::Json);
    assert_eq!(parse_export_format(" csv ")?, ExportFormat::Csv);
    assert_eq!(parse_export_format("texto")?, ExportFormat::Txt);
    assert_eq!(parse_export_format("Excel")?, ExportFormat::Xlsx);
    assert_eq!(ExportFormat::Xlsx.extension(), "xlsx");
    assert!(matches!(
        parse_export_format("pdf"),
        Err(ExportError::UnknownFormat(format)) if format == "pdf"
    ));
    Ok(())
}

#[test]
fn clean_report_measures_the_reduction() {
    let report = CleanReport {
        source: "foto.jpg".into(),
        output: "clean_foto.jpg".into(),
        mime: "image/jpeg".to_string(),
        scope: "toda la metadata".to_string(),
        modified: true,
        before: RiskSnapshot {
            score: 90,
            level: RiskLevel::Critical,
        },
        after: RiskSnapshot {
            score: 0,
            level: RiskLevel::None,
        },
    };
    assert_eq!(report.score_reduction(), 90);
}
