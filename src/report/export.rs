//! Exportación de reportes en JSON, CSV, TXT o Excel.

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::fs;
use std::path::Path;
use tracing::info;

use super::FileReport;
use crate::error::ExportError;
use crate::formatting::{format_local, format_size};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExportFormat {
    Json,
    Csv,
    Txt,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Txt => "txt",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Csv => "CSV",
            ExportFormat::Txt => "TXT",
            ExportFormat::Xlsx => "Excel",
        }
    }
}

pub fn parse_export_format(input: &str) -> Result<ExportFormat, ExportError> {
    match input.trim().to_lowercase().as_str() {
        "json" => Ok(ExportFormat::Json),
        "csv" => Ok(ExportFormat::Csv),
        "txt" | "text" | "texto" => Ok(ExportFormat::Txt),
        "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
        other => Err(ExportError::UnknownFormat(other.to_string())),
    }
}

pub fn export_reports(
    reports: &[FileReport],
    format: ExportFormat,
    path: &Path,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Json => export_json(reports, path)?,
        ExportFormat::Csv => export_csv(reports, path)?,
        ExportFormat::Txt => export_txt(reports, path)?,
        ExportFormat::Xlsx => export_xlsx(reports, path)?,
    }
    info!(
        format = format.label(),
        reports = reports.len(),
        path = %path.display(),
        "reporte exportado"
    );
    Ok(())
}

fn export_json(reports: &[FileReport], path: &Path) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(reports)?;
    fs::write(path, json)?;
    Ok(())
}

const CSV_HEADER: [&str; 8] = [
    "archivo",
    "tipo_mime",
    "puntuacion",
    "nivel",
    "clave",
    "valor",
    "categoria",
    "riesgo_entrada",
];

fn export_csv(reports: &[FileReport], path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CSV_HEADER)?;

    for row in collect_rows(reports) {
        writer.write_record([
            row.file.as_str(),
            row.mime.as_str(),
            row.score.as_str(),
            row.level.as_str(),
            row.key.as_str(),
            row.value.as_str(),
            row.category.as_str(),
            row.entry_level.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn export_txt(reports: &[FileReport], path: &Path) -> Result<(), ExportError> {
    let mut output = String::new();
    output.push_str("Reporte de riesgo de metadata\n");
    output.push_str("=============================\n\n");

    for report in reports {
        append_txt_section(&mut output, report);
    }

    fs::write(path, output)?;
    Ok(())
}

fn append_txt_section(output: &mut String, report: &FileReport) {
    let title = &report.file.name;
    let analysis = &report.analysis;
    output.push_str(title);
    output.push('\n');
    output.push_str(&"-".repeat(title.chars().count()));
    output.push('\n');

    output.push_str(&format!("Tipo: {}\n", report.file.mime));
    output.push_str(&format!("Tamaño: {}\n", format_size(report.file.size)));
    output.push_str(&format!("SHA-256: {}\n", report.file.sha256));
    output.push_str(&format!("Analizado: {}\n", format_local(&report.analyzed_at)));
    output.push_str(&format!(
        "Riesgo: {}/100 ({})\n",
        analysis.score(),
        analysis.level().label()
    ));
    output.push_str(&format!(
        "Recomendación: {}\n",
        analysis.assessment.recommendation
    ));

    if let Some(platform) = &analysis.platform_risk {
        output.push_str(&format!(
            "Riesgo para {}: {}/100 ({})\n",
            platform.platform,
            platform.score(),
            platform.level().label()
        ));
    }

    if analysis.entries.is_empty() {
        output.push_str("(Sin metadata)\n\n");
        return;
    }

    output.push_str("Metadata:\n");
    for entry in &analysis.entries {
        output.push_str(&format!(
            "- {}: {} [{} · {}]\n",
            entry.key(),
            entry.value(),
            entry.category().label(),
            entry.risk_level().label()
        ));
    }
    output.push('\n');
}

fn export_xlsx(reports: &[FileReport], path: &Path) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0x1F4E78))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);

    let cell_format = Format::new()
        .set_text_wrap()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Left);

    let level_format = Format::new()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);

    let summary = workbook.add_worksheet();
    summary.set_name("Resumen")?;
    for (col, width) in [(0, 32.0), (1, 40.0), (2, 16.0), (3, 12.0), (4, 14.0), (5, 70.0)] {
        summary.set_column_width(col, width)?;
    }
    write_row(
        summary,
        0,
        &["Archivo", "Tipo", "Tamaño", "Puntuación", "Nivel", "Recomendación"],
        &header_format,
    )?;
    for (index, report) in reports.iter().enumerate() {
        let row = (index + 1) as u32;
        let analysis = &report.analysis;
        summary.write_with_format(row, 0, report.file.name.as_str(), &cell_format)?;
        summary.write_with_format(row, 1, report.file.mime.as_str(), &cell_format)?;
        summary.write_with_format(row, 2, format_size(report.file.size), &cell_format)?;
        summary.write_with_format(row, 3, f64::from(analysis.score()), &level_format)?;
        summary.write_with_format(row, 4, analysis.level().label(), &level_format)?;
        summary.write_with_format(
            row,
            5,
            analysis.assessment.recommendation.as_str(),
            &cell_format,
        )?;
    }

    let details = workbook.add_worksheet();
    details.set_name("Metadata")?;
    for (col, width) in [(0, 32.0), (1, 28.0), (2, 60.0), (3, 20.0), (4, 14.0)] {
        details.set_column_width(col, width)?;
    }
    write_row(
        details,
        0,
        &["Archivo", "Clave", "Valor", "Categoría", "Riesgo"],
        &header_format,
    )?;
    let rows = collect_rows(reports);
    for (index, row) in rows.iter().enumerate() {
        let row_index = (index + 1) as u32;
        write_row(
            details,
            row_index,
            &[
                row.file.as_str(),
                row.key.as_str(),
                row.value.as_str(),
                row.category.as_str(),
            ],
            &cell_format,
        )?;
        details.write_with_format(row_index, 4, row.entry_level.as_str(), &level_format)?;
    }

    workbook.save(path)?;
    Ok(())
}

fn write_row(
    sheet: &mut Worksheet,
    row: u32,
    values: &[&str],
    format: &Format,
) -> Result<(), ExportError> {
    for (col, value) in values.iter().enumerate() {
        sheet.write_with_format(row, col as u16, *value, format)?;
    }
    Ok(())
}

struct ExportRow {
    file: String,
    mime: String,
    score: String,
    level: String,
    key: String,
    value: String,
    category: String,
    entry_level: String,
}

/// Una fila por entrada; los archivos sin metadata aportan una fila sin clave.
fn collect_rows(reports: &[FileReport]) -> Vec<ExportRow> {
    let mut rows = Vec::new();
    for report in reports {
        let analysis = &report.analysis;
        let base = |key: &str, value: &str, category: &str, entry_level: &str| ExportRow {
            file: report.file.name.clone(),
            mime: report.file.mime.clone(),
            score: analysis.score().to_string(),
            level: analysis.level().as_str().to_string(),
            key: key.to_string(),
            value: value.to_string(),
            category: category.to_string(),
            entry_level: entry_level.to_string(),
        };

        if analysis.entries.is_empty() {
            rows.push(base("", "", "", ""));
            continue;
        }
        for entry in &analysis.entries {
            rows.push(base(
                entry.key(),
                entry.value(),
                entry.category().as_str(),
                entry.risk_level().as_str(),
            ));
        }
    }
    rows
}
