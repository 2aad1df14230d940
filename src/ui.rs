use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Row, Table};
use console::{StyledObject, style};
use metarisk::analysis::{AnalysisResult, MetadataEntry, PlatformPolicy, RemoveRule, RiskLevel};
use metarisk::batch::{BatchEvent, BatchOutcome};
use metarisk::formatting::{format_local, format_size, score_bar};
use metarisk::report::{CleanReport, FileReport};
use std::path::Path;

const HEADER_WIDTH: usize = 74;

pub fn render_header() {
    let border = "─".repeat(HEADER_WIDTH - 2);
    println!("\n{}", style(format!("┌{}┐", border)).cyan());
    println!(
        "{}",
        style(format!(
            "│ {:^inner_width$} │",
            "▸ MetaRisk · Riesgo de privacidad en metadata ◂",
            inner_width = HEADER_WIDTH - 4
        ))
        .cyan()
        .bold()
    );
    println!("{}\n", style(format!("└{}┘", border)).cyan());
}

pub fn render_intro(current_dir: &Path) {
    println!(
        "{} {}",
        style("Directorio de trabajo:").dim(),
        style(current_dir.display()).cyan()
    );
    println!(
        "{}\n",
        style("Escribe 'ayuda' para ver los comandos o 'salir' para terminar.").dim()
    );
}

pub fn render_help() {
    let mut table = base_table();
    table.set_header(vec![header_cell("Comando"), header_cell("Descripción")]);

    let commands = [
        (
            "analizar <ruta> [plataforma]",
            "Muestra la metadata, su categoría y el riesgo del archivo",
        ),
        (
            "limpiar <ruta> [plataforma]",
            "Guarda una copia clean_<nombre> sin metadata (o sin la que la plataforma considera riesgosa)",
        ),
        (
            "lote <analizar|limpiar> <directorio> [filtro] [plataforma] [-r]",
            "Procesa todos los archivos compatibles; filtros: todos, imagenes, pdf, office",
        ),
        (
            "exportar <json|csv|txt|xlsx> [ruta]",
            "Exporta los últimos análisis",
        ),
        ("plataformas", "Lista las plataformas y qué elimina cada una"),
        ("ayuda", "Muestra esta ayuda"),
        ("salir", "Termina la sesión"),
    ];
    for (command, description) in commands {
        table.add_row(Row::from(vec![
            Cell::new(command).fg(Color::Cyan),
            Cell::new(description).fg(Color::White),
        ]));
    }
    println!("\n{table}\n");
}

pub fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
        .add_attribute(Attribute::Underlined)
}

fn level_color(level: RiskLevel) -> Color {
    match level {
        RiskLevel::Critical => Color::Red,
        RiskLevel::High => Color::DarkYellow,
        RiskLevel::Medium => Color::Yellow,
        RiskLevel::Low => Color::Green,
        RiskLevel::None => Color::DarkGrey,
    }
}

fn styled_level<D>(level: RiskLevel, value: D) -> StyledObject<D> {
    let styled = style(value).bold();
    match level {
        RiskLevel::Critical => styled.red(),
        RiskLevel::High => styled.color256(208),
        RiskLevel::Medium => styled.yellow(),
        RiskLevel::Low => styled.green(),
        RiskLevel::None => styled.dim(),
    }
}

fn print_property(label: &str, value: &str) {
    println!(
        "{} {} {}",
        style(format!("  {}", label)).cyan().bold(),
        style("→").dim(),
        style(value).white()
    );
}

fn yes_no(value: bool) -> &'static str {
    if value { "Sí" } else { "No" }
}

pub fn render_file_report(report: &FileReport) {
    let file = &report.file;
    println!();
    print_property("Archivo", &report.path.display().to_string());
    print_property("Tipo", &format!("{} ({})", file.kind.label(), file.mime));
    print_property("Tamaño", &format_size(file.size));
    print_property("SHA-256", &file.sha256);
    print_property("MD5", &file.md5);
    print_property("Analizado", &format_local(&report.analyzed_at));
    print_property("Tiempo", &format!("{} ms", report.processing_time_ms));

    render_analysis(&report.analysis);
}

fn render_analysis(analysis: &AnalysisResult) {
    let level = analysis.level();
    println!(
        "\n  {} {} {}",
        style("Riesgo").bold(),
        styled_level(level, score_bar(analysis.score())),
        styled_level(level, format!("{}/100 · {}", analysis.score(), level.label()))
    );
    println!("  {}", style(&analysis.assessment.recommendation).italic());
    for tip in level.tips() {
        println!("    {} {}", style("•").dim(), style(tip).dim());
    }

    println!(
        "\n  {} GPS: {} · Cámara/dispositivo: {} · Autoría: {} · Software: {}",
        style("Indicadores").bold(),
        yes_no(analysis.has_gps),
        yes_no(analysis.has_camera_info),
        yes_no(analysis.has_author_info),
        yes_no(analysis.has_software_info)
    );

    if analysis.entries.is_empty() {
        println!(
            "\n{}\n",
            style("  No se encontró metadata embebida.").dim()
        );
        return;
    }

    if !analysis.assessment.factors.is_empty() {
        let mut factors = base_table();
        factors.set_header(vec![
            header_cell("Categoría"),
            header_cell("Severidad"),
            header_cell("Entradas"),
            header_cell("Descripción"),
        ]);
        for factor in &analysis.assessment.factors {
            factors.add_row(Row::from(vec![
                Cell::new(factor.category.label()).fg(Color::White),
                Cell::new(factor.severity.label()).fg(level_color(factor.severity)),
                Cell::new(factor.entries.len()).fg(Color::White),
                Cell::new(&factor.description).fg(Color::White),
            ]));
        }
        println!("\n{factors}");
    }

    println!("\n{}", entries_table(&analysis.entries));

    if let Some(platform) = &analysis.platform_risk {
        println!(
            "\n  {} {} {}",
            style(format!("Para {}:", platform.platform)).bold(),
            styled_level(
                platform.level(),
                format!("{}/100 · {}", platform.score(), platform.level().label())
            ),
            style(format!(
                "({} a eliminar, {} se conservan)",
                platform.risky_entries.len(),
                platform.retained_entries.len()
            ))
            .dim()
        );
        if platform.requested != platform.platform {
            println!(
                "  {}",
                style(format!(
                    "Plataforma `{}` desconocida: se aplican las reglas generales.",
                    platform.requested
                ))
                .yellow()
            );
        }
    }
    println!();
}

fn entries_table(entries: &[MetadataEntry]) -> Table {
    let mut table = base_table();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Clave"),
        header_cell("Valor"),
        header_cell("Categoría"),
        header_cell("Riesgo"),
    ]);
    for (index, entry) in entries.iter().enumerate() {
        table.add_row(Row::from(vec![
            Cell::new(format!("{:>2}", index + 1)).fg(Color::White),
            Cell::new(entry.key()).fg(Color::White),
            Cell::new(entry.value()).fg(Color::White),
            Cell::new(entry.category().label()).fg(Color::Cyan),
            Cell::new(entry.risk_level().label()).fg(level_color(entry.risk_level())),
        ]));
    }
    table
}

pub fn render_clean_report(report: &CleanReport) {
    println!();
    print_property("Original", &report.source.display().to_string());
    print_property("Copia limpia", &report.output.display().to_string());
    print_property("Alcance", &report.scope);
    if !report.modified {
        print_property("Cambios", "El archivo no tenía metadata que eliminar");
    }
    println!(
        "  {} {} {} {} {}",
        style("Riesgo").bold(),
        styled_level(
            report.before.level,
            format!("{} ({})", report.before.score, report.before.level.label())
        ),
        style("→").dim(),
        styled_level(
            report.after.level,
            format!("{} ({})", report.after.score, report.after.level.label())
        ),
        style(format!("· reducción de {} puntos", report.score_reduction())).dim()
    );
    println!();
}

pub fn render_platforms(policies: &[&PlatformPolicy]) {
    let mut table = base_table();
    table.set_header(vec![
        header_cell("Plataforma"),
        header_cell("Nombre"),
        header_cell("Elimina"),
        header_cell("Conserva"),
        header_cell("Descripción"),
    ]);
    for policy in policies {
        let remove = match &policy.remove {
            RemoveRule::All => "todo".to_string(),
            RemoveRule::Categories(categories) => join_labels(categories.iter().map(|c| c.label())),
        };
        let keep = join_labels(policy.keep.iter().map(|c| c.label()));
        table.add_row(Row::from(vec![
            Cell::new(&policy.platform).fg(Color::Cyan),
            Cell::new(&policy.display_name).fg(Color::White),
            Cell::new(remove).fg(Color::Yellow),
            Cell::new(keep).fg(Color::Green),
            Cell::new(&policy.description).fg(Color::White),
        ]));
    }
    println!("\n{table}\n");
}

fn join_labels<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    let joined = labels.collect::<Vec<_>>().join(", ");
    if joined.is_empty() { "-".to_string() } else { joined }
}

pub fn render_batch_event(event: &BatchEvent) {
    match event {
        BatchEvent::Started { total } => {
            println!(
                "\n{}",
                style(format!("Procesando {total} archivo(s)...")).cyan().bold()
            );
        }
        BatchEvent::Processing { index, total, path } => {
            println!(
                "{} {}",
                style(format!("[{index}/{total}]")).dim(),
                style(path.display()).white()
            );
        }
        BatchEvent::Success { outcome, .. } => match outcome {
            BatchOutcome::Analyzed(report) => {
                let level = report.analysis.level();
                println!(
                    "    {} {}",
                    style("✓").green(),
                    styled_level(
                        level,
                        format!("{}/100 · {}", report.analysis.score(), level.label())
                    )
                );
            }
            BatchOutcome::Cleaned(report) => {
                println!(
                    "    {} {} ({} → {}, -{})",
                    style("✓").green(),
                    style(report.output.display()).dim(),
                    report.before.score,
                    report.after.score,
                    report.score_reduction()
                );
            }
        },
        BatchEvent::Failure { error, .. } => {
            println!("    {} {}", style("✗").red(), style(error).red());
        }
        BatchEvent::Finished {
            successes,
            failures,
        } => {
            println!(
                "\n{} {} {}\n",
                style("Lote finalizado:").bold(),
                style(format!("{successes} correctos")).green(),
                style(format!("{failures} con error")).red()
            );
        }
    }
}
