use crate::ui;
use console::style;
use metarisk::analysis::AnalysisPipeline;
use metarisk::batch::{
    self, BatchEvent, BatchJob, BatchOutcome, DirectoryFilter, collect_candidate_files,
    run_batch_with_sender,
};
use metarisk::error::AppError;
use metarisk::removal::RemovalScope;
use metarisk::report::{FileReport, export_reports, parse_export_format};
use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

const DEFAULT_REPORT_NAME: &str = "metarisk_reporte";

pub fn run(pipeline: AnalysisPipeline) -> Result<(), AppError> {
    let mut state = AppState::new(pipeline)?;

    ui::render_header();
    ui::render_intro(&state.current_dir);

    let mut input = String::new();
    loop {
        match read_user_input(&mut input) {
            Ok(None) => {
                println!("\n{}", style("Fin de la entrada. ¡Hasta luego!").dim());
                break;
            }
            Ok(Some(line)) => {
                if line.is_empty() {
                    continue;
                }

                if matches_command(&line, &["exit", "salir"]) {
                    println!("{}", style("Hasta luego!").dim());
                    break;
                }

                if matches_command(&line, &["ayuda", "help"]) {
                    ui::render_help();
                    continue;
                }

                if let Err(error) = handle_input(&mut state, &line) {
                    eprintln!("{}", style(error).red());
                }
            }
            Err(error) => {
                eprintln!("Error al leer la entrada: {error}");
            }
        }
    }

    Ok(())
}

fn matches_command(input: &str, aliases: &[&str]) -> bool {
    aliases
        .iter()
        .any(|alias| input.eq_ignore_ascii_case(alias))
}

struct AppState {
    current_dir: PathBuf,
    pipeline: AnalysisPipeline,
    last_reports: Vec<FileReport>,
}

impl AppState {
    fn new(pipeline: AnalysisPipeline) -> Result<Self, AppError> {
        let current_dir = env::current_dir().map_err(|source| AppError::Path {
            path: PathBuf::from("."),
            source,
        })?;
        Ok(Self {
            current_dir,
            pipeline,
            last_reports: Vec::new(),
        })
    }

    fn resolve_path(&self, input: &str) -> PathBuf {
        let candidate = Path::new(input);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.current_dir.join(candidate)
        }
    }

    /// Separa una plataforma conocida al final de los argumentos; la ruta puede tener espacios.
    fn split_platform<'a>(&self, args: &'a str) -> (&'a str, Option<&'a str>) {
        if let Some((path, last)) = args.rsplit_once(char::is_whitespace)
            && self.pipeline.platforms().contains(last)
        {
            return (path.trim(), Some(last));
        }
        (args, None)
    }

    fn existing_file(&self, input: &str) -> Result<PathBuf, AppError> {
        let path = self.resolve_path(input);
        if !path.is_file() {
            return Err(AppError::Usage(format!(
                "`{}` no es un archivo accesible.",
                path.display()
            )));
        }
        Ok(path)
    }
}

fn handle_input(state: &mut AppState, raw_input: &str) -> Result<(), AppError> {
    let trimmed = raw_input.trim();
    let (command, remainder) = trimmed
        .split_once(char::is_whitespace)
        .map(|(command, rest)| (command, rest.trim()))
        .unwrap_or((trimmed, ""));

    match command.to_lowercase().as_str() {
        "analizar" | "analyze" => analyze(state, remainder),
        "limpiar" | "clean" => clean(state, remainder),
        "lote" | "batch" => run_batch(state, remainder),
        "exportar" | "export" => export(state, remainder),
        "plataformas" | "platforms" => {
            ui::render_platforms(&state.pipeline.platforms().platforms());
            Ok(())
        }
        _ => Err(AppError::Usage(format!(
            "Comando desconocido: `{command}`. Escribe 'ayuda' para ver las opciones."
        ))),
    }
}

fn analyze(state: &mut AppState, args: &str) -> Result<(), AppError> {
    if args.is_empty() {
        return Err(AppError::Usage(
            "Debes indicar el archivo que deseas analizar.".to_string(),
        ));
    }
    let (target, platform) = state.split_platform(args);
    let path = state.existing_file(target)?;

    let report = batch::analyze_file(&path, &state.pipeline, platform)?;
    ui::render_file_report(&report);
    state.last_reports = vec![report];
    Ok(())
}

fn clean(state: &AppState, args: &str) -> Result<(), AppError> {
    if args.is_empty() {
        return Err(AppError::Usage(
            "Debes indicar el archivo que deseas limpiar.".to_string(),
        ));
    }
    let (target, platform) = state.split_platform(args);
    let path = state.existing_file(target)?;

    let scope = match platform {
        Some(platform) => RemovalScope::Platform {
            rules: state.pipeline.platforms(),
            platform,
        },
        None => RemovalScope::All,
    };
    let report = batch::clean_file(&path, &state.pipeline, scope)?;
    ui::render_clean_report(&report);
    Ok(())
}

fn run_batch(state: &mut AppState, args: &str) -> Result<(), AppError> {
    let mut tokens = args.split_whitespace();
    let usage = || {
        AppError::Usage(
            "Uso: lote <analizar|limpiar> <directorio> [filtro] [plataforma] [-r]".to_string(),
        )
    };
    let mode = tokens.next().ok_or_else(usage)?.to_lowercase();
    let directory = state.resolve_path(tokens.next().ok_or_else(usage)?);

    let mut filter = DirectoryFilter::Todos;
    let mut platform = None;
    let mut recursive = false;
    for token in tokens {
        if matches_command(token, &["-r", "recursivo"]) {
            recursive = true;
        } else if let Some(parsed) = DirectoryFilter::parse(token) {
            filter = parsed;
        } else if state.pipeline.platforms().contains(token) {
            platform = Some(token.to_lowercase());
        } else {
            return Err(AppError::Usage(format!(
                "Opción desconocida: `{token}`. Usa un filtro, una plataforma o -r."
            )));
        }
    }

    let job = match mode.as_str() {
        "analizar" => BatchJob::Analyze { platform },
        "limpiar" => BatchJob::Clean { platform },
        _ => return Err(usage()),
    };

    let files = collect_candidate_files(&directory, recursive, filter)?;
    if files.is_empty() {
        println!(
            "{}",
            style(format!("No hay archivos compatibles ({}).", filter.label())).dim()
        );
        return Ok(());
    }

    let (sender, receiver) = mpsc::channel();
    let pipeline = state.pipeline.clone();
    let handle = thread::spawn(move || run_batch_with_sender(files, pipeline, job, sender));

    let mut reports = Vec::new();
    for event in receiver.iter() {
        ui::render_batch_event(&event);
        if let BatchEvent::Success {
            outcome: BatchOutcome::Analyzed(report),
            ..
        } = event
        {
            reports.push(*report);
        }
    }

    handle
        .join()
        .map_err(|_| AppError::Usage("El procesamiento por lote terminó inesperadamente.".to_string()))?;

    if !reports.is_empty() {
        state.last_reports = reports;
    }
    Ok(())
}

fn export(state: &AppState, args: &str) -> Result<(), AppError> {
    let (format, target) = args
        .split_once(char::is_whitespace)
        .map(|(format, rest)| (format, rest.trim()))
        .unwrap_or((args, ""));
    if format.is_empty() {
        return Err(AppError::Usage(
            "Uso: exportar <json|csv|txt|xlsx> [ruta]".to_string(),
        ));
    }
    if state.last_reports.is_empty() {
        return Err(AppError::Usage(
            "Aún no hay análisis para exportar. Usa 'analizar' o 'lote analizar'.".to_string(),
        ));
    }

    let format = parse_export_format(format)?;
    let path = if target.is_empty() {
        state
            .current_dir
            .join(format!("{DEFAULT_REPORT_NAME}.{}", format.extension()))
    } else {
        state.resolve_path(target)
    };

    export_reports(&state.last_reports, format, &path)?;
    println!(
        "{} {}\n",
        style(format!("Reporte {} guardado en", format.label())).green(),
        style(path.display()).cyan()
    );
    Ok(())
}

fn read_user_input(buffer: &mut String) -> io::Result<Option<String>> {
    print!("{} ", style("MetaRisk").bold().cyan());
    print!("{} ", style("›").cyan());
    io::stdout().flush()?;

    buffer.clear();
    let bytes_read = io::stdin().read_line(buffer)?;
    if bytes_read == 0 {
        return Ok(None);
    }

    Ok(Some(buffer.trim().to_string()))
}
