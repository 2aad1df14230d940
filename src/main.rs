mod app;
mod ui;

use console::style;
use metarisk::analysis::AnalysisPipeline;
use metarisk::config::AnalyzerConfig;
use metarisk::error::AppError;
use std::env;
use std::io;
use std::process;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    if env::args().len() > 1 {
        eprintln!(
            "MetaRisk es interactivo y no acepta argumentos. Ejecuta el binario sin parámetros; la configuración se toma de METARISK_CONFIG o metarisk.json."
        );
        process::exit(1);
    }

    init_tracing();

    if let Err(error) = start() {
        eprintln!("{}", style(error).red());
        process::exit(1);
    }
}

fn start() -> Result<(), AppError> {
    let config = AnalyzerConfig::discover()?;
    let pipeline = AnalysisPipeline::new(&config)?;
    app::run(pipeline)
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("metarisk=warn")))
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .init();
}
