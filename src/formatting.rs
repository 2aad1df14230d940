use chrono::{DateTime, Local, Utc};

/// Fecha en la zona horaria local, con el formato de los reportes.
pub fn format_local(time: &DateTime<Utc>) -> String {
    let local: DateTime<Local> = time.with_timezone(&Local);
    local.format("%Y-%m-%d %H:%M:%S %Z").to_string()
}

pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["bytes", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit_index = 0;

    while value >= 1024.0 && unit_index < UNITS.len() - 1 {
        value /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} bytes", bytes)
    } else {
        format!("{value:.2} {} ({} bytes)", UNITS[unit_index], bytes)
    }
}

/// Barra de 20 posiciones para una puntuación de 0 a 100.
pub fn score_bar(score: u8) -> String {
    const WIDTH: usize = 20;
    let filled = (usize::from(score.min(100)) * WIDTH).div_ceil(100);
    format!("{}{}", "█".repeat(filled), "░".repeat(WIDTH - filled))
}
