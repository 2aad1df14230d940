//! MetaRisk: clasifica la metadata de un archivo, puntúa su riesgo de
//! privacidad y la elimina, por completo o según la plataforma de destino.

pub mod analysis;
pub mod batch;
pub mod config;
pub mod error;
pub mod extraction;
pub mod formatting;
pub mod removal;
pub mod report;

#[cfg(test)]
pub(crate) mod test_support;
