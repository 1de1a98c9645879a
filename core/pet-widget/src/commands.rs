//! Subcommand implementations. Each writes one JSON document to `out`.

use std::io::{Read, Write};
use std::path::PathBuf;

use pet_core::{load_widget_config, PetError, ReconciliationService, StorageConfig};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Pet(#[from] PetError),

    #[error("Failed to read stdin: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    OutputIo(#[source] std::io::Error),
}

/// Where the widget data and configuration live for this invocation.
pub struct Context {
    pub storage: StorageConfig,
    pub config_path: PathBuf,
}

impl Context {
    pub fn resolve(root: Option<PathBuf>, config: Option<PathBuf>) -> Result<Self, CliError> {
        let storage = match root {
            Some(root) => StorageConfig::with_root(root),
            None => StorageConfig::from_home()?,
        };
        let config_path = config.unwrap_or_else(|| storage.config_file());
        Ok(Self {
            storage,
            config_path,
        })
    }

    pub fn service(&self) -> Result<ReconciliationService, CliError> {
        let config = load_widget_config(&self.config_path)?;
        Ok(ReconciliationService::open(&self.storage, &config))
    }
}

#[derive(Serialize)]
struct PushOutcome {
    accepted: bool,
}

#[derive(Serialize)]
struct ResetOutcome {
    reset: bool,
}

pub fn resolve(service: &ReconciliationService, out: &mut impl Write) -> Result<(), CliError> {
    emit(out, &service.resolve_current_state()?)
}

pub fn tick(service: &ReconciliationService, out: &mut impl Write) -> Result<(), CliError> {
    emit(out, &service.periodic_reconcile()?)
}

pub fn refresh(service: &ReconciliationService, out: &mut impl Write) -> Result<(), CliError> {
    emit(out, &service.refresh_offline()?)
}

pub fn push(
    service: &ReconciliationService,
    input: &mut impl Read,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut payload = String::new();
    input
        .read_to_string(&mut payload)
        .map_err(CliError::Stdin)?;

    let accepted = if payload.trim().is_empty() {
        tracing::warn!("Empty push payload");
        false
    } else {
        service.ingest_payload(&payload)?
    };
    emit(out, &PushOutcome { accepted })
}

pub fn reset(service: &ReconciliationService, out: &mut impl Write) -> Result<(), CliError> {
    service.reset()?;
    emit(out, &ResetOutcome { reset: true })
}

pub fn status(service: &ReconciliationService, out: &mut impl Write) -> Result<(), CliError> {
    emit(out, &service.status()?)
}

fn emit<T: Serialize>(out: &mut impl Write, value: &T) -> Result<(), CliError> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out).map_err(CliError::OutputIo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::TempDir;

    fn context() -> (TempDir, Context) {
        let temp = TempDir::new().unwrap();
        let ctx = Context::resolve(Some(temp.path().to_path_buf()), None).unwrap();
        (temp, ctx)
    }

    fn output_json(buf: Vec<u8>) -> Value {
        serde_json::from_slice(&buf).unwrap()
    }

    #[test]
    fn test_resolve_on_empty_root_prints_default() {
        let (_temp, ctx) = context();
        let service = ctx.service().unwrap();
        let mut out = Vec::new();

        resolve(&service, &mut out).unwrap();
        let json = output_json(out);
        assert_eq!(json["source"], "default");
        assert_eq!(json["state"]["energy"], 100);
        assert_eq!(json["state"]["prefabName"], "Pet_CatBrown");
    }

    #[test]
    fn test_push_then_status() {
        let (_temp, ctx) = context();
        let service = ctx.service().unwrap();
        let now = chrono::Utc::now().timestamp_millis();
        let payload = format!(
            r#"{{"selectedPetId":"p1","selectedPetData":{{"petName":"Soot","energy":55}},"lastUpdateTime":"{now}"}}"#
        );

        let mut out = Vec::new();
        push(&service, &mut payload.as_bytes(), &mut out).unwrap();
        assert_eq!(output_json(out)["accepted"], true);

        let mut out = Vec::new();
        status(&service, &mut out).unwrap();
        let json = output_json(out);
        assert_eq!(json["has_live"], true);
        assert_eq!(json["baseline_valid"], true);
        assert_eq!(json["decay"]["energy_interval_secs"], 648);
    }

    #[test]
    fn test_push_rejects_empty_and_garbage() {
        let (_temp, ctx) = context();
        let service = ctx.service().unwrap();

        for payload in ["", "  \n", "not json"] {
            let mut out = Vec::new();
            push(&service, &mut payload.as_bytes(), &mut out).unwrap();
            assert_eq!(output_json(out)["accepted"], false);
        }
    }

    #[test]
    fn test_reset_output() {
        let (_temp, ctx) = context();
        let service = ctx.service().unwrap();
        let mut out = Vec::new();
        reset(&service, &mut out).unwrap();
        assert_eq!(output_json(out)["reset"], true);
    }

    #[test]
    fn test_config_override_is_used() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("custom.toml");
        fs_err::write(&config_path, "[decay]\nenergy_interval_secs = 0\n").unwrap();

        let ctx = Context::resolve(Some(temp.path().join("data")), Some(config_path)).unwrap();
        assert!(matches!(
            ctx.service(),
            Err(CliError::Pet(PetError::ConfigInvalid(_)))
        ));
    }
}
