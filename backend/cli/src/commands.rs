use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use patente_core::{has_plate_len, PlateRecord, RecordStore};
use patente_understanding::{InputImage, PlateRecognizer};
use patente_workflows::{ListWorkflow, LookupWorkflow, SaveOutcome, SaveWorkflow, ScanWorkflow};

use crate::terminal_output::render_table;

pub const PLATE_LEN_MSG: &str = "La patente debe tener 6 caracteres";
pub const EMPTY_USER_MSG: &str = "El campo de usuario no puede estar vacío.";
pub const SAVED_MSG: &str = "Registro guardado con éxito!";
pub const SAVE_FAILED_MSG: &str = "Error al guardar el registro.";
pub const NOT_AVAILABLE: &str = "no disponible";
pub const NO_PLATE_MSG: &str = "No se encontró una patente válida";

/// The workflows one CLI invocation (or shell session) works with.
pub struct Session {
    pub lookup: LookupWorkflow,
    pub save: SaveWorkflow,
    pub list: ListWorkflow,
    pub scan: ScanWorkflow,
}

impl Session {
    pub fn new(store: Arc<dyn RecordStore>, recognizer: Arc<dyn PlateRecognizer>) -> Self {
        let lookup = LookupWorkflow::new(store.clone());
        Self {
            save: SaveWorkflow::new(store.clone()),
            list: ListWorkflow::new(store),
            scan: ScanWorkflow::new(recognizer, lookup.clone()),
            lookup,
        }
    }

    /// Look a plate up and wait for the result slot to settle.
    pub async fn lookup(&self, plate: &str) -> Result<Option<PlateRecord>> {
        check_plate(plate)?;
        self.lookup.lookup(plate).await.context("lookup task failed")?;
        Ok(self.lookup.current())
    }

    /// Save a record and wait for its outcome event.
    pub async fn save(&self, plate: &str, user: &str, linked: bool) -> Result<SaveOutcome> {
        check_plate(plate)?;
        check_user(user)?;
        let mut outcomes = self.save.subscribe();
        self.save
            .save(plate, user.trim(), linked)
            .await
            .context("save task failed")?;
        outcomes.recv().await.context("save outcome was not delivered")
    }

    pub async fn list(&self) -> Result<Vec<PlateRecord>> {
        self.list.list_all().await.context("listing task failed")?;
        match self.list.current() {
            Some(records) => Ok(records),
            None => bail!("No se pudieron cargar los registros"),
        }
    }

    /// Read a plate from an image file. `Ok(None)` when no plate was found.
    pub async fn scan(&self, image: &Path) -> Result<Option<(String, Option<PlateRecord>)>> {
        let scan = self
            .scan
            .scan(&InputImage::from_path(image))
            .await
            .map_err(|e| anyhow::anyhow!("Error al procesar la imagen: {e}"))?;
        let Some(scan) = scan else {
            return Ok(None);
        };
        scan.lookup.await.context("lookup task failed")?;
        Ok(Some((scan.plate, self.lookup.current())))
    }
}

pub fn check_plate(plate: &str) -> Result<()> {
    if !has_plate_len(plate) {
        bail!(PLATE_LEN_MSG);
    }
    Ok(())
}

pub fn check_user(user: &str) -> Result<()> {
    if user.trim().is_empty() {
        bail!(EMPTY_USER_MSG);
    }
    Ok(())
}

pub fn linked_label(linked: bool) -> &'static str {
    if linked {
        "Vinculado"
    } else {
        "No Vinculado"
    }
}

/// Lookup result as shown to the operator.
pub fn describe_lookup(record: Option<&PlateRecord>) -> String {
    match record {
        Some(r) => format!("Usuario: {}\nEstado: {}", r.user, linked_label(r.linked)),
        None => format!("Usuario: {NOT_AVAILABLE}\nEstado: {NOT_AVAILABLE}"),
    }
}

pub fn render_records(records: &[PlateRecord]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.plate.clone(),
                r.user.clone(),
                linked_label(r.linked).to_string(),
            ]
        })
        .collect();
    render_table(&["Patente", "Usuario", "Estado"], &rows)
}
