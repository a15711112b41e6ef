use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use tracing::{debug, info, info_span, trace, warn};

use labgrid_cipher::FieldCipher;
use labgrid_core::{
    EvaluationAction, GridChanges, SampleCodeValidator, Selection, Transition, add_frame,
    clear_value, enter_value, mark, tag_selection_checked, to_grid, to_records,
};
use labgrid_model::{
    Applicant, CellStatus, Coordinate, GridDocument, GridId, GridMetadata, GridUpdate,
    PatchChange, StatusPalette,
};
use uuid::Uuid;
use labgrid_output::{ExportDialect, ExportOptions, export_dialect_with, write_export};

use crate::config::LabgridConfig;
use crate::document::{LoadedGrid, read_json, write_json};
use crate::logging::redact_value;
use crate::summary::{grid_table, print_diff_summary, status_table};
use crate::types::{ApplicantAction, DiffMode, DiffReport, NewGrid};

/// Environment variable consulted when no secret file is given.
pub const SECRET_ENV: &str = "LABGRID_SECRET";

fn ensure_editable(loaded: &LoadedGrid) -> Result<()> {
    if loaded.document.grid.finished {
        bail!(
            "grid {} is finished and can no longer be edited",
            loaded.document.grid.id
        );
    }
    Ok(())
}

fn parse_well(name: &str) -> Result<Coordinate> {
    Coordinate::from_well_name(name).with_context(|| format!("invalid well `{name}`"))
}

/// Lay out an empty plate with one record per well.
///
/// Every well is stored up front so later saves only ever patch existing
/// records.
pub fn create_grid(new: NewGrid) -> Result<LoadedGrid> {
    if new.width == 0 || new.height == 0 {
        bail!(
            "a plate needs at least one well, got {}x{}",
            new.height,
            new.width
        );
    }
    let grid = to_grid(&[], Some(new.width), Some(new.height)).context("lay out plate")?;
    let id = match new.id {
        Some(id) => id,
        None => GridId::new(Uuid::new_v4().to_string())?,
    };
    let metadata = GridMetadata {
        title: new
            .title
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty()),
        sample_arrival_date: new.sample_arrival_date,
        sample_taken_date: new.sample_taken_date,
        test_initiation_date: new.test_initiation_date,
        ..GridMetadata::new(id)
    };
    let document = GridDocument {
        grid: metadata,
        width: Some(new.width),
        height: Some(new.height),
        cells: to_records(&grid),
    };
    Ok(LoadedGrid { document, grid })
}

pub fn run_create(new: NewGrid, output: &Path) -> Result<()> {
    if output.exists() {
        bail!("{} already exists; refusing to overwrite it", output.display());
    }
    let (height, width) = (new.height, new.width);
    let created = create_grid(new)?;
    info!(grid = %created.document.grid.id, height, width, "grid created");
    write_json(Some(output), &created.document)?;
    println!("{}", created.document.grid.id);
    Ok(())
}

pub fn run_show(path: &Path, config: &LabgridConfig) -> Result<()> {
    let loaded = LoadedGrid::load(path)?;
    let palette = config.palette()?;
    println!("Grid: {}", loaded.document.grid.display_title());
    if loaded.document.grid.finished {
        println!("Status: finished");
    }
    println!("{}", grid_table(&add_frame(&loaded.grid), &palette));
    Ok(())
}

/// Compare a working copy against its baseline.
pub fn diff_grids(baseline: &LoadedGrid, current: &LoadedGrid, mode: DiffMode) -> Result<DiffReport> {
    let (base_meta, current_meta) = (&baseline.document.grid, &current.document.grid);
    if base_meta.id != current_meta.id {
        bail!(
            "documents belong to different grids ({} and {})",
            base_meta.id,
            current_meta.id
        );
    }
    let changes = GridChanges::between(
        &baseline.grid,
        &current.grid,
        base_meta.title.as_deref(),
        current_meta.title.as_deref(),
    )
    .context("compare grids")?;
    for patch in &changes.entry {
        if let PatchChange::Entry { value, .. } = &patch.change {
            trace!(
                well = %patch.coordinate().well_name(),
                value = redact_value(value.as_deref().unwrap_or_default()),
                "entry change"
            );
        }
    }

    let GridChanges {
        entry,
        evaluation,
        title_changed,
    } = changes;
    Ok(DiffReport {
        grid: current_meta.id.clone(),
        title_changed,
        entry: matches!(mode, DiffMode::Entry | DiffMode::All).then_some(entry),
        evaluation: matches!(mode, DiffMode::Evaluation | DiffMode::All).then_some(evaluation),
    })
}

pub fn run_diff(baseline: &Path, current: &Path, mode: DiffMode) -> Result<()> {
    let span = info_span!("diff", baseline = %baseline.display(), current = %current.display());
    let _guard = span.enter();
    let report = diff_grids(&LoadedGrid::load(baseline)?, &LoadedGrid::load(current)?, mode)?;
    info!(patches = report.patch_count(), "diff complete");
    print_diff_summary(&report);
    write_json(None, &report)
}

/// Stage `status` on every empty well between `from` and `to`.
pub fn tag_wells(
    loaded: &mut LoadedGrid,
    from: &str,
    to: &str,
    status: CellStatus,
    palette: &StatusPalette,
) -> Result<usize> {
    ensure_editable(loaded)?;
    let selection = Selection::new(parse_well(from)?, parse_well(to)?);
    debug!(start = %selection.start(), end = %selection.end(), %status, "tagging selection");
    let changed = tag_selection_checked(&mut loaded.grid, selection, status, palette)
        .with_context(|| format!("tag {from}:{to}"))?;
    Ok(changed)
}

pub fn run_tag(
    path: &Path,
    from: &str,
    to: &str,
    status: CellStatus,
    output: Option<&Path>,
    config: &LabgridConfig,
) -> Result<()> {
    let mut loaded = LoadedGrid::load(path)?;
    let changed = tag_wells(&mut loaded, from, to, status, &config.palette()?)?;
    info!(changed, %status, "tagged wells");
    if changed == 0 {
        warn!("selection contained no empty wells; nothing changed");
    }
    write_json(Some(output.unwrap_or(path)), &loaded.into_document())
}

/// Type a sample code into one well, or clear it when `value` is `None`.
pub fn enter_well(loaded: &mut LoadedGrid, well: &str, value: Option<&str>) -> Result<Transition> {
    ensure_editable(loaded)?;
    let at = parse_well(well)?;
    let transition = match value {
        Some(value) => {
            trace!(well, value = redact_value(value), "entering sample code");
            enter_value(&mut loaded.grid, at, value)
        }
        None => clear_value(&mut loaded.grid, at),
    }
    .with_context(|| format!("well {well}"))?;
    Ok(transition)
}

pub fn run_enter(path: &Path, well: &str, value: Option<&str>, output: Option<&Path>) -> Result<()> {
    let mut loaded = LoadedGrid::load(path)?;
    if enter_well(&mut loaded, well, value)? == Transition::Ignored {
        warn!(well, "well unchanged");
    }
    write_json(Some(output.unwrap_or(path)), &loaded.into_document())
}

/// Toggle a result mark on one well.
pub fn mark_well(
    loaded: &mut LoadedGrid,
    well: &str,
    action: EvaluationAction,
    validator: &dyn SampleCodeValidator,
) -> Result<Transition> {
    ensure_editable(loaded)?;
    let at = parse_well(well)?;
    let transition =
        mark(&mut loaded.grid, at, action, validator).with_context(|| format!("well {well}"))?;
    Ok(transition)
}

pub fn run_mark(
    path: &Path,
    well: &str,
    action: EvaluationAction,
    output: Option<&Path>,
    config: &LabgridConfig,
) -> Result<()> {
    let validator = config.validator()?;
    let mut loaded = LoadedGrid::load(path)?;
    if mark_well(&mut loaded, well, action, validator.as_ref())? == Transition::Ignored {
        warn!(well, "well holds no valid sample code; mark ignored");
    }
    write_json(Some(output.unwrap_or(path)), &loaded.into_document())
}

/// Mark the grid finished and optionally retitle it first.
pub fn finish_grid(
    loaded: &mut LoadedGrid,
    title: Option<&str>,
    at: DateTime<Utc>,
) -> Result<GridUpdate> {
    let metadata = &mut loaded.document.grid;
    if let Some(title) = title {
        metadata.title = Some(title.trim().to_string());
    }
    Ok(metadata.finish(at)?)
}

pub fn run_finish(path: &Path, title: Option<&str>, output: Option<&Path>) -> Result<()> {
    let mut loaded = LoadedGrid::load(path)?;
    let update = finish_grid(&mut loaded, title, Utc::now())?;
    info!(grid = %update.id, "grid finished");
    write_json(Some(output.unwrap_or(path)), &loaded.into_document())
}

pub fn run_export(
    path: &Path,
    dialect: ExportDialect,
    options: ExportOptions,
    output_dir: Option<&Path>,
) -> Result<()> {
    let loaded = LoadedGrid::load(path)?;
    let metadata = &loaded.document.grid;
    if !metadata.finished {
        bail!("grid {} is not finished; finish it before exporting", metadata.id);
    }
    let span = info_span!("export", grid = %metadata.id, %dialect);
    let _guard = span.enter();
    match output_dir {
        Some(dir) => {
            let written = write_export(dir, &loaded.grid, dialect, metadata.display_title(), options)
                .with_context(|| format!("export to {}", dir.display()))?;
            info!(path = %written.display(), "export written");
            println!("{}", written.display());
        }
        None => {
            let text = export_dialect_with(&loaded.grid, dialect, options).context("export")?;
            print!("{text}");
        }
    }
    Ok(())
}

/// Read the secret from `secret_file`, falling back to the environment.
pub fn load_secret(secret_file: Option<&Path>) -> Result<String> {
    let secret = match secret_file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("read secret file {}", path.display()))?
            .trim_end_matches(['\r', '\n'])
            .to_string(),
        None => env::var(SECRET_ENV)
            .with_context(|| format!("no --secret-file given and {SECRET_ENV} is not set"))?,
    };
    if secret.is_empty() {
        bail!("secret is empty");
    }
    Ok(secret)
}

pub fn transform_applicant(
    applicant: &Applicant,
    action: ApplicantAction,
    cipher: &FieldCipher,
    secret: &str,
) -> Result<Applicant> {
    let span = info_span!("applicant", id = %applicant.id, ?action);
    let _guard = span.enter();
    let result = match action {
        ApplicantAction::Encrypt => cipher.encrypt_applicant(applicant, secret),
        ApplicantAction::Decrypt => cipher.decrypt_applicant(applicant, secret),
    };
    match result {
        Ok(applicant) => {
            debug!(fields = Applicant::ENCRYPTED_FIELDS.len(), "fields processed");
            Ok(applicant)
        }
        Err(error) if error.is_decryption() => {
            Err(error).context("cannot decrypt applicant; check the secret and try again")
        }
        Err(error) => Err(error.into()),
    }
}

pub fn run_applicant(
    action: ApplicantAction,
    path: &Path,
    secret_file: Option<&Path>,
    output: Option<&Path>,
    config: &LabgridConfig,
) -> Result<()> {
    let secret = load_secret(secret_file)?;
    let applicant: Applicant = read_json(path)?;
    let result = transform_applicant(&applicant, action, &config.cipher(), &secret)?;
    write_json(output, &result)
}

pub fn run_statuses(config: &LabgridConfig) -> Result<()> {
    println!("{}", status_table(&config.palette()?));
    Ok(())
}
