use std::path::Path;

use rusqlite::{params, Connection, OpenFlags};

use super::DatabaseError;

/// Seed hospitals: id, name, lat, lon.
pub const SEED_HOSPITALS: &[(i64, &str, f64, f64)] = &[
    (1, "Asha Multispeciality Hospital", 17.4350, 78.4480),
    (2, "Sri Sai Care Clinic", 17.4410, 78.4550),
    (3, "City General Hospital", 17.4300, 78.4400),
    (4, "Neighborhood Nursing Home", 17.4200, 78.4600),
];

/// Seed offerings: hospital_id, treatment_code, treatment_name, price.
pub const SEED_OFFERINGS: &[(i64, &str, &str, f64)] = &[
    (1, "APPENDECTOMY", "Appendectomy", 45000.0),
    (2, "APPENDECTOMY", "Appendectomy", 40000.0),
    (3, "APPENDECTOMY", "Appendectomy", 48000.0),
    (1, "CATARACT_SURGERY", "Cataract Surgery", 25000.0),
    (3, "CATARACT_SURGERY", "Cataract Surgery", 22000.0),
    (4, "CATARACT_SURGERY", "Cataract Surgery", 30000.0),
    (1, "DIALYSIS_SESSION", "Dialysis (per session)", 2500.0),
    (2, "DIALYSIS_SESSION", "Dialysis (per session)", 2000.0),
    (4, "DIALYSIS_SESSION", "Dialysis (per session)", 2300.0),
    (1, "MRI_BRAIN", "MRI - Brain", 6000.0),
    (2, "MRI_BRAIN", "MRI - Brain", 5500.0),
    (3, "MRI_BRAIN", "MRI - Brain", 7000.0),
];

/// Create and seed the hospital database if the file does not exist yet.
///
/// Returns `true` when the store was created by this call. An existing file
/// is reused as-is; running this again is a no-op.
pub fn init_database(path: &Path) -> Result<bool, DatabaseError> {
    build_database(path, seed)
}

/// The store is built in a sibling temp file and renamed into place only
/// after `populate` commits, so a failed setup leaves nothing at `path`.
fn build_database(
    path: &Path,
    populate: impl FnOnce(&mut Connection) -> Result<(), DatabaseError>,
) -> Result<bool, DatabaseError> {
    if path.exists() {
        tracing::debug!(path = %path.display(), "Hospital database already present");
        return Ok(false);
    }

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let staged = tempfile::Builder::new()
        .prefix(".medicost-db-")
        .tempfile_in(parent)?;
    {
        let mut conn = Connection::open(staged.path())?;
        configure_pragmas(&conn)?;
        run_migrations(&conn)?;
        populate(&mut conn)?;
    }
    staged.persist(path).map_err(|e| DatabaseError::Io(e.error))?;

    tracing::info!(
        path = %path.display(),
        hospitals = SEED_HOSPITALS.len(),
        offerings = SEED_OFFERINGS.len(),
        "Hospital database created"
    );
    Ok(true)
}

/// Open a read-only connection to an initialized hospital database.
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    if !path.exists() {
        return Err(DatabaseError::NotInitialized(path.to_path_buf()));
    }
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(conn)
}

/// Open a seeded in-memory database (for testing)
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    let mut conn = Connection::open_in_memory()?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    seed(&mut conn)?;
    Ok(conn)
}

fn configure_pragmas(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "PRAGMA journal_mode=DELETE;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_current_version(conn);

    let migrations: Vec<(i64, &str)> = vec![(
        1,
        include_str!("../../resources/migrations/001_initial.sql"),
    )];

    for (version, sql) in migrations {
        if version > current_version {
            tracing::info!("Running migration v{version}");
            conn.execute_batch(sql).map_err(|e| DatabaseError::MigrationFailed {
                version,
                reason: e.to_string(),
            })?;
        }
    }

    Ok(())
}

/// Get the current schema version (0 if no schema exists yet)
fn get_current_version(conn: &Connection) -> i64 {
    conn.query_row(
        "SELECT MAX(version) FROM schema_version",
        [],
        |row| row.get::<_, i64>(0),
    )
    .unwrap_or(0)
}

fn seed(conn: &mut Connection) -> Result<(), DatabaseError> {
    let tx = conn.transaction()?;
    {
        let mut insert_hospital =
            tx.prepare("INSERT INTO hospitals (id, name, lat, lon) VALUES (?1, ?2, ?3, ?4)")?;
        for (id, name, lat, lon) in SEED_HOSPITALS {
            insert_hospital.execute(params![id, name, lat, lon])?;
        }

        let mut insert_offering = tx.prepare(
            "INSERT INTO hospital_treatments (hospital_id, treatment_code, treatment_name, price)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        for (hospital_id, code, name, price) in SEED_OFFERINGS {
            insert_offering.execute(params![hospital_id, code, name, price])?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// Count tables in the database (for verification)
pub fn count_tables(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}
