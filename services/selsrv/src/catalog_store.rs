//! Catalog Store - SQLite persistence for the parts catalog
//!
//! Four tables (`manufacturers`, `starting_methods`, `contactors`,
//! `overload_relays`) keyed by a unique business key. Relay frame lists are
//! stored as JSON array text.

use common::serde_helpers::{deserialize_optional_f64, deserialize_optional_string};
use errors::{SwitchgearError, SwitchgearResult};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use switchgear_model::{
    Catalog, CatalogError, CatalogSummary, Contactor, Manufacturer, OverloadRelay, StartingMethod,
};
use tracing::{debug, info};

// ============================================================================
// Schema
// ============================================================================

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS manufacturers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        country TEXT,
        website TEXT,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS starting_methods (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        description TEXT,
        min_power_hp REAL NOT NULL,
        max_power_hp REAL NOT NULL,
        starting_current_reduction REAL NOT NULL DEFAULT 0,
        starting_torque_reduction REAL NOT NULL DEFAULT 0,
        complexity_level INTEGER NOT NULL DEFAULT 1,
        cost_factor REAL NOT NULL DEFAULT 1.0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS contactors (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        model TEXT NOT NULL UNIQUE,
        manufacturer TEXT NOT NULL,
        current_rating REAL NOT NULL,
        voltage_rating INTEGER NOT NULL,
        utilization_category TEXT NOT NULL DEFAULT 'AC-3',
        poles INTEGER NOT NULL DEFAULT 3,
        auxiliary_contacts TEXT,
        coil_voltage INTEGER,
        frame_size TEXT,
        price REAL NOT NULL,
        image_url TEXT,
        datasheet_url TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS overload_relays (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        model TEXT NOT NULL UNIQUE,
        manufacturer TEXT NOT NULL,
        current_range_min REAL NOT NULL,
        current_range_max REAL NOT NULL,
        trip_class INTEGER NOT NULL DEFAULT 10,
        reset_type TEXT NOT NULL DEFAULT 'Manual',
        compatible_contactor_frames TEXT NOT NULL DEFAULT '[]',
        price REAL NOT NULL,
        image_url TEXT,
        datasheet_url TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_contactors_rating ON contactors(current_rating)",
    "CREATE INDEX IF NOT EXISTS idx_relays_range ON overload_relays(current_range_min)",
];

const CONTACTOR_COLUMNS: &str = "model, manufacturer, current_rating, voltage_rating, \
     utilization_category, poles, auxiliary_contacts, coil_voltage, frame_size, price, \
     image_url, datasheet_url";

const RELAY_COLUMNS: &str = "model, manufacturer, current_range_min, current_range_max, \
     trip_class, reset_type, compatible_contactor_frames, price, image_url, datasheet_url";

/// Create catalog tables if absent
pub async fn init_schema(pool: &SqlitePool) -> SwitchgearResult<()> {
    for statement in SCHEMA {
        sqlx::query(*statement).execute(pool).await?;
    }
    debug!("Catalog schema ready");
    Ok(())
}

// ============================================================================
// Seeding
// ============================================================================

/// Insert every record whose unique key is not yet present
///
/// Returns the number of rows actually inserted per table; re-seeding an
/// unchanged catalog inserts nothing.
pub async fn seed_catalog(pool: &SqlitePool, catalog: &Catalog) -> SwitchgearResult<CatalogSummary> {
    catalog.validate()?;

    let mut tx = pool.begin().await?;
    let mut inserted = CatalogSummary::default();

    for m in &catalog.manufacturers {
        let result = sqlx::query(
            "INSERT INTO manufacturers (name, country, website) VALUES (?, ?, ?) \
             ON CONFLICT(name) DO NOTHING",
        )
        .bind(&m.name)
        .bind(&m.country)
        .bind(&m.website)
        .execute(&mut *tx)
        .await?;
        inserted.manufacturers += result.rows_affected() as usize;
    }

    for s in &catalog.starting_methods {
        let result = sqlx::query(
            r#"
            INSERT INTO starting_methods
                (name, description, min_power_hp, max_power_hp, starting_current_reduction,
                 starting_torque_reduction, complexity_level, cost_factor)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(name) DO NOTHING
            "#,
        )
        .bind(&s.name)
        .bind(&s.description)
        .bind(s.min_power_hp)
        .bind(s.max_power_hp)
        .bind(s.starting_current_reduction)
        .bind(s.starting_torque_reduction)
        .bind(i64::from(s.complexity_level))
        .bind(s.cost_factor)
        .execute(&mut *tx)
        .await?;
        inserted.starting_methods += result.rows_affected() as usize;
    }

    for c in &catalog.contactors {
        let result = sqlx::query(&format!(
            "INSERT INTO contactors ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(model) DO NOTHING",
            CONTACTOR_COLUMNS
        ))
        .bind(&c.model)
        .bind(&c.manufacturer)
        .bind(c.current_rating)
        .bind(i64::from(c.voltage_rating))
        .bind(&c.utilization_category)
        .bind(i64::from(c.poles))
        .bind(&c.auxiliary_contacts)
        .bind(c.coil_voltage.map(i64::from))
        .bind(&c.frame_size)
        .bind(c.price)
        .bind(&c.image_url)
        .bind(&c.datasheet_url)
        .execute(&mut *tx)
        .await?;
        inserted.contactors += result.rows_affected() as usize;
    }

    for r in &catalog.overload_relays {
        let frames = serde_json::to_string(&r.compatible_contactor_frames)?;
        let result = sqlx::query(&format!(
            "INSERT INTO overload_relays ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(model) DO NOTHING",
            RELAY_COLUMNS
        ))
        .bind(&r.model)
        .bind(&r.manufacturer)
        .bind(r.current_range_min)
        .bind(r.current_range_max)
        .bind(i64::from(r.trip_class))
        .bind(&r.reset_type)
        .bind(frames)
        .bind(r.price)
        .bind(&r.image_url)
        .bind(&r.datasheet_url)
        .execute(&mut *tx)
        .await?;
        inserted.overload_relays += result.rows_affected() as usize;
    }

    tx.commit().await?;

    info!(
        "Catalog seeded: {} manufacturers, {} starting methods, {} contactors, {} overload relays inserted",
        inserted.manufacturers,
        inserted.starting_methods,
        inserted.contactors,
        inserted.overload_relays
    );
    Ok(inserted)
}

// ============================================================================
// Queries
// ============================================================================

/// Contactor listing filter; zero or blank values are ignored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactorFilter {
    /// current_rating >= value
    #[serde(default, deserialize_with = "deserialize_optional_f64")]
    pub min_current: Option<f64>,
    /// current_rating <= value
    #[serde(default, deserialize_with = "deserialize_optional_f64")]
    pub max_current: Option<f64>,
    /// voltage_rating >= value
    #[serde(default, deserialize_with = "deserialize_optional_f64")]
    pub voltage: Option<f64>,
    /// Case-insensitive substring of the manufacturer name
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub manufacturer: Option<String>,
}

/// Overload relay listing filter; zero or blank values are ignored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelayFilter {
    /// current_range_min <= value
    #[serde(default, deserialize_with = "deserialize_optional_f64")]
    pub min_current: Option<f64>,
    /// current_range_max >= value
    #[serde(default, deserialize_with = "deserialize_optional_f64")]
    pub max_current: Option<f64>,
    /// Case-insensitive substring of the manufacturer name
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub manufacturer: Option<String>,
}

fn active(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

fn check_finite(param: &str, value: Option<f64>) -> SwitchgearResult<()> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(SwitchgearError::invalid_parameter(
            param,
            "must be a non-negative number",
        )),
        _ => Ok(()),
    }
}

impl ContactorFilter {
    pub fn validate(&self) -> SwitchgearResult<()> {
        check_finite("min_current", self.min_current)?;
        check_finite("max_current", self.max_current)?;
        check_finite("voltage", self.voltage)
    }
}

impl RelayFilter {
    pub fn validate(&self) -> SwitchgearResult<()> {
        check_finite("min_current", self.min_current)?;
        check_finite("max_current", self.max_current)
    }
}

fn like_pattern(manufacturer: Option<&str>) -> Option<String> {
    manufacturer.map(|name| format!("%{}%", name.to_lowercase()))
}

/// Contactors matching `filter`, by current rating ascending
pub async fn list_contactors(
    pool: &SqlitePool,
    filter: &ContactorFilter,
) -> SwitchgearResult<Vec<Contactor>> {
    filter.validate()?;

    let rows = sqlx::query(&format!(
        r#"
        SELECT {}
        FROM contactors
        WHERE (?1 IS NULL OR current_rating >= ?1)
          AND (?2 IS NULL OR current_rating <= ?2)
          AND (?3 IS NULL OR voltage_rating >= ?3)
          AND (?4 IS NULL OR LOWER(manufacturer) LIKE ?4)
        ORDER BY current_rating ASC, id ASC
        "#,
        CONTACTOR_COLUMNS
    ))
    .bind(active(filter.min_current))
    .bind(active(filter.max_current))
    .bind(active(filter.voltage))
    .bind(like_pattern(filter.manufacturer.as_deref()))
    .fetch_all(pool)
    .await?;
    rows.iter().map(hydrate_contactor).collect()
}

/// Overload relays matching `filter`, by range minimum ascending
pub async fn list_overload_relays(
    pool: &SqlitePool,
    filter: &RelayFilter,
) -> SwitchgearResult<Vec<OverloadRelay>> {
    filter.validate()?;

    let rows = sqlx::query(&format!(
        r#"
        SELECT {}
        FROM overload_relays
        WHERE (?1 IS NULL OR current_range_min <= ?1)
          AND (?2 IS NULL OR current_range_max >= ?2)
          AND (?3 IS NULL OR LOWER(manufacturer) LIKE ?3)
        ORDER BY current_range_min ASC, id ASC
        "#,
        RELAY_COLUMNS
    ))
    .bind(active(filter.min_current))
    .bind(active(filter.max_current))
    .bind(like_pattern(filter.manufacturer.as_deref()))
    .fetch_all(pool)
    .await?;
    rows.iter().map(hydrate_relay).collect()
}

pub async fn list_manufacturers(pool: &SqlitePool) -> SwitchgearResult<Vec<Manufacturer>> {
    let rows = sqlx::query("SELECT name, country, website FROM manufacturers ORDER BY id ASC")
        .fetch_all(pool)
        .await?;
    rows.iter().map(hydrate_manufacturer).collect()
}

pub async fn list_starting_methods(pool: &SqlitePool) -> SwitchgearResult<Vec<StartingMethod>> {
    let rows = sqlx::query(
        r#"
        SELECT name, description, min_power_hp, max_power_hp, starting_current_reduction,
               starting_torque_reduction, complexity_level, cost_factor
        FROM starting_methods
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;
    rows.iter().map(hydrate_starting_method).collect()
}

/// Point-in-time snapshot of all four tables in insertion order
pub async fn load_catalog(pool: &SqlitePool) -> SwitchgearResult<Catalog> {
    let manufacturers = list_manufacturers(pool).await?;
    let starting_methods = list_starting_methods(pool).await?;

    let rows = sqlx::query(&format!(
        "SELECT {} FROM contactors ORDER BY id ASC",
        CONTACTOR_COLUMNS
    ))
    .fetch_all(pool)
    .await?;
    let contactors = rows
        .iter()
        .map(hydrate_contactor)
        .collect::<SwitchgearResult<Vec<_>>>()?;

    let rows = sqlx::query(&format!(
        "SELECT {} FROM overload_relays ORDER BY id ASC",
        RELAY_COLUMNS
    ))
    .fetch_all(pool)
    .await?;
    let overload_relays = rows
        .iter()
        .map(hydrate_relay)
        .collect::<SwitchgearResult<Vec<_>>>()?;

    Ok(Catalog::new()
        .with_manufacturers(manufacturers)
        .with_starting_methods(starting_methods)
        .with_contactors(contactors)
        .with_overload_relays(overload_relays))
}

/// Row counts per table
pub async fn catalog_summary(pool: &SqlitePool) -> SwitchgearResult<CatalogSummary> {
    let row = sqlx::query(
        r#"
        SELECT
            (SELECT COUNT(*) FROM manufacturers) AS manufacturers,
            (SELECT COUNT(*) FROM starting_methods) AS starting_methods,
            (SELECT COUNT(*) FROM contactors) AS contactors,
            (SELECT COUNT(*) FROM overload_relays) AS overload_relays
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(CatalogSummary {
        manufacturers: row.try_get::<i64, _>("manufacturers")? as usize,
        starting_methods: row.try_get::<i64, _>("starting_methods")? as usize,
        contactors: row.try_get::<i64, _>("contactors")? as usize,
        overload_relays: row.try_get::<i64, _>("overload_relays")? as usize,
    })
}

// ============================================================================
// Row hydration
// ============================================================================

fn hydrate_manufacturer(row: &SqliteRow) -> SwitchgearResult<Manufacturer> {
    Ok(Manufacturer {
        name: row.try_get("name")?,
        country: row.try_get("country")?,
        website: row.try_get("website")?,
    })
}

fn hydrate_starting_method(row: &SqliteRow) -> SwitchgearResult<StartingMethod> {
    Ok(StartingMethod {
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        min_power_hp: row.try_get("min_power_hp")?,
        max_power_hp: row.try_get("max_power_hp")?,
        starting_current_reduction: row.try_get("starting_current_reduction")?,
        starting_torque_reduction: row.try_get("starting_torque_reduction")?,
        complexity_level: row.try_get::<i64, _>("complexity_level")? as u8,
        cost_factor: row.try_get("cost_factor")?,
    })
}

fn hydrate_contactor(row: &SqliteRow) -> SwitchgearResult<Contactor> {
    Ok(Contactor {
        model: row.try_get("model")?,
        manufacturer: row.try_get("manufacturer")?,
        current_rating: row.try_get("current_rating")?,
        voltage_rating: row.try_get::<i64, _>("voltage_rating")? as u32,
        utilization_category: row.try_get("utilization_category")?,
        poles: row.try_get::<i64, _>("poles")? as u32,
        auxiliary_contacts: row.try_get("auxiliary_contacts")?,
        coil_voltage: row
            .try_get::<Option<i64>, _>("coil_voltage")?
            .map(|v| v as u32),
        frame_size: row.try_get("frame_size")?,
        price: row.try_get("price")?,
        image_url: row.try_get("image_url")?,
        datasheet_url: row.try_get("datasheet_url")?,
    })
}

fn hydrate_relay(row: &SqliteRow) -> SwitchgearResult<OverloadRelay> {
    let model: String = row.try_get("model")?;
    let frames_json: String = row.try_get("compatible_contactor_frames")?;
    let compatible_contactor_frames: Vec<String> = serde_json::from_str(&frames_json)
        .map_err(|e| CatalogError::invalid_entry(&model, format!("bad frame list: {}", e)))?;

    Ok(OverloadRelay {
        model,
        manufacturer: row.try_get("manufacturer")?,
        current_range_min: row.try_get("current_range_min")?,
        current_range_max: row.try_get("current_range_max")?,
        trip_class: row.try_get::<i64, _>("trip_class")? as u32,
        reset_type: row.try_get("reset_type")?,
        compatible_contactor_frames,
        price: row.try_get("price")?,
        image_url: row.try_get("image_url")?,
        datasheet_url: row.try_get("datasheet_url")?,
    })
}
