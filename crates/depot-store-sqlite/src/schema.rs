//! SQL schema for the Depot SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Sites are never deleted; `active = 0` soft-deactivates them.
CREATE TABLE IF NOT EXISTS sites (
    site_id             TEXT PRIMARY KEY,
    name                TEXT NOT NULL CHECK (trim(name) != ''),
    street_address      TEXT NOT NULL CHECK (trim(street_address) != ''),
    city                TEXT NOT NULL CHECK (trim(city) != ''),
    county              TEXT NOT NULL CHECK (trim(county) != ''),
    state               TEXT,
    website             TEXT,
    facebook            TEXT,
    hours               TEXT,
    contact_name        TEXT,
    contact_email       TEXT,
    contact_number      TEXT,
    additional_contacts TEXT,
    bad_numbers         TEXT,
    receiving_notes     TEXT,
    onboarded           INTEGER NOT NULL DEFAULT 0,
    active              INTEGER NOT NULL DEFAULT 1,
    accepting_donations INTEGER NOT NULL DEFAULT 1,
    site_type           TEXT NOT NULL,   -- canonical SiteType name
    max_supply_load     TEXT,            -- canonical MaxSupplyLoad name
    has_forklift        INTEGER NOT NULL DEFAULT 0,
    has_loading_dock    INTEGER NOT NULL DEFAULT 0,
    has_indoor_storage  INTEGER NOT NULL DEFAULT 0,
    created_at          TEXT NOT NULL,
    updated_at          TEXT NOT NULL
);

-- Items are append-only. `name_key` is the lower-cased name and is the
-- source of truth for case-insensitive uniqueness.
CREATE TABLE IF NOT EXISTS items (
    item_id    TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    name_key   TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

-- One row per (site, item) pair, created on first activation and kept
-- forever. An inactive row never carries a status.
CREATE TABLE IF NOT EXISTS site_items (
    site_id     TEXT NOT NULL REFERENCES sites(site_id),
    item_id     TEXT NOT NULL REFERENCES items(item_id),
    active      INTEGER NOT NULL,
    status      TEXT,                    -- canonical UrgencyStatus name
    external_id INTEGER,                 -- upstream feed correlation id
    updated_at  TEXT NOT NULL,
    PRIMARY KEY (site_id, item_id),
    CHECK (active IN (0, 1)),
    CHECK ((active = 1) = (status IS NOT NULL))
);

-- Strictly append-only; `seq` fixes insertion order.
CREATE TABLE IF NOT EXISTS site_item_audit (
    seq         INTEGER PRIMARY KEY AUTOINCREMENT,
    audit_id    TEXT NOT NULL UNIQUE,
    site_id     TEXT NOT NULL REFERENCES sites(site_id),
    item_id     TEXT NOT NULL REFERENCES items(item_id),
    active      INTEGER NOT NULL,
    status      TEXT,
    recorded_at TEXT NOT NULL
);

CREATE TRIGGER IF NOT EXISTS site_item_audit_no_update
BEFORE UPDATE ON site_item_audit
BEGIN
    SELECT RAISE(ABORT, 'site_item_audit is append-only');
END;

CREATE TRIGGER IF NOT EXISTS site_item_audit_no_delete
BEFORE DELETE ON site_item_audit
BEGIN
    SELECT RAISE(ABORT, 'site_item_audit is append-only');
END;

CREATE INDEX IF NOT EXISTS sites_name_idx       ON sites(name);
CREATE INDEX IF NOT EXISTS site_items_item_idx  ON site_items(item_id);
CREATE INDEX IF NOT EXISTS audit_site_idx       ON site_item_audit(site_id);

PRAGMA user_version = 1;
";
