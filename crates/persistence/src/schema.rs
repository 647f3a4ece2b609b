//! Database schema definitions

/// SQL to create all tables
/// NOTE: All amounts stored as TEXT to preserve rust_decimal::Decimal precision
pub const CREATE_TABLES: &str = r#"
-- One summary row per analyzed dataset + period (latest run wins)
CREATE TABLE IF NOT EXISTS analysis_runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    dataset TEXT NOT NULL,
    period TEXT NOT NULL,
    store_count INTEGER NOT NULL DEFAULT 0,
    excluded_count INTEGER NOT NULL DEFAULT 0,
    loss_store_count INTEGER NOT NULL DEFAULT 0,
    total_sales TEXT NOT NULL DEFAULT '0',
    total_direct_profit TEXT NOT NULL DEFAULT '0',
    max_sales_per_area TEXT,
    min_sales_per_area TEXT,
    avg_profit_sales_per_area TEXT,
    breakeven_threshold TEXT,
    avg_yoy TEXT,
    stats_json TEXT,
    analyzed_at INTEGER DEFAULT (strftime('%s', 'now')),
    UNIQUE(dataset, period)
);

-- Analyst free-text notes, store_code '' marks a dashboard-level note
CREATE TABLE IF NOT EXISTS analyst_notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    dataset TEXT NOT NULL,
    period TEXT NOT NULL,
    store_code TEXT NOT NULL DEFAULT '',
    body TEXT NOT NULL,
    updated_at INTEGER DEFAULT (strftime('%s', 'now')),
    UNIQUE(dataset, period, store_code)
);

-- ========== INDEXES ==========

CREATE INDEX IF NOT EXISTS idx_runs_dataset ON analysis_runs(dataset, period DESC);
CREATE INDEX IF NOT EXISTS idx_notes_scope ON analyst_notes(dataset, period)
"#;

/// Additive column migrations, applied after CREATE_TABLES
pub const MIGRATIONS: &[&str] = &["ALTER TABLE analyst_notes ADD COLUMN author TEXT"];
