use rusqlite::Connection;
use std::path::Path;

pub const DB_FILE_NAME: &str = "gradexa.sqlite3";

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join(DB_FILE_NAME);
    let conn = Connection::open(db_path)?;
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS profiles(
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT,
            birthday TEXT,
            theme TEXT NOT NULL DEFAULT 'dark'
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS subjects(
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            sort_order INTEGER NOT NULL,
            FOREIGN KEY(user_id) REFERENCES profiles(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_subjects_user ON subjects(user_id, sort_order)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS marks(
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            subject TEXT NOT NULL,
            mcq REAL,
            essay REAL,
            note TEXT,
            created_seq INTEGER NOT NULL,
            FOREIGN KEY(user_id) REFERENCES profiles(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_marks_user_seq ON marks(user_id, created_seq)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS todos(
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            title TEXT NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0,
            priority TEXT NOT NULL DEFAULT 'Medium',
            created_seq INTEGER NOT NULL,
            FOREIGN KEY(user_id) REFERENCES profiles(id)
        )",
        [],
    )?;
    // Stores created before priorities shipped lack the column. Add and
    // default existing rows to Medium.
    ensure_todos_priority(&conn)?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_todos_user_seq ON todos(user_id, created_seq)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS study_sessions(
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            subject TEXT NOT NULL,
            target_minutes INTEGER NOT NULL,
            actual_minutes INTEGER NOT NULL,
            session_date TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES profiles(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_study_sessions_user_date
         ON study_sessions(user_id, session_date)",
        [],
    )?;

    Ok(conn)
}

fn ensure_todos_priority(conn: &Connection) -> anyhow::Result<()> {
    if table_has_column(conn, "todos", "priority")? {
        return Ok(());
    }
    conn.execute(
        "ALTER TABLE todos ADD COLUMN priority TEXT NOT NULL DEFAULT 'Medium'",
        [],
    )?;
    Ok(())
}

/// Next creation-sequence value for a per-user ordered table. The sequence is
/// the chronological surrogate the charts order by; it only ever grows.
pub fn next_created_seq(conn: &Connection, table: &str, user_id: &str) -> anyhow::Result<i64> {
    let sql = format!(
        "SELECT COALESCE(MAX(created_seq), 0) + 1 FROM {} WHERE user_id = ?",
        table
    );
    let next: i64 = conn.query_row(&sql, [user_id], |r| r.get(0))?;
    Ok(next)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> anyhow::Result<bool> {
    let sql = format!("PRAGMA table_info({})", table);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}
