use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Result};

use crate::error::AppError;
use crate::models::{Flash, FlashKind, Session, Task, User};

pub type DbPool = Arc<Mutex<Connection>>;

pub fn init_db(path: &str) -> Result<DbPool> {
    let conn = Connection::open(path)?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT UNIQUE NOT NULL,
            password TEXT NOT NULL,
            created_at INTEGER DEFAULT (strftime('%s', 'now'))
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            user_id INTEGER NOT NULL REFERENCES users(id),
            created_at INTEGER DEFAULT (strftime('%s', 'now'))
        );

        CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            created_at INTEGER DEFAULT (strftime('%s', 'now')),
            expires_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS flashes (
            token TEXT PRIMARY KEY,
            kind TEXT NOT NULL,
            message TEXT NOT NULL,
            created_at INTEGER DEFAULT (strftime('%s', 'now'))
        );
        ",
    )?;

    Ok(Arc::new(Mutex::new(conn)))
}

pub fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

// User operations

/// Inserts a new user. Returns `None` when the email is already taken,
/// whether it existed beforehand or a concurrent insert won the race.
pub fn create_user(
    pool: &DbPool,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<Option<User>, AppError> {
    let conn = pool.lock().unwrap();
    let rows = conn.execute(
        "INSERT INTO users (name, email, password) VALUES (?1, ?2, ?3)
         ON CONFLICT(email) DO NOTHING",
        (name, email, password_hash),
    )?;

    if rows == 0 {
        return Ok(None);
    }

    let id = conn.last_insert_rowid();
    let mut stmt = conn.prepare("SELECT id, name, email, password FROM users WHERE id = ?1")?;
    let user = stmt.query_row([id], |row| {
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            password: row.get(3)?,
        })
    })?;

    Ok(Some(user))
}

pub fn get_user_by_email(pool: &DbPool, email: &str) -> Result<Option<User>, AppError> {
    let conn = pool.lock().unwrap();
    let mut stmt = conn.prepare("SELECT id, name, email, password FROM users WHERE email = ?1")?;
    let mut rows = stmt.query([email])?;

    if let Some(row) = rows.next()? {
        Ok(Some(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            password: row.get(3)?,
        }))
    } else {
        Ok(None)
    }
}

// Session operations

pub fn create_session(pool: &DbPool, session: &Session) -> Result<(), AppError> {
    let conn = pool.lock().unwrap();
    conn.execute(
        "INSERT INTO sessions (token, user_id, expires_at) VALUES (?1, ?2, ?3)",
        (&session.token, session.user_id, session.expires_at),
    )?;
    Ok(())
}

/// Resolves a session token to its user, ignoring expired sessions.
pub fn resolve_session(pool: &DbPool, token: &str) -> Result<Option<User>, AppError> {
    let conn = pool.lock().unwrap();
    let mut stmt = conn.prepare(
        "SELECT u.id, u.name, u.email, u.password
         FROM sessions s JOIN users u ON u.id = s.user_id
         WHERE s.token = ?1 AND s.expires_at > ?2",
    )?;
    let mut rows = stmt.query((token, unix_now()))?;

    if let Some(row) = rows.next()? {
        Ok(Some(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            password: row.get(3)?,
        }))
    } else {
        Ok(None)
    }
}

pub fn delete_session(pool: &DbPool, token: &str) -> Result<(), AppError> {
    let conn = pool.lock().unwrap();
    conn.execute("DELETE FROM sessions WHERE token = ?1", [token])?;
    Ok(())
}

pub fn cleanup_expired_sessions(pool: &DbPool) -> Result<(), AppError> {
    let conn = pool.lock().unwrap();
    conn.execute("DELETE FROM sessions WHERE expires_at < ?1", [unix_now()])?;
    Ok(())
}

// Task operations

pub fn create_task(pool: &DbPool, title: &str, user_id: i64) -> Result<Task, AppError> {
    let conn = pool.lock().unwrap();
    conn.execute(
        "INSERT INTO tasks (title, user_id) VALUES (?1, ?2)",
        (title, user_id),
    )?;
    let id = conn.last_insert_rowid();

    let mut stmt = conn.prepare(
        "SELECT id, title, user_id, created_at FROM tasks WHERE id = ?1 AND user_id = ?2",
    )?;
    let task = stmt.query_row((id, user_id), |row| {
        Ok(Task {
            id: row.get(0)?,
            title: row.get(1)?,
            user_id: row.get(2)?,
            created_at: row.get(3)?,
        })
    })?;

    Ok(task)
}

pub fn list_tasks(pool: &DbPool, user_id: i64) -> Result<Vec<Task>, AppError> {
    let conn = pool.lock().unwrap();
    let mut stmt = conn.prepare(
        "SELECT id, title, user_id, created_at FROM tasks
         WHERE user_id = ?1 ORDER BY created_at DESC, id DESC",
    )?;
    let tasks = stmt
        .query_map([user_id], |row| {
            Ok(Task {
                id: row.get(0)?,
                title: row.get(1)?,
                user_id: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

pub fn get_task(pool: &DbPool, id: i64, user_id: i64) -> Result<Option<Task>, AppError> {
    let conn = pool.lock().unwrap();
    let mut stmt = conn.prepare(
        "SELECT id, title, user_id, created_at FROM tasks WHERE id = ?1 AND user_id = ?2",
    )?;
    let mut rows = stmt.query((id, user_id))?;

    if let Some(row) = rows.next()? {
        Ok(Some(Task {
            id: row.get(0)?,
            title: row.get(1)?,
            user_id: row.get(2)?,
            created_at: row.get(3)?,
        }))
    } else {
        Ok(None)
    }
}

/// Returns the number of rows changed; 0 means the task does not exist or
/// belongs to someone else.
pub fn update_task(
    pool: &DbPool,
    id: i64,
    user_id: i64,
    title: &str,
) -> Result<usize, AppError> {
    let conn = pool.lock().unwrap();
    let rows = conn.execute(
        "UPDATE tasks SET title = ?1 WHERE id = ?2 AND user_id = ?3",
        (title, id, user_id),
    )?;
    Ok(rows)
}

pub fn delete_task(pool: &DbPool, id: i64, user_id: i64) -> Result<usize, AppError> {
    let conn = pool.lock().unwrap();
    let rows = conn.execute(
        "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2",
        (id, user_id),
    )?;
    Ok(rows)
}

// Flash operations

pub fn set_flash(pool: &DbPool, token: &str, flash: &Flash) -> Result<(), AppError> {
    let conn = pool.lock().unwrap();
    conn.execute(
        "INSERT OR REPLACE INTO flashes (token, kind, message) VALUES (?1, ?2, ?3)",
        (token, flash.kind.as_str(), &flash.text),
    )?;
    Ok(())
}

/// Reads and deletes a flash entry in one go; a flash is shown exactly once.
pub fn take_flash(pool: &DbPool, token: &str) -> Result<Option<Flash>, AppError> {
    let conn = pool.lock().unwrap();
    let mut stmt = conn.prepare("SELECT kind, message FROM flashes WHERE token = ?1")?;
    let mut rows = stmt.query([token])?;

    let flash = if let Some(row) = rows.next()? {
        Some(Flash {
            kind: FlashKind::parse(&row.get::<_, String>(0)?),
            text: row.get(1)?,
        })
    } else {
        None
    };
    drop(rows);
    drop(stmt);

    if flash.is_some() {
        conn.execute("DELETE FROM flashes WHERE token = ?1", [token])?;
    }

    Ok(flash)
}

/// Drops flash entries whose cookie most likely never came back.
pub fn cleanup_stale_flashes(pool: &DbPool) -> Result<(), AppError> {
    let conn = pool.lock().unwrap();
    conn.execute(
        "DELETE FROM flashes WHERE created_at < ?1",
        [unix_now() - 600],
    )?;
    Ok(())
}
