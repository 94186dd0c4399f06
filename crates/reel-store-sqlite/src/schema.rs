//! SQL schema for the Reel SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id         TEXT PRIMARY KEY,
    username        TEXT NOT NULL,
    email           TEXT NOT NULL,     -- trimmed, lowercased
    password_hash   TEXT NOT NULL,     -- argon2 PHC string
    display_name    TEXT,
    favorite_genres TEXT NOT NULL DEFAULT '[]',
    avatar_url      TEXT,
    bio             TEXT,
    joined_at       TEXT NOT NULL,
    deleted_at      TEXT               -- set when the account is purged
);

CREATE UNIQUE INDEX IF NOT EXISTS users_live_email_idx
    ON users(email) WHERE deleted_at IS NULL;

-- aggregate_rating / rating_count are written only by the rating units.
CREATE TABLE IF NOT EXISTS movies (
    movie_id         TEXT PRIMARY KEY,
    title            TEXT NOT NULL,
    genres           TEXT NOT NULL DEFAULT '[]',
    release_year     INTEGER,
    director         TEXT,
    cast_members     TEXT NOT NULL DEFAULT '[]',
    synopsis         TEXT,
    poster_url       TEXT,
    aggregate_rating REAL    NOT NULL DEFAULT 0,
    rating_count     INTEGER NOT NULL DEFAULT 0,
    created_at       TEXT NOT NULL
);

-- Reviews are soft-deleted: withdrawn rows stay for history.
CREATE TABLE IF NOT EXISTS reviews (
    review_id    TEXT PRIMARY KEY,
    movie_id     TEXT NOT NULL REFERENCES movies(movie_id),
    user_id      TEXT NOT NULL REFERENCES users(user_id),
    score        INTEGER NOT NULL CHECK (score BETWEEN 1 AND 5),
    content      TEXT,
    created_at   TEXT NOT NULL,
    updated_at   TEXT,
    withdrawn_at TEXT
);

-- One active review per (movie, user).
CREATE UNIQUE INDEX IF NOT EXISTS reviews_active_pair_idx
    ON reviews(movie_id, user_id) WHERE withdrawn_at IS NULL;
CREATE INDEX IF NOT EXISTS reviews_user_idx ON reviews(user_id);

CREATE TABLE IF NOT EXISTS watchlist (
    user_id  TEXT NOT NULL REFERENCES users(user_id),
    movie_id TEXT NOT NULL REFERENCES movies(movie_id),
    added_at TEXT NOT NULL,
    watched  INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (user_id, movie_id)
);

CREATE TABLE IF NOT EXISTS sessions (
    token_hash TEXT PRIMARY KEY,       -- hex SHA-256 of the bearer token
    user_id    TEXT NOT NULL REFERENCES users(user_id),
    created_at TEXT NOT NULL,
    expires_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS sessions_user_idx ON sessions(user_id);

PRAGMA user_version = 1;
";
