//! Demo mode with a pre-populated movie database.
//!
//! Gives the filter syntax something to work on: UUID primary keys stored as
//! `BINARY(16)`, timestamps spread over the past year and a screenings table
//! large enough to exercise adaptive page sizing.

use rusqlite::{params, Connection};
use uuid::Uuid;

/// Rows in the `screenings` table.
pub const SCREENING_COUNT: usize = 12_000;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS genres (
    id BINARY(16) PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS directors (
    id BINARY(16) PRIMARY KEY,
    name TEXT NOT NULL,
    birth_year INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS movies (
    id BINARY(16) PRIMARY KEY,
    title TEXT NOT NULL,
    year INTEGER NOT NULL,
    rating REAL NOT NULL,
    genre_id BINARY(16) NOT NULL REFERENCES genres(id),
    director_id BINARY(16) NOT NULL REFERENCES directors(id),
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS screenings (
    id INTEGER PRIMARY KEY,
    movie_id BINARY(16) NOT NULL REFERENCES movies(id),
    cinema TEXT NOT NULL,
    seats_sold INTEGER NOT NULL,
    starts_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_movies_year ON movies(year);
CREATE INDEX IF NOT EXISTS idx_screenings_starts_at ON screenings(starts_at);
"#;

const CINEMAS: [&str; 6] = [
    "Odeon Leicester Square",
    "Prince Charles Cinema",
    "Curzon Soho",
    "BFI Southbank",
    "Electric Cinema",
    "Rio Dalston",
];

/// Create the demo tables and fill them. Existing demo tables are left
/// untouched.
pub fn seed(conn: &Connection) -> rusqlite::Result<()> {
    let already_seeded: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'movies'",
        [],
        |row| row.get(0),
    )?;
    if already_seeded > 0 {
        tracing::info!("demo tables already present, skipping seed");
        return Ok(());
    }

    conn.execute_batch(SCHEMA)?;
    let tx = conn.unchecked_transaction()?;

    let genres = ["Action", "Drama", "Sci-Fi", "Comedy", "Thriller"];
    let genre_ids = new_ids(genres.len());
    {
        let mut stmt = tx.prepare("INSERT INTO genres (id, name) VALUES (?1, ?2)")?;
        for (name, id) in genres.iter().zip(&genre_ids) {
            stmt.execute(params![id.as_bytes().as_slice(), name])?;
        }
    }

    let directors = [
        ("Christopher Nolan", 1970),
        ("Quentin Tarantino", 1963),
        ("Steven Spielberg", 1946),
        ("Martin Scorsese", 1942),
        ("Denis Villeneuve", 1967),
    ];
    let director_ids = new_ids(directors.len());
    {
        let mut stmt =
            tx.prepare("INSERT INTO directors (id, name, birth_year) VALUES (?1, ?2, ?3)")?;
        for ((name, birth_year), id) in directors.iter().zip(&director_ids) {
            stmt.execute(params![id.as_bytes().as_slice(), name, birth_year])?;
        }
    }

    // (title, year, rating, director, genre, added days ago)
    let movies = [
        ("Inception", 2010, 8.8, 0, 2, 2),
        ("Pulp Fiction", 1994, 8.9, 1, 4, 5),
        ("Schindler's List", 1993, 9.0, 2, 1, 11),
        ("Goodfellas", 1990, 8.7, 3, 1, 20),
        ("Dune", 2021, 8.0, 4, 2, 33),
        ("The Dark Knight", 2008, 9.0, 0, 0, 47),
        ("Django Unchained", 2012, 8.4, 1, 0, 90),
        ("Saving Private Ryan", 1998, 8.6, 2, 1, 150),
        ("The Wolf of Wall Street", 2013, 8.2, 3, 3, 240),
        ("Arrival", 2016, 7.9, 4, 2, 400),
    ];
    let movie_ids = new_ids(movies.len());
    {
        let mut stmt = tx.prepare(
            "INSERT INTO movies (id, title, year, rating, genre_id, director_id, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, datetime('now', ?7))",
        )?;
        for ((title, year, rating, director, genre, days_ago), id) in movies.iter().zip(&movie_ids)
        {
            stmt.execute(params![
                id.as_bytes().as_slice(),
                title,
                year,
                rating,
                genre_ids[*genre].as_bytes().as_slice(),
                director_ids[*director].as_bytes().as_slice(),
                format!("-{} days", days_ago),
            ])?;
        }
    }

    {
        let mut stmt = tx.prepare(
            "INSERT INTO screenings (movie_id, cinema, seats_sold, starts_at) \
             VALUES (?1, ?2, ?3, datetime('now', ?4))",
        )?;
        for i in 0..SCREENING_COUNT {
            let movie = &movie_ids[i % movie_ids.len()];
            let cinema = CINEMAS[i % CINEMAS.len()];
            let seats_sold = (i * 37) % 250;
            let hours_ago = i % (24 * 365);
            stmt.execute(params![
                movie.as_bytes().as_slice(),
                cinema,
                seats_sold as i64,
                format!("-{} hours", hours_ago),
            ])?;
        }
    }

    tx.commit()?;
    tracing::info!(
        movies = movies.len(),
        screenings = SCREENING_COUNT,
        "seeded demo database"
    );
    Ok(())
}

fn new_ids(count: usize) -> Vec<Uuid> {
    (0..count).map(|_| Uuid::new_v4()).collect()
}
