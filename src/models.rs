use chrono::{Datelike, Local};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

pub const GENRE_OPTIONS: [&str; 10] = [
    "",
    "Action",
    "Comedy",
    "Drama",
    "Horror",
    "Romance",
    "Sci-Fi",
    "Thriller",
    "Documentary",
    "Animation",
];

pub const FIRST_YEAR: i32 = 1980;
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

// Kept in whatever shape the backend sent so it is echoed back unchanged.
// Equality and hashing go through the printed form: `Int(42)` == `Text("42")`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MovieId {
    Int(i64),
    Text(String),
}

impl PartialEq for MovieId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (MovieId::Int(a), MovieId::Int(b)) => a == b,
            (MovieId::Text(a), MovieId::Text(b)) => a == b,
            (MovieId::Int(n), MovieId::Text(s)) | (MovieId::Text(s), MovieId::Int(n)) => {
                *s == n.to_string()
            }
        }
    }
}

impl Eq for MovieId {}

impl Hash for MovieId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovieId::Int(n) => write!(f, "{}", n),
            MovieId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MovieId {
    fn from(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(n) => MovieId::Int(n),
            Err(_) => MovieId::Text(s.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub genre: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub release_year: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub notes: String,
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: u8,
    #[serde(default)]
    pub watched: bool,
    #[serde(default)]
    pub is_favorite: bool,
}

impl Movie {
    pub fn with_watched_flipped(&self) -> Movie {
        Movie {
            watched: !self.watched,
            ..self.clone()
        }
    }

    pub fn with_favorite_flipped(&self) -> Movie {
        Movie {
            is_favorite: !self.is_favorite,
            ..self.clone()
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MovieForm {
    pub title: String,
    pub genre: String,
    pub release_year: String,
    pub notes: String,
    pub rating: u8,
}

impl Default for MovieForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            genre: String::new(),
            release_year: String::new(),
            notes: String::new(),
            rating: MIN_RATING,
        }
    }
}

impl From<&Movie> for MovieForm {
    fn from(movie: &Movie) -> Self {
        Self {
            title: movie.title.clone(),
            genre: movie.genre.clone(),
            release_year: movie.release_year.clone(),
            notes: movie.notes.clone(),
            rating: movie.rating,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoginResponse {
    pub username: String,
    pub token: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct ErrorBody {
    pub error: Option<String>,
}

pub fn year_options() -> Vec<String> {
    year_options_until(Local::now().year())
}

pub fn year_options_until(last_year: i32) -> Vec<String> {
    std::iter::once(String::new())
        .chain((FIRST_YEAR..=last_year).map(|y| y.to_string()))
        .collect()
}

pub fn is_known_genre(genre: &str) -> bool {
    GENRE_OPTIONS.contains(&genre)
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

// Unparseable or missing ratings read as 0 stars rather than failing the list.
fn lenient_rating<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let parsed = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed
        .filter(|r| r.is_finite())
        .map(|r| r.round().clamp(0.0, f64::from(MAX_RATING)) as u8)
        .unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_loose_backend_shapes() {
        let value = json!({
            "id": 7,
            "title": "Heat",
            "genre": null,
            "release_year": 1995,
            "rating": 5
        });
        let movie: Movie = serde_json::from_value(value).expect("movie deserialize");
        assert_eq!(movie.id, MovieId::Int(7));
        assert_eq!(movie.genre, "");
        assert_eq!(movie.release_year, "1995");
        assert_eq!(movie.notes, "");
        assert!(!movie.watched);
        assert!(!movie.is_favorite);
    }

    #[test]
    fn string_ids_round_trip_verbatim() {
        let movie: Movie = serde_json::from_value(json!({
            "id": "65f0c0ffee",
            "title": "Alien",
            "rating": 4,
            "watched": true
        }))
        .expect("movie deserialize");
        assert_eq!(movie.id, MovieId::Text("65f0c0ffee".to_string()));
        let back = serde_json::to_value(&movie).expect("serialize");
        assert_eq!(back["id"], json!("65f0c0ffee"));
        assert_eq!(back["watched"], json!(true));
    }

    #[test]
    fn flipping_touches_a_single_flag() {
        let movie = Movie {
            id: MovieId::Int(1),
            title: "Dune".to_string(),
            genre: "Sci-Fi".to_string(),
            release_year: "2021".to_string(),
            notes: "sand".to_string(),
            rating: 4,
            watched: false,
            is_favorite: true,
        };
        let watched = movie.with_watched_flipped();
        assert!(watched.watched);
        assert_eq!(
            Movie {
                watched: false,
                ..watched
            },
            movie
        );
        let fav = movie.with_favorite_flipped();
        assert!(!fav.is_favorite);
        assert_eq!(fav.watched, movie.watched);
    }

    #[test]
    fn form_defaults_to_one_star() {
        let form = MovieForm::default();
        assert_eq!(form.rating, 1);
        assert!(form.title.is_empty());
    }

    #[test]
    fn year_options_start_blank_then_1980() {
        let years = year_options_until(1983);
        assert_eq!(years, vec!["", "1980", "1981", "1982", "1983"]);
        let current = year_options();
        assert_eq!(current.first().map(String::as_str), Some(""));
        assert_eq!(current.get(1).map(String::as_str), Some("1980"));
        assert_eq!(
            current.last().cloned(),
            Some(Local::now().year().to_string())
        );
    }

    #[test]
    fn digit_string_ids_match_cli_ids() {
        let movie: Movie = serde_json::from_value(json!({
            "id": "42",
            "title": "Blade Runner",
            "rating": 5
        }))
        .expect("movie deserialize");
        assert_eq!(movie.id, MovieId::Text("42".to_string()));
        assert_eq!(movie.id, MovieId::from("42"));
        assert_ne!(movie.id, MovieId::from("420"));

        let mut seen = std::collections::HashSet::new();
        seen.insert(MovieId::Int(42));
        assert!(seen.contains(&movie.id));
        // Still echoed back as a string.
        assert_eq!(serde_json::to_value(&movie).unwrap()["id"], json!("42"));
    }

    #[test]
    fn loose_ratings_never_reject_the_list() {
        let movies: Vec<Movie> = serde_json::from_value(json!([
            { "id": 1, "title": "Ok", "rating": 4 },
            { "id": 2, "title": "No rating yet", "rating": null },
            { "id": 3, "title": "Missing" },
            { "id": 4, "title": "Stringly", "rating": "3" },
            { "id": 5, "title": "Too high", "rating": 11 },
            { "id": 6, "title": "Negative", "rating": -2 },
            { "id": 7, "title": "Garbage", "rating": "lots" },
            { "id": 8, "title": "Float", "rating": 4.0 }
        ]))
        .expect("whole list parses");
        let ratings: Vec<u8> = movies.iter().map(|m| m.rating).collect();
        assert_eq!(ratings, vec![4, 0, 0, 3, 5, 0, 0, 4]);
    }

    #[test]
    fn movie_id_parses_numbers_first() {
        assert_eq!(MovieId::from("42"), MovieId::Int(42));
        assert_eq!(MovieId::from("abc"), MovieId::Text("abc".to_string()));
        assert_eq!(MovieId::Int(42).to_string(), "42");
    }
}
