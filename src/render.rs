use crate::models::{Movie, MAX_RATING};

const FILLED_STAR: char = '★';
const EMPTY_STAR: char = '☆';

pub fn rating_stars(rating: u8) -> String {
    (0..MAX_RATING)
        .map(|i| if i < rating { FILLED_STAR } else { EMPTY_STAR })
        .collect()
}

pub fn status_icon(movie: &Movie) -> &'static str {
    if movie.watched {
        "✅"
    } else {
        "⏳"
    }
}

pub fn watched_label(movie: &Movie) -> &'static str {
    if movie.watched {
        "Mark Unwatched"
    } else {
        "Mark Watched"
    }
}

pub fn favorite_label(movie: &Movie) -> &'static str {
    if movie.is_favorite {
        "★ Favorite"
    } else {
        "☆ Favorite"
    }
}

fn or_fallback<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

pub fn heading(movie: &Movie) -> String {
    format!(
        "{} {} ({})",
        status_icon(movie),
        movie.title,
        or_fallback(&movie.release_year, "N/A")
    )
}

pub fn render_card(movie: &Movie) -> String {
    let lines = [
        heading(movie),
        format!("   🎭 {}", or_fallback(&movie.genre, "Genre not specified")),
        format!("   📝 {}", or_fallback(&movie.notes, "No additional notes")),
        format!("   {}", rating_stars(movie.rating)),
        format!(
            "   id {} · [{}] [Edit] [{}] [Delete]",
            movie.id,
            watched_label(movie),
            favorite_label(movie)
        ),
    ];
    lines.join("\n")
}

pub fn render_list(movies: &[Movie]) -> String {
    if movies.is_empty() {
        return "No movies yet.".to_string();
    }
    movies
        .iter()
        .map(render_card)
        .collect::<Vec<_>>()
        .join("\n\n")
}
