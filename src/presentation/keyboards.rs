use crate::{
    models::{MovieId, MovieSummary},
    presentation::{truncate, Button, Keyboard},
    services::library::MovieStatus,
};

/// Result lists never show more buttons than this
pub const MAX_RESULT_BUTTONS: usize = 10;

const MAX_LABEL_LEN: usize = 60;

pub fn main_menu_button() -> Button {
    Button::new("🏠 Main Menu", "main_menu")
}

pub fn main_menu() -> Keyboard {
    vec![vec![main_menu_button()]]
}

/// `Title (Year) ⭐rating`, shortened to fit a button
pub fn movie_label(movie: &MovieSummary) -> String {
    let mut label = movie.title.clone();
    if let Some(year) = movie.year() {
        label.push_str(&format!(" ({})", year));
    }
    if movie.vote_average > 0.0 {
        label.push_str(&format!(" ⭐{}", movie.vote_average));
    }
    truncate(&label, MAX_LABEL_LEN)
}

/// One button per movie (up to [`MAX_RESULT_BUTTONS`]) and a menu row
pub fn movie_list(movies: &[MovieSummary]) -> Keyboard {
    let mut keyboard: Keyboard = movies
        .iter()
        .take(MAX_RESULT_BUTTONS)
        .map(|movie| vec![Button::new(movie_label(movie), format!("movie_{}", movie.id))])
        .collect();

    keyboard.push(vec![main_menu_button()]);
    keyboard
}

/// Actions under a movie card
///
/// Watch history is append-only, so a watched movie has no undo button.
pub fn movie_details(movie_id: MovieId, status: MovieStatus, has_trailer: bool) -> Keyboard {
    let mut keyboard = Vec::with_capacity(5);

    keyboard.push(vec![if status.is_favorite {
        Button::new("💔 Remove from Favorites", format!("unfav_{}", movie_id))
    } else {
        Button::new("❤️ Add to Favorites", format!("fav_{}", movie_id))
    }]);

    if !status.is_watched {
        keyboard.push(vec![Button::new(
            "✅ Mark as Watched",
            format!("watched_{}", movie_id),
        )]);
    }

    keyboard.push(vec![Button::new(
        "🎯 Similar Movies",
        format!("similar_{}", movie_id),
    )]);

    if has_trailer {
        keyboard.push(vec![Button::new(
            "🎥 Watch Trailer",
            format!("trailer_{}", movie_id),
        )]);
    }

    keyboard.push(vec![
        Button::new("🔙 Back to Search", "back_search"),
        main_menu_button(),
    ]);

    keyboard
}
