use crate::{
    error::AppError,
    models::{
        DiscoverFilters, FavoriteEntry, Genre, MovieDetails, Recommendations, TimeWindow, User,
        UserSettings, UserStats, WatchHistoryEntry,
    },
    presentation::truncate,
};

const MAX_OVERVIEW_LEN: usize = 300;
const MAX_CARD_GENRES: usize = 3;

/// Formats an integer with comma thousands separators
fn thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn movie_card(movie: &MovieDetails) -> String {
    let summary = &movie.summary;
    let mut text = format!("🎬 **{}**", summary.title);
    if let Some(year) = summary.year() {
        text.push_str(&format!(" ({})", year));
    }
    text.push_str("\n\n");

    if summary.vote_average > 0.0 {
        let stars = "⭐".repeat((summary.vote_average / 2.0) as usize);
        text.push_str(&format!(
            "{} **{}/10** ({} votes)\n",
            stars,
            summary.vote_average,
            thousands(summary.vote_count)
        ));
    }

    if !movie.genres.is_empty() {
        let genres: Vec<&str> = movie
            .genres
            .iter()
            .take(MAX_CARD_GENRES)
            .map(String::as_str)
            .collect();
        text.push_str(&format!("🎭 {}\n", genres.join(", ")));
    }

    if let Some(runtime) = movie.runtime.filter(|&r| r > 0) {
        text.push_str(&format!("⏱ {}h {}m\n", runtime / 60, runtime % 60));
    }

    let overview = summary
        .overview
        .as_deref()
        .filter(|o| !o.trim().is_empty())
        .unwrap_or("No description available.");
    text.push_str(&format!("\n{}", truncate(overview, MAX_OVERVIEW_LEN)));

    text
}

pub fn search_results_header(query: &str, count: usize) -> String {
    format!(
        "🔍 **Search Results for:** _{}_\n\nFound {} movie(s). Tap to see details! 👇",
        query, count
    )
}

pub fn no_results(query: &str) -> String {
    format!(
        "😕 **No Results Found**\n\n\
         Sorry, couldn't find any movies matching:\n_{}_\n\n\
         Try:\n• Different spelling\n• Original title\n• Partial name\n\
         • Use 🔥 Trending to discover movies!",
        query
    )
}

pub fn recommendations_header(recs: &Recommendations) -> String {
    if recs.movies.is_empty() {
        return "🎯 **Personalized Recommendations**\n\n\
                You've already seen everything I could find for you! 🎬\n\
                Try adding a few more favorites from a different genre."
            .to_string();
    }

    if recs.personalized {
        format!(
            "🎯 **Personalized Recommendations**\n\n\
             Based on your favorites! ❤️\n\
             You might like these {} movies 🎬\nTap to see details 👇",
            recs.movies.len()
        )
    } else {
        format!(
            "🎯 **Popular Right Now**\n\n\
             I need to learn your taste first! 😊\n\
             Add movies you like to ❤️ Favorites for personal picks.\n\
             Meanwhile, here are {} popular movies 👇",
            recs.movies.len()
        )
    }
}

pub fn popular_header(page: u32, count: usize) -> String {
    format!(
        "⭐ **Popular Movies** (page {})\n\n{} movies everyone is watching 👇",
        page.max(1),
        count
    )
}

pub fn trending_header(window: TimeWindow, count: usize) -> String {
    let period = match window {
        TimeWindow::Day => "Today",
        TimeWindow::Week => "This Week",
    };
    format!("🔥 **Trending {}**\n\n{} movies 👇", period, count)
}

pub fn similar_header(count: usize) -> String {
    if count == 0 {
        return "🎯 **Similar Movies**\n\nNo similar movies found for this one. 🎬".to_string();
    }
    format!(
        "🎯 **Similar Movies**\n\nMovies similar to your selection! 🎬\nFound {} recommendations 👇",
        count
    )
}

pub fn genres_list(genres: &[Genre]) -> String {
    let names: Vec<String> = genres.iter().map(|g| format!("• {}", g.name)).collect();
    format!("🎭 **Genres**\n\n{}", names.join("\n"))
}

/// `Genres: 2 selected | Years: 2000-2010 | Rating: 7+`
fn filter_summary(filters: &DiscoverFilters) -> String {
    let mut parts = Vec::with_capacity(3);
    if !filters.genres.is_empty() {
        parts.push(format!("Genres: {} selected", filters.genres.len()));
    }
    match (filters.year_from, filters.year_to) {
        (Some(from), Some(to)) => parts.push(format!("Years: {}-{}", from, to)),
        (Some(from), None) => parts.push(format!("Years: {}+", from)),
        (None, Some(to)) => parts.push(format!("Years: up to {}", to)),
        (None, None) => {}
    }
    if let Some(rating) = filters.min_rating {
        parts.push(format!("Rating: {}+", rating));
    }
    if parts.is_empty() {
        return "Any".to_string();
    }
    parts.join(" | ")
}

pub fn discover_header(filters: &DiscoverFilters, count: usize) -> String {
    if count == 0 {
        return "😕 **No Results**\n\n\
                No movies match your filters.\n\
                Try adjusting your criteria!"
            .to_string();
    }
    format!(
        "🔍 **Advanced Search Results**\n\n\
         Filters: {}\n\
         Found {} movies! 🎬\n\
         Tap to see details 👇",
        filter_summary(filters),
        count
    )
}

pub fn settings(settings: &UserSettings) -> String {
    format!(
        "⚙️ **Settings**\n\n⭐ Min Rating: {}/10\n\n\
         Filtered searches skip movies rated below this.",
        settings.min_rating
    )
}

pub fn min_rating_updated(settings: &UserSettings) -> String {
    format!("⭐ Min rating set to {}/10!", settings.min_rating)
}

pub fn favorites_list(favorites: &[FavoriteEntry]) -> String {
    if favorites.is_empty() {
        return "❤️ **My Favorites**\n\n\
                You haven't added any favorites yet! 😢\n\n\
                Search for a movie and tap ❤️ Add to Favorites."
            .to_string();
    }
    format!(
        "❤️ **My Favorites**\n\nYou have {} favorite movie(s) 👇",
        favorites.len()
    )
}

pub fn watch_history(history: &[WatchHistoryEntry]) -> String {
    if history.is_empty() {
        return "🎬 **Watch History**\n\nNothing here yet. Mark movies as ✅ watched to track them."
            .to_string();
    }
    format!(
        "🎬 **Watch History**\n\nYou've watched {} movie(s) 👇",
        history.len()
    )
}

pub fn favorite_added(title: &str, changed: bool) -> String {
    if changed {
        format!("❤️ **{}** added to your favorites!", title)
    } else {
        format!("**{}** is already in your favorites.", title)
    }
}

pub fn favorite_removed(removed: bool) -> String {
    if removed {
        "💔 Removed from your favorites.".to_string()
    } else {
        "That movie wasn't in your favorites.".to_string()
    }
}

pub fn marked_watched(title: &str, changed: bool) -> String {
    if changed {
        format!("✅ **{}** marked as watched!", title)
    } else {
        format!("**{}** is already in your watch history.", title)
    }
}

pub fn welcome(user: &User, stats: &UserStats, is_new: bool) -> String {
    if is_new {
        return format!(
            "👋 Hello, {}!\n\n\
             Welcome to **MovieMate** - your personal movie recommendation assistant! 🎬\n\n\
             I can help you:\n\
             🔍 Search for movies\n\
             🎯 Get personalized recommendations\n\
             ⭐ Discover popular and trending content\n\
             ❤️ Save your favorites\n\
             📊 Track your watch history\n\n\
             Ready to find your next favorite movie? 🍿",
            user.first_name
        );
    }
    format!(
        "👋 Welcome back, {}!\n\n{}\n\nWhat would you like to watch today? 🍿",
        user.first_name,
        stats_block(stats)
    )
}

fn stats_block(stats: &UserStats) -> String {
    format!(
        "📊 **Your Stats:**\n• Favorites: {} ❤️\n• Watched: {} 🎬\n• Searches: {} 🔍",
        stats.favorites, stats.watched, stats.searches
    )
}

pub fn stats(user: &User, stats: &UserStats) -> String {
    format!(
        "{}\n\nMember since {}",
        stats_block(stats),
        user.created_at.format("%B %-d, %Y")
    )
}

/// User-facing text for a failed command
pub fn error_message(error: &AppError) -> String {
    match error {
        AppError::NotFound(msg) => format!("❌ {}", msg),
        AppError::InvalidInput(msg) => format!("⚠️ {}", msg),
        AppError::CatalogUnavailable
        | AppError::RateLimited
        | AppError::Timeout
        | AppError::ExternalApi(_)
        | AppError::HttpClient(_) => {
            "❌ **Oops!**\n\nThe movie catalog is temporarily unavailable.\nPlease try again later! 🎬"
                .to_string()
        }
        _ => "❌ Sorry, something went wrong. Please try again later.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::movie;
    use chrono::{TimeZone, Utc};

    fn details() -> MovieDetails {
        let mut summary = movie(27205, &[28, 878]);
        summary.title = "Inception".to_string();
        summary.vote_average = 8.4;
        summary.vote_count = 35127;
        summary.overview = Some("x".repeat(400));
        MovieDetails {
            summary,
            genres: vec![
                "Action".to_string(),
                "Science Fiction".to_string(),
                "Adventure".to_string(),
                "Thriller".to_string(),
            ],
            runtime: Some(148),
            tagline: None,
            imdb_id: None,
            homepage: None,
        }
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(35127), "35,127");
        assert_eq!(thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_movie_card() {
        let card = movie_card(&details());

        assert!(card.starts_with("🎬 **Inception** (2010)"));
        assert!(card.contains("⭐⭐⭐⭐ **8.4/10** (35,127 votes)"));
        assert!(card.contains("🎭 Action, Science Fiction, Adventure\n"));
        assert!(!card.contains("Thriller"));
        assert!(card.contains("⏱ 2h 28m"));

        let overview = card.rsplit('\n').next().unwrap();
        assert_eq!(overview.chars().count(), 300);
        assert!(overview.ends_with("..."));
    }

    #[test]
    fn test_movie_card_without_overview() {
        let mut movie = details();
        movie.summary.overview = None;
        movie.summary.vote_average = 0.0;

        let card = movie_card(&movie);
        assert!(card.ends_with("No description available."));
        assert!(!card.contains("/10"));
    }

    #[test]
    fn test_recommendations_header_variants() {
        let mut recs = Recommendations {
            movies: vec![movie(1, &[]), movie(2, &[])],
            personalized: true,
            genres: vec![28],
            from_cache: false,
        };
        assert!(recommendations_header(&recs).contains("Based on your favorites"));

        recs.personalized = false;
        assert!(recommendations_header(&recs).contains("learn your taste"));

        recs.movies.clear();
        assert!(recommendations_header(&recs).contains("already seen everything"));
    }

    #[test]
    fn test_welcome_and_stats() {
        let user = User {
            id: 1,
            username: None,
            first_name: "Ada".to_string(),
            last_name: None,
            created_at: Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap(),
            last_active_at: Utc::now(),
        };
        let counts = UserStats {
            favorites: 3,
            watched: 2,
            searches: 10,
        };

        assert!(welcome(&user, &counts, true).contains("Hello, Ada!"));
        let back = welcome(&user, &counts, false);
        assert!(back.contains("Welcome back, Ada!"));
        assert!(back.contains("Favorites: 3"));

        assert!(stats(&user, &counts).contains("Member since March 9, 2024"));
    }

    #[test]
    fn test_discover_header_lists_filters() {
        let filters = DiscoverFilters {
            genres: vec![18, 28],
            year_from: Some(2000),
            year_to: Some(2010),
            min_rating: Some(7.0),
        };
        let text = discover_header(&filters, 12);
        assert!(text.contains("Filters: Genres: 2 selected | Years: 2000-2010 | Rating: 7+"));
        assert!(text.contains("Found 12 movies!"));

        let open = DiscoverFilters {
            year_from: Some(1990),
            ..Default::default()
        };
        assert!(discover_header(&open, 1).contains("Filters: Years: 1990+"));
        assert!(discover_header(&open, 0).contains("No movies match your filters."));
    }

    #[test]
    fn test_settings_texts() {
        let current = UserSettings { min_rating: 7.5 };
        assert!(settings(&current).contains("Min Rating: 7.5/10"));
        assert_eq!(min_rating_updated(&current), "⭐ Min rating set to 7.5/10!");
    }

    #[test]
    fn test_error_messages() {
        assert!(error_message(&AppError::Timeout).contains("temporarily unavailable"));
        assert_eq!(
            error_message(&AppError::InvalidInput("limit must be greater than zero".into())),
            "⚠️ limit must be greater than zero"
        );
        assert!(error_message(&AppError::StorageUnavailable("x".into())).contains("went wrong"));
    }
}
