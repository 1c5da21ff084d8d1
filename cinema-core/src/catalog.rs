//! Resolve the booking page's `?cinema=&movie=&date=&time=` query into a
//! concrete movie, cinema and showtime.

use crate::models::{Cinema, Movie, Showtime};
use chrono::{NaiveDate, NaiveTime, Timelike};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("missing `{0}` parameter")]
    Missing(&'static str),
    #[error("invalid `{field}` parameter: {value}")]
    Invalid { field: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("movie {0} not found")]
    MovieNotFound(i64),
    #[error("cinema {0} not found")]
    CinemaNotFound(i64),
    #[error("no showtime at {time} on {date}")]
    NoShowtime { date: NaiveDate, time: NaiveTime },
    #[error("showtime {0} is not open for booking")]
    NotBookable(i64),
}

impl CatalogError {
    #[must_use]
    pub const fn i18n_key(&self) -> &'static str {
        match self {
            Self::MovieNotFound(_) => "booking.movie_not_found",
            Self::CinemaNotFound(_) => "booking.cinema_not_found",
            Self::NoShowtime { .. } => "booking.no_showtime",
            Self::NotBookable(_) => "booking.not_bookable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingQuery {
    pub cinema_id: i64,
    pub movie_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

impl BookingQuery {
    /// Parse a query string, with or without the leading `?`.
    ///
    /// # Errors
    /// [`QueryError`] for the first missing or malformed parameter.
    pub fn parse(query: &str) -> Result<Self, QueryError> {
        let params: BTreeMap<String, String> =
            url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
                .map(|(k, v)| (k.into_owned(), v.trim().to_string()))
                .filter(|(_, v)| !v.is_empty())
                .collect();
        let field = |name: &'static str| params.get(name).ok_or(QueryError::Missing(name));
        let invalid = |name: &'static str, value: &str| QueryError::Invalid {
            field: name,
            value: value.to_string(),
        };

        let cinema = field("cinema")?;
        let movie = field("movie")?;
        let date = field("date")?;
        let time = field("time")?;
        Ok(Self {
            cinema_id: cinema.parse().map_err(|_| invalid("cinema", cinema))?,
            movie_id: movie.parse().map_err(|_| invalid("movie", movie))?,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| invalid("date", date))?,
            time: parse_time(time).ok_or_else(|| invalid("time", time))?,
        })
    }

    /// The query for booking `showtime`, when its date and time parse.
    #[must_use]
    pub fn for_showtime(showtime: &Showtime) -> Option<Self> {
        Some(Self {
            cinema_id: showtime.cinema_id,
            movie_id: showtime.movie_id,
            date: NaiveDate::parse_from_str(&showtime.show_date, "%Y-%m-%d").ok()?,
            time: parse_time(showtime.start_hhmm())?,
        })
    }

    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("cinema", self.cinema_id.to_string()),
            ("movie", self.movie_id.to_string()),
            ("date", self.date.format("%Y-%m-%d").to_string()),
            ("time", self.time.format("%H:%M").to_string()),
        ]
    }

    /// Query string for links into the booking page.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_pairs())
            .finish()
    }

    /// Stable key naming this screening, used to seed the demo seat map.
    #[must_use]
    pub fn showtime_key(&self) -> String {
        format!(
            "cinema-{}/movie-{}/{}/{}",
            self.cinema_id,
            self.movie_id,
            self.date.format("%Y-%m-%d"),
            self.time.format("%H:%M")
        )
    }

    fn matches(&self, showtime: &Showtime) -> bool {
        showtime.movie_id == self.movie_id
            && NaiveDate::parse_from_str(&showtime.show_date, "%Y-%m-%d").is_ok_and(|d| d == self.date)
            && parse_time(showtime.start_hhmm()).is_some_and(|t| t == self.time.with_second(0).unwrap_or(t))
    }
}

/// First showtime of the queried movie at the queried date and minute.
///
/// # Errors
/// [`CatalogError::NoShowtime`] when nothing matches.
pub fn pick_showtime<'a>(showtimes: &'a [Showtime], query: &BookingQuery) -> Result<&'a Showtime, CatalogError> {
    showtimes
        .iter()
        .find(|s| query.matches(s))
        .ok_or(CatalogError::NoShowtime {
            date: query.date,
            time: query.time,
        })
}

/// Everything the booking page shows once the query resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingContext {
    pub movie: Movie,
    pub cinema: Cinema,
    pub showtime: Showtime,
}

/// Combine the results of the three sequential lookups.
///
/// # Errors
/// [`CatalogError`] for the first lookup that came back empty, or when the
/// matched showtime is not open for booking.
pub fn resolve(
    query: &BookingQuery,
    movie: Option<Movie>,
    cinema: Option<Cinema>,
    showtimes: &[Showtime],
) -> Result<BookingContext, CatalogError> {
    let movie = movie.ok_or(CatalogError::MovieNotFound(query.movie_id))?;
    let cinema = cinema.ok_or(CatalogError::CinemaNotFound(query.cinema_id))?;
    let showtime = pick_showtime(showtimes, query)?;
    if !showtime.status.is_bookable() {
        return Err(CatalogError::NotBookable(showtime.showtime_id));
    }
    Ok(BookingContext {
        movie,
        cinema,
        showtime: showtime.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShowtimeStatus;

    fn showtime(id: i64, movie: i64, date: &str, time: &str, status: ShowtimeStatus) -> Showtime {
        Showtime {
            showtime_id: id,
            movie_id: movie,
            movie_name: "Dune".into(),
            cinema_id: 2,
            cinema_name: "CGV Vincom".into(),
            hall_id: 1,
            hall_name: "Hall 1".into(),
            show_date: date.into(),
            start_time: time.into(),
            end_time: None,
            format_type: None,
            subtitle_language: None,
            price: 90_000,
            available_seats: None,
            status,
        }
    }

    fn movie() -> Movie {
        Movie {
            movie_id: 3,
            title: "Dune".into(),
            title_en: None,
            age_rating: None,
            duration: Some(166),
            poster_url: None,
            status: None,
        }
    }

    fn cinema() -> Cinema {
        Cinema {
            cinema_id: 2,
            chain_id: None,
            cinema_name: "CGV Vincom".into(),
            address: None,
            city: None,
            phone_number: None,
        }
    }

    #[test]
    fn parses_both_time_formats() {
        let q = BookingQuery::parse("?cinema=2&movie=3&date=2024-06-01&time=19:30").expect("query");
        let with_seconds = BookingQuery::parse("cinema=2&movie=3&date=2024-06-01&time=19:30:00").expect("query");
        assert_eq!(q, with_seconds);
        assert_eq!(q.to_query_string(), "cinema=2&movie=3&date=2024-06-01&time=19%3A30");
        assert_eq!(q.showtime_key(), "cinema-2/movie-3/2024-06-01/19:30");
    }

    #[test]
    fn reports_missing_and_malformed_parameters() {
        assert_eq!(
            BookingQuery::parse("cinema=2&movie=3&date=2024-06-01"),
            Err(QueryError::Missing("time"))
        );
        assert_eq!(
            BookingQuery::parse("cinema=2&movie=&date=2024-06-01&time=10:00"),
            Err(QueryError::Missing("movie"))
        );
        assert!(matches!(
            BookingQuery::parse("cinema=x&movie=3&date=2024-06-01&time=10:00"),
            Err(QueryError::Invalid { field: "cinema", .. })
        ));
        assert!(matches!(
            BookingQuery::parse("cinema=2&movie=3&date=01/06/2024&time=10:00"),
            Err(QueryError::Invalid { field: "date", .. })
        ));
    }

    #[test]
    fn picks_showtime_at_minute_precision() {
        let q = BookingQuery::parse("cinema=2&movie=3&date=2024-06-01&time=19:30").expect("query");
        let list = vec![
            showtime(1, 3, "2024-06-01", "17:00:00", ShowtimeStatus::Scheduled),
            showtime(2, 4, "2024-06-01", "19:30:00", ShowtimeStatus::Scheduled),
            showtime(3, 3, "2024-06-01", "19:30:00", ShowtimeStatus::Scheduled),
        ];
        assert_eq!(pick_showtime(&list, &q).map(|s| s.showtime_id), Ok(3));
        let ctx = resolve(&q, Some(movie()), Some(cinema()), &list).expect("resolved");
        assert_eq!(ctx.showtime.showtime_id, 3);
    }

    #[test]
    fn showtimes_link_back_to_their_query() {
        let st = showtime(3, 3, "2024-06-01", "19:30:00", ShowtimeStatus::Scheduled);
        let q = BookingQuery::for_showtime(&st).expect("query");
        assert_eq!(q.to_query_string(), "cinema=2&movie=3&date=2024-06-01&time=19%3A30");
        let odd = showtime(4, 3, "June 1st", "19:30", ShowtimeStatus::Scheduled);
        assert_eq!(BookingQuery::for_showtime(&odd), None);
    }

    #[test]
    fn resolution_stops_at_first_gap() {
        let q = BookingQuery::parse("cinema=2&movie=3&date=2024-06-01&time=19:30").expect("query");
        assert_eq!(
            resolve(&q, None, Some(cinema()), &[]),
            Err(CatalogError::MovieNotFound(3))
        );
        assert_eq!(
            resolve(&q, Some(movie()), None, &[]),
            Err(CatalogError::CinemaNotFound(2))
        );
        assert!(matches!(
            resolve(&q, Some(movie()), Some(cinema()), &[]),
            Err(CatalogError::NoShowtime { .. })
        ));
        let cancelled = vec![showtime(9, 3, "2024-06-01", "19:30", ShowtimeStatus::Cancelled)];
        assert_eq!(
            resolve(&q, Some(movie()), Some(cinema()), &cancelled),
            Err(CatalogError::NotBookable(9))
        );
    }
}
